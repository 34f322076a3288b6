//! Command structs for engine operations.
//!
//! These types group parameters for write operations (create and partial
//! update of ingredients and recipes), keeping call sites readable and
//! avoiding long argument lists.

use uuid::Uuid;

/// Create an ingredient.
#[derive(Clone, Debug, Default)]
pub struct IngredientNew {
    pub name: String,
    pub category: String,
    pub stock_quantity: f64,
    pub stock_unit: String,
    pub last_purchase_price: f64,
}

impl IngredientNew {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    #[must_use]
    pub fn stock(mut self, quantity: f64, unit: impl Into<String>) -> Self {
        self.stock_quantity = quantity;
        self.stock_unit = unit.into();
        self
    }

    #[must_use]
    pub fn last_purchase_price(mut self, price: f64) -> Self {
        self.last_purchase_price = price;
        self
    }
}

/// Partial update of an ingredient. `None` leaves the field untouched.
#[derive(Clone, Debug, Default)]
pub struct IngredientUpdate {
    pub name: Option<String>,
    pub category: Option<String>,
    pub stock_quantity: Option<f64>,
    pub stock_unit: Option<String>,
    pub last_purchase_price: Option<f64>,
}

impl IngredientUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.category.is_none()
            && self.stock_quantity.is_none()
            && self.stock_unit.is_none()
            && self.last_purchase_price.is_none()
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    #[must_use]
    pub fn stock_quantity(mut self, quantity: f64) -> Self {
        self.stock_quantity = Some(quantity);
        self
    }

    #[must_use]
    pub fn stock_unit(mut self, unit: impl Into<String>) -> Self {
        self.stock_unit = Some(unit.into());
        self
    }

    #[must_use]
    pub fn last_purchase_price(mut self, price: f64) -> Self {
        self.last_purchase_price = Some(price);
        self
    }
}

/// Create a recipe. The markup cannot be set at creation.
#[derive(Clone, Debug, Default)]
pub struct RecipeNew {
    pub name: String,
    pub description: Option<String>,
    pub method: String,
    pub yield_quantity: f64,
    pub yield_unit: String,
}

impl RecipeNew {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }

    #[must_use]
    pub fn yields(mut self, quantity: f64, unit: impl Into<String>) -> Self {
        self.yield_quantity = quantity;
        self.yield_unit = unit.into();
        self
    }
}

/// Partial update of a recipe. `None` leaves the field untouched.
///
/// `description` and `markup` are nullable: `Some(None)` clears the stored
/// value.
#[derive(Clone, Debug, Default)]
pub struct RecipeUpdate {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub method: Option<String>,
    pub yield_quantity: Option<f64>,
    pub yield_unit: Option<String>,
    pub markup: Option<Option<f64>>,
}

impl RecipeUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.method.is_none()
            && self.yield_quantity.is_none()
            && self.yield_unit.is_none()
            && self.markup.is_none()
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: Option<String>) -> Self {
        self.description = Some(description);
        self
    }

    #[must_use]
    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    #[must_use]
    pub fn yield_quantity(mut self, quantity: f64) -> Self {
        self.yield_quantity = Some(quantity);
        self
    }

    #[must_use]
    pub fn yield_unit(mut self, unit: impl Into<String>) -> Self {
        self.yield_unit = Some(unit.into());
        self
    }

    #[must_use]
    pub fn markup(mut self, markup: f64) -> Self {
        self.markup = Some(Some(markup));
        self
    }

    #[must_use]
    pub fn clear_markup(mut self) -> Self {
        self.markup = Some(None);
        self
    }
}

/// Add an ingredient to a recipe.
///
/// Both fields are required; they are optional here so that a missing value
/// is reported as a validation error instead of being defaulted.
#[derive(Clone, Debug, Default)]
pub struct RecipeIngredientNew {
    pub ingredient_id: Option<Uuid>,
    pub quantity: Option<f64>,
}

impl RecipeIngredientNew {
    #[must_use]
    pub fn new(ingredient_id: Uuid, quantity: f64) -> Self {
        Self {
            ingredient_id: Some(ingredient_id),
            quantity: Some(quantity),
        }
    }
}

/// Schedule a production order for a recipe.
#[derive(Clone, Debug)]
pub struct ProductionOrderNew {
    pub recipe_id: Uuid,
    pub batches: f64,
    pub note: Option<String>,
}

impl ProductionOrderNew {
    #[must_use]
    pub fn new(recipe_id: Uuid, batches: f64) -> Self {
        Self {
            recipe_id,
            batches,
            note: None,
        }
    }

    #[must_use]
    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}
