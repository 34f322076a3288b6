//! The module contains `Recipe` ("ficha técnica") and its storage model.

use chrono::{DateTime, Utc};
use sea_orm::entity::{ActiveValue, prelude::*};
use uuid::Uuid;

use crate::{EngineError, RecipeCost, RecipeIngredient, util::parse_uuid};

/// A recipe: the costed production unit.
///
/// `markup` stays `None` until the user sets one. The default factor is only
/// applied when a [`RecipeCost`] is computed, never written back.
#[derive(Clone, Debug, PartialEq)]
pub struct Recipe {
    pub id: Uuid,
    pub user_id: String,
    pub name: String,
    pub description: Option<String>,
    pub method: String,
    pub yield_quantity: f64,
    pub yield_unit: String,
    pub markup: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Recipe {
    pub(crate) fn new(
        user_id: String,
        name: String,
        description: Option<String>,
        method: String,
        yield_quantity: f64,
        yield_unit: String,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            name,
            description,
            method,
            yield_quantity,
            yield_unit,
            markup: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Cost this recipe against its resolved ingredient lines.
    pub fn cost(&self, lines: &[RecipeIngredient]) -> RecipeCost {
        RecipeCost::compute(
            self.yield_quantity,
            self.markup,
            lines
                .iter()
                .map(|line| (line.quantity, line.ingredient.last_purchase_price)),
        )
    }
}

/// A recipe together with its resolved ingredient lines and costing.
#[derive(Clone, Debug, PartialEq)]
pub struct RecipeDetail {
    pub recipe: Recipe,
    pub ingredients: Vec<RecipeIngredient>,
    pub cost: RecipeCost,
}

impl RecipeDetail {
    pub(crate) fn new(recipe: Recipe, ingredients: Vec<RecipeIngredient>) -> Self {
        let cost = recipe.cost(&ingredients);
        Self {
            recipe,
            ingredients,
            cost,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "recipes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub description: Option<String>,
    pub method: String,
    pub yield_quantity: f64,
    pub yield_unit: String,
    pub markup: Option<f64>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::recipe_ingredients::Entity")]
    RecipeIngredients,
    #[sea_orm(has_many = "super::production_orders::Entity")]
    ProductionOrders,
}

impl Related<super::recipe_ingredients::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RecipeIngredients.def()
    }
}

impl Related<super::production_orders::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductionOrders.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Recipe> for ActiveModel {
    fn from(value: &Recipe) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            user_id: ActiveValue::Set(value.user_id.clone()),
            name: ActiveValue::Set(value.name.clone()),
            description: ActiveValue::Set(value.description.clone()),
            method: ActiveValue::Set(value.method.clone()),
            yield_quantity: ActiveValue::Set(value.yield_quantity),
            yield_unit: ActiveValue::Set(value.yield_unit.clone()),
            markup: ActiveValue::Set(value.markup),
            created_at: ActiveValue::Set(value.created_at),
            updated_at: ActiveValue::Set(value.updated_at),
        }
    }
}

impl TryFrom<Model> for Recipe {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "recipe")?,
            user_id: model.user_id,
            name: model.name,
            description: model.description,
            method: model.method,
            yield_quantity: model.yield_quantity,
            yield_unit: model.yield_unit,
            markup: model.markup,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Ingredient;

    fn bread(yield_quantity: f64) -> Recipe {
        Recipe::new(
            "alice".to_string(),
            "Bread".to_string(),
            None,
            "Mix and bake.".to_string(),
            yield_quantity,
            "portions".to_string(),
            Utc::now(),
        )
    }

    fn line(recipe: &Recipe, quantity: f64, price: f64) -> RecipeIngredient {
        let now = Utc::now();
        RecipeIngredient {
            id: Uuid::new_v4(),
            recipe_id: recipe.id,
            quantity,
            ingredient: Ingredient::new(
                "alice".to_string(),
                "Flour".to_string(),
                String::new(),
                10.0,
                "kg".to_string(),
                price,
                now,
            ),
            created_at: now,
        }
    }

    #[test]
    fn new_recipe_has_no_markup() {
        assert_eq!(bread(5.0).markup, None);
    }

    #[test]
    fn cost_uses_ingredient_prices() {
        let recipe = bread(5.0);
        let lines = vec![line(&recipe, 2.0, 2.0)];
        let cost = recipe.cost(&lines);
        assert_eq!(cost.total_cost, 4.0);
        assert_eq!(cost.markup_factor, 3.0);
    }
}
