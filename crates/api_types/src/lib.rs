use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Forgiving numeric fields.
///
/// Forms send numbers as JSON numbers or as strings. Anything that does not
/// parse to a finite number (malformed text, booleans, `null`) is read as
/// `0.0` instead of rejecting the whole request.
pub mod numeric {
    use serde::{Deserialize, Deserializer, de::IgnoredAny};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Loose {
        Number(f64),
        Text(String),
        Other(IgnoredAny),
    }

    impl Loose {
        fn value(self) -> f64 {
            let value = match self {
                Self::Number(value) => value,
                Self::Text(text) => text.trim().parse().unwrap_or(0.0),
                Self::Other(_) => 0.0,
            };
            if value.is_finite() { value } else { 0.0 }
        }
    }

    /// Use with `#[serde(default, deserialize_with = "lenient")]`.
    pub fn lenient<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        Loose::deserialize(deserializer).map(Loose::value)
    }

    /// Partial-update variant: an absent field stays `None` (requires
    /// `#[serde(default)]`), a present one is read leniently.
    pub fn lenient_opt<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        lenient(deserializer).map(Some)
    }

    /// Nullable numeric field in a partial update.
    ///
    /// absent → `None`, `null` → `Some(None)`, anything else → `Some(Some(v))`.
    pub fn lenient_nullable<'de, D>(deserializer: D) -> Result<Option<Option<f64>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let loose: Option<Loose> = Option::deserialize(deserializer)?;
        Ok(Some(loose.map(Loose::value)))
    }
}

/// Distinguishes an explicit `null` from an absent field.
pub mod nullable {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Some)
    }
}

pub mod ingredient {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct IngredientNew {
        pub name: String,
        #[serde(default)]
        pub category: String,
        #[serde(default, deserialize_with = "crate::numeric::lenient")]
        pub stock_quantity: f64,
        #[serde(default)]
        pub stock_unit: String,
        #[serde(default, deserialize_with = "crate::numeric::lenient")]
        pub last_purchase_price: f64,
    }

    /// Partial update. Absent fields are left untouched.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct IngredientUpdate {
        pub name: Option<String>,
        pub category: Option<String>,
        #[serde(default, deserialize_with = "crate::numeric::lenient_opt")]
        pub stock_quantity: Option<f64>,
        pub stock_unit: Option<String>,
        #[serde(default, deserialize_with = "crate::numeric::lenient_opt")]
        pub last_purchase_price: Option<f64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct IngredientView {
        pub id: Uuid,
        pub name: String,
        pub category: String,
        pub stock_quantity: f64,
        pub stock_unit: String,
        pub last_purchase_price: f64,
        /// `stock_quantity * last_purchase_price`.
        pub stock_value: f64,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct IngredientListResponse {
        pub ingredients: Vec<IngredientView>,
    }
}

pub mod recipe {
    use super::*;
    use crate::ingredient::IngredientView;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RecipeNew {
        pub name: String,
        pub description: Option<String>,
        #[serde(default)]
        pub method: String,
        #[serde(default, deserialize_with = "crate::numeric::lenient")]
        pub yield_quantity: f64,
        #[serde(default)]
        pub yield_unit: String,
    }

    /// Partial update. `description` and `markup` accept `null` to clear the
    /// stored value.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct RecipeUpdate {
        pub name: Option<String>,
        #[serde(default, deserialize_with = "crate::nullable::deserialize")]
        pub description: Option<Option<String>>,
        pub method: Option<String>,
        #[serde(default, deserialize_with = "crate::numeric::lenient_opt")]
        pub yield_quantity: Option<f64>,
        pub yield_unit: Option<String>,
        #[serde(default, deserialize_with = "crate::numeric::lenient_nullable")]
        pub markup: Option<Option<f64>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RecipeView {
        pub id: Uuid,
        pub name: String,
        pub description: Option<String>,
        pub method: String,
        pub yield_quantity: f64,
        pub yield_unit: String,
        /// Stored markup; `null` means the default applies when costing.
        pub markup: Option<f64>,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RecipeListResponse {
        pub recipes: Vec<RecipeView>,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
    pub struct RecipeCostView {
        pub total_cost: f64,
        pub cost_per_portion: f64,
        pub markup_factor: f64,
        pub suggested_sale_price: f64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RecipeIngredientNew {
        pub ingredient_id: Option<Uuid>,
        pub quantity: Option<f64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RecipeIngredientView {
        pub id: Uuid,
        pub recipe_id: Uuid,
        pub quantity: f64,
        /// `quantity * ingredient.last_purchase_price`.
        pub line_cost: f64,
        pub ingredient: IngredientView,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RecipeIngredientListResponse {
        pub ingredients: Vec<RecipeIngredientView>,
    }

    /// The full recipe page: recipe, its ingredient lines and the costing.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct RecipeDetailView {
        pub recipe: RecipeView,
        pub ingredients: Vec<RecipeIngredientView>,
        pub cost: RecipeCostView,
    }
}

pub mod production_order {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ProductionOrderNew {
        pub recipe_id: Uuid,
        pub batches: f64,
        pub note: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ProductionOrderView {
        pub id: Uuid,
        pub recipe_id: Uuid,
        pub batches: f64,
        pub note: Option<String>,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ProductionOrderListResponse {
        pub production_orders: Vec<ProductionOrderView>,
    }
}

pub mod stats {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Statistic {
        pub ingredient_count: u64,
        pub recipe_count: u64,
        pub inventory_value: f64,
    }
}

#[cfg(test)]
mod tests {
    use super::ingredient::{IngredientNew, IngredientUpdate};
    use super::recipe::{RecipeIngredientNew, RecipeUpdate};

    #[test]
    fn numeric_strings_are_accepted() {
        let body: IngredientNew = serde_json::from_str(
            r#"{"name":"Flour","stock_quantity":"10","last_purchase_price":" 2.5 "}"#,
        )
        .unwrap();
        assert_eq!(body.stock_quantity, 10.0);
        assert_eq!(body.last_purchase_price, 2.5);
        assert_eq!(body.stock_unit, "");
    }

    #[test]
    fn malformed_numbers_become_zero() {
        let body: IngredientNew = serde_json::from_str(
            r#"{"name":"Flour","stock_quantity":"ten","last_purchase_price":true}"#,
        )
        .unwrap();
        assert_eq!(body.stock_quantity, 0.0);
        assert_eq!(body.last_purchase_price, 0.0);

        let body: IngredientNew =
            serde_json::from_str(r#"{"name":"Flour","stock_quantity":null}"#).unwrap();
        assert_eq!(body.stock_quantity, 0.0);

        let body: IngredientNew =
            serde_json::from_str(r#"{"name":"Flour","stock_quantity":"NaN"}"#).unwrap();
        assert_eq!(body.stock_quantity, 0.0);
    }

    #[test]
    fn update_keeps_absent_fields_absent() {
        let body: IngredientUpdate =
            serde_json::from_str(r#"{"last_purchase_price":"3"}"#).unwrap();
        assert_eq!(body.last_purchase_price, Some(3.0));
        assert_eq!(body.stock_quantity, None);
        assert_eq!(body.name, None);
    }

    #[test]
    fn markup_null_clears_and_absent_keeps() {
        let body: RecipeUpdate = serde_json::from_str(r#"{"markup":null}"#).unwrap();
        assert_eq!(body.markup, Some(None));

        let body: RecipeUpdate = serde_json::from_str(r#"{"markup":"2.5"}"#).unwrap();
        assert_eq!(body.markup, Some(Some(2.5)));

        let body: RecipeUpdate = serde_json::from_str(r#"{"name":"Bread"}"#).unwrap();
        assert_eq!(body.markup, None);
        assert_eq!(body.description, None);

        let body: RecipeUpdate = serde_json::from_str(r#"{"description":null}"#).unwrap();
        assert_eq!(body.description, Some(None));
    }

    #[test]
    fn link_quantity_is_not_coerced() {
        let body: RecipeIngredientNew = serde_json::from_str(r#"{"quantity":2}"#).unwrap();
        assert_eq!(body.quantity, Some(2.0));
        assert_eq!(body.ingredient_id, None);

        assert!(serde_json::from_str::<RecipeIngredientNew>(r#"{"quantity":"2"}"#).is_err());
    }
}
