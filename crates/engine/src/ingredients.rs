//! The module contains `Ingredient` struct and its storage model.

use chrono::{DateTime, Utc};
use sea_orm::entity::{ActiveValue, prelude::*};
use uuid::Uuid;

use crate::{EngineError, util::parse_uuid};

/// A purchasable stock item ("insumo").
///
/// `stock_quantity` is expressed in `stock_unit`, and `last_purchase_price`
/// is the price paid for one `stock_unit` the last time it was bought.
#[derive(Clone, Debug, PartialEq)]
pub struct Ingredient {
    pub id: Uuid,
    pub user_id: String,
    pub name: String,
    pub category: String,
    pub stock_quantity: f64,
    pub stock_unit: String,
    pub last_purchase_price: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Ingredient {
    pub(crate) fn new(
        user_id: String,
        name: String,
        category: String,
        stock_quantity: f64,
        stock_unit: String,
        last_purchase_price: f64,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            name,
            category,
            stock_quantity,
            stock_unit,
            last_purchase_price,
            created_at: now,
            updated_at: now,
        }
    }

    /// Value of the stock on hand at the last purchase price.
    pub fn stock_value(&self) -> f64 {
        self.stock_quantity * self.last_purchase_price
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "ingredients")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub category: String,
    pub stock_quantity: f64,
    pub stock_unit: String,
    pub last_purchase_price: f64,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::recipe_ingredients::Entity")]
    RecipeIngredients,
}

impl Related<super::recipe_ingredients::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RecipeIngredients.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Ingredient> for ActiveModel {
    fn from(value: &Ingredient) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            user_id: ActiveValue::Set(value.user_id.clone()),
            name: ActiveValue::Set(value.name.clone()),
            category: ActiveValue::Set(value.category.clone()),
            stock_quantity: ActiveValue::Set(value.stock_quantity),
            stock_unit: ActiveValue::Set(value.stock_unit.clone()),
            last_purchase_price: ActiveValue::Set(value.last_purchase_price),
            created_at: ActiveValue::Set(value.created_at),
            updated_at: ActiveValue::Set(value.updated_at),
        }
    }
}

impl TryFrom<Model> for Ingredient {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "ingredient")?,
            user_id: model.user_id,
            name: model.name,
            category: model.category,
            stock_quantity: model.stock_quantity,
            stock_unit: model.stock_unit,
            last_purchase_price: model.last_purchase_price,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flour() -> Ingredient {
        Ingredient::new(
            "alice".to_string(),
            "Flour".to_string(),
            "Dry goods".to_string(),
            10.0,
            "kg".to_string(),
            2.0,
            Utc::now(),
        )
    }

    #[test]
    fn stock_value() {
        assert_eq!(flour().stock_value(), 20.0);
    }

    #[test]
    fn model_conversion_keeps_fields() {
        let ingredient = flour();
        let active = ActiveModel::from(&ingredient);
        let model = Model {
            id: active.id.clone().unwrap(),
            user_id: active.user_id.clone().unwrap(),
            name: active.name.clone().unwrap(),
            category: active.category.clone().unwrap(),
            stock_quantity: active.stock_quantity.clone().unwrap(),
            stock_unit: active.stock_unit.clone().unwrap(),
            last_purchase_price: active.last_purchase_price.clone().unwrap(),
            created_at: active.created_at.clone().unwrap(),
            updated_at: active.updated_at.clone().unwrap(),
        };
        assert_eq!(Ingredient::try_from(model).unwrap(), ingredient);
    }

    #[test]
    fn corrupted_id_is_not_found() {
        let ingredient = flour();
        let model = Model {
            id: "not-a-uuid".to_string(),
            user_id: ingredient.user_id,
            name: ingredient.name,
            category: ingredient.category,
            stock_quantity: ingredient.stock_quantity,
            stock_unit: ingredient.stock_unit,
            last_purchase_price: ingredient.last_purchase_price,
            created_at: ingredient.created_at,
            updated_at: ingredient.updated_at,
        };
        assert_eq!(
            Ingredient::try_from(model),
            Err(EngineError::KeyNotFound("ingredient not exists".to_string()))
        );
    }
}
