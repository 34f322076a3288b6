//! Weighted link between a recipe and an ingredient.
//!
//! A link is a pure association: it owns neither endpoint and is removed
//! whenever either endpoint is deleted.

use chrono::{DateTime, Utc};
use sea_orm::entity::{ActiveValue, prelude::*};
use uuid::Uuid;

use crate::{EngineError, Ingredient, util::parse_uuid};

/// A link resolved against the current ingredient record.
///
/// `quantity` is the amount of the ingredient one batch of the recipe
/// consumes, in the ingredient's `stock_unit`.
#[derive(Clone, Debug, PartialEq)]
pub struct RecipeIngredient {
    pub id: Uuid,
    pub recipe_id: Uuid,
    pub quantity: f64,
    pub ingredient: Ingredient,
    pub created_at: DateTime<Utc>,
}

impl RecipeIngredient {
    /// Cost of this line at the ingredient's last purchase price.
    pub fn line_cost(&self) -> f64 {
        self.quantity * self.ingredient.last_purchase_price
    }

    pub(crate) fn from_models(
        link: Model,
        ingredient: super::ingredients::Model,
    ) -> Result<Self, EngineError> {
        Ok(Self {
            id: parse_uuid(&link.id, "recipe ingredient")?,
            recipe_id: parse_uuid(&link.recipe_id, "recipe")?,
            quantity: link.quantity,
            ingredient: Ingredient::try_from(ingredient)?,
            created_at: link.created_at,
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "recipe_ingredients")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub recipe_id: String,
    pub ingredient_id: String,
    pub quantity: f64,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::recipes::Entity",
        from = "Column::RecipeId",
        to = "super::recipes::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Recipes,
    #[sea_orm(
        belongs_to = "super::ingredients::Entity",
        from = "Column::IngredientId",
        to = "super::ingredients::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Ingredients,
}

impl Related<super::recipes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Recipes.def()
    }
}

impl Related<super::ingredients::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Ingredients.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub(crate) fn new_active(
    recipe_id: Uuid,
    ingredient_id: Uuid,
    quantity: f64,
    now: DateTime<Utc>,
) -> ActiveModel {
    ActiveModel {
        id: ActiveValue::Set(Uuid::new_v4().to_string()),
        recipe_id: ActiveValue::Set(recipe_id.to_string()),
        ingredient_id: ActiveValue::Set(ingredient_id.to_string()),
        quantity: ActiveValue::Set(quantity),
        created_at: ActiveValue::Set(now),
    }
}
