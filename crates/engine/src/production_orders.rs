//! Production orders: batches of a recipe scheduled for production.
//!
//! They are kept minimal. Their only role in costing is to protect the
//! recipes they reference from deletion.

use chrono::{DateTime, Utc};
use sea_orm::entity::{ActiveValue, prelude::*};
use uuid::Uuid;

use crate::{EngineError, util::parse_uuid};

#[derive(Clone, Debug, PartialEq)]
pub struct ProductionOrder {
    pub id: Uuid,
    pub user_id: String,
    pub recipe_id: Uuid,
    pub batches: f64,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "production_orders")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub recipe_id: String,
    pub batches: f64,
    pub note: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::recipes::Entity",
        from = "Column::RecipeId",
        to = "super::recipes::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    Recipes,
}

impl Related<super::recipes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Recipes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&ProductionOrder> for ActiveModel {
    fn from(value: &ProductionOrder) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            user_id: ActiveValue::Set(value.user_id.clone()),
            recipe_id: ActiveValue::Set(value.recipe_id.to_string()),
            batches: ActiveValue::Set(value.batches),
            note: ActiveValue::Set(value.note.clone()),
            created_at: ActiveValue::Set(value.created_at),
        }
    }
}

impl TryFrom<Model> for ProductionOrder {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "production order")?,
            user_id: model.user_id,
            recipe_id: parse_uuid(&model.recipe_id, "recipe")?,
            batches: model.batches,
            note: model.note,
            created_at: model.created_at,
        })
    }
}
