use chrono::Utc;
use sea_orm::{QueryFilter, QueryOrder, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, ProductionOrder, ProductionOrderNew, ResultEngine, production_orders,
    util::{normalize_optional_text, validate_positive},
};

use super::{Engine, access::require_identity, with_tx};

impl Engine {
    /// Schedules a production order for one of the caller's recipes.
    pub async fn new_production_order(
        &self,
        cmd: ProductionOrderNew,
        user_id: &str,
    ) -> ResultEngine<ProductionOrder> {
        require_identity(user_id)?;
        let batches = validate_positive(cmd.batches, "batches")?;

        with_tx!(self, |db_tx| {
            self.require_recipe(&db_tx, user_id, cmd.recipe_id).await?;

            let order = ProductionOrder {
                id: Uuid::new_v4(),
                user_id: user_id.to_string(),
                recipe_id: cmd.recipe_id,
                batches,
                note: normalize_optional_text(cmd.note.as_deref()),
                created_at: Utc::now(),
            };
            let model = production_orders::ActiveModel::from(&order)
                .insert(&db_tx)
                .await?;
            ProductionOrder::try_from(model)
        })
    }

    /// Lists the production orders of `user_id`, newest first.
    pub async fn list_production_orders(
        &self,
        user_id: &str,
    ) -> ResultEngine<Vec<ProductionOrder>> {
        require_identity(user_id)?;
        production_orders::Entity::find()
            .filter(production_orders::Column::UserId.eq(user_id))
            .order_by_desc(production_orders::Column::CreatedAt)
            .order_by_desc(production_orders::Column::Id)
            .all(&self.database)
            .await?
            .into_iter()
            .map(ProductionOrder::try_from)
            .collect()
    }

    /// Deletes a production order, releasing its recipe.
    pub async fn delete_production_order(
        &self,
        order_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<ProductionOrder> {
        require_identity(user_id)?;
        with_tx!(self, |db_tx| {
            let model = production_orders::Entity::find_by_id(order_id.to_string())
                .filter(production_orders::Column::UserId.eq(user_id))
                .one(&db_tx)
                .await?
                .ok_or_else(|| {
                    EngineError::KeyNotFound("production order not exists".to_string())
                })?;
            let order = ProductionOrder::try_from(model)?;
            production_orders::Entity::delete_by_id(order_id.to_string())
                .exec(&db_tx)
                .await?;
            Ok(order)
        })
    }
}
