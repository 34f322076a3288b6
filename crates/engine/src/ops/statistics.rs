use sea_orm::{ConnectionTrait, PaginatorTrait, QueryFilter, Statement, prelude::*};

use crate::{EngineError, ResultEngine, recipes};

use super::{Engine, access::require_identity};

/// Store-level aggregates over the caller's inventory.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InventoryStatistics {
    pub ingredient_count: u64,
    pub recipe_count: u64,
    /// `Σ stock_quantity * last_purchase_price` over all ingredients.
    pub inventory_value: f64,
}

/// SQL `COUNT(*)` comes back signed.
fn row_count(value: i64) -> ResultEngine<u64> {
    u64::try_from(value).map_err(|_| {
        EngineError::Database(DbErr::Custom(format!("negative row count: {value}")))
    })
}

impl Engine {
    /// Returns aggregate figures for the caller's inventory.
    pub async fn inventory_statistics(&self, user_id: &str) -> ResultEngine<InventoryStatistics> {
        require_identity(user_id)?;

        let backend = self.database.get_database_backend();
        let stmt = Statement::from_sql_and_values(
            backend,
            "SELECT COUNT(*) AS count, \
             COALESCE(SUM(stock_quantity * last_purchase_price), 0.0) AS value \
             FROM ingredients \
             WHERE user_id = ?",
            vec![user_id.into()],
        );
        let row = self.database.query_one(stmt).await?;
        let (ingredient_count, inventory_value) = match row {
            Some(row) => (
                row.try_get::<i64>("", "count")?,
                row.try_get::<f64>("", "value")?,
            ),
            None => (0, 0.0),
        };

        let recipe_count = recipes::Entity::find()
            .filter(recipes::Column::UserId.eq(user_id))
            .count(&self.database)
            .await?;

        Ok(InventoryStatistics {
            ingredient_count: row_count(ingredient_count)?,
            recipe_count,
            inventory_value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_count_accepts_non_negative() {
        assert_eq!(row_count(0), Ok(0));
        assert_eq!(row_count(42), Ok(42));
    }

    #[test]
    fn negative_row_count_is_a_database_error() {
        assert!(matches!(row_count(-1), Err(EngineError::Database(_))));
    }
}
