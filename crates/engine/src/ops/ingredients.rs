use chrono::Utc;
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, prelude::*};
use uuid::Uuid;

use crate::{
    Ingredient, IngredientNew, IngredientUpdate, ResultEngine, ingredients,
    util::{normalize_label, normalize_required_name, validate_non_negative},
};

use super::{Engine, access::require_identity, with_tx};

impl Engine {
    /// Creates an ingredient owned by `user_id`.
    pub async fn new_ingredient(
        &self,
        cmd: IngredientNew,
        user_id: &str,
    ) -> ResultEngine<Ingredient> {
        require_identity(user_id)?;
        let name = normalize_required_name(&cmd.name, "ingredient")?;
        let stock_quantity = validate_non_negative(cmd.stock_quantity, "stock_quantity")?;
        let last_purchase_price =
            validate_non_negative(cmd.last_purchase_price, "last_purchase_price")?;

        let ingredient = Ingredient::new(
            user_id.to_string(),
            name,
            normalize_label(&cmd.category),
            stock_quantity,
            normalize_label(&cmd.stock_unit),
            last_purchase_price,
            Utc::now(),
        );
        let model = ingredients::ActiveModel::from(&ingredient)
            .insert(&self.database)
            .await?;

        tracing::debug!(ingredient_id = %ingredient.id, "ingredient created");
        Ingredient::try_from(model)
    }

    /// Lists the ingredients of `user_id`, newest first.
    pub async fn list_ingredients(&self, user_id: &str) -> ResultEngine<Vec<Ingredient>> {
        require_identity(user_id)?;
        ingredients::Entity::find()
            .filter(ingredients::Column::UserId.eq(user_id))
            .order_by_desc(ingredients::Column::CreatedAt)
            .order_by_desc(ingredients::Column::Id)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Ingredient::try_from)
            .collect()
    }

    /// Returns a single ingredient.
    pub async fn ingredient(&self, ingredient_id: Uuid, user_id: &str) -> ResultEngine<Ingredient> {
        require_identity(user_id)?;
        with_tx!(self, |db_tx| {
            let model = self
                .require_ingredient(&db_tx, user_id, ingredient_id)
                .await?;
            Ingredient::try_from(model)
        })
    }

    /// Applies a partial update and returns the stored result.
    ///
    /// An empty update returns the record unchanged.
    pub async fn update_ingredient(
        &self,
        ingredient_id: Uuid,
        cmd: IngredientUpdate,
        user_id: &str,
    ) -> ResultEngine<Ingredient> {
        require_identity(user_id)?;
        let name = cmd
            .name
            .as_deref()
            .map(|name| normalize_required_name(name, "ingredient"))
            .transpose()?;
        let stock_quantity = cmd
            .stock_quantity
            .map(|value| validate_non_negative(value, "stock_quantity"))
            .transpose()?;
        let last_purchase_price = cmd
            .last_purchase_price
            .map(|value| validate_non_negative(value, "last_purchase_price"))
            .transpose()?;

        with_tx!(self, |db_tx| {
            let model = self
                .require_ingredient(&db_tx, user_id, ingredient_id)
                .await?;
            let model = if cmd.is_empty() {
                model
            } else {
                let mut active: ingredients::ActiveModel = model.into();
                if let Some(name) = name {
                    active.name = ActiveValue::Set(name);
                }
                if let Some(category) = cmd.category.as_deref() {
                    active.category = ActiveValue::Set(normalize_label(category));
                }
                if let Some(stock_quantity) = stock_quantity {
                    active.stock_quantity = ActiveValue::Set(stock_quantity);
                }
                if let Some(stock_unit) = cmd.stock_unit.as_deref() {
                    active.stock_unit = ActiveValue::Set(normalize_label(stock_unit));
                }
                if let Some(last_purchase_price) = last_purchase_price {
                    active.last_purchase_price = ActiveValue::Set(last_purchase_price);
                }
                active.updated_at = ActiveValue::Set(Utc::now());

                active.update(&db_tx).await?
            };
            Ingredient::try_from(model)
        })
    }

    /// Deletes an ingredient and every recipe link pointing to it.
    ///
    /// Links are removed explicitly, in the same transaction, before the
    /// ingredient itself.
    pub async fn delete_ingredient(
        &self,
        ingredient_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<Ingredient> {
        require_identity(user_id)?;
        with_tx!(self, |db_tx| {
            let model = self
                .require_ingredient(&db_tx, user_id, ingredient_id)
                .await?;
            let ingredient = Ingredient::try_from(model)?;

            let removed_links = self
                .remove_links_for_ingredient(&db_tx, ingredient_id)
                .await?;
            ingredients::Entity::delete_by_id(ingredient_id.to_string())
                .exec(&db_tx)
                .await?;

            tracing::debug!(%ingredient_id, removed_links, "ingredient deleted");
            Ok(ingredient)
        })
    }
}
