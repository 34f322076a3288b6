use chrono::Utc;
use sea_orm::{DatabaseTransaction, QueryFilter, QueryOrder, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, RecipeIngredient, RecipeIngredientNew, ResultEngine, ingredients,
    recipe_ingredients, util::validate_positive,
};

use super::{Engine, access::require_identity, with_tx};

impl Engine {
    /// Adds an ingredient to a recipe.
    ///
    /// Both the recipe and the ingredient must belong to `user_id`. A missing
    /// `ingredient_id` or `quantity` is rejected, never defaulted.
    pub async fn add_recipe_ingredient(
        &self,
        recipe_id: Uuid,
        cmd: RecipeIngredientNew,
        user_id: &str,
    ) -> ResultEngine<RecipeIngredient> {
        require_identity(user_id)?;
        let ingredient_id = cmd
            .ingredient_id
            .ok_or_else(|| EngineError::MissingField("ingredient_id is required".to_string()))?;
        let quantity = cmd
            .quantity
            .ok_or_else(|| EngineError::MissingField("quantity is required".to_string()))?;
        let quantity = validate_positive(quantity, "quantity")?;

        with_tx!(self, |db_tx| {
            self.require_recipe(&db_tx, user_id, recipe_id).await?;
            let ingredient = self
                .require_ingredient(&db_tx, user_id, ingredient_id)
                .await?;

            let link =
                recipe_ingredients::new_active(recipe_id, ingredient_id, quantity, Utc::now())
                    .insert(&db_tx)
                    .await?;
            RecipeIngredient::from_models(link, ingredient)
        })
    }

    /// Lists the ingredient lines of a recipe, ordered by ingredient name.
    pub async fn list_recipe_ingredients(
        &self,
        recipe_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<Vec<RecipeIngredient>> {
        require_identity(user_id)?;
        with_tx!(self, |db_tx| {
            self.require_recipe(&db_tx, user_id, recipe_id).await?;
            self.resolve_lines(&db_tx, recipe_id, user_id).await
        })
    }

    /// Removes a single ingredient line from a recipe.
    pub async fn remove_recipe_ingredient(
        &self,
        recipe_id: Uuid,
        link_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<RecipeIngredient> {
        require_identity(user_id)?;
        with_tx!(self, |db_tx| {
            self.require_recipe(&db_tx, user_id, recipe_id).await?;

            let (link, ingredient) = recipe_ingredients::Entity::find_by_id(link_id.to_string())
                .filter(recipe_ingredients::Column::RecipeId.eq(recipe_id.to_string()))
                .find_also_related(ingredients::Entity)
                .one(&db_tx)
                .await?
                .and_then(|(link, ingredient)| ingredient.map(|ingredient| (link, ingredient)))
                .ok_or_else(|| {
                    EngineError::KeyNotFound("recipe ingredient not exists".to_string())
                })?;

            recipe_ingredients::Entity::delete_by_id(link.id.clone())
                .exec(&db_tx)
                .await?;
            RecipeIngredient::from_models(link, ingredient)
        })
    }

    /// Removes every link pointing to an ingredient, leaving the ingredient
    /// in place. Returns the number of links removed.
    pub async fn clear_ingredient_links(
        &self,
        ingredient_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<u64> {
        require_identity(user_id)?;
        with_tx!(self, |db_tx| {
            self.require_ingredient(&db_tx, user_id, ingredient_id)
                .await?;
            self.remove_links_for_ingredient(&db_tx, ingredient_id)
                .await
        })
    }

    /// Removes every ingredient line of a recipe, leaving the recipe in
    /// place. Returns the number of links removed.
    pub async fn clear_recipe_links(&self, recipe_id: Uuid, user_id: &str) -> ResultEngine<u64> {
        require_identity(user_id)?;
        with_tx!(self, |db_tx| {
            self.require_recipe(&db_tx, user_id, recipe_id).await?;
            self.remove_links_for_recipe(&db_tx, recipe_id).await
        })
    }

    pub(super) async fn resolve_lines(
        &self,
        db_tx: &DatabaseTransaction,
        recipe_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<Vec<RecipeIngredient>> {
        let rows: Vec<(recipe_ingredients::Model, Option<ingredients::Model>)> =
            recipe_ingredients::Entity::find()
                .filter(recipe_ingredients::Column::RecipeId.eq(recipe_id.to_string()))
                .find_also_related(ingredients::Entity)
                .filter(ingredients::Column::UserId.eq(user_id))
                .order_by_asc(ingredients::Column::Name)
                .order_by_asc(recipe_ingredients::Column::CreatedAt)
                .all(db_tx)
                .await?;

        let mut out = Vec::with_capacity(rows.len());
        for (link, ingredient) in rows {
            let Some(ingredient) = ingredient else { continue };
            out.push(RecipeIngredient::from_models(link, ingredient)?);
        }
        Ok(out)
    }

    pub(super) async fn remove_links_for_ingredient(
        &self,
        db_tx: &DatabaseTransaction,
        ingredient_id: Uuid,
    ) -> ResultEngine<u64> {
        let result = recipe_ingredients::Entity::delete_many()
            .filter(recipe_ingredients::Column::IngredientId.eq(ingredient_id.to_string()))
            .exec(db_tx)
            .await?;
        Ok(result.rows_affected)
    }

    pub(super) async fn remove_links_for_recipe(
        &self,
        db_tx: &DatabaseTransaction,
        recipe_id: Uuid,
    ) -> ResultEngine<u64> {
        let result = recipe_ingredients::Entity::delete_many()
            .filter(recipe_ingredients::Column::RecipeId.eq(recipe_id.to_string()))
            .exec(db_tx)
            .await?;
        Ok(result.rows_affected)
    }
}
