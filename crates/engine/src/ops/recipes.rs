use chrono::Utc;
use sea_orm::{ActiveValue, PaginatorTrait, QueryFilter, QueryOrder, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, Recipe, RecipeCost, RecipeDetail, RecipeNew, RecipeUpdate, ResultEngine,
    production_orders, recipes,
    util::{
        normalize_label, normalize_optional_text, normalize_required_name, validate_non_negative,
        validate_positive,
    },
};

use super::{Engine, access::require_identity, with_tx};

impl Engine {
    /// Creates a recipe owned by `user_id`. The markup starts unset.
    pub async fn new_recipe(&self, cmd: RecipeNew, user_id: &str) -> ResultEngine<Recipe> {
        require_identity(user_id)?;
        let name = normalize_required_name(&cmd.name, "recipe")?;
        let yield_quantity = validate_non_negative(cmd.yield_quantity, "yield")?;

        let recipe = Recipe::new(
            user_id.to_string(),
            name,
            normalize_optional_text(cmd.description.as_deref()),
            cmd.method,
            yield_quantity,
            normalize_label(&cmd.yield_unit),
            Utc::now(),
        );
        let model = recipes::ActiveModel::from(&recipe)
            .insert(&self.database)
            .await?;

        tracing::debug!(recipe_id = %recipe.id, "recipe created");
        Recipe::try_from(model)
    }

    /// Lists the recipes of `user_id`, newest first.
    pub async fn list_recipes(&self, user_id: &str) -> ResultEngine<Vec<Recipe>> {
        require_identity(user_id)?;
        recipes::Entity::find()
            .filter(recipes::Column::UserId.eq(user_id))
            .order_by_desc(recipes::Column::CreatedAt)
            .order_by_desc(recipes::Column::Id)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Recipe::try_from)
            .collect()
    }

    /// Returns a single recipe without its ingredient lines.
    pub async fn recipe(&self, recipe_id: Uuid, user_id: &str) -> ResultEngine<Recipe> {
        require_identity(user_id)?;
        with_tx!(self, |db_tx| {
            let model = self.require_recipe(&db_tx, user_id, recipe_id).await?;
            Recipe::try_from(model)
        })
    }

    /// Returns a recipe with its resolved ingredient lines and costing.
    pub async fn recipe_detail(
        &self,
        recipe_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<RecipeDetail> {
        require_identity(user_id)?;
        with_tx!(self, |db_tx| {
            let model = self.require_recipe(&db_tx, user_id, recipe_id).await?;
            let recipe = Recipe::try_from(model)?;
            let lines = self.resolve_lines(&db_tx, recipe_id, user_id).await?;
            Ok(RecipeDetail::new(recipe, lines))
        })
    }

    /// Computes the costing of a recipe from the current ingredient prices.
    pub async fn recipe_cost(&self, recipe_id: Uuid, user_id: &str) -> ResultEngine<RecipeCost> {
        self.recipe_detail(recipe_id, user_id)
            .await
            .map(|detail| detail.cost)
    }

    /// Applies a partial update and returns the stored result.
    ///
    /// `markup: Some(None)` clears the markup so costing falls back to the
    /// default factor. An empty update returns the record unchanged.
    pub async fn update_recipe(
        &self,
        recipe_id: Uuid,
        cmd: RecipeUpdate,
        user_id: &str,
    ) -> ResultEngine<Recipe> {
        require_identity(user_id)?;
        let name = cmd
            .name
            .as_deref()
            .map(|name| normalize_required_name(name, "recipe"))
            .transpose()?;
        let yield_quantity = cmd
            .yield_quantity
            .map(|value| validate_non_negative(value, "yield"))
            .transpose()?;
        let markup = match cmd.markup {
            Some(Some(value)) => Some(Some(validate_positive(value, "markup")?)),
            other => other,
        };

        with_tx!(self, |db_tx| {
            let model = self.require_recipe(&db_tx, user_id, recipe_id).await?;
            let model = if cmd.is_empty() {
                model
            } else {
                let mut active: recipes::ActiveModel = model.into();
                if let Some(name) = name {
                    active.name = ActiveValue::Set(name);
                }
                if let Some(description) = cmd.description.as_ref() {
                    active.description =
                        ActiveValue::Set(normalize_optional_text(description.as_deref()));
                }
                if let Some(method) = cmd.method.as_ref() {
                    active.method = ActiveValue::Set(method.clone());
                }
                if let Some(yield_quantity) = yield_quantity {
                    active.yield_quantity = ActiveValue::Set(yield_quantity);
                }
                if let Some(yield_unit) = cmd.yield_unit.as_deref() {
                    active.yield_unit = ActiveValue::Set(normalize_label(yield_unit));
                }
                if let Some(markup) = markup {
                    active.markup = ActiveValue::Set(markup);
                }
                active.updated_at = ActiveValue::Set(Utc::now());

                active.update(&db_tx).await?
            };
            Recipe::try_from(model)
        })
    }

    /// Deletes a recipe together with its ingredient links.
    ///
    /// Fails with [`EngineError::InUse`] while production orders reference
    /// the recipe; nothing is removed in that case.
    pub async fn delete_recipe(&self, recipe_id: Uuid, user_id: &str) -> ResultEngine<Recipe> {
        require_identity(user_id)?;
        with_tx!(self, |db_tx| {
            let model = self.require_recipe(&db_tx, user_id, recipe_id).await?;
            let recipe = Recipe::try_from(model)?;

            let orders = production_orders::Entity::find()
                .filter(production_orders::Column::RecipeId.eq(recipe_id.to_string()))
                .count(&db_tx)
                .await?;
            if orders > 0 {
                return Err(EngineError::InUse(format!(
                    "recipe '{}' is referenced by {orders} production order(s)",
                    recipe.name
                )));
            }

            let removed_links = self.remove_links_for_recipe(&db_tx, recipe_id).await?;
            recipes::Entity::delete_by_id(recipe_id.to_string())
                .exec(&db_tx)
                .await?;

            tracing::debug!(%recipe_id, removed_links, "recipe deleted");
            Ok(recipe)
        })
    }
}
