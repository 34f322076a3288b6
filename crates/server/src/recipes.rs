//! Recipe API endpoints

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use api_types::recipe::{
    RecipeCostView, RecipeDetailView, RecipeListResponse, RecipeNew, RecipeUpdate, RecipeView,
};
use engine::{Recipe, RecipeCost};

use crate::{ServerError, recipe_ingredients::recipe_ingredient_view, server::ServerState, user};

fn recipe_view(recipe: Recipe) -> RecipeView {
    RecipeView {
        id: recipe.id,
        name: recipe.name,
        description: recipe.description,
        method: recipe.method,
        yield_quantity: recipe.yield_quantity,
        yield_unit: recipe.yield_unit,
        markup: recipe.markup,
        created_at: recipe.created_at,
        updated_at: recipe.updated_at,
    }
}

fn cost_view(cost: RecipeCost) -> RecipeCostView {
    RecipeCostView {
        total_cost: cost.total_cost,
        cost_per_portion: cost.cost_per_portion,
        markup_factor: cost.markup_factor,
        suggested_sale_price: cost.suggested_sale_price,
    }
}

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<RecipeListResponse>, ServerError> {
    let recipes = state
        .engine
        .list_recipes(&user.username)
        .await?
        .into_iter()
        .map(recipe_view)
        .collect();

    Ok(Json(RecipeListResponse { recipes }))
}

pub async fn recipe_new(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<RecipeNew>,
) -> Result<(StatusCode, Json<RecipeView>), ServerError> {
    let mut cmd = engine::RecipeNew::new(payload.name)
        .method(payload.method)
        .yields(payload.yield_quantity, payload.yield_unit);
    cmd.description = payload.description;
    let recipe = state.engine.new_recipe(cmd, &user.username).await?;

    Ok((StatusCode::CREATED, Json(recipe_view(recipe))))
}

/// The recipe page: the recipe, its ingredient lines and the costing.
pub async fn detail(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RecipeDetailView>, ServerError> {
    let detail = state.engine.recipe_detail(id, &user.username).await?;

    Ok(Json(RecipeDetailView {
        recipe: recipe_view(detail.recipe),
        ingredients: detail
            .ingredients
            .into_iter()
            .map(recipe_ingredient_view)
            .collect(),
        cost: cost_view(detail.cost),
    }))
}

pub async fn cost(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RecipeCostView>, ServerError> {
    let cost = state.engine.recipe_cost(id, &user.username).await?;
    Ok(Json(cost_view(cost)))
}

pub async fn update(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<RecipeUpdate>,
) -> Result<Json<RecipeView>, ServerError> {
    let cmd = engine::RecipeUpdate {
        name: payload.name,
        description: payload.description,
        method: payload.method,
        yield_quantity: payload.yield_quantity,
        yield_unit: payload.yield_unit,
        markup: payload.markup,
    };
    let recipe = state.engine.update_recipe(id, cmd, &user.username).await?;

    Ok(Json(recipe_view(recipe)))
}

/// Deletes the recipe and its ingredient lines.
///
/// Answers `409 Conflict` while production orders still reference it.
pub async fn delete(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RecipeView>, ServerError> {
    let recipe = state.engine.delete_recipe(id, &user.username).await?;
    Ok(Json(recipe_view(recipe)))
}
