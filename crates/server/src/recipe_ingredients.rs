//! Endpoints managing the ingredient lines of a recipe.

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use api_types::recipe::{RecipeIngredientListResponse, RecipeIngredientNew, RecipeIngredientView};
use engine::RecipeIngredient;

use crate::{ServerError, ingredients::ingredient_view, server::ServerState, user};

pub(crate) fn recipe_ingredient_view(line: RecipeIngredient) -> RecipeIngredientView {
    RecipeIngredientView {
        id: line.id,
        recipe_id: line.recipe_id,
        quantity: line.quantity,
        line_cost: line.line_cost(),
        ingredient: ingredient_view(line.ingredient),
    }
}

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(recipe_id): Path<Uuid>,
) -> Result<Json<RecipeIngredientListResponse>, ServerError> {
    let ingredients = state
        .engine
        .list_recipe_ingredients(recipe_id, &user.username)
        .await?
        .into_iter()
        .map(recipe_ingredient_view)
        .collect();

    Ok(Json(RecipeIngredientListResponse { ingredients }))
}

pub async fn add(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(recipe_id): Path<Uuid>,
    Json(payload): Json<RecipeIngredientNew>,
) -> Result<(StatusCode, Json<RecipeIngredientView>), ServerError> {
    let cmd = engine::RecipeIngredientNew {
        ingredient_id: payload.ingredient_id,
        quantity: payload.quantity,
    };
    let line = state
        .engine
        .add_recipe_ingredient(recipe_id, cmd, &user.username)
        .await?;

    Ok((StatusCode::CREATED, Json(recipe_ingredient_view(line))))
}

pub async fn remove(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path((recipe_id, link_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .remove_recipe_ingredient(recipe_id, link_id, &user.username)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
