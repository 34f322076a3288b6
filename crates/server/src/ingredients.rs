//! Ingredient API endpoints

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use api_types::ingredient::{
    IngredientListResponse, IngredientNew, IngredientUpdate, IngredientView,
};
use engine::Ingredient;

use crate::{ServerError, server::ServerState, user};

pub(crate) fn ingredient_view(ingredient: Ingredient) -> IngredientView {
    IngredientView {
        id: ingredient.id,
        stock_value: ingredient.stock_value(),
        name: ingredient.name,
        category: ingredient.category,
        stock_quantity: ingredient.stock_quantity,
        stock_unit: ingredient.stock_unit,
        last_purchase_price: ingredient.last_purchase_price,
        created_at: ingredient.created_at,
        updated_at: ingredient.updated_at,
    }
}

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<IngredientListResponse>, ServerError> {
    let ingredients = state
        .engine
        .list_ingredients(&user.username)
        .await?
        .into_iter()
        .map(ingredient_view)
        .collect();

    Ok(Json(IngredientListResponse { ingredients }))
}

pub async fn ingredient_new(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<IngredientNew>,
) -> Result<(StatusCode, Json<IngredientView>), ServerError> {
    let cmd = engine::IngredientNew::new(payload.name)
        .category(payload.category)
        .stock(payload.stock_quantity, payload.stock_unit)
        .last_purchase_price(payload.last_purchase_price);
    let ingredient = state.engine.new_ingredient(cmd, &user.username).await?;

    Ok((StatusCode::CREATED, Json(ingredient_view(ingredient))))
}

pub async fn get(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<IngredientView>, ServerError> {
    let ingredient = state.engine.ingredient(id, &user.username).await?;
    Ok(Json(ingredient_view(ingredient)))
}

pub async fn update(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<IngredientUpdate>,
) -> Result<Json<IngredientView>, ServerError> {
    let cmd = engine::IngredientUpdate {
        name: payload.name,
        category: payload.category,
        stock_quantity: payload.stock_quantity,
        stock_unit: payload.stock_unit,
        last_purchase_price: payload.last_purchase_price,
    };
    let ingredient = state
        .engine
        .update_ingredient(id, cmd, &user.username)
        .await?;

    Ok(Json(ingredient_view(ingredient)))
}

/// Deletes the ingredient and every recipe line that used it.
pub async fn delete(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<IngredientView>, ServerError> {
    let ingredient = state.engine.delete_ingredient(id, &user.username).await?;
    Ok(Json(ingredient_view(ingredient)))
}
