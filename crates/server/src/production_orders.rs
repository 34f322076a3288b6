//! Production order API endpoints

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use api_types::production_order::{
    ProductionOrderListResponse, ProductionOrderNew, ProductionOrderView,
};
use engine::ProductionOrder;

use crate::{ServerError, server::ServerState, user};

fn production_order_view(order: ProductionOrder) -> ProductionOrderView {
    ProductionOrderView {
        id: order.id,
        recipe_id: order.recipe_id,
        batches: order.batches,
        note: order.note,
        created_at: order.created_at,
    }
}

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<ProductionOrderListResponse>, ServerError> {
    let production_orders = state
        .engine
        .list_production_orders(&user.username)
        .await?
        .into_iter()
        .map(production_order_view)
        .collect();

    Ok(Json(ProductionOrderListResponse { production_orders }))
}

pub async fn order_new(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<ProductionOrderNew>,
) -> Result<(StatusCode, Json<ProductionOrderView>), ServerError> {
    let mut cmd = engine::ProductionOrderNew::new(payload.recipe_id, payload.batches);
    cmd.note = payload.note;
    let order = state
        .engine
        .new_production_order(cmd, &user.username)
        .await?;

    Ok((StatusCode::CREATED, Json(production_order_view(order))))
}

pub async fn delete(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .delete_production_order(id, &user.username)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
