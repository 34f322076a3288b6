//! Statistics API endpoints

use api_types::stats::Statistic;
use axum::{Extension, Json, extract::State};

use crate::{ServerError, server::ServerState, user};

/// Handle requests for the user's inventory statistics
pub async fn get_stats(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<Statistic>, ServerError> {
    let stats = state.engine.inventory_statistics(&user.username).await?;

    Ok(Json(Statistic {
        ingredient_count: stats.ingredient_count,
        recipe_count: stats.recipe_count,
        inventory_value: stats.inventory_value,
    }))
}
