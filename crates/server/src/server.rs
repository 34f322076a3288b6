use axum::{
    Router,
    extract::{Request, State},
    middleware::{self, Next},
    response::Response,
    routing::get,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Basic},
    typed_header::TypedHeaderRejection,
};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

use std::sync::Arc;

use crate::{
    ServerError, ingredients, production_orders, recipe_ingredients, recipes, statistics, user,
};
use engine::{Engine, EngineError};

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    pub db: DatabaseConnection,
}

impl ServerState {
    pub fn new(engine: Engine, db: DatabaseConnection) -> Self {
        Self {
            engine: Arc::new(engine),
            db,
        }
    }
}

/// Resolves the acting user from Basic credentials.
///
/// A missing or malformed header is treated like wrong credentials. A failed
/// lookup is a server error, not a rejection.
async fn auth(
    auth_header: Result<TypedHeader<Authorization<Basic>>, TypedHeaderRejection>,
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    let Ok(TypedHeader(auth_header)) = auth_header else {
        return Err(EngineError::Unauthenticated.into());
    };
    if auth_header.username().is_empty() || auth_header.password().is_empty() {
        return Err(EngineError::Unauthenticated.into());
    }

    let user: Option<user::Model> = user::Entity::find()
        .filter(user::Column::Username.eq(auth_header.username()))
        .filter(user::Column::Password.eq(auth_header.password()))
        .one(&state.db)
        .await
        .map_err(EngineError::from)?;

    let Some(user) = user else {
        return Err(EngineError::Unauthenticated.into());
    };

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

pub fn router(state: ServerState) -> Router {
    Router::new()
        .route(
            "/ingredients",
            get(ingredients::list).post(ingredients::ingredient_new),
        )
        .route(
            "/ingredients/{id}",
            get(ingredients::get)
                .patch(ingredients::update)
                .delete(ingredients::delete),
        )
        .route("/recipes", get(recipes::list).post(recipes::recipe_new))
        .route(
            "/recipes/{id}",
            get(recipes::detail)
                .patch(recipes::update)
                .delete(recipes::delete),
        )
        .route("/recipes/{id}/cost", get(recipes::cost))
        .route(
            "/recipes/{id}/ingredients",
            get(recipe_ingredients::list).post(recipe_ingredients::add),
        )
        .route(
            "/recipes/{id}/ingredients/{link_id}",
            axum::routing::delete(recipe_ingredients::remove),
        )
        .route(
            "/production_orders",
            get(production_orders::list).post(production_orders::order_new),
        )
        .route(
            "/production_orders/{id}",
            axum::routing::delete(production_orders::delete),
        )
        .route("/stats", get(statistics::get_stats))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth))
        .with_state(state)
}

pub async fn run_with_listener(
    engine: Engine,
    db: DatabaseConnection,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState::new(engine, db);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
