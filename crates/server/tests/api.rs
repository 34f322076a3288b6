use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use base64::Engine as _;
use http_body_util::BodyExt;
use migration::MigratorTrait;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};
use serde_json::{Value, json};
use tower::ServiceExt;

use server::types::{
    ingredient::IngredientView,
    recipe::{RecipeCostView, RecipeDetailView, RecipeIngredientView, RecipeView},
};

async fn app() -> Router {
    app_with_db().await.0
}

async fn app_with_db() -> (Router, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let backend = db.get_database_backend();
    for (username, password) in [("alice", "wonderland"), ("bob", "builder")] {
        db.execute(Statement::from_sql_and_values(
            backend,
            "INSERT INTO users (username, password) VALUES (?, ?)",
            vec![username.into(), password.into()],
        ))
        .await
        .unwrap();
    }
    let engine = engine::Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    let router = server::router(server::ServerState::new(engine, db.clone()));
    (router, db)
}

fn basic(username: &str, password: &str) -> String {
    let secret = format!("{username}:{password}");
    format!(
        "Basic {}",
        base64::prelude::BASE64_STANDARD.encode(secret)
    )
}

fn alice() -> String {
    basic("alice", "wonderland")
}

fn bob() -> String {
    basic("bob", "builder")
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    auth: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(auth) = auth {
        request = request.header(header::AUTHORIZATION, auth);
    }
    let request = match body {
        Some(body) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn create_flour(app: &Router, auth: &str) -> IngredientView {
    let (status, body) = send(
        app,
        "POST",
        "/ingredients",
        Some(auth),
        Some(json!({
            "name": "Flour",
            "category": "Dry goods",
            "stock_quantity": 10,
            "stock_unit": "kg",
            "last_purchase_price": "2.00"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    serde_json::from_value(body).unwrap()
}

async fn create_bread(app: &Router, auth: &str) -> RecipeView {
    let (status, body) = send(
        app,
        "POST",
        "/recipes",
        Some(auth),
        Some(json!({
            "name": "Bread",
            "method": "Mix, proof, bake.",
            "yield_quantity": 5,
            "yield_unit": "portions"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    serde_json::from_value(body).unwrap()
}

#[tokio::test]
async fn requests_without_valid_credentials_are_rejected() {
    let app = app().await;

    let (status, _) = send(&app, "GET", "/ingredients", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let wrong = basic("alice", "looking-glass");
    let (status, _) = send(&app, "GET", "/ingredients", Some(&wrong), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let partial = basic("ali", "wonderland");
    let (status, _) = send(&app, "GET", "/ingredients", Some(&partial), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, "GET", "/ingredients", Some(&alice()), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn credential_lookup_failure_is_a_server_error() {
    let (app, db) = app_with_db().await;
    db.execute_unprepared("DROP TABLE users").await.unwrap();

    let (status, body) = send(&app, "GET", "/ingredients", Some(&alice()), None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "internal server error");
}

#[tokio::test]
async fn ingredient_lifecycle() {
    let app = app().await;
    let flour = create_flour(&app, &alice()).await;
    assert_eq!(flour.last_purchase_price, 2.0);
    assert_eq!(flour.stock_value, 20.0);

    let (status, body) = send(&app, "GET", "/ingredients", Some(&alice()), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ingredients"].as_array().unwrap().len(), 1);

    let uri = format!("/ingredients/{}", flour.id);
    let (status, body) = send(
        &app,
        "PATCH",
        &uri,
        Some(&alice()),
        Some(json!({ "stock_quantity": "12.5" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["stock_quantity"], 12.5);
    assert_eq!(body["name"], "Flour");

    let (status, body) = send(&app, "DELETE", &uri, Some(&alice()), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], flour.id.to_string());

    let (status, _) = send(&app, "GET", &uri, Some(&alice()), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn blank_names_are_unprocessable() {
    let app = app().await;
    let (status, body) = send(
        &app,
        "POST",
        "/ingredients",
        Some(&alice()),
        Some(json!({ "name": "  " })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("name"));
}

#[tokio::test]
async fn other_users_records_are_not_found() {
    let app = app().await;
    let flour = create_flour(&app, &alice()).await;
    let bread = create_bread(&app, &alice()).await;

    let uri = format!("/ingredients/{}", flour.id);
    let (status, _) = send(&app, "GET", &uri, Some(&bob()), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(
        &app,
        "PATCH",
        &uri,
        Some(&bob()),
        Some(json!({ "name": "Mine now" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, "DELETE", &uri, Some(&bob()), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        "GET",
        &format!("/recipes/{}/cost", bread.id),
        Some(&bob()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, "GET", "/recipes", Some(&bob()), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["recipes"].as_array().unwrap().is_empty());

    let (status, body) = send(&app, "GET", &uri, Some(&alice()), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Flour");
}

#[tokio::test]
async fn recipe_costing_end_to_end() {
    let app = app().await;
    let flour = create_flour(&app, &alice()).await;
    let bread = create_bread(&app, &alice()).await;
    assert_eq!(bread.markup, None);

    let (status, body) = send(
        &app,
        "POST",
        &format!("/recipes/{}/ingredients", bread.id),
        Some(&alice()),
        Some(json!({ "ingredient_id": flour.id, "quantity": 2 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let line: RecipeIngredientView = serde_json::from_value(body).unwrap();
    assert_eq!(line.line_cost, 4.0);

    let (status, body) = send(
        &app,
        "GET",
        &format!("/recipes/{}/cost", bread.id),
        Some(&alice()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let cost: RecipeCostView = serde_json::from_value(body).unwrap();
    assert!((cost.total_cost - 4.0).abs() < 1e-9);
    assert!((cost.cost_per_portion - 0.8).abs() < 1e-9);
    assert_eq!(cost.markup_factor, 3.0);
    assert!((cost.suggested_sale_price - 2.4).abs() < 1e-9);

    let (status, body) = send(
        &app,
        "PATCH",
        &format!("/recipes/{}", bread.id),
        Some(&alice()),
        Some(json!({ "markup": 2 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["markup"], 2.0);

    let (status, body) = send(
        &app,
        "GET",
        &format!("/recipes/{}", bread.id),
        Some(&alice()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let detail: RecipeDetailView = serde_json::from_value(body).unwrap();
    assert_eq!(detail.ingredients.len(), 1);
    assert_eq!(detail.ingredients[0].ingredient.name, "Flour");
    assert_eq!(detail.cost.markup_factor, 2.0);

    let (status, body) = send(
        &app,
        "PATCH",
        &format!("/recipes/{}", bread.id),
        Some(&alice()),
        Some(json!({ "markup": null })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["markup"], Value::Null);

    let (status, _) = send(
        &app,
        "PATCH",
        &format!("/recipes/{}", bread.id),
        Some(&alice()),
        Some(json!({ "markup": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn adding_a_line_requires_ingredient_and_quantity() {
    let app = app().await;
    let flour = create_flour(&app, &alice()).await;
    let bread = create_bread(&app, &alice()).await;
    let uri = format!("/recipes/{}/ingredients", bread.id);

    let (status, body) = send(
        &app,
        "POST",
        &uri,
        Some(&alice()),
        Some(json!({ "ingredient_id": flour.id })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("quantity"));

    let (status, _) = send(
        &app,
        "POST",
        &uri,
        Some(&alice()),
        Some(json!({ "quantity": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, body) = send(&app, "GET", &uri, Some(&alice()), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["ingredients"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn removing_a_line() {
    let app = app().await;
    let flour = create_flour(&app, &alice()).await;
    let bread = create_bread(&app, &alice()).await;
    let uri = format!("/recipes/{}/ingredients", bread.id);

    let (_, body) = send(
        &app,
        "POST",
        &uri,
        Some(&alice()),
        Some(json!({ "ingredient_id": flour.id, "quantity": 1.5 })),
    )
    .await;
    let line: RecipeIngredientView = serde_json::from_value(body).unwrap();

    let line_uri = format!("{uri}/{}", line.id);
    let (status, _) = send(&app, "DELETE", &line_uri, Some(&alice()), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, "DELETE", &line_uri, Some(&alice()), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn recipe_in_production_cannot_be_deleted() {
    let app = app().await;
    let bread = create_bread(&app, &alice()).await;

    let (status, body) = send(
        &app,
        "POST",
        "/production_orders",
        Some(&alice()),
        Some(json!({ "recipe_id": bread.id, "batches": 2 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let order_id = body["id"].as_str().unwrap().to_string();

    let recipe_uri = format!("/recipes/{}", bread.id);
    let (status, _) = send(&app, "DELETE", &recipe_uri, Some(&alice()), None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/production_orders/{order_id}"),
        Some(&alice()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, "DELETE", &recipe_uri, Some(&alice()), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn stats_are_per_user() {
    let app = app().await;
    create_flour(&app, &alice()).await;
    create_bread(&app, &alice()).await;

    let (status, body) = send(&app, "GET", "/stats", Some(&alice()), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ingredient_count"], 1);
    assert_eq!(body["recipe_count"], 1);
    assert_eq!(body["inventory_value"], 20.0);

    let (status, body) = send(&app, "GET", "/stats", Some(&bob()), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ingredient_count"], 0);
}
