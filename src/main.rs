use std::sync::Arc;

use axum::extract::State;
use axum::{routing::get, Router};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

mod config;
mod database;
mod error;
mod handlers;
mod middleware;
mod services;
mod state;
mod verify;

use database::DatabaseManager;
use state::AppState;
use verify::RecaptchaVerifier;

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, RECAPTCHA_SECRET_KEY, etc.
    let _ = dotenvy::dotenv();

    // Initialize configuration (this loads the config singleton)
    let config = crate::config::config();

    tracing_subscriber::fmt::init();
    tracing::info!("Starting Potluck API in {:?} mode", config.environment);

    if config.verification.secret_key.is_none() {
        tracing::warn!("RECAPTCHA_SECRET_KEY not set; all mutating requests will be rejected");
    }

    let pool = DatabaseManager::connect()
        .await
        .unwrap_or_else(|e| panic!("failed to connect to database: {}", e));

    let verifier = Arc::new(RecaptchaVerifier::from_config(&config.verification));
    let state = AppState::new(pool, verifier);

    state
        .items
        .ensure_schema()
        .await
        .unwrap_or_else(|e| panic!("failed to prepare items table: {}", e));

    let app = app(state);

    // Allow tests or deployments to override port via env
    let port = std::env::var("POTLUCK_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    println!("🚀 Potluck API server listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}

fn app(state: AppState) -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        // Sign-up list API
        .merge(items_routes())
        // Global middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

fn items_routes() -> Router<AppState> {
    use handlers::items;

    Router::new().route(
        "/api/items",
        get(items::items_get)
            .post(items::items_post)
            .put(items::items_put)
            .delete(items::items_delete),
    )
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "name": "Potluck API",
        "version": version,
        "description": "Sign-up list backend - who's bringing what",
        "endpoints": {
            "home": "/ (public)",
            "health": "/health (public)",
            "items": "GET/POST/PUT/DELETE /api/items",
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match DatabaseManager::health_check(&state.pool).await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "status": "degraded",
                "timestamp": now,
                "error": "database unavailable",
                "database_error": e.to_string()
            })),
        ),
    }
}
