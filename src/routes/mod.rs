pub mod cliente_routes;
pub mod dashboard_routes;
pub mod pedido_routes;
pub mod tracking_routes;
pub mod ubicacion_routes;
pub mod visita_routes;

use axum::{response::Json, routing::get, Router};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;

use crate::middleware::cors_layer;
use crate::state::AppState;

/// Router completo de la API
pub fn create_app_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_origins);

    let api = Router::new()
        .merge(dashboard_routes::create_dashboard_router())
        .nest("/visitas", visita_routes::create_visita_router())
        .nest("/pedidos", pedido_routes::create_pedido_router())
        .nest("/clientes", cliente_routes::create_cliente_router())
        .nest("/tracking", tracking_routes::create_tracking_router())
        .nest("/ubicacion", ubicacion_routes::create_ubicacion_router());

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "vendedores-tracking",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}
