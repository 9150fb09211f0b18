use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};

use crate::dto::{ApiResponse, DashboardResponse};
use crate::models::Vendedor;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_dashboard_router() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(get_dashboard))
        .route("/dashboard/refresh", post(refresh_dashboard))
        .route("/vendedores", get(list_vendedores))
}

async fn get_dashboard(State(state): State<AppState>) -> Json<ApiResponse<DashboardResponse>> {
    let snapshot = state.dashboard.snapshot().await;
    Json(ApiResponse::success(snapshot.into()))
}

async fn refresh_dashboard(State(state): State<AppState>) -> Json<ApiResponse<DashboardResponse>> {
    state.dashboard.refresh_all().await;
    let snapshot = state.dashboard.snapshot().await;
    Json(ApiResponse::success(snapshot.into()))
}

async fn list_vendedores(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Vendedor>>>, AppError> {
    let vendedores = state.sales.list_vendedores().await?;
    Ok(Json(ApiResponse::success(vendedores)))
}
