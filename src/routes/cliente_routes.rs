use axum::{
    extract::{Path, State},
    routing::{delete, get},
    Json, Router,
};

use crate::controllers::ClienteController;
use crate::dto::ApiResponse;
use crate::models::Cliente;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_cliente_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_clientes))
        .route("/:id", delete(delete_cliente))
}

async fn list_clientes(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Cliente>>>, AppError> {
    let controller = ClienteController::new(state.sales.clone(), state.dashboard.clone());
    Ok(Json(controller.list().await?))
}

async fn delete_cliente(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = ClienteController::new(state.sales.clone(), state.dashboard.clone());
    Ok(Json(controller.delete(id).await?))
}
