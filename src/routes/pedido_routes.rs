use axum::{
    extract::{Path, State},
    routing::{delete, get, put},
    Json, Router,
};

use crate::controllers::PedidoController;
use crate::dto::ApiResponse;
use crate::models::pedido::ActualizarEstadoPedido;
use crate::models::{NuevoPedido, Pedido};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_pedido_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_pedidos).post(create_pedido))
        .route("/:id/estado", put(update_estado))
        .route("/:id", delete(delete_pedido))
}

fn controller(state: &AppState) -> PedidoController {
    PedidoController::new(state.sales.clone(), state.dashboard.clone())
}

async fn list_pedidos(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Pedido>>>, AppError> {
    Ok(Json(controller(&state).list().await?))
}

async fn create_pedido(
    State(state): State<AppState>,
    Json(request): Json<NuevoPedido>,
) -> Result<Json<ApiResponse<Pedido>>, AppError> {
    Ok(Json(controller(&state).create(request).await?))
}

async fn update_estado(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<ActualizarEstadoPedido>,
) -> Result<Json<ApiResponse<Pedido>>, AppError> {
    Ok(Json(controller(&state).update_estado(id, request).await?))
}

async fn delete_pedido(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    Ok(Json(controller(&state).delete(id).await?))
}
