use axum::{
    extract::{Path, State},
    routing::{delete, get, put},
    Json, Router,
};

use crate::controllers::VisitaController;
use crate::dto::ApiResponse;
use crate::models::visita::ActualizarEstadoVisita;
use crate::models::{NuevaVisita, Visita};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_visita_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_visitas).post(create_visita))
        .route("/:id/estado", put(update_estado))
        .route("/:id", delete(delete_visita))
}

fn controller(state: &AppState) -> VisitaController {
    VisitaController::new(state.sales.clone(), state.dashboard.clone())
}

async fn list_visitas(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Visita>>>, AppError> {
    Ok(Json(controller(&state).list().await?))
}

async fn create_visita(
    State(state): State<AppState>,
    Json(request): Json<NuevaVisita>,
) -> Result<Json<ApiResponse<Visita>>, AppError> {
    Ok(Json(controller(&state).create(request).await?))
}

async fn update_estado(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<ActualizarEstadoVisita>,
) -> Result<Json<ApiResponse<Visita>>, AppError> {
    Ok(Json(controller(&state).update_estado(id, request).await?))
}

async fn delete_visita(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    Ok(Json(controller(&state).delete(id).await?))
}
