use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};

use crate::dto::{ApiResponse, StartTrackingRequest};
use crate::location::{LocationError, PositionReport};
use crate::state::AppState;
use crate::tracking::SessionStatus;
use crate::utils::errors::AppError;

pub fn create_tracking_router() -> Router<AppState> {
    Router::new()
        .route("/start", post(start_tracking))
        .route("/stop", post(stop_tracking))
        .route("/status", get(tracking_status))
        .route("/posicion", post(report_position))
}

async fn start_tracking(
    State(state): State<AppState>,
    Json(request): Json<StartTrackingRequest>,
) -> Result<Json<ApiResponse<SessionStatus>>, AppError> {
    let status = state.tracking.start(request.vendedor_id).await?;
    Ok(Json(ApiResponse::success_with_message(
        status,
        "Seguimiento iniciado".to_string(),
    )))
}

async fn stop_tracking(State(state): State<AppState>) -> Json<ApiResponse<SessionStatus>> {
    let status = state.tracking.stop().await;
    Json(ApiResponse::success_with_message(
        status,
        "Seguimiento detenido".to_string(),
    ))
}

async fn tracking_status(State(state): State<AppState>) -> Json<ApiResponse<SessionStatus>> {
    Json(ApiResponse::success(state.tracking.status().await))
}

/// Lectura del `watchPosition` del cliente
async fn report_position(
    State(state): State<AppState>,
    Json(report): Json<PositionReport>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    state
        .foreground
        .deliver(report)
        .await
        .map_err(|e| match e {
            LocationError::NoActiveWatch => AppError::Conflict(e.to_string()),
            LocationError::InvalidPosition(_) => AppError::BadRequest(e.to_string()),
            other => AppError::ServiceUnavailable(other.to_string()),
        })?;

    Ok(Json(ApiResponse::message("Posición recibida".to_string())))
}
