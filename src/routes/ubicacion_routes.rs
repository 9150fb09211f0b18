use axum::{extract::State, routing::post, Json, Router};

use crate::dto::{ApiResponse, RegistrarUbicacionRequest};
use crate::location::{Geolocator, ReportedPosition};
use crate::services::{RegistroUbicacion, MSG_REGISTRADA};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_ubicacion_router() -> Router<AppState> {
    Router::new().route("/registrar", post(registrar_ubicacion))
}

/// Registro puntual de la posición actual de un vendedor.
///
/// Dentro del shell nativo, sin posición del cliente, se lee de gpsd.
async fn registrar_ubicacion(
    State(state): State<AppState>,
    Json(request): Json<RegistrarUbicacionRequest>,
) -> Result<Json<ApiResponse<RegistroUbicacion>>, AppError> {
    let reported;
    let geolocator: &dyn Geolocator = match request.posicion {
        None if state.config.native_shell => state.gpsd.as_ref(),
        posicion => {
            reported = ReportedPosition(posicion);
            &reported
        }
    };

    let registro = state
        .ubicaciones
        .register_current_location(request.vendedor_id, geolocator)
        .await?;

    Ok(Json(ApiResponse::success_with_message(
        registro,
        MSG_REGISTRADA.to_string(),
    )))
}
