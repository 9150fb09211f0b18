use serde::Serialize;
use thiserror::Error;

use crate::location::LocationError;
use crate::store::StoreError;

/// Mensajes que ve el usuario
pub const MSG_SIN_PERMISOS: &str =
    "No se pudo obtener la ubicacion. Por favor, verifique los permisos de ubicacion.";
pub const MSG_ERROR_REGISTRO: &str = "Error al registrar la ubicacion";
pub const MSG_NO_SOPORTADA: &str = "La geolocalizacion no esta soportada en este navegador.";

/// Errores de la sesión de seguimiento
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "tipo", content = "detalle", rename_all = "snake_case")]
pub enum TrackingError {
    #[error("Validación: {0}")]
    Validation(String),

    #[error("Permiso de ubicación denegado: {0}")]
    Permission(String),

    #[error("Error de adquisición: {0}")]
    Acquisition(String),

    #[error("Error de persistencia: {0}")]
    Persistence(String),

    #[error("Error cancelando el seguimiento: {0}")]
    Cancellation(String),
}

impl TrackingError {
    pub fn user_message(&self) -> &str {
        match self {
            TrackingError::Validation(message) => message,
            TrackingError::Permission(_) | TrackingError::Acquisition(_) => MSG_SIN_PERMISOS,
            TrackingError::Persistence(_) => MSG_ERROR_REGISTRO,
            TrackingError::Cancellation(_) => "Error al detener el seguimiento",
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            TrackingError::Validation(_) => "TRACKING_VALIDATION",
            TrackingError::Permission(_) => "TRACKING_PERMISSION",
            TrackingError::Acquisition(_) => "TRACKING_ACQUISITION",
            TrackingError::Persistence(_) => "TRACKING_PERSISTENCE",
            TrackingError::Cancellation(_) => "TRACKING_CANCELLATION",
        }
    }
}

impl From<LocationError> for TrackingError {
    fn from(error: LocationError) -> Self {
        match error {
            LocationError::PermissionDenied(_) => TrackingError::Permission(error.to_string()),
            LocationError::InvalidPosition(_) => TrackingError::Validation(error.to_string()),
            LocationError::UnknownWatch(_) => TrackingError::Cancellation(error.to_string()),
            _ => TrackingError::Acquisition(error.to_string()),
        }
    }
}

impl From<StoreError> for TrackingError {
    fn from(error: StoreError) -> Self {
        TrackingError::Persistence(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_error_mapping() {
        assert!(matches!(
            TrackingError::from(LocationError::PermissionDenied("x".into())),
            TrackingError::Permission(_)
        ));
        assert!(matches!(
            TrackingError::from(LocationError::Timeout),
            TrackingError::Acquisition(_)
        ));
        assert!(matches!(
            TrackingError::from(StoreError::Database("caída".into())),
            TrackingError::Persistence(_)
        ));
    }

    #[test]
    fn test_user_messages() {
        assert_eq!(
            TrackingError::Persistence("x".into()).user_message(),
            MSG_ERROR_REGISTRO
        );
        assert_eq!(
            TrackingError::Permission("x".into()).user_message(),
            MSG_SIN_PERMISOS
        );
        assert_eq!(
            TrackingError::Validation("Falta el vendedor".into()).user_message(),
            "Falta el vendedor"
        );
    }
}
