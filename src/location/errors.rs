use thiserror::Error;

/// Errores de adquisición de posición
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LocationError {
    #[error("geolocalización no soportada en esta plataforma")]
    Unsupported,

    #[error("permiso de ubicación denegado: {0}")]
    PermissionDenied(String),

    #[error("posición no disponible: {0}")]
    Unavailable(String),

    #[error("tiempo de espera agotado obteniendo la posición")]
    Timeout,

    #[error("posición inválida: {0}")]
    InvalidPosition(String),

    #[error("no hay seguimiento en primer plano activo")]
    NoActiveWatch,

    #[error("watcher desconocido: {0}")]
    UnknownWatch(String),
}

impl LocationError {
    /// Códigos de error de la API de geolocalización del navegador
    pub fn from_code(code: u16, message: Option<String>) -> Self {
        let message = message.unwrap_or_default();
        match code {
            1 => LocationError::PermissionDenied(message),
            3 => LocationError::Timeout,
            _ => LocationError::Unavailable(message),
        }
    }
}
