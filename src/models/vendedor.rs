//! Modelo de Vendedor
//!
//! Mapea la tabla `vendedores`. La última posición conocida solo la
//! modifican el registro puntual de ubicación y la reconciliación de
//! notificaciones de `ubicaciones`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Estado que cuenta como vendedor activo en las estadísticas
pub const ESTADO_ACTIVO: &str = "activo";

/// Vendedor principal - mapea a la tabla vendedores
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Vendedor {
    pub id: i64,
    pub nombre: String,
    pub telefono: Option<String>,
    pub correo: Option<String>,
    pub latitud: Option<f64>,
    pub longitud: Option<f64>,
    pub estado: String,
    pub ultima_actualizacion: Option<DateTime<Utc>>,
    pub fecha_creacion: DateTime<Utc>,
}

impl Vendedor {
    pub fn is_activo(&self) -> bool {
        self.estado == ESTADO_ACTIVO
    }

    /// Copiar una posición si es más reciente que la conocida.
    ///
    /// Devuelve `true` cuando la posición cambió.
    pub fn apply_position(&mut self, latitud: f64, longitud: f64, at: DateTime<Utc>) -> bool {
        if self.is_newer_than(at) {
            return false;
        }
        self.latitud = Some(latitud);
        self.longitud = Some(longitud);
        self.ultima_actualizacion = Some(at);
        true
    }

    /// `true` si la posición conocida es estrictamente posterior a `at`
    pub fn is_newer_than(&self, at: DateTime<Utc>) -> bool {
        matches!(self.ultima_actualizacion, Some(current) if current > at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn vendedor() -> Vendedor {
        Vendedor {
            id: 1,
            nombre: "Ana Rivas".to_string(),
            telefono: None,
            correo: None,
            latitud: None,
            longitud: None,
            estado: "activo".to_string(),
            ultima_actualizacion: None,
            fecha_creacion: Utc::now(),
        }
    }

    #[test]
    fn test_apply_position_keeps_newest() {
        let mut v = vendedor();
        let now = Utc::now();

        assert!(v.apply_position(12.13, -86.25, now));
        assert!(!v.apply_position(11.0, -85.0, now - Duration::seconds(10)));
        assert_eq!(v.latitud, Some(12.13));

        assert!(v.apply_position(12.20, -86.30, now + Duration::seconds(10)));
        assert_eq!(v.longitud, Some(-86.30));
    }

    #[test]
    fn test_is_activo() {
        let mut v = vendedor();
        assert!(v.is_activo());
        v.estado = "inactivo".to_string();
        assert!(!v.is_activo());
    }
}
