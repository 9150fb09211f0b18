//! Modelo de Visita
//!
//! Mapea la tabla `visitas` junto con el nombre del vendedor que la registró.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::utils::validation::validate_not_empty;

/// Estado de una visita
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EstadoVisita {
    Pendiente,
    Completada,
    Cancelada,
}

impl EstadoVisita {
    pub fn as_str(&self) -> &'static str {
        match self {
            EstadoVisita::Pendiente => "pendiente",
            EstadoVisita::Completada => "completada",
            EstadoVisita::Cancelada => "cancelada",
        }
    }
}

/// Tipo de visita
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TipoVisita {
    #[default]
    Visita,
    Seguimiento,
    Cobranza,
}

impl TipoVisita {
    pub fn as_str(&self) -> &'static str {
        match self {
            TipoVisita::Visita => "visita",
            TipoVisita::Seguimiento => "seguimiento",
            TipoVisita::Cobranza => "cobranza",
        }
    }
}

/// Visita con el nombre del vendedor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Visita {
    pub id: i64,
    pub vendedor_id: i64,
    pub nombre_cliente: String,
    pub direccion: Option<String>,
    pub notas: Option<String>,
    pub tipo_visita: String,
    pub estado: String,
    pub fecha_creacion: DateTime<Utc>,
    pub fecha_completado: Option<DateTime<Utc>>,
    pub nombre_vendedor: String,
}

/// Request para registrar una nueva visita
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NuevaVisita {
    #[validate(range(min = 1))]
    pub vendedor_id: i64,

    #[validate(length(max = 200), custom = "validate_not_empty")]
    pub nombre_cliente: String,

    pub direccion: Option<String>,
    pub notas: Option<String>,

    #[serde(default)]
    pub tipo_visita: TipoVisita,
}

/// Request para cambiar el estado de una visita
#[derive(Debug, Clone, Deserialize)]
pub struct ActualizarEstadoVisita {
    pub estado: EstadoVisita,
}

/// Fecha de completado que corresponde a un cambio de estado
pub fn fecha_completado_para(estado: EstadoVisita, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    match estado {
        EstadoVisita::Completada => Some(now),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tipo_visita_defaults_to_visita() {
        let request: NuevaVisita = serde_json::from_value(json!({
            "vendedor_id": 2,
            "nombre_cliente": "Hacienda San José"
        }))
        .unwrap();
        assert_eq!(request.tipo_visita, TipoVisita::Visita);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_blank_client_name_is_rejected() {
        let request: NuevaVisita = serde_json::from_value(json!({
            "vendedor_id": 2,
            "nombre_cliente": "  ",
            "tipo_visita": "cobranza"
        }))
        .unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_fecha_completado_only_when_completed() {
        let now = Utc::now();
        assert_eq!(fecha_completado_para(EstadoVisita::Completada, now), Some(now));
        assert_eq!(fecha_completado_para(EstadoVisita::Cancelada, now), None);
        assert_eq!(fecha_completado_para(EstadoVisita::Pendiente, now), None);
    }
}
