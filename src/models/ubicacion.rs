//! Modelo de Ubicación
//!
//! Historial de posiciones reportadas (`ubicaciones`). Solo inserciones.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Fila de la tabla ubicaciones
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Ubicacion {
    pub id: i64,
    pub vendedor_id: i64,
    pub latitud: f64,
    pub longitud: f64,
    pub precision: Option<f64>,
    pub fecha_registro: DateTime<Utc>,
}

/// Datos para insertar una nueva ubicación
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NuevaUbicacion {
    pub vendedor_id: i64,
    pub latitud: f64,
    pub longitud: f64,
    pub precision: Option<f64>,
    pub fecha_registro: DateTime<Utc>,
}

/// Forma del registro recibido en notificaciones de `ubicaciones`.
///
/// Las columnas pueden faltar según el emisor, por eso todo es opcional
/// salvo el vendedor y las coordenadas.
#[derive(Debug, Clone, Deserialize)]
pub struct UbicacionRecord {
    pub vendedor_id: i64,
    pub latitud: f64,
    pub longitud: f64,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub fecha_registro: Option<DateTime<Utc>>,
}

// Columnas `timestamp` sin zona llegan sin offset; se asumen UTC.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|value| {
        DateTime::parse_from_rfc3339(&value)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
            .or_else(|| {
                chrono::NaiveDateTime::parse_from_str(&value, "%Y-%m-%dT%H:%M:%S%.f")
                    .ok()
                    .map(|naive| naive.and_utc())
            })
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_parses_with_and_without_offset() {
        let with_offset: UbicacionRecord = serde_json::from_value(json!({
            "id": 10,
            "vendedor_id": 3,
            "latitud": 12.1,
            "longitud": -86.2,
            "fecha_registro": "2025-03-01T10:00:00+00:00"
        }))
        .unwrap();
        assert!(with_offset.fecha_registro.is_some());

        let naive: UbicacionRecord = serde_json::from_value(json!({
            "vendedor_id": 3,
            "latitud": 12.1,
            "longitud": -86.2,
            "fecha_registro": "2025-03-01T10:00:00.123456"
        }))
        .unwrap();
        assert!(naive.fecha_registro.is_some());

        let missing: UbicacionRecord = serde_json::from_value(json!({
            "vendedor_id": 3,
            "latitud": 12.1,
            "longitud": -86.2
        }))
        .unwrap();
        assert!(missing.fecha_registro.is_none());
    }
}
