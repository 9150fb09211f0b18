//! Modelo de Cliente
//!
//! Mapea la tabla `clientes` con los datos de la finca registrados
//! por el vendedor.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Cliente con el nombre del vendedor que lo registró
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Cliente {
    pub id: i64,
    pub vendedor_id: i64,
    pub nombre: String,
    pub direccion: Option<String>,
    pub telefono: Option<String>,
    pub latitud: f64,
    pub longitud: f64,
    pub notas: Option<String>,
    pub fecha_creacion: DateTime<Utc>,
    pub tipo_animal: Option<String>,
    pub cantidad_animales: Option<i32>,
    pub administracion: Option<String>,
    pub nombre_vendedor: String,
}
