//! Modelo de Pedido
//!
//! Mapea la tabla `pedidos`. El monto se guarda como NUMERIC.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationError};

use crate::utils::validation::validate_not_empty;

/// Estado de un pedido
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EstadoPedido {
    Pendiente,
    Entregado,
    Cancelado,
}

impl EstadoPedido {
    pub fn as_str(&self) -> &'static str {
        match self {
            EstadoPedido::Pendiente => "pendiente",
            EstadoPedido::Entregado => "entregado",
            EstadoPedido::Cancelado => "cancelado",
        }
    }
}

/// Pedido con el nombre del vendedor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Pedido {
    pub id: i64,
    pub vendedor_id: i64,
    pub nombre_cliente: String,
    pub productos: Option<String>,
    pub monto_total: Decimal,
    pub estado: String,
    pub fecha_creacion: DateTime<Utc>,
    pub nombre_vendedor: String,
}

/// Request para registrar un nuevo pedido
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NuevoPedido {
    #[validate(range(min = 1))]
    pub vendedor_id: i64,

    #[validate(length(max = 200), custom = "validate_not_empty")]
    pub nombre_cliente: String,

    pub productos: Option<String>,

    #[validate(custom = "validate_monto")]
    pub monto_total: Option<Decimal>,
}

impl NuevoPedido {
    /// Monto a guardar: sin monto se registra 0
    pub fn monto(&self) -> Decimal {
        self.monto_total.unwrap_or(Decimal::ZERO)
    }
}

/// Request para cambiar el estado de un pedido
#[derive(Debug, Clone, Deserialize)]
pub struct ActualizarEstadoPedido {
    pub estado: EstadoPedido,
}

fn validate_monto(monto: &Decimal) -> Result<(), ValidationError> {
    if monto.is_sign_negative() {
        return Err(ValidationError::new("monto_negativo"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_monto_defaults_to_zero() {
        let request: NuevoPedido = serde_json::from_value(json!({
            "vendedor_id": 1,
            "nombre_cliente": "Agropecuaria Matagalpa"
        }))
        .unwrap();
        assert_eq!(request.monto(), Decimal::ZERO);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_negative_monto_is_rejected() {
        let request: NuevoPedido = serde_json::from_value(json!({
            "vendedor_id": 1,
            "nombre_cliente": "Agropecuaria Matagalpa",
            "monto_total": -15.5
        }))
        .unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_estado_wire_names() {
        let estado: EstadoPedido = serde_json::from_value(json!("entregado")).unwrap();
        assert_eq!(estado, EstadoPedido::Entregado);
        assert_eq!(estado.as_str(), "entregado");
    }
}
