//! Registro puntual de ubicación
//!
//! Una lectura y una escritura, sin compuerta y sin tocar la sesión de
//! seguimiento. Escribe directamente la fila del vendedor.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use super::dashboard_service::DashboardService;
use crate::location::{Geolocator, LocationError};
use crate::store::{LocationStore, StoreError};
use crate::tracking::errors::{MSG_ERROR_REGISTRO, MSG_NO_SOPORTADA, MSG_SIN_PERMISOS};
use crate::tracking::TrackingError;
use crate::utils::errors::AppError;

pub const MSG_REGISTRADA: &str = "Ubicacion registrada exitosamente";

#[derive(Debug, Clone, Serialize)]
pub struct RegistroUbicacion {
    pub vendedor_id: i64,
    pub latitud: f64,
    pub longitud: f64,
    pub precision: Option<f64>,
    pub registrada_en: DateTime<Utc>,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RegistroError {
    #[error("Vendedor inválido: {0}")]
    VendedorInvalido(i64),

    #[error("Geolocalización no soportada")]
    Unsupported,

    #[error("No se pudo obtener la posición: {0}")]
    Acquisition(LocationError),

    #[error("No se pudo guardar la posición: {0}")]
    Persistence(StoreError),
}

impl RegistroError {
    pub fn user_message(&self) -> &'static str {
        match self {
            RegistroError::VendedorInvalido(_) => "Debe seleccionar un vendedor",
            RegistroError::Unsupported => MSG_NO_SOPORTADA,
            RegistroError::Acquisition(_) => MSG_SIN_PERMISOS,
            RegistroError::Persistence(_) => MSG_ERROR_REGISTRO,
        }
    }
}

impl From<RegistroError> for AppError {
    fn from(error: RegistroError) -> Self {
        match error {
            RegistroError::VendedorInvalido(_) => {
                AppError::BadRequest(error.user_message().to_string())
            }
            RegistroError::Unsupported => {
                AppError::ServiceUnavailable(error.user_message().to_string())
            }
            RegistroError::Acquisition(e) => AppError::Tracking(TrackingError::from(e)),
            RegistroError::Persistence(StoreError::NotFound(msg)) => AppError::NotFound(msg),
            RegistroError::Persistence(e) => AppError::Tracking(TrackingError::from(e)),
        }
    }
}

pub struct LocationService {
    locations: Arc<dyn LocationStore>,
    dashboard: Arc<DashboardService>,
}

impl LocationService {
    pub fn new(locations: Arc<dyn LocationStore>, dashboard: Arc<DashboardService>) -> Self {
        Self {
            locations,
            dashboard,
        }
    }

    /// Leer la posición actual y guardarla como última posición del vendedor
    pub async fn register_current_location(
        &self,
        vendedor_id: i64,
        geolocator: &dyn Geolocator,
    ) -> Result<RegistroUbicacion, RegistroError> {
        if vendedor_id <= 0 {
            return Err(RegistroError::VendedorInvalido(vendedor_id));
        }

        let fix = match geolocator.current_position().await {
            Ok(fix) => fix,
            Err(LocationError::Unsupported) => {
                tracing::warn!("⚠️ Geolocalización no soportada");
                return Err(RegistroError::Unsupported);
            }
            Err(e) => {
                tracing::error!("❌ Error obteniendo la ubicación: {}", e);
                return Err(RegistroError::Acquisition(e));
            }
        };

        let registrada_en = Utc::now();
        self.locations
            .update_vendedor_posicion(vendedor_id, fix.latitud, fix.longitud, registrada_en)
            .await
            .map_err(|e| {
                tracing::error!("❌ Error actualizando la ubicación: {}", e);
                RegistroError::Persistence(e)
            })?;

        self.dashboard.refresh_vendedores().await;
        tracing::info!(
            "📍 Ubicación registrada para vendedor {}: ({}, {})",
            vendedor_id,
            fix.latitud,
            fix.longitud
        );

        Ok(RegistroUbicacion {
            vendedor_id,
            latitud: fix.latitud,
            longitud: fix.longitud,
            precision: fix.precision,
            registrada_en,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::{PositionErrorReport, PositionReport, ReportedPosition};
    use crate::models::Vendedor;
    use crate::store::MemoryStore;

    fn service() -> (LocationService, Arc<MemoryStore>, Arc<DashboardService>) {
        let store = Arc::new(MemoryStore::with_vendedores(vec![Vendedor {
            id: 3,
            nombre: "Luis Paz".to_string(),
            telefono: None,
            correo: None,
            latitud: None,
            longitud: None,
            estado: "activo".to_string(),
            ultima_actualizacion: None,
            fecha_creacion: Utc::now(),
        }]));
        let dashboard = Arc::new(DashboardService::new(store.clone(), store.clone()));
        (
            LocationService::new(store.clone(), dashboard.clone()),
            store,
            dashboard,
        )
    }

    #[tokio::test]
    async fn test_register_updates_vendedor_and_dashboard() {
        let (service, store, dashboard) = service();
        let geo = ReportedPosition(Some(PositionReport::fix(-33.45, -70.66)));

        let registro = service.register_current_location(3, &geo).await.unwrap();
        assert_eq!(registro.latitud, -33.45);

        let vendedor = store.vendedor(3).await.unwrap();
        assert_eq!(vendedor.longitud, Some(-70.66));
        assert!(vendedor.ultima_actualizacion.is_some());
        assert!(store.ubicaciones().await.is_empty());

        let snapshot = dashboard.snapshot().await;
        assert_eq!(snapshot.vendedores[0].latitud, Some(-33.45));
    }

    #[tokio::test]
    async fn test_register_distinct_messages() {
        let (service, _store, _dashboard) = service();

        let unsupported = service
            .register_current_location(3, &ReportedPosition(None))
            .await
            .unwrap_err();
        assert_eq!(unsupported.user_message(), MSG_NO_SOPORTADA);

        let denied = ReportedPosition(Some(PositionReport::Error {
            error: PositionErrorReport {
                code: 1,
                message: None,
            },
        }));
        let denied = service.register_current_location(3, &denied).await.unwrap_err();
        assert_eq!(denied.user_message(), MSG_SIN_PERMISOS);

        let missing = ReportedPosition(Some(PositionReport::fix(1.0, 1.0)));
        let missing = service.register_current_location(99, &missing).await.unwrap_err();
        assert_eq!(missing.user_message(), MSG_ERROR_REGISTRO);
    }

    #[tokio::test]
    async fn test_register_rejects_invalid_vendedor() {
        let (service, _store, _dashboard) = service();
        let geo = ReportedPosition(Some(PositionReport::fix(1.0, 1.0)));

        let result = service.register_current_location(0, &geo).await;
        assert_eq!(result.unwrap_err(), RegistroError::VendedorInvalido(0));
    }
}
