//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum.

use std::sync::Arc;

use anyhow::{anyhow, Result};

use crate::config::environment::EnvironmentConfig;
use crate::database::DatabaseConnection;
use crate::location::{GpsdSource, PushLocationSource, StaticPlatform};
use crate::realtime::{ChangeFeed, PgChangeFeed};
use crate::services::{DashboardService, LocationService};
use crate::store::{LocationStore, MemoryStore, PgStore, SalesStore};
use crate::tracking::TrackingSessionController;

#[derive(Clone)]
pub struct AppState {
    pub config: EnvironmentConfig,
    pub sales: Arc<dyn SalesStore>,
    pub dashboard: Arc<DashboardService>,
    pub tracking: Arc<TrackingSessionController>,
    pub foreground: Arc<PushLocationSource>,
    pub gpsd: Arc<GpsdSource>,
    pub ubicaciones: Arc<LocationService>,
}

/// Estado listo para servir junto con la fuente de notificaciones
pub struct AppParts {
    pub state: AppState,
    pub feed: Arc<dyn ChangeFeed>,
}

impl AppState {
    /// Ensamblar servicios sobre un almacén ya creado
    pub fn new(
        config: EnvironmentConfig,
        sales: Arc<dyn SalesStore>,
        locations: Arc<dyn LocationStore>,
    ) -> Self {
        let foreground = Arc::new(PushLocationSource::new());
        let gpsd = Arc::new(GpsdSource::new(
            config.gpsd_addr.clone(),
            config.gpsd_fix_timeout,
        ));

        let dashboard = Arc::new(DashboardService::new(sales.clone(), locations.clone()));
        let tracking = Arc::new(TrackingSessionController::new(
            locations.clone(),
            Arc::new(StaticPlatform::new(config.native_shell)),
            foreground.clone(),
            gpsd.clone(),
        ));
        let ubicaciones = Arc::new(LocationService::new(locations, dashboard.clone()));

        Self {
            config,
            sales,
            dashboard,
            tracking,
            foreground,
            gpsd,
            ubicaciones,
        }
    }

    /// Estado en memoria, sin base de datos
    pub fn in_memory(config: EnvironmentConfig, store: Arc<MemoryStore>) -> AppParts {
        let state = Self::new(config, store.clone(), store.clone());
        AppParts { state, feed: store }
    }
}

/// Elegir el almacén según la configuración
pub async fn build_state(config: EnvironmentConfig) -> Result<AppParts> {
    match config.database() {
        Some(db_config) => {
            let connection = DatabaseConnection::new(&db_config).await?;
            let pool = connection.pool().clone();
            let store = Arc::new(PgStore::new(pool.clone()));
            let feed = Arc::new(PgChangeFeed::new(pool));
            let state = AppState::new(config, store.clone(), store);
            Ok(AppParts { state, feed })
        }
        None if config.is_development() => {
            tracing::warn!("⚠️ DATABASE_URL no configurada, usando almacén en memoria");
            Ok(AppState::in_memory(config, Arc::new(MemoryStore::new())))
        }
        None => Err(anyhow!("DATABASE_URL no configurada")),
    }
}
