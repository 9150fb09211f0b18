use std::sync::Arc;

use chrono::Utc;
use validator::Validate;

use crate::dto::ApiResponse;
use crate::models::visita::{fecha_completado_para, ActualizarEstadoVisita};
use crate::models::{NuevaVisita, Visita};
use crate::services::DashboardService;
use crate::store::SalesStore;
use crate::utils::errors::AppError;

pub struct VisitaController {
    store: Arc<dyn SalesStore>,
    dashboard: Arc<DashboardService>,
}

impl VisitaController {
    pub fn new(store: Arc<dyn SalesStore>, dashboard: Arc<DashboardService>) -> Self {
        Self { store, dashboard }
    }

    pub async fn list(&self) -> Result<ApiResponse<Vec<Visita>>, AppError> {
        let visitas = self.store.list_visitas().await?;
        Ok(ApiResponse::success(visitas))
    }

    pub async fn create(&self, request: NuevaVisita) -> Result<ApiResponse<Visita>, AppError> {
        request.validate()?;

        let visita = self.store.create_visita(request).await?;
        tracing::info!("✅ Visita {} registrada para vendedor {}", visita.id, visita.vendedor_id);

        self.dashboard.refresh_visitas().await;
        Ok(ApiResponse::success_with_message(
            visita,
            "Visita registrada exitosamente".to_string(),
        ))
    }

    /// Cambiar el estado; al completarla se fija `fecha_completado`
    pub async fn update_estado(
        &self,
        id: i64,
        request: ActualizarEstadoVisita,
    ) -> Result<ApiResponse<Visita>, AppError> {
        let fecha_completado = fecha_completado_para(request.estado, Utc::now());
        let visita = self
            .store
            .update_visita_estado(id, request.estado, fecha_completado)
            .await?;

        self.dashboard.refresh_visitas().await;
        Ok(ApiResponse::success(visita))
    }

    pub async fn delete(&self, id: i64) -> Result<ApiResponse<()>, AppError> {
        self.store.delete_visita(id).await?;
        tracing::info!("🗑️ Visita {} eliminada", id);

        self.dashboard.refresh_visitas().await;
        Ok(ApiResponse::message("Visita eliminada".to_string()))
    }
}
