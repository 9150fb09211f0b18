use std::sync::Arc;

use crate::dto::ApiResponse;
use crate::models::Cliente;
use crate::services::DashboardService;
use crate::store::SalesStore;
use crate::utils::errors::AppError;

pub struct ClienteController {
    store: Arc<dyn SalesStore>,
    dashboard: Arc<DashboardService>,
}

impl ClienteController {
    pub fn new(store: Arc<dyn SalesStore>, dashboard: Arc<DashboardService>) -> Self {
        Self { store, dashboard }
    }

    pub async fn list(&self) -> Result<ApiResponse<Vec<Cliente>>, AppError> {
        let clientes = self.store.list_clientes().await?;
        Ok(ApiResponse::success(clientes))
    }

    pub async fn delete(&self, id: i64) -> Result<ApiResponse<()>, AppError> {
        self.store.delete_cliente(id).await?;
        tracing::info!("🗑️ Cliente {} eliminado", id);

        self.dashboard.refresh_clientes().await;
        Ok(ApiResponse::message("Cliente eliminado".to_string()))
    }
}
