use std::sync::Arc;

use validator::Validate;

use crate::dto::ApiResponse;
use crate::models::pedido::ActualizarEstadoPedido;
use crate::models::{NuevoPedido, Pedido};
use crate::services::DashboardService;
use crate::store::SalesStore;
use crate::utils::errors::AppError;

pub struct PedidoController {
    store: Arc<dyn SalesStore>,
    dashboard: Arc<DashboardService>,
}

impl PedidoController {
    pub fn new(store: Arc<dyn SalesStore>, dashboard: Arc<DashboardService>) -> Self {
        Self { store, dashboard }
    }

    pub async fn list(&self) -> Result<ApiResponse<Vec<Pedido>>, AppError> {
        let pedidos = self.store.list_pedidos().await?;
        Ok(ApiResponse::success(pedidos))
    }

    pub async fn create(&self, request: NuevoPedido) -> Result<ApiResponse<Pedido>, AppError> {
        request.validate()?;

        let pedido = self.store.create_pedido(request).await?;
        tracing::info!(
            "✅ Pedido {} registrado por {} ({})",
            pedido.id,
            pedido.vendedor_id,
            pedido.monto_total
        );

        self.dashboard.refresh_pedidos().await;
        Ok(ApiResponse::success_with_message(
            pedido,
            "Pedido registrado exitosamente".to_string(),
        ))
    }

    pub async fn update_estado(
        &self,
        id: i64,
        request: ActualizarEstadoPedido,
    ) -> Result<ApiResponse<Pedido>, AppError> {
        let pedido = self.store.update_pedido_estado(id, request.estado).await?;

        self.dashboard.refresh_pedidos().await;
        Ok(ApiResponse::success(pedido))
    }

    pub async fn delete(&self, id: i64) -> Result<ApiResponse<()>, AppError> {
        self.store.delete_pedido(id).await?;
        tracing::info!("🗑️ Pedido {} eliminado", id);

        self.dashboard.refresh_pedidos().await;
        Ok(ApiResponse::message("Pedido eliminado".to_string()))
    }
}
