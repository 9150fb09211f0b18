//! Servicio del tablero
//!
//! Mantiene una foto reconciliada de vendedores, visitas, pedidos y
//! clientes. Se alimenta de dos caminos que compiten entre sí: el sondeo
//! periódico y las notificaciones de cambios.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures::future::join_all;
use rust_decimal::Decimal;
use serde::Serialize;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::models::{Cliente, Pedido, UbicacionRecord, Vendedor, Visita};
use crate::realtime::{ChangeEvent, ChangeFeed, ChangeKind};
use crate::store::{LocationStore, SalesStore, TABLA_UBICACIONES, TABLA_VENDEDORES};

/// Estadísticas de la barra lateral
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardStats {
    pub total_vendedores: usize,
    pub vendedores_activos: usize,
    pub total_visitas: usize,
    pub total_ventas: Decimal,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DashboardSnapshot {
    pub vendedores: Vec<Vendedor>,
    pub visitas: Vec<Visita>,
    pub pedidos: Vec<Pedido>,
    pub clientes: Vec<Cliente>,
    pub actualizado_en: Option<DateTime<Utc>>,
}

impl DashboardSnapshot {
    pub fn stats(&self) -> DashboardStats {
        DashboardStats {
            total_vendedores: self.vendedores.len(),
            vendedores_activos: self.vendedores.iter().filter(|v| v.is_activo()).count(),
            total_visitas: self.visitas.len(),
            total_ventas: self.pedidos.iter().map(|p| p.monto_total).sum(),
        }
    }
}

/// Combinar un sondeo con la foto previa sin retroceder posiciones.
///
/// Si la foto conoce una posición más reciente que la del sondeo para el
/// mismo vendedor, se conserva la de la foto.
pub fn reconcile_vendedores(previous: &[Vendedor], polled: Vec<Vendedor>) -> Vec<Vendedor> {
    polled
        .into_iter()
        .map(|mut vendedor| {
            let conocido = previous.iter().find(|p| p.id == vendedor.id);
            if let Some(Vendedor {
                latitud: Some(latitud),
                longitud: Some(longitud),
                ultima_actualizacion: Some(at),
                ..
            }) = conocido
            {
                if vendedor.ultima_actualizacion.map_or(true, |sondeada| sondeada < *at) {
                    vendedor.apply_position(*latitud, *longitud, *at);
                }
            }
            vendedor
        })
        .collect()
}

pub struct DashboardService {
    store: Arc<dyn SalesStore>,
    locations: Arc<dyn LocationStore>,
    snapshot: RwLock<DashboardSnapshot>,
}

impl DashboardService {
    pub fn new(store: Arc<dyn SalesStore>, locations: Arc<dyn LocationStore>) -> Self {
        Self {
            store,
            locations,
            snapshot: RwLock::new(DashboardSnapshot::default()),
        }
    }

    pub async fn snapshot(&self) -> DashboardSnapshot {
        self.snapshot.read().await.clone()
    }

    pub async fn stats(&self) -> DashboardStats {
        self.snapshot.read().await.stats()
    }

    /// Consultar las cuatro tablas en paralelo.
    ///
    /// Una consulta fallida deja la parte correspondiente de la foto intacta.
    pub async fn refresh_all(&self) {
        tokio::join!(
            self.refresh_vendedores(),
            self.refresh_visitas(),
            self.refresh_pedidos(),
            self.refresh_clientes(),
        );
    }

    pub async fn refresh_vendedores(&self) {
        match self.store.list_vendedores().await {
            Ok(polled) => {
                let mut snapshot = self.snapshot.write().await;
                snapshot.vendedores = reconcile_vendedores(&snapshot.vendedores, polled);
                snapshot.actualizado_en = Some(Utc::now());
            }
            Err(e) => tracing::error!("❌ Error obteniendo vendedores: {}", e),
        }
    }

    pub async fn refresh_visitas(&self) {
        match self.store.list_visitas().await {
            Ok(visitas) => {
                let mut snapshot = self.snapshot.write().await;
                snapshot.visitas = visitas;
                snapshot.actualizado_en = Some(Utc::now());
            }
            Err(e) => tracing::error!("❌ Error obteniendo visitas: {}", e),
        }
    }

    pub async fn refresh_pedidos(&self) {
        match self.store.list_pedidos().await {
            Ok(pedidos) => {
                let mut snapshot = self.snapshot.write().await;
                snapshot.pedidos = pedidos;
                snapshot.actualizado_en = Some(Utc::now());
            }
            Err(e) => tracing::error!("❌ Error obteniendo pedidos: {}", e),
        }
    }

    pub async fn refresh_clientes(&self) {
        match self.store.list_clientes().await {
            Ok(clientes) => {
                let mut snapshot = self.snapshot.write().await;
                snapshot.clientes = clientes;
                snapshot.actualizado_en = Some(Utc::now());
            }
            Err(e) => tracing::error!("❌ Error obteniendo clientes: {}", e),
        }
    }

    /// Reaccionar a una notificación de cambio
    pub async fn handle_change(&self, event: ChangeEvent) {
        match (event.table.as_str(), event.kind) {
            (TABLA_VENDEDORES, _) => self.refresh_vendedores().await,
            (TABLA_UBICACIONES, ChangeKind::Insert) => self.apply_ubicacion(event).await,
            (table, kind) => tracing::debug!("Cambio ignorado: {} {:?}", table, kind),
        }
    }

    async fn apply_ubicacion(&self, event: ChangeEvent) {
        let Some(record) = event.record else {
            tracing::warn!("⚠️ Notificación de ubicación sin registro");
            return;
        };
        let ubicacion: UbicacionRecord = match serde_json::from_value(record) {
            Ok(ubicacion) => ubicacion,
            Err(e) => {
                tracing::warn!("⚠️ Notificación de ubicación inválida: {}", e);
                return;
            }
        };
        let at = ubicacion.fecha_registro.unwrap_or_else(Utc::now);

        {
            let snapshot = self.snapshot.read().await;
            let vigente = snapshot
                .vendedores
                .iter()
                .find(|v| v.id == ubicacion.vendedor_id);
            if let Some(vendedor) = vigente {
                if vendedor.is_newer_than(at) {
                    tracing::debug!(
                        "Ubicación atrasada para vendedor {} ignorada",
                        ubicacion.vendedor_id
                    );
                    return;
                }
            }
        }

        if let Err(e) = self
            .locations
            .update_vendedor_posicion(
                ubicacion.vendedor_id,
                ubicacion.latitud,
                ubicacion.longitud,
                at,
            )
            .await
        {
            tracing::error!(
                "❌ Error actualizando posición del vendedor {}: {}",
                ubicacion.vendedor_id,
                e
            );
        }

        {
            let mut snapshot = self.snapshot.write().await;
            if let Some(vendedor) = snapshot
                .vendedores
                .iter_mut()
                .find(|v| v.id == ubicacion.vendedor_id)
            {
                vendedor.apply_position(ubicacion.latitud, ubicacion.longitud, at);
            }
        }

        self.refresh_vendedores().await;
    }

    /// Lanzar el sondeo periódico y las suscripciones
    pub async fn spawn_runtime(
        self: &Arc<Self>,
        feed: Arc<dyn ChangeFeed>,
        poll_interval: Duration,
    ) -> DashboardRuntime {
        let mut tasks = Vec::new();

        let service = Arc::clone(self);
        tasks.push(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(poll_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                service.refresh_all().await;
            }
        }));

        let tables = [TABLA_VENDEDORES, TABLA_UBICACIONES];
        let subscriptions = join_all(tables.iter().map(|table| feed.subscribe(table))).await;

        for (table, subscription) in tables.into_iter().zip(subscriptions) {
            match subscription {
                Ok(mut subscription) => {
                    let service = Arc::clone(self);
                    tasks.push(tokio::spawn(async move {
                        while let Some(event) = subscription.recv().await {
                            service.handle_change(event).await;
                        }
                        tracing::warn!("⚠️ Suscripción a {} terminada", subscription.table());
                    }));
                    tracing::info!("🔔 Suscrito a cambios de {}", table);
                }
                Err(e) => tracing::error!("❌ No se pudo suscribir a {}: {}", table, e),
            }
        }

        DashboardRuntime { tasks }
    }
}

/// Tareas en segundo plano del tablero; se cancelan al cerrar
pub struct DashboardRuntime {
    tasks: Vec<JoinHandle<()>>,
}

impl DashboardRuntime {
    pub fn shutdown(mut self) {
        self.abort_all();
        tracing::info!("🛑 Sondeo y suscripciones del tablero cancelados");
    }

    fn abort_all(&mut self) {
        for task in self.tasks.drain(..) {
            task.abort();
        }
    }
}

impl Drop for DashboardRuntime {
    fn drop(&mut self) {
        self.abort_all();
    }
}
