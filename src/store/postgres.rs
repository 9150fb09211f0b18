//! Almacén PostgreSQL
//!
//! Implementa los contratos del almacén sobre los repositorios sqlx.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::{LocationStore, SalesStore, StoreResult};
use crate::models::{
    Cliente, EstadoPedido, EstadoVisita, NuevaUbicacion, NuevaVisita, NuevoPedido, Pedido,
    Ubicacion, Vendedor, Visita,
};
use crate::repositories::{
    ClienteRepository, PedidoRepository, UbicacionRepository, VendedorRepository,
    VisitaRepository,
};

pub struct PgStore {
    vendedores: VendedorRepository,
    ubicaciones: UbicacionRepository,
    visitas: VisitaRepository,
    pedidos: PedidoRepository,
    clientes: ClienteRepository,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            vendedores: VendedorRepository::new(pool.clone()),
            ubicaciones: UbicacionRepository::new(pool.clone()),
            visitas: VisitaRepository::new(pool.clone()),
            pedidos: PedidoRepository::new(pool.clone()),
            clientes: ClienteRepository::new(pool),
        }
    }
}

#[async_trait]
impl LocationStore for PgStore {
    async fn insert_ubicacion(&self, nueva: NuevaUbicacion) -> StoreResult<Ubicacion> {
        self.ubicaciones.create(nueva).await
    }

    async fn update_vendedor_posicion(
        &self,
        vendedor_id: i64,
        latitud: f64,
        longitud: f64,
        at: DateTime<Utc>,
    ) -> StoreResult<()> {
        self.vendedores
            .update_posicion(vendedor_id, latitud, longitud, at)
            .await
    }
}

#[async_trait]
impl SalesStore for PgStore {
    async fn list_vendedores(&self) -> StoreResult<Vec<Vendedor>> {
        self.vendedores.find_all().await
    }

    async fn list_visitas(&self) -> StoreResult<Vec<Visita>> {
        self.visitas.find_all().await
    }

    async fn create_visita(&self, nueva: NuevaVisita) -> StoreResult<Visita> {
        self.visitas.create(nueva).await
    }

    async fn update_visita_estado(
        &self,
        id: i64,
        estado: EstadoVisita,
        fecha_completado: Option<DateTime<Utc>>,
    ) -> StoreResult<Visita> {
        self.visitas.update_estado(id, estado, fecha_completado).await
    }

    async fn delete_visita(&self, id: i64) -> StoreResult<()> {
        self.visitas.delete(id).await
    }

    async fn list_pedidos(&self) -> StoreResult<Vec<Pedido>> {
        self.pedidos.find_all().await
    }

    async fn create_pedido(&self, nuevo: NuevoPedido) -> StoreResult<Pedido> {
        self.pedidos.create(nuevo).await
    }

    async fn update_pedido_estado(&self, id: i64, estado: EstadoPedido) -> StoreResult<Pedido> {
        self.pedidos.update_estado(id, estado).await
    }

    async fn delete_pedido(&self, id: i64) -> StoreResult<()> {
        self.pedidos.delete(id).await
    }

    async fn list_clientes(&self) -> StoreResult<Vec<Cliente>> {
        self.clientes.find_all().await
    }

    async fn delete_cliente(&self, id: i64) -> StoreResult<()> {
        self.clientes.delete(id).await
    }
}
