//! Almacén de tablas remoto
//!
//! Contratos que consumen el seguimiento de ubicación y el tablero,
//! con una implementación PostgreSQL y otra en memoria.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::models::{
    Cliente, EstadoPedido, EstadoVisita, NuevaUbicacion, NuevaVisita, NuevoPedido, Pedido,
    Ubicacion, Vendedor, Visita,
};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Nombres de tabla usados por las suscripciones
pub const TABLA_VENDEDORES: &str = "vendedores";
pub const TABLA_UBICACIONES: &str = "ubicaciones";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Escrituras del seguimiento de ubicación
#[async_trait]
pub trait LocationStore: Send + Sync {
    /// Insertar una fila en el historial de ubicaciones
    async fn insert_ubicacion(&self, nueva: NuevaUbicacion) -> StoreResult<Ubicacion>;

    /// Actualizar la última posición conocida de un vendedor
    async fn update_vendedor_posicion(
        &self,
        vendedor_id: i64,
        latitud: f64,
        longitud: f64,
        at: DateTime<Utc>,
    ) -> StoreResult<()>;
}

/// Lecturas y operaciones CRUD del tablero
#[async_trait]
pub trait SalesStore: Send + Sync {
    async fn list_vendedores(&self) -> StoreResult<Vec<Vendedor>>;

    async fn list_visitas(&self) -> StoreResult<Vec<Visita>>;
    async fn create_visita(&self, nueva: NuevaVisita) -> StoreResult<Visita>;
    async fn update_visita_estado(
        &self,
        id: i64,
        estado: EstadoVisita,
        fecha_completado: Option<DateTime<Utc>>,
    ) -> StoreResult<Visita>;
    async fn delete_visita(&self, id: i64) -> StoreResult<()>;

    async fn list_pedidos(&self) -> StoreResult<Vec<Pedido>>;
    async fn create_pedido(&self, nuevo: NuevoPedido) -> StoreResult<Pedido>;
    async fn update_pedido_estado(&self, id: i64, estado: EstadoPedido) -> StoreResult<Pedido>;
    async fn delete_pedido(&self, id: i64) -> StoreResult<()>;

    async fn list_clientes(&self) -> StoreResult<Vec<Cliente>>;
    async fn delete_cliente(&self, id: i64) -> StoreResult<()>;
}
