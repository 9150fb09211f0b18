//! Almacén en memoria
//!
//! Mismo contrato que el almacén PostgreSQL, incluidas las notificaciones
//! de `vendedores` y `ubicaciones`. Respalda el modo desarrollo sin
//! `DATABASE_URL` y las pruebas.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{mpsc, RwLock};

use super::{
    LocationStore, SalesStore, StoreError, StoreResult, TABLA_UBICACIONES, TABLA_VENDEDORES,
};
use crate::models::{
    Cliente, EstadoPedido, EstadoVisita, NuevaUbicacion, NuevaVisita, NuevoPedido, Pedido,
    Ubicacion, Vendedor, Visita, VENDEDOR_DESCONOCIDO,
};
use crate::realtime::{ChangeEvent, ChangeFeed, ChangeKind, ChangeSubscription};
use crate::utils::validation::empty_to_none;

#[derive(Default)]
struct Tablas {
    vendedores: Vec<Vendedor>,
    ubicaciones: Vec<Ubicacion>,
    visitas: Vec<Visita>,
    pedidos: Vec<Pedido>,
    clientes: Vec<Cliente>,
    next_id: i64,
}

impl Tablas {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn nombre_vendedor(&self, vendedor_id: i64) -> String {
        self.vendedores
            .iter()
            .find(|v| v.id == vendedor_id)
            .map(|v| v.nombre.clone())
            .unwrap_or_else(|| VENDEDOR_DESCONOCIDO.to_string())
    }
}

#[derive(Default)]
pub struct MemoryStore {
    tablas: RwLock<Tablas>,
    subscribers: Mutex<Vec<(String, mpsc::UnboundedSender<ChangeEvent>)>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Crear el almacén con vendedores ya registrados
    pub fn with_vendedores(vendedores: Vec<Vendedor>) -> Self {
        let next_id = vendedores.iter().map(|v| v.id).max().unwrap_or(0);
        Self {
            tablas: RwLock::new(Tablas {
                vendedores,
                next_id,
                ..Default::default()
            }),
            subscribers: Mutex::new(Vec::new()),
        }
    }

    pub async fn add_cliente(&self, mut cliente: Cliente) -> Cliente {
        let mut tablas = self.tablas.write().await;
        if cliente.id == 0 {
            cliente.id = tablas.next_id();
        }
        tablas.clientes.push(cliente.clone());
        cliente
    }

    /// Historial de ubicaciones insertadas
    pub async fn ubicaciones(&self) -> Vec<Ubicacion> {
        self.tablas.read().await.ubicaciones.clone()
    }

    pub async fn vendedor(&self, id: i64) -> Option<Vendedor> {
        self.tablas
            .read()
            .await
            .vendedores
            .iter()
            .find(|v| v.id == id)
            .cloned()
    }

    fn notify<T: Serialize>(&self, table: &str, kind: ChangeKind, record: &T) {
        let event = ChangeEvent::new(table, kind, serde_json::to_value(record).ok());
        let mut subscribers = self
            .subscribers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        subscribers.retain(|(subscribed, tx)| {
            if subscribed != table {
                return true;
            }
            tx.send(event.clone()).is_ok()
        });
    }
}

#[async_trait]
impl LocationStore for MemoryStore {
    async fn insert_ubicacion(&self, nueva: NuevaUbicacion) -> StoreResult<Ubicacion> {
        let ubicacion = {
            let mut tablas = self.tablas.write().await;
            let ubicacion = Ubicacion {
                id: tablas.next_id(),
                vendedor_id: nueva.vendedor_id,
                latitud: nueva.latitud,
                longitud: nueva.longitud,
                precision: nueva.precision,
                fecha_registro: nueva.fecha_registro,
            };
            tablas.ubicaciones.push(ubicacion.clone());
            ubicacion
        };

        self.notify(TABLA_UBICACIONES, ChangeKind::Insert, &ubicacion);
        Ok(ubicacion)
    }

    async fn update_vendedor_posicion(
        &self,
        vendedor_id: i64,
        latitud: f64,
        longitud: f64,
        at: DateTime<Utc>,
    ) -> StoreResult<()> {
        let vendedor = {
            let mut tablas = self.tablas.write().await;
            let vendedor = tablas
                .vendedores
                .iter_mut()
                .find(|v| v.id == vendedor_id)
                .ok_or_else(|| StoreError::NotFound(format!("vendedor {}", vendedor_id)))?;
            vendedor.latitud = Some(latitud);
            vendedor.longitud = Some(longitud);
            vendedor.ultima_actualizacion = Some(at);
            vendedor.clone()
        };

        self.notify(TABLA_VENDEDORES, ChangeKind::Update, &vendedor);
        Ok(())
    }
}

#[async_trait]
impl SalesStore for MemoryStore {
    async fn list_vendedores(&self) -> StoreResult<Vec<Vendedor>> {
        let mut vendedores = self.tablas.read().await.vendedores.clone();
        vendedores.sort_by(|a, b| a.nombre.cmp(&b.nombre));
        Ok(vendedores)
    }

    async fn list_visitas(&self) -> StoreResult<Vec<Visita>> {
        let tablas = self.tablas.read().await;
        let mut visitas: Vec<Visita> = tablas
            .visitas
            .iter()
            .cloned()
            .map(|mut v| {
                v.nombre_vendedor = tablas.nombre_vendedor(v.vendedor_id);
                v
            })
            .collect();
        visitas.sort_by(|a, b| b.fecha_creacion.cmp(&a.fecha_creacion).then(b.id.cmp(&a.id)));
        Ok(visitas)
    }

    async fn create_visita(&self, nueva: NuevaVisita) -> StoreResult<Visita> {
        let mut tablas = self.tablas.write().await;
        let visita = Visita {
            id: tablas.next_id(),
            vendedor_id: nueva.vendedor_id,
            nombre_cliente: nueva.nombre_cliente.trim().to_string(),
            direccion: empty_to_none(nueva.direccion),
            notas: empty_to_none(nueva.notas),
            tipo_visita: nueva.tipo_visita.as_str().to_string(),
            estado: EstadoVisita::Pendiente.as_str().to_string(),
            fecha_creacion: Utc::now(),
            fecha_completado: None,
            nombre_vendedor: tablas.nombre_vendedor(nueva.vendedor_id),
        };
        tablas.visitas.push(visita.clone());
        Ok(visita)
    }

    async fn update_visita_estado(
        &self,
        id: i64,
        estado: EstadoVisita,
        fecha_completado: Option<DateTime<Utc>>,
    ) -> StoreResult<Visita> {
        let mut tablas = self.tablas.write().await;
        let visita = tablas
            .visitas
            .iter_mut()
            .find(|v| v.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("visita {}", id)))?;
        visita.estado = estado.as_str().to_string();
        if fecha_completado.is_some() {
            visita.fecha_completado = fecha_completado;
        }
        Ok(visita.clone())
    }

    async fn delete_visita(&self, id: i64) -> StoreResult<()> {
        let mut tablas = self.tablas.write().await;
        let before = tablas.visitas.len();
        tablas.visitas.retain(|v| v.id != id);
        if tablas.visitas.len() == before {
            return Err(StoreError::NotFound(format!("visita {}", id)));
        }
        Ok(())
    }

    async fn list_pedidos(&self) -> StoreResult<Vec<Pedido>> {
        let tablas = self.tablas.read().await;
        let mut pedidos: Vec<Pedido> = tablas
            .pedidos
            .iter()
            .cloned()
            .map(|mut p| {
                p.nombre_vendedor = tablas.nombre_vendedor(p.vendedor_id);
                p
            })
            .collect();
        pedidos.sort_by(|a, b| b.fecha_creacion.cmp(&a.fecha_creacion).then(b.id.cmp(&a.id)));
        Ok(pedidos)
    }

    async fn create_pedido(&self, nuevo: NuevoPedido) -> StoreResult<Pedido> {
        let mut tablas = self.tablas.write().await;
        let pedido = Pedido {
            id: tablas.next_id(),
            vendedor_id: nuevo.vendedor_id,
            nombre_cliente: nuevo.nombre_cliente.trim().to_string(),
            productos: empty_to_none(nuevo.productos.clone()),
            monto_total: nuevo.monto(),
            estado: EstadoPedido::Pendiente.as_str().to_string(),
            fecha_creacion: Utc::now(),
            nombre_vendedor: tablas.nombre_vendedor(nuevo.vendedor_id),
        };
        tablas.pedidos.push(pedido.clone());
        Ok(pedido)
    }

    async fn update_pedido_estado(&self, id: i64, estado: EstadoPedido) -> StoreResult<Pedido> {
        let mut tablas = self.tablas.write().await;
        let pedido = tablas
            .pedidos
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("pedido {}", id)))?;
        pedido.estado = estado.as_str().to_string();
        Ok(pedido.clone())
    }

    async fn delete_pedido(&self, id: i64) -> StoreResult<()> {
        let mut tablas = self.tablas.write().await;
        let before = tablas.pedidos.len();
        tablas.pedidos.retain(|p| p.id != id);
        if tablas.pedidos.len() == before {
            return Err(StoreError::NotFound(format!("pedido {}", id)));
        }
        Ok(())
    }

    async fn list_clientes(&self) -> StoreResult<Vec<Cliente>> {
        let tablas = self.tablas.read().await;
        let mut clientes: Vec<Cliente> = tablas
            .clientes
            .iter()
            .cloned()
            .map(|mut c| {
                c.nombre_vendedor = tablas.nombre_vendedor(c.vendedor_id);
                c
            })
            .collect();
        clientes.sort_by(|a, b| b.fecha_creacion.cmp(&a.fecha_creacion).then(b.id.cmp(&a.id)));
        Ok(clientes)
    }

    async fn delete_cliente(&self, id: i64) -> StoreResult<()> {
        let mut tablas = self.tablas.write().await;
        let before = tablas.clientes.len();
        tablas.clientes.retain(|c| c.id != id);
        if tablas.clientes.len() == before {
            return Err(StoreError::NotFound(format!("cliente {}", id)));
        }
        Ok(())
    }
}

#[async_trait]
impl ChangeFeed for MemoryStore {
    async fn subscribe(&self, table: &str) -> StoreResult<ChangeSubscription> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push((table.to_string(), tx));
        Ok(ChangeSubscription::new(table, rx))
    }
}
