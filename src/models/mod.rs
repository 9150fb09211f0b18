//! Modelos del sistema
//!
//! Este módulo contiene los modelos de datos que mapean a las tablas
//! remotas: vendedores, ubicaciones, visitas, pedidos y clientes.

pub mod cliente;
pub mod pedido;
pub mod ubicacion;
pub mod vendedor;
pub mod visita;

pub use cliente::Cliente;
pub use pedido::{EstadoPedido, NuevoPedido, Pedido};
pub use ubicacion::{NuevaUbicacion, Ubicacion, UbicacionRecord};
pub use vendedor::Vendedor;
pub use visita::{EstadoVisita, NuevaVisita, TipoVisita, Visita};

/// Nombre mostrado cuando una fila no tiene vendedor asociado
pub const VENDEDOR_DESCONOCIDO: &str = "Desconocido";
