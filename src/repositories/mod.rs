//! Repositorios PostgreSQL
//!
//! Un repositorio por tabla, con las consultas SQL que usa `PgStore`.

pub mod cliente_repository;
pub mod pedido_repository;
pub mod ubicacion_repository;
pub mod vendedor_repository;
pub mod visita_repository;

pub use cliente_repository::ClienteRepository;
pub use pedido_repository::PedidoRepository;
pub use ubicacion_repository::UbicacionRepository;
pub use vendedor_repository::VendedorRepository;
pub use visita_repository::VisitaRepository;
