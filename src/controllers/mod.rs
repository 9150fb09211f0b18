pub mod cliente_controller;
pub mod pedido_controller;
pub mod visita_controller;

pub use cliente_controller::ClienteController;
pub use pedido_controller::PedidoController;
pub use visita_controller::VisitaController;
