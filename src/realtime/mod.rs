//! Notificaciones de cambios por tabla
//!
//! Suscripciones a inserciones/actualizaciones/borrados del almacén remoto.

pub mod change_feed;
pub mod pg_listener;

pub use change_feed::{channel_name, ChangeEvent, ChangeFeed, ChangeKind, ChangeSubscription};
pub use pg_listener::PgChangeFeed;
