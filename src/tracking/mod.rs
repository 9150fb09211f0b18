//! Seguimiento continuo de ubicación
//!
//! Sesión ligada a un vendedor, compuerta de escritura cada 30 segundos
//! y errores propios de la sesión.

pub mod errors;
pub mod session;
pub mod throttle;

pub use errors::TrackingError;
pub use session::{SessionState, SessionStatus, TrackingSessionController};
pub use throttle::{ThrottleGate, TRACKING_INTERVAL_MS};
