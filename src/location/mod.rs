//! Fuentes de ubicación
//!
//! Adquisición puntual y continua de la posición del dispositivo:
//! en primer plano (posiciones enviadas por el cliente, como un
//! `watchPosition` del navegador) o en segundo plano (servicio nativo
//! `gpsd`).

pub mod errors;
pub mod foreground;
pub mod gpsd;
pub mod models;
pub mod source;

pub use errors::LocationError;
pub use foreground::{PositionErrorReport, PositionReport, PushLocationSource, ReportedPosition};
pub use gpsd::GpsdSource;
pub use models::{LocationEvent, LocationSink, PositionFix, SourceKind, WatchHandle};
pub use source::{Geolocator, LocationSource, PlatformInfo, StaticPlatform};
