use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use uuid::Uuid;

use super::errors::LocationError;

/// Posición entregada por una fuente, todavía sin vendedor asociado
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionFix {
    pub latitud: f64,
    pub longitud: f64,
    /// Radio de error horizontal en metros
    pub precision: Option<f64>,
    /// Momento de captura; algunas fuentes no lo informan
    pub timestamp: Option<DateTime<Utc>>,
}

/// Evento emitido por un seguimiento continuo
#[derive(Debug, Clone, PartialEq)]
pub enum LocationEvent {
    Sample(PositionFix),
    Error(LocationError),
}

/// Modo de adquisición de una sesión
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Foreground,
    Background,
}

/// Identificador opaco de un seguimiento activo
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WatchHandle(String);

impl WatchHandle {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for WatchHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for WatchHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Destino de los eventos de un seguimiento.
///
/// Cuando el receptor desaparece, `send` devuelve `false` y la fuente
/// debe dejar de producir.
#[derive(Debug, Clone)]
pub struct LocationSink {
    tx: mpsc::UnboundedSender<LocationEvent>,
}

impl LocationSink {
    pub fn new(tx: mpsc::UnboundedSender<LocationEvent>) -> Self {
        Self { tx }
    }

    /// Crear un sink junto con su receptor
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<LocationEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }

    pub fn send(&self, event: LocationEvent) -> bool {
        self.tx.send(event).is_ok()
    }
}
