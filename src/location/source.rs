use async_trait::async_trait;

use super::errors::LocationError;
use super::models::{LocationSink, PositionFix, WatchHandle};

/// Seguimiento continuo de posición.
///
/// `start` registra el sink y devuelve un identificador; `stop` cancela
/// ese seguimiento. Las implementaciones dejan de usar el sink tras `stop`.
#[async_trait]
pub trait LocationSource: Send + Sync {
    async fn start(&self, sink: LocationSink) -> Result<WatchHandle, LocationError>;

    async fn stop(&self, handle: &WatchHandle) -> Result<(), LocationError>;
}

/// Adquisición puntual de la posición actual
#[async_trait]
pub trait Geolocator: Send + Sync {
    async fn current_position(&self) -> Result<PositionFix, LocationError>;
}

/// Capacidades de la plataforma donde corre el proceso
pub trait PlatformInfo: Send + Sync {
    /// `true` dentro de un shell nativo instalado con servicio de ubicación
    fn is_native_shell(&self) -> bool;
}

/// Plataforma fija, decidida por configuración
#[derive(Debug, Clone, Copy)]
pub struct StaticPlatform {
    native_shell: bool,
}

impl StaticPlatform {
    pub fn new(native_shell: bool) -> Self {
        Self { native_shell }
    }
}

impl PlatformInfo for StaticPlatform {
    fn is_native_shell(&self) -> bool {
        self.native_shell
    }
}
