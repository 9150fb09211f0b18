use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use super::errors::LocationError;
use super::models::{LocationEvent, LocationSink, PositionFix, WatchHandle};
use super::source::{Geolocator, LocationSource};
use crate::utils::validation::{validate_latitud, validate_longitud};

/// Error reportado por el cliente (`GeolocationPositionError`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionErrorReport {
    pub code: u16,
    #[serde(default)]
    pub message: Option<String>,
}

/// Cuerpo enviado por el cliente con cada lectura de su geolocalización
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PositionReport {
    Error {
        error: PositionErrorReport,
    },
    Fix {
        latitud: f64,
        longitud: f64,
        #[serde(default)]
        precision: Option<f64>,
        /// Milisegundos desde epoch
        #[serde(default)]
        timestamp: Option<i64>,
    },
}

impl PositionReport {
    pub fn fix(latitud: f64, longitud: f64) -> Self {
        PositionReport::Fix {
            latitud,
            longitud,
            precision: None,
            timestamp: None,
        }
    }

    /// Convertir el reporte en un evento de seguimiento.
    ///
    /// Coordenadas fuera de rango se rechazan antes de llegar a la sesión.
    pub fn into_event(self) -> Result<LocationEvent, LocationError> {
        match self {
            PositionReport::Error { error } => Ok(LocationEvent::Error(LocationError::from_code(
                error.code,
                error.message,
            ))),
            PositionReport::Fix {
                latitud,
                longitud,
                precision,
                timestamp,
            } => {
                if validate_latitud(latitud).is_err() || validate_longitud(longitud).is_err() {
                    return Err(LocationError::InvalidPosition(format!(
                        "({}, {})",
                        latitud, longitud
                    )));
                }
                let timestamp = timestamp.and_then(|ms| Utc.timestamp_millis_opt(ms).single());
                Ok(LocationEvent::Sample(PositionFix {
                    latitud,
                    longitud,
                    precision,
                    timestamp,
                }))
            }
        }
    }
}

struct ActiveWatch {
    handle: WatchHandle,
    sink: LocationSink,
}

/// Seguimiento en primer plano.
///
/// El cliente empuja sus lecturas con `deliver`; sólo existe un
/// seguimiento activo a la vez.
pub struct PushLocationSource {
    watch: Mutex<Option<ActiveWatch>>,
}

impl PushLocationSource {
    pub fn new() -> Self {
        Self {
            watch: Mutex::new(None),
        }
    }

    pub async fn is_watching(&self) -> bool {
        self.watch.lock().await.is_some()
    }

    /// Entregar una lectura del cliente al seguimiento activo
    pub async fn deliver(&self, report: PositionReport) -> Result<(), LocationError> {
        let event = report.into_event()?;
        let mut watch = self.watch.lock().await;

        let delivered = match watch.as_ref() {
            Some(active) => active.sink.send(event),
            None => return Err(LocationError::NoActiveWatch),
        };

        if !delivered {
            tracing::warn!("⚠️ Seguimiento en primer plano sin receptor, se descarta");
            *watch = None;
            return Err(LocationError::NoActiveWatch);
        }
        Ok(())
    }
}

impl Default for PushLocationSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LocationSource for PushLocationSource {
    async fn start(&self, sink: LocationSink) -> Result<WatchHandle, LocationError> {
        let handle = WatchHandle::new();
        let mut watch = self.watch.lock().await;
        if let Some(previous) = watch.take() {
            tracing::warn!("⚠️ Reemplazando seguimiento en primer plano {}", previous.handle);
        }
        *watch = Some(ActiveWatch {
            handle: handle.clone(),
            sink,
        });
        tracing::debug!("📍 Seguimiento en primer plano iniciado: {}", handle);
        Ok(handle)
    }

    async fn stop(&self, handle: &WatchHandle) -> Result<(), LocationError> {
        let mut watch = self.watch.lock().await;
        match watch.as_ref() {
            Some(active) if &active.handle == handle => {
                *watch = None;
                tracing::debug!("📍 Seguimiento en primer plano detenido: {}", handle);
                Ok(())
            }
            _ => Err(LocationError::UnknownWatch(handle.to_string())),
        }
    }
}

/// Lectura puntual ya resuelta por el cliente.
///
/// `None` representa un cliente sin API de geolocalización.
pub struct ReportedPosition(pub Option<PositionReport>);

#[async_trait]
impl Geolocator for ReportedPosition {
    async fn current_position(&self) -> Result<PositionFix, LocationError> {
        let report = self.0.clone().ok_or(LocationError::Unsupported)?;
        match report.into_event()? {
            LocationEvent::Sample(fix) => Ok(fix),
            LocationEvent::Error(error) => Err(error),
        }
    }
}
