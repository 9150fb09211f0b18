//! Controlador de la sesión de seguimiento
//!
//! Máquina de estados `Idle → Starting → Active → Stopping → Idle` ligada a
//! un vendedor. Elige la fuente de ubicación según la plataforma, pasa cada
//! muestra por la compuerta y escribe las admitidas en `ubicaciones`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;

use super::errors::TrackingError;
use super::throttle::ThrottleGate;
use crate::location::{
    LocationError, LocationEvent, LocationSink, LocationSource, PlatformInfo, PositionFix,
    SourceKind, WatchHandle,
};
use crate::models::NuevaUbicacion;
use crate::store::LocationStore;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    #[default]
    Idle,
    Starting,
    Active,
    Stopping,
}

/// Foto del estado expuesta por la API
#[derive(Debug, Clone, Serialize)]
pub struct SessionStatus {
    pub estado: SessionState,
    pub vendedor_id: Option<i64>,
    pub session_id: Option<String>,
    pub fuente: Option<SourceKind>,
    pub iniciada_en: Option<DateTime<Utc>>,
    pub ultimo_envio: Option<DateTime<Utc>>,
    pub enviadas: u64,
    pub omitidas: u64,
    pub ultimo_error: Option<TrackingError>,
}

enum Admission {
    Forward(NuevaUbicacion),
    Skipped,
    /// La muestra pertenece a una sesión que ya no está activa
    Ignored,
}

#[derive(Default)]
struct Session {
    state: SessionState,
    generation: u64,
    vendedor_id: Option<i64>,
    handle: Option<WatchHandle>,
    source: Option<SourceKind>,
    started_at: Option<DateTime<Utc>>,
    gate: ThrottleGate,
    forwarded: u64,
    pump: Option<JoinHandle<()>>,
    last_error: Option<TrackingError>,
}

impl Session {
    fn status(&self) -> SessionStatus {
        SessionStatus {
            estado: self.state,
            vendedor_id: self.vendedor_id,
            session_id: self.handle.as_ref().map(|h| h.to_string()),
            fuente: self.source,
            iniciada_en: self.started_at,
            ultimo_envio: self
                .gate
                .last_forwarded_at()
                .and_then(|ms| Utc.timestamp_millis_opt(ms).single()),
            enviadas: self.forwarded,
            omitidas: self.gate.skipped(),
            ultimo_error: self.last_error.clone(),
        }
    }

    fn accepts(&self, generation: u64) -> bool {
        self.state == SessionState::Active && self.generation == generation
    }

    /// Liberar todo lo ligado a la sesión actual
    fn clear(&mut self) {
        self.state = SessionState::Idle;
        self.vendedor_id = None;
        self.handle = None;
        self.source = None;
        self.started_at = None;
        self.pump = None;
    }
}

/// Compuerta + escritura, compartida con la tarea que consume eventos
#[derive(Clone)]
struct Pipeline {
    session: Arc<Mutex<Session>>,
    store: Arc<dyn LocationStore>,
}

impl Pipeline {
    /// Decidir bajo el lock, en orden de llegada, si la muestra se escribe
    async fn admit(&self, generation: u64, fix: &PositionFix) -> Admission {
        let mut session = self.session.lock().await;

        if !session.accepts(generation) {
            return Admission::Ignored;
        }
        let Some(vendedor_id) = session.vendedor_id else {
            return Admission::Ignored;
        };

        let capturada = fix.timestamp.unwrap_or_else(Utc::now);
        if !session.gate.admit(capturada.timestamp_millis()) {
            tracing::trace!("⏱️ Muestra omitida para vendedor {}", vendedor_id);
            return Admission::Skipped;
        }

        session.forwarded += 1;
        Admission::Forward(NuevaUbicacion {
            vendedor_id,
            latitud: fix.latitud,
            longitud: fix.longitud,
            precision: fix.precision,
            fecha_registro: capturada,
        })
    }

    /// Escribir una muestra admitida; el lock no se mantiene durante la escritura
    async fn persist(self, generation: u64, nueva: NuevaUbicacion) {
        let vendedor_id = nueva.vendedor_id;
        match self.store.insert_ubicacion(nueva).await {
            Ok(ubicacion) => {
                tracing::debug!(
                    "📍 Ubicación registrada para vendedor {}: ({}, {})",
                    vendedor_id,
                    ubicacion.latitud,
                    ubicacion.longitud
                );
            }
            Err(e) => {
                let error = TrackingError::from(e);
                tracing::warn!("⚠️ No se pudo registrar la ubicación: {}", error);
                let mut session = self.session.lock().await;
                if session.generation == generation {
                    session.last_error = Some(error);
                }
            }
        }
    }

    async fn record_error(&self, generation: u64, error: LocationError) {
        let error = TrackingError::from(error);
        let mut session = self.session.lock().await;
        if session.accepts(generation) {
            tracing::warn!("⚠️ Error de la fuente de ubicación: {}", error);
            session.last_error = Some(error);
        }
    }
}

async fn pump(pipeline: Pipeline, generation: u64, mut rx: mpsc::UnboundedReceiver<LocationEvent>) {
    while let Some(event) = rx.recv().await {
        match event {
            LocationEvent::Sample(fix) => {
                if let Admission::Forward(nueva) = pipeline.admit(generation, &fix).await {
                    tokio::spawn(pipeline.clone().persist(generation, nueva));
                }
            }
            LocationEvent::Error(error) => pipeline.record_error(generation, error).await,
        }
    }
}

pub struct TrackingSessionController {
    pipeline: Pipeline,
    platform: Arc<dyn PlatformInfo>,
    foreground: Arc<dyn LocationSource>,
    background: Arc<dyn LocationSource>,
    /// Tomado durante todo `start`, incluida la liberación del watcher si se cancela
    starting: Mutex<()>,
    torn_down: AtomicBool,
}

impl TrackingSessionController {
    pub fn new(
        store: Arc<dyn LocationStore>,
        platform: Arc<dyn PlatformInfo>,
        foreground: Arc<dyn LocationSource>,
        background: Arc<dyn LocationSource>,
    ) -> Self {
        Self {
            pipeline: Pipeline {
                session: Arc::new(Mutex::new(Session::default())),
                store,
            },
            platform,
            foreground,
            background,
            starting: Mutex::new(()),
            torn_down: AtomicBool::new(false),
        }
    }

    fn source_for(&self, kind: SourceKind) -> &Arc<dyn LocationSource> {
        match kind {
            SourceKind::Foreground => &self.foreground,
            SourceKind::Background => &self.background,
        }
    }

    pub async fn status(&self) -> SessionStatus {
        self.pipeline.session.lock().await.status()
    }

    /// Iniciar el seguimiento de un vendedor
    pub async fn start(&self, vendedor_id: Option<i64>) -> Result<SessionStatus, TrackingError> {
        let vendedor_id = match vendedor_id {
            Some(id) if id > 0 => id,
            _ => {
                return Err(TrackingError::Validation(
                    "Debe seleccionar un vendedor para iniciar el seguimiento".to_string(),
                ))
            }
        };

        let _starting = self.starting.lock().await;
        if self.torn_down.load(Ordering::SeqCst) {
            return Err(TrackingError::Validation(
                "El servicio de seguimiento se está cerrando".to_string(),
            ));
        }

        let kind = if self.platform.is_native_shell() {
            SourceKind::Background
        } else {
            SourceKind::Foreground
        };

        let generation = {
            let mut session = self.pipeline.session.lock().await;
            if session.state != SessionState::Idle {
                return Err(TrackingError::Validation(format!(
                    "Ya existe una sesión de seguimiento ({:?})",
                    session.state
                )));
            }
            session.state = SessionState::Starting;
            session.generation += 1;
            session.gate.reset();
            session.forwarded = 0;
            session.last_error = None;
            session.vendedor_id = Some(vendedor_id);
            session.source = Some(kind);
            session.generation
        };

        let source = self.source_for(kind);
        let (sink, rx) = LocationSink::channel();

        let handle = match source.start(sink).await {
            Ok(handle) => handle,
            Err(e) => {
                let error = TrackingError::from(e);
                tracing::error!("❌ No se pudo iniciar el seguimiento: {}", error);
                let mut session = self.pipeline.session.lock().await;
                session.clear();
                session.last_error = Some(error.clone());
                return Err(error);
            }
        };

        let mut session = self.pipeline.session.lock().await;
        if session.state != SessionState::Starting || session.generation != generation {
            drop(session);
            tracing::warn!("⚠️ Sesión cancelada durante el inicio, liberando {}", handle);
            if let Err(e) = source.stop(&handle).await {
                tracing::warn!("⚠️ Error cancelando seguimiento {}: {}", handle, e);
            }
            return Err(TrackingError::Cancellation(
                "La sesión se canceló durante el inicio".to_string(),
            ));
        }

        session.state = SessionState::Active;
        session.handle = Some(handle);
        session.started_at = Some(Utc::now());
        session.pump = Some(tokio::spawn(pump(self.pipeline.clone(), generation, rx)));

        tracing::info!(
            "🛰️ Seguimiento iniciado para vendedor {} ({:?})",
            vendedor_id,
            kind
        );
        Ok(session.status())
    }

    /// Detener la sesión activa. Sin sesión activa no hace nada.
    pub async fn stop(&self) -> SessionStatus {
        self.cancel().await;
        self.status().await
    }

    /// Cierre del proceso: cancela el watcher activo una sola vez
    pub async fn shutdown(&self) {
        if self.torn_down.swap(true, Ordering::SeqCst) {
            return;
        }
        tracing::info!("🛑 Cerrando el seguimiento de ubicación");
        self.cancel().await;
    }

    async fn cancel(&self) {
        let (handle, kind, pump) = {
            let mut session = self.pipeline.session.lock().await;
            let state = session.state;
            match state {
                SessionState::Active => {}
                SessionState::Starting => {
                    // El inicio en curso detecta el cambio de generación y libera su watcher
                    session.generation += 1;
                    session.clear();
                    drop(session);
                    drop(self.starting.lock().await);
                    return;
                }
                _ => {
                    tracing::debug!("Sin sesión activa que detener");
                    return;
                }
            }
            session.state = SessionState::Stopping;
            session.generation += 1;
            (session.handle.take(), session.source, session.pump.take())
        };

        if let Some(pump) = pump {
            pump.abort();
        }

        if let (Some(handle), Some(kind)) = (handle, kind) {
            match self.source_for(kind).stop(&handle).await {
                Ok(()) => tracing::info!("🛰️ Seguimiento detenido: {}", handle),
                Err(e) => tracing::warn!("⚠️ Error cancelando seguimiento {}: {}", handle, e),
            }
        }

        self.pipeline.session.lock().await.clear();
    }
}
