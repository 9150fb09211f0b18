use std::collections::HashMap;
use std::io::ErrorKind;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::net::TcpStream;
use tokio::task::JoinHandle;
use tokio::time::timeout;

use super::errors::LocationError;
use super::models::{LocationEvent, LocationSink, PositionFix, WatchHandle};
use super::source::{Geolocator, LocationSource};

const WATCH_COMMAND: &[u8] = b"?WATCH={\"enable\":true,\"json\":true};\n";
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

type GpsdLines = Lines<BufReader<TcpStream>>;

/// Mensajes JSON de gpsd que interesan; el resto se ignora
#[derive(Debug, Deserialize)]
#[serde(tag = "class")]
enum GpsdMessage {
    #[serde(rename = "TPV")]
    Tpv(TpvReport),
    #[serde(rename = "ERROR")]
    Error { message: String },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct TpvReport {
    #[serde(default)]
    mode: u8,
    lat: Option<f64>,
    lon: Option<f64>,
    time: Option<String>,
    eph: Option<f64>,
    epx: Option<f64>,
    epy: Option<f64>,
}

impl TpvReport {
    /// Modo 2 (2D) o 3 (3D) con coordenadas
    fn into_fix(self) -> Option<PositionFix> {
        if self.mode < 2 {
            return None;
        }
        let precision = self.eph.or(match (self.epx, self.epy) {
            (Some(x), Some(y)) => Some(x.max(y)),
            (x, y) => x.or(y),
        });
        let timestamp = self
            .time
            .as_deref()
            .and_then(|t| DateTime::parse_from_rfc3339(t).ok())
            .map(|t| t.with_timezone(&Utc));

        Some(PositionFix {
            latitud: self.lat?,
            longitud: self.lon?,
            precision,
            timestamp,
        })
    }
}

#[derive(Debug, PartialEq)]
pub(crate) enum GpsdReport {
    Fix(PositionFix),
    Error(String),
}

/// Interpretar una línea del stream de gpsd
pub(crate) fn parse_report(line: &str) -> Option<GpsdReport> {
    match serde_json::from_str::<GpsdMessage>(line.trim()) {
        Ok(GpsdMessage::Tpv(tpv)) => tpv.into_fix().map(GpsdReport::Fix),
        Ok(GpsdMessage::Error { message }) => Some(GpsdReport::Error(message)),
        Ok(GpsdMessage::Other) => None,
        Err(e) => {
            tracing::trace!("Línea de gpsd ignorada: {}", e);
            None
        }
    }
}

/// Seguimiento en segundo plano a través del daemon `gpsd`.
///
/// Cada `start` abre su propia conexión y una tarea lectora; al
/// descartar la fuente se abortan todas las tareas pendientes.
pub struct GpsdSource {
    addr: String,
    fix_timeout: Duration,
    watchers: Mutex<HashMap<WatchHandle, JoinHandle<()>>>,
}

impl GpsdSource {
    pub fn new(addr: impl Into<String>, fix_timeout: Duration) -> Self {
        Self {
            addr: addr.into(),
            fix_timeout,
            watchers: Mutex::new(HashMap::new()),
        }
    }

    pub fn active_watches(&self) -> usize {
        self.watchers.lock().map(|w| w.len()).unwrap_or(0)
    }

    async fn connect(&self) -> Result<GpsdLines, LocationError> {
        let mut stream = timeout(CONNECT_TIMEOUT, TcpStream::connect(&self.addr))
            .await
            .map_err(|_| LocationError::Timeout)?
            .map_err(|e| match e.kind() {
                ErrorKind::ConnectionRefused | ErrorKind::NotFound | ErrorKind::AddrNotAvailable => {
                    tracing::warn!("⚠️ gpsd no disponible en {}: {}", self.addr, e);
                    LocationError::Unsupported
                }
                _ => LocationError::Unavailable(e.to_string()),
            })?;

        stream
            .write_all(WATCH_COMMAND)
            .await
            .map_err(|e| LocationError::Unavailable(e.to_string()))?;

        Ok(BufReader::new(stream).lines())
    }
}

async fn watch_loop(mut lines: GpsdLines, sink: LocationSink) {
    loop {
        let event = match lines.next_line().await {
            Ok(Some(line)) => match parse_report(&line) {
                Some(GpsdReport::Fix(fix)) => LocationEvent::Sample(fix),
                Some(GpsdReport::Error(message)) => {
                    LocationEvent::Error(LocationError::Unavailable(message))
                }
                None => continue,
            },
            Ok(None) => {
                sink.send(LocationEvent::Error(LocationError::Unavailable(
                    "gpsd cerró la conexión".to_string(),
                )));
                break;
            }
            Err(e) => {
                sink.send(LocationEvent::Error(LocationError::Unavailable(e.to_string())));
                break;
            }
        };

        if !sink.send(event) {
            break;
        }
    }
    tracing::debug!("📡 Lector de gpsd finalizado");
}

#[async_trait]
impl LocationSource for GpsdSource {
    async fn start(&self, sink: LocationSink) -> Result<WatchHandle, LocationError> {
        let lines = self.connect().await?;
        let handle = WatchHandle::new();
        let task = tokio::spawn(watch_loop(lines, sink));

        match self.watchers.lock() {
            Ok(mut watchers) => {
                watchers.insert(handle.clone(), task);
            }
            Err(_) => {
                task.abort();
                return Err(LocationError::Unavailable(
                    "registro de watchers envenenado".to_string(),
                ));
            }
        }

        tracing::info!("📡 Seguimiento gpsd iniciado en {}: {}", self.addr, handle);
        Ok(handle)
    }

    async fn stop(&self, handle: &WatchHandle) -> Result<(), LocationError> {
        let task = self
            .watchers
            .lock()
            .ok()
            .and_then(|mut watchers| watchers.remove(handle));

        match task {
            Some(task) => {
                task.abort();
                tracing::info!("📡 Seguimiento gpsd detenido: {}", handle);
                Ok(())
            }
            None => Err(LocationError::UnknownWatch(handle.to_string())),
        }
    }
}

#[async_trait]
impl Geolocator for GpsdSource {
    async fn current_position(&self) -> Result<PositionFix, LocationError> {
        let mut lines = self.connect().await?;

        let lectura = async {
            loop {
                match lines.next_line().await {
                    Ok(Some(line)) => match parse_report(&line) {
                        Some(GpsdReport::Fix(fix)) => return Ok(fix),
                        Some(GpsdReport::Error(message)) => {
                            return Err(LocationError::Unavailable(message))
                        }
                        None => continue,
                    },
                    Ok(None) => {
                        return Err(LocationError::Unavailable(
                            "gpsd cerró la conexión".to_string(),
                        ))
                    }
                    Err(e) => return Err(LocationError::Unavailable(e.to_string())),
                }
            }
        };

        timeout(self.fix_timeout, lectura)
            .await
            .map_err(|_| LocationError::Timeout)?
    }
}

impl Drop for GpsdSource {
    fn drop(&mut self) {
        if let Ok(mut watchers) = self.watchers.lock() {
            for (_, task) in watchers.drain() {
                task.abort();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncReadExt;
    use tokio::net::TcpListener;

    const TPV_3D: &str = r#"{"class":"TPV","device":"/dev/ttyUSB0","mode":3,"time":"2024-05-01T12:00:00.000Z","lat":-34.6037,"lon":-58.3816,"eph":8.5}"#;

    #[test]
    fn test_parse_tpv_fix() {
        match parse_report(TPV_3D) {
            Some(GpsdReport::Fix(fix)) => {
                assert_eq!(fix.latitud, -34.6037);
                assert_eq!(fix.longitud, -58.3816);
                assert_eq!(fix.precision, Some(8.5));
                assert_eq!(
                    fix.timestamp.unwrap().to_rfc3339(),
                    "2024-05-01T12:00:00+00:00"
                );
            }
            other => panic!("reporte inesperado: {:?}", other),
        }
    }

    #[test]
    fn test_parse_tpv_without_fix() {
        let line = r#"{"class":"TPV","mode":1}"#;
        assert_eq!(parse_report(line), None);
    }

    #[test]
    fn test_parse_precision_from_epx_epy() {
        let line = r#"{"class":"TPV","mode":2,"lat":1.0,"lon":2.0,"epx":3.0,"epy":7.0}"#;
        match parse_report(line) {
            Some(GpsdReport::Fix(fix)) => {
                assert_eq!(fix.precision, Some(7.0));
                assert!(fix.timestamp.is_none());
            }
            other => panic!("reporte inesperado: {:?}", other),
        }
    }

    #[test]
    fn test_parse_other_messages() {
        assert_eq!(parse_report(r#"{"class":"VERSION","release":"3.25"}"#), None);
        assert_eq!(parse_report("basura"), None);
        assert_eq!(
            parse_report(r#"{"class":"ERROR","message":"unrecognized request"}"#),
            Some(GpsdReport::Error("unrecognized request".to_string()))
        );
    }

    async fn fake_gpsd(lines: Vec<&'static str>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 64];
            let _ = socket.read(&mut buf).await;
            for line in lines {
                socket.write_all(line.as_bytes()).await.unwrap();
                socket.write_all(b"\n").await.unwrap();
            }
            tokio::time::sleep(Duration::from_secs(5)).await;
        });
        addr
    }

    #[tokio::test]
    async fn test_current_position_from_fake_daemon() {
        let addr = fake_gpsd(vec![r#"{"class":"VERSION"}"#, TPV_3D]).await;
        let source = GpsdSource::new(addr, Duration::from_secs(2));

        let fix = source.current_position().await.unwrap();
        assert_eq!(fix.latitud, -34.6037);
    }

    #[tokio::test]
    async fn test_current_position_timeout() {
        let addr = fake_gpsd(vec![r#"{"class":"TPV","mode":1}"#]).await;
        let source = GpsdSource::new(addr, Duration::from_millis(100));

        assert_eq!(source.current_position().await, Err(LocationError::Timeout));
    }

    #[tokio::test]
    async fn test_watch_delivers_samples_and_stops() {
        let addr = fake_gpsd(vec![TPV_3D]).await;
        let source = GpsdSource::new(addr, Duration::from_secs(2));
        let (sink, mut rx) = LocationSink::channel();

        let handle = source.start(sink).await.unwrap();
        assert_eq!(source.active_watches(), 1);

        match rx.recv().await {
            Some(LocationEvent::Sample(fix)) => assert_eq!(fix.longitud, -58.3816),
            other => panic!("evento inesperado: {:?}", other),
        }

        source.stop(&handle).await.unwrap();
        assert_eq!(source.active_watches(), 0);
        assert!(matches!(
            source.stop(&handle).await,
            Err(LocationError::UnknownWatch(_))
        ));
    }

    #[tokio::test]
    async fn test_start_without_daemon_is_unsupported() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        drop(listener);

        let source = GpsdSource::new(addr, Duration::from_secs(1));
        let (sink, _rx) = LocationSink::channel();
        assert_eq!(source.start(sink).await, Err(LocationError::Unsupported));
    }
}
