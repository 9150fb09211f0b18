use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::store::StoreResult;

/// Tipo de cambio notificado
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

/// Notificación de cambio sobre una fila
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub table: String,
    #[serde(rename = "type")]
    pub kind: ChangeKind,
    #[serde(default)]
    pub record: Option<Value>,
    #[serde(default)]
    pub old_record: Option<Value>,
}

impl ChangeEvent {
    pub fn new(table: &str, kind: ChangeKind, record: Option<Value>) -> Self {
        Self {
            table: table.to_string(),
            kind,
            record,
            old_record: None,
        }
    }
}

/// Canal de notificación de una tabla
pub fn channel_name(table: &str) -> String {
    format!("{}_changes", table)
}

/// Suscripción activa a una tabla.
///
/// Al soltarla se cancela la tarea que la alimenta.
pub struct ChangeSubscription {
    table: String,
    rx: mpsc::UnboundedReceiver<ChangeEvent>,
    task: Option<JoinHandle<()>>,
}

impl ChangeSubscription {
    pub fn new(table: &str, rx: mpsc::UnboundedReceiver<ChangeEvent>) -> Self {
        Self {
            table: table.to_string(),
            rx,
            task: None,
        }
    }

    pub fn with_task(mut self, task: JoinHandle<()>) -> Self {
        self.task = Some(task);
        self
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Siguiente cambio; `None` cuando la suscripción terminó
    pub async fn recv(&mut self) -> Option<ChangeEvent> {
        self.rx.recv().await
    }
}

impl Drop for ChangeSubscription {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// Fuente de notificaciones de cambios por tabla
#[async_trait]
pub trait ChangeFeed: Send + Sync {
    async fn subscribe(&self, table: &str) -> StoreResult<ChangeSubscription>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_payload_format() {
        let event: ChangeEvent = serde_json::from_value(json!({
            "table": "ubicaciones",
            "type": "INSERT",
            "record": { "vendedor_id": 4, "latitud": 12.9, "longitud": -85.9 }
        }))
        .unwrap();

        assert_eq!(event.table, "ubicaciones");
        assert_eq!(event.kind, ChangeKind::Insert);
        assert!(event.old_record.is_none());
        assert_eq!(event.record.unwrap()["vendedor_id"], 4);
    }

    #[test]
    fn test_channel_name() {
        assert_eq!(channel_name("vendedores"), "vendedores_changes");
    }
}
