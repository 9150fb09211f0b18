//! Suscripciones sobre LISTEN/NOTIFY de PostgreSQL
//!
//! Cada tabla publica sus cambios en el canal `<tabla>_changes` con un
//! payload JSON `{table, type, record, old_record}`.

use async_trait::async_trait;
use sqlx::postgres::PgListener;
use sqlx::PgPool;
use tokio::sync::mpsc;
use tracing::{debug, error, warn};

use super::change_feed::{channel_name, ChangeEvent, ChangeFeed, ChangeSubscription};
use crate::store::{StoreError, StoreResult};

pub struct PgChangeFeed {
    pool: PgPool,
}

impl PgChangeFeed {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ChangeFeed for PgChangeFeed {
    async fn subscribe(&self, table: &str) -> StoreResult<ChangeSubscription> {
        let channel = channel_name(table);

        let mut listener = PgListener::connect_with(&self.pool)
            .await
            .map_err(|e| StoreError::Database(format!("Error abriendo listener: {}", e)))?;
        listener
            .listen(&channel)
            .await
            .map_err(|e| StoreError::Database(format!("Error en LISTEN {}: {}", channel, e)))?;

        debug!("📡 LISTEN {}", channel);

        let (tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(async move {
            loop {
                match listener.recv().await {
                    Ok(notification) => {
                        match serde_json::from_str::<ChangeEvent>(notification.payload()) {
                            Ok(event) => {
                                debug!("📥 Cambio en {}: {:?}", event.table, event.kind);
                                if tx.send(event).is_err() {
                                    break;
                                }
                            }
                            Err(e) => {
                                warn!("⚠️ Payload inválido en {}: {}", notification.channel(), e);
                            }
                        }
                    }
                    Err(e) => {
                        error!("❌ Listener de {} terminó: {}", channel, e);
                        break;
                    }
                }
            }
        });

        Ok(ChangeSubscription::new(table, rx).with_task(task))
    }
}
