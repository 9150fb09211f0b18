//! Conexión a PostgreSQL
//! 
//! Este módulo crea el pool de conexiones y verifica que responde.

use anyhow::{Context, Result};
use sqlx::PgPool;

use crate::config::DatabaseConfig;

/// Pool de conexiones verificado
#[derive(Clone)]
pub struct DatabaseConnection {
    pool: PgPool,
}

impl DatabaseConnection {
    /// Crear el pool y comprobar la conexión
    pub async fn new(config: &DatabaseConfig) -> Result<Self> {
        log::info!(
            "🔌 Conectando a la base de datos: {}",
            mask_database_url(&config.url)
        );

        let pool = config
            .create_pool()
            .await
            .context("No se pudo crear el pool de conexiones")?;

        sqlx::query("SELECT 1")
            .execute(&pool)
            .await
            .context("La base de datos no responde")?;

        log::info!("✅ Base de datos conectada ({} conexiones máx.)", config.max_connections);
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Función helper para enmascarar la URL de la base de datos en logs
pub fn mask_database_url(url: &str) -> String {
    let Some(at_pos) = url.rfind('@') else {
        return url.to_string();
    };
    let protocol_end = url.find("://").map(|pos| pos + 3).unwrap_or(0);
    if protocol_end > at_pos {
        return url.to_string();
    }
    format!("{}***:***@{}", &url[..protocol_end], &url[at_pos + 1..])
}
