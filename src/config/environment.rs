//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno y variables de configuración.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};

use super::database::DatabaseConfig;

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub cors_origins: Vec<String>,
    /// Corriendo dentro del shell nativo con servicio de ubicación
    pub native_shell: bool,
    pub gpsd_addr: String,
    pub gpsd_fix_timeout: Duration,
    pub poll_interval: Duration,
}

impl EnvironmentConfig {
    /// Leer la configuración de las variables de entorno
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Leer la configuración desde una fuente arbitraria de variables
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let environment = get("ENVIRONMENT").unwrap_or_else(|| "development".to_string());
        let database_url = get("DATABASE_URL");

        if database_url.is_none() && environment != "development" {
            return Err(anyhow!(
                "DATABASE_URL es obligatoria en el entorno '{}'",
                environment
            ));
        }

        Ok(Self {
            port: parse_or(&get, "PORT", 3000)?,
            host: get("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            database_url,
            db_max_connections: parse_or(&get, "DB_MAX_CONNECTIONS", 10)?,
            cors_origins: get("CORS_ORIGINS")
                .map(|origins| {
                    origins
                        .split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
            native_shell: parse_or(&get, "NATIVE_SHELL", false)?,
            gpsd_addr: get("GPSD_ADDR").unwrap_or_else(|| "127.0.0.1:2947".to_string()),
            gpsd_fix_timeout: Duration::from_secs(parse_or(&get, "GPSD_FIX_TIMEOUT_SECS", 15)?),
            poll_interval: Duration::from_secs(parse_or(&get, "POLL_INTERVAL_SECS", 5)?.max(1)),
            environment,
        })
    }

    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Verificar si estamos en modo producción
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Obtener la URL del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Configuración del pool, si hay base de datos configurada
    pub fn database(&self) -> Option<DatabaseConfig> {
        self.database_url
            .as_ref()
            .map(|url| DatabaseConfig::new(url.clone(), self.db_max_connections))
    }
}

fn parse_or<T, G>(get: &G, name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    G: Fn(&str) -> Option<String>,
{
    match get(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} tiene un valor inválido: '{}'", name, raw)),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<EnvironmentConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        EnvironmentConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();

        assert!(config.is_development());
        assert_eq!(config.server_url(), "0.0.0.0:3000");
        assert!(config.database_url.is_none());
        assert!(config.database().is_none());
        assert!(config.cors_origins.is_empty());
        assert!(!config.native_shell);
        assert_eq!(config.gpsd_addr, "127.0.0.1:2947");
        assert_eq!(config.gpsd_fix_timeout, Duration::from_secs(15));
        assert_eq!(config.poll_interval, Duration::from_secs(5));
    }

    #[test]
    fn test_custom_values() {
        let config = config_from(&[
            ("ENVIRONMENT", "production"),
            ("PORT", "8080"),
            ("DATABASE_URL", "postgres://app:secreto@db/ventas"),
            ("DB_MAX_CONNECTIONS", "4"),
            ("CORS_ORIGINS", "https://panel.example.com, http://localhost:5173"),
            ("NATIVE_SHELL", "true"),
        ])
        .unwrap();

        assert!(config.is_production());
        assert_eq!(config.port, 8080);
        assert!(config.native_shell);
        assert_eq!(config.cors_origins.len(), 2);
        assert_eq!(config.database().unwrap().max_connections, 4);
    }

    #[test]
    fn test_invalid_number_is_error() {
        let error = config_from(&[("PORT", "tres mil")]).unwrap_err();
        assert!(error.to_string().contains("PORT"));

        assert!(config_from(&[("NATIVE_SHELL", "quizas")]).is_err());
    }

    #[test]
    fn test_database_url_required_outside_development() {
        assert!(config_from(&[("ENVIRONMENT", "production")]).is_err());
    }
}
