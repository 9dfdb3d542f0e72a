//! # Configuración del Servidor
//! src/config.rs
//!
//! Configuración por argumentos CLI y variables de entorno.
//!
//! ### CLI
//! ```bash
//! ./oneshot_http --port 9999 --pool-size 64 --queue-capacity 1024
//! ```
//!
//! ### Variables de entorno
//! ```bash
//! HTTP_PORT=9999 POOL_SIZE=16 LOG_LEVEL=debug ./oneshot_http
//! ```

use crate::error::ConfigError;
use clap::Parser;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Configuración del servidor HTTP/1.1
#[derive(Debug, Clone, Parser)]
#[command(name = "oneshot_http")]
#[command(about = "Servidor HTTP/1.1 minimo: una peticion por conexion")]
#[command(version)]
pub struct Config {
    /// Puerto en el que escucha el servidor (0 = puerto efímero)
    #[arg(short, long, default_value = "9999", env = "HTTP_PORT")]
    pub port: u16,

    /// Host/IP en el que escucha
    #[arg(long, default_value = "127.0.0.1", env = "HTTP_HOST")]
    pub host: String,

    /// Número de workers que atienden conexiones en paralelo
    #[arg(long = "pool-size", default_value = "64", env = "POOL_SIZE")]
    pub pool_size: usize,

    /// Conexiones aceptadas que pueden esperar un worker libre
    #[arg(long = "queue-capacity", default_value = "1024", env = "QUEUE_CAPACITY")]
    pub queue_capacity: usize,

    /// Nivel de log (trace, debug, info, warn, error); RUST_LOG tiene prioridad
    #[arg(long = "log-level", default_value = "info", env = "LOG_LEVEL")]
    pub log_level: String,
}

impl Config {
    /// Parsea argumentos CLI y variables de entorno
    pub fn new() -> Self {
        Config::parse()
    }

    /// Dirección completa para bind (host:port)
    ///
    /// # Ejemplo
    /// ```rust
    /// use oneshot_http::config::Config;
    ///
    /// let config = Config::default();
    /// assert_eq!(config.address(), "127.0.0.1:9999");
    /// ```
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Valida la configuración
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pool_size == 0 {
            return Err(ConfigError::Invalid("pool size must be >= 1".to_string()));
        }
        if self.queue_capacity == 0 {
            return Err(ConfigError::Invalid("queue capacity must be >= 1".to_string()));
        }
        if !LOG_LEVELS.contains(&self.log_level.to_ascii_lowercase().as_str()) {
            return Err(ConfigError::Invalid(format!(
                "log level must be one of {}, got {:?}",
                LOG_LEVELS.join("|"),
                self.log_level
            )));
        }

        Ok(())
    }

    /// Registra un resumen de la configuración
    pub fn log_summary(&self) {
        tracing::info!(
            address = %self.address(),
            pool_size = self.pool_size,
            queue_capacity = self.queue_capacity,
            log_level = %self.log_level,
            "configuración cargada"
        );
    }
}

impl Default for Config {
    /// Mismos valores que los defaults del CLI
    fn default() -> Self {
        Self {
            port: 9999,
            host: "127.0.0.1".to_string(),
            pool_size: 64,
            queue_capacity: 1024,
            log_level: "info".to_string(),
        }
    }
}
