//! # Logging
//! src/logging.rs
//!
//! Inicializa `tracing-subscriber` con salida legible por consola.
//! `RUST_LOG`, si está definida, tiene prioridad sobre `--log-level`.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Instala el subscriber global
///
/// Llamadas posteriores no tienen efecto (el primer subscriber se queda).
pub fn init(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("oneshot_http={}", level.to_ascii_lowercase())));

    let result = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_thread_names(true))
        .try_init();

    if result.is_err() {
        tracing::debug!("subscriber de logging ya inicializado");
    }
}
