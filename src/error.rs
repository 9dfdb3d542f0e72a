//! # Errores del Servidor
//! src/error.rs
//!
//! Taxonomía de errores. Solo los errores de arranque (`ServerError`,
//! `ConfigError`) son fatales; todo lo demás se contiene dentro de la
//! conexión que lo produjo.

use std::io;

/// Errores que pueden ocurrir durante el parsing de un request
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// Request line ausente, vacía o con un número de tokens distinto de 3
    #[error("malformed request line")]
    MalformedRequestLine,

    /// Una línea sin LF dentro del límite de bytes permitido
    #[error("line exceeds {limit} bytes")]
    LineTooLong { limit: u64 },

    /// El stream terminó antes de la línea vacía que cierra los headers
    #[error("unexpected end of stream while reading headers")]
    UnexpectedEndOfStream,

    /// `Content-Length` no numérico o negativo
    #[error("invalid Content-Length: {0:?}")]
    InvalidContentLength(String),

    /// El body tiene menos bytes de los anunciados
    #[error("incomplete body: expected {expected} bytes, received {received}")]
    IncompleteBody { expected: u64, received: u64 },

    /// Fallo de I/O al leer del socket
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

impl ParseError {
    /// Indica si el cliente debe recibir un `400 Bad Request`.
    ///
    /// Un fallo de I/O significa que el stream está roto: no tiene sentido
    /// intentar responder.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, ParseError::Io(_))
    }
}

/// Errores del pool de workers
#[derive(Debug, thiserror::Error)]
pub enum PoolError {
    #[error("pool size and queue capacity must be >= 1 (size: {size}, queue: {queue_capacity})")]
    InvalidSize { size: usize, queue_capacity: usize },

    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[source] io::Error),

    #[error("worker pool is shut down")]
    Closed,
}

/// Errores fatales del servidor (solo ocurren al arrancar)
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to start worker pool: {0}")]
    Pool(#[from] PoolError),
}

/// Configuración inválida
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Invalid(String),
}
