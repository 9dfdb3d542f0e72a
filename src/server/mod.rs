//! # Módulo del Servidor HTTP
//! src/server/mod.rs
//!
//! 1. `tcp`: escucha en un puerto y acepta conexiones
//! 2. `pool`: pool fijo de workers con cola acotada
//! 3. `connection`: lee, parsea, despacha y responde un request por conexión

pub mod connection;
pub mod pool;
pub mod tcp;

pub use connection::{handle_connection, serve, Outcome};
pub use pool::WorkerPool;
pub use tcp::Server;
