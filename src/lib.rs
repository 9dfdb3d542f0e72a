//! # oneshot_http
//! src/lib.rs
//!
//! Servidor HTTP/1.1 mínimo: acepta conexiones TCP, parsea un único request
//! por conexión, lo despacha al handler registrado para `(método, path)` y
//! cierra la conexión.
//!
//! ## Arquitectura
//!
//! - `http`: Request, parser, Response y status codes
//! - `router`: Registro `(método, path) → handler`, inmutable al servir
//! - `server`: Accept loop, pool de workers y manejo de cada conexión
//! - `handlers`: Rutas de demostración que registra el binario
//! - `config`: Argumentos CLI y variables de entorno
//! - `logging`: Inicialización de `tracing`
//! - `error`: Taxonomía de errores
//!
//! ## Ejemplo de uso
//!
//! ```no_run
//! use oneshot_http::config::Config;
//! use oneshot_http::handlers;
//! use oneshot_http::router::RouterBuilder;
//! use oneshot_http::server::Server;
//!
//! let config = Config::default();
//! let mut builder = RouterBuilder::new();
//! handlers::register_defaults(&mut builder);
//!
//! let server = Server::bind(&config, builder.build()).expect("Error al iniciar servidor");
//! server.run();
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod http;
pub mod logging;
pub mod router;
pub mod server;
