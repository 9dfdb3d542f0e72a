//! # oneshot_http - Entry Point
//! src/main.rs
//!
//! Parsea la configuración, registra las rutas de demostración y sirve
//! hasta que el proceso termine.
//!
//! Códigos de salida: 1 si falla el bind, 2 si la configuración es inválida.

use oneshot_http::config::Config;
use oneshot_http::handlers;
use oneshot_http::logging;
use oneshot_http::router::RouterBuilder;
use oneshot_http::server::Server;

fn main() {
    let config = Config::new();
    logging::init(&config.log_level);

    if let Err(e) = config.validate() {
        tracing::error!(error = %e, "configuración inválida");
        std::process::exit(2);
    }
    config.log_summary();

    // Todas las rutas se registran antes del bind
    let mut builder = RouterBuilder::new();
    handlers::register_defaults(&mut builder);
    let router = builder.build();

    let server = match Server::bind(&config, router) {
        Ok(server) => server,
        Err(e) => {
            tracing::error!(error = %e, "error fatal al iniciar el servidor");
            std::process::exit(1);
        }
    };

    server.run();
}
