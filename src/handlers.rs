//! # Handlers de Demostración
//! src/handlers.rs
//!
//! Rutas que registra el binario:
//! - `GET /messages`: saludo en texto plano
//! - `POST /messages`: saludo en texto plano
//! - `POST /echo`: devuelve en JSON lo que el servidor parseó del request
//!
//! Ninguno guarda estado: el mismo request produce siempre la misma
//! respuesta.

use crate::http::{Request, Response, StatusCode};
use crate::router::{respond, RouterBuilder};
use serde::Serialize;
use std::borrow::Cow;
use std::collections::BTreeMap;

/// Registra todas las rutas de demostración
pub fn register_defaults(builder: &mut RouterBuilder) -> &mut RouterBuilder {
    builder
        .register("GET", "/messages", respond(messages_get_handler))
        .register("POST", "/messages", respond(messages_post_handler))
        .register("POST", "/echo", respond(echo_handler))
}

/// Handler para GET /messages
pub fn messages_get_handler(_req: &Request) -> Response {
    Response::text("Hello, GET!")
}

/// Handler para POST /messages
pub fn messages_post_handler(_req: &Request) -> Response {
    Response::text("Hello, POST!")
}

/// Vista serializable de un request
#[derive(Serialize)]
struct EchoBody<'a> {
    method: &'a str,
    path: &'a str,
    version: &'a str,
    /// Ordenados para que la salida sea determinista
    headers: BTreeMap<&'a str, &'a str>,
    body: Cow<'a, str>,
}

/// Handler para POST /echo
///
/// # Ejemplo de response
/// ```json
/// {
///   "method": "POST",
///   "path": "/echo",
///   "version": "HTTP/1.1",
///   "headers": {"Content-Length": "5"},
///   "body": "hello"
/// }
/// ```
pub fn echo_handler(req: &Request) -> Response {
    let echo = EchoBody {
        method: req.method(),
        path: req.path(),
        version: req.version(),
        headers: req
            .headers()
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
            .collect(),
        body: String::from_utf8_lossy(req.body()),
    };

    match serde_json::to_string_pretty(&echo) {
        Ok(body) => Response::json(&body),
        Err(e) => {
            tracing::error!(error = %e, "no se pudo serializar /echo");
            Response::status_only(StatusCode::InternalServerError)
        }
    }
}
