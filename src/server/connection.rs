//! # Manejo de una Conexión
//! src/server/connection.rs
//!
//! Ciclo de vida completo de una conexión, siempre dentro de un único worker:
//!
//! ```text
//! parse ──error──▶ 400 ──────────────────────┐
//!   │                                        │
//!   ▼                                        ▼
//! lookup ──sin handler──▶ 404 ─────────────▶ close
//!   │                                        ▲
//!   └──handler──▶ buffer ──Ok──▶ socket ─────┤
//!                   └────Err──▶ 500 ─────────┘
//! ```
//!
//! El handler escribe en un buffer en memoria; al socket solo llega una
//! respuesta completa o el 500, nunca una mezcla de ambas.
//!
//! Un único request por conexión: después de responder no se lee nada más.

use crate::http::{Request, Response, StatusCode};
use crate::router::Router;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::net::{Shutdown, TcpStream};
use std::time::Instant;

/// Resultado de atender una conexión
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Un handler registrado escribió la respuesta
    Handled,

    /// No había handler: se envió 404
    NotFound,

    /// El request no se pudo parsear: se envió 400
    BadRequest,

    /// Falló la lectura del socket: no se respondió
    ReadFailed,

    /// El handler retornó error antes de tocar el socket: se envió 500
    HandlerFailed,

    /// Falló la escritura en el socket
    WriteFailed,
}

/// Atiende una conexión TCP y la cierra
///
/// El socket se cierra en todos los caminos de salida, incluido un panic
/// dentro del handler.
pub fn handle_connection(stream: TcpStream, router: &Router) {
    let start = Instant::now();
    let peer = stream
        .peer_addr()
        .map(|addr| addr.to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    tracing::debug!(peer = %peer, "conexión aceptada");

    let guard = ConnectionGuard { stream };
    let outcome = serve(BufReader::new(&guard.stream), BufWriter::new(&guard.stream), router);

    tracing::info!(
        peer = %peer,
        ?outcome,
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "conexión atendida"
    );
}

/// Núcleo del manejo de conexión, independiente del tipo de stream
///
/// Lee un request de `reader`, lo despacha y escribe la respuesta en
/// `writer`. Nunca lee más allá del request.
pub fn serve<R, W>(mut reader: R, mut writer: W, router: &Router) -> Outcome
where
    R: BufRead,
    W: Write,
{
    let request = match Request::read_from(&mut reader) {
        Ok(request) => request,
        Err(e) if e.is_client_error() => {
            tracing::debug!(error = %e, "request inválido");
            return send_error(&mut writer, StatusCode::BadRequest, Outcome::BadRequest);
        }
        Err(e) => {
            tracing::warn!(error = %e, "fallo de lectura");
            return Outcome::ReadFailed;
        }
    };

    tracing::debug!(
        method = request.method(),
        path = request.path(),
        body_len = request.body().len(),
        "request recibido"
    );

    let Some(handler) = router.lookup(request.method(), request.path()) else {
        return send_error(&mut writer, StatusCode::NotFound, Outcome::NotFound);
    };

    let mut buffer = Vec::new();
    if let Err(e) = handler.handle(&request, &mut buffer) {
        tracing::warn!(error = %e, discarded = buffer.len(), "el handler falló");
        return send_error(
            &mut writer,
            StatusCode::InternalServerError,
            Outcome::HandlerFailed,
        );
    }

    // Parte de la respuesta pudo haber salido: ya no hay forma de enviar un 500
    match writer.write_all(&buffer).and_then(|()| writer.flush()) {
        Ok(()) => Outcome::Handled,
        Err(e) => {
            tracing::warn!(error = %e, "fallo al escribir la respuesta");
            Outcome::WriteFailed
        }
    }
}

/// Envía una respuesta de error sin body; `sent` es el resultado si llega
fn send_error(writer: &mut dyn Write, status: StatusCode, sent: Outcome) -> Outcome {
    match Response::status_only(status).write_to(writer) {
        Ok(()) => sent,
        Err(e) => {
            tracing::warn!(
                error = %e,
                status = status.as_u16(),
                "no se pudo enviar la respuesta de error"
            );
            Outcome::WriteFailed
        }
    }
}

/// Cierra el socket al salir de scope
struct ConnectionGuard {
    stream: TcpStream,
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        match self.stream.shutdown(Shutdown::Both) {
            Ok(()) => tracing::trace!("conexión cerrada"),
            Err(e) if e.kind() == io::ErrorKind::NotConnected => {}
            Err(e) => tracing::debug!(error = %e, "error al cerrar la conexión"),
        }
    }
}
