//! # Parsing de Requests HTTP/1.1
//! src/http/request.rs
//!
//! Parser de un único request por conexión, leído directamente del socket
//! a través de un `BufRead`.
//!
//! ## Formato de un Request
//!
//! ```text
//! POST /messages?draft=1 HTTP/1.1\r\n
//! Host: localhost:9999\r\n
//! Content-Length: 5\r\n
//! \r\n
//! hello
//! ```
//!
//! ## Componentes
//!
//! 1. **Request Line**: `METHOD TARGET VERSION`, separados por un espacio
//! 2. **Headers**: Pares `Name: Value` hasta la línea vacía
//! 3. **Body**: Exactamente `Content-Length` bytes (o vacío si no hay header)
//!
//! La query (`?...`) se descarta: no participa en el enrutamiento y no se
//! parsea.

use crate::error::ParseError;
use std::collections::HashMap;
use std::io::{BufRead, Read};

/// Largo máximo de una línea (request line o header), terminador incluido
pub const MAX_LINE_LEN: u64 = 8192;

/// Request HTTP parseado. Inmutable una vez construido.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// Método tal como llegó (no se valida contra una lista conocida)
    method: String,

    /// Path sin la query
    path: String,

    /// Versión tal como llegó (ej: "HTTP/1.1")
    version: String,

    /// Headers con el nombre tal como llegó; en duplicados gana el último
    headers: HashMap<String, String>,

    body: Vec<u8>,
}

impl Request {
    /// Construye un request directamente (útil para probar handlers)
    pub fn new(
        method: impl Into<String>,
        path: impl Into<String>,
        headers: HashMap<String, String>,
        body: Vec<u8>,
    ) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            version: "HTTP/1.1".to_string(),
            headers,
            body,
        }
    }

    /// Parsea un request completo desde un buffer en memoria
    ///
    /// # Ejemplo
    ///
    /// ```
    /// use oneshot_http::http::Request;
    ///
    /// let raw = b"GET /messages?last=10 HTTP/1.1\r\nHost: localhost\r\n\r\n";
    /// let request = Request::parse(raw).unwrap();
    ///
    /// assert_eq!(request.method(), "GET");
    /// assert_eq!(request.path(), "/messages");
    /// assert_eq!(request.header("Host"), Some("localhost"));
    /// ```
    pub fn parse(buffer: &[u8]) -> Result<Self, ParseError> {
        let mut reader = buffer;
        Self::read_from(&mut reader)
    }

    /// Lee y parsea un request desde un stream
    ///
    /// Consume exactamente la request line, los headers, la línea vacía y
    /// `Content-Length` bytes de body. Nunca lee más allá del body.
    ///
    /// # Errores
    ///
    /// * `MalformedRequestLine` - EOF inmediato, línea vacía o != 3 tokens
    /// * `LineTooLong` - una línea supera `MAX_LINE_LEN` bytes
    /// * `UnexpectedEndOfStream` - EOF antes de la línea vacía de headers
    /// * `InvalidContentLength` - `Content-Length` no es un entero >= 0
    /// * `IncompleteBody` - el stream termina antes de completar el body
    /// * `Io` - fallo de lectura del socket
    pub fn read_from<R: BufRead>(reader: &mut R) -> Result<Self, ParseError> {
        let line = match read_line(reader)? {
            Some(line) if !line.is_empty() => line,
            _ => return Err(ParseError::MalformedRequestLine),
        };
        let line = String::from_utf8(line).map_err(|_| ParseError::MalformedRequestLine)?;

        let (method, path, version) = parse_request_line(&line)?;
        let headers = parse_headers(reader)?;
        let body = match content_length(&headers)? {
            Some(expected) => read_body(reader, expected)?,
            None => Vec::new(),
        };

        Ok(Request {
            method,
            path,
            version,
            headers,
            body,
        })
    }

    // === Acceso a los campos ===

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Obtiene un header por nombre exacto (sensible a mayúsculas)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(|s| s.as_str())
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Body como texto, si es UTF-8 válido
    pub fn body_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.body).ok()
    }
}

/// Lee una línea terminada en LF y le quita el `\n` (y un `\r` previo).
///
/// Retorna `None` si el stream ya estaba en EOF. Una última línea sin
/// terminador se devuelve tal cual. Nunca lee más de `MAX_LINE_LEN` bytes.
fn read_line<R: BufRead>(reader: &mut R) -> Result<Option<Vec<u8>>, ParseError> {
    let mut line = Vec::new();
    let read = reader.by_ref().take(MAX_LINE_LEN).read_until(b'\n', &mut line)?;
    if read == 0 {
        return Ok(None);
    }

    if read as u64 == MAX_LINE_LEN && line.last() != Some(&b'\n') {
        return Err(ParseError::LineTooLong { limit: MAX_LINE_LEN });
    }

    if line.last() == Some(&b'\n') {
        line.pop();
        if line.last() == Some(&b'\r') {
            line.pop();
        }
    }

    Ok(Some(line))
}

/// Formato: `METHOD TARGET VERSION`, separados por un único espacio
fn parse_request_line(line: &str) -> Result<(String, String, String), ParseError> {
    let parts: Vec<&str> = line.split(' ').collect();

    let &[method, target, version] = parts.as_slice() else {
        return Err(ParseError::MalformedRequestLine);
    };

    // Dos espacios seguidos producen un token vacío
    if method.is_empty() || target.is_empty() || version.is_empty() {
        return Err(ParseError::MalformedRequestLine);
    }

    let path = match target.split_once('?') {
        Some((path, _query)) => path,
        None => target,
    };

    Ok((method.to_string(), path.to_string(), version.to_string()))
}

fn parse_headers<R: BufRead>(reader: &mut R) -> Result<HashMap<String, String>, ParseError> {
    let mut headers = HashMap::new();

    loop {
        let line = read_line(reader)?.ok_or(ParseError::UnexpectedEndOfStream)?;
        if line.is_empty() {
            break;
        }

        let line = String::from_utf8_lossy(&line);
        match line.split_once(':') {
            Some((name, value)) => {
                headers.insert(name.trim().to_string(), value.trim().to_string());
            }
            None => tracing::debug!(line = %line, "header sin ':' ignorado"),
        }
    }

    Ok(headers)
}

/// Busca `Content-Length` sin distinguir mayúsculas y lo parsea
fn content_length(headers: &HashMap<String, String>) -> Result<Option<u64>, ParseError> {
    let value = headers.get("Content-Length").or_else(|| {
        headers
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
            .map(|(_, value)| value)
    });

    value
        .map(|v| {
            // `u64::from_str` acepta un `+` inicial; aquí solo dígitos
            if v.is_empty() || !v.bytes().all(|b| b.is_ascii_digit()) {
                return Err(ParseError::InvalidContentLength(v.clone()));
            }
            v.parse::<u64>()
                .map_err(|_| ParseError::InvalidContentLength(v.clone()))
        })
        .transpose()
}

fn read_body<R: BufRead>(reader: &mut R, expected: u64) -> Result<Vec<u8>, ParseError> {
    let mut body = Vec::new();
    let received = reader.by_ref().take(expected).read_to_end(&mut body)? as u64;

    if received < expected {
        return Err(ParseError::IncompleteBody { expected, received });
    }

    Ok(body)
}
