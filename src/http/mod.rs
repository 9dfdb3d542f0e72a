//! # Módulo HTTP
//!
//! Implementa el subconjunto de HTTP/1.1 que necesita el servidor:
//!
//! - Parsing de un request por conexión (request line, headers, body)
//! - Construcción de responses
//! - Status codes
//!
//! Fuera de alcance: keep-alive, chunked transfer encoding, pipelining,
//! query strings y URL-decoding.
//!
//! ### Formato de Request
//!
//! ```text
//! GET /messages HTTP/1.1\r\n
//! Header-Name: Header-Value\r\n
//! \r\n
//! ```

pub mod request;
pub mod response;
pub mod status;

pub use request::Request;
pub use response::Response;
pub use status::StatusCode;
