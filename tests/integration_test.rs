//! Tests de integración para el servidor HTTP
//! tests/integration_test.rs
//!
//! Cada test levanta su propio servidor en un puerto efímero y le habla por
//! TCP con bytes crudos.

use oneshot_http::config::Config;
use oneshot_http::handlers;
use oneshot_http::http::{Request, Response};
use oneshot_http::router::{respond, Router, RouterBuilder};
use oneshot_http::server::Server;
use std::io::{Read, Write};
use std::net::{Shutdown, SocketAddr, TcpStream};
use std::thread;
use std::time::Duration;

const NOT_FOUND: &[u8] =
    b"HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n";
const BAD_REQUEST: &[u8] =
    b"HTTP/1.1 400 Bad Request\r\nContent-Length: 0\r\nConnection: close\r\n\r\n";

/// Helper: levanta un servidor con el router dado y retorna su dirección
///
/// El thread del servidor queda vivo hasta que termina el proceso de tests.
fn start_server(router: Router) -> SocketAddr {
    let mut config = Config::default();
    config.port = 0;
    config.pool_size = 8;
    config.queue_capacity = 64;

    let server = Server::bind(&config, router).expect("Failed to bind server");
    let addr = server.local_addr().expect("Failed to read local addr");
    thread::spawn(move || server.run());
    addr
}

fn start_default_server() -> SocketAddr {
    let mut builder = RouterBuilder::new();
    handlers::register_defaults(&mut builder);
    start_server(builder.build())
}

/// Helper: envía bytes crudos, cierra la escritura y lee hasta EOF
fn send_raw(addr: SocketAddr, raw: &[u8]) -> Vec<u8> {
    let mut stream = TcpStream::connect(addr).expect("Failed to connect");
    stream.set_read_timeout(Some(Duration::from_secs(5))).unwrap();
    stream.set_write_timeout(Some(Duration::from_secs(5))).unwrap();

    stream.write_all(raw).expect("Failed to send request");
    stream.flush().unwrap();
    stream.shutdown(Shutdown::Write).unwrap();

    let mut response = Vec::new();
    stream.read_to_end(&mut response).expect("Failed to read response");
    response
}

/// Helper: separa status line, headers y body de una response
fn split_response(raw: &[u8]) -> (String, Vec<(String, String)>, Vec<u8>) {
    let end = raw
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .expect("response without header terminator");
    let head = String::from_utf8(raw[..end].to_vec()).expect("non UTF-8 head");
    let body = raw[end + 4..].to_vec();

    let mut lines = head.split("\r\n");
    let status_line = lines.next().unwrap_or_default().to_string();
    let headers = lines
        .filter_map(|line| line.split_once(": "))
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect();

    (status_line, headers, body)
}

fn header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(n, _)| n == name)
        .map(|(_, v)| v.as_str())
}

#[test]
fn test_get_messages() {
    let addr = start_default_server();
    let response = send_raw(addr, b"GET /messages HTTP/1.1\r\n\r\n");

    let (status, headers, body) = split_response(&response);
    assert_eq!(status, "HTTP/1.1 200 OK");
    assert_eq!(body, b"Hello, GET!");
    assert_eq!(header(&headers, "Content-Length"), Some("11"));
    assert_eq!(header(&headers, "Connection"), Some("close"));
}

#[test]
fn test_post_messages_with_body() {
    let addr = start_default_server();
    let response = send_raw(addr, b"POST /messages HTTP/1.1\r\nContent-Length: 5\r\n\r\nhello");

    let (status, headers, body) = split_response(&response);
    assert_eq!(status, "HTTP/1.1 200 OK");
    assert_eq!(body, b"Hello, POST!");
    assert_eq!(header(&headers, "Content-Length"), Some("12"));
}

#[test]
fn test_echo_captures_exact_body() {
    let addr = start_default_server();
    let response = send_raw(
        addr,
        b"POST /echo?ignored=1 HTTP/1.1\r\nHost: test\r\nContent-Length: 5\r\n\r\nhello",
    );

    let (status, headers, body) = split_response(&response);
    assert_eq!(status, "HTTP/1.1 200 OK");
    assert_eq!(header(&headers, "Content-Length"), Some(body.len().to_string().as_str()));

    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["path"], "/echo");
    assert_eq!(json["body"], "hello");
    assert_eq!(json["headers"]["Host"], "test");
}

#[test]
fn test_unregistered_method_is_404() {
    let addr = start_default_server();
    let response = send_raw(addr, b"DELETE /messages HTTP/1.1\r\n\r\n");
    assert_eq!(response, NOT_FOUND);
}

#[test]
fn test_unregistered_path_is_404() {
    let addr = start_default_server();
    let response = send_raw(addr, b"GET /nonexistent HTTP/1.1\r\n\r\n");
    assert_eq!(response, NOT_FOUND);
}

#[test]
fn test_garbage_request_line_is_400() {
    let addr = start_default_server();
    let response = send_raw(addr, b"GARBAGE\r\n\r\n");
    assert_eq!(response, BAD_REQUEST);
}

#[test]
fn test_empty_connection_is_400() {
    let addr = start_default_server();
    let response = send_raw(addr, b"");
    assert_eq!(response, BAD_REQUEST);
}

#[test]
fn test_short_body_is_400() {
    let addr = start_default_server();
    let response = send_raw(addr, b"POST /messages HTTP/1.1\r\nContent-Length: 100\r\n\r\nhello");
    assert_eq!(response, BAD_REQUEST);
}

#[test]
fn test_invalid_content_length_is_400() {
    let addr = start_default_server();
    let response = send_raw(addr, b"POST /messages HTTP/1.1\r\nContent-Length: -1\r\n\r\n");
    assert_eq!(response, BAD_REQUEST);
}

#[test]
fn test_query_does_not_affect_routing() {
    let addr = start_default_server();

    let plain = send_raw(addr, b"GET /messages HTTP/1.1\r\n\r\n");
    let with_query = send_raw(addr, b"GET /messages?x=1 HTTP/1.1\r\n\r\n");

    assert_eq!(plain, with_query);
}

#[test]
fn test_repeated_requests_are_byte_identical() {
    let addr = start_default_server();
    let first = send_raw(addr, b"GET /messages HTTP/1.1\r\n\r\n");

    for _ in 0..5 {
        let again = send_raw(addr, b"GET /messages HTTP/1.1\r\n\r\n");
        assert_eq!(first, again);
    }
}

fn first_handler(_req: &Request) -> Response {
    Response::text("first")
}

fn second_handler(_req: &Request) -> Response {
    Response::text("second")
}

#[test]
fn test_last_registration_wins() {
    let mut builder = RouterBuilder::new();
    builder
        .register("GET", "/dup", respond(first_handler))
        .register("GET", "/dup", respond(second_handler));
    let addr = start_server(builder.build());

    let response = send_raw(addr, b"GET /dup HTTP/1.1\r\n\r\n");
    let (_, _, body) = split_response(&response);
    assert_eq!(body, b"second");
}

#[test]
fn test_server_survives_bad_requests() {
    let addr = start_default_server();

    assert_eq!(send_raw(addr, b"\x00\x01\x02garbage"), BAD_REQUEST);
    assert_eq!(send_raw(addr, b"GET / HTTP/1.1\r\nHost: a\r\n"), BAD_REQUEST);

    let response = send_raw(addr, b"GET /messages HTTP/1.1\r\n\r\n");
    let (status, _, _) = split_response(&response);
    assert_eq!(status, "HTTP/1.1 200 OK");
}

#[test]
fn test_many_concurrent_clients() {
    let addr = start_default_server();
    let expected = send_raw(addr, b"GET /messages HTTP/1.1\r\n\r\n");

    let clients: Vec<_> = (0..32)
        .map(|_| thread::spawn(move || send_raw(addr, b"GET /messages HTTP/1.1\r\n\r\n")))
        .collect();

    for client in clients {
        assert_eq!(client.join().unwrap(), expected);
    }
}
