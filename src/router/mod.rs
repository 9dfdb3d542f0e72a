//! # Registro de Handlers
//! src/router/mod.rs
//!
//! Mapea `(método, path)` a handlers.
//!
//! ```text
//! RouterBuilder::register(...)  ──build()──▶  Router (inmutable)  ──Arc──▶ workers
//! ```
//!
//! Las rutas solo se pueden registrar en el `RouterBuilder`. `build()` lo
//! consume y produce un `Router` sin métodos de escritura, así que una vez
//! que el servidor empieza a aceptar conexiones la tabla ya no puede cambiar
//! y los workers la leen sin locks.

use crate::http::{Request, Response};
use std::collections::HashMap;
use std::fmt;
use std::io::{self, Write};
use std::sync::Arc;

/// Handler de una ruta
///
/// El handler es responsable de escribir una respuesta HTTP completa
/// (status line, headers y body) en `out` y de hacer `flush` antes de
/// retornar. El servidor no modifica lo que el handler escribe; si el
/// handler retorna `Err`, lo escrito se descarta y el cliente recibe un 500.
pub trait Handler: Send + Sync {
    fn handle(&self, request: &Request, out: &mut dyn Write) -> io::Result<()>;
}

impl<F> Handler for F
where
    F: Fn(&Request, &mut dyn Write) -> io::Result<()> + Send + Sync,
{
    fn handle(&self, request: &Request, out: &mut dyn Write) -> io::Result<()> {
        self(request, out)
    }
}

/// Adaptador para handlers que construyen un `Response` en vez de escribir
/// directamente
pub struct Respond<F>(F);

impl<F> Handler for Respond<F>
where
    F: Fn(&Request) -> Response + Send + Sync,
{
    fn handle(&self, request: &Request, out: &mut dyn Write) -> io::Result<()> {
        (self.0)(request).write_to(out)
    }
}

/// Envuelve un `fn(&Request) -> Response` como `Handler`
///
/// # Ejemplo
/// ```
/// use oneshot_http::router::{respond, RouterBuilder};
/// use oneshot_http::http::{Request, Response};
///
/// fn hello(_req: &Request) -> Response {
///     Response::text("hello")
/// }
///
/// let mut builder = RouterBuilder::new();
/// builder.register("GET", "/hello", respond(hello));
/// let router = builder.build();
///
/// assert!(router.lookup("GET", "/hello").is_some());
/// ```
pub fn respond<F>(f: F) -> Respond<F>
where
    F: Fn(&Request) -> Response + Send + Sync,
{
    Respond(f)
}

type Routes = HashMap<String, HashMap<String, Arc<dyn Handler>>>;

/// Acumula registros antes de arrancar el servidor
#[derive(Default)]
pub struct RouterBuilder {
    routes: Routes,
}

impl RouterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registra un handler para `(method, path)`
    ///
    /// Si ya había uno para el mismo par, se reemplaza (gana el último).
    pub fn register<H>(&mut self, method: &str, path: &str, handler: H) -> &mut Self
    where
        H: Handler + 'static,
    {
        let previous = self
            .routes
            .entry(method.to_string())
            .or_default()
            .insert(path.to_string(), Arc::new(handler));

        if previous.is_some() {
            tracing::debug!(method, path, "handler reemplazado");
        }

        self
    }

    /// Congela la tabla de rutas
    pub fn build(self) -> Router {
        Router {
            routes: self.routes,
        }
    }
}

/// Tabla de rutas inmutable, compartida entre workers
pub struct Router {
    routes: Routes,
}

impl Router {
    /// Busca el handler para `(method, path)`: coincidencia exacta y
    /// sensible a mayúsculas en ambos
    pub fn lookup(&self, method: &str, path: &str) -> Option<&dyn Handler> {
        self.routes
            .get(method)
            .and_then(|paths| paths.get(path))
            .map(|handler| &**handler)
    }

    /// Número de pares `(método, path)` registrados
    pub fn len(&self) -> usize {
        self.routes.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut routes: Vec<(&str, &str)> = self
            .routes
            .iter()
            .flat_map(|(method, paths)| {
                paths.keys().map(move |path| (method.as_str(), path.as_str()))
            })
            .collect();
        routes.sort_unstable();

        f.debug_struct("Router").field("routes", &routes).finish()
    }
}
