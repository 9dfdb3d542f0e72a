//! # Servidor TCP
//! src/server/tcp.rs
//!
//! Dueño del socket de escucha. El accept loop es secuencial y corre en el
//! thread que llama a `run`; cada conexión aceptada se entrega al pool de
//! workers, que la atiende completa (lectura, despacho, escritura y cierre).

use crate::config::Config;
use crate::error::ServerError;
use crate::router::Router;
use crate::server::connection;
use crate::server::pool::WorkerPool;
use std::io;
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::Arc;

/// Servidor HTTP/1.1: una conexión, un request
pub struct Server {
    listener: TcpListener,
    router: Arc<Router>,
    pool: WorkerPool,
}

impl Server {
    /// Hace bind al puerto configurado y arranca el pool de workers
    ///
    /// Recibe el `Router` ya construido: a partir de aquí las rutas no
    /// cambian.
    ///
    /// # Errores
    ///
    /// * `ServerError::Bind` - el puerto está ocupado o no hay permisos
    /// * `ServerError::Pool` - tamaño de pool inválido o fallo al crear threads
    pub fn bind(config: &Config, router: Router) -> Result<Self, ServerError> {
        let address = config.address();
        let listener = TcpListener::bind(&address).map_err(|source| ServerError::Bind {
            address: address.clone(),
            source,
        })?;
        let pool = WorkerPool::new(config.pool_size, config.queue_capacity)?;

        tracing::info!(
            address = %address,
            pool_size = pool.size(),
            queue_capacity = pool.capacity(),
            routes = router.len(),
            "servidor escuchando"
        );

        Ok(Self {
            listener,
            router: Arc::new(router),
            pool,
        })
    }

    /// Dirección real del socket (útil con puerto 0)
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accept loop; no retorna mientras el proceso siga vivo
    ///
    /// Un error al aceptar una conexión se registra y el loop continúa.
    pub fn run(self) {
        self.serve_incoming(self.listener.incoming());
    }

    /// Despacha cada conexión aceptada; los errores de accept solo se loguean
    fn serve_incoming<I>(&self, incoming: I)
    where
        I: IntoIterator<Item = io::Result<TcpStream>>,
    {
        for stream in incoming {
            match stream {
                Ok(stream) => self.dispatch(stream),
                Err(e) => tracing::warn!(error = %e, "error al aceptar conexión"),
            }
        }
    }

    fn dispatch(&self, stream: TcpStream) {
        let router = Arc::clone(&self.router);

        // Bloquea si la cola del pool está llena
        if let Err(e) = self
            .pool
            .submit(move || connection::handle_connection(stream, &router))
        {
            tracing::error!(error = %e, "conexión descartada");
        }
    }
}
