//! # Pool de Workers
//! src/server/pool.rs
//!
//! Número fijo de threads que consumen conexiones de una cola FIFO acotada.
//!
//! ```text
//! accept loop ──submit()──▶ [ cola (capacidad N) ] ──▶ worker-0 .. worker-K
//! ```
//!
//! - `submit` bloquea mientras la cola está llena: la presión se traslada al
//!   backlog del socket del sistema operativo.
//! - Un job que hace panic se registra y el worker sigue atendiendo.
//! - Al cerrar (`shutdown` o `Drop`) los workers vacían la cola antes de
//!   terminar.

use crate::error::PoolError;
use std::any::Any;
use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};

type Job = Box<dyn FnOnce() + Send + 'static>;

struct JobQueue {
    jobs: VecDeque<Job>,
    closed: bool,
}

struct Shared {
    queue: Mutex<JobQueue>,

    /// Se notifica al encolar un job o al cerrar
    not_empty: Condvar,

    /// Se notifica al desencolar un job o al cerrar
    not_full: Condvar,

    capacity: usize,
}

impl Shared {
    // Los jobs corren fuera del lock, así que un panic nunca deja la cola
    // a medio modificar
    fn lock(&self) -> MutexGuard<'_, JobQueue> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Pool fijo de workers con cola acotada
pub struct WorkerPool {
    shared: Arc<Shared>,
    workers: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Crea el pool y arranca `size` workers (`worker-0`, `worker-1`, ...)
    ///
    /// # Errores
    ///
    /// * `InvalidSize` - `size` o `queue_capacity` es 0
    /// * `Spawn` - el sistema operativo no pudo crear un thread
    pub fn new(size: usize, queue_capacity: usize) -> Result<Self, PoolError> {
        if size == 0 || queue_capacity == 0 {
            return Err(PoolError::InvalidSize {
                size,
                queue_capacity,
            });
        }

        let shared = Arc::new(Shared {
            queue: Mutex::new(JobQueue {
                jobs: VecDeque::with_capacity(queue_capacity),
                closed: false,
            }),
            not_empty: Condvar::new(),
            not_full: Condvar::new(),
            capacity: queue_capacity,
        });

        // Si falla un spawn, el Drop del pool cierra y espera a los que ya
        // arrancaron
        let mut pool = Self {
            shared,
            workers: Vec::with_capacity(size),
        };

        for id in 0..size {
            let shared = Arc::clone(&pool.shared);
            let handle = thread::Builder::new()
                .name(format!("worker-{}", id))
                .spawn(move || worker_loop(id, shared))
                .map_err(PoolError::Spawn)?;
            pool.workers.push(handle);
        }

        tracing::debug!(size, queue_capacity, "pool de workers iniciado");
        Ok(pool)
    }

    /// Encola un job
    ///
    /// Bloquea mientras la cola esté llena. Retorna `PoolError::Closed` si el
    /// pool ya se está cerrando.
    pub fn submit<F>(&self, job: F) -> Result<(), PoolError>
    where
        F: FnOnce() + Send + 'static,
    {
        let mut queue = self.shared.lock();
        while queue.jobs.len() >= self.shared.capacity && !queue.closed {
            queue = self
                .shared
                .not_full
                .wait(queue)
                .unwrap_or_else(PoisonError::into_inner);
        }

        if queue.closed {
            return Err(PoolError::Closed);
        }

        queue.jobs.push_back(Box::new(job));
        drop(queue);

        self.shared.not_empty.notify_one();
        Ok(())
    }

    /// Número de workers
    pub fn size(&self) -> usize {
        self.workers.len()
    }

    /// Máximo de jobs en espera
    pub fn capacity(&self) -> usize {
        self.shared.capacity
    }

    /// Jobs en espera (sin contar los que ya se están ejecutando)
    pub fn queued(&self) -> usize {
        self.shared.lock().jobs.len()
    }

    /// Cierra el pool, ejecuta lo que quede en la cola y espera a los workers
    pub fn shutdown(mut self) {
        self.close_and_join();
    }

    fn close(&self) {
        self.shared.lock().closed = true;
        self.shared.not_empty.notify_all();
        self.shared.not_full.notify_all();
    }

    fn close_and_join(&mut self) {
        self.close();

        for handle in self.workers.drain(..) {
            if handle.join().is_err() {
                tracing::error!("un worker terminó con panic");
            }
        }
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.close_and_join();
    }
}

fn worker_loop(id: usize, shared: Arc<Shared>) {
    tracing::trace!(worker = id, "worker iniciado");

    loop {
        let job = {
            let mut queue = shared.lock();
            loop {
                if let Some(job) = queue.jobs.pop_front() {
                    break job;
                }
                if queue.closed {
                    tracing::trace!(worker = id, "worker terminado");
                    return;
                }
                queue = shared
                    .not_empty
                    .wait(queue)
                    .unwrap_or_else(PoisonError::into_inner);
            }
        };
        shared.not_full.notify_one();

        if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(job)) {
            tracing::error!(
                worker = id,
                panic = panic_message(&*payload),
                "job abortado por panic"
            );
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "unknown panic"
    }
}
