//! Background input worker
//!
//! A named OS thread with a crossbeam stop channel. Dropping the stop sender
//! wakes the worker; the worker's exit disconnects the done channel, which
//! lets shutdown wait with a bound instead of joining blindly.

use std::io;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender, TryRecvError};
use tracing::{debug, warn};

/// Worker-side view of the stop request
pub struct StopSignal {
    stop_rx: Receiver<()>,
}

impl StopSignal {
    pub fn is_stopped(&self) -> bool {
        !matches!(self.stop_rx.try_recv(), Err(TryRecvError::Empty))
    }

    /// Sleep for up to `timeout`, waking early on stop. Returns true if stopped.
    pub fn wait(&self, timeout: Duration) -> bool {
        !matches!(self.stop_rx.recv_timeout(timeout), Err(RecvTimeoutError::Timeout))
    }
}

pub struct Worker {
    name: String,
    stop_tx: Option<Sender<()>>,
    done_rx: Receiver<()>,
    handle: Option<JoinHandle<()>>,
}

impl Worker {
    pub fn spawn<F>(name: &str, body: F) -> io::Result<Self>
    where
        F: FnOnce(StopSignal) + Send + 'static,
    {
        let (stop_tx, stop_rx) = bounded::<()>(1);
        let (done_tx, done_rx) = bounded::<()>(1);

        let handle = thread::Builder::new().name(name.to_string()).spawn(move || {
            // Held for the thread's lifetime, dropped on return or unwind
            let _done = done_tx;
            body(StopSignal { stop_rx });
        })?;

        Ok(Self {
            name: name.to_string(),
            stop_tx: Some(stop_tx),
            done_rx,
            handle: Some(handle),
        })
    }

    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, |handle| handle.is_finished())
    }

    /// Signal the worker and wait up to `timeout` for it to exit
    ///
    /// Returns false if the worker did not exit in time; its thread is then
    /// detached.
    pub fn shutdown(&mut self, timeout: Duration) -> bool {
        self.stop_tx.take();

        let Some(handle) = self.handle.take() else {
            return true;
        };

        match self.done_rx.recv_timeout(timeout) {
            Err(RecvTimeoutError::Timeout) => {
                warn!("Input worker '{}' did not stop within {:?}", self.name, timeout);
                false
            }
            _ => {
                if handle.join().is_err() {
                    warn!("Input worker '{}' panicked", self.name);
                }
                debug!("Input worker '{}' stopped", self.name);
                true
            }
        }
    }
}

impl Drop for Worker {
    fn drop(&mut self) {
        self.stop_tx.take();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_shutdown_wakes_waiting_worker() {
        let iterations = Arc::new(AtomicU32::new(0));
        let counter = iterations.clone();
        let mut worker = Worker::spawn("test-wait", move |stop| {
            while !stop.wait(Duration::from_secs(10)) {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        })
        .unwrap();

        assert!(worker.shutdown(Duration::from_millis(500)));
        assert!(worker.is_finished());
        assert_eq!(iterations.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_polling_worker_sees_stop() {
        let mut worker = Worker::spawn("test-poll", |stop| {
            while !stop.is_stopped() {
                thread::sleep(Duration::from_millis(1));
            }
        })
        .unwrap();

        assert!(worker.shutdown(Duration::from_millis(500)));
    }

    #[test]
    fn test_shutdown_is_bounded() {
        let mut worker = Worker::spawn("test-stuck", |_stop| {
            thread::sleep(Duration::from_millis(300));
        })
        .unwrap();

        assert!(!worker.shutdown(Duration::from_millis(20)));
        // Second call has nothing left to wait for
        assert!(worker.shutdown(Duration::from_millis(20)));
    }

    #[test]
    fn test_panicking_worker_is_reaped() {
        let mut worker = Worker::spawn("test-panic", |_stop| panic!("input device lost")).unwrap();
        assert!(worker.shutdown(Duration::from_millis(500)));
    }
}
