//! Debounced relayout on container resize.
//!
//! - Width notifications are sent over a flume channel to one worker thread
//! - A burst of notifications is coalesced: every new width restarts the
//!   quiet window and replaces the pending one
//! - When the window elapses the layout is recomputed for the latest width
//!   and swapped in as a whole

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use flume::{Receiver, RecvTimeoutError, Sender};
use parking_lot::RwLock;
use tracing::{debug, trace, warn};

use crate::layout::{CachedLayoutComputer, JustifiedLayout};
use crate::models::{Image, Layout};

/// Measured size of the grid container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContainerMetrics {
    /// Outer width of the container in pixels.
    pub offset_width: f64,
    /// Horizontal padding inside the container.
    pub padding_inline: f64,
}

impl ContainerMetrics {
    pub fn new(offset_width: f64, padding_inline: f64) -> Self {
        Self {
            offset_width,
            padding_inline,
        }
    }

    /// Width available to the rows.
    pub fn content_width(&self) -> f64 {
        self.offset_width - self.padding_inline
    }
}

/// Callback invoked on the worker thread after each relayout.
pub type LayoutCallback = Box<dyn Fn(&Arc<Layout>) + Send + 'static>;

/// Re-runs the layout for the latest container width after resizes settle.
pub struct RelayoutScheduler {
    /// Sender for width notifications; dropped on shutdown.
    width_tx: Option<Sender<f64>>,
    worker: Option<JoinHandle<()>>,
    /// The displayed layout, replaced atomically.
    current: Arc<RwLock<Arc<Layout>>>,
    /// Number of completed relayouts.
    generation: Arc<AtomicU64>,
}

impl RelayoutScheduler {
    /// Starts the worker for `images`, laid out with `layout`.
    pub fn spawn<F>(
        images: Vec<Image>,
        layout: JustifiedLayout,
        quiet_window: Duration,
        on_layout: F,
    ) -> std::io::Result<Self>
    where
        F: Fn(&Arc<Layout>) + Send + 'static,
    {
        let (width_tx, width_rx) = flume::unbounded();
        let current = Arc::new(RwLock::new(Arc::new(Vec::new())));
        let generation = Arc::new(AtomicU64::new(0));

        let worker = {
            let current = Arc::clone(&current);
            let generation = Arc::clone(&generation);
            let computer = CachedLayoutComputer::with_layout(layout);
            let on_layout: LayoutCallback = Box::new(on_layout);
            thread::Builder::new()
                .name("relayout".to_string())
                .spawn(move || {
                    worker_loop(
                        width_rx,
                        quiet_window,
                        images,
                        computer,
                        current,
                        generation,
                        on_layout,
                    );
                })?
        };

        debug!(?quiet_window, "Started relayout worker");

        Ok(Self {
            width_tx: Some(width_tx),
            worker: Some(worker),
            current,
            generation,
        })
    }

    /// Reports a new container width. Cheap; the relayout runs later.
    pub fn notify_width(&self, container_width: f64) {
        let Some(tx) = &self.width_tx else {
            warn!(container_width, "Relayout worker stopped, ignoring resize");
            return;
        };
        if tx.send(container_width).is_err() {
            warn!(container_width, "Relayout worker disconnected");
        }
    }

    /// Reports new container metrics; padding is subtracted from the width.
    pub fn notify_resize(&self, metrics: ContainerMetrics) {
        self.notify_width(metrics.content_width());
    }

    /// The most recently completed layout. Empty until the first relayout.
    pub fn current(&self) -> Arc<Layout> {
        Arc::clone(&self.current.read())
    }

    /// Number of relayouts completed so far.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Stops the worker. A relayout still waiting out its quiet window is dropped.
    pub fn shutdown(&mut self) {
        // Disconnecting the channel wakes the worker.
        self.width_tx.take();
        if let Some(handle) = self.worker.take() {
            if handle.join().is_err() {
                warn!("Relayout worker panicked");
            }
            debug!("Relayout worker stopped");
        }
    }
}

impl Drop for RelayoutScheduler {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Worker thread loop.
fn worker_loop(
    rx: Receiver<f64>,
    quiet_window: Duration,
    images: Vec<Image>,
    computer: CachedLayoutComputer,
    current: Arc<RwLock<Arc<Layout>>>,
    generation: Arc<AtomicU64>,
    on_layout: LayoutCallback,
) {
    // Block until the first notification of a burst.
    while let Ok(mut width) = rx.recv() {
        let mut coalesced = 0usize;

        loop {
            match rx.recv_timeout(quiet_window) {
                Ok(next) => {
                    trace!(width = next, "Resize restarted quiet window");
                    width = next;
                    coalesced += 1;
                }
                Err(RecvTimeoutError::Timeout) => break,
                Err(RecvTimeoutError::Disconnected) => return,
            }
        }

        let rows = computer.compute(&images, width);
        *current.write() = Arc::clone(&rows);
        let completed = generation.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(
            width,
            coalesced,
            rows = rows.len(),
            generation = completed,
            "Applied relayout"
        );
        on_layout(&rows);
    }
}
