//! Hand-off from background tasks to the UI thread.
//!
//! Background work never touches listeners directly. Instead it posts a
//! closure through [`MainThread`]; the UI loop owns the matching [`MainLoop`]
//! and runs whatever is queued once per tick, so every callback executes on
//! the UI thread in the order it was posted.

use tokio::sync::mpsc;

/// A unit of work to run on the UI thread.
pub type UiTask = Box<dyn FnOnce() + Send + 'static>;

/// Sending half, cloned into background tasks.
#[derive(Clone)]
pub struct MainThread {
    tx: mpsc::UnboundedSender<UiTask>,
}

/// Receiving half, owned by the UI loop.
pub struct MainLoop {
    rx: mpsc::UnboundedReceiver<UiTask>,
}

/// Create a connected [`MainThread`] / [`MainLoop`] pair.
pub fn channel() -> (MainThread, MainLoop) {
    let (tx, rx) = mpsc::unbounded_channel();
    (MainThread { tx }, MainLoop { rx })
}

impl MainThread {
    /// Queue `task` for the UI thread.
    ///
    /// Returns `false` if the UI loop is gone, in which case the task is
    /// dropped without running.
    pub fn post(&self, task: impl FnOnce() + Send + 'static) -> bool {
        self.tx.send(Box::new(task)).is_ok()
    }
}

impl MainLoop {
    /// Run every task queued so far without waiting. Returns how many ran.
    pub fn run_pending(&mut self) -> usize {
        let mut ran = 0;
        while let Ok(task) = self.rx.try_recv() {
            task();
            ran += 1;
        }
        ran
    }

    /// Wait for the next task and run it.
    ///
    /// Returns `false` once every [`MainThread`] has been dropped and the
    /// queue is empty.
    pub async fn run_next(&mut self) -> bool {
        match self.rx.recv().await {
            Some(task) => {
                task();
                true
            }
            None => false,
        }
    }
}
