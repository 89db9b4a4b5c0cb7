//! The ephemeral key provider.
//!
//! Every call to [`EphemeralKeyProvider::create_ephemeral_key`] is an
//! independent one-shot operation:
//!
//! ```text
//!  caller thread          tokio worker             UI thread (MainLoop)
//!  ─────────────          ────────────             ────────────────────
//!  on_progress_start
//!  register + spawn ───►  service request
//!                         read body
//!                         post completion  ─────►  on_response
//!                                                  on_key_update / on_string_response
//!                                                  on_progress_stop
//! ```
//!
//! [`cancel_all`](EphemeralKeyProvider::cancel_all) (also run on drop) aborts
//! every operation that has not been delivered yet; a cancelled operation
//! makes no further listener calls.

use std::sync::Arc;

use futures::future::Abortable;
use tokio::runtime::Handle;

use super::{
    InFlight, KeyError, KeyFetchResult, KeyParams, KeyService, KeyUpdateListener,
    ProgressListener, Registered, ResponseHead,
};
use crate::scheduler::MainThread;

/// What a background request produced, before it is handed to listeners.
enum Completion {
    /// The backend answered; `body` is the result of reading it as text.
    Response {
        head: ResponseHead,
        body: Result<String, KeyError>,
    },
    /// No usable response (transport failure or error status).
    Failed(KeyError),
}

impl From<Completion> for KeyFetchResult {
    fn from(completion: Completion) -> Self {
        match completion {
            Completion::Response { body, .. } => body.into(),
            Completion::Failed(err) => KeyFetchResult::Failure(err),
        }
    }
}

async fn execute(service: &dyn KeyService, params: &KeyParams) -> Completion {
    match service.create_ephemeral_key(params).await {
        Ok(response) => {
            let head = response.head().clone();
            let body = response.text().await;
            Completion::Response { head, body }
        }
        Err(err) => Completion::Failed(err),
    }
}

fn deliver(
    completion: Completion,
    key_listener: &dyn KeyUpdateListener,
    progress: &dyn ProgressListener,
) {
    match completion {
        Completion::Response { head, body } => {
            progress.on_response(&head);
            match body {
                Ok(raw_key) => {
                    key_listener.on_key_update(&raw_key);
                    progress.on_string_response(&raw_key);
                }
                // Listeners only hear about keys and request failures.
                Err(err) => {
                    tracing::warn!(status = head.status, error = %err, "discarding unreadable key response");
                }
            }
        }
        Completion::Failed(err) => {
            tracing::warn!(error = %err, "ephemeral key request failed");
            progress.on_string_response(&format!("Error: {err}"));
        }
    }
    progress.on_progress_stop();
}

/// Requests ephemeral keys in the background and reports to listeners on the
/// UI thread.
pub struct EphemeralKeyProvider {
    service: Arc<dyn KeyService>,
    progress: Arc<dyn ProgressListener>,
    runtime: Handle,
    main_thread: MainThread,
    inflight: Arc<InFlight>,
}

impl EphemeralKeyProvider {
    /// * `service` — performs the actual request.
    /// * `progress` — receives progress and display text for every request.
    /// * `runtime` — where requests run; never the UI thread.
    /// * `main_thread` — where completions are delivered.
    pub fn new(
        service: Arc<dyn KeyService>,
        progress: Arc<dyn ProgressListener>,
        runtime: Handle,
        main_thread: MainThread,
    ) -> Self {
        Self {
            service,
            progress,
            runtime,
            main_thread,
            inflight: Arc::new(InFlight::new()),
        }
    }

    /// Request a key for `api_version` and report the outcome to
    /// `key_listener` and the progress listener.
    ///
    /// `api_version` must be at least four characters; it is sent as-is.
    /// Returns immediately.
    pub fn create_ephemeral_key(&self, api_version: &str, key_listener: Arc<dyn KeyUpdateListener>) {
        let params = KeyParams::new(api_version);
        let Registered {
            id,
            handle,
            registration,
        } = self.inflight.register();

        self.progress.on_progress_start();
        tracing::debug!(?id, api_version, "dispatching ephemeral key request");

        let service = self.service.clone();
        let progress = self.progress.clone();
        let main_thread = self.main_thread.clone();
        let inflight = self.inflight.clone();

        let work = async move { execute(service.as_ref(), &params).await };

        self.runtime.spawn(async move {
            let Ok(completion) = Abortable::new(work, registration).await else {
                tracing::debug!(?id, "ephemeral key request cancelled in flight");
                return;
            };

            let delivered = main_thread.post({
                let inflight = inflight.clone();
                move || {
                    // Cancelled after the response arrived but before the UI
                    // got to it.
                    if handle.is_aborted() {
                        tracing::debug!(?id, "dropping completion of cancelled request");
                        return;
                    }
                    inflight.complete(id);
                    deliver(completion, key_listener.as_ref(), progress.as_ref());
                    tracing::debug!(?id, "ephemeral key request delivered");
                }
            });

            if !delivered {
                tracing::debug!(?id, "UI loop gone; completion dropped");
                inflight.complete(id);
            }
        });
    }

    /// Request a key and await the outcome directly, without listeners.
    ///
    /// Unlike the listener path, an unreadable body is reported as
    /// [`KeyFetchResult::Failure`]. The request is not tracked by
    /// [`cancel_all`](Self::cancel_all); drop the future to cancel it.
    pub async fn request_key(&self, api_version: &str) -> KeyFetchResult {
        let params = KeyParams::new(api_version);
        execute(self.service.as_ref(), &params).await.into()
    }

    /// Cancel every outstanding request. Returns how many were cancelled.
    pub fn cancel_all(&self) -> usize {
        let cancelled = self.inflight.cancel_all();
        if cancelled > 0 {
            tracing::info!(cancelled, "cancelled outstanding ephemeral key requests");
        }
        cancelled
    }

    /// Requests dispatched but not yet delivered.
    pub fn in_flight(&self) -> usize {
        self.inflight.len()
    }
}

impl Drop for EphemeralKeyProvider {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
