//! Ephemeral key provider and the seams around it.
//!
//! This module defines the [`KeyService`] trait (how a key is fetched), the
//! two listener traits results are delivered to, and the
//! [`EphemeralKeyProvider`] that ties them together.
//!
//! ## For contributors — adding a new backend
//!
//! 1. Create a new file in this directory (e.g. `grpc.rs`).
//! 2. Define a struct holding its configuration and implement [`KeyService`]
//!    for it.
//! 3. Add `mod grpc;` below and re-export your struct in the `pub use` block.
//! 4. Construct it in `main.rs` in place of [`HttpKeyService`].
//!
//! The provider, its cancellation bookkeeping, and the UI are all
//! backend-agnostic.

mod ephemeral;
mod error;
mod http;
mod params;
mod registry;
mod response;

pub use ephemeral::EphemeralKeyProvider;
pub use error::KeyError;
pub use http::{HttpKeyService, EPHEMERAL_KEYS_ROUTE};
pub use params::{is_valid_api_version, KeyParams, API_VERSION, MIN_API_VERSION_LEN};
pub use registry::{InFlight, OperationId, Registered};
pub use response::{KeyFetchResult, KeyResponse, ResponseHead};

use async_trait::async_trait;

/// Something that can mint an ephemeral key.
///
/// The provider calls [`create_ephemeral_key`](KeyService::create_ephemeral_key)
/// from a background task, so implementations must be `Send + Sync`.
///
/// ```ignore
/// pub struct FixedKey(&'static str);
///
/// #[async_trait]
/// impl KeyService for FixedKey {
///     async fn create_ephemeral_key(&self, _: &KeyParams) -> Result<KeyResponse, KeyError> {
///         Ok(KeyResponse::buffered(ResponseHead::new(200), self.0))
///     }
/// }
/// ```
#[async_trait]
pub trait KeyService: Send + Sync {
    /// Send one key request.
    ///
    /// `Ok` means the backend accepted the request; its body is still unread.
    /// Transport failures and non-success statuses are `Err`.
    async fn create_ephemeral_key(&self, params: &KeyParams) -> Result<KeyResponse, KeyError>;
}

/// Receives the raw key after a successful request.
pub trait KeyUpdateListener: Send + Sync {
    fn on_key_update(&self, raw_key: &str);
}

/// Observes the progress of key requests and the text to show for them.
///
/// All methods are called on the UI thread except
/// [`on_progress_start`](ProgressListener::on_progress_start), which runs on
/// whichever thread issued the request.
pub trait ProgressListener: Send + Sync {
    /// A response arrived; called before its body is delivered.
    fn on_response(&self, _head: &ResponseHead) {}

    /// The raw key on success, or `"Error: <message>"` on failure.
    fn on_string_response(&self, text: &str);

    fn on_progress_start(&self);

    fn on_progress_stop(&self);
}
