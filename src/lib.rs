//! keyfetch — request short-lived ephemeral keys from a backend.
//!
//! ## Architecture overview
//!
//! ```text
//! ┌────────────┐ spawn  ┌──────────────┐ post()  ┌────────────┐
//! │  provider  │ ─────► │ tokio worker │ ──────► │ scheduler  │ ──► listeners
//! │ (UI thread)│        │ (KeyService) │         │ (MainLoop) │     (UI thread)
//! └────────────┘        └──────────────┘         └────────────┘
//! ```
//!
//! * **`provider`** — the [`KeyService`](provider::KeyService) seam, its HTTP
//!   implementation, the listener traits, and
//!   [`EphemeralKeyProvider`](provider::EphemeralKeyProvider).
//! * **`scheduler`** — hands completions from background tasks back to the UI
//!   thread.
//! * **`config`** — command-line / environment configuration for the console.
//! * **`logging`** — file-backed `tracing` setup (the console owns stdout).

pub mod config;
pub mod logging;
pub mod provider;
pub mod scheduler;
