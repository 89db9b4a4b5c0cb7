//! Listener adapter for the console.
//!
//! The provider calls its listeners on the UI thread while the main loop is
//! draining the [`MainLoop`](keyfetch::scheduler::MainLoop). The listeners
//! cannot borrow [`App`](crate::app::App) from there, so they turn each
//! callback into an [`AppMsg`] that the loop applies right afterwards.

use std::sync::mpsc;

use keyfetch::provider::{KeyUpdateListener, ProgressListener, ResponseHead};

/// One listener callback, as seen by the app.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppMsg {
    ProgressStart,
    ProgressStop,
    Response(ResponseHead),
    /// Raw key handed to the key listener.
    KeyUpdate(String),
    /// Display text: the raw key, or `"Error: …"`.
    Text(String),
}

/// Implements both listener traits by forwarding into a channel.
#[derive(Clone)]
pub struct AppListener {
    tx: mpsc::Sender<AppMsg>,
}

impl AppListener {
    pub fn channel() -> (Self, mpsc::Receiver<AppMsg>) {
        let (tx, rx) = mpsc::channel();
        (Self { tx }, rx)
    }

    fn send(&self, msg: AppMsg) {
        // The receiver lives as long as the main loop; after that nobody is
        // left to show the message.
        let _ = self.tx.send(msg);
    }
}

impl KeyUpdateListener for AppListener {
    fn on_key_update(&self, raw_key: &str) {
        self.send(AppMsg::KeyUpdate(raw_key.to_string()));
    }
}

impl ProgressListener for AppListener {
    fn on_response(&self, head: &ResponseHead) {
        self.send(AppMsg::Response(head.clone()));
    }

    fn on_string_response(&self, text: &str) {
        self.send(AppMsg::Text(text.to_string()));
    }

    fn on_progress_start(&self) {
        self.send(AppMsg::ProgressStart);
    }

    fn on_progress_stop(&self) {
        self.send(AppMsg::ProgressStop);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn callbacks_arrive_in_order() {
        let (listener, rx) = AppListener::channel();

        listener.on_progress_start();
        listener.on_response(&ResponseHead::new(200));
        listener.on_key_update("abc123");
        listener.on_string_response("abc123");
        listener.on_progress_stop();

        let got: Vec<AppMsg> = rx.try_iter().collect();
        assert_eq!(
            got,
            vec![
                AppMsg::ProgressStart,
                AppMsg::Response(ResponseHead::new(200)),
                AppMsg::KeyUpdate("abc123".into()),
                AppMsg::Text("abc123".into()),
                AppMsg::ProgressStop,
            ]
        );
    }

    #[test]
    fn sending_after_receiver_drop_does_not_panic() {
        let (listener, rx) = AppListener::channel();
        drop(rx);
        listener.on_progress_stop();
    }
}
