use chrono::{DateTime, Local};
use ratatui::widgets::ListState;

use crate::events::AppMsg;

/// Spinner frames shown while requests are outstanding.
const SPINNER: [char; 4] = ['|', '/', '-', '\\'];

/// How a log line is coloured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityKind {
    Info,
    Key,
    Error,
}

/// One line of the activity log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activity {
    pub at: DateTime<Local>,
    pub kind: ActivityKind,
    pub text: String,
}

pub struct App {
    /// Oldest first.
    pub activity: Vec<Activity>,
    /// List selection state for scrolling.
    pub list_state: ListState,
    /// Whether the user has requested to quit.
    pub quit: bool,
    /// Last status message.
    pub status: String,
    /// Requests started but not yet stopped or cancelled.
    pub in_flight: usize,
    /// Most recent key received.
    pub last_key: Option<String>,
    /// API version sent with every request.
    pub api_version: String,
    /// Advanced once per frame; drives the spinner.
    tick: usize,
}

impl App {
    pub fn new(api_version: impl Into<String>) -> Self {
        Self {
            activity: Vec::new(),
            list_state: ListState::default(),
            quit: false,
            status: "Press r to request a key".into(),
            in_flight: 0,
            last_key: None,
            api_version: api_version.into(),
            tick: 0,
        }
    }

    fn log(&mut self, kind: ActivityKind, text: impl Into<String>) {
        self.activity.push(Activity {
            at: Local::now(),
            kind,
            text: text.into(),
        });
    }

    /// Apply one listener callback.
    pub fn apply(&mut self, msg: AppMsg) {
        match msg {
            AppMsg::ProgressStart => {
                self.in_flight += 1;
                self.status = "Requesting ephemeral key…".into();
                let line = format!("request started (api_version={})", self.api_version);
                self.log(ActivityKind::Info, line);
            }
            AppMsg::ProgressStop => {
                self.in_flight = self.in_flight.saturating_sub(1);
                if self.in_flight == 0 {
                    self.status = "Idle".into();
                }
                self.log(ActivityKind::Info, "request finished");
            }
            AppMsg::Response(head) => {
                let line = match head.content_type {
                    Some(ct) => format!("response {} ({ct})", head.status),
                    None => format!("response {}", head.status),
                };
                self.log(ActivityKind::Info, line);
            }
            AppMsg::KeyUpdate(raw_key) => {
                self.last_key = Some(raw_key);
            }
            AppMsg::Text(text) => {
                if text.starts_with("Error: ") {
                    self.status = text.clone();
                    self.log(ActivityKind::Error, text);
                } else {
                    self.status = "Key received".into();
                    self.log(ActivityKind::Key, text);
                }
            }
        }
    }

    /// Record that `count` requests were cancelled; they will never stop.
    pub fn cancelled(&mut self, count: usize) {
        self.in_flight = self.in_flight.saturating_sub(count);
        self.status = format!("Cancelled {count} request(s)");
        self.log(ActivityKind::Info, format!("cancelled {count} outstanding request(s)"));
    }

    pub fn clear(&mut self) {
        self.activity.clear();
        self.list_state.select(None);
    }

    pub fn tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
    }

    /// Current spinner frame, or a blank while idle.
    pub fn spinner(&self) -> char {
        if self.in_flight == 0 {
            ' '
        } else {
            SPINNER[self.tick % SPINNER.len()]
        }
    }

    // -- navigation ----------------------------------------------------------

    pub fn select_next(&mut self) {
        if self.activity.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => (i + 1).min(self.activity.len() - 1),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn select_previous(&mut self) {
        if self.activity.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => i.saturating_sub(1),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn select_first(&mut self) {
        if !self.activity.is_empty() {
            self.list_state.select(Some(0));
        }
    }

    pub fn select_last(&mut self) {
        if !self.activity.is_empty() {
            self.list_state.select(Some(self.activity.len() - 1));
        }
    }
}
