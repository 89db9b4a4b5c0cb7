//! keyfetch console — request ephemeral keys and watch them arrive.
//!
//! ## Architecture overview
//!
//! ```text
//! ┌──────────┐ spawn  ┌──────────┐ post() ┌──────────┐ AppMsg ┌──────────┐ draw() ┌────────┐
//! │ provider │ ─────► │  tokio   │ ─────► │ MainLoop │ ─────► │  app.rs  │ ─────► │ ui.rs  │
//! └──────────┘        │ runtime  │        │ (UI thr) │ (chan) │ (state)  │        └────────┘
//!      ▲              └──────────┘        └──────────┘        └──────────┘
//!      │ Command                                                   ▲
//!      │                                                           │ handle_key_event()
//!      │                                                      ┌──────────┐
//!      └───────────────────────────────────────────────────── │ input.rs │
//!                                                             └──────────┘
//! ```
//!
//! * **`keyfetch::provider`** — the key service, listeners, and provider.
//! * **`events`** — adapts listener callbacks into `AppMsg`s.
//! * **`app`** — owns all console state (activity log, in-flight count, …).
//! * **`ui`** — pure rendering: reads `App` state and draws widgets.
//! * **`input`** — maps key events to `App` mutations and [`Command`]s.
//! * **`main`** — wires everything together and runs the event loop.

mod app;
mod events;
mod input;
mod ui;

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use app::App;
use events::AppListener;
use input::Command;
use keyfetch::config::Config;
use keyfetch::provider::{EphemeralKeyProvider, HttpKeyService};
use keyfetch::{logging, scheduler};

// ---------------------------------------------------------------------------
// RAII terminal guard — idiomatic cleanup even on panic
// ---------------------------------------------------------------------------

/// Manages terminal raw-mode and alternate-screen lifetime via [`Drop`].
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalGuard {
    fn new() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// Install a panic hook that restores the terminal before printing the
/// panic message.
fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(info);
    }));
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let config = Config::from_env()?;
    logging::init(&config.log_path)?;
    tracing::info!(base_url = %config.base_url, api_version = %config.api_version, "starting");

    // -- background runtime (requests never run on the UI thread) ------------
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .context("cannot start async runtime")?;

    // -- provider wiring -----------------------------------------------------
    let service = HttpKeyService::new(&config.base_url)?;
    let (listener, app_rx) = AppListener::channel();
    let listener = Arc::new(listener);
    let (main_thread, mut main_loop) = scheduler::channel();
    let provider = EphemeralKeyProvider::new(
        Arc::new(service),
        listener.clone(),
        runtime.handle().clone(),
        main_thread,
    );

    install_panic_hook();
    let mut guard = TerminalGuard::new()?;
    let mut app = App::new(config.api_version.clone());

    // -- main event loop -----------------------------------------------------
    // Runs at ~10 fps (100 ms tick).  Each iteration:
    //   1. Run completions the provider posted to the UI thread.
    //   2. Apply the listener messages they produced.
    //   3. Render the UI.
    //   4. Poll for keyboard input (non-blocking, up to tick_rate).
    let tick_rate = Duration::from_millis(100);

    loop {
        // 1 + 2. Deliver completions, then fold listener output into state
        main_loop.run_pending();
        while let Ok(msg) = app_rx.try_recv() {
            app.apply(msg);
        }

        // 3. Render
        app.tick();
        guard.terminal.draw(|f| ui::draw(&mut app, f))?;

        // 4. Handle input
        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                match input::handle_key_event(&mut app, key) {
                    Some(Command::RequestKey) => {
                        provider.create_ephemeral_key(&config.api_version, listener.clone());
                    }
                    Some(Command::CancelAll) => {
                        let cancelled = provider.cancel_all();
                        app.cancelled(cancelled);
                    }
                    None => {}
                }
            }
        }

        if app.quit {
            break;
        }
    }

    // Dropping the provider cancels anything still outstanding.
    drop(provider);
    drop(guard);
    runtime.shutdown_timeout(Duration::from_secs(1));
    tracing::info!("stopped");
    Ok(())
}
