//! Main event loop for the TUI.
//!
//! Multiplexes terminal input, shutdown signals and a periodic tick.

use crate::app::App;
use anyhow::Result;
use crossterm::{
    event::{Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::time::Duration;

#[cfg(unix)]
use tokio::signal::unix::{signal, SignalKind};

use super::input::handle_input;
use super::render::render;

/// Result of handling a key press event.
pub enum Action {
    /// Continue the event loop and process more events.
    Continue,
    /// Exit the application and restore the terminal.
    Quit,
}

/// Runs the TUI application event loop.
///
/// Uses `tokio::select!` over three sources:
/// - **Signals**: SIGTERM/SIGINT end the loop (Unix only)
/// - **Terminal input**: key presses and resizes from crossterm's event stream
/// - **Periodic tick**: 250ms timer for status expiry
///
/// A panic hook restores the terminal before unwinding so a panic never leaves
/// the shell in raw mode.
pub async fn run(app: &mut App) -> Result<()> {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let mut terminal = setup_terminal()?;
    let mut event_stream = crossterm::event::EventStream::new();
    let mut tick_interval = tokio::time::interval(Duration::from_millis(250));

    // On non-Unix platforms these become pending futures that never complete
    #[cfg(unix)]
    let mut sigterm = signal(SignalKind::terminate())?;
    #[cfg(unix)]
    let mut sigint = signal(SignalKind::interrupt())?;

    loop {
        if app.needs_redraw {
            terminal.draw(|f| render(f, app))?;
            app.needs_redraw = false;
        }

        #[cfg(unix)]
        let sigterm_fut = sigterm.recv();
        #[cfg(not(unix))]
        let sigterm_fut = std::future::pending::<Option<()>>();

        #[cfg(unix)]
        let sigint_fut = sigint.recv();
        #[cfg(not(unix))]
        let sigint_fut = std::future::pending::<Option<()>>();

        tokio::select! {
            biased;

            _ = sigterm_fut => {
                tracing::info!("Received SIGTERM, shutting down gracefully");
                break;
            }

            _ = sigint_fut => {
                tracing::info!("Received SIGINT, shutting down gracefully");
                break;
            }

            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key))) if key.kind != KeyEventKind::Release => {
                        app.needs_redraw = true;
                        match handle_input(app, key.code, key.modifiers) {
                            Ok(Action::Quit) => break,
                            Ok(Action::Continue) => {}
                            Err(e) => app.set_status(format!("Error: {}", e)),
                        }
                    }
                    Some(Ok(Event::Resize(width, height))) => {
                        tracing::debug!(width, height, "Terminal resized");
                        app.needs_redraw = true;
                    }
                    Some(Err(e)) => {
                        tracing::warn!(error = %e, "Terminal event stream error");
                    }
                    // Stream closed: no more input will ever arrive
                    None => break,
                    _ => {}
                }
            }

            _ = tick_interval.tick() => {
                if app.clear_expired_status() {
                    app.needs_redraw = true;
                }
            }
        }
    }

    restore_terminal(terminal)?;
    Ok(())
}

/// Set up the terminal for TUI rendering.
fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore terminal to normal state.
fn restore_terminal(mut terminal: Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}
