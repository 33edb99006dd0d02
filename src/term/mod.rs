//! Terminal capability probing and raw-mode control.
//!
//! Capabilities are detected exactly once at startup: either the controlling
//! terminal is usable (size known, a control variant selected) or the whole
//! dashboard feature is unavailable and the host stays on plain output.
//! There is no runtime fallback chain after that decision.

pub mod guard;
#[cfg(unix)]
pub(crate) mod raw;

use std::io::{self, Write};

use crossterm::cursor::{Hide, Show};
use crossterm::execute;
use crossterm::tty::IsTty;

/// Terminal dimensions in character cells, captured once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TermSize {
    pub width: u16,
    pub height: u16,
}

/// Raw-mode control over the capability set the renderer needs.
///
/// All operations degrade silently: a failure leaves the terminal as it was
/// and must never propagate into the host.
pub trait TermControl: Send {
    /// Toggle local echo and canonical line mode.
    fn set_local_echo(&mut self, enabled: bool);
    /// Toggle text cursor visibility.
    fn set_cursor_visible(&mut self, visible: bool);
}

/// Control for a terminal with a real driver on stdin.
///
/// Echo off clears only ECHO and ICANON; ISIG is left set so Ctrl-C keeps
/// delivering SIGINT and the abnormal-exit restore handler stays reachable
/// from the keyboard. The original attributes are snapshotted at
/// construction and echo on re-applies that snapshot verbatim rather than a
/// reconstructed default.
#[derive(Debug, Default)]
pub struct TtyControl;

impl TtyControl {
    pub fn new() -> Self {
        #[cfg(unix)]
        if let Err(err) = raw::save_original() {
            tracing::debug!(%err, "could not snapshot terminal attributes");
        }
        Self
    }
}

impl TermControl for TtyControl {
    fn set_local_echo(&mut self, enabled: bool) {
        #[cfg(unix)]
        {
            let result = if enabled {
                raw::restore_original()
            } else {
                raw::disable_echo()
            };
            if let Err(err) = result {
                tracing::debug!(%err, enabled, "echo toggle failed");
            }
        }
        #[cfg(not(unix))]
        let _ = enabled;
    }

    fn set_cursor_visible(&mut self, visible: bool) {
        write_cursor_escape(visible);
    }
}

/// Control for consoles without a togglable local-echo flag.
///
/// Echo control is a no-op; the cursor visibility escapes are vendor-neutral
/// and every target honors them, so those are still emitted.
#[derive(Debug, Default)]
pub struct BasicControl;

impl TermControl for BasicControl {
    fn set_local_echo(&mut self, _enabled: bool) {}

    fn set_cursor_visible(&mut self, visible: bool) {
        write_cursor_escape(visible);
    }
}

fn write_cursor_escape(visible: bool) {
    let mut out = io::stdout();
    let result = if visible {
        execute!(out, Show)
    } else {
        execute!(out, Hide)
    };
    if let Err(err) = result.and_then(|()| out.flush()) {
        tracing::debug!(%err, visible, "cursor visibility escape failed");
    }
}

/// Probe the controlling output terminal.
///
/// Returns `None` when stdout is not a terminal, the size query fails, or a
/// dimension is zero — in every one of those cases the dashboard is simply
/// unavailable. Never panics and never returns an error.
pub fn probe() -> Option<(TermSize, Box<dyn TermControl>)> {
    if !io::stdout().is_tty() {
        tracing::debug!("stdout is not a terminal; dashboard unavailable");
        return None;
    }
    let (width, height) = crossterm::terminal::size().ok()?;
    if width == 0 || height == 0 {
        tracing::debug!(width, height, "terminal reports a zero dimension");
        return None;
    }
    let control: Box<dyn TermControl> = if io::stdin().is_tty() {
        Box::new(TtyControl::new())
    } else {
        Box::new(BasicControl)
    };
    Some((TermSize { width, height }, control))
}
