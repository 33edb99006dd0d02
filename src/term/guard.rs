//! Restore-on-abnormal-exit safety net.
//!
//! The board hides the cursor and disables echo for the whole run; if the
//! process dies before `close()` the user's shell would be left in a broken
//! input mode. The hooks installed here re-show the cursor, restore the
//! saved terminal attributes, and reset colors on panics and on Ctrl-C.
//! `Board::close` performs the same restoration on the normal path.

use std::io;
use std::panic;
use std::sync::Once;

use crossterm::cursor::Show;
use crossterm::execute;
use crossterm::style::ResetColor;

static INSTALL: Once = Once::new();

/// Put the terminal back into a usable state: cursor shown, original input
/// attributes restored, colors reset. Safe to call repeatedly and from any
/// thread; errors are swallowed since there is nothing left to do with them.
pub fn restore_terminal() {
    #[cfg(unix)]
    let _ = super::raw::restore_original();
    let _ = execute!(io::stdout(), Show, ResetColor);
}

/// Arm the abnormal-exit hooks. Idempotent.
///
/// The panic hook chains to whatever hook was installed before it, so panic
/// reports still print — just onto a working terminal.
pub fn install() {
    INSTALL.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            restore_terminal();
            previous(info);
        }));

        if let Err(err) = ctrlc::set_handler(|| {
            restore_terminal();
            std::process::exit(130);
        }) {
            tracing::debug!(%err, "ctrl-c restore handler unavailable");
        }
    });
}
