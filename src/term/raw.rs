//! POSIX terminal-attribute handling.
//!
//! Only local echo and canonical line mode are touched: ISIG stays set so
//! Ctrl-C still delivers SIGINT and the restore handler in [`super::guard`]
//! remains reachable from the keyboard, and OPOST stays set so output
//! processing is unchanged. The original attributes are snapshotted once,
//! before the first toggle, and re-applied verbatim on restore.

use std::io;
use std::mem;
use std::sync::OnceLock;

static SAVED: OnceLock<libc::termios> = OnceLock::new();

fn attrs() -> io::Result<libc::termios> {
    unsafe {
        let mut tios = mem::zeroed();
        if libc::tcgetattr(libc::STDIN_FILENO, &mut tios) != 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(tios)
    }
}

fn apply(tios: &libc::termios) -> io::Result<()> {
    let rc = unsafe { libc::tcsetattr(libc::STDIN_FILENO, libc::TCSAFLUSH, tios) };
    if rc != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

fn strip_echo_flags(lflag: libc::tcflag_t) -> libc::tcflag_t {
    lflag & !(libc::ICANON | libc::ECHO)
}

/// Snapshot the current attributes as the originals to restore to. Only the
/// first call records anything; later calls are no-ops.
pub(crate) fn save_original() -> io::Result<()> {
    if SAVED.get().is_none() {
        let tios = attrs()?;
        let _ = SAVED.set(tios);
    }
    Ok(())
}

/// Turn off local echo and canonical line mode, leaving every other flag as
/// the user had it.
pub(crate) fn disable_echo() -> io::Result<()> {
    save_original()?;
    let mut tios = attrs()?;
    tios.c_lflag = strip_echo_flags(tios.c_lflag);
    apply(&tios)
}

/// Re-apply the attributes saved by [`save_original`], verbatim. A no-op if
/// nothing was ever saved.
pub(crate) fn restore_original() -> io::Result<()> {
    match SAVED.get() {
        Some(tios) => apply(tios),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn echo_off_leaves_signal_generation_enabled() {
        let lflag = libc::ISIG | libc::ICANON | libc::ECHO | libc::IEXTEN;
        let stripped = strip_echo_flags(lflag);
        assert_eq!(stripped & libc::ISIG, libc::ISIG);
        assert_eq!(stripped & libc::IEXTEN, libc::IEXTEN);
        assert_eq!(stripped & (libc::ICANON | libc::ECHO), 0);
    }

    #[test]
    fn restore_without_a_snapshot_is_a_noop() {
        // Nothing saved in this process unless a board ran on a real tty.
        if SAVED.get().is_none() {
            assert!(restore_original().is_ok());
        }
    }
}
