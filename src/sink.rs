//! Stray-output sink.
//!
//! While the board owns the screen, anything the host would normally print
//! corrupts the grid. A [`Sink`] is an explicit, session-scoped writer the
//! host threads its logging path through instead of a process-wide stream
//! swap; it defaults to discarding and can be redirected at any time.

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

/// Cloneable, thread-safe writer handle.
#[derive(Clone)]
pub struct Sink {
    target: Arc<Mutex<Box<dyn Write + Send>>>,
}

impl Sink {
    /// A sink that swallows everything. This is the default.
    pub fn discard() -> Self {
        Self::writer(io::sink())
    }

    /// A sink backed by `writer`.
    pub fn writer(writer: impl Write + Send + 'static) -> Self {
        Self {
            target: Arc::new(Mutex::new(Box::new(writer))),
        }
    }

    /// Point this sink (and every clone of it) at a new target.
    pub fn redirect(&self, writer: impl Write + Send + 'static) {
        if let Ok(mut target) = self.target.lock() {
            *target = Box::new(writer);
        }
    }
}

impl Default for Sink {
    fn default() -> Self {
        Self::discard()
    }
}

impl Write for Sink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self.target.lock() {
            Ok(mut target) => target.write(buf),
            // A poisoned sink still swallows; logging must never fail the host.
            Err(_) => Ok(buf.len()),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.target.lock() {
            Ok(mut target) => target.flush(),
            Err(_) => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn default_sink_discards() {
        let mut sink = Sink::default();
        assert_eq!(sink.write(b"noise").unwrap(), 5);
    }

    #[test]
    fn clones_share_a_redirect() {
        let buf = SharedBuf::default();
        let sink = Sink::discard();
        let mut clone = sink.clone();

        clone.write_all(b"dropped").unwrap();
        sink.redirect(buf.clone());
        clone.write_all(b"kept").unwrap();

        assert_eq!(&*buf.0.lock().unwrap(), b"kept");
    }
}
