//! Host-facing dashboard session.
//!
//! Producers on any thread report through here; exactly one worker thread
//! owns the [`Board`] and performs every terminal write. Calls are
//! asynchronous with respect to the caller except for backpressure on a
//! full queue, and [`Dashboard::shutdown`], which blocks until drained.

use std::io::{self, Write};

use crate::board::{Board, Item, Status};
use crate::queue::ActionQueue;
use crate::sink::Sink;
use crate::term::{TermControl, TermSize};
use crate::width::{SymbolRule, WidthRule};

/// Session configuration.
pub struct DashboardOptions {
    /// Show per-item activity text instead of the status glyph.
    pub verbose: bool,
    /// Width rule applied to every measurement this run.
    pub rule: Box<dyn WidthRule>,
    /// Where stray host output goes while the board owns the screen.
    pub stray: Sink,
}

impl Default for DashboardOptions {
    fn default() -> Self {
        Self {
            verbose: false,
            rule: Box::new(SymbolRule),
            stray: Sink::discard(),
        }
    }
}

impl DashboardOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

enum Command {
    Start,
    ShowItems(Vec<Item>),
    SetStatus(Item, Status),
    SetActivity(Item, String),
    Close,
}

/// A live dashboard session.
///
/// Obtained from [`Dashboard::initialize`]; `None` there means no usable
/// terminal, and the host should stay on plain output.
pub struct Dashboard {
    queue: ActionQueue<Command>,
    stray: Sink,
}

impl Dashboard {
    /// Probe the terminal and, when it is usable, start the render worker.
    ///
    /// The probe runs on the caller's thread so availability is known
    /// immediately; everything after this executes on the worker.
    pub fn initialize(options: DashboardOptions) -> Option<Self> {
        let (size, control) = crate::term::probe()?;
        Some(Self::with_terminal(size, control, io::stdout(), options))
    }

    /// Start a session over an explicit terminal: size, control, and writer.
    ///
    /// This skips the probe; hosts use it to render into a capture buffer.
    /// [`Dashboard::initialize`] is the probing entry point for a real
    /// terminal.
    pub fn with_terminal<W>(
        size: TermSize,
        control: Box<dyn TermControl>,
        out: W,
        options: DashboardOptions,
    ) -> Self
    where
        W: Write + Send + 'static,
    {
        let DashboardOptions {
            verbose,
            rule,
            stray,
        } = options;
        let mut board = Board::new(out, size, control, verbose, rule);
        let queue = ActionQueue::start(move |command| match command {
            Command::Start => board.start(),
            Command::ShowItems(items) => board.show_items(items),
            Command::SetStatus(item, status) => board.set_status(&item, status),
            Command::SetActivity(item, text) => board.set_activity(&item, text),
            Command::Close => board.close(),
        });
        queue.submit(Command::Start);
        Self { queue, stray }
    }

    /// Display `items` as a fresh grid, every cell Waiting.
    ///
    /// Calling this again mid-run is supported and fully resets the board:
    /// prior cells and positions are discarded.
    pub fn show_items(&self, items: Vec<Item>) {
        self.queue.submit(Command::ShowItems(items));
    }

    /// Report a status transition. Items the board is not showing are
    /// silently ignored.
    pub fn report_status(&self, item: Item, status: Status) {
        self.queue.submit(Command::SetStatus(item, status));
    }

    /// Report free-text activity for an item (rendered only in verbose
    /// mode). Unknown items are silently ignored.
    pub fn report_activity(&self, item: Item, text: impl Into<String>) {
        self.queue.submit(Command::SetActivity(item, text.into()));
    }

    /// Writer for stray host output while the board owns the screen.
    pub fn stray_sink(&self) -> Sink {
        self.stray.clone()
    }

    /// Close the board and wait for every queued action to be drawn.
    ///
    /// Everything submitted before this call executes first; reports after
    /// it are safe no-ops.
    pub fn shutdown(mut self) {
        self.queue.submit(Command::Close);
        self.queue.stop();
    }
}
