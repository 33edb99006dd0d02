//! Dashboard renderer: the grid of status cells and its repaint logic.
//!
//! Everything here runs on the queue worker thread only; the board owns its
//! writer outright and no lock guards any draw call. Production boards write
//! to stdout, tests render into a byte buffer.

pub mod layout;

use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::io::Write;

use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{Clear, ClearType};

use crate::term::{guard, TermControl, TermSize};
use crate::width::{self, WidthRule};
use layout::Layout;

/// Width of the activity column in verbose mode.
const ACTIVITY_WIDTH: u16 = 12;

/// One tracked item: a stable identity key plus a display name.
///
/// Equality and hashing use the key only; two items with the same key are
/// the same item even when their display names differ.
#[derive(Debug, Clone, Eq)]
pub struct Item {
    pub key: String,
    pub name: String,
}

impl Item {
    pub fn new(key: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
        }
    }
}

impl PartialEq for Item {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Hash for Item {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

/// Closed set of item states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Waiting,
    Running,
    Failed,
    Succeeded,
    Skipped,
}

impl Status {
    /// Every status, for sizing the status column.
    pub const ALL: [Status; 5] = [
        Status::Waiting,
        Status::Running,
        Status::Failed,
        Status::Succeeded,
        Status::Skipped,
    ];

    /// Static presentation for this status. Never mutated at runtime.
    pub fn style(self) -> StatusStyle {
        match self {
            Status::Waiting => StatusStyle {
                label: "",
                color: Color::Grey,
                bright: false,
            },
            Status::Running => StatusStyle {
                label: "\u{1f504}",
                color: Color::DarkYellow,
                bright: false,
            },
            Status::Failed => StatusStyle {
                label: "\u{274c}",
                color: Color::DarkRed,
                bright: false,
            },
            Status::Succeeded => StatusStyle {
                label: "\u{2705}",
                color: Color::DarkGreen,
                bright: false,
            },
            Status::Skipped => StatusStyle {
                label: "\u{2754}",
                color: Color::Black,
                bright: true,
            },
        }
    }
}

/// Glyph, foreground color, and intensity for one status.
#[derive(Debug, Clone, Copy)]
pub struct StatusStyle {
    pub label: &'static str,
    pub color: Color,
    pub bright: bool,
}

impl StatusStyle {
    /// Effective foreground color: crossterm folds ANSI brightness into the
    /// variant set, so the bright flag is resolved here at the draw seam.
    pub fn fg(self) -> Color {
        if !self.bright {
            return self.color;
        }
        match self.color {
            Color::Black => Color::DarkGrey,
            Color::DarkRed => Color::Red,
            Color::DarkGreen => Color::Green,
            Color::DarkYellow => Color::Yellow,
            Color::DarkBlue => Color::Blue,
            Color::DarkMagenta => Color::Magenta,
            Color::DarkCyan => Color::Cyan,
            Color::Grey => Color::White,
            other => other,
        }
    }
}

/// Mutable on-screen state for one item.
#[derive(Debug)]
struct Cell {
    name: String,
    status: Status,
    activity: Option<String>,
    x: u16,
    y: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Uninitialized,
    Active,
    Closed,
}

/// The status board.
///
/// Lifecycle is `Uninitialized -> Active -> Closed`; operations outside the
/// active phase are no-ops. `W` is the terminal writer.
pub struct Board<W: Write> {
    out: W,
    control: Box<dyn TermControl>,
    size: TermSize,
    rule: Box<dyn WidthRule>,
    verbose: bool,
    phase: Phase,
    cells: HashMap<String, Cell>,
    layout: Layout,
    status_width: u16,
    last_row: u16,
}

impl<W: Write> Board<W> {
    /// Build a board over an explicit writer and control pair.
    ///
    /// The status column is sized once here: the widest status glyph, or in
    /// verbose mode at least the fixed activity column width.
    pub fn new(
        out: W,
        size: TermSize,
        control: Box<dyn TermControl>,
        verbose: bool,
        rule: Box<dyn WidthRule>,
    ) -> Self {
        let max_label = Status::ALL
            .iter()
            .map(|s| width::str_width(s.style().label, rule.as_ref()) as u16)
            .max()
            .unwrap_or(0);
        let status_width = if verbose {
            max_label.max(ACTIVITY_WIDTH)
        } else {
            max_label
        };
        Self {
            out,
            control,
            size,
            rule,
            verbose,
            phase: Phase::Uninitialized,
            cells: HashMap::new(),
            layout: Layout::default(),
            status_width,
            last_row: 0,
        }
    }

    /// Enter the active phase: clear the screen, hide the cursor, disable
    /// echo, and arm the abnormal-exit restore hooks.
    pub fn start(&mut self) {
        if self.phase != Phase::Uninitialized {
            return;
        }
        guard::install();
        if let Err(err) = queue!(self.out, Clear(ClearType::All), ResetColor) {
            tracing::debug!(%err, "screen clear failed");
        }
        self.control.set_local_echo(false);
        self.control.set_cursor_visible(false);
        let _ = self.out.flush();
        self.phase = Phase::Active;
    }

    /// Replace the whole board with `items`, every cell starting as Waiting.
    ///
    /// Prior cells and positions are discarded wholesale; calling this again
    /// mid-run is supported and fully resets the board. Layout is computed
    /// once here and never on individual status updates.
    pub fn show_items(&mut self, items: Vec<Item>) {
        if self.phase != Phase::Active {
            return;
        }
        self.cells.clear();

        let mut min_widths = Vec::with_capacity(items.len());
        for item in &items {
            let name_width = width::str_width(&item.name, self.rule.as_ref()) as u16;
            min_widths.push(name_width + 1 + self.status_width);
        }
        self.layout = Layout::compute(&min_widths, self.size.width);
        self.last_row = self.layout.rows;

        for (i, item) in items.into_iter().enumerate() {
            let (x, y) = self.layout.position(i);
            self.cells.insert(
                item.key,
                Cell {
                    name: item.name,
                    status: Status::Waiting,
                    activity: None,
                    x,
                    y,
                },
            );
        }

        let keys: Vec<String> = self.cells.keys().cloned().collect();
        for key in keys {
            self.redraw(&key);
        }
        let _ = self.out.flush();
    }

    /// Update one item's status and repaint that cell only.
    ///
    /// An item the board is not currently showing is silently ignored; late
    /// or unknown events from the host are expected.
    pub fn set_status(&mut self, item: &Item, status: Status) {
        if self.phase != Phase::Active {
            return;
        }
        let Some(cell) = self.cells.get_mut(&item.key) else {
            return;
        };
        cell.status = status;
        cell.activity = None;
        self.redraw(&item.key);
        let _ = self.out.flush();
    }

    /// Update one item's free-text activity and repaint that cell only.
    ///
    /// The text replaces the status glyph only in verbose mode; unknown
    /// items are silently ignored.
    pub fn set_activity(&mut self, item: &Item, text: String) {
        if self.phase != Phase::Active {
            return;
        }
        let Some(cell) = self.cells.get_mut(&item.key) else {
            return;
        };
        cell.activity = Some(text);
        self.redraw(&item.key);
        let _ = self.out.flush();
    }

    /// Leave the board: park the cursor below the grid so later host output
    /// does not overwrite it, then restore cursor, echo, and colors.
    pub fn close(&mut self) {
        if self.phase == Phase::Active {
            let result = queue!(self.out, MoveTo(0, self.last_row), Print("\n"), ResetColor);
            if let Err(err) = result {
                tracing::debug!(%err, "final cursor move failed");
            }
            self.control.set_cursor_visible(true);
            self.control.set_local_echo(true);
            let _ = self.out.flush();
        }
        self.phase = Phase::Closed;
    }

    /// Current grid geometry.
    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// Screen position of an item's cell, if it is on the board.
    pub fn cell_position(&self, item: &Item) -> Option<(u16, u16)> {
        self.cells.get(&item.key).map(|cell| (cell.x, cell.y))
    }

    /// The underlying writer, for hosts capturing output.
    pub fn writer(&self) -> &W {
        &self.out
    }

    /// Repaint one cell: erase its column-width region, write the label
    /// right-aligned against the right edge of the status column, then the
    /// name one column after it.
    fn redraw(&mut self, key: &str) {
        let Some(cell) = self.cells.get(key) else {
            return;
        };
        let style = cell.status.style();
        let raw = if self.verbose {
            cell.activity.as_deref().unwrap_or(style.label)
        } else {
            style.label
        };
        let label = fit_label(raw, self.status_width as usize, self.rule.as_ref());
        let label_width = width::str_width(&label, self.rule.as_ref()) as u16;
        let blank = " ".repeat(self.layout.column_width as usize);
        let label_x = cell.x + self.status_width.saturating_sub(label_width);
        let name_x = cell.x + self.status_width + 1;
        let result = queue!(
            self.out,
            MoveTo(cell.x, cell.y),
            Print(blank),
            MoveTo(label_x, cell.y),
            SetForegroundColor(style.fg()),
            Print(label),
            MoveTo(name_x, cell.y),
            Print(&cell.name),
            ResetColor,
        );
        if let Err(err) = result {
            tracing::debug!(%err, key, "cell repaint failed");
        }
    }
}

/// Fit `label` into `max` columns, keeping at least the first character and
/// marking any cut with a trailing ellipsis.
fn fit_label(label: &str, max: usize, rule: &dyn WidthRule) -> String {
    if width::str_width(label, rule) <= max {
        return label.to_string();
    }
    let budget = max.saturating_sub(1);
    let mut out = String::new();
    let mut used = 0;
    for c in label.chars() {
        let w = rule.char_width(c);
        if !out.is_empty() && used + w > budget {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('\u{2026}');
    out
}
