//! Grid layout math.
//!
//! Computed once per item-list submission and reused for every subsequent
//! single-cell repaint; individual status updates never trigger a reflow.

/// Fixed padding added to the widest cell to separate columns.
pub const LABEL_PADDING: u16 = 3;

/// Derived grid geometry. Column width is uniform across the whole board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub column_width: u16,
    pub columns: u16,
    pub rows: u16,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            column_width: LABEL_PADDING,
            columns: 1,
            rows: 0,
        }
    }
}

impl Layout {
    /// Compute the grid for cells with the given minimum widths (each
    /// `name width + 1 + status column width`) in a terminal `term_width`
    /// cells wide. A board always gets at least one column, even when the
    /// widest cell overflows the terminal.
    pub fn compute(min_widths: &[u16], term_width: u16) -> Self {
        let widest = min_widths.iter().copied().max().unwrap_or(0);
        let column_width = widest + LABEL_PADDING;
        let columns = (term_width / column_width).max(1);
        let count = min_widths.len() as u16;
        let rows = (count + columns - 1) / columns;
        Self {
            column_width,
            columns,
            rows,
        }
    }

    /// Position of the cell at `index`, filling column-major: down each
    /// column, then on to the next. Returns `(x, y)` with `x` the column
    /// origin in character cells.
    pub fn position(&self, index: usize) -> (u16, u16) {
        if self.rows == 0 {
            return (0, 0);
        }
        let index = index as u16;
        let row = index % self.rows;
        let col = index / self.rows;
        (col * self.column_width, row)
    }
}
