//! statusgrid — a live, in-place-updating terminal status board.
//!
//! A fixed set of named items is tiled into a grid on the terminal and each
//! cell is repainted in place as its status changes, with no scrolling and
//! no flicker. Arbitrary producer threads report updates; a single worker
//! thread performs every terminal write.
//!
//! Entry point: [`Dashboard::initialize`], which probes the terminal once
//! and returns `None` when the dashboard cannot run, leaving the host on
//! plain output.

pub mod board;
pub mod queue;
pub mod session;
pub mod sink;
pub mod term;
pub mod width;

pub use board::{Item, Status};
pub use session::{Dashboard, DashboardOptions};
pub use sink::Sink;
