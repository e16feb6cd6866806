//! # parbench-cli
//!
//! Console tables, SVG charts, progress display, and shell completion.

pub mod chart;
pub mod completion;
pub mod output;
pub mod presenter;
pub mod ui;

pub use presenter::{CLIProgressReporter, CLIResultPresenter};
