//! Library components of the `tabula` command-line tool.

pub mod config;
pub mod logging;
pub mod progress;
