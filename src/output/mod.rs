//! Output module
//!
//! Exports normalized records to delimited files.

mod csv;

pub use self::csv::{write_csv, HEADER};
