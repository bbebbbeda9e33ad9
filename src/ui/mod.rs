//! UI utilities for terminal output
//!
//! Progress feedback on stderr while pages are fetched.

mod spinner;

pub use spinner::{clear_spinner, create_spinner, finish_spinner, set_spinner_message};
