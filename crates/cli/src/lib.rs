//! swelab CLI
//!
//! Command-line interface for running the login page test suite and the
//! sorting comparison.

pub mod commands;
pub mod output;
