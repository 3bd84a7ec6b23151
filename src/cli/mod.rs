//! CLI module
//!
//! Command-line interface for running ingests.
//!
//! # Commands
//!
//! - `fetch` - Fetch every page and store it
//! - `check` - Request the first page and print its metadata
//! - `key` - Print the object key for a page

mod commands;
mod runner;

pub use commands::{Cli, Commands, RunOverrides};
pub use runner::Runner;
