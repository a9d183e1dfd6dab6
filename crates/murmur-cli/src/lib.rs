// Library interface for murmur-cli
// Lets integration tests reach argument parsing and the single-shot runner.

pub mod app;
pub mod commands;

pub use commands::{format_history, Cli, Command};
