//! CLI module - REPL and commands

pub mod commands;
pub mod repl;

pub use commands::{handle_command, CommandResult};
pub use repl::Repl;
