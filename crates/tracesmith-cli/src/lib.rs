mod args;
mod commands;
pub mod config;
mod handlers;
pub mod hook;
pub mod logging;
pub mod types;

pub use args::{Cli, Commands};
pub use commands::run;
