pub mod args;
pub mod commands;

pub use args::{Args, CartAction, Commands};
pub use commands::CliApp;
