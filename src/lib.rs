pub mod models;
pub mod services;
pub mod surface;
pub mod cli;
pub mod utils;

pub use anyhow::{Error, Result};
