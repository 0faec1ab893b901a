use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "cart-cli")]
#[command(about = "Shopping cart for the Celeiro farm supply store")]
#[command(version = "0.1.0")]
pub struct Args {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// JSON file with the starting line items
    #[arg(short, long, global = true)]
    pub seed: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Interactive cart session (default)
    Shop,
    /// Show the cart and its totals
    Show,
    /// Run a sequence of cart actions
    Run {
        /// Actions: inc:<id>, dec:<id>, remove:<id>, coupon:<code>, clear, checkout, continue
        #[arg(required = true)]
        actions: Vec<CartAction>,
        /// Confirm `clear` without prompting
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartAction {
    Increase(u32),
    Decrease(u32),
    Remove(u32),
    Coupon(String),
    Clear,
    Checkout,
    Continue,
}

impl FromStr for CartAction {
    type Err = String;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let (verb, argument) = match input.split_once(':') {
            Some((verb, argument)) => (verb.trim(), Some(argument.trim())),
            None => (input.trim(), None),
        };

        let item_id = |argument: Option<&str>| -> Result<u32, String> {
            argument
                .ok_or_else(|| format!("'{}' needs an item id, e.g. {}:1", verb, verb))?
                .parse::<u32>()
                .map_err(|_| format!("'{}' is not a valid item id", input))
        };

        match verb.to_ascii_lowercase().as_str() {
            "inc" | "increase" => Ok(CartAction::Increase(item_id(argument)?)),
            "dec" | "decrease" => Ok(CartAction::Decrease(item_id(argument)?)),
            "remove" | "rm" => Ok(CartAction::Remove(item_id(argument)?)),
            "coupon" => Ok(CartAction::Coupon(argument.unwrap_or_default().to_string())),
            "clear" => Ok(CartAction::Clear),
            "checkout" => Ok(CartAction::Checkout),
            "continue" => Ok(CartAction::Continue),
            _ => Err(format!("Unknown action '{}'", input)),
        }
    }
}

impl fmt::Display for CartAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CartAction::Increase(id) => write!(f, "inc:{}", id),
            CartAction::Decrease(id) => write!(f, "dec:{}", id),
            CartAction::Remove(id) => write!(f, "remove:{}", id),
            CartAction::Coupon(code) => write!(f, "coupon:{}", code),
            CartAction::Clear => write!(f, "clear"),
            CartAction::Checkout => write!(f, "checkout"),
            CartAction::Continue => write!(f, "continue"),
        }
    }
}
