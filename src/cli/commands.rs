use std::sync::Arc;

use anyhow::{Context, Result};
use console::{style, Emoji};
use dialoguer::{Confirm, Input, Select, theme::ColorfulTheme};
use tracing::{debug, error, info, warn};

use crate::{
    cli::args::*,
    models::{seed, Cart, QuantityStep},
    services::{CartController, CartError, ClearOutcome},
    surface::{CartSurface, TerminalSurface},
    utils::{formatting::{format_cart_table, format_summary}, Config},
};

static WAVE: Emoji<'_, '_> = Emoji("👋 ", "");
static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", "");

const MENU: &[&str] = &[
    "Increase quantity",
    "Decrease quantity",
    "Remove item",
    "Apply coupon",
    "Clear cart",
    "Checkout",
    "Continue shopping",
    "Show cart",
    "Quit",
];

pub struct CliApp {
    controller: CartController,
}

impl CliApp {
    pub fn new(config: &Config, seed_override: Option<std::path::PathBuf>) -> Result<Self> {
        let cart = load_cart(config, seed_override)?;
        let surface: Arc<dyn CartSurface> = Arc::new(TerminalSurface::new());
        let controller = CartController::with_simulated_gateway(cart, config, surface);
        Ok(Self { controller })
    }

    pub async fn run(&mut self, command: Commands) -> Result<()> {
        match command {
            Commands::Shop => self.handle_shop().await,
            Commands::Show => self.handle_show(),
            Commands::Run { actions, yes } => self.handle_run(actions, yes).await,
        }
    }

    fn handle_show(&self) -> Result<()> {
        self.controller.initialize();
        Ok(())
    }

    async fn handle_run(&mut self, actions: Vec<CartAction>, yes: bool) -> Result<()> {
        self.controller.initialize();

        for action in actions {
            info!("Running action {}", action);
            println!("{} {}", ROCKET, style(&action).bold());
            let result = match action {
                CartAction::Increase(id) => self.controller.set_quantity(id, QuantityStep::Increase).map(|_| ()),
                CartAction::Decrease(id) => self.controller.set_quantity(id, QuantityStep::Decrease).map(|_| ()),
                CartAction::Remove(id) => self.controller.remove_item(id).map(|_| ()),
                CartAction::Coupon(code) => self.controller.apply_coupon(&code).map(|_| ()),
                CartAction::Clear => {
                    let outcome = self.controller.clear(|| yes || confirm_clear());
                    debug!("Clear outcome: {:?}", outcome);
                    Ok(())
                }
                CartAction::Checkout => self.controller.checkout().await.map(|_| ()),
                CartAction::Continue => {
                    self.controller.continue_shopping();
                    Ok(())
                }
            };
            log_failure(result);
        }

        Ok(())
    }

    async fn handle_shop(&mut self) -> Result<()> {
        self.controller.initialize();
        let theme = ColorfulTheme::default();

        loop {
            let choice = Select::with_theme(&theme)
                .with_prompt("What would you like to do?")
                .items(MENU)
                .default(0)
                .interact()
                .context("Failed to read menu selection")?;

            let result = match choice {
                0 => match self.pick_item(&theme)? {
                    Some(id) => self.controller.set_quantity(id, QuantityStep::Increase).map(|_| ()),
                    None => Ok(()),
                },
                1 => match self.pick_item(&theme)? {
                    Some(id) => self.controller.set_quantity(id, QuantityStep::Decrease).map(|_| ()),
                    None => Ok(()),
                },
                2 => match self.pick_item(&theme)? {
                    Some(id) => self.controller.remove_item(id).map(|_| ()),
                    None => Ok(()),
                },
                3 => {
                    let code: String = Input::with_theme(&theme)
                        .with_prompt("Coupon code")
                        .allow_empty(true)
                        .interact_text()
                        .context("Failed to read coupon code")?;
                    self.controller.apply_coupon(&code).map(|_| ())
                }
                4 => {
                    let outcome = self.controller.clear(confirm_clear);
                    if outcome == ClearOutcome::Cancelled {
                        println!("Cart clear cancelled");
                    }
                    Ok(())
                }
                5 => self.controller.checkout().await.map(|_| ()),
                6 => {
                    self.controller.continue_shopping();
                    Ok(())
                }
                7 => {
                    print_cart(&self.controller);
                    Ok(())
                }
                _ => {
                    println!("{} See you soon!", WAVE);
                    return Ok(());
                }
            };
            log_failure(result);
        }
    }

    fn pick_item(&self, theme: &ColorfulTheme) -> Result<Option<u32>> {
        let items = self.controller.cart().items();
        if items.is_empty() {
            println!("{}", style("Your cart is empty").dim());
            return Ok(None);
        }

        let labels: Vec<String> = items
            .iter()
            .map(|item| format!("#{} {} (x{})", item.id, item.name, item.quantity))
            .collect();

        let index = Select::with_theme(theme)
            .with_prompt("Which item?")
            .items(labels.as_slice())
            .default(0)
            .interact()
            .context("Failed to read item selection")?;

        Ok(items.get(index).map(|item| item.id))
    }
}

fn load_cart(config: &Config, seed_override: Option<std::path::PathBuf>) -> Result<Cart> {
    match seed_override.or_else(|| config.seed_file.clone()) {
        Some(path) => seed::load_seed(&path)
            .with_context(|| format!("Failed to load cart seed from {}", path.display())),
        None => seed::default_cart().context("Built-in cart seed is invalid"),
    }
}

fn confirm_clear() -> bool {
    let answer = Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt("Are you sure you want to clear your cart?")
        .default(false)
        .interact();
    confirmed(answer)
}

/// A prompt that could not be read counts as a refusal.
fn confirmed(answer: dialoguer::Result<bool>) -> bool {
    match answer {
        Ok(answer) => answer,
        Err(e) => {
            warn!("Could not read clear confirmation, keeping the cart: {}", e);
            false
        }
    }
}

fn print_cart(controller: &CartController) {
    let cart = controller.cart();
    if cart.is_empty() {
        println!("{}", style("Your cart is empty").dim());
    } else {
        println!("{}", format_cart_table(cart.items()));
    }
    print!(
        "{}",
        format_summary(&controller.summary(), controller.coupon().code.as_deref())
    );
}

/// The surface has already shown the shopper what went wrong.
fn log_failure(result: Result<(), CartError>) {
    if let Err(e) = result {
        error!("Cart action failed: {}", e);
    }
}
