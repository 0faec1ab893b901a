use console::{style, Emoji};

use super::{ButtonState, CartEvent, CartSurface};
use crate::{
    models::NotificationLevel,
    utils::formatting::{format_brl, format_cart_table, format_compact_summary, format_item_count, format_row, format_summary},
};

static CHECKMARK: Emoji<'_, '_> = Emoji("✅ ", "");
static CROSS: Emoji<'_, '_> = Emoji("❌ ", "");
static INFO: Emoji<'_, '_> = Emoji("ℹ️ ", "");
static CART: Emoji<'_, '_> = Emoji("🛒 ", "");
static HOURGLASS: Emoji<'_, '_> = Emoji("⏳ ", "");
static PACKAGE: Emoji<'_, '_> = Emoji("📦 ", "");

/// Prints cart events to stdout.
#[derive(Debug, Default)]
pub struct TerminalSurface;

impl TerminalSurface {
    pub fn new() -> Self {
        Self
    }
}

impl CartSurface for TerminalSurface {
    fn publish(&self, event: CartEvent) {
        match event {
            CartEvent::CartLoaded { items } => {
                println!("{} {}", CART, style("Your Cart").bold().cyan());
                if !items.is_empty() {
                    println!("{}", format_cart_table(&items));
                }
            }
            CartEvent::RowUpdated { item } => {
                println!("{}", format_row(&item));
            }
            CartEvent::TransitionsScheduled(plan) => {
                tracing::debug!(
                    "{} transition effects scheduled over {:?}",
                    plan.effects.len(),
                    plan.duration()
                );
            }
            CartEvent::CountChanged(count) => {
                tracing::debug!("Cart count badge: {}", format_item_count(count));
            }
            CartEvent::SummaryChanged(summary) => {
                print!("{}", format_summary(&summary, None));
                println!("{}", style(format_compact_summary(&summary)).dim());
            }
            CartEvent::CouponApplied { code, discount } => {
                println!(
                    "Coupon {}: {}",
                    style(code).green(),
                    style(format!("- {}", format_brl(discount))).green()
                );
            }
            CartEvent::EmptyState => {
                println!("{} {}", CART, style("Your cart is empty").bold());
                println!("How about taking a look at our products?");
            }
            CartEvent::CheckoutButton(ButtonState::Busy) => {
                println!("{} {}", HOURGLASS, style("Processing...").yellow());
            }
            CartEvent::CheckoutButton(ButtonState::Ready) => {
                tracing::debug!("Checkout button ready");
            }
            CartEvent::OrderConfirmed(receipt) => {
                println!(
                    "{} Order {} completed! You will receive a confirmation e-mail shortly.",
                    PACKAGE,
                    style(receipt.order_id).cyan()
                );
                println!(
                    "Total charged: {} for {}",
                    style(format_brl(receipt.total)).bold(),
                    format_item_count(receipt.item_count)
                );
            }
            CartEvent::Notify(notification) => match notification.level {
                NotificationLevel::Success => {
                    println!("{} {}", CHECKMARK, style(notification.message).green())
                }
                NotificationLevel::Error => {
                    println!("{} {}", CROSS, style(notification.message).red())
                }
                NotificationLevel::Info => {
                    println!("{} {}", INFO, style(notification.message).cyan())
                }
            },
            CartEvent::NavigateToProducts => {
                tracing::info!("Navigation to products requested");
            }
        }
    }
}
