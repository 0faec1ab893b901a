use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    models::{
        Cart, CartBuildError, CartSummary, CouponBook, CouponState, LineItem, Notification,
        NotificationLevel, QuantityStep, TransitionPlan, normalize_code,
    },
    services::checkout_service::{
        CheckoutPhase, CheckoutService, OrderDraft, OrderGateway, OrderReceipt, SimulatedGateway,
        SubmissionError,
    },
    surface::{ButtonState, CartEvent, CartSurface},
    utils::Config,
};

#[derive(Error, Debug)]
pub enum CartError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Item {item_id} is not in the cart")]
    ItemNotFound { item_id: u32 },

    #[error("Invalid or expired coupon: {code}")]
    InvalidCoupon { code: String },

    #[error("Checkout already in progress")]
    CheckoutInProgress,

    #[error("Checkout failed: {reason}")]
    CheckoutFailed { reason: String },

    #[error("Checkout timed out after {after:?}")]
    CheckoutTimedOut { after: Duration },

    #[error("Invalid cart: {0}")]
    InvalidCart(#[from] CartBuildError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearOutcome {
    AlreadyEmpty,
    Cancelled,
    Cleared { removed: usize },
}

/// Owns the cart and coupon state and keeps the surface in sync with them.
///
/// Mutations take `&mut self`; [`CartController::checkout`] takes `&self`, so
/// the cart cannot change underneath an order that is being submitted.
pub struct CartController {
    cart: Cart,
    coupon: CouponState,
    coupons: CouponBook,
    checkout: CheckoutService,
    surface: Arc<dyn CartSurface>,
    notification_ttl: Duration,
    redirect_delay: Duration,
}

impl CartController {
    pub fn new(
        cart: Cart,
        config: &Config,
        surface: Arc<dyn CartSurface>,
        gateway: Arc<dyn OrderGateway>,
    ) -> Self {
        Self {
            cart,
            coupon: CouponState::default(),
            coupons: config.coupons.clone(),
            checkout: CheckoutService::new(gateway, config.checkout_timeout),
            surface,
            notification_ttl: config.notification_ttl,
            redirect_delay: config.redirect_delay,
        }
    }

    pub fn with_simulated_gateway(cart: Cart, config: &Config, surface: Arc<dyn CartSurface>) -> Self {
        let gateway = Arc::new(SimulatedGateway::new(config.processing_delay));
        Self::new(cart, config, surface, gateway)
    }

    /// Publishes the starting rows and totals.
    pub fn initialize(&self) {
        self.surface.publish(CartEvent::CartLoaded {
            items: self.cart.items().to_vec(),
        });
        self.publish_totals();
        if self.cart.is_empty() {
            self.surface.publish(CartEvent::EmptyState);
        }
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn coupon(&self) -> &CouponState {
        &self.coupon
    }

    pub fn summary(&self) -> CartSummary {
        CartSummary::compute(&self.cart, &self.coupon)
    }

    pub fn checkout_phase(&self) -> CheckoutPhase {
        self.checkout.phase()
    }

    pub fn is_checkout_in_flight(&self) -> bool {
        self.checkout.is_in_flight()
    }

    pub fn set_quantity(&mut self, item_id: u32, step: QuantityStep) -> Result<LineItem, CartError> {
        debug!("Quantity {} requested for item {}", step, item_id);

        let changed = match self.cart.step_quantity(item_id, step) {
            Some(Some(changed)) => changed,
            Some(None) => {
                return Err(self.reject(CartError::Validation {
                    message: "Quantity limit reached".to_string(),
                }));
            }
            None => return Err(self.reject(CartError::ItemNotFound { item_id })),
        };

        let item = self
            .cart
            .get(item_id)
            .cloned()
            .ok_or(CartError::ItemNotFound { item_id })?;

        if changed {
            info!("Item {} quantity is now {}", item_id, item.quantity);
        } else {
            debug!("Item {} already at minimum quantity", item_id);
        }

        self.surface.publish(CartEvent::RowUpdated { item: item.clone() });
        self.publish_totals();
        Ok(item)
    }

    pub fn remove_item(&mut self, item_id: u32) -> Result<LineItem, CartError> {
        let removed = match self.cart.remove(item_id) {
            Some(item) => item,
            None => return Err(self.reject(CartError::ItemNotFound { item_id })),
        };
        info!("Removed item {} ({})", removed.id, removed.name);

        let now_empty = self.cart.is_empty();
        self.surface.publish(CartEvent::TransitionsScheduled(TransitionPlan::remove_row(
            item_id, now_empty,
        )));
        self.publish_totals();
        if now_empty {
            self.surface.publish(CartEvent::EmptyState);
        }

        Ok(removed)
    }

    pub fn apply_coupon(&mut self, code: &str) -> Result<CartSummary, CartError> {
        let code = normalize_code(code);
        if code.is_empty() {
            return Err(self.reject(CartError::Validation {
                message: "Please enter a coupon code.".to_string(),
            }));
        }

        info!("Applying coupon {}", code);
        let rate = match self.coupons.lookup(&code) {
            Some(rate) => rate,
            None => return Err(self.reject(CartError::InvalidCoupon { code })),
        };

        if self.coupon.applied {
            debug!("Coupon already applied, replacing with {}", code);
        }
        self.coupon.apply(code.clone(), rate);

        let summary = self.summary();
        self.surface.publish(CartEvent::CouponApplied {
            code,
            discount: summary.discount,
        });
        self.publish_totals();
        self.notify(NotificationLevel::Success, "Coupon applied successfully!");
        Ok(summary)
    }

    /// Empties the cart once `confirm` agrees. Confirmation is not asked for
    /// when there is nothing to clear.
    pub fn clear<F>(&mut self, confirm: F) -> ClearOutcome
    where
        F: FnOnce() -> bool,
    {
        if self.cart.is_empty() {
            self.notify(NotificationLevel::Info, "Your cart is already empty.");
            return ClearOutcome::AlreadyEmpty;
        }

        if !confirm() {
            debug!("Cart clear cancelled");
            return ClearOutcome::Cancelled;
        }

        let removed = self.cart.clear();
        self.coupon.reset();
        let ids: Vec<u32> = removed.iter().map(|item| item.id).collect();
        info!("Cleared {} line items from cart", removed.len());

        self.surface
            .publish(CartEvent::TransitionsScheduled(TransitionPlan::clear_rows(&ids)));
        self.publish_totals();
        self.surface.publish(CartEvent::EmptyState);
        self.notify(NotificationLevel::Success, "Cart cleared successfully.");

        ClearOutcome::Cleared {
            removed: removed.len(),
        }
    }

    /// Submits the current cart as an order. Only one checkout may run at a
    /// time; the button is busy for its whole duration.
    pub async fn checkout(&self) -> Result<OrderReceipt, CartError> {
        if self.cart.is_empty() {
            return Err(self.reject(CartError::Validation {
                message: "Your cart is empty. Add products before checking out.".to_string(),
            }));
        }

        let guard = match self.checkout.try_begin() {
            Some(guard) => guard,
            None => return Err(self.reject(CartError::CheckoutInProgress)),
        };

        self.surface.publish(CartEvent::CheckoutButton(ButtonState::Busy));

        let draft = OrderDraft {
            lines: self.cart.items().to_vec(),
            summary: self.summary(),
            coupon_code: self.coupon.code.clone(),
        };

        let result = match self.checkout.submit(&guard, &draft).await {
            Ok(receipt) => {
                self.notify(NotificationLevel::Success, "Order placed successfully! Redirecting...");
                tokio::time::sleep(self.redirect_delay).await;
                self.surface.publish(CartEvent::OrderConfirmed(receipt.clone()));
                Ok(receipt)
            }
            Err(SubmissionError::TimedOut(after)) => {
                Err(self.reject(CartError::CheckoutTimedOut { after }))
            }
            Err(SubmissionError::Gateway(e)) => Err(self.reject(CartError::CheckoutFailed {
                reason: e.to_string(),
            })),
        };

        self.surface.publish(CartEvent::CheckoutButton(ButtonState::Ready));
        drop(guard);
        result
    }

    pub fn continue_shopping(&self) {
        info!("Shopper chose to keep browsing");
        self.notify(NotificationLevel::Info, "Redirecting to the products page...");
        self.surface.publish(CartEvent::NavigateToProducts);
    }

    fn publish_totals(&self) {
        let summary = self.summary();
        self.surface.publish(CartEvent::CountChanged(summary.item_count));
        self.surface.publish(CartEvent::SummaryChanged(summary));
    }

    fn notify(&self, level: NotificationLevel, message: &str) {
        self.surface.publish(CartEvent::Notify(Notification::new(
            level,
            message,
            self.notification_ttl,
        )));
    }

    /// Logs the error, shows it to the shopper and hands it back to the caller.
    fn reject(&self, error: CartError) -> CartError {
        warn!("Cart operation rejected: {}", error);
        let message = match &error {
            CartError::Validation { message } => message.clone(),
            CartError::InvalidCoupon { .. } => "Invalid or expired coupon.".to_string(),
            CartError::ItemNotFound { .. } => "That item is no longer in your cart.".to_string(),
            CartError::CheckoutInProgress => "Your order is already being processed.".to_string(),
            CartError::CheckoutFailed { .. } | CartError::CheckoutTimedOut { .. } => {
                "We could not place your order. Please try again.".to_string()
            }
            CartError::InvalidCart(e) => e.to_string(),
        };
        self.notify(NotificationLevel::Error, &message);
        error
    }
}
