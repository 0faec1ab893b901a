pub mod memory;
pub mod terminal;

pub use memory::RecordingSurface;
pub use terminal::TerminalSurface;

use crate::{
    models::{CartSummary, LineItem, Notification, TransitionPlan},
    services::checkout_service::OrderReceipt,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonState {
    Ready,
    /// Disabled while an order is being submitted.
    Busy,
}

/// Everything the controller tells the page after a change.
#[derive(Debug, Clone, PartialEq)]
pub enum CartEvent {
    CartLoaded { items: Vec<LineItem> },
    RowUpdated { item: LineItem },
    TransitionsScheduled(TransitionPlan),
    CountChanged(u64),
    SummaryChanged(CartSummary),
    CouponApplied { code: String, discount: rust_decimal::Decimal },
    EmptyState,
    CheckoutButton(ButtonState),
    OrderConfirmed(OrderReceipt),
    Notify(Notification),
    NavigateToProducts,
}

/// Rendering target the cart controller writes into.
pub trait CartSurface: Send + Sync {
    fn publish(&self, event: CartEvent);
}
