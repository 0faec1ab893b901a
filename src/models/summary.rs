use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::{cart::Cart, coupon::CouponState};

/// Derived totals. Always recomputed from the cart and coupon, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CartSummary {
    pub subtotal: Decimal,
    pub discount: Decimal,
    pub total: Decimal,
    pub item_count: u64,
}

impl CartSummary {
    pub fn compute(cart: &Cart, coupon: &CouponState) -> Self {
        // A `Cart` never holds an out-of-range subtotal; see `Cart::from_items`.
        let subtotal = cart.subtotal().unwrap_or(Decimal::MAX);
        let item_count = item_count(cart);
        let discount = discount_for(subtotal, coupon);

        Self {
            subtotal,
            discount,
            total: subtotal.saturating_sub(discount),
            item_count,
        }
    }

    pub fn has_discount(&self) -> bool {
        !self.discount.is_zero()
    }
}

pub fn item_count(cart: &Cart) -> u64 {
    cart.items().iter().map(|item| u64::from(item.quantity)).sum()
}

/// Discount in cents, rounded half away from zero.
pub fn discount_for(subtotal: Decimal, coupon: &CouponState) -> Decimal {
    if !coupon.applied {
        return Decimal::ZERO;
    }
    subtotal
        .saturating_mul(coupon.discount_rate)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
