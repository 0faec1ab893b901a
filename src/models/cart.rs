use std::collections::HashSet;

use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;
use validator::Validate;

use super::line_item::{LineItem, QuantityStep};

#[derive(Debug, Error)]
pub enum CartBuildError {
    #[error("Duplicate line item id: {item_id}")]
    DuplicateItem { item_id: u32 },

    #[error("Invalid line item {item_id}: {source}")]
    InvalidItem {
        item_id: u32,
        #[source]
        source: validator::ValidationErrors,
    },

    #[error("Cart subtotal exceeds the representable range")]
    SubtotalOverflow,
}

/// Ordered line items, unique by id. The subtotal always fits in a `Decimal`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a cart from records, validating each one and rejecting repeated ids.
    pub fn from_items(items: Vec<LineItem>) -> Result<Self, CartBuildError> {
        let mut seen = HashSet::with_capacity(items.len());
        for item in &items {
            item.validate()
                .map_err(|source| CartBuildError::InvalidItem {
                    item_id: item.id,
                    source,
                })?;
            if !seen.insert(item.id) {
                return Err(CartBuildError::DuplicateItem { item_id: item.id });
            }
        }

        let cart = Self { items };
        if cart.subtotal().is_none() {
            return Err(CartBuildError::SubtotalOverflow);
        }
        Ok(cart)
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn get(&self, item_id: u32) -> Option<&LineItem> {
        self.items.iter().find(|item| item.id == item_id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of line totals, `None` on overflow.
    pub fn subtotal(&self) -> Option<Decimal> {
        self.items
            .iter()
            .try_fold(Decimal::ZERO, |acc, item| acc.checked_add(item.line_total()?))
    }

    /// `None` when the id is absent; otherwise the outcome of [`LineItem::step_quantity`].
    /// An increase that would push the subtotal out of range is rolled back and
    /// reported as `Some(None)`.
    pub fn step_quantity(&mut self, item_id: u32, step: QuantityStep) -> Option<Option<bool>> {
        let index = self.items.iter().position(|item| item.id == item_id)?;
        let previous = self.items[index].quantity;
        let outcome = self.items[index].step_quantity(step);

        if outcome == Some(true) && self.subtotal().is_none() {
            self.items[index].quantity = previous;
            return Some(None);
        }
        Some(outcome)
    }

    pub fn remove(&mut self, item_id: u32) -> Option<LineItem> {
        let index = self.items.iter().position(|item| item.id == item_id)?;
        Some(self.items.remove(index))
    }

    /// Empties the cart, handing back what was in it in display order.
    pub fn clear(&mut self) -> Vec<LineItem> {
        std::mem::take(&mut self.items)
    }
}
