use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Direction of a single quantity adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuantityStep {
    Increase,
    Decrease,
}

impl std::fmt::Display for QuantityStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QuantityStep::Increase => write!(f, "increase"),
            QuantityStep::Decrease => write!(f, "decrease"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct LineItem {
    pub id: u32,

    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    #[validate(custom = "validate_name")]
    pub name: String,

    #[validate(custom = "validate_unit_price")]
    pub unit_price: Decimal,

    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: u32,

    #[serde(default)]
    pub category: String,

    #[serde(default)]
    pub image_ref: String,

    #[serde(default)]
    pub stock_label: String,
}

fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::new("Name is required"));
    }
    Ok(())
}

/// Highest unit price a line item may carry, in reais.
pub const MAX_UNIT_PRICE: u64 = 1_000_000_000;

fn validate_unit_price(price: &Decimal) -> Result<(), ValidationError> {
    if price.is_sign_negative() && !price.is_zero() {
        return Err(ValidationError::new("unit_price_negative"));
    }
    if *price > Decimal::from(MAX_UNIT_PRICE) {
        return Err(ValidationError::new("unit_price_too_large"));
    }
    Ok(())
}

impl LineItem {
    pub fn new(id: u32, name: impl Into<String>, unit_price: Decimal, quantity: u32) -> Self {
        Self {
            id,
            name: name.into(),
            unit_price,
            quantity,
            category: String::new(),
            image_ref: String::new(),
            stock_label: String::new(),
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_image(mut self, image_ref: impl Into<String>) -> Self {
        self.image_ref = image_ref.into();
        self
    }

    pub fn with_stock_label(mut self, stock_label: impl Into<String>) -> Self {
        self.stock_label = stock_label.into();
        self
    }

    /// Price times quantity, taken from the record itself and never from rendered text.
    /// `None` when the product does not fit in a `Decimal`.
    pub fn line_total(&self) -> Option<Decimal> {
        self.unit_price.checked_mul(Decimal::from(self.quantity))
    }

    /// Applies one step and reports whether the quantity actually changed.
    /// Decreasing stops at 1; an increase whose quantity or line total would
    /// overflow is refused and leaves the item untouched.
    pub fn step_quantity(&mut self, step: QuantityStep) -> Option<bool> {
        match step {
            QuantityStep::Increase => {
                let quantity = self.quantity.checked_add(1)?;
                self.unit_price.checked_mul(Decimal::from(quantity))?;
                self.quantity = quantity;
                Some(true)
            }
            QuantityStep::Decrease if self.quantity > 1 => {
                self.quantity -= 1;
                Some(true)
            }
            QuantityStep::Decrease => Some(false),
        }
    }
}
