use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Static whitelist of coupon codes. Codes are stored upper-cased and
/// matched case-insensitively after trimming.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CouponBook {
    rates: BTreeMap<String, Decimal>,
}

impl CouponBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_coupon(mut self, code: &str, rate: Decimal) -> Self {
        self.insert(code, rate);
        self
    }

    pub fn insert(&mut self, code: &str, rate: Decimal) {
        self.rates.insert(normalize_code(code), rate);
    }

    pub fn lookup(&self, code: &str) -> Option<Decimal> {
        self.rates.get(&normalize_code(code)).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Decimal)> {
        self.rates.iter().map(|(code, rate)| (code.as_str(), *rate))
    }
}

pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CouponState {
    pub applied: bool,
    pub discount_rate: Decimal,
    pub code: Option<String>,
}

impl CouponState {
    pub fn apply(&mut self, code: String, rate: Decimal) {
        self.applied = true;
        self.discount_rate = rate;
        self.code = Some(code);
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Rate in effect, zero while no coupon is applied.
    pub fn effective_rate(&self) -> Decimal {
        if self.applied {
            self.discount_rate
        } else {
            Decimal::ZERO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_lookup_is_case_insensitive() {
        let book = CouponBook::new().with_coupon("CELEIRO10", dec!(0.10));
        assert_eq!(book.lookup("celeiro10"), Some(dec!(0.10)));
        assert_eq!(book.lookup("  CeLeIrO10 "), Some(dec!(0.10)));
        assert_eq!(book.lookup("BOGUS"), None);
    }

    #[test]
    fn test_unapplied_state_has_no_rate() {
        let mut state = CouponState::default();
        assert_eq!(state.effective_rate(), Decimal::ZERO);

        state.apply("CELEIRO10".to_string(), dec!(0.10));
        assert_eq!(state.effective_rate(), dec!(0.10));

        state.reset();
        assert!(!state.applied);
        assert_eq!(state.effective_rate(), Decimal::ZERO);
    }
}
