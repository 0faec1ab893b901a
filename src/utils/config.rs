use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use regex::Regex;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::CouponBook;

pub const DEFAULT_COUPONS: &str = "CELEIRO10=0.10";

lazy_static::lazy_static! {
    static ref COUPON_ENTRY_REGEX: Regex =
        Regex::new(r"^\s*([A-Za-z0-9_-]+)\s*=\s*([0-9]+(?:\.[0-9]+)?)\s*$").unwrap();
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid coupon entry '{entry}', expected CODE=rate")]
    InvalidCouponEntry { entry: String },

    #[error("Coupon {code} has rate {rate}, rates must be between 0 and 1")]
    RateOutOfRange { code: String, rate: Decimal },

    #[error("{key} must be a whole number of milliseconds, got '{value}'")]
    InvalidDuration { key: String, value: String },

    #[error("{0}")]
    Invalid(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub coupons: CouponBook,
    pub processing_delay: Duration,
    pub redirect_delay: Duration,
    pub checkout_timeout: Duration,
    pub notification_ttl: Duration,
    pub seed_file: Option<PathBuf>,
    pub log_level: String,
    pub environment: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            coupons: CouponBook::new().with_coupon("CELEIRO10", Decimal::new(10, 2)),
            processing_delay: Duration::from_millis(2000),
            redirect_delay: Duration::from_millis(1500),
            checkout_timeout: Duration::from_millis(10_000),
            notification_ttl: Duration::from_millis(3000),
            seed_file: None,
            log_level: "info".to_string(),
            environment: "development".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from any key lookup, falling back to defaults for missing keys.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let coupons = match lookup("CART_COUPONS") {
            Some(raw) => parse_coupons(&raw)?,
            None => parse_coupons(DEFAULT_COUPONS)?,
        };

        let config = Config {
            coupons,
            processing_delay: millis(&lookup, "CHECKOUT_PROCESSING_MS", defaults.processing_delay)?,
            redirect_delay: millis(&lookup, "CHECKOUT_REDIRECT_MS", defaults.redirect_delay)?,
            checkout_timeout: millis(&lookup, "CHECKOUT_TIMEOUT_MS", defaults.checkout_timeout)?,
            notification_ttl: millis(&lookup, "NOTIFICATION_TTL_MS", defaults.notification_ttl)?,
            seed_file: lookup("CART_SEED_FILE")
                .filter(|path| !path.trim().is_empty())
                .map(PathBuf::from),
            log_level: lookup("LOG_LEVEL").unwrap_or(defaults.log_level),
            environment: lookup("APP_ENV").unwrap_or(defaults.environment),
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.checkout_timeout.is_zero() {
            return Err(ConfigError::Invalid(
                "CHECKOUT_TIMEOUT_MS must be greater than zero".to_string(),
            ));
        }

        if self.checkout_timeout <= self.processing_delay {
            return Err(ConfigError::Invalid(
                "CHECKOUT_TIMEOUT_MS must be larger than CHECKOUT_PROCESSING_MS".to_string(),
            ));
        }

        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

/// Parses `CODE=rate[,CODE=rate...]`. An empty string yields an empty book.
pub fn parse_coupons(raw: &str) -> Result<CouponBook, ConfigError> {
    let mut book = CouponBook::new();

    for entry in raw.split(',').filter(|entry| !entry.trim().is_empty()) {
        let captures = COUPON_ENTRY_REGEX
            .captures(entry)
            .ok_or_else(|| ConfigError::InvalidCouponEntry {
                entry: entry.trim().to_string(),
            })?;

        let code = &captures[1];
        let rate = Decimal::from_str(&captures[2]).map_err(|_| ConfigError::InvalidCouponEntry {
            entry: entry.trim().to_string(),
        })?;

        if rate > Decimal::ONE {
            return Err(ConfigError::RateOutOfRange {
                code: code.to_uppercase(),
                rate,
            });
        }

        book.insert(code, rate);
    }

    Ok(book)
}

fn millis<F>(lookup: &F, key: &str, default: Duration) -> Result<Duration, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse::<u64>()
            .map(Duration::from_millis)
            .map_err(|_| ConfigError::InvalidDuration {
                key: key.to_string(),
                value,
            }),
        None => Ok(default),
    }
}
