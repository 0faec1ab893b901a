use std::fs;
use std::path::Path;

use rust_decimal::Decimal;
use thiserror::Error;

use super::{
    cart::{Cart, CartBuildError},
    line_item::LineItem,
};

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid seed: {0}")]
    InvalidSeed(#[from] CartBuildError),
}

/// The storefront's starting cart.
pub fn default_items() -> Vec<LineItem> {
    vec![
        LineItem::new(1, "Premium Soybean Grains", Decimal::new(12000, 2), 2)
            .with_category("Grains & Cereals")
            .with_image("https://images.unsplash.com/photo-1603569283847-aa295f0d016a?w=100&h=120&fit=crop")
            .with_stock_label("In stock"),
        LineItem::new(2, "Quality Hay", Decimal::new(8900, 2), 1)
            .with_category("Animal Feed")
            .with_image("https://images.unsplash.com/photo-1595475038784-bbe439ff41e6?w=100&h=120&fit=crop")
            .with_stock_label("In stock"),
        LineItem::new(3, "Farm Tools Kit", Decimal::new(8900, 2), 1)
            .with_category("Tools")
            .with_image("https://images.unsplash.com/photo-1601493700631-2b16ec4b4716?w=100&h=120&fit=crop")
            .with_stock_label("Last units!"),
    ]
}

pub fn default_cart() -> Result<Cart, SeedError> {
    Ok(Cart::from_items(default_items())?)
}

/// Reads a JSON array of line items and validates it into a cart.
pub fn load_seed(path: &Path) -> Result<Cart, SeedError> {
    tracing::debug!("Loading cart seed from {}", path.display());
    let raw = fs::read_to_string(path)?;
    let items: Vec<LineItem> = serde_json::from_str(&raw)?;
    let cart = Cart::from_items(items)?;
    tracing::info!("Loaded {} line items from {}", cart.len(), path.display());
    Ok(cart)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_cart_is_valid() {
        let cart = default_cart().unwrap();
        assert_eq!(cart.len(), 3);
        assert_eq!(cart.get(3).map(|item| item.stock_label.as_str()), Some("Last units!"));
    }

    #[test]
    fn test_load_seed_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[
                {{"id": 10, "name": "Corn Seeds", "unit_price": "45.50", "quantity": 4}},
                {{"id": 11, "name": "Fence Wire", "unit_price": "210.00", "quantity": 1, "category": "Tools"}}
            ]"#
        )
        .unwrap();

        let cart = load_seed(file.path()).unwrap();
        assert_eq!(cart.len(), 2);
        assert_eq!(cart.get(10).unwrap().unit_price, Decimal::new(4550, 2));
        assert_eq!(cart.get(11).unwrap().category, "Tools");
    }

    #[test]
    fn test_load_seed_rejects_duplicates() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[
                {{"id": 1, "name": "A", "unit_price": "1.00", "quantity": 1}},
                {{"id": 1, "name": "B", "unit_price": "2.00", "quantity": 1}}
            ]"#
        )
        .unwrap();

        assert!(matches!(
            load_seed(file.path()),
            Err(SeedError::InvalidSeed(CartBuildError::DuplicateItem { item_id: 1 }))
        ));
    }

    #[test]
    fn test_load_seed_missing_file() {
        let result = load_seed(Path::new("/definitely/not/here.json"));
        assert!(matches!(result, Err(SeedError::IoError(_))));
    }
}
