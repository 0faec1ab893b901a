use std::sync::Arc;

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use tokio_test::{assert_err, assert_ok};

use celeiro_cart::models::{
    Cart, CartBuildError, CartSummary, EffectKind, EffectTarget, LineItem, NotificationLevel, QuantityStep,
};
use celeiro_cart::services::{CartController, CartError, ClearOutcome};
use celeiro_cart::surface::{CartEvent, RecordingSurface};
use celeiro_cart::utils::Config;

fn setup(items: Vec<LineItem>) -> (CartController, Arc<RecordingSurface>) {
    let surface = Arc::new(RecordingSurface::new());
    let cart = Cart::from_items(items).expect("valid test cart");
    let controller = CartController::with_simulated_gateway(cart, &Config::default(), surface.clone());
    (controller, surface)
}

fn example_items() -> Vec<LineItem> {
    vec![
        LineItem::new(1, "Premium Soybean Grains", dec!(120.00), 2),
        LineItem::new(2, "Quality Hay", dec!(89.00), 1),
    ]
}

fn assert_totals_consistent(controller: &CartController, surface: &RecordingSurface) {
    let expected_count: u64 = controller
        .cart()
        .items()
        .iter()
        .map(|item| u64::from(item.quantity))
        .sum();
    let published = surface.last_summary().expect("summary published");

    assert_eq!(published, controller.summary());
    assert_eq!(published.item_count, expected_count);
    assert_eq!(surface.last_count(), Some(expected_count));
    assert_eq!(published.total, published.subtotal - published.discount);
    let expected_discount = if controller.coupon().applied {
        (published.subtotal * controller.coupon().discount_rate)
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    } else {
        Decimal::ZERO
    };
    assert_eq!(published.discount, expected_discount);
}

#[test]
fn test_initialize_publishes_rows_and_totals() {
    let (controller, surface) = setup(example_items());
    controller.initialize();

    let events = surface.events();
    assert!(matches!(&events[0], CartEvent::CartLoaded { items } if items.len() == 2));
    assert_eq!(surface.last_count(), Some(3));
    assert_eq!(surface.last_summary().unwrap().subtotal, dec!(329.00));
    assert!(!surface.saw_empty_state());
}

#[test]
fn test_initialize_empty_cart_shows_empty_state() {
    let (controller, surface) = setup(Vec::new());
    controller.initialize();
    assert!(surface.saw_empty_state());
    assert_eq!(surface.last_summary(), Some(CartSummary::default()));
}

#[test]
fn test_increase_quantity_republishes_totals() {
    let (mut controller, surface) = setup(example_items());

    let item = assert_ok!(controller.set_quantity(2, QuantityStep::Increase));
    assert_eq!(item.quantity, 2);
    assert!(surface
        .events()
        .iter()
        .any(|event| matches!(event, CartEvent::RowUpdated { item } if item.id == 2 && item.quantity == 2)));
    assert_eq!(surface.last_summary().unwrap().subtotal, dec!(418.00));
    assert_totals_consistent(&controller, &surface);
}

#[test]
fn test_decrease_at_one_keeps_quantity() {
    let (mut controller, surface) = setup(example_items());

    let item = assert_ok!(controller.set_quantity(2, QuantityStep::Decrease));
    assert_eq!(item.quantity, 1);
    assert_eq!(controller.cart().get(2).unwrap().quantity, 1);
    assert_totals_consistent(&controller, &surface);

    let item = assert_ok!(controller.set_quantity(1, QuantityStep::Decrease));
    assert_eq!(item.quantity, 1);
    assert_eq!(surface.last_count(), Some(2));
}

#[test]
fn test_increase_at_money_limits_is_refused() {
    let (mut controller, surface) = setup(vec![LineItem::new(
        1,
        "Harvester",
        Decimal::from(celeiro_cart::models::MAX_UNIT_PRICE),
        u32::MAX - 1,
    )]);

    let item = assert_ok!(controller.set_quantity(1, QuantityStep::Increase));
    assert_eq!(item.quantity, u32::MAX);
    assert_totals_consistent(&controller, &surface);

    let result = controller.set_quantity(1, QuantityStep::Increase);
    assert!(matches!(result, Err(CartError::Validation { ref message }) if message == "Quantity limit reached"));
    assert_eq!(controller.cart().get(1).unwrap().quantity, u32::MAX);
    assert_eq!(surface.last_notification_level(), Some(NotificationLevel::Error));
}

#[test]
fn test_oversized_price_never_reaches_controller() {
    let big = LineItem::new(1, "Big", Decimal::MAX / Decimal::from(2) + Decimal::ONE, 1);
    let error = assert_err!(Cart::from_items(vec![big]));
    assert!(matches!(error, CartBuildError::InvalidItem { item_id: 1, .. }));
}

#[test]
fn test_quantity_change_on_missing_item() {
    let (mut controller, surface) = setup(example_items());
    let before = controller.cart().clone();

    let result = controller.set_quantity(99, QuantityStep::Increase);
    assert!(matches!(result, Err(CartError::ItemNotFound { item_id: 99 })));
    assert_eq!(controller.cart(), &before);
    assert_eq!(surface.last_notification_level(), Some(NotificationLevel::Error));
    assert!(surface.last_summary().is_none());
}

#[test]
fn test_remove_item_updates_totals() {
    let (mut controller, surface) = setup(example_items());

    let removed = assert_ok!(controller.remove_item(1));
    assert_eq!(removed.name, "Premium Soybean Grains");
    assert_eq!(controller.cart().len(), 1);
    assert_eq!(surface.last_summary().unwrap().subtotal, dec!(89.00));
    assert!(!surface.saw_empty_state());
    assert_totals_consistent(&controller, &surface);
}

#[test]
fn test_removing_last_item_shows_empty_state() {
    let (mut controller, surface) = setup(vec![LineItem::new(5, "Hay", dec!(89.00), 1)]);

    assert_ok!(controller.remove_item(5));
    assert!(controller.cart().is_empty());
    assert!(surface.saw_empty_state());
    assert_eq!(surface.last_count(), Some(0));

    let plan = surface
        .events()
        .into_iter()
        .find_map(|event| match event {
            CartEvent::TransitionsScheduled(plan) => Some(plan),
            _ => None,
        })
        .expect("removal transitions published");
    assert!(plan
        .effects
        .iter()
        .any(|effect| effect.target == EffectTarget::Row(5) && effect.kind == EffectKind::FadeOutLeft));
    assert!(plan
        .effects
        .iter()
        .any(|effect| effect.target == EffectTarget::EmptyState));
}

#[test]
fn test_remove_missing_item_is_not_found() {
    let (mut controller, _surface) = setup(example_items());
    let result = controller.remove_item(42);
    assert!(matches!(result, Err(CartError::ItemNotFound { item_id: 42 })));
    assert_eq!(controller.cart().len(), 2);
}

#[test]
fn test_coupon_example_totals() {
    let (mut controller, surface) = setup(example_items());

    let summary = assert_ok!(controller.apply_coupon("CELEIRO10"));
    assert_eq!(summary.subtotal, dec!(329.00));
    assert_eq!(summary.discount, dec!(32.90));
    assert_eq!(summary.total, dec!(296.10));
    assert_eq!(surface.last_notification_level(), Some(NotificationLevel::Success));
    assert!(surface.events().iter().any(|event| matches!(
        event,
        CartEvent::CouponApplied { code, discount } if code == "CELEIRO10" && *discount == dec!(32.90)
    )));
    assert_totals_consistent(&controller, &surface);
}

#[test]
fn test_coupon_is_case_insensitive() {
    let (mut lower, _) = setup(example_items());
    let (mut upper, _) = setup(example_items());

    let from_lower = assert_ok!(lower.apply_coupon("celeiro10"));
    let from_upper = assert_ok!(upper.apply_coupon("CELEIRO10"));
    assert_eq!(from_lower, from_upper);
    assert_eq!(lower.coupon(), upper.coupon());
}

#[test]
fn test_empty_coupon_is_validation_error() {
    let (mut controller, surface) = setup(example_items());

    let result = controller.apply_coupon("   ");
    assert!(matches!(result, Err(CartError::Validation { .. })));
    assert!(!controller.coupon().applied);
    assert_eq!(surface.last_notification_level(), Some(NotificationLevel::Error));
}

#[test]
fn test_unknown_coupon_leaves_discount_at_zero() {
    let (mut controller, surface) = setup(example_items());

    let result = controller.apply_coupon("BOGUS");
    assert!(matches!(result, Err(CartError::InvalidCoupon { ref code }) if code == "BOGUS"));
    assert!(!controller.coupon().applied);
    assert_eq!(controller.summary().discount, Decimal::ZERO);
    assert_eq!(surface.last_notification_level(), Some(NotificationLevel::Error));
}

#[test]
fn test_reapplying_coupon_keeps_same_discount() {
    let (mut controller, _surface) = setup(example_items());

    let first = assert_ok!(controller.apply_coupon("CELEIRO10"));
    let second = assert_ok!(controller.apply_coupon("celeiro10"));
    assert_eq!(first, second);
}

#[test]
fn test_discount_follows_quantity_changes() {
    let (mut controller, surface) = setup(example_items());
    assert_ok!(controller.apply_coupon("CELEIRO10"));

    assert_ok!(controller.set_quantity(2, QuantityStep::Increase));
    let summary = surface.last_summary().unwrap();
    assert_eq!(summary.subtotal, dec!(418.00));
    assert_eq!(summary.discount, dec!(41.80));
    assert_eq!(summary.total, dec!(376.20));
    assert_totals_consistent(&controller, &surface);
}

#[test]
fn test_clear_on_empty_cart_is_informational() {
    let (mut controller, surface) = setup(Vec::new());
    let mut asked = false;

    let outcome = controller.clear(|| {
        asked = true;
        true
    });

    assert_eq!(outcome, ClearOutcome::AlreadyEmpty);
    assert!(!asked);
    assert_eq!(surface.len(), 1);
    assert_eq!(surface.last_notification_level(), Some(NotificationLevel::Info));
}

#[test]
fn test_clear_requires_confirmation() {
    let (mut controller, surface) = setup(example_items());

    let outcome = controller.clear(|| false);
    assert_eq!(outcome, ClearOutcome::Cancelled);
    assert_eq!(controller.cart().len(), 2);
    assert!(surface.is_empty());
}

#[test]
fn test_clear_empties_cart_and_resets_coupon() {
    let (mut controller, surface) = setup(example_items());
    assert_ok!(controller.apply_coupon("CELEIRO10"));
    surface.take();

    let outcome = controller.clear(|| true);
    assert_eq!(outcome, ClearOutcome::Cleared { removed: 2 });
    assert!(controller.cart().is_empty());
    assert!(!controller.coupon().applied);
    assert_eq!(surface.last_summary(), Some(CartSummary::default()));
    assert_eq!(surface.last_count(), Some(0));
    assert!(surface.saw_empty_state());
    assert_eq!(surface.last_notification_level(), Some(NotificationLevel::Success));
    assert_totals_consistent(&controller, &surface);

    let again = controller.clear(|| true);
    assert_eq!(again, ClearOutcome::AlreadyEmpty);
}

#[test]
fn test_continue_shopping_changes_nothing() {
    let (controller, surface) = setup(example_items());
    let before = controller.summary();

    controller.continue_shopping();

    assert_eq!(controller.summary(), before);
    assert_eq!(surface.last_notification_level(), Some(NotificationLevel::Info));
    assert!(surface
        .events()
        .iter()
        .any(|event| matches!(event, CartEvent::NavigateToProducts)));
}

#[test]
fn test_item_count_holds_across_mutations() {
    let (mut controller, surface) = setup(vec![
        LineItem::new(1, "Soy", dec!(120.00), 2),
        LineItem::new(2, "Hay", dec!(89.00), 1),
        LineItem::new(3, "Tools", dec!(89.00), 1),
    ]);

    let steps: Vec<Box<dyn Fn(&mut CartController) -> Result<(), CartError>>> = vec![
        Box::new(|c: &mut CartController| c.set_quantity(1, QuantityStep::Increase).map(|_| ())),
        Box::new(|c: &mut CartController| c.set_quantity(3, QuantityStep::Increase).map(|_| ())),
        Box::new(|c: &mut CartController| c.apply_coupon("celeiro10").map(|_| ())),
        Box::new(|c: &mut CartController| c.set_quantity(1, QuantityStep::Decrease).map(|_| ())),
        Box::new(|c: &mut CartController| c.remove_item(2).map(|_| ())),
        Box::new(|c: &mut CartController| c.set_quantity(3, QuantityStep::Decrease).map(|_| ())),
    ];

    for step in steps {
        assert_ok!(step(&mut controller));
        assert_totals_consistent(&controller, &surface);
    }

    assert_err!(controller.remove_item(2));
}
