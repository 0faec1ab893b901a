use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::models::{CartSummary, LineItem};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("Order rejected: {reason}")]
    Rejected { reason: String },

    #[error("Order service unavailable: {0}")]
    Unavailable(String),
}

/// Snapshot of the cart handed to the order gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderDraft {
    pub lines: Vec<LineItem>,
    pub summary: CartSummary,
    pub coupon_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderReceipt {
    pub order_id: Uuid,
    pub placed_at: DateTime<Utc>,
    pub total: Decimal,
    pub item_count: u64,
}

impl OrderReceipt {
    pub fn for_draft(draft: &OrderDraft) -> Self {
        Self {
            order_id: Uuid::new_v4(),
            placed_at: Utc::now(),
            total: draft.summary.total,
            item_count: draft.summary.item_count,
        }
    }
}

/// External order submission.
#[async_trait]
pub trait OrderGateway: Send + Sync {
    async fn submit(&self, order: &OrderDraft) -> Result<OrderReceipt, GatewayError>;
}

/// Stand-in gateway: waits, then accepts every order.
pub struct SimulatedGateway {
    processing_delay: Duration,
}

impl SimulatedGateway {
    pub fn new(processing_delay: Duration) -> Self {
        Self { processing_delay }
    }
}

#[async_trait]
impl OrderGateway for SimulatedGateway {
    async fn submit(&self, order: &OrderDraft) -> Result<OrderReceipt, GatewayError> {
        debug!(
            "Simulating order submission of {} lines ({:?} latency)",
            order.lines.len(),
            self.processing_delay
        );
        tokio::time::sleep(self.processing_delay).await;
        Ok(OrderReceipt::for_draft(order))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckoutPhase {
    Idle,
    Submitting,
    Completed,
    Failed,
}

impl std::fmt::Display for CheckoutPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CheckoutPhase::Idle => write!(f, "idle"),
            CheckoutPhase::Submitting => write!(f, "submitting"),
            CheckoutPhase::Completed => write!(f, "completed"),
            CheckoutPhase::Failed => write!(f, "failed"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmissionError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error("Order submission timed out after {0:?}")]
    TimedOut(Duration),
}

/// Runs at most one order submission at a time.
pub struct CheckoutService {
    gateway: Arc<dyn OrderGateway>,
    timeout: Duration,
    in_flight: AtomicBool,
    phase: Mutex<CheckoutPhase>,
}

/// Held for the whole checkout; dropping it returns the service to `Idle`.
pub struct InFlightGuard<'a> {
    service: &'a CheckoutService,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.service.set_phase(CheckoutPhase::Idle);
        self.service.in_flight.store(false, Ordering::Release);
    }
}

impl CheckoutService {
    pub fn new(gateway: Arc<dyn OrderGateway>, timeout: Duration) -> Self {
        Self {
            gateway,
            timeout,
            in_flight: AtomicBool::new(false),
            phase: Mutex::new(CheckoutPhase::Idle),
        }
    }

    pub fn phase(&self) -> CheckoutPhase {
        *self.phase.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    fn set_phase(&self, phase: CheckoutPhase) {
        let mut current = self.phase.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        debug!("Checkout phase {} -> {}", *current, phase);
        *current = phase;
    }

    /// Claims the single checkout slot, or `None` if another checkout holds it.
    pub fn try_begin(&self) -> Option<InFlightGuard<'_>> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()?;
        self.set_phase(CheckoutPhase::Submitting);
        Some(InFlightGuard { service: self })
    }

    /// Sends the draft through the gateway, bounded by the configured timeout.
    /// The guard proves the caller owns the checkout slot.
    pub async fn submit(
        &self,
        _guard: &InFlightGuard<'_>,
        draft: &OrderDraft,
    ) -> Result<OrderReceipt, SubmissionError> {
        info!(
            "Submitting order: {} items, total {}",
            draft.summary.item_count, draft.summary.total
        );

        let outcome = match tokio::time::timeout(self.timeout, self.gateway.submit(draft)).await {
            Ok(Ok(receipt)) => Ok(receipt),
            Ok(Err(e)) => Err(SubmissionError::Gateway(e)),
            Err(_) => Err(SubmissionError::TimedOut(self.timeout)),
        };

        match &outcome {
            Ok(receipt) => {
                info!("Order {} accepted", receipt.order_id);
                self.set_phase(CheckoutPhase::Completed);
            }
            Err(e) => {
                warn!("Order submission failed: {}", e);
                self.set_phase(CheckoutPhase::Failed);
            }
        }

        outcome
    }
}
