use std::sync::{Mutex, MutexGuard};

use super::{ButtonState, CartEvent, CartSurface};
use crate::models::{CartSummary, Notification, NotificationLevel};

/// Keeps every published event in order. Used by tests and for replaying a session.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    events: Mutex<Vec<CartEvent>>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    fn guard(&self) -> MutexGuard<'_, Vec<CartEvent>> {
        self.events.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn events(&self) -> Vec<CartEvent> {
        self.guard().clone()
    }

    pub fn take(&self) -> Vec<CartEvent> {
        std::mem::take(&mut *self.guard())
    }

    pub fn len(&self) -> usize {
        self.guard().len()
    }

    pub fn is_empty(&self) -> bool {
        self.guard().is_empty()
    }

    pub fn last_summary(&self) -> Option<CartSummary> {
        self.guard().iter().rev().find_map(|event| match event {
            CartEvent::SummaryChanged(summary) => Some(*summary),
            _ => None,
        })
    }

    pub fn last_count(&self) -> Option<u64> {
        self.guard().iter().rev().find_map(|event| match event {
            CartEvent::CountChanged(count) => Some(*count),
            _ => None,
        })
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.guard()
            .iter()
            .filter_map(|event| match event {
                CartEvent::Notify(notification) => Some(notification.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn last_notification_level(&self) -> Option<NotificationLevel> {
        self.notifications().last().map(|notification| notification.level)
    }

    pub fn button_states(&self) -> Vec<ButtonState> {
        self.guard()
            .iter()
            .filter_map(|event| match event {
                CartEvent::CheckoutButton(state) => Some(*state),
                _ => None,
            })
            .collect()
    }

    pub fn saw_empty_state(&self) -> bool {
        self.guard()
            .iter()
            .any(|event| matches!(event, CartEvent::EmptyState))
    }
}

impl CartSurface for RecordingSurface {
    fn publish(&self, event: CartEvent) {
        self.guard().push(event);
    }
}
