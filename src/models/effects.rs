//! Timed transition effects.
//!
//! A mutation happens at once; the row animations that accompany it are
//! described here as data and handed to the surface, which is free to play
//! them back or ignore them.

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const ROW_FADE_DURATION: Duration = Duration::from_millis(500);
pub const ROW_STAGGER: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectTarget {
    Row(u32),
    Summary,
    EmptyState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectKind {
    FadeOutLeft,
    Detach,
    FadeIn,
    Refresh,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionEffect {
    pub target: EffectTarget,
    pub kind: EffectKind,
    /// Offset from the moment the plan is published.
    pub delay: Duration,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionPlan {
    pub effects: Vec<TransitionEffect>,
}

impl TransitionPlan {
    fn push(&mut self, target: EffectTarget, kind: EffectKind, delay: Duration) {
        self.effects.push(TransitionEffect { target, kind, delay });
    }

    /// Single row: fade out, then detach once the fade has played.
    pub fn remove_row(item_id: u32, leaves_cart_empty: bool) -> Self {
        let mut plan = Self::default();
        plan.push(EffectTarget::Row(item_id), EffectKind::FadeOutLeft, Duration::ZERO);
        plan.push(EffectTarget::Row(item_id), EffectKind::Detach, ROW_FADE_DURATION);
        plan.push(EffectTarget::Summary, EffectKind::Refresh, ROW_FADE_DURATION);
        if leaves_cart_empty {
            plan.push(EffectTarget::EmptyState, EffectKind::FadeIn, ROW_FADE_DURATION);
        }
        plan
    }

    /// Whole cart: rows fade one after another, summary and empty state
    /// land after the last row is gone.
    pub fn clear_rows(item_ids: &[u32]) -> Self {
        let mut plan = Self::default();
        for (index, id) in item_ids.iter().enumerate() {
            let start = ROW_STAGGER * index as u32;
            plan.push(EffectTarget::Row(*id), EffectKind::FadeOutLeft, start);
            plan.push(EffectTarget::Row(*id), EffectKind::Detach, start + ROW_FADE_DURATION);
        }
        let settle = ROW_STAGGER * item_ids.len() as u32 + ROW_FADE_DURATION;
        plan.push(EffectTarget::Summary, EffectKind::Refresh, settle);
        plan.push(EffectTarget::EmptyState, EffectKind::FadeIn, settle);
        plan
    }

    pub fn duration(&self) -> Duration {
        self.effects
            .iter()
            .map(|effect| effect.delay)
            .max()
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}
