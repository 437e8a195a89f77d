//! Access policy for playback.

use chrono::{DateTime, Utc};
use streamcat_common::{DenialReason, Error, Result};
use streamcat_db::models::ContentRecord;

/// What is known about the viewer asking for playback.
///
/// `None` means the attribute was not supplied, which is different from an
/// explicit `false` or a known age.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewerAttributes {
    pub is_vip: Option<bool>,
    pub age: Option<u32>,
}

/// Outcome of a policy evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(DenialReason),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }

    /// Convert a denial into [`Error::AccessDenied`].
    pub fn into_result(self) -> Result<()> {
        match self {
            Self::Allow => Ok(()),
            Self::Deny(reason) => Err(Error::AccessDenied(reason)),
        }
    }
}

/// Decide whether `viewer` may play `content` at `now`.
///
/// Checks run in a fixed order and the first failure wins: visibility, the
/// availability window, the VIP gate, then the minimum age.
pub fn evaluate(content: &ContentRecord, viewer: &ViewerAttributes, now: DateTime<Utc>) -> Decision {
    if !content.visible {
        return Decision::Deny(DenialReason::NotVisible);
    }

    if content.available_until.is_some_and(|until| now >= until) {
        return Decision::Deny(DenialReason::AvailabilityElapsed);
    }

    if content.vip && viewer.is_vip != Some(true) {
        return Decision::Deny(DenialReason::VipRequired);
    }

    if content.minimum_age > 0 {
        match viewer.age {
            None => return Decision::Deny(DenialReason::AgeUnverified),
            Some(age) if age < content.minimum_age => {
                return Decision::Deny(DenialReason::BelowMinimumAge)
            }
            Some(_) => {}
        }
    }

    Decision::Allow
}
