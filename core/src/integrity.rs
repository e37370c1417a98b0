//! Dataset integrity checks.
//!
//! Every rule here is a property the generator guarantees. A non-empty
//! result means either the generator or a hand-edited dataset is broken.

use crate::{config::SynthConfig, generator::Dataset, sampler::Status};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    DuplicateUserId,
    DuplicateTransactionId,
    OrphanUser,
    CityMismatch,
    FailureReasonMismatch,
    RewardWithoutSuccess,
    RefundOutOfBounds,
    FraudReasonMismatch,
    AmountOutOfBounds,
    UnknownCategory,
    DeviceNotAllowed,
    OutsideDateRange,
    NotChronological,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Violation {
    pub kind: ViolationKind,
    pub row_id: String,
    pub detail: String,
}

impl Violation {
    fn new(kind: ViolationKind, row_id: &str, detail: impl Into<String>) -> Self {
        Self {
            kind,
            row_id: row_id.to_string(),
            detail: detail.into(),
        }
    }
}

pub fn check_dataset(dataset: &Dataset, config: &SynthConfig) -> Vec<Violation> {
    let mut violations = Vec::new();

    let mut users = HashMap::with_capacity(dataset.users.len());
    for user in &dataset.users {
        if users.insert(user.user_id.as_str(), user).is_some() {
            violations.push(Violation::new(
                ViolationKind::DuplicateUserId,
                &user.user_id,
                "user id appears more than once",
            ));
        }
    }

    let mut seen_ids = HashSet::with_capacity(dataset.transactions.len());
    let mut previous = None;
    for t in &dataset.transactions {
        let id = t.transaction_id.as_str();
        let mut flag = |kind, detail: String| violations.push(Violation::new(kind, id, detail));

        if !seen_ids.insert(id) {
            flag(
                ViolationKind::DuplicateTransactionId,
                "transaction id appears more than once".into(),
            );
        }

        match users.get(t.user_id.as_str()) {
            None => flag(ViolationKind::OrphanUser, format!("unknown user {}", t.user_id)),
            Some(user) if user.city != t.city => flag(
                ViolationKind::CityMismatch,
                format!("city {} but user lives in {}", t.city, user.city),
            ),
            Some(_) => {}
        }

        if (t.status == Status::Failed) != t.failure_reason.is_some() {
            flag(
                ViolationKind::FailureReasonMismatch,
                format!("status {} with failure_reason {:?}", t.status, t.failure_reason),
            );
        }

        if t.status != Status::Success && (t.cashback_earned != 0.0 || t.discount_applied != 0.0) {
            flag(
                ViolationKind::RewardWithoutSuccess,
                format!(
                    "status {} with cashback {} and discount {}",
                    t.status, t.cashback_earned, t.discount_applied
                ),
            );
        }
        if t.cashback_earned < 0.0 || t.discount_applied < 0.0 {
            flag(ViolationKind::RewardWithoutSuccess, "negative cashback or discount".into());
        }

        let refund_ok = if t.is_refunded {
            t.status == Status::Success && t.refund_amount > 0.0 && t.refund_amount <= t.amount
        } else {
            t.refund_amount == 0.0
        };
        if !refund_ok {
            flag(
                ViolationKind::RefundOutOfBounds,
                format!(
                    "is_refunded {} with refund {} of {} ({})",
                    t.is_refunded, t.refund_amount, t.amount, t.status
                ),
            );
        }

        if t.is_flagged != t.fraud_reason.is_some() {
            flag(
                ViolationKind::FraudReasonMismatch,
                format!("is_flagged {} with fraud_reason {:?}", t.is_flagged, t.fraud_reason),
            );
        }

        match config.categories.get(&t.category) {
            None => flag(ViolationKind::UnknownCategory, format!("category {}", t.category)),
            Some(profile) => {
                let (lo, hi) = (profile.amount_range.low, profile.amount_range.high);
                if t.amount < lo || t.amount > 2.0 * hi {
                    flag(
                        ViolationKind::AmountOutOfBounds,
                        format!(
                            "amount {} outside [{lo}, {}] for {}",
                            t.amount,
                            2.0 * hi,
                            t.category
                        ),
                    );
                }
            }
        }

        let device_ok = config
            .devices
            .get(&t.platform)
            .is_some_and(|d| d.weight(&t.device_type).is_some_and(|w| w > 0.0));
        if !device_ok {
            flag(
                ViolationKind::DeviceNotAllowed,
                format!("device {} on platform {}", t.device_type, t.platform),
            );
        }

        let date = t.datetime.date();
        if date < config.date_range.start || date > config.date_range.end {
            flag(ViolationKind::OutsideDateRange, format!("datetime {}", t.datetime));
        }

        if previous.is_some_and(|p| p > t.datetime) {
            flag(
                ViolationKind::NotChronological,
                format!("datetime {} precedes its predecessor", t.datetime),
            );
        }
        previous = Some(t.datetime);
    }

    if !violations.is_empty() {
        log::warn!("integrity: {} violations found", violations.len());
    }
    violations
}
