//! Post-generation summary report.

use crate::{generator::Dataset, sampler::Status};
use chrono::{Datelike, NaiveDateTime};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct AmountStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
    pub total: f64,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct DatasetSummary {
    pub transaction_count: usize,
    pub user_count: usize,
    pub first_datetime: Option<NaiveDateTime>,
    pub last_datetime: Option<NaiveDateTime>,
    pub by_status: BTreeMap<String, usize>,
    pub by_method: BTreeMap<String, usize>,
    pub by_category: BTreeMap<String, usize>,
    /// "YYYY-MM" -> count.
    pub by_month: BTreeMap<String, usize>,
    pub amount: AmountStats,
    pub flagged_count: usize,
    pub flagged_rate: f64,
    pub refunded_count: usize,
    pub refunded_rate: f64,
    pub cashback_count: usize,
    pub cashback_total: f64,
    pub discount_count: usize,
    pub discount_total: f64,
    pub users_by_age_group: BTreeMap<String, usize>,
    pub users_by_tier: BTreeMap<String, usize>,
    pub users_by_persona: BTreeMap<String, usize>,
}

impl DatasetSummary {
    pub fn from_dataset(dataset: &Dataset) -> Self {
        let txns = &dataset.transactions;
        let mut s = DatasetSummary {
            transaction_count: txns.len(),
            user_count: dataset.users.len(),
            first_datetime: txns.iter().map(|t| t.datetime).min(),
            last_datetime: txns.iter().map(|t| t.datetime).max(),
            ..Default::default()
        };

        for status in [Status::Success, Status::Failed, Status::Pending] {
            s.by_status.insert(status.to_string(), 0);
        }

        for t in txns {
            *s.by_status.entry(t.status.to_string()).or_default() += 1;
            *s.by_method.entry(t.payment_method.clone()).or_default() += 1;
            *s.by_category.entry(t.category.clone()).or_default() += 1;
            let month = format!("{}-{:02}", t.datetime.year(), t.datetime.month());
            *s.by_month.entry(month).or_default() += 1;

            if t.is_flagged {
                s.flagged_count += 1;
            }
            if t.is_refunded {
                s.refunded_count += 1;
            }
            if t.cashback_earned > 0.0 {
                s.cashback_count += 1;
                s.cashback_total += t.cashback_earned;
            }
            if t.discount_applied > 0.0 {
                s.discount_count += 1;
                s.discount_total += t.discount_applied;
            }
        }

        for u in &dataset.users {
            *s.users_by_age_group.entry(u.age_group.clone()).or_default() += 1;
            *s.users_by_tier.entry(u.customer_tier.clone()).or_default() += 1;
            *s.users_by_persona.entry(u.spending_persona.clone()).or_default() += 1;
        }

        if !txns.is_empty() {
            let n = txns.len() as f64;
            s.flagged_rate = s.flagged_count as f64 / n;
            s.refunded_rate = s.refunded_count as f64 / n;

            let mut amounts: Vec<f64> = txns.iter().map(|t| t.amount).collect();
            amounts.sort_by(f64::total_cmp);
            let total: f64 = amounts.iter().sum();
            let mid = amounts.len() / 2;
            let median = if amounts.len() % 2 == 0 {
                (amounts[mid - 1] + amounts[mid]) / 2.0
            } else {
                amounts[mid]
            };
            s.amount = AmountStats {
                min: amounts[0],
                max: amounts[amounts.len() - 1],
                mean: total / n,
                median,
                total,
            };
        }
        s
    }

    pub fn failure_rate(&self) -> f64 {
        if self.transaction_count == 0 {
            return 0.0;
        }
        self.by_status.get("Failed").copied().unwrap_or(0) as f64 / self.transaction_count as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::SynthConfig, generator::DatasetGenerator};

    #[test]
    fn counts_add_up_to_the_dataset() {
        let dataset = DatasetGenerator::new(SynthConfig::default_test())
            .unwrap()
            .generate()
            .unwrap();
        let s = DatasetSummary::from_dataset(&dataset);

        assert_eq!(s.transaction_count, 100);
        assert_eq!(s.by_status.values().sum::<usize>(), 100);
        assert_eq!(s.by_month.values().sum::<usize>(), 100);
        assert_eq!(s.users_by_tier.values().sum::<usize>(), 10);

        let failed = dataset
            .transactions
            .iter()
            .filter(|t| t.status == Status::Failed)
            .count();
        assert!((s.failure_rate() - failed as f64 / 100.0).abs() < 1e-12);
        assert!(s.amount.min <= s.amount.median && s.amount.median <= s.amount.max);
    }

    #[test]
    fn empty_dataset_has_zero_rates() {
        let s = DatasetSummary::from_dataset(&Dataset::default());
        assert_eq!(s.failure_rate(), 0.0);
        assert_eq!(s.by_status.get("Failed"), Some(&0));
        assert!(s.first_datetime.is_none());
    }
}
