//! Transaction volume scheduler.
//!
//! Splits the global transaction count across every calendar month the
//! date range touches, proportionally to the seasonal multiplier of each
//! month. The partition always sums to exactly the requested total.

use crate::{
    config::{AllocationPolicy, DateRange, SynthConfig},
    error::{SynthError, SynthResult},
    types::Month,
};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// One month of the generation window and its share of the volume.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct MonthSlot {
    pub year: i32,
    pub month: Month,
    /// First and last sampleable day. Narrower than the calendar month
    /// only at the edges of the date range.
    pub first_day: u32,
    pub last_day: u32,
    pub count: u64,
}

pub fn days_in_month(year: i32, month: Month) -> u32 {
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .map(|d| d.day())
        .unwrap_or(28)
}

/// Every (year, month) in the range, inclusive, with its day window.
pub fn months_in_range(range: &DateRange) -> Vec<MonthSlot> {
    let mut slots = Vec::new();
    let (end_year, end_month) = (range.end.year(), range.end.month());
    let (mut year, mut month) = (range.start.year(), range.start.month());

    while (year, month) <= (end_year, end_month) {
        let first_day = if (year, month) == (range.start.year(), range.start.month()) {
            range.start.day()
        } else {
            1
        };
        let last_day = if (year, month) == (end_year, end_month) {
            range.end.day()
        } else {
            days_in_month(year, month)
        };
        slots.push(MonthSlot {
            year,
            month,
            first_day,
            last_day,
            count: 0,
        });
        if month == 12 {
            year += 1;
            month = 1;
        } else {
            month += 1;
        }
    }
    slots
}

/// Partition `total` over `weights`.
///
/// Each bucket gets `floor(total * w / sum(w))`; the policy decides who
/// receives what rounding left over. A zero-sum weight vector sends the
/// whole total to the last bucket.
pub fn allocate(total: u64, weights: &[f64], policy: AllocationPolicy) -> Vec<u64> {
    if weights.is_empty() {
        return Vec::new();
    }
    let sum: f64 = weights.iter().sum();
    if sum <= 0.0 {
        let mut counts = vec![0; weights.len()];
        if let Some(last) = counts.last_mut() {
            *last = total;
        }
        return counts;
    }

    let exact: Vec<f64> = weights
        .iter()
        .map(|w| total as f64 * (w / sum))
        .collect();

    match policy {
        AllocationPolicy::LastMonthRemainder => {
            let mut counts = Vec::with_capacity(weights.len());
            let mut remaining = total;
            for (i, share) in exact.iter().enumerate() {
                if i == exact.len() - 1 {
                    counts.push(remaining);
                } else {
                    let count = (share.floor() as u64).min(remaining);
                    counts.push(count);
                    remaining -= count;
                }
            }
            counts
        }
        AllocationPolicy::LargestRemainder => {
            let mut counts: Vec<u64> = exact.iter().map(|s| s.floor() as u64).collect();
            let assigned: u64 = counts.iter().sum();
            if assigned > total {
                // Float overshoot; fall back to the exact-sum policy.
                return allocate(total, weights, AllocationPolicy::LastMonthRemainder);
            }
            let mut order: Vec<usize> = (0..counts.len()).collect();
            order.sort_by(|a, b| {
                let fa = exact[*a] - exact[*a].floor();
                let fb = exact[*b] - exact[*b].floor();
                fb.total_cmp(&fa).then(a.cmp(b))
            });
            for idx in order.iter().cycle().take((total - assigned) as usize) {
                counts[*idx] += 1;
            }
            counts
        }
    }
}

/// The per-month volume plan for a config.
pub fn monthly_schedule(config: &SynthConfig) -> SynthResult<Vec<MonthSlot>> {
    let mut slots = months_in_range(&config.date_range);
    let multipliers = &config.seasonality.monthly_multipliers;
    let weights: Vec<f64> = slots
        .iter()
        .map(|s| {
            multipliers
                .get(s.month as usize - 1)
                .copied()
                .ok_or_else(|| SynthError::config(format!("no multiplier for month {}", s.month)))
        })
        .collect::<SynthResult<_>>()?;

    if config.transaction_count > 0 && weights.iter().sum::<f64>() <= 0.0 {
        return Err(SynthError::config(
            "every month in date_range has a zero volume multiplier",
        ));
    }

    let counts = allocate(config.transaction_count, &weights, config.allocation);
    for (slot, count) in slots.iter_mut().zip(counts) {
        slot.count = count;
        if count == 0 && config.transaction_count > 0 {
            log::warn!("schedule: {}-{:02} receives no transactions", slot.year, slot.month);
        }
    }
    log::info!(
        "schedule: {} transactions over {} months ({:?})",
        config.transaction_count,
        slots.len(),
        config.allocation
    );
    Ok(slots)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn leap_year_february() {
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2025, 2), 28);
        assert_eq!(days_in_month(2024, 12), 31);
        assert_eq!(days_in_month(2025, 4), 30);
    }

    #[test]
    fn default_range_covers_24_full_months() {
        let slots = months_in_range(&DateRange::default());
        assert_eq!(slots.len(), 24);
        assert_eq!((slots[0].year, slots[0].month, slots[0].first_day), (2024, 1, 1));
        assert_eq!(slots[1].last_day, 29);
        let last = slots.last().unwrap();
        assert_eq!((last.year, last.month, last.last_day), (2025, 12, 31));
    }

    #[test]
    fn partial_edge_months_narrow_the_day_window() {
        let range = DateRange {
            start: ymd(2024, 3, 15),
            end: ymd(2024, 5, 10),
        };
        let slots = months_in_range(&range);
        assert_eq!(slots.len(), 3);
        assert_eq!((slots[0].first_day, slots[0].last_day), (15, 31));
        assert_eq!((slots[1].first_day, slots[1].last_day), (1, 30));
        assert_eq!((slots[2].first_day, slots[2].last_day), (1, 10));
    }

    #[test]
    fn remainder_goes_to_last_bucket() {
        let counts = allocate(10, &[1.0, 1.0, 1.0], AllocationPolicy::LastMonthRemainder);
        assert_eq!(counts, vec![3, 3, 4]);
    }

    #[test]
    fn largest_remainder_spreads_leftovers() {
        let counts = allocate(11, &[1.0, 1.0, 1.0, 1.0], AllocationPolicy::LargestRemainder);
        assert_eq!(counts, vec![3, 3, 3, 2]);
        let counts = allocate(10, &[1.0, 2.0, 2.0], AllocationPolicy::LargestRemainder);
        assert_eq!(counts, vec![2, 4, 4]);
    }

    #[test]
    fn partition_is_conserved_for_any_total() {
        let multipliers = SynthConfig::default().seasonality.monthly_multipliers;
        let weights: Vec<f64> = multipliers.iter().chain(multipliers.iter()).copied().collect();
        for total in [0u64, 1, 7, 23, 24, 25, 999, 60_000, 1_000_003] {
            for policy in [
                AllocationPolicy::LastMonthRemainder,
                AllocationPolicy::LargestRemainder,
            ] {
                let counts = allocate(total, &weights, policy);
                assert_eq!(counts.len(), 24);
                assert_eq!(counts.iter().sum::<u64>(), total, "{policy:?} lost volume at {total}");
            }
        }
    }

    #[test]
    fn zero_sum_weights_send_everything_to_last() {
        assert_eq!(allocate(5, &[0.0, 0.0], AllocationPolicy::LargestRemainder), vec![0, 5]);
        assert!(allocate(5, &[], AllocationPolicy::LastMonthRemainder).is_empty());
    }
}
