//! Volume scheduling against the generated dataset.

use chrono::{Datelike, NaiveDate};
use paysynth_core::{
    config::{AllocationPolicy, DateRange, SynthConfig},
    generator::DatasetGenerator,
    schedule::monthly_schedule,
};
use std::collections::BTreeMap;

#[test]
fn monthly_counts_match_the_schedule() {
    let config = SynthConfig {
        transaction_count: 12_345,
        ..SynthConfig::default()
    };
    let generator = DatasetGenerator::new(config).unwrap();
    let schedule = generator.schedule().unwrap();
    let dataset = generator.generate().unwrap();

    let mut observed: BTreeMap<(i32, u32), u64> = BTreeMap::new();
    for t in &dataset.transactions {
        *observed.entry((t.datetime.year(), t.datetime.month())).or_default() += 1;
    }
    for slot in &schedule {
        assert_eq!(
            observed.get(&(slot.year, slot.month)).copied().unwrap_or(0),
            slot.count,
            "{}-{:02}",
            slot.year,
            slot.month
        );
    }
    assert_eq!(schedule.iter().map(|s| s.count).sum::<u64>(), 12_345);
}

#[test]
fn last_month_absorbs_the_remainder() {
    let config = SynthConfig::default();
    let schedule = monthly_schedule(&config).unwrap();
    assert_eq!(schedule.len(), 24);
    assert_eq!(schedule.iter().map(|s| s.count).sum::<u64>(), 60_000);

    let total_weight: f64 = schedule
        .iter()
        .map(|s| config.seasonality.monthly_multipliers[s.month as usize - 1])
        .sum();
    for slot in &schedule[..23] {
        let multiplier = config.seasonality.monthly_multipliers[slot.month as usize - 1];
        let share = 60_000.0 * (multiplier / total_weight);
        assert_eq!(slot.count, share.floor() as u64);
    }
    let festive = schedule.iter().find(|s| (s.year, s.month) == (2024, 11)).unwrap();
    let june = schedule.iter().find(|s| (s.year, s.month) == (2024, 6)).unwrap();
    assert!(festive.count > june.count);
}

#[test]
fn largest_remainder_conserves_volume_too() {
    for total in [1u64, 23, 100, 9_999] {
        let config = SynthConfig {
            transaction_count: total,
            allocation: AllocationPolicy::LargestRemainder,
            ..SynthConfig::default()
        };
        let schedule = monthly_schedule(&config).unwrap();
        assert_eq!(schedule.iter().map(|s| s.count).sum::<u64>(), total);
        let max = schedule.iter().map(|s| s.count).max().unwrap();
        let min = schedule.iter().map(|s| s.count).min().unwrap();
        assert!(max - min <= total / 10 + 1, "allocation too skewed at {total}");
    }
}

#[test]
fn partial_range_keeps_rows_inside_it() {
    let config = SynthConfig {
        transaction_count: 2_000,
        date_range: DateRange {
            start: NaiveDate::from_ymd_opt(2024, 2, 20).unwrap(),
            end: NaiveDate::from_ymd_opt(2024, 4, 5).unwrap(),
        },
        ..SynthConfig::default()
    };
    let range = config.date_range.clone();
    let dataset = DatasetGenerator::new(config).unwrap().generate().unwrap();
    assert_eq!(dataset.transactions.len(), 2_000);
    for t in &dataset.transactions {
        let d = t.datetime.date();
        assert!(d >= range.start && d <= range.end, "{d} outside range");
    }
}

#[test]
fn zero_transactions_is_a_valid_run() {
    let config = SynthConfig {
        transaction_count: 0,
        ..SynthConfig::default_test()
    };
    let dataset = DatasetGenerator::new(config).unwrap().generate().unwrap();
    assert!(dataset.transactions.is_empty());
    assert_eq!(dataset.users.len(), 10);
}
