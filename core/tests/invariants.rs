//! Field-level invariants over a full-size generated dataset.

use chrono::{Datelike, Timelike, Weekday};
use paysynth_core::{
    config::SynthConfig,
    generator::{Dataset, DatasetGenerator},
    integrity::check_dataset,
    sampler::{transaction_id, Status},
};
use std::collections::{HashMap, HashSet};

fn build(seed: u64) -> (Dataset, SynthConfig) {
    let config = SynthConfig {
        population_size: 500,
        transaction_count: 30_000,
        random_seed: seed,
        ..SynthConfig::default()
    };
    let dataset = DatasetGenerator::new(config.clone())
        .expect("valid config")
        .generate()
        .expect("generation");
    (dataset, config)
}

#[test]
fn generated_dataset_passes_every_integrity_rule() {
    let (dataset, config) = build(42);
    let violations = check_dataset(&dataset, &config);
    assert!(
        violations.is_empty(),
        "first violations: {:?}",
        &violations[..violations.len().min(5)]
    );
}

#[test]
fn failure_reason_present_iff_failed() {
    let (dataset, config) = build(7);
    for t in &dataset.transactions {
        match t.status {
            Status::Failed => {
                let reason = t.failure_reason.as_deref().expect("failed row without reason");
                let pool = &config.methods[&t.payment_method].failure_reasons;
                assert!(
                    pool.iter().any(|r| r == reason),
                    "{reason} not a {} reason",
                    t.payment_method
                );
            }
            _ => assert!(t.failure_reason.is_none(), "{} has a failure reason", t.transaction_id),
        }
    }
}

#[test]
fn rewards_and_refunds_only_on_success() {
    let (dataset, config) = build(8);
    let refund_categories: HashSet<&str> =
        config.behaviour.refund_categories.iter().map(String::as_str).collect();
    let discount_categories: HashSet<&str> =
        config.behaviour.discount_categories.iter().map(String::as_str).collect();

    for t in &dataset.transactions {
        if t.status != Status::Success {
            assert_eq!(t.cashback_earned, 0.0);
            assert_eq!(t.discount_applied, 0.0);
            assert!(!t.is_refunded);
        }
        if t.discount_applied > 0.0 {
            assert!(discount_categories.contains(t.category.as_str()));
            assert!(t.discount_applied <= t.amount * 0.20 + 0.01);
        }
        if t.cashback_earned > 0.0 {
            assert!(t.cashback_earned <= t.amount * 0.10 + 0.01);
        }
        if t.is_refunded {
            assert!(refund_categories.contains(t.category.as_str()));
            assert!(t.refund_amount > 0.0 && t.refund_amount <= t.amount);
        } else {
            assert_eq!(t.refund_amount, 0.0);
        }
    }
}

#[test]
fn amounts_stay_within_category_bounds() {
    let (dataset, config) = build(9);
    for t in &dataset.transactions {
        let range = config.categories[&t.category].amount_range;
        assert!(
            t.amount >= range.low && t.amount <= 2.0 * range.high,
            "{} amount {} outside [{}, {}]",
            t.category,
            t.amount,
            range.low,
            2.0 * range.high
        );
        assert_eq!(t.amount, (t.amount * 100.0).round() / 100.0, "amount not rounded to cents");
    }
}

#[test]
fn device_follows_platform() {
    let (dataset, _) = build(10);
    for t in &dataset.transactions {
        let allowed: &[&str] = match t.platform.as_str() {
            "Mobile App" | "QR Code" => &["Android", "iOS"],
            "Web Browser" => &["Windows", "Mac", "Linux"],
            "POS Terminal" => &["POS"],
            other => panic!("unexpected platform {other}"),
        };
        assert!(allowed.contains(&t.device_type.as_str()), "{} on {}", t.device_type, t.platform);
    }
}

#[test]
fn processing_time_depends_on_status() {
    let (dataset, config) = build(11);
    let windows = &config.behaviour.processing_time;
    for t in &dataset.transactions {
        let window = match t.status {
            Status::Success => windows.success,
            Status::Failed => windows.failed,
            Status::Pending => windows.pending,
        };
        assert!(
            window.contains(t.processing_time_sec),
            "{} took {}s",
            t.status,
            t.processing_time_sec
        );
    }
}

#[test]
fn weekend_flag_matches_calendar() {
    let (dataset, _) = build(12);
    for t in &dataset.transactions {
        let weekend = matches!(t.datetime.weekday(), Weekday::Sat | Weekday::Sun);
        assert_eq!(t.is_weekend, weekend, "{}", t.datetime);
    }
}

#[test]
fn output_is_chronological_but_ids_keep_generation_order() {
    let (dataset, config) = build(13);
    let txns = &dataset.transactions;

    assert!(txns.windows(2).all(|w| w[0].datetime <= w[1].datetime));

    // Ids are exactly TXN0000001..=N.
    let ids: HashSet<&str> = txns.iter().map(|t| t.transaction_id.as_str()).collect();
    assert_eq!(ids.len(), txns.len());
    for ordinal in [1, 2, config.transaction_count] {
        assert!(ids.contains(transaction_id(ordinal).as_str()));
    }

    // Generation runs month by month, so id order groups rows by month.
    let mut by_id: Vec<_> = txns.iter().collect();
    by_id.sort_by(|a, b| a.transaction_id.cmp(&b.transaction_id));
    let months: Vec<(i32, u32)> = by_id
        .iter()
        .map(|t| (t.datetime.year(), t.datetime.month()))
        .collect();
    assert!(months.windows(2).all(|w| w[0] <= w[1]));

    // Within a month the ids are not chronological.
    let january: Vec<_> = by_id
        .iter()
        .filter(|t| (t.datetime.year(), t.datetime.month()) == (2024, 1))
        .collect();
    assert!(january.windows(2).any(|w| w[0].datetime > w[1].datetime));
}

#[test]
fn fraud_flags_carry_a_reason() {
    let (dataset, config) = build(14);
    let flagged: Vec<_> = dataset.transactions.iter().filter(|t| t.is_flagged).collect();
    assert!(!flagged.is_empty(), "30k rows should produce some fraud flags");

    for t in &flagged {
        let reason = t.fraud_reason.as_deref().expect("flag without reason");
        match reason {
            "Unusually High Amount" => assert!(t.amount > config.high_value_threshold(&t.category)),
            "Suspicious Late Night Transaction" => {
                assert!(t.datetime.hour() <= 4);
                assert!(t.amount > 5_000.0);
            }
            generic => assert!(config.fraud.generic_reasons.iter().any(|r| r == generic)),
        }
    }
    assert!(dataset.transactions.iter().all(|t| t.is_flagged || t.fraud_reason.is_none()));
}

#[test]
fn status_mix_is_plausible() {
    let (dataset, _) = build(15);
    let n = dataset.transactions.len() as f64;
    let share = |status: Status| {
        dataset.transactions.iter().filter(|t| t.status == status).count() as f64 / n
    };
    let failed = share(Status::Failed);
    let pending = share(Status::Pending);
    // Base rates 4-10%, peak hours x1.4.
    assert!((0.04..0.12).contains(&failed), "failure share {failed}");
    assert!((0.015..0.045).contains(&pending), "pending share {pending}");
}

#[test]
fn partial_refund_of_a_one_cent_amount_is_never_zero() {
    let mut config = SynthConfig {
        population_size: 50,
        transaction_count: 5_000,
        ..SynthConfig::default()
    };
    for profile in config.categories.values_mut() {
        profile.amount_range.low = 0.01;
        profile.amount_range.high = 0.02;
    }
    config.behaviour.refund_probability = 1.0;
    config.behaviour.full_refund_probability = 0.0;

    let dataset = DatasetGenerator::new(config.clone()).unwrap().generate().unwrap();
    let refunded: Vec<_> = dataset.transactions.iter().filter(|t| t.is_refunded).collect();
    assert!(!refunded.is_empty());
    for t in refunded {
        assert!(
            t.refund_amount > 0.0 && t.refund_amount <= t.amount,
            "{} refunded {} of {}",
            t.transaction_id,
            t.refund_amount,
            t.amount
        );
    }
    assert!(check_dataset(&dataset, &config).is_empty());
}

#[test]
fn high_spenders_outspend_budget_users() {
    let (dataset, _) = build(16);
    let persona: HashMap<&str, &str> = dataset
        .users
        .iter()
        .map(|u| (u.user_id.as_str(), u.spending_persona.as_str()))
        .collect();

    let mean_for = |wanted: &str| {
        let amounts: Vec<f64> = dataset
            .transactions
            .iter()
            .filter(|t| persona[t.user_id.as_str()] == wanted)
            .map(|t| t.amount)
            .collect();
        assert!(amounts.len() > 1_000, "too few {wanted} rows");
        amounts.iter().sum::<f64>() / amounts.len() as f64
    };

    let budget = mean_for("Budget");
    let moderate = mean_for("Moderate");
    let high = mean_for("High Spender");
    // Multipliers 0.6 / 1.0 / 1.8.
    assert!(high > 2.0 * budget, "high {high:.2} vs budget {budget:.2}");
    assert!(budget < moderate && moderate < high);
}

#[test]
fn peak_hours_fail_more_often() {
    let (dataset, config) = build(17);
    let peak_hours = &config.behaviour.peak_hours;

    let (mut peak, mut peak_failed, mut off, mut off_failed) = (0usize, 0usize, 0usize, 0usize);
    for t in &dataset.transactions {
        let failed = t.status == Status::Failed;
        if peak_hours.contains(&t.datetime.hour()) {
            peak += 1;
            peak_failed += usize::from(failed);
        } else {
            off += 1;
            off_failed += usize::from(failed);
        }
    }
    let peak_rate = peak_failed as f64 / peak as f64;
    let off_rate = off_failed as f64 / off as f64;
    let ratio = peak_rate / off_rate;
    // Peak multiplier is 1.4.
    assert!((1.15..1.7).contains(&ratio), "peak {peak_rate:.4} off {off_rate:.4}");
}
