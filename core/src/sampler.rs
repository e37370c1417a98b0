//! Per-row transaction sampling.
//!
//! ORDER (fixed; every step draws from the same stream, so reordering
//! changes the output for a given seed):
//!   1. user            2. day, hour, minute, second
//!   3. weekend flag    4. payment method (preferred method boosted)
//!   5. category        6. merchant
//!   7. amount          8. status and failure reason
//!   9. platform       10. device type
//!  11. processing time
//!  12. cashback, discount
//!  13. fraud flag
//!  14. refund

use crate::{
    config::SynthConfig,
    error::{SynthError, SynthResult},
    fraud_rules,
    population::Population,
    rng::SynthRng,
    schedule::MonthSlot,
    types::{datetime_format, Hour, TransactionId, UserId},
    weights::{weighted_index, WeightTable},
};
use chrono::{Datelike, NaiveDate, NaiveDateTime, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Status {
    Success,
    Failed,
    Pending,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::Failed => "Failed",
            Self::Pending => "Pending",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub transaction_id: TransactionId,
    pub user_id: UserId,
    #[serde(with = "datetime_format")]
    pub datetime: NaiveDateTime,
    pub payment_method: String,
    pub category: String,
    pub merchant: String,
    pub amount: f64,
    pub status: Status,
    pub failure_reason: Option<String>,
    pub platform: String,
    pub device_type: String,
    pub city: String,
    pub processing_time_sec: f64,
    pub is_weekend: bool,
    pub cashback_earned: f64,
    pub discount_applied: f64,
    pub is_flagged: bool,
    pub fraud_reason: Option<String>,
    pub is_refunded: bool,
    pub refund_amount: f64,
}

pub fn transaction_id(ordinal: u64) -> TransactionId {
    format!("TXN{ordinal:07}")
}

/// Smallest representable amount: one cent.
pub const MIN_AMOUNT: f64 = 0.01;

/// Currency rounding to two decimals.
pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

pub struct TransactionSampler<'a> {
    config: &'a SynthConfig,
    population: &'a Population,
    generated: u64,
}

impl<'a> TransactionSampler<'a> {
    pub fn new(config: &'a SynthConfig, population: &'a Population) -> Self {
        Self {
            config,
            population,
            generated: 0,
        }
    }

    /// Rows produced so far; also the ordinal of the last id handed out.
    pub fn generated(&self) -> u64 {
        self.generated
    }

    /// Synthesize one transaction inside `slot`.
    pub fn sample(&mut self, slot: &MonthSlot, rng: &mut SynthRng) -> SynthResult<Transaction> {
        let cfg = self.config;
        let behaviour = &cfg.behaviour;

        // 1. User
        let user = self.population.pick(rng).ok_or_else(|| {
            SynthError::config("cannot sample transactions from an empty population")
        })?;
        let persona = &user.spending_persona;
        let persona_multiplier = cfg.personas.get(persona).copied().ok_or_else(|| {
            SynthError::config(format!("persona '{persona}' has no amount multiplier"))
        })?;

        // 2. Timestamp
        let day = rng.range_inclusive(slot.first_day, slot.last_day);
        let hour = weighted_index(&cfg.seasonality.hour_weights, rng.next_f64())
            .ok_or_else(|| SynthError::config("seasonality.hour_weights has no positive weight"))?
            as Hour;
        let minute = rng.range_inclusive(0, 59);
        let second = rng.range_inclusive(0, 59);
        let datetime = NaiveDate::from_ymd_opt(slot.year, slot.month, day)
            .and_then(|d| d.and_hms_opt(hour, minute, second))
            .ok_or_else(|| {
                SynthError::config(format!(
                    "invalid timestamp {}-{:02}-{day:02} {hour:02}:{minute:02}:{second:02}",
                    slot.year, slot.month
                ))
            })?;

        // 3. Weekend
        let is_weekend = matches!(datetime.weekday(), Weekday::Sat | Weekday::Sun);

        // 4. Payment method
        let method_table = cfg
            .method_weights
            .boost(&user.preferred_method, behaviour.preferred_method_stickiness);
        let payment_method = choose("method_weights", &method_table, rng)?;
        let method = cfg.methods.get(&payment_method).ok_or_else(|| {
            SynthError::config(format!("payment method '{payment_method}' has no profile"))
        })?;

        // 5. Category
        let category_table = self.category_table(slot.month, is_weekend);
        let category = choose("category_weights", &category_table, rng)?;
        let profile = cfg
            .categories
            .get(&category)
            .ok_or_else(|| SynthError::config(format!("category '{category}' has no profile")))?;

        // 6. Merchant
        let merchant = rng
            .pick(&profile.merchants)
            .cloned()
            .ok_or_else(|| SynthError::config(format!("category '{category}' has no merchants")))?;

        // 7. Amount: persona-scaled, never below the floor, at most twice the ceiling.
        let (lo, hi) = (profile.amount_range.low, profile.amount_range.high);
        let base_amount = rng.uniform(lo, hi);
        let amount = round2(base_amount * persona_multiplier).max(lo).min(hi * 2.0);

        // 8. Status
        let peak = if behaviour.peak_hours.contains(&hour) {
            behaviour.peak_failure_multiplier
        } else {
            1.0
        };
        let (status, failure_reason) = if rng.chance(method.failure_rate * peak) {
            let reason = rng.pick(&method.failure_reasons).cloned().ok_or_else(|| {
                SynthError::config(format!(
                    "payment method '{payment_method}' has no failure reasons"
                ))
            })?;
            (Status::Failed, Some(reason))
        } else if rng.chance(behaviour.pending_probability) {
            (Status::Pending, None)
        } else {
            (Status::Success, None)
        };

        // 9-10. Platform, device
        let platform = choose("platform_weights", &cfg.platform_weights, rng)?;
        let devices = cfg.devices.get(&platform).ok_or_else(|| {
            SynthError::config(format!("platform '{platform}' has no device table"))
        })?;
        let device_type = choose(&format!("devices.{platform}"), devices, rng)?;

        // 11. Processing time
        let window = match status {
            Status::Success => behaviour.processing_time.success,
            Status::Failed => behaviour.processing_time.failed,
            Status::Pending => behaviour.processing_time.pending,
        };
        let processing_time_sec = round2(rng.uniform(window.min, window.max));

        // 12. Cashback and discount
        let mut cashback_earned = 0.0;
        let mut discount_applied = 0.0;
        if status == Status::Success {
            if rng.chance(method.cashback_probability) {
                let f = behaviour.cashback_fraction;
                cashback_earned = round2(amount * rng.uniform(f.min, f.max));
            }
            if behaviour.discount_categories.contains(&category)
                && rng.chance(behaviour.discount_probability)
            {
                let f = behaviour.discount_fraction;
                discount_applied = round2(amount * rng.uniform(f.min, f.max));
            }
        }

        // 13. Fraud
        let flag = fraud_rules::evaluate(
            &cfg.fraud,
            cfg.high_value_threshold(&category),
            amount,
            hour,
            rng,
        );

        // 14. Refund
        let mut is_refunded = false;
        let mut refund_amount = 0.0;
        if status == Status::Success
            && behaviour.refund_categories.contains(&category)
            && rng.chance(behaviour.refund_probability)
        {
            is_refunded = true;
            refund_amount = if rng.chance(behaviour.full_refund_probability) {
                amount
            } else {
                let f = behaviour.partial_refund_fraction;
                round2(amount * rng.uniform(f.min, f.max))
                    .max(MIN_AMOUNT)
                    .min(amount)
            };
        }

        self.generated += 1;
        Ok(Transaction {
            transaction_id: transaction_id(self.generated),
            user_id: user.user_id.clone(),
            datetime,
            payment_method,
            category,
            merchant,
            amount,
            status,
            failure_reason,
            platform,
            device_type,
            city: user.city.clone(),
            processing_time_sec,
            is_weekend,
            cashback_earned,
            discount_applied,
            is_flagged: flag.is_some(),
            fraud_reason: flag.map(|f| f.reason),
            is_refunded,
            refund_amount,
        })
    }

    /// Base category weights with this month's seasonal boosts and, on
    /// weekends, the weekend boost. Boosts compose multiplicatively.
    fn category_table(&self, month: u32, is_weekend: bool) -> WeightTable {
        let seasonality = &self.config.seasonality;
        let seasonal = seasonality
            .category_boosts
            .get(&month)
            .into_iter()
            .flat_map(|boosts| boosts.iter().map(|(c, b)| (c.as_str(), *b)));
        let weekend = seasonality
            .weekend_categories
            .iter()
            .filter(|_| is_weekend)
            .map(|c| (c.as_str(), seasonality.weekend_boost));
        self.config.category_weights.adjust(seasonal.chain(weekend))
    }
}

fn choose(field: &str, table: &WeightTable, rng: &mut SynthRng) -> SynthResult<String> {
    table
        .choose(rng)
        .map(str::to_string)
        .ok_or_else(|| SynthError::config(format!("{field} has no positive weight")))
}
