use crate::{
    error::{SynthError, SynthResult},
    sampler::{round2, MIN_AMOUNT},
    types::{Hour, Month},
    weights::WeightTable,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, path::Path};

/// How the global transaction count is split across months.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AllocationPolicy {
    /// Floor every month's share; the last month absorbs the remainder.
    #[default]
    LastMonthRemainder,
    /// Floor every share, then hand the remainder out one unit at a time
    /// in order of largest fractional part (ties to the earlier month).
    LargestRemainder,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Default for DateRange {
    fn default() -> Self {
        Self {
            start: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default(),
            end: NaiveDate::from_ymd_opt(2025, 12, 31).unwrap_or_default(),
        }
    }
}

/// Closed float range used for uniform draws.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct UniformRange {
    pub min: f64,
    pub max: f64,
}

impl UniformRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, x: f64) -> bool {
        x >= self.min && x <= self.max
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct AmountRange {
    pub low: f64,
    pub high: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MethodProfile {
    pub failure_rate: f64,
    pub failure_reasons: Vec<String>,
    pub cashback_probability: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryProfile {
    pub amount_range: AmountRange,
    pub merchants: Vec<String>,
    #[serde(default)]
    pub high_value_threshold: Option<f64>,
}

/// Weight tables for the independent user attributes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PopulationConfig {
    pub city: WeightTable,
    pub age_group: WeightTable,
    pub gender: WeightTable,
    pub account_tenure: WeightTable,
    pub customer_tier: WeightTable,
    pub spending_persona: WeightTable,
    pub preferred_method: WeightTable,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SeasonalityConfig {
    /// Volume multiplier per calendar month, January first.
    pub monthly_multipliers: Vec<f64>,
    /// month -> category -> weight multiplier.
    pub category_boosts: BTreeMap<Month, BTreeMap<String, f64>>,
    /// Intraday traffic, hour 0 first.
    pub hour_weights: Vec<f64>,
    pub weekend_boost: f64,
    pub weekend_categories: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProcessingTimeConfig {
    pub success: UniformRange,
    pub failed: UniformRange,
    pub pending: UniformRange,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BehaviourConfig {
    pub preferred_method_stickiness: f64,
    pub pending_probability: f64,
    pub peak_hours: Vec<Hour>,
    pub peak_failure_multiplier: f64,
    pub processing_time: ProcessingTimeConfig,
    pub cashback_fraction: UniformRange,
    pub discount_categories: Vec<String>,
    pub discount_probability: f64,
    pub discount_fraction: UniformRange,
    pub refund_categories: Vec<String>,
    pub refund_probability: f64,
    pub full_refund_probability: f64,
    pub partial_refund_fraction: UniformRange,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FraudRulesConfig {
    pub high_value_probability: f64,
    /// Threshold for categories whose profile names none.
    pub default_high_value_threshold: f64,
    pub late_night_hours: Vec<Hour>,
    pub late_night_amount: f64,
    pub late_night_probability: f64,
    pub baseline_probability: f64,
    pub generic_reasons: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SynthConfig {
    pub population_size: usize,
    pub transaction_count: u64,
    pub date_range: DateRange,
    pub random_seed: u64,
    pub allocation: AllocationPolicy,
    pub population: PopulationConfig,
    pub method_weights: WeightTable,
    pub category_weights: WeightTable,
    pub platform_weights: WeightTable,
    pub methods: BTreeMap<String, MethodProfile>,
    pub categories: BTreeMap<String, CategoryProfile>,
    /// platform -> device weights.
    pub devices: BTreeMap<String, WeightTable>,
    /// persona -> amount multiplier.
    pub personas: BTreeMap<String, f64>,
    pub seasonality: SeasonalityConfig,
    pub behaviour: BehaviourConfig,
    pub fraud: FraudRulesConfig,
}

impl SynthConfig {
    /// Load a JSON config. Fields the file omits keep their defaults.
    /// Call `validate()` (or build a generator) before use.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {}: {e}", path.display()))?;
        let config: SynthConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {}: {e}", path.display()))?;
        Ok(config)
    }

    pub fn from_json_str(json: &str) -> SynthResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Small config for tests: same tables, fewer rows.
    pub fn default_test() -> Self {
        Self {
            population_size: 10,
            transaction_count: 100,
            random_seed: 1,
            ..Self::default()
        }
    }

    pub fn high_value_threshold(&self, category: &str) -> f64 {
        self.categories
            .get(category)
            .and_then(|c| c.high_value_threshold)
            .unwrap_or(self.fraud.default_high_value_threshold)
    }

    /// Fail fast on any table defect that would otherwise surface as a
    /// malformed row deep inside generation.
    pub fn validate(&self) -> SynthResult<()> {
        if self.population_size == 0 {
            return Err(SynthError::config("population_size must be at least 1"));
        }
        if self.date_range.start > self.date_range.end {
            return Err(SynthError::config(format!(
                "date_range.start {} is after date_range.end {}",
                self.date_range.start, self.date_range.end
            )));
        }

        let pop = &self.population;
        check_table("population.city", &pop.city)?;
        check_table("population.age_group", &pop.age_group)?;
        check_table("population.gender", &pop.gender)?;
        check_table("population.account_tenure", &pop.account_tenure)?;
        check_table("population.customer_tier", &pop.customer_tier)?;
        check_table("population.spending_persona", &pop.spending_persona)?;
        check_table("population.preferred_method", &pop.preferred_method)?;
        check_table("method_weights", &self.method_weights)?;
        check_table("category_weights", &self.category_weights)?;
        check_table("platform_weights", &self.platform_weights)?;

        for persona in pop.spending_persona.labels() {
            match self.personas.get(persona) {
                Some(m) if *m > 0.0 => {}
                Some(m) => {
                    return Err(SynthError::config(format!(
                        "persona '{persona}' has non-positive amount multiplier {m}"
                    )))
                }
                None => {
                    return Err(SynthError::config(format!(
                        "persona '{persona}' has no amount multiplier"
                    )))
                }
            }
        }

        for method in pop.preferred_method.labels() {
            if !self.method_weights.contains(method) {
                return Err(SynthError::config(format!(
                    "preferred method '{method}' is missing from method_weights"
                )));
            }
        }

        for method in self.method_weights.labels() {
            let profile = self.methods.get(method).ok_or_else(|| {
                SynthError::config(format!("payment method '{method}' has no profile"))
            })?;
            check_probability(&format!("methods.{method}.failure_rate"), profile.failure_rate)?;
            check_probability(
                &format!("methods.{method}.cashback_probability"),
                profile.cashback_probability,
            )?;
            if profile.failure_reasons.is_empty() {
                return Err(SynthError::config(format!(
                    "payment method '{method}' has no failure reasons"
                )));
            }
        }

        for category in self.category_weights.labels() {
            let profile = self.categories.get(category).ok_or_else(|| {
                SynthError::config(format!("category '{category}' has no profile"))
            })?;
            let AmountRange { low, high } = profile.amount_range;
            if !low.is_finite() || !high.is_finite() || low > high {
                return Err(SynthError::config(format!(
                    "category '{category}' has malformed amount range [{low}, {high}]"
                )));
            }
            if low < MIN_AMOUNT || round2(low) != low {
                return Err(SynthError::config(format!(
                    "category '{category}' amount floor {low} must be a whole number of cents \
                     of at least {MIN_AMOUNT}"
                )));
            }
            if profile.merchants.is_empty() {
                return Err(SynthError::config(format!(
                    "category '{category}' has an empty merchant pool"
                )));
            }
        }
        for category in self.categories.keys() {
            if !self.category_weights.contains(category) {
                return Err(SynthError::config(format!(
                    "category '{category}' has a profile but no entry in category_weights"
                )));
            }
        }

        for platform in self.platform_weights.labels() {
            let devices = self.devices.get(platform).ok_or_else(|| {
                SynthError::config(format!("platform '{platform}' has no device table"))
            })?;
            check_table(&format!("devices.{platform}"), devices)?;
        }

        self.validate_seasonality()?;
        self.validate_behaviour()?;
        self.validate_fraud()?;
        Ok(())
    }

    fn validate_seasonality(&self) -> SynthResult<()> {
        let s = &self.seasonality;
        if s.monthly_multipliers.len() != 12 {
            return Err(SynthError::config(format!(
                "seasonality.monthly_multipliers needs 12 entries, got {}",
                s.monthly_multipliers.len()
            )));
        }
        check_weights("seasonality.monthly_multipliers", &s.monthly_multipliers)?;
        if s.hour_weights.len() != 24 {
            return Err(SynthError::config(format!(
                "seasonality.hour_weights needs 24 entries, got {}",
                s.hour_weights.len()
            )));
        }
        check_weights("seasonality.hour_weights", &s.hour_weights)?;

        for (month, boosts) in &s.category_boosts {
            if !(1..=12).contains(month) {
                return Err(SynthError::config(format!(
                    "seasonality.category_boosts has invalid month {month}"
                )));
            }
            for (category, factor) in boosts {
                self.require_category("seasonality.category_boosts", category)?;
                if *factor <= 0.0 {
                    return Err(SynthError::config(format!(
                        "seasonal boost for '{category}' in month {month} must be positive"
                    )));
                }
            }
        }
        if s.weekend_boost <= 0.0 {
            return Err(SynthError::config("seasonality.weekend_boost must be positive"));
        }
        for category in &s.weekend_categories {
            self.require_category("seasonality.weekend_categories", category)?;
        }
        Ok(())
    }

    fn validate_behaviour(&self) -> SynthResult<()> {
        let b = &self.behaviour;
        if b.preferred_method_stickiness <= 0.0 {
            return Err(SynthError::config(
                "behaviour.preferred_method_stickiness must be positive",
            ));
        }
        if b.peak_failure_multiplier < 0.0 {
            return Err(SynthError::config(
                "behaviour.peak_failure_multiplier must be non-negative",
            ));
        }
        check_hours("behaviour.peak_hours", &b.peak_hours)?;
        check_probability("behaviour.pending_probability", b.pending_probability)?;
        check_probability("behaviour.discount_probability", b.discount_probability)?;
        check_probability("behaviour.refund_probability", b.refund_probability)?;
        check_probability("behaviour.full_refund_probability", b.full_refund_probability)?;

        check_range("behaviour.processing_time.success", &b.processing_time.success)?;
        check_range("behaviour.processing_time.failed", &b.processing_time.failed)?;
        check_range("behaviour.processing_time.pending", &b.processing_time.pending)?;
        check_range("behaviour.cashback_fraction", &b.cashback_fraction)?;
        check_range("behaviour.discount_fraction", &b.discount_fraction)?;
        check_range("behaviour.partial_refund_fraction", &b.partial_refund_fraction)?;
        if b.partial_refund_fraction.min <= 0.0 || b.partial_refund_fraction.max > 1.0 {
            return Err(SynthError::config(
                "behaviour.partial_refund_fraction must lie within (0, 1]",
            ));
        }

        for category in &b.discount_categories {
            self.require_category("behaviour.discount_categories", category)?;
        }
        for category in &b.refund_categories {
            self.require_category("behaviour.refund_categories", category)?;
        }
        Ok(())
    }

    fn validate_fraud(&self) -> SynthResult<()> {
        let f = &self.fraud;
        check_probability("fraud.high_value_probability", f.high_value_probability)?;
        check_probability("fraud.late_night_probability", f.late_night_probability)?;
        check_probability("fraud.baseline_probability", f.baseline_probability)?;
        check_hours("fraud.late_night_hours", &f.late_night_hours)?;
        if f.generic_reasons.is_empty() {
            return Err(SynthError::config("fraud.generic_reasons must not be empty"));
        }
        Ok(())
    }

    fn require_category(&self, field: &str, category: &str) -> SynthResult<()> {
        if self.category_weights.contains(category) {
            Ok(())
        } else {
            Err(SynthError::config(format!(
                "{field} names unknown category '{category}'"
            )))
        }
    }
}

fn check_table(field: &str, table: &WeightTable) -> SynthResult<()> {
    if table.is_empty() {
        return Err(SynthError::config(format!("{field} is empty")));
    }
    let weights: Vec<f64> = table.entries().iter().map(|(_, w)| *w).collect();
    check_weights(field, &weights)
}

fn check_weights(field: &str, weights: &[f64]) -> SynthResult<()> {
    if let Some(w) = weights.iter().find(|w| !w.is_finite() || **w < 0.0) {
        return Err(SynthError::config(format!(
            "{field} has invalid weight {w}"
        )));
    }
    if weights.iter().sum::<f64>() <= 0.0 {
        return Err(SynthError::config(format!("{field} sums to zero")));
    }
    Ok(())
}

fn check_probability(field: &str, p: f64) -> SynthResult<()> {
    if (0.0..=1.0).contains(&p) {
        Ok(())
    } else {
        Err(SynthError::config(format!(
            "{field} must be a probability, got {p}"
        )))
    }
}

fn check_range(field: &str, r: &UniformRange) -> SynthResult<()> {
    if r.min.is_finite() && r.max.is_finite() && r.min >= 0.0 && r.min <= r.max {
        Ok(())
    } else {
        Err(SynthError::config(format!(
            "{field} is malformed: [{}, {}]",
            r.min, r.max
        )))
    }
}

fn check_hours(field: &str, hours: &[Hour]) -> SynthResult<()> {
    match hours.iter().find(|h| **h > 23) {
        Some(h) => Err(SynthError::config(format!("{field} has invalid hour {h}"))),
        None => Ok(()),
    }
}

// ── Defaults ───────────────────────────────────────────────────────

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

const METHOD_WEIGHTS: [(&str, f64); 5] = [
    ("UPI", 0.40),
    ("Credit Card", 0.18),
    ("Debit Card", 0.15),
    ("Net Banking", 0.12),
    ("Mobile Wallet", 0.15),
];

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            city: WeightTable::new([
                ("Mumbai", 0.16),
                ("Delhi", 0.14),
                ("Bangalore", 0.14),
                ("Hyderabad", 0.10),
                ("Chennai", 0.09),
                ("Pune", 0.07),
                ("Kolkata", 0.06),
                ("Ahmedabad", 0.05),
                ("Jaipur", 0.04),
                ("Lucknow", 0.04),
                ("Chandigarh", 0.03),
                ("Indore", 0.03),
                ("Coimbatore", 0.02),
                ("Kochi", 0.02),
                ("Guwahati", 0.01),
            ]),
            age_group: WeightTable::new([
                ("18-24", 0.18),
                ("25-34", 0.35),
                ("35-44", 0.25),
                ("45-54", 0.14),
                ("55+", 0.08),
            ]),
            gender: WeightTable::new([("Male", 0.52), ("Female", 0.46), ("Other", 0.02)]),
            account_tenure: WeightTable::new([
                ("0-6 months", 0.12),
                ("6-12 months", 0.15),
                ("1-2 years", 0.25),
                ("2-5 years", 0.30),
                ("5+ years", 0.18),
            ]),
            customer_tier: WeightTable::new([
                ("New", 0.15),
                ("Regular", 0.45),
                ("Premium", 0.28),
                ("VIP", 0.12),
            ]),
            spending_persona: WeightTable::new([
                ("Budget", 0.30),
                ("Moderate", 0.40),
                ("High Spender", 0.20),
                ("Impulse", 0.10),
            ]),
            preferred_method: WeightTable::new(METHOD_WEIGHTS),
        }
    }
}

impl Default for SeasonalityConfig {
    fn default() -> Self {
        let boosts = |pairs: &[(&str, f64)]| -> BTreeMap<String, f64> {
            pairs.iter().map(|(c, b)| (c.to_string(), *b)).collect()
        };
        Self {
            // Jan new-year sales, Mar Holi, Aug Independence Day sales,
            // Oct-Nov festive season, Dec year-end.
            monthly_multipliers: vec![
                1.15, 0.90, 1.05, 0.95, 0.90, 0.85, 1.00, 1.10, 1.05, 1.30, 1.35, 1.20,
            ],
            category_boosts: [
                (3, boosts(&[("Shopping", 1.2), ("Food & Dining", 1.3)])),
                (8, boosts(&[("Shopping", 1.4)])),
                (
                    10,
                    boosts(&[("Shopping", 1.6), ("Food & Dining", 1.3), ("Entertainment", 1.2)]),
                ),
                (
                    11,
                    boosts(&[
                        ("Shopping", 1.8),
                        ("Food & Dining", 1.4),
                        ("Travel", 1.3),
                        ("Entertainment", 1.3),
                    ]),
                ),
                (
                    12,
                    boosts(&[("Shopping", 1.3), ("Travel", 1.4), ("Food & Dining", 1.2)]),
                ),
            ]
            .into(),
            hour_weights: vec![
                0.5, 0.3, 0.2, 0.2, 0.2, 0.3, 0.8, 1.5, 2.5, 3.5, 4.0, 4.5, 5.0, 4.5, 3.5, 3.0,
                3.5, 4.0, 4.5, 5.0, 4.5, 3.5, 2.5, 1.5,
            ],
            weekend_boost: 1.2,
            weekend_categories: strings(&["Food & Dining", "Entertainment", "Shopping"]),
        }
    }
}

impl Default for ProcessingTimeConfig {
    fn default() -> Self {
        Self {
            success: UniformRange::new(0.5, 3.0),
            failed: UniformRange::new(2.0, 15.0),
            pending: UniformRange::new(5.0, 30.0),
        }
    }
}

impl Default for BehaviourConfig {
    fn default() -> Self {
        Self {
            preferred_method_stickiness: 2.5,
            pending_probability: 0.03,
            peak_hours: vec![12, 13, 18, 19, 20],
            peak_failure_multiplier: 1.4,
            processing_time: ProcessingTimeConfig::default(),
            cashback_fraction: UniformRange::new(0.01, 0.10),
            discount_categories: strings(&["Shopping", "Food & Dining", "Groceries"]),
            discount_probability: 0.30,
            discount_fraction: UniformRange::new(0.05, 0.20),
            refund_categories: strings(&["Shopping", "Travel", "Food & Dining", "Entertainment"]),
            refund_probability: 0.04,
            full_refund_probability: 0.6,
            partial_refund_fraction: UniformRange::new(0.3, 0.8),
        }
    }
}

impl Default for FraudRulesConfig {
    fn default() -> Self {
        Self {
            high_value_probability: 0.15,
            default_high_value_threshold: 50_000.0,
            late_night_hours: vec![0, 1, 2, 3, 4],
            late_night_amount: 5_000.0,
            late_night_probability: 0.20,
            baseline_probability: 0.008,
            generic_reasons: strings(&[
                "Multiple Failed Attempts",
                "Velocity Check Triggered",
                "Device Mismatch",
                "Location Anomaly",
                "New Device Login",
            ]),
        }
    }
}

fn default_methods() -> BTreeMap<String, MethodProfile> {
    let profile = |rate: f64, reasons: &[&str], cashback: f64| MethodProfile {
        failure_rate: rate,
        failure_reasons: strings(reasons),
        cashback_probability: cashback,
    };
    [
        (
            "UPI",
            profile(
                0.06,
                &[
                    "Server Timeout",
                    "Insufficient Balance",
                    "Invalid UPI ID",
                    "Bank Server Down",
                    "Transaction Limit Exceeded",
                ],
                0.12,
            ),
        ),
        (
            "Credit Card",
            profile(
                0.04,
                &[
                    "Card Declined",
                    "Insufficient Limit",
                    "CVV Mismatch",
                    "Card Expired",
                    "3D Auth Failed",
                ],
                0.25,
            ),
        ),
        (
            "Debit Card",
            profile(
                0.08,
                &[
                    "Insufficient Balance",
                    "Card Blocked",
                    "PIN Incorrect",
                    "Daily Limit Exceeded",
                    "Bank Server Down",
                ],
                0.12,
            ),
        ),
        (
            "Net Banking",
            profile(
                0.10,
                &[
                    "Session Expired",
                    "OTP Failed",
                    "Bank Server Down",
                    "Authentication Failed",
                    "Timeout",
                ],
                0.12,
            ),
        ),
        (
            "Mobile Wallet",
            profile(
                0.05,
                &[
                    "Insufficient Balance",
                    "Wallet Limit Exceeded",
                    "KYC Pending",
                    "Server Error",
                    "Invalid PIN",
                ],
                0.25,
            ),
        ),
    ]
    .into_iter()
    .map(|(m, p)| (m.to_string(), p))
    .collect()
}

fn default_categories() -> BTreeMap<String, CategoryProfile> {
    let profile = |low: f64, high: f64, threshold: f64, merchants: &[&str]| CategoryProfile {
        amount_range: AmountRange { low, high },
        merchants: strings(merchants),
        high_value_threshold: Some(threshold),
    };
    [
        (
            "Food & Dining",
            profile(
                50.0,
                2_500.0,
                2_000.0,
                &[
                    "Swiggy",
                    "Zomato",
                    "Dominos",
                    "McDonalds",
                    "Starbucks",
                    "KFC",
                    "Pizza Hut",
                    "Haldirams",
                ],
            ),
        ),
        (
            "Shopping",
            profile(
                200.0,
                15_000.0,
                12_000.0,
                &[
                    "Amazon",
                    "Flipkart",
                    "Myntra",
                    "Ajio",
                    "Meesho",
                    "Nykaa",
                    "Croma",
                    "Reliance Digital",
                ],
            ),
        ),
        (
            "Bills & Utilities",
            profile(
                100.0,
                5_000.0,
                4_000.0,
                &[
                    "Jio Recharge",
                    "Airtel",
                    "Electricity Board",
                    "Gas Agency",
                    "Water Board",
                    "Broadband Bill",
                    "DTH Recharge",
                ],
            ),
        ),
        (
            "Travel",
            profile(
                150.0,
                12_000.0,
                10_000.0,
                &["IRCTC", "MakeMyTrip", "Uber", "Ola", "RedBus", "Yatra", "GoIbibo", "Rapido"],
            ),
        ),
        (
            "Entertainment",
            profile(
                99.0,
                1_500.0,
                1_200.0,
                &[
                    "Netflix",
                    "Spotify",
                    "BookMyShow",
                    "Hotstar",
                    "Amazon Prime",
                    "YouTube Premium",
                    "Sony LIV",
                ],
            ),
        ),
        (
            "Health",
            profile(
                50.0,
                8_000.0,
                6_000.0,
                &[
                    "Pharmeasy",
                    "Apollo Pharmacy",
                    "1mg",
                    "Practo",
                    "Netmeds",
                    "MediBuddy",
                    "Tata Health",
                ],
            ),
        ),
        (
            "Education",
            profile(
                500.0,
                20_000.0,
                15_000.0,
                &[
                    "Udemy",
                    "Coursera",
                    "Unacademy",
                    "BYJU'S",
                    "Skillshare",
                    "Simplilearn",
                    "upGrad",
                ],
            ),
        ),
        (
            "Transfers",
            profile(
                100.0,
                50_000.0,
                40_000.0,
                &[
                    "Google Pay P2P",
                    "PhonePe P2P",
                    "Paytm P2P",
                    "NEFT Transfer",
                    "IMPS Transfer",
                    "UPI Transfer",
                ],
            ),
        ),
        (
            "Groceries",
            profile(
                80.0,
                4_000.0,
                3_000.0,
                &["BigBasket", "Blinkit", "Zepto", "JioMart", "DMart", "Swiggy Instamart"],
            ),
        ),
        (
            "Investments",
            profile(
                500.0,
                100_000.0,
                80_000.0,
                &["Zerodha", "Groww", "CAMS Mutual Fund", "Paytm Money", "Coin by Zerodha"],
            ),
        ),
    ]
    .into_iter()
    .map(|(c, p)| (c.to_string(), p))
    .collect()
}

fn default_devices() -> BTreeMap<String, WeightTable> {
    let handheld = WeightTable::new([("Android", 0.72), ("iOS", 0.28)]);
    [
        ("Mobile App", handheld.clone()),
        (
            "Web Browser",
            WeightTable::new([("Windows", 0.65), ("Mac", 0.25), ("Linux", 0.10)]),
        ),
        ("POS Terminal", WeightTable::new([("POS", 1.0)])),
        ("QR Code", handheld),
    ]
    .into_iter()
    .map(|(p, t)| (p.to_string(), t))
    .collect()
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            population_size: 500,
            transaction_count: 60_000,
            date_range: DateRange::default(),
            random_seed: 42,
            allocation: AllocationPolicy::default(),
            population: PopulationConfig::default(),
            method_weights: WeightTable::new(METHOD_WEIGHTS),
            category_weights: WeightTable::new([
                ("Food & Dining", 0.20),
                ("Shopping", 0.17),
                ("Bills & Utilities", 0.15),
                ("Travel", 0.10),
                ("Entertainment", 0.09),
                ("Health", 0.06),
                ("Education", 0.04),
                ("Transfers", 0.06),
                ("Groceries", 0.08),
                ("Investments", 0.05),
            ]),
            platform_weights: WeightTable::new([
                ("Mobile App", 0.45),
                ("Web Browser", 0.25),
                ("POS Terminal", 0.15),
                ("QR Code", 0.15),
            ]),
            methods: default_methods(),
            categories: default_categories(),
            devices: default_devices(),
            personas: [
                ("Budget", 0.6),
                ("Moderate", 1.0),
                ("High Spender", 1.8),
                ("Impulse", 1.3),
            ]
            .into_iter()
            .map(|(p, m)| (p.to_string(), m))
            .collect(),
            seasonality: SeasonalityConfig::default(),
            behaviour: BehaviourConfig::default(),
            fraud: FraudRulesConfig::default(),
        }
    }
}
