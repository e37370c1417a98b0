//! Fraud flagging rules.
//!
//! Three independent rules, evaluated in order. The first rule that
//! flags wins; later rules are not rolled for an already-flagged row.
//!   1. High value: amount above the category's threshold.
//!   2. Late night: small-hours transaction above a fixed amount.
//!   3. Baseline: a small random rate with a generic reason.
//! A rule whose condition does not hold consumes no draw.

use crate::{config::FraudRulesConfig, rng::SynthRng, types::Hour};

pub const HIGH_VALUE_REASON: &str = "Unusually High Amount";
pub const LATE_NIGHT_REASON: &str = "Suspicious Late Night Transaction";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FraudRule {
    HighValue,
    LateNight,
    Baseline,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FraudFlag {
    pub rule: FraudRule,
    pub reason: String,
}

pub fn evaluate(
    rules: &FraudRulesConfig,
    high_value_threshold: f64,
    amount: f64,
    hour: Hour,
    rng: &mut SynthRng,
) -> Option<FraudFlag> {
    if amount > high_value_threshold && rng.chance(rules.high_value_probability) {
        return Some(FraudFlag {
            rule: FraudRule::HighValue,
            reason: HIGH_VALUE_REASON.to_string(),
        });
    }

    if rules.late_night_hours.contains(&hour)
        && amount > rules.late_night_amount
        && rng.chance(rules.late_night_probability)
    {
        return Some(FraudFlag {
            rule: FraudRule::LateNight,
            reason: LATE_NIGHT_REASON.to_string(),
        });
    }

    if rng.chance(rules.baseline_probability) {
        return rng.pick(&rules.generic_reasons).map(|reason| FraudFlag {
            rule: FraudRule::Baseline,
            reason: reason.clone(),
        });
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn certain_rules() -> FraudRulesConfig {
        FraudRulesConfig {
            high_value_probability: 1.0,
            late_night_probability: 1.0,
            baseline_probability: 0.0,
            ..FraudRulesConfig::default()
        }
    }

    #[test]
    fn high_value_rule_wins_over_late_night() {
        let mut rng = SynthRng::new(5, 0);
        let flag = evaluate(&certain_rules(), 2_000.0, 9_000.0, 2, &mut rng).unwrap();
        assert_eq!(flag.rule, FraudRule::HighValue);
        assert_eq!(flag.reason, HIGH_VALUE_REASON);
    }

    #[test]
    fn late_night_needs_both_hour_and_amount() {
        let rules = certain_rules();
        let mut rng = SynthRng::new(5, 0);
        let flag = evaluate(&rules, 80_000.0, 6_000.0, 3, &mut rng).unwrap();
        assert_eq!(flag.rule, FraudRule::LateNight);

        assert!(evaluate(&rules, 80_000.0, 6_000.0, 14, &mut rng).is_none());
        assert!(evaluate(&rules, 80_000.0, 4_000.0, 3, &mut rng).is_none());
    }

    #[test]
    fn baseline_picks_a_generic_reason() {
        let rules = FraudRulesConfig {
            baseline_probability: 1.0,
            ..FraudRulesConfig::default()
        };
        let mut rng = SynthRng::new(11, 0);
        for _ in 0..50 {
            let flag = evaluate(&rules, 80_000.0, 100.0, 12, &mut rng).unwrap();
            assert_eq!(flag.rule, FraudRule::Baseline);
            assert!(rules.generic_reasons.contains(&flag.reason));
        }
    }
}
