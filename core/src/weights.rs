//! Weighted categorical sampling.
//!
//! A `WeightTable` is an ordered label -> weight list. Order matters:
//! the same seed over a reordered table picks different labels.
//! Tables are never mutated during generation; per-row adjustments
//! (`boost`, `adjust`) return a fresh table.

use crate::rng::SynthRng;
use serde::{
    de::{MapAccess, Visitor},
    ser::SerializeMap,
    Deserialize, Deserializer, Serialize, Serializer,
};
use std::{collections::BTreeMap, fmt};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct WeightTable {
    entries: Vec<(String, f64)>,
}

impl WeightTable {
    pub fn new<L: Into<String>>(entries: impl IntoIterator<Item = (L, f64)>) -> Self {
        Self {
            entries: entries.into_iter().map(|(l, w)| (l.into(), w)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(l, _)| l.as_str())
    }

    pub fn entries(&self) -> &[(String, f64)] {
        &self.entries
    }

    pub fn contains(&self, label: &str) -> bool {
        self.entries.iter().any(|(l, _)| l == label)
    }

    pub fn weight(&self, label: &str) -> Option<f64> {
        self.entries.iter().find(|(l, _)| l == label).map(|(_, w)| *w)
    }

    pub fn total(&self) -> f64 {
        self.entries.iter().map(|(_, w)| *w).sum()
    }

    /// Sample one label. Always consumes exactly one draw.
    /// `None` only when the table is empty or sums to zero.
    pub fn choose(&self, rng: &mut SynthRng) -> Option<&str> {
        let roll = rng.next_f64();
        let weights: Vec<f64> = self.entries.iter().map(|(_, w)| *w).collect();
        weighted_index(&weights, roll).map(|i| self.entries[i].0.as_str())
    }

    /// Copy of this table with one label's weight multiplied by `factor`.
    pub fn boost(&self, label: &str, factor: f64) -> WeightTable {
        self.adjust(std::iter::once((label, factor)))
    }

    /// Copy of this table with every named label's weight multiplied by
    /// its factor. Repeated labels compose multiplicatively; unknown
    /// labels are ignored.
    pub fn adjust<'a>(&self, boosts: impl IntoIterator<Item = (&'a str, f64)>) -> WeightTable {
        let mut entries = self.entries.clone();
        for (label, factor) in boosts {
            if let Some(entry) = entries.iter_mut().find(|(l, _)| l == label) {
                entry.1 *= factor;
            }
        }
        WeightTable { entries }
    }
}

/// Map a uniform roll in [0, 1) onto a weight vector.
///
/// Weights need not sum to one. Zero-weight slots are never returned.
/// Rounding at the top falls back to the last positive slot.
pub fn weighted_index(weights: &[f64], roll: f64) -> Option<usize> {
    let total: f64 = weights.iter().filter(|w| **w > 0.0).sum();
    if total <= 0.0 {
        return None;
    }
    let target = roll * total;
    let mut cumulative = 0.0;
    let mut last_positive = None;
    for (i, w) in weights.iter().enumerate() {
        if *w <= 0.0 {
            continue;
        }
        cumulative += w;
        last_positive = Some(i);
        if target < cumulative {
            return Some(i);
        }
    }
    last_positive
}

impl From<BTreeMap<String, f64>> for WeightTable {
    fn from(map: BTreeMap<String, f64>) -> Self {
        Self {
            entries: map.into_iter().collect(),
        }
    }
}

impl Serialize for WeightTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (label, weight) in &self.entries {
            map.serialize_entry(label, weight)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for WeightTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TableVisitor;

        impl<'de> Visitor<'de> for TableVisitor {
            type Value = WeightTable;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of label to non-negative weight")
            }

            // Document order is the sampling order.
            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((label, weight)) = access.next_entry::<String, f64>()? {
                    entries.push((label, weight));
                }
                Ok(WeightTable { entries })
            }
        }

        deserializer.deserialize_map(TableVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn methods() -> WeightTable {
        WeightTable::new([("UPI", 0.40), ("Credit Card", 0.18), ("Debit Card", 0.15)])
    }

    #[test]
    fn weighted_index_walks_cumulative_weights() {
        let w = [1.0, 1.0, 2.0];
        assert_eq!(weighted_index(&w, 0.0), Some(0));
        assert_eq!(weighted_index(&w, 0.24), Some(0));
        assert_eq!(weighted_index(&w, 0.26), Some(1));
        assert_eq!(weighted_index(&w, 0.99), Some(2));
    }

    #[test]
    fn zero_weight_slot_is_never_selected() {
        let w = [0.0, 3.0, 0.0];
        for i in 0..100 {
            assert_eq!(weighted_index(&w, i as f64 / 100.0), Some(1));
        }
        assert_eq!(weighted_index(&[0.0, 0.0], 0.5), None);
        assert_eq!(weighted_index(&[], 0.5), None);
    }

    #[test]
    fn boost_returns_fresh_table() {
        let base = methods();
        let boosted = base.boost("Credit Card", 2.5);
        assert_eq!(base.weight("Credit Card"), Some(0.18));
        assert!((boosted.weight("Credit Card").unwrap() - 0.45).abs() < 1e-12);
        assert_eq!(boosted.weight("UPI"), Some(0.40));
    }

    #[test]
    fn adjust_composes_multiplicatively() {
        let base = methods();
        let adjusted = base.adjust([("UPI", 1.8), ("UPI", 1.2), ("Unknown", 9.0)]);
        assert!((adjusted.weight("UPI").unwrap() - 0.40 * 1.8 * 1.2).abs() < 1e-12);
        assert_eq!(adjusted.len(), 3);
    }

    #[test]
    fn json_round_trip_preserves_order() {
        let json = r#"{"Zeta": 1.0, "Alpha": 2.0, "Mid": 0.5}"#;
        let table: WeightTable = serde_json::from_str(json).unwrap();
        let labels: Vec<&str> = table.labels().collect();
        assert_eq!(labels, vec!["Zeta", "Alpha", "Mid"]);

        let back = serde_json::to_string(&table).unwrap();
        assert_eq!(back, r#"{"Zeta":1.0,"Alpha":2.0,"Mid":0.5}"#);
    }

    #[test]
    fn choose_follows_the_table() {
        let mut rng = SynthRng::new(9, 0);
        let table = WeightTable::new([("never", 0.0), ("always", 1.0)]);
        for _ in 0..500 {
            assert_eq!(table.choose(&mut rng), Some("always"));
        }
        assert_eq!(WeightTable::default().choose(&mut rng), None);
    }
}
