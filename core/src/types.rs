//! Shared primitive types used across the generator.

/// Stable user identifier, `USR00001` style.
pub type UserId = String;

/// Transaction identifier in generation order, `TXN0000001` style.
pub type TransactionId = String;

/// Identifier of one generation run inside a dataset store.
pub type RunId = String;

/// Calendar month, 1..=12.
pub type Month = u32;

/// Hour of day, 0..=23.
pub type Hour = u32;

/// `YYYY-MM-DD HH:MM:SS`, the timestamp layout of the tabular outputs.
pub mod datetime_format {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub fn serialize<S: Serializer>(dt: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&dt.format(FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom)
    }
}
