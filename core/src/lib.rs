//! Seeded synthetic digital-payments dataset generator.
//!
//! `DatasetGenerator` turns a `SynthConfig` into a user table and a
//! transaction table; sinks persist them, `integrity` and `summary`
//! inspect them.

pub mod config;
pub mod error;
pub mod fraud_rules;
pub mod generator;
pub mod integrity;
pub mod population;
pub mod rng;
pub mod sampler;
pub mod schedule;
pub mod sink;
pub mod store;
pub mod summary;
pub mod types;
pub mod weights;
