//! The dataset generator.
//!
//! EXECUTION ORDER (fixed, never reordered):
//!   1. Validate config
//!   2. Population      (population stream)
//!   3. Volume schedule (no randomness)
//!   4. Transactions    (transaction stream), month by month in calendar order
//!   5. Assembly: stable sort by datetime; ids keep generation order
//!
//! Same config + same seed => identical output, row for row.

use crate::{
    config::SynthConfig,
    error::SynthResult,
    population::{generate_population, User},
    rng::{RngBank, StreamSlot},
    sampler::{Transaction, TransactionSampler},
    schedule::{monthly_schedule, MonthSlot},
};

/// Both generated tables.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub users: Vec<User>,
    pub transactions: Vec<Transaction>,
}

pub struct DatasetGenerator {
    config: SynthConfig,
    rng_bank: RngBank,
}

impl DatasetGenerator {
    /// Validate `config` and prepare a generator seeded from it.
    pub fn new(config: SynthConfig) -> SynthResult<Self> {
        config.validate()?;
        let rng_bank = RngBank::new(config.random_seed);
        Ok(Self { config, rng_bank })
    }

    pub fn config(&self) -> &SynthConfig {
        &self.config
    }

    pub fn schedule(&self) -> SynthResult<Vec<MonthSlot>> {
        monthly_schedule(&self.config)
    }

    /// Run the whole pipeline. Each call starts from fresh streams.
    pub fn generate(&self) -> SynthResult<Dataset> {
        let mut population_rng = self.rng_bank.for_stream(StreamSlot::Population);
        let population = generate_population(&self.config, &mut population_rng)?;

        let schedule = self.schedule()?;

        let mut txn_rng = self.rng_bank.for_stream(StreamSlot::Transaction);
        let mut sampler = TransactionSampler::new(&self.config, &population);
        let mut transactions = Vec::with_capacity(self.config.transaction_count as usize);

        for slot in &schedule {
            for _ in 0..slot.count {
                transactions.push(sampler.sample(slot, &mut txn_rng)?);
            }
            log::debug!(
                "generator: {}-{:02} sampled {} transactions",
                slot.year,
                slot.month,
                slot.count
            );
        }

        // sort_by_key is stable: equal timestamps keep generation order.
        transactions.sort_by_key(|t| t.datetime);

        log::info!(
            "generator: assembled {} transactions for {} users (seed {})",
            sampler.generated(),
            population.len(),
            self.config.random_seed
        );

        Ok(Dataset {
            users: population.into_users(),
            transactions,
        })
    }
}
