//! SQLite persistence layer.
//!
//! RULE: Only store.rs talks to the database.
//! Callers use store methods or the `DatasetSink` returned by `sink()`.

use crate::{
    error::SynthResult,
    population::User,
    sampler::Transaction,
    sink::DatasetSink,
    types::{datetime_format, RunId},
};
use rusqlite::{params, Connection};
use std::collections::BTreeMap;

pub struct DatasetStore {
    conn: Connection,
}

impl DatasetStore {
    /// Open (or create) the dataset database at `path`.
    pub fn open(path: &str) -> SynthResult<Self> {
        let conn = Connection::open(path)?;
        // WAL mode only matters for real files; in-memory ignores it.
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> SynthResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> SynthResult<()> {
        self.conn
            .execute_batch(include_str!("../../migrations/001_dataset.sql"))?;
        Ok(())
    }

    // ── Run ────────────────────────────────────────────────────

    pub fn insert_run(&self, run_id: &str, seed: u64, version: &str) -> SynthResult<()> {
        self.conn.execute(
            "INSERT INTO run (run_id, seed, version, started_at) VALUES (?1, ?2, ?3, ?4)",
            params![run_id, seed as i64, version, 0i64],
        )?;
        Ok(())
    }

    /// A sink that writes rows under `run_id`. The run must exist.
    pub fn sink(&mut self, run_id: &str) -> RunSink<'_> {
        RunSink {
            store: self,
            run_id: run_id.to_string(),
        }
    }

    // ── Users ──────────────────────────────────────────────────

    pub fn insert_users(&mut self, run_id: &str, users: &[User]) -> SynthResult<()> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO user_profile (
                    run_id, user_id, city, age_group, gender, account_tenure,
                    customer_tier, spending_persona, preferred_method
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            )?;
            for u in users {
                stmt.execute(params![
                    run_id,
                    &u.user_id,
                    &u.city,
                    &u.age_group,
                    &u.gender,
                    &u.account_tenure,
                    &u.customer_tier,
                    &u.spending_persona,
                    &u.preferred_method,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    pub fn user_count(&self, run_id: &str) -> SynthResult<i64> {
        let n = self.conn.query_row(
            "SELECT COUNT(*) FROM user_profile WHERE run_id = ?1",
            params![run_id],
            |row| row.get(0),
        )?;
        Ok(n)
    }

    pub fn users(&self, run_id: &str) -> SynthResult<Vec<User>> {
        let mut stmt = self.conn.prepare(
            "SELECT user_id, city, age_group, gender, account_tenure,
                    customer_tier, spending_persona, preferred_method
             FROM user_profile WHERE run_id = ?1 ORDER BY rowid ASC",
        )?;
        let rows = stmt.query_map(params![run_id], |row| {
            Ok(User {
                user_id: row.get(0)?,
                city: row.get(1)?,
                age_group: row.get(2)?,
                gender: row.get(3)?,
                account_tenure: row.get(4)?,
                customer_tier: row.get(5)?,
                spending_persona: row.get(6)?,
                preferred_method: row.get(7)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    // ── Transactions ───────────────────────────────────────────

    /// Insert in the given order; `seq` records the position.
    pub fn insert_transactions(&mut self, run_id: &str, txns: &[Transaction]) -> SynthResult<()> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO payment_txn (
                    run_id, seq, transaction_id, user_id, transaction_datetime,
                    payment_method, category, merchant, amount, status, failure_reason,
                    platform, device_type, city, processing_time_sec, is_weekend,
                    cashback_earned, discount_applied, is_flagged, fraud_reason,
                    is_refunded, refund_amount
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11,
                          ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20, ?21, ?22)",
            )?;
            for (seq, t) in txns.iter().enumerate() {
                stmt.execute(params![
                    run_id,
                    seq as i64,
                    &t.transaction_id,
                    &t.user_id,
                    t.datetime.format(datetime_format::FORMAT).to_string(),
                    &t.payment_method,
                    &t.category,
                    &t.merchant,
                    t.amount,
                    t.status.as_str(),
                    &t.failure_reason,
                    &t.platform,
                    &t.device_type,
                    &t.city,
                    t.processing_time_sec,
                    if t.is_weekend { 1 } else { 0 },
                    t.cashback_earned,
                    t.discount_applied,
                    if t.is_flagged { 1 } else { 0 },
                    &t.fraud_reason,
                    if t.is_refunded { 1 } else { 0 },
                    t.refund_amount,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    pub fn transaction_count(&self, run_id: &str) -> SynthResult<i64> {
        let n = self.conn.query_row(
            "SELECT COUNT(*) FROM payment_txn WHERE run_id = ?1",
            params![run_id],
            |row| row.get(0),
        )?;
        Ok(n)
    }

    pub fn count_by_status(&self, run_id: &str) -> SynthResult<BTreeMap<String, i64>> {
        let mut stmt = self.conn.prepare(
            "SELECT status, COUNT(*) FROM payment_txn
             WHERE run_id = ?1 GROUP BY status ORDER BY status",
        )?;
        let rows = stmt.query_map(params![run_id], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
        })?;
        rows.collect::<Result<BTreeMap<_, _>, _>>().map_err(Into::into)
    }

    pub fn flagged_count(&self, run_id: &str) -> SynthResult<i64> {
        let n = self.conn.query_row(
            "SELECT COUNT(*) FROM payment_txn WHERE run_id = ?1 AND is_flagged = 1",
            params![run_id],
            |row| row.get(0),
        )?;
        Ok(n)
    }

    /// Transaction ids in stored (chronological) order.
    pub fn transaction_ids(&self, run_id: &str) -> SynthResult<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT transaction_id FROM payment_txn WHERE run_id = ?1 ORDER BY seq ASC",
        )?;
        let rows = stmt.query_map(params![run_id], |row| row.get(0))?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}

/// `DatasetSink` bound to one run of a `DatasetStore`.
pub struct RunSink<'a> {
    store: &'a mut DatasetStore,
    run_id: RunId,
}

impl DatasetSink for RunSink<'_> {
    fn write_users(&mut self, users: &[User]) -> SynthResult<()> {
        self.store.insert_users(&self.run_id, users)?;
        log::info!("store: wrote {} user rows for run {}", users.len(), self.run_id);
        Ok(())
    }

    fn write_transactions(&mut self, transactions: &[Transaction]) -> SynthResult<()> {
        self.store.insert_transactions(&self.run_id, transactions)?;
        log::info!(
            "store: wrote {} transaction rows for run {}",
            transactions.len(),
            self.run_id
        );
        Ok(())
    }
}
