//! Output sinks for the generated tables.
//!
//! RULE: The generator never touches files or databases.
//! It returns a `Dataset`; a sink decides how the rows are persisted.

use crate::{
    error::SynthResult,
    generator::Dataset,
    population::User,
    sampler::Transaction,
};
use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

pub const TRANSACTIONS_FILE: &str = "transactions_raw.csv";
pub const USERS_FILE: &str = "user_profiles.csv";

/// Anything that can persist the two generated tables.
pub trait DatasetSink {
    fn write_users(&mut self, users: &[User]) -> SynthResult<()>;

    fn write_transactions(&mut self, transactions: &[Transaction]) -> SynthResult<()>;

    fn write_dataset(&mut self, dataset: &Dataset) -> SynthResult<()> {
        self.write_users(&dataset.users)?;
        self.write_transactions(&dataset.transactions)
    }
}

/// Delimited-text sink: one header row, one record per row.
/// Absent optionals serialize as empty fields.
pub struct CsvSink<W: Write> {
    users: csv::Writer<W>,
    transactions: csv::Writer<W>,
}

impl<W: Write> CsvSink<W> {
    pub fn new(users: W, transactions: W) -> Self {
        Self {
            users: csv::Writer::from_writer(users),
            transactions: csv::Writer::from_writer(transactions),
        }
    }

    /// Flush both writers and hand back (users, transactions).
    pub fn into_inner(self) -> SynthResult<(W, W)> {
        let users = self.users.into_inner().map_err(|e| e.into_error())?;
        let transactions = self.transactions.into_inner().map_err(|e| e.into_error())?;
        Ok((users, transactions))
    }
}

impl CsvSink<File> {
    /// Create `user_profiles.csv` and `transactions_raw.csv` under `dir`.
    pub fn create_in(dir: impl AsRef<Path>) -> SynthResult<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        let users = File::create(dir.join(USERS_FILE))?;
        let transactions = File::create(dir.join(TRANSACTIONS_FILE))?;
        Ok(Self::new(users, transactions))
    }

    pub fn paths_in(dir: impl AsRef<Path>) -> (PathBuf, PathBuf) {
        let dir = dir.as_ref();
        (dir.join(USERS_FILE), dir.join(TRANSACTIONS_FILE))
    }
}

impl<W: Write> DatasetSink for CsvSink<W> {
    fn write_users(&mut self, users: &[User]) -> SynthResult<()> {
        for user in users {
            self.users.serialize(user)?;
        }
        self.users.flush()?;
        log::info!("sink: wrote {} user rows (csv)", users.len());
        Ok(())
    }

    fn write_transactions(&mut self, transactions: &[Transaction]) -> SynthResult<()> {
        for txn in transactions {
            self.transactions.serialize(txn)?;
        }
        self.transactions.flush()?;
        log::info!("sink: wrote {} transaction rows (csv)", transactions.len());
        Ok(())
    }
}

/// Render a dataset to in-memory CSV bytes: (users, transactions).
pub fn to_csv_bytes(dataset: &Dataset) -> SynthResult<(Vec<u8>, Vec<u8>)> {
    let mut sink = CsvSink::new(Vec::new(), Vec::new());
    sink.write_dataset(dataset)?;
    sink.into_inner()
}

/// Read a transactions CSV back into rows.
pub fn read_transactions_csv(path: impl AsRef<Path>) -> SynthResult<Vec<Transaction>> {
    let mut reader = csv::Reader::from_path(path)?;
    let rows = reader
        .deserialize()
        .collect::<Result<Vec<Transaction>, _>>()?;
    Ok(rows)
}

/// Read a user profiles CSV back into rows.
pub fn read_users_csv(path: impl AsRef<Path>) -> SynthResult<Vec<User>> {
    let mut reader = csv::Reader::from_path(path)?;
    let rows = reader.deserialize().collect::<Result<Vec<User>, _>>()?;
    Ok(rows)
}
