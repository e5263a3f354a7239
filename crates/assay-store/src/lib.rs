//! Assay Storage Layer
//!
//! Implements the `ScoreStore` and `EpochLedger` traits using SQLite.
//!
//! # Architecture
//!
//! - `score_records`: sealed score records keyed by submission id
//! - `metal_balances`: one row per (epoch, metal) pool, `balance >= 0` enforced
//! - `allocations`: append-only, `UNIQUE (submission_id, metal)`
//! - `ledger_totals`: single row of lifetime totals and the open-epoch prefix
//!
//! Every balance mutation runs inside a `BEGIN IMMEDIATE` transaction, so
//! the check and the write are one atomic step even across processes
//! sharing the same database file.
//!
//! # Examples
//!
//! ```
//! use assay_domain::traits::EpochLedger;
//! use assay_domain::{Epoch, Genesis, MetalCategory};
//! use assay_store::SqliteLedger;
//!
//! let ledger = SqliteLedger::in_memory().unwrap();
//! ledger.initialize(&Genesis::fixed(1_000_000)).unwrap();
//! let gold = ledger.balance(Epoch::Founder, MetalCategory::Gold).unwrap();
//! assert_eq!(gold.balance, 1_000_000);
//! ```

#![warn(missing_docs)]

mod ledger;
mod scores;

use assay_domain::{AllocationId, Epoch, MetalBalance, MetalCategory, RunningTotals};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use thiserror::Error;

/// How long a writer waits for another connection's lock before failing
pub const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Record could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid data format
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Ledger has not been seeded from genesis
    #[error("Ledger not initialized")]
    NotInitialized,

    /// A different score record already exists for this submission
    #[error("Conflicting score record for submission: {0}")]
    ConflictingScoreRecord(String),

    /// Connection mutex poisoned by a panicking thread
    #[error("Connection lock poisoned")]
    LockPoisoned,
}

/// SQLite-based implementation of `ScoreStore` and `EpochLedger`
///
/// # Thread Safety
///
/// The connection sits behind a mutex, so one `SqliteLedger` can be shared
/// across threads through an `Arc`. Separate instances opened on the same
/// file coordinate through SQLite's own locking.
pub struct SqliteLedger {
    conn: Mutex<Connection>,
}

impl SqliteLedger {
    /// Open (or create) a ledger at the given database path
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.execute_batch(include_str!("schema.sql"))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open a fresh in-memory ledger
    pub fn in_memory() -> Result<Self, StoreError> {
        Self::new(":memory:")
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::LockPoisoned)
    }
}

/// Columns read by `read_balance_row`, in order
const BALANCE_COLUMNS: &str = "epoch, metal, balance, halving_threshold, \
     per_distribution_increment, percentage_of_total_supply, halvings";

fn to_sql_int(value: u64) -> Result<i64, StoreError> {
    i64::try_from(value)
        .map_err(|_| StoreError::InvalidData(format!("Value {} exceeds storage range", value)))
}

fn conversion_failure(idx: usize, message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, message.into())
}

fn read_u64(row: &Row<'_>, idx: usize) -> rusqlite::Result<u64> {
    let value: i64 = row.get(idx)?;
    u64::try_from(value).map_err(|_| rusqlite::Error::IntegralValueOutOfRange(idx, value))
}

fn read_epoch(row: &Row<'_>, idx: usize) -> rusqlite::Result<Epoch> {
    let name: String = row.get(idx)?;
    Epoch::parse(&name).ok_or_else(|| conversion_failure(idx, format!("Unknown epoch: {}", name)))
}

fn read_metal(row: &Row<'_>, idx: usize) -> rusqlite::Result<MetalCategory> {
    let name: String = row.get(idx)?;
    MetalCategory::parse(&name)
        .ok_or_else(|| conversion_failure(idx, format!("Unknown metal: {}", name)))
}

fn read_balance_row(row: &Row<'_>) -> rusqlite::Result<MetalBalance> {
    Ok(MetalBalance {
        epoch: read_epoch(row, 0)?,
        metal: read_metal(row, 1)?,
        balance: read_u64(row, 2)?,
        halving_threshold: read_u64(row, 3)?,
        per_distribution_increment: read_u64(row, 4)?,
        percentage_of_total_supply: row.get(5)?,
        halvings: row.get(6)?,
    })
}

fn read_balance(
    conn: &Connection,
    epoch: Epoch,
    metal: MetalCategory,
) -> Result<MetalBalance, StoreError> {
    conn.query_row(
        &format!(
            "SELECT {} FROM metal_balances WHERE epoch = ?1 AND metal = ?2",
            BALANCE_COLUMNS
        ),
        params![epoch.as_str(), metal.as_str()],
        read_balance_row,
    )
    .optional()?
    .ok_or(StoreError::NotInitialized)
}

fn read_totals(conn: &Connection) -> Result<Option<RunningTotals>, StoreError> {
    let totals = conn
        .query_row(
            "SELECT total_distributed, allocation_count, open_epochs FROM ledger_totals WHERE id = 1",
            [],
            |row| {
                Ok(RunningTotals {
                    total_distributed: read_u64(row, 0)?,
                    allocation_count: read_u64(row, 1)?,
                    open_epochs: row.get(2)?,
                })
            },
        )
        .optional()?;
    Ok(totals)
}

fn allocation_id_to_bytes(id: AllocationId) -> Vec<u8> {
    id.value().to_be_bytes().to_vec()
}

fn bytes_to_allocation_id(bytes: &[u8]) -> Result<AllocationId, StoreError> {
    let raw: [u8; 16] = bytes.try_into().map_err(|_| {
        StoreError::InvalidData(format!(
            "Expected 16 bytes for AllocationId, got {}",
            bytes.len()
        ))
    })?;
    Ok(AllocationId::from_value(u128::from_be_bytes(raw)))
}

fn is_constraint_violation(error: &rusqlite::Error) -> bool {
    matches!(
        error,
        rusqlite::Error::SqliteFailure(e, _) if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}
