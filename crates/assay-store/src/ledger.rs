//! Epoch ledger over SQLite

use assay_domain::traits::EpochLedger;
use assay_domain::{
    AllocationDraft, AllocationId, AllocationRecord, CommitOutcome, DeductOutcome, Epoch, Genesis,
    LedgerSnapshot, MetalBalance, MetalCategory, RunningTotals, SubmissionId,
};
use rusqlite::{params, Connection, OptionalExtension, Row, TransactionBehavior};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, info, warn};

use crate::{
    allocation_id_to_bytes, bytes_to_allocation_id, is_constraint_violation, read_balance,
    read_balance_row, read_epoch, read_metal, read_totals, read_u64, to_sql_int, SqliteLedger,
    StoreError, BALANCE_COLUMNS,
};

/// Current time in milliseconds since the Unix epoch
fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

const ALLOCATION_COLUMNS: &str = "id, submission_id, contributor_id, metal, epoch, amount, \
     tier_multiplier, amplification, balance_before, balance_after, allocated_at";

fn read_allocation_row(row: &Row<'_>) -> rusqlite::Result<AllocationRecord> {
    let id_bytes: Vec<u8> = row.get(0)?;
    let id = bytes_to_allocation_id(&id_bytes).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Blob, Box::new(e))
    })?;
    let submission_id: String = row.get(1)?;

    Ok(AllocationRecord {
        id,
        submission_id: SubmissionId::new(submission_id),
        contributor_id: row.get(2)?,
        metal: read_metal(row, 3)?,
        epoch: read_epoch(row, 4)?,
        amount: read_u64(row, 5)?,
        tier_multiplier: row.get(6)?,
        amplification: row.get(7)?,
        balance_before: read_u64(row, 8)?,
        balance_after: read_u64(row, 9)?,
        allocated_at: read_u64(row, 10)?,
    })
}

fn allocation_exists(
    conn: &Connection,
    submission_id: &SubmissionId,
    metal: MetalCategory,
) -> Result<bool, StoreError> {
    let exists = conn
        .query_row(
            "SELECT 1 FROM allocations WHERE submission_id = ?1 AND metal = ?2",
            params![submission_id.as_str(), metal.as_str()],
            |_| Ok(true),
        )
        .optional()?
        .unwrap_or(false);
    Ok(exists)
}

impl SqliteLedger {
    /// Check-and-deduct inside an open write transaction
    ///
    /// The UPDATE is guarded on the balance just read, so a concurrent writer
    /// slipping in between would make it affect zero rows instead of
    /// overdrawing. `limit` gives the most that may be taken from the pool
    /// as it stands inside the transaction.
    fn deduct_in_tx(
        conn: &Connection,
        epoch: Epoch,
        metal: MetalCategory,
        amount: u64,
        limit: fn(&MetalBalance) -> u64,
    ) -> Result<DeductOutcome, StoreError> {
        let totals = read_totals(conn)?.ok_or(StoreError::NotInitialized)?;
        if !epoch.is_open_within(totals.open_epochs) {
            return Ok(DeductOutcome::EpochClosed);
        }

        let current = read_balance(conn, epoch, metal)?;
        let available = limit(&current);
        if amount > available {
            return Ok(DeductOutcome::InsufficientReserve {
                requested: amount,
                available,
            });
        }
        let Some(next) = current.deducted(amount) else {
            return Ok(DeductOutcome::InsufficientReserve {
                requested: amount,
                available: current.balance,
            });
        };

        let changed = conn.execute(
            "UPDATE metal_balances
             SET balance = ?1, halving_threshold = ?2, per_distribution_increment = ?3, halvings = ?4
             WHERE epoch = ?5 AND metal = ?6 AND balance = ?7",
            params![
                to_sql_int(next.balance)?,
                to_sql_int(next.halving_threshold)?,
                to_sql_int(next.per_distribution_increment)?,
                next.halvings,
                epoch.as_str(),
                metal.as_str(),
                to_sql_int(current.balance)?,
            ],
        )?;
        if changed != 1 {
            return Err(StoreError::InvalidData(format!(
                "Balance for {}/{} changed during deduction",
                epoch, metal
            )));
        }

        conn.execute(
            "UPDATE ledger_totals SET total_distributed = total_distributed + ?1 WHERE id = 1",
            params![to_sql_int(amount)?],
        )?;

        if next.halvings > current.halvings {
            info!(
                epoch = %epoch,
                metal = %metal,
                halvings = next.halvings,
                halving_threshold = next.halving_threshold,
                per_distribution_increment = next.per_distribution_increment,
                "Pool crossed halving threshold"
            );
        }

        Ok(DeductOutcome::Deducted {
            balance_before: current.balance,
            balance_after: next.balance,
        })
    }

    fn insert_pool(conn: &Connection, pool: &MetalBalance) -> Result<(), StoreError> {
        conn.execute(
            &format!(
                "INSERT INTO metal_balances ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                BALANCE_COLUMNS
            ),
            params![
                pool.epoch.as_str(),
                pool.metal.as_str(),
                to_sql_int(pool.balance)?,
                to_sql_int(pool.halving_threshold)?,
                to_sql_int(pool.per_distribution_increment)?,
                pool.percentage_of_total_supply,
                pool.halvings,
            ],
        )?;
        Ok(())
    }
}

impl EpochLedger for SqliteLedger {
    type Error = StoreError;

    fn initialize(&self, genesis: &Genesis) -> Result<bool, Self::Error> {
        let mut conn = self.lock()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        if read_totals(&tx)?.is_some() {
            debug!("Ledger already seeded; genesis ignored");
            return Ok(false);
        }

        let pools = genesis.pools();
        for pool in &pools {
            Self::insert_pool(&tx, pool)?;
        }
        tx.execute(
            "INSERT INTO ledger_totals (id, total_supply, total_distributed, allocation_count, open_epochs)
             VALUES (1, ?1, 0, 0, 1)",
            params![to_sql_int(genesis.total_supply)?],
        )?;
        tx.commit()?;

        info!(
            total_supply = genesis.total_supply,
            pools = pools.len(),
            epoch = %Epoch::Founder,
            "Seeded ledger from genesis"
        );
        Ok(true)
    }

    fn open_next_epoch(&self) -> Result<Option<Epoch>, Self::Error> {
        let mut conn = self.lock()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let totals = read_totals(&tx)?.ok_or(StoreError::NotInitialized)?;
        let Some(epoch) = Epoch::from_ordinal(totals.open_epochs) else {
            debug!("Every epoch is already open");
            return Ok(None);
        };

        tx.execute(
            "UPDATE ledger_totals SET open_epochs = open_epochs + 1 WHERE id = 1",
            [],
        )?;
        tx.commit()?;

        info!(epoch = %epoch, open_epochs = totals.open_epochs + 1, "Opened epoch");
        Ok(Some(epoch))
    }

    fn balance(&self, epoch: Epoch, metal: MetalCategory) -> Result<MetalBalance, Self::Error> {
        let conn = self.lock()?;
        read_balance(&conn, epoch, metal)
    }

    fn try_deduct(
        &self,
        epoch: Epoch,
        metal: MetalCategory,
        amount: u64,
    ) -> Result<DeductOutcome, Self::Error> {
        let mut conn = self.lock()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let outcome = Self::deduct_in_tx(&tx, epoch, metal, amount, |pool| pool.balance)?;
        match &outcome {
            DeductOutcome::Deducted {
                balance_before,
                balance_after,
            } => {
                tx.commit()?;
                info!(
                    epoch = %epoch,
                    metal = %metal,
                    amount,
                    balance_before,
                    balance_after,
                    "Deducted from pool"
                );
            }
            DeductOutcome::InsufficientReserve { requested, available } => {
                info!(epoch = %epoch, metal = %metal, requested, available, "Insufficient reserve");
            }
            DeductOutcome::EpochClosed => {
                info!(epoch = %epoch, metal = %metal, "Deduction against closed epoch");
            }
        }
        Ok(outcome)
    }

    fn has_allocation(
        &self,
        submission_id: &SubmissionId,
        metal: MetalCategory,
    ) -> Result<bool, Self::Error> {
        let conn = self.lock()?;
        allocation_exists(&conn, submission_id, metal)
    }

    fn commit_allocation(&self, draft: &AllocationDraft) -> Result<CommitOutcome, Self::Error> {
        let mut conn = self.lock()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        if allocation_exists(&tx, &draft.submission_id, draft.metal)? {
            return Ok(CommitOutcome::AlreadyAllocated);
        }

        // Commits may take at most half of the live balance
        let outcome = Self::deduct_in_tx(
            &tx,
            draft.epoch,
            draft.metal,
            draft.amount,
            MetalBalance::allocatable,
        )?;
        let (balance_before, balance_after) = match outcome {
            DeductOutcome::Deducted {
                balance_before,
                balance_after,
            } => (balance_before, balance_after),
            DeductOutcome::InsufficientReserve { requested, available } => {
                return Ok(CommitOutcome::InsufficientReserve { requested, available });
            }
            DeductOutcome::EpochClosed => return Ok(CommitOutcome::EpochClosed),
        };

        let record = AllocationRecord {
            id: AllocationId::new(),
            submission_id: draft.submission_id.clone(),
            contributor_id: draft.contributor_id.clone(),
            metal: draft.metal,
            epoch: draft.epoch,
            amount: draft.amount,
            tier_multiplier: draft.tier_multiplier,
            amplification: draft.amplification,
            balance_before,
            balance_after,
            allocated_at: now_millis(),
        };

        let inserted = tx.execute(
            &format!(
                "INSERT INTO allocations ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                ALLOCATION_COLUMNS
            ),
            params![
                allocation_id_to_bytes(record.id),
                record.submission_id.as_str(),
                &record.contributor_id,
                record.metal.as_str(),
                record.epoch.as_str(),
                to_sql_int(record.amount)?,
                record.tier_multiplier,
                record.amplification,
                to_sql_int(record.balance_before)?,
                to_sql_int(record.balance_after)?,
                to_sql_int(record.allocated_at)?,
            ],
        );
        match inserted {
            Ok(_) => {}
            Err(e) if is_constraint_violation(&e) => {
                warn!(
                    submission_id = %draft.submission_id,
                    metal = %draft.metal,
                    "Uniqueness constraint hit on insert; rolled back"
                );
                return Ok(CommitOutcome::AlreadyAllocated);
            }
            Err(e) => return Err(e.into()),
        }

        tx.execute(
            "UPDATE ledger_totals SET allocation_count = allocation_count + 1 WHERE id = 1",
            [],
        )?;
        tx.commit()?;

        info!(
            submission_id = %record.submission_id,
            epoch = %record.epoch,
            metal = %record.metal,
            amount = record.amount,
            balance_before = record.balance_before,
            balance_after = record.balance_after,
            "Committed allocation"
        );
        Ok(CommitOutcome::Committed(record))
    }

    fn allocations_for(
        &self,
        submission_id: &SubmissionId,
    ) -> Result<Vec<AllocationRecord>, Self::Error> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM allocations WHERE submission_id = ?1 ORDER BY id",
            ALLOCATION_COLUMNS
        ))?;
        let records = stmt
            .query_map(params![submission_id.as_str()], read_allocation_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }

    fn totals(&self) -> Result<RunningTotals, Self::Error> {
        let conn = self.lock()?;
        Ok(read_totals(&conn)?.unwrap_or_default())
    }

    fn snapshot(&self) -> Result<LedgerSnapshot, Self::Error> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!("SELECT {} FROM metal_balances", BALANCE_COLUMNS))?;
        let mut balances = stmt
            .query_map([], read_balance_row)?
            .collect::<Result<Vec<_>, _>>()?;
        balances.sort_by_key(|b| (b.epoch, b.metal));

        let totals = read_totals(&conn)?.unwrap_or_default();
        Ok(LedgerSnapshot { balances, totals })
    }
}
