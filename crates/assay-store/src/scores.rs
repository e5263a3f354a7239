//! Score record persistence

use assay_domain::traits::ScoreStore;
use assay_domain::{ScoreRecord, SubmissionId};
use rusqlite::{params, OptionalExtension, TransactionBehavior};
use tracing::debug;

use crate::{SqliteLedger, StoreError};

impl ScoreStore for SqliteLedger {
    type Error = StoreError;

    fn save_score_record(&self, record: &ScoreRecord) -> Result<(), Self::Error> {
        let json = serde_json::to_string(record)?;

        let mut conn = self.lock()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let existing: Option<String> = tx
            .query_row(
                "SELECT record_json FROM score_records WHERE submission_id = ?1",
                params![record.submission_id.as_str()],
                |row| row.get(0),
            )
            .optional()?;

        match existing {
            Some(stored) if stored == json => {
                debug!(submission_id = %record.submission_id, "Score record already stored");
                Ok(())
            }
            Some(_) => Err(StoreError::ConflictingScoreRecord(
                record.submission_id.to_string(),
            )),
            None => {
                tx.execute(
                    "INSERT INTO score_records
                     (submission_id, config_version, composite_total, qualification, integrity_hash, record_json)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                    params![
                        record.submission_id.as_str(),
                        &record.config_version,
                        record.composite_total,
                        record.qualification.map(|e| e.as_str()),
                        &record.integrity_hash,
                        &json,
                    ],
                )?;
                tx.commit()?;
                debug!(submission_id = %record.submission_id, "Stored score record");
                Ok(())
            }
        }
    }

    fn get_score_record(&self, id: &SubmissionId) -> Result<Option<ScoreRecord>, Self::Error> {
        let conn = self.lock()?;
        let json: Option<String> = conn
            .query_row(
                "SELECT record_json FROM score_records WHERE submission_id = ?1",
                params![id.as_str()],
                |row| row.get(0),
            )
            .optional()?;

        json.map(|j| serde_json::from_str(&j).map_err(StoreError::from))
            .transpose()
    }
}
