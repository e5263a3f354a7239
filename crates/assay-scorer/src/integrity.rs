//! Content-addressed integrity hashing for score records

use assay_domain::{
    Classification, DimensionSet, Epoch, MetalCategory, MetalRecommendation, ModifierTrace,
    PrecisionResult, ScoreRecord, SubmissionId, ValidityVerdict,
};
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::ScorerError;

/// Domain separator mixed into every record hash
pub const DOMAIN_SCORE_RECORD_V1: &[u8] = b"assay:score_record:v1";

/// Every hashed field of a record, in a fixed order
#[derive(Serialize)]
struct HashPayload<'a> {
    submission_id: &'a SubmissionId,
    config_version: &'a str,
    dimensions: &'a DimensionSet,
    composite_total: u32,
    modifiers: &'a ModifierTrace,
    seed: &'a Classification,
    edge: &'a Classification,
    precision: &'a PrecisionResult,
    validity: &'a Option<ValidityVerdict>,
    qualification: &'a Option<Epoch>,
    metal_recommendation: MetalRecommendation,
    recommended_metals: &'a [MetalCategory],
}

impl<'a> From<&'a ScoreRecord> for HashPayload<'a> {
    fn from(record: &'a ScoreRecord) -> Self {
        Self {
            submission_id: &record.submission_id,
            config_version: &record.config_version,
            dimensions: &record.dimensions,
            composite_total: record.composite_total,
            modifiers: &record.modifiers,
            seed: &record.seed,
            edge: &record.edge,
            precision: &record.precision,
            validity: &record.validity,
            qualification: &record.qualification,
            metal_recommendation: record.metal_recommendation,
            recommended_metals: &record.recommended_metals,
        }
    }
}

/// Hex SHA-256 over the canonical JSON of every field except the hash itself
pub fn compute_integrity_hash(record: &ScoreRecord) -> Result<String, ScorerError> {
    let payload = serde_json::to_vec(&HashPayload::from(record))?;

    let mut hasher = Sha256::new();
    hasher.update(DOMAIN_SCORE_RECORD_V1);
    hasher.update(&payload);
    Ok(hex::encode(hasher.finalize()))
}

/// Fill in the integrity hash of a freshly built record
pub fn seal(mut record: ScoreRecord) -> Result<ScoreRecord, ScorerError> {
    record.integrity_hash = compute_integrity_hash(&record)?;
    Ok(record)
}

/// Recompute the hash and compare it with the stored one
pub fn verify_record(record: &ScoreRecord) -> Result<bool, ScorerError> {
    Ok(compute_integrity_hash(record)? == record.integrity_hash)
}
