//! The scoring pipeline: evaluator output in, sealed score record out

use assay_domain::traits::Evaluator;
use assay_domain::{EvaluatorOutput, ScoreRecord, SubmissionId};
use assay_gatekeeper::Gatekeeper;
use tracing::{debug, info};

use crate::classifier::{qualify, resolve_metals};
use crate::composite::{CompositeInput, CompositeScorer};
use crate::integrity::seal;
use crate::normalizer::normalize;
use crate::precision::couple;
use crate::{ScorerError, ScoringConfig};

/// Stateless scoring pipeline
///
/// Normalizer → validator → precision coupler → composite scorer →
/// classifier → integrity seal. Identical inputs under the same
/// configuration version always produce byte-identical records.
pub struct ScoringPipeline {
    config: ScoringConfig,
    gatekeeper: Gatekeeper,
    composite: CompositeScorer,
}

impl ScoringPipeline {
    /// Create a pipeline from a scoring configuration and a gatekeeper
    pub fn new(config: ScoringConfig, gatekeeper: Gatekeeper) -> Self {
        let composite = CompositeScorer::new(config.clone());
        Self {
            config,
            gatekeeper,
            composite,
        }
    }

    /// Create a pipeline after validating the configuration
    pub fn try_new(config: ScoringConfig, gatekeeper: Gatekeeper) -> Result<Self, ScorerError> {
        config.validate().map_err(ScorerError::Config)?;
        Ok(Self::new(config, gatekeeper))
    }

    /// Create a pipeline with default configuration
    pub fn default_pipeline() -> Self {
        Self::new(ScoringConfig::default(), Gatekeeper::default_config())
    }

    /// The active configuration
    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Score one submission's evaluator output
    pub fn score(
        &self,
        submission_id: impl Into<SubmissionId>,
        output: &EvaluatorOutput,
    ) -> Result<ScoreRecord, ScorerError> {
        self.score_with_hint(submission_id, output, None)
    }

    /// Score with a category hint for the metal heuristic
    pub fn score_with_hint(
        &self,
        submission_id: impl Into<SubmissionId>,
        output: &EvaluatorOutput,
        category_hint: Option<&str>,
    ) -> Result<ScoreRecord, ScorerError> {
        let submission_id = submission_id.into();
        let normalized = normalize(output, self.config.dimension_max);

        let verdict = self.gatekeeper.validate(output.testability.as_ref());
        let precision = couple(normalized.dimensions.coherence, &verdict);

        let (composite_total, modifiers) = self.composite.compute(&CompositeInput {
            dimensions: normalized.dimensions,
            overlap_percent: normalized.overlap_percent,
            overlap_penalty_percent: normalized.overlap_penalty_percent,
            seed: normalized.seed.flagged,
            edge: normalized.edge.flagged,
        });

        let qualification = qualify(composite_total);
        let (metal_recommendation, recommended_metals) = resolve_metals(
            &output.recommended_metals,
            &normalized.dimensions,
            category_hint,
            self.config.metal_dominance_ratio,
        );

        debug!(
            submission_id = %submission_id,
            base_sum = modifiers.base_sum,
            policy = ?modifiers.overlap_policy,
            precision_index = precision.index,
            "Computed composite"
        );

        let record = seal(ScoreRecord {
            submission_id,
            config_version: self.config.version.clone(),
            dimensions: normalized.dimensions,
            composite_total,
            modifiers,
            seed: normalized.seed,
            edge: normalized.edge,
            precision,
            validity: output.testability.as_ref().map(|_| verdict),
            qualification,
            metal_recommendation,
            recommended_metals,
            integrity_hash: String::new(),
        })?;

        info!(
            submission_id = %record.submission_id,
            composite_total = record.composite_total,
            qualification = record.qualification.map(|e| e.as_str()).unwrap_or("none"),
            metal = ?record.metal_recommendation,
            "Scored submission"
        );

        Ok(record)
    }

    /// Call the evaluator, then score its output
    ///
    /// Only evaluator transport failures are errors. This is a blocking call;
    /// with `OllamaEvaluator` on a current-thread runtime the evaluator returns
    /// an error, so async callers should await the evaluator and use `score`.
    pub fn evaluate_and_score<E>(
        &self,
        evaluator: &E,
        submission_id: impl Into<SubmissionId>,
        text: &str,
        category_hint: Option<&str>,
    ) -> Result<ScoreRecord, ScorerError>
    where
        E: Evaluator,
        E::Error: std::fmt::Display,
    {
        let output = evaluator
            .evaluate(text, category_hint)
            .map_err(|e| ScorerError::Evaluator(e.to_string()))?;
        self.score_with_hint(submission_id, &output, category_hint)
    }
}

impl Default for ScoringPipeline {
    fn default() -> Self {
        Self::default_pipeline()
    }
}

