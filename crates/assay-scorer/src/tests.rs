//! End-to-end tests for the scoring pipeline

#[cfg(test)]
mod tests {
    use crate::{compute_integrity_hash, verify_record, ScorerError, ScoringConfig, ScoringPipeline};
    use assay_domain::{
        CheckStatus, ClaimBridge, Epoch, EvaluatorOutput, MetalCategory, MetalRecommendation,
        OverlapPolicy, PrecisionTier, RawDimension, TestabilityBundle,
    };
    use assay_evaluator::MockEvaluator;
    use assay_gatekeeper::Gatekeeper;
    use serde_json::json;

    fn output(value: serde_json::Value) -> EvaluatorOutput {
        serde_json::from_value(value).unwrap()
    }

    fn even_dimensions(overlap: f64, penalty: f64) -> EvaluatorOutput {
        output(json!({
            "novelty": 2000,
            "density": 2000,
            "coherence": 2000,
            "alignment": 2000,
            "overlap_percent": overlap,
            "overlap_penalty_percent": penalty,
        }))
    }

    fn sound_bundle() -> TestabilityBundle {
        TestabilityBundle::new(vec![ClaimBridge {
            claim_id: "c1".to_string(),
            regime: "dilute gases".to_string(),
            observables: vec!["pressure".to_string()],
            differential_prediction: "Pressure deviates by 3% above 200 atm".to_string(),
            falsification_condition: "Deviation below 0.5% at 200 atm".to_string(),
            boundary_constraints: vec!["T > 300K".to_string()],
        }])
    }

    #[test]
    fn test_sweet_spot_qualifies_founder() {
        let pipeline = ScoringPipeline::default_pipeline();
        let record = pipeline.score("sub-a", &even_dimensions(15.0, 0.0)).unwrap();

        assert_eq!(record.composite_total, 9200);
        assert_eq!(record.qualification, Some(Epoch::Founder));
        assert_eq!(record.modifiers.overlap_policy, OverlapPolicy::SweetSpotBonus { percent: 15.0 });
        assert_eq!(record.config_version, "assay-scoring-v1");
    }

    #[test]
    fn test_excessive_overlap_qualifies_pioneer() {
        let pipeline = ScoringPipeline::default_pipeline();
        let record = pipeline.score("sub-b", &even_dimensions(40.0, 20.0)).unwrap();

        assert_eq!(record.composite_total, 6400);
        assert_eq!(record.qualification, Some(Epoch::Pioneer));
    }

    #[test]
    fn test_missing_bundle_gives_community_precision() {
        let pipeline = ScoringPipeline::default_pipeline();
        let record = pipeline
            .score("sub-c", &output(json!({"coherence": 2500})))
            .unwrap();

        assert!(record.validity.is_none());
        assert_eq!(record.precision.index, 0);
        assert_eq!(record.precision.tier, PrecisionTier::Community);
        assert_eq!(record.precision.inconsistency_penalty, 1.0);
    }

    #[test]
    fn test_sound_bundle_couples_into_precision() {
        let pipeline = ScoringPipeline::default_pipeline();
        let mut evaluation = output(json!({"coherence": 2500}));
        evaluation.testability = Some(sound_bundle());

        let record = pipeline.score("sub-p", &evaluation).unwrap();
        let validity = record.validity.unwrap();
        assert!(validity.passed());
        assert_eq!(validity.non_degeneracy, CheckStatus::Passed);
        assert_eq!(record.precision.index, 16);
        assert_eq!(record.precision.tier, PrecisionTier::Gold);
    }

    #[test]
    fn test_malformed_output_scores_zero() {
        let pipeline = ScoringPipeline::default_pipeline();
        let record = pipeline
            .score(
                "sub-bad",
                &output(json!({"novelty": [1], "density": "lots", "coherence": {"x": 1}, "alignment": false})),
            )
            .unwrap();

        assert_eq!(record.composite_total, 0);
        assert_eq!(record.qualification, None);
        assert!(!record.is_qualified());
    }

    #[test]
    fn test_deterministic_hash() {
        let pipeline = ScoringPipeline::default_pipeline();
        let evaluation = even_dimensions(12.0, 0.0);
        let first = pipeline.score("sub-d", &evaluation).unwrap();
        let second = pipeline.score("sub-d", &evaluation).unwrap();

        assert_eq!(first.integrity_hash, second.integrity_hash);
        assert_eq!(first, second);
        assert_eq!(first.integrity_hash.len(), 64);
    }

    #[test]
    fn test_hash_covers_config_version() {
        let evaluation = even_dimensions(12.0, 0.0);
        let v1 = ScoringPipeline::default_pipeline().score("sub-v", &evaluation).unwrap();

        let config = ScoringConfig {
            version: "assay-scoring-v2".to_string(),
            ..ScoringConfig::default()
        };
        let v2 = ScoringPipeline::new(config, Gatekeeper::default_config())
            .score("sub-v", &evaluation)
            .unwrap();

        assert_eq!(v1.composite_total, v2.composite_total);
        assert_ne!(v1.integrity_hash, v2.integrity_hash);
    }

    #[test]
    fn test_tampering_detected() {
        let pipeline = ScoringPipeline::default_pipeline();
        let mut record = pipeline.score("sub-t", &even_dimensions(15.0, 0.0)).unwrap();
        assert!(verify_record(&record).unwrap());

        record.composite_total = 10_000;
        assert!(!verify_record(&record).unwrap());

        record.integrity_hash = compute_integrity_hash(&record).unwrap();
        assert!(verify_record(&record).unwrap());
    }

    #[test]
    fn test_oracle_metals_recorded() {
        let pipeline = ScoringPipeline::default_pipeline();
        let mut evaluation = even_dimensions(0.0, 0.0);
        evaluation.recommended_metals = vec![MetalCategory::Gold, MetalCategory::Silver];

        let record = pipeline.score("sub-m", &evaluation).unwrap();
        assert_eq!(record.metal_recommendation, MetalRecommendation::Hybrid);
        assert_eq!(record.recommended_metals, vec![MetalCategory::Gold, MetalCategory::Silver]);
    }

    #[test]
    fn test_evaluate_and_score_with_hint() {
        let evaluator = MockEvaluator::new(
            r#"```json
            {"novelty": 2500, "density": 2500, "coherence": 500, "alignment": 500,
             "seed": {"is_seed": true, "justification": "new primitive"}}
            ```"#,
        );
        let pipeline = ScoringPipeline::default_pipeline();

        let record = pipeline
            .evaluate_and_score(&evaluator, "sub-e", "text", Some("software"))
            .unwrap();

        // 6000 × 1.15
        assert_eq!(record.composite_total, 6900);
        assert!(record.seed.flagged);
        assert_eq!(record.seed.justification.as_deref(), Some("new primitive"));
        assert_eq!(record.metal_recommendation, MetalRecommendation::Silver);
        assert_eq!(evaluator.call_count(), 1);
    }

    #[test]
    fn test_evaluator_transport_error() {
        let mut evaluator = MockEvaluator::default();
        evaluator.add_error("down");
        let pipeline = ScoringPipeline::default_pipeline();

        let result = pipeline.evaluate_and_score(&evaluator, "sub-x", "down", None);
        assert!(matches!(result, Err(ScorerError::Evaluator(_))));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = ScoringConfig {
            sweet_spot_low: 25.0,
            ..ScoringConfig::default()
        };
        assert!(ScoringPipeline::try_new(config, Gatekeeper::default_config()).is_err());
    }

    #[test]
    fn test_text_dimensions_normalized() {
        let mut evaluation = EvaluatorOutput::default();
        evaluation.novelty = RawDimension::Text("2500".to_string());
        let record = ScoringPipeline::default_pipeline().score("sub-s", &evaluation).unwrap();
        assert_eq!(record.dimensions.novelty, 2500.0);
    }
}

#[cfg(test)]
mod proptests {
    use crate::ScoringPipeline;
    use assay_domain::EvaluatorOutput;
    use proptest::prelude::*;
    use serde_json::json;

    proptest! {
        /// Property: scoring twice yields the same hash
        #[test]
        fn test_hash_determinism(
            n in -100.0..3000.0f64,
            d in -100.0..3000.0f64,
            c in -100.0..3000.0f64,
            a in -100.0..3000.0f64,
            overlap in -150.0..150.0f64,
            seed in any::<bool>(),
        ) {
            let evaluation: EvaluatorOutput = serde_json::from_value(json!({
                "novelty": n, "density": d, "coherence": c, "alignment": a,
                "overlap_percent": overlap, "seed": seed,
            })).unwrap();
            let pipeline = ScoringPipeline::default_pipeline();
            let first = pipeline.score("p", &evaluation).unwrap();
            let second = pipeline.score("p", &evaluation).unwrap();
            prop_assert_eq!(&first.integrity_hash, &second.integrity_hash);
            prop_assert!(first.composite_total <= 10_000);
        }
    }
}
