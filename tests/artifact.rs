//! Integration tests for artifact export, import, and file exchange.

use attrition::{
    ArtifactError, FeatureSchema, LogisticModel, ModelArtifact, CURRENT_SCHEMA_VERSION,
};

fn fitted() -> (LogisticModel, FeatureSchema) {
    let schema = FeatureSchema::from_names(&[
        "visual_score",
        "activo_score",
        "nota1",
        "nota2",
        "asistencia",
    ])
    .unwrap();
    let model = LogisticModel::new(1.1, vec![0.42, -0.13, -1.58, -1.91, -2.77]);
    (model, schema)
}

// =============================================================================
// Round-Trip
// =============================================================================

#[test]
fn file_round_trip_is_exact() {
    let (model, schema) = fitted();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.json");

    ModelArtifact::export(&model, &schema).save(&path).unwrap();
    let loaded = ModelArtifact::load(&path).unwrap();
    let (back_model, back_schema) = loaded.import().unwrap();

    assert_eq!(back_model, model);
    assert_eq!(back_schema, schema);
    assert_eq!(loaded.schema_version, CURRENT_SCHEMA_VERSION);
}

/// A consumer must take evaluation order from `feature_names`, so an
/// artifact is equivalent no matter how its coefficient map is keyed-ordered.
#[test]
fn import_orders_coefficients_by_feature_names() {
    let json = r#"{
        "schema_version": 1,
        "feature_names": ["b", "a"],
        "intercept": 0.5,
        "coefficients": { "a": 1.0, "b": 2.0 }
    }"#;
    let artifact: ModelArtifact = serde_json::from_str(json).unwrap();
    let (model, schema) = artifact.import().unwrap();
    assert_eq!(schema.names(), &["b", "a"]);
    assert_eq!(model.coefficients(), &[2.0, 1.0]);
}

// =============================================================================
// Rejection
// =============================================================================

#[test]
fn unknown_schema_version_is_rejected() {
    let json = r#"{
        "schema_version": 7,
        "feature_names": ["a"],
        "intercept": 0.0,
        "coefficients": { "a": 1.0 }
    }"#;
    let artifact: ModelArtifact = serde_json::from_str(json).unwrap();
    assert!(matches!(
        artifact.import(),
        Err(ArtifactError::UnsupportedSchemaVersion(7))
    ));
}

#[test]
fn coefficient_count_mismatch_is_rejected() {
    let json = r#"{
        "schema_version": 1,
        "feature_names": ["a", "b"],
        "intercept": 0.0,
        "coefficients": { "a": 1.0 }
    }"#;
    let artifact: ModelArtifact = serde_json::from_str(json).unwrap();
    assert!(matches!(
        artifact.import(),
        Err(ArtifactError::FeatureCountMismatch { names: 2, coefficients: 1 })
    ));
}

#[test]
fn missing_file_surfaces_io_error() {
    let err = ModelArtifact::load("/nonexistent/model.json").unwrap_err();
    assert!(matches!(err, ArtifactError::Io(_)));
}

#[test]
fn truncated_json_surfaces_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{\"schema_version\": 1,").unwrap();
    assert!(matches!(
        ModelArtifact::load(&path).unwrap_err(),
        ArtifactError::Json(_)
    ));
}
