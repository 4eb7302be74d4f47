//! End-to-end pipeline: survey JSON → normalize → fit → evaluate →
//! explain → export → re-import → re-score.

use std::fmt::Write as _;

use approx::assert_abs_diff_eq;

use attrition::{
    compute_auc, dataset_from_records, load_survey, BackgroundSet, ModelArtifact,
    SamplingExplainer, Trainer,
};

/// Synthesize a survey export: dropouts have low grades and attendance.
fn write_survey_json(n_per_class: usize) -> String {
    let mut json = String::from("[");
    for i in 0..n_per_class * 2 {
        let dropped = i % 2 == 1;
        // Deterministic within-class variation.
        let jitter = (i / 2) as f64 % 5.0;
        let (nota, asistencia) = if dropped {
            (2.0 + 0.3 * jitter, 35.0 + 4.0 * jitter)
        } else {
            (7.0 + 0.4 * jitter, 80.0 + 3.0 * jitter)
        };
        if i > 0 {
            json.push(',');
        }
        write!(
            json,
            r#"{{"scores":{{"visual":{v},"activo":{a}}},"nota1":{n1},"nota2":{n2},"asistencia":{at},"deserto":{d},"nombre":"s{i}","paralelo":"A"}}"#,
            v = 3.0 + jitter,
            a = 8.0 - jitter,
            n1 = nota,
            n2 = nota + 0.5,
            at = asistencia,
            d = dropped as u8,
        )
        .unwrap();
    }
    json.push(']');
    json
}

#[test]
fn survey_to_artifact_and_back() {
    let dir = tempfile::tempdir().unwrap();
    let survey_path = dir.path().join("encuesta.json");
    let artifact_path = dir.path().join("model.json");
    std::fs::write(&survey_path, write_survey_json(30)).unwrap();

    // Ingest and normalize.
    let records = load_survey(&survey_path).unwrap();
    assert_eq!(records.len(), 60);
    let dataset = dataset_from_records(&records).unwrap();
    assert_eq!(dataset.n_features(), 5);

    // Fit and evaluate.
    let model = Trainer::default().fit(&dataset).unwrap();
    let probs: Vec<f64> = (0..dataset.n_samples())
        .map(|i| model.predict_row(dataset.row(i)).unwrap())
        .collect();
    let auc = compute_auc(dataset.labels().unwrap(), &probs).unwrap();
    assert!(auc >= 0.95, "pipeline AUC {auc}");

    // Low grades and attendance must push risk up.
    let at_risk = dataset.row(1).to_vec();
    let thriving = dataset.row(0).to_vec();
    assert!(
        model.predict_probability(&at_risk).unwrap()
            > model.predict_probability(&thriving).unwrap()
    );

    // Explain the riskiest student; the report satisfies the display contract.
    let background = BackgroundSet::from_dataset(&dataset).unwrap();
    let attr = SamplingExplainer::new(512, 42)
        .explain(&model.scorer(), &background, &at_risk)
        .unwrap();
    assert!(attr.verify(1e-9));
    let report = attr.report();
    let contribution_sum: f64 = report.contributions.values().sum();
    assert_abs_diff_eq!(
        report.base_value + contribution_sum,
        report.prediction,
        epsilon = 1e-9
    );

    // Export, re-import, and verify a consumer reproduces the scores.
    ModelArtifact::export(&model, dataset.schema())
        .save(&artifact_path)
        .unwrap();
    let (consumer_model, consumer_schema) =
        ModelArtifact::load(&artifact_path).unwrap().import().unwrap();
    assert_eq!(consumer_schema, *dataset.schema());
    for i in 0..dataset.n_samples() {
        let ours = model.predict_row(dataset.row(i)).unwrap();
        let theirs = consumer_model.predict_row(dataset.row(i)).unwrap();
        assert_eq!(ours, theirs);
    }
}
