//! Integration tests for the caregiver-baseline comparison pipeline.

use early_warning::{
    BaselineComparisonPipeline, CaregiverBaselineConfig, CaregiverLink, ChangeMeasure,
    ComparisonAnchor, ComparisonSettings, MetricPolicy, TimeSeriesTable, Window,
};

fn config() -> CaregiverBaselineConfig {
    let mut settings = ComparisonSettings {
        change_measure: ChangeMeasure::Percent,
        ..ComparisonSettings::default()
    };
    settings.metrics.push("total_steps".to_string());
    settings
        .policies
        .insert("total_steps".to_string(), MetricPolicy::drop_below(-30.0));
    CaregiverBaselineConfig {
        patient_period: Window::new(0, 90),
        settings,
    }
}

fn link(patient: &str, caregiver: &str) -> CaregiverLink {
    CaregiverLink {
        participant_id: patient.to_string(),
        caregiver_id: caregiver.to_string(),
        baseline_period: Window::new(0, 9),
    }
}

fn tables() -> (TimeSeriesTable, TimeSeriesTable) {
    let mut patients = TimeSeriesTable::new();
    let mut caregivers = TimeSeriesTable::new();
    for day in 0..10 {
        patients.insert_value("P1", day, "total_steps", 3000.0);
        caregivers.insert_value("CG1", day, "total_steps", 8000.0);
    }
    (patients, caregivers)
}

#[test]
fn patient_below_caregiver_baseline_is_flagged() {
    let (patients, caregivers) = tables();
    let links = vec![link("P1", "CG1")];
    let pipeline = BaselineComparisonPipeline::new(config()).unwrap();
    let report = pipeline.run(&patients, &caregivers, &links).unwrap();

    assert_eq!(report.results.len(), 1);
    assert_eq!(report.skipped, 0);
    let row = &report.results[0];
    assert_eq!(
        row.anchor,
        ComparisonAnchor::CaregiverBaseline {
            caregiver_id: "CG1".to_string()
        }
    );
    let c = &row.comparison;
    assert!((c.baseline.mean - 8000.0).abs() < 1e-9);
    assert!((c.target.mean - 3000.0).abs() < 1e-9);
    assert!((c.percent_delta - -62.5).abs() < 1e-9);
    assert!(c.flagged);
}

#[test]
fn patient_without_caregiver_link_is_skipped() {
    let (mut patients, caregivers) = tables();
    patients.insert_value("P2", 3, "total_steps", 4000.0);
    let links = vec![link("P1", "CG1")];
    let pipeline = BaselineComparisonPipeline::new(config()).unwrap();
    let report = pipeline.run(&patients, &caregivers, &links).unwrap();

    assert_eq!(report.skipped, 1);
    assert_eq!(report.results.len(), 1);
    assert!(report.results.iter().all(|r| r.participant_id == "P1"));
}

#[test]
fn link_to_absent_caregiver_is_skipped() {
    let (patients, caregivers) = tables();
    let links = vec![link("P1", "CG9")];
    let pipeline = BaselineComparisonPipeline::new(config()).unwrap();
    let report = pipeline.run(&patients, &caregivers, &links).unwrap();

    assert_eq!(report.skipped, 1);
    assert!(report.results.is_empty());
}

#[test]
fn inverted_baseline_period_skips_the_patient() {
    let (patients, caregivers) = tables();
    let mut bad_link = link("P1", "CG1");
    bad_link.baseline_period = Window::new(9, 0);
    let pipeline = BaselineComparisonPipeline::new(config()).unwrap();
    let report = pipeline.run(&patients, &caregivers, &[bad_link]).unwrap();

    assert_eq!(report.skipped, 1);
    assert!(report.results.is_empty());
}

#[test]
fn caregiver_window_without_values_is_non_comparable() {
    let (patients, mut caregivers) = tables();
    // Caregiver exists but has no rows inside the designated period
    caregivers.insert_value("CG2", 200, "total_steps", 7000.0);
    let links = vec![link("P1", "CG2")];
    let pipeline = BaselineComparisonPipeline::new(config()).unwrap();
    let report = pipeline.run(&patients, &caregivers, &links).unwrap();

    assert_eq!(report.results.len(), 1);
    assert_eq!(report.non_comparable, 1);
    assert!(!report.results[0].comparison.flagged);
}

#[test]
fn rows_are_ordered_by_participant_and_metric() {
    let mut patients = TimeSeriesTable::new();
    let mut caregivers = TimeSeriesTable::new();
    for pid in ["P2", "P1"] {
        for day in 0..5 {
            patients.insert_value(pid, day, "total_steps", 3000.0);
            patients.insert_value(pid, day, "mean_hr", 80.0);
        }
    }
    for day in 0..5 {
        caregivers.insert_value("CG1", day, "total_steps", 8000.0);
        caregivers.insert_value("CG1", day, "mean_hr", 65.0);
    }

    let mut config = config();
    config.settings.metrics.push("mean_hr".to_string());
    config
        .settings
        .policies
        .insert("mean_hr".to_string(), MetricPolicy::either_beyond(10.0));

    let links = vec![link("P2", "CG1"), link("P1", "CG1")];
    let pipeline = BaselineComparisonPipeline::new(config).unwrap();
    let report = pipeline.run(&patients, &caregivers, &links).unwrap();

    let keys: Vec<(String, String)> = report
        .results
        .iter()
        .map(|r| (r.participant_id.clone(), r.metric.clone()))
        .collect();
    assert_eq!(
        keys,
        vec![
            ("P1".to_string(), "mean_hr".to_string()),
            ("P1".to_string(), "total_steps".to_string()),
            ("P2".to_string(), "mean_hr".to_string()),
            ("P2".to_string(), "total_steps".to_string()),
        ]
    );
}
