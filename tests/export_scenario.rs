//! End-to-end export tests: analyze a signal, then save it in every layout

use std::fs;
use std::path::PathBuf;

use chrono::NaiveDate;
use spectral_prep::analysis::Descriptors;
use spectral_prep::error::PersistenceErrorCodes;
use spectral_prep::persistence::{save_results, save_series, SaveFormat, SeriesExport};
use spectral_prep::{analyze, AppConfig, ExportSettings, WindowKind, WindowSpec};

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("spectral-prep-it-{}-{}", std::process::id(), name));
    fs::create_dir_all(&dir).expect("create scratch dir");
    dir
}

fn signal() -> Vec<f64> {
    (0..64).map(|i| 1.0 + (i as f64 * 0.5).sin()).collect()
}

#[test]
fn test_analysis_saved_in_every_layout() {
    let dir = scratch_dir("layouts");
    let samples = signal();
    let spec = WindowSpec::new(WindowKind::Hamming, samples.len()).normalized(true);
    let results = analyze(&samples, 32.0, Some(&spec))
        .expect("analysis")
        .with_descriptors(Descriptors {
            sample_entropy: 0.75,
            ..Descriptors::default()
        });

    let start = NaiveDate::from_ymd_opt(2023, 12, 31)
        .unwrap()
        .and_hms_milli_opt(23, 59, 59, 0)
        .unwrap();
    let series = SeriesExport::new("Probe", &samples, start, 32.0);
    let settings = ExportSettings::default();

    for name in ["series.txt", "series.sig", "series.bin"] {
        let path = dir.join(name);
        let outcome = save_series(
            &path,
            SaveFormat::from_path(&path),
            &results,
            &series,
            &settings,
        );
        assert!(outcome.success, "{name}: {}", outcome.message);
        assert!(fs::metadata(&path).unwrap().len() > 0);
    }

    let text = fs::read_to_string(dir.join("series.txt")).unwrap();
    assert!(text.contains("Start time: 2023-12-31 23:59:59.000"));
    // 63 samples at 32 Hz end in the next year
    assert!(text.contains("End time: 2024-01-01 00:00:00.968"));
    assert!(text.contains("Sample entropy: 0.75"));
    assert_eq!(text.lines().count(), 19 + samples.len());

    let sig = fs::read_to_string(dir.join("series.sig")).unwrap();
    assert_eq!(sig.lines().count(), 6 + samples.len());

    let results_path = dir.join("results.txt");
    let outcome = save_results(&results_path, &results, &settings);
    assert!(outcome.success, "{}", outcome.message);
    let table = fs::read_to_string(&results_path).unwrap();
    let rows: Vec<&str> = table
        .lines()
        .skip_while(|line| !line.starts_with("Frequency (Hz)"))
        .skip(1)
        .collect();
    assert_eq!(rows.len(), results.spectrum.len());
    assert!(rows[0].starts_with("0.00000000\t"));
    for row in rows {
        for column in row.split('\t') {
            let (_, fraction) = column.split_once('.').expect("fixed decimals");
            assert_eq!(fraction.len(), 8, "{row}");
        }
    }

    let _ = fs::remove_dir_all(dir);
}

#[test]
fn test_configured_labels_reach_the_file() {
    let dir = scratch_dir("labels");
    let config: AppConfig = serde_json::from_str(
        r#"{"export": {"culture": "de-DE", "decimal_separator": ",",
            "labels": {"file_header": "Signalanalyse", "frequency": "Frequenz (Hz)"}}}"#,
    )
    .unwrap();

    let samples = signal();
    let results = analyze(&samples, 8.0, None).unwrap();
    let path = dir.join("results.txt");
    let outcome = save_results(&path, &results, &config.export);
    assert!(outcome.success);

    let written = fs::read_to_string(&path).unwrap();
    assert!(written.starts_with("Signalanalyse (de-DE)\n"));
    assert!(written.contains("Frequenz (Hz)\tMagnitude\tPower"));
    assert!(written.contains("0,12500000\t"));

    let _ = fs::remove_dir_all(dir);
}

#[test]
fn test_unwritable_target_yields_failed_outcome() {
    let dir = scratch_dir("unwritable");
    let samples = signal();
    let results = analyze(&samples, 1.0, None).unwrap();

    // A directory cannot be opened as a file
    let outcome = save_results(&dir, &results, &ExportSettings::default());
    assert!(!outcome.success);
    assert!(outcome.code.is_some());
    assert!(!outcome.message.is_empty());

    let missing = dir.join("no-such-dir").join("out.bin");
    let outcome = save_results(&missing, &results, &ExportSettings::default());
    assert_eq!(outcome.code, Some(PersistenceErrorCodes::NOT_FOUND));

    let _ = fs::remove_dir_all(dir);
}
