use std::fs;
use std::path::PathBuf;
use std::process::Command;

use serde_json::Value;

fn cli() -> Command {
    Command::new(env!("CARGO_BIN_EXE_spectral_cli"))
}

fn scratch_file(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("spectral-cli-{}-{}", std::process::id(), name))
}

fn stdout_json(output: &std::process::Output) -> Value {
    let stdout = String::from_utf8(output.stdout.clone()).expect("stdout UTF-8");
    serde_json::from_str(stdout.trim()).expect("JSON payload on stdout")
}

#[test]
fn list_reports_every_kind() {
    let output = cli().arg("list").output().expect("failed to run list");
    assert!(output.status.success());

    let json = stdout_json(&output);
    let kinds = json.as_array().expect("array of kinds");
    assert_eq!(kinds.len(), 11);
    assert_eq!(kinds[0]["kind"], "rectangular");

    let tukey = kinds
        .iter()
        .find(|entry| entry["kind"] == "tukey")
        .expect("tukey listed");
    assert_eq!(tukey["shape_parameter"]["name"], "alpha");
    assert_eq!(tukey["shape_parameter"]["default"], 0.5);
}

#[test]
fn window_prints_coefficients() {
    let output = cli()
        .args(["window", "--kind", "Hann", "--size", "5"])
        .output()
        .expect("failed to run window");
    assert!(
        output.status.success(),
        "CLI exited with {:?}",
        output.status.code()
    );

    let json = stdout_json(&output);
    assert_eq!(json["kind"], "hanning");
    let coefficients: Vec<f64> = json["coefficients"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_f64().unwrap())
        .collect();
    let expected = [0.0, 0.5, 1.0, 0.5, 0.0];
    assert_eq!(coefficients.len(), expected.len());
    for (actual, expected) in coefficients.iter().zip(expected) {
        assert!((actual - expected).abs() < 1e-12, "{coefficients:?}");
    }
}

#[test]
fn window_rejects_invalid_requests() {
    let zero = cli()
        .args(["window", "--kind", "hanning", "--size", "0"])
        .output()
        .expect("failed to run window");
    assert_eq!(zero.status.code(), Some(1));
    let stderr = String::from_utf8(zero.stderr).expect("stderr UTF-8");
    assert!(stderr.contains("InvalidSize"), "got {stderr}");

    let unexpected = cli()
        .args(["window", "--kind", "rectangular", "--size", "8", "--parameter", "1"])
        .output()
        .expect("failed to run window");
    assert_eq!(unexpected.status.code(), Some(1));
}

#[test]
fn analyze_synthetic_sine_finds_its_frequency() {
    let output = cli()
        .args([
            "analyze",
            "--synthetic",
            "sine",
            "--samples",
            "1024",
            "--sample-rate",
            "1024",
            "--frequency",
            "64",
            "--kind",
            "blackman",
            "--normalize",
        ])
        .output()
        .expect("failed to run analyze");
    assert!(output.status.success());

    let json = stdout_json(&output);
    assert_eq!(json["sample_count"], 1024);
    assert_eq!(json["bins"], 513);
    assert_eq!(json["peak_frequency"].as_f64(), Some(64.0));
    assert_eq!(json["window"]["kind"], "blackman");
}

#[test]
fn analyze_text_input_writes_results() {
    let input = scratch_file("input.txt");
    let results = scratch_file("results.txt");
    fs::write(&input, "1.0\n2,0\n\n3.0\n4.0\n").unwrap();

    let output = cli()
        .args(["analyze", "--raw", "--sample-rate", "4", "--input"])
        .arg(&input)
        .arg("--results")
        .arg(&results)
        .output()
        .expect("failed to run analyze");
    assert!(
        output.status.success(),
        "CLI exited with {:?}",
        output.status.code()
    );

    let json = stdout_json(&output);
    assert_eq!(json["sample_count"], 4);
    assert_eq!(json["statistics"]["average"], 2.5);
    assert!(json.get("window").is_none());
    assert_eq!(json["saves"][0]["success"], true);

    let written = fs::read_to_string(&results).unwrap();
    assert!(written.starts_with("SignalAnalysis data (en-US)\n"));
    assert!(written.contains("Number of data points: 4"));

    let _ = fs::remove_file(input);
    let _ = fs::remove_file(results);
}

#[test]
fn analyze_reports_failed_save_with_exit_code() {
    let target = scratch_file("missing").join("series.sig");
    let output = cli()
        .args(["analyze", "--synthetic", "noise", "--seed", "7", "--output"])
        .arg(&target)
        .output()
        .expect("failed to run analyze");
    assert_eq!(output.status.code(), Some(2));

    let json = stdout_json(&output);
    assert_eq!(json["saves"][0]["success"], false);
    assert_eq!(json["saves"][0]["code"], 4002);
}

#[test]
fn analyze_rejects_bad_input_file() {
    let input = scratch_file("bad.txt");
    fs::write(&input, "1.0\nnot-a-number\n").unwrap();

    let output = cli()
        .args(["analyze", "--input"])
        .arg(&input)
        .output()
        .expect("failed to run analyze");
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).expect("stderr UTF-8");
    assert!(stderr.contains("not a number"), "got {stderr}");

    let _ = fs::remove_file(input);
}

#[test]
fn analyze_applies_window_flags_to_configured_window() {
    let config = scratch_file("tukey.json");
    fs::write(&config, r#"{"window": {"kind": "tukey", "normalize": false}}"#).unwrap();

    let output = cli()
        .arg("--config")
        .arg(&config)
        .args([
            "analyze",
            "--synthetic",
            "sine",
            "--samples",
            "256",
            "--normalize",
            "--parameter",
            "0.25",
        ])
        .output()
        .expect("failed to run analyze");
    assert!(
        output.status.success(),
        "CLI exited with {:?}",
        output.status.code()
    );

    let json = stdout_json(&output);
    assert_eq!(json["window"]["kind"], "tukey");
    assert_eq!(json["window"]["normalize"], true);
    assert_eq!(json["window"]["parameter"], 0.25);

    // A parameter the configured kind cannot take is rejected, not dropped
    fs::write(&config, r#"{"window": {"kind": "hanning"}}"#).unwrap();
    let rejected = cli()
        .arg("--config")
        .arg(&config)
        .args(["analyze", "--synthetic", "sine", "--parameter", "0.25"])
        .output()
        .expect("failed to run analyze");
    assert_eq!(rejected.status.code(), Some(1));

    let _ = fs::remove_file(config);
}
