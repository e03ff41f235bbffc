//! Integration tests for the verdin binary
//!
//! These tests verify JSON output, configuration loading, and a small
//! end-to-end annotate run against an on-disk archive.

use std::path::PathBuf;
use std::process::Command;

fn verdin_bin() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // Remove test binary name
    path.pop(); // Remove 'deps' directory
    path.push("verdin");
    path
}

/// Command with the VERDIN_* environment cleared so ambient variables
/// cannot leak into assertions
fn verdin_cmd() -> Command {
    let mut cmd = Command::new(verdin_bin());
    for var in [
        "VERDIN_TEMPORAL",
        "VERDIN_SPATIAL",
        "VERDIN_ARCHIVE",
        "VERDIN_START_DATE",
        "VERDIN_END_DATE",
        "VERDIN_LIMIT",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

#[test]
fn test_config_init_json_output_is_valid() {
    let test_dir = PathBuf::from("/tmp/verdin-test-config-init");
    let _ = std::fs::remove_dir_all(&test_dir);
    std::fs::create_dir_all(&test_dir).unwrap();

    let config_path = test_dir.join("verdin.toml");
    let output = verdin_cmd()
        .args(["config", "init", config_path.to_str().unwrap(), "--json"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success(), "Command should succeed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    let parsed: serde_json::Value =
        serde_json::from_str(&stdout).expect("Output should be valid JSON");

    assert!(parsed.get("status").is_some(), "Should have status field");
    let data = parsed.get("data").expect("Should have data field");
    assert_eq!(data.get("created").and_then(|v| v.as_bool()), Some(true));

    // The written file must load back as a configuration
    let content = std::fs::read_to_string(&config_path).unwrap();
    assert!(content.contains("archive"), "Starter file should carry the archive key");
    assert!(content.contains("start_date"), "Starter file should carry the window");

    let _ = std::fs::remove_dir_all(&test_dir);
}

#[test]
fn test_config_init_refuses_overwrite() {
    let test_dir = PathBuf::from("/tmp/verdin-test-config-overwrite");
    let _ = std::fs::remove_dir_all(&test_dir);
    std::fs::create_dir_all(&test_dir).unwrap();

    let config_path = test_dir.join("verdin.toml");
    let first = verdin_cmd()
        .args(["config", "init", config_path.to_str().unwrap()])
        .output()
        .expect("Failed to execute command");
    assert!(first.status.success());

    let second = verdin_cmd()
        .args(["config", "init", config_path.to_str().unwrap()])
        .output()
        .expect("Failed to execute command");
    assert!(!second.status.success(), "Second init without --force should fail");

    let forced = verdin_cmd()
        .args(["config", "init", config_path.to_str().unwrap(), "--force"])
        .output()
        .expect("Failed to execute command");
    assert!(forced.status.success(), "Init with --force should overwrite");

    let _ = std::fs::remove_dir_all(&test_dir);
}

#[test]
fn test_config_show_reports_sources() {
    let test_dir = PathBuf::from("/tmp/verdin-test-config-show");
    let _ = std::fs::remove_dir_all(&test_dir);
    std::fs::create_dir_all(&test_dir).unwrap();

    let config_path = test_dir.join("verdin.toml");
    std::fs::write(&config_path, "temporal = \"overall\"\n").unwrap();

    let output = verdin_cmd()
        .args(["config", "show", "--config", config_path.to_str().unwrap(), "--json"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success(), "Command should succeed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    let parsed: serde_json::Value =
        serde_json::from_str(&stdout).expect("Output should be valid JSON");

    let entries = parsed["data"]["entries"].as_array().expect("Should list entries");

    let temporal = entries
        .iter()
        .find(|e| e["key"] == "temporal")
        .expect("Should report the temporal key");
    assert_eq!(temporal["value"], "Overall");
    assert_eq!(temporal["source"], "File");

    let archive = entries
        .iter()
        .find(|e| e["key"] == "archive")
        .expect("Should report the archive key");
    assert_eq!(archive["source"], "Default");

    let _ = std::fs::remove_dir_all(&test_dir);
}

#[test]
fn test_annotate_end_to_end() {
    let test_dir = PathBuf::from("/tmp/verdin-test-annotate");
    let _ = std::fs::remove_dir_all(&test_dir);
    let archive_dir = test_dir.join("archive");
    std::fs::create_dir_all(&archive_dir).unwrap();

    // One scene per month over the unit square, valued in exact quarters
    // so the composite means survive the round trip unchanged
    let grid = |value: &str| {
        format!(
            "ncols 4\nnrows 4\nxllcorner 0.0\nyllcorner 0.0\ncellsize 0.25\nNODATA_value -9999\n{}",
            format!("{} {} {} {}\n", value, value, value, value).repeat(4)
        )
    };
    for month in 1..=12u32 {
        let value = format!("{}", f64::from(month) * 0.25);
        let name = format!("evi_2014{:02}15.asc", month);
        std::fs::write(archive_dir.join(name), grid(&value)).unwrap();
    }

    // Config pinning the grid to the unit square at quarter-degree cells
    let config_path = test_dir.join("verdin.toml");
    std::fs::write(
        &config_path,
        "native_scale = 27830.0\n\
         region = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]\n",
    )
    .unwrap();

    let records_path = test_dir.join("records.csv");
    std::fs::write(
        &records_path,
        "event_id,date,latitude,longitude\n\
         obs-1,2014-01-15,0.5,0.5\n\
         obs-2,2014-01-20,8.0,8.0\n",
    )
    .unwrap();

    let output_path = test_dir.join("annotations.csv");
    let output = verdin_cmd()
        .args([
            "annotate",
            records_path.to_str().unwrap(),
            "--archive-dir",
            archive_dir.to_str().unwrap(),
            "--output",
            output_path.to_str().unwrap(),
            "--config",
            config_path.to_str().unwrap(),
            "--json",
        ])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        output.status.success(),
        "Command should succeed: {}\n{}",
        stdout,
        String::from_utf8_lossy(&output.stderr)
    );

    let parsed: serde_json::Value =
        serde_json::from_str(&stdout).expect("Output should be valid JSON");
    let data = &parsed["data"];
    assert_eq!(data["records_total"], 2);
    assert_eq!(data["records_annotated"], 1);
    assert_eq!(data["records_missing"], 1);
    assert_eq!(data["layer_count"], 12);

    let csv = std::fs::read_to_string(&output_path).unwrap();
    let mut lines = csv.lines();
    assert_eq!(
        lines.next(),
        Some("event_id,date,latitude,longitude,evi"),
        "Header row should name the annotation columns"
    );
    let first = lines.next().expect("First record row");
    assert_eq!(first, "obs-1,2014-01-15,0.5,0.5,0.25", "January composite is the January scene");
    let second = lines.next().expect("Second record row");
    assert!(second.ends_with(','), "Uncovered record should have an empty value cell");

    let _ = std::fs::remove_dir_all(&test_dir);
}
