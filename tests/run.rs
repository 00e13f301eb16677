//! Integration tests for the `run` command.
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;
use wss::cli::{RunOpts, handle_run_command};
use wss::settings::Settings;
use wss::time_series::HOURS_PER_YEAR;

/// Get the path to the example model.
fn get_model_dir() -> PathBuf {
    PathBuf::from("demos/simple")
}

/// An integration test for the `run` command.
#[test]
fn test_handle_run_command() {
    unsafe { std::env::set_var("WSS_LOG_LEVEL", "off") };

    // Save results to non-existent directory to check that directory creation works
    let tempdir = tempdir().unwrap();
    let output_dir = tempdir.path().join("results");
    let opts = RunOpts {
        output_dir: Some(output_dir.clone()),
        ..Default::default()
    };
    handle_run_command(&get_model_dir(), &opts, Some(Settings::default())).unwrap();

    for file_name in [
        "capacities.csv",
        "dispatch.csv",
        "summary.toml",
        "metadata.toml",
        "wss_info.log",
        "wss_error.log",
    ] {
        assert!(
            output_dir.join(file_name).is_file(),
            "{file_name} was not written"
        );
    }

    // One line per technology plus header
    let capacities = fs::read_to_string(output_dir.join("capacities.csv")).unwrap();
    assert_eq!(capacities.lines().count(), 5);

    // One line per hour plus header
    let dispatch = fs::read_to_string(output_dir.join("dispatch.csv")).unwrap();
    assert_eq!(dispatch.lines().count(), HOURS_PER_YEAR + 1);

    let summary: toml::Table =
        toml::from_str(&fs::read_to_string(output_dir.join("summary.toml")).unwrap()).unwrap();
    assert!(summary["total_cost"].as_float().unwrap() > 0.0);

    // Running again into the same folder fails unless overwriting is allowed
    assert!(handle_run_command(&get_model_dir(), &opts, Some(Settings::default())).is_err());
    let opts = RunOpts {
        overwrite: true,
        no_dispatch: true,
        ..opts
    };
    handle_run_command(&get_model_dir(), &opts, Some(Settings::default())).unwrap();
    assert!(output_dir.join("capacities.csv").is_file());
    assert!(!output_dir.join("dispatch.csv").exists());
}

/// A negative time limit is rejected before anything is written
#[test]
fn test_handle_run_command_bad_time_limit() {
    let tempdir = tempdir().unwrap();
    let output_dir = tempdir.path().join("results");
    let opts = RunOpts {
        output_dir: Some(output_dir.clone()),
        time_limit: Some(-1.0),
        ..Default::default()
    };
    let err = handle_run_command(&get_model_dir(), &opts, Some(Settings::default())).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Time limit must be a non-negative number of seconds, got -1"
    );
    assert!(!output_dir.exists());
}
