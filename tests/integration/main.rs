//! Integration tests for the koun-edge CLI
//!
//! Every test points the binary at its own temp config and state dir so
//! nothing leaks into the developer's real cache.

use assert_cmd::{cargo::cargo_bin_cmd, Command};
use tempfile::TempDir;

fn koun_edge(state: &TempDir) -> Command {
    let mut cmd = cargo_bin_cmd!("koun-edge");
    cmd.env("KOUN_EDGE_STATE_DIR", state.path())
        .env("KOUN_EDGE_CONFIG", state.path().join("config.toml"));
    cmd
}

mod cli_tests {
    use super::*;
    use predicates::prelude::*;

    #[test]
    fn help_displays() {
        let state = TempDir::new().unwrap();
        koun_edge(&state)
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("offline cache worker"));
    }

    #[test]
    fn version_displays() {
        let state = TempDir::new().unwrap();
        koun_edge(&state)
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("koun-edge"));
    }

    #[test]
    fn status_reports_unseeded_cache() {
        let state = TempDir::new().unwrap();
        koun_edge(&state)
            .arg("status")
            .assert()
            .success()
            .stdout(predicate::str::contains("Koun Edge Status"))
            .stdout(predicate::str::contains("koun-shell-v4"))
            .stdout(predicate::str::contains("No partitions yet"));
    }

    #[test]
    fn completions_generate_for_bash() {
        let state = TempDir::new().unwrap();
        koun_edge(&state)
            .args(["completions", "bash"])
            .assert()
            .success()
            .stdout(predicate::str::contains("koun-edge"));
    }

    #[test]
    fn install_dry_run_prints_manifest_without_network() {
        let state = TempDir::new().unwrap();
        koun_edge(&state)
            .args(["install", "--dry-run"])
            .assert()
            .success()
            .stdout(predicate::str::contains("koun-shell-v4"))
            .stdout(predicate::str::contains("/manifest.webmanifest"))
            .stdout(predicate::str::contains("Dry run"));
    }
}

mod config_tests {
    use super::*;
    use predicates::prelude::*;

    #[test]
    fn config_path_points_at_override() {
        let state = TempDir::new().unwrap();
        koun_edge(&state)
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("config.toml"));
    }

    #[test]
    fn config_show_prints_defaults() {
        let state = TempDir::new().unwrap();
        koun_edge(&state)
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[worker]"))
            .stdout(predicate::str::contains("koun-shell-v4"))
            .stdout(predicate::str::contains("[heuristics.weights]"));
    }

    #[test]
    fn config_init_then_set_roundtrip() {
        let state = TempDir::new().unwrap();

        koun_edge(&state)
            .args(["config", "init"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Configuration initialized"));

        koun_edge(&state)
            .args(["config", "set", "worker.partition", "koun-shell-v5"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Set worker.partition"));

        koun_edge(&state)
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("koun-shell-v5"));
    }

    #[test]
    fn config_set_rejects_unknown_key() {
        let state = TempDir::new().unwrap();
        koun_edge(&state)
            .args(["config", "set", "worker.nonsense", "1"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Unknown config key"));
    }
}

mod cache_tests {
    use super::*;
    use predicates::prelude::*;

    #[test]
    fn cache_list_empty() {
        let state = TempDir::new().unwrap();
        koun_edge(&state)
            .args(["cache", "list"])
            .assert()
            .success()
            .stdout(predicate::str::contains("No cache partitions found"));
    }

    #[test]
    fn cache_purge_deletes_only_stale_partitions() {
        let state = TempDir::new().unwrap();
        // Seed partition directories by hand; the store treats any
        // directory under the cache root as a partition
        std::fs::create_dir_all(state.path().join("cache/koun-shell-v1")).unwrap();
        std::fs::create_dir_all(state.path().join("cache/koun-shell-v4")).unwrap();

        koun_edge(&state)
            .args(["cache", "purge", "--dry-run"])
            .assert()
            .success()
            .stdout(predicate::str::contains("koun-shell-v1"))
            .stdout(predicate::str::contains("Dry run"));

        koun_edge(&state)
            .args(["cache", "purge"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Deleted 1 stale partition(s)"));

        // Current partition survives
        koun_edge(&state)
            .args(["cache", "list", "--format", "plain"])
            .assert()
            .success()
            .stdout(predicate::str::contains("koun-shell-v4"))
            .stdout(predicate::str::contains("koun-shell-v1").not());
    }

    #[test]
    fn cache_clear_with_yes_removes_everything() {
        let state = TempDir::new().unwrap();
        std::fs::create_dir_all(state.path().join("cache/koun-shell-v4")).unwrap();

        koun_edge(&state)
            .args(["cache", "clear", "--yes"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Cleared 1 partition(s)"));

        koun_edge(&state)
            .args(["cache", "list"])
            .assert()
            .success()
            .stdout(predicate::str::contains("No cache partitions found"));
    }
}

mod fingerprint_tests {
    use super::*;
    use predicates::prelude::*;

    const CAPTURE: &str = r#"{
        "user_agent": "Mozilla/5.0 (Windows NT 10.0; Win64; x64) Chrome/126.0",
        "language": "en-US",
        "screen": "1024x768",
        "timezone": "UTC",
        "timezone_offset_min": 60,
        "platform": "Win32",
        "hardware_concurrency": 2,
        "device_memory_gb": 4.0,
        "cookies_enabled": false,
        "local_storage": true,
        "gpu_renderer": "Google SwiftShader",
        "canvas_hash": "data:image/png;base64,AAAA"
    }"#;

    fn write_capture(state: &TempDir) -> std::path::PathBuf {
        let path = state.path().join("capture.json");
        std::fs::write(&path, CAPTURE).unwrap();
        path
    }

    #[test]
    fn fingerprint_table_reports_indicators() {
        let state = TempDir::new().unwrap();
        let capture = write_capture(&state);

        koun_edge(&state)
            .args(["fingerprint", "--env"])
            .arg(&capture)
            .assert()
            .success()
            .stdout(predicate::str::contains("os: Windows"))
            .stdout(predicate::str::contains("vm: true"))
            .stdout(predicate::str::contains("vpn_suspect: true"))
            // vm 50 + vpn 30 + cookies 10
            .stdout(predicate::str::contains("risk_score: 90"));
    }

    #[test]
    fn fingerprint_json_is_deterministic() {
        let state = TempDir::new().unwrap();
        let capture = write_capture(&state);

        let run = || {
            let assert = koun_edge(&state)
                .args(["fingerprint", "--format", "json", "--env"])
                .arg(&capture)
                .assert()
                .success();
            String::from_utf8(assert.get_output().stdout.clone()).unwrap()
        };

        let first = run();
        let second = run();
        assert_eq!(first, second);

        let record: serde_json::Value = serde_json::from_str(&first).unwrap();
        assert!(record["visitor_id"].is_string());
        assert_eq!(record["risk_score"], 90);
    }

    #[test]
    fn fingerprint_missing_capture_fails_with_path() {
        let state = TempDir::new().unwrap();
        koun_edge(&state)
            .args(["fingerprint", "--env", "/nonexistent/capture.json"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("capture.json"));
    }
}
