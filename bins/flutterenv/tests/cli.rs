use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

fn flutterenv() -> Command {
    let mut cmd = Command::cargo_bin("flutterenv").unwrap();
    cmd.env_remove("FLUTTER_ROOT")
        .env_remove("FLUTTERENV_PROJECT_DIR")
        .env_remove("RUST_LOG")
        .arg("--no-color");
    cmd
}

#[test]
fn sdk_prints_path_from_local_properties() {
    let project = tempfile::tempdir().unwrap();
    fs::write(project.path().join("local.properties"), "flutter.sdk=/opt/flutter\n").unwrap();

    flutterenv()
        .arg("--project-dir")
        .arg(project.path())
        .arg("sdk")
        .assert()
        .success()
        .stdout("/opt/flutter\n");
}

#[test]
fn sdk_prefers_local_properties_over_environment() {
    let project = tempfile::tempdir().unwrap();
    fs::write(project.path().join("local.properties"), "flutter.sdk=/opt/flutter\n").unwrap();

    flutterenv()
        .env("FLUTTER_ROOT", "/home/u/flutter")
        .arg("-C")
        .arg(project.path())
        .arg("sdk")
        .assert()
        .success()
        .stdout("/opt/flutter\n");
}

#[test]
fn sdk_falls_back_to_flutter_root() {
    let project = tempfile::tempdir().unwrap();

    flutterenv()
        .env("FLUTTER_ROOT", "/home/u/flutter")
        .arg("-C")
        .arg(project.path())
        .arg("sdk")
        .assert()
        .success()
        .stdout("/home/u/flutter\n");
}

#[test]
fn sdk_missing_everywhere_fails_with_config_error() {
    let project = tempfile::tempdir().unwrap();

    flutterenv()
        .arg("-C")
        .arg(project.path())
        .arg("sdk")
        .assert()
        .code(3)
        .stdout("")
        .stderr(
            predicate::str::contains("flutter.sdk")
                .and(predicate::str::contains("FLUTTER_ROOT"))
                .and(predicate::str::contains("hint:")),
        );
}

#[test]
fn no_color_strips_escape_codes_even_when_forced() {
    let project = tempfile::tempdir().unwrap();

    flutterenv()
        .env("FORCE_COLOR", "1")
        .arg("-C")
        .arg(project.path())
        .arg("sdk")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("\u{1b}").not());
}

#[test]
fn sdk_json_failure_prints_error_report() {
    let project = tempfile::tempdir().unwrap();

    let output = flutterenv()
        .arg("-C")
        .arg(project.path())
        .args(["sdk", "--json"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(3));

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["error"]["code"], "E8001");
    assert_eq!(json["error"]["category"], "Platform");
    assert!(json["error"]["suggestion"].as_str().unwrap().contains("FLUTTER_ROOT"));
}

#[test]
fn log_json_writes_structured_events_to_stderr() {
    let project = tempfile::tempdir().unwrap();

    flutterenv()
        .env("FLUTTER_ROOT", "/home/u/flutter")
        .args(["--log-json", "-vv", "-C"])
        .arg(project.path())
        .arg("sdk")
        .assert()
        .success()
        .stdout("/home/u/flutter\n")
        .stderr(predicate::str::contains("\"level\":\"DEBUG\""));
}

#[test]
fn sdk_json_reports_source() {
    let project = tempfile::tempdir().unwrap();

    let output = flutterenv()
        .env("FLUTTER_ROOT", "/home/u/flutter")
        .arg("-C")
        .arg(project.path())
        .args(["sdk", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["path"], "/home/u/flutter");
    assert_eq!(json["source"]["kind"], "environment");
    assert_eq!(json["source"]["var"], "FLUTTER_ROOT");
}

#[test]
fn sdk_honours_config_overrides() {
    let project = tempfile::tempdir().unwrap();
    fs::write(
        project.path().join(".flutterenv.toml"),
        "[sdk]\nenv_var = \"FLUTTER_HOME\"\n",
    )
    .unwrap();

    flutterenv()
        .env("FLUTTER_HOME", "/custom/flutter")
        .arg("-C")
        .arg(project.path())
        .arg("sdk")
        .assert()
        .success()
        .stdout("/custom/flutter\n");
}

#[test]
fn malformed_local_properties_is_reported() {
    let project = tempfile::tempdir().unwrap();
    fs::write(project.path().join("local.properties"), "flutter.sdk=\\u00ZZ\n").unwrap();

    flutterenv()
        .env("FLUTTER_ROOT", "/home/u/flutter")
        .arg("-C")
        .arg(project.path())
        .arg("sdk")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("malformed"));
}

#[test]
fn settings_prints_default_script() {
    let project = tempfile::tempdir().unwrap();

    flutterenv()
        .arg("-C")
        .arg(project.path())
        .arg("settings")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("includeBuild(\"$flutterSdkPath/packages/flutter_tools/gradle\")")
                .and(predicate::str::contains("include(\":app\")")),
        );
}

#[test]
fn settings_write_then_check() {
    let project = tempfile::tempdir().unwrap();

    flutterenv()
        .arg("-C")
        .arg(project.path())
        .args(["settings", "--write"])
        .assert()
        .success();
    assert!(project.path().join("settings.gradle.kts").is_file());

    flutterenv()
        .arg("-C")
        .arg(project.path())
        .args(["settings", "--check"])
        .assert()
        .success();

    fs::write(project.path().join("settings.gradle.kts"), "include(\":app\")\n").unwrap();

    flutterenv()
        .arg("-C")
        .arg(project.path())
        .args(["settings", "--check"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("out of date"));
}

#[test]
fn settings_rejects_invalid_config() {
    let project = tempfile::tempdir().unwrap();
    fs::write(
        project.path().join(".flutterenv.toml"),
        "[settings]\ninclude = [\"app\"]\n",
    )
    .unwrap();

    flutterenv()
        .arg("-C")
        .arg(project.path())
        .arg("settings")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("must start with ':'"));
}

#[test]
fn doctor_json_reports_missing_sdk() {
    let project = tempfile::tempdir().unwrap();

    let output = flutterenv()
        .arg("-C")
        .arg(project.path())
        .args(["doctor", "--json"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["status"], "unhealthy");
    assert_eq!(report["checks"][0]["name"], "flutter-sdk");
}
