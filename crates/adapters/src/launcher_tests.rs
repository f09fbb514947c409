// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use refrepath_core::vars::{ARG_MAYA_FILE, ARG_RESULT};
use refrepath_core::{JobReport, RepathedReference};
use tempfile::TempDir;

#[yare::parameterized(
    plain   = { &["worker", "-log", "/a/b.log"], "/bin/mayabatch worker -log /a/b.log" },
    spaces  = { &["-log", "/a dir/b.log"],       "/bin/mayabatch -log '/a dir/b.log'" },
    empty   = { &[""],                           "/bin/mayabatch ''" },
)]
fn command_line_quotes_args_with_spaces(args: &[&str], expected: &str) {
    let mut spec = LaunchSpec::new("/bin/mayabatch");
    for arg in args {
        spec = spec.arg(*arg);
    }
    assert_eq!(spec.command_line(), expected);
}

#[test]
fn combined_output_puts_stdout_first() {
    let output = LaunchOutput {
        exit_code: Some(0),
        stdout: "1/2 repathing a".to_string(),
        stderr: "ERROR boom\n".to_string(),
        duration: Duration::ZERO,
    };
    assert_eq!(output.combined(), "1/2 repathing a\nERROR boom\n");
    assert!(output.success());
    assert!(!LaunchOutput { exit_code: None, ..output }.success());
}

#[cfg(unix)]
#[tokio::test]
async fn process_launcher_captures_output_and_exit_code() {
    let spec = LaunchSpec::new("/bin/sh")
        .arg("-c")
        .arg("echo out; echo err >&2; exit 3");
    let output = ProcessLauncher::new().launch(&spec).await.unwrap();

    assert_eq!(output.exit_code, Some(3));
    assert_eq!(output.stdout, "out\n");
    assert_eq!(output.stderr, "err\n");
}

#[cfg(unix)]
#[tokio::test]
async fn process_launcher_clears_env_unless_inherited() {
    let spec = LaunchSpec::new("/bin/sh")
        .arg("-c")
        .arg("echo \"${REFREPATH_TEST_VAR:-unset}:${HOME:-nohome}\"")
        .env("REFREPATH_TEST_VAR", "set");
    let output = ProcessLauncher::new().launch(&spec).await.unwrap();
    assert_eq!(output.stdout, "set:nohome\n");
}

#[cfg(unix)]
#[tokio::test]
async fn process_launcher_removes_listed_vars_from_inherited_env() {
    let mut spec = LaunchSpec::new("/bin/sh")
        .arg("-c")
        .arg("echo \"${HOME:-nohome}\"");
    spec.inherit_env = true;
    spec.env_remove.push("HOME".to_string());
    let output = ProcessLauncher::new().launch(&spec).await.unwrap();
    assert_eq!(output.stdout, "nohome\n");
}

#[tokio::test]
async fn process_launcher_reports_missing_program() {
    let spec = LaunchSpec::new("/nonexistent/refrepath-host");
    let err = ProcessLauncher::new().launch(&spec).await.unwrap_err();
    assert!(matches!(err, LaunchError::Spawn { .. }));
}

#[cfg(unix)]
#[tokio::test]
async fn process_launcher_kills_jobs_past_timeout() {
    let mut spec = LaunchSpec::new("/bin/sh").arg("-c").arg("sleep 5");
    spec.inherit_env = true;
    let err = ProcessLauncher::new()
        .with_timeout(Duration::from_millis(50))
        .launch(&spec)
        .await
        .unwrap_err();
    assert!(matches!(err, LaunchError::TimedOut { .. }));
}

#[tokio::test]
async fn fake_launcher_follows_script_per_document() {
    let launcher = FakeLauncher::new();
    launcher.script("/s/a.ma", FakeLaunch::stdout("1/1 repathing heroRN"));
    launcher.script("/s/b.ma", FakeLaunch::SpawnError("no host".to_string()));

    let a = LaunchSpec::new("host").env(ARG_MAYA_FILE, "/s/a.ma");
    let b = LaunchSpec::new("host").env(ARG_MAYA_FILE, "/s/b.ma");
    let c = LaunchSpec::new("host").env(ARG_MAYA_FILE, "/s/c.ma");

    assert_eq!(launcher.launch(&a).await.unwrap().stdout, "1/1 repathing heroRN");
    assert!(matches!(launcher.launch(&b).await.unwrap_err(), LaunchError::Spawn { .. }));
    assert!(launcher.launch(&c).await.unwrap().success());

    assert_eq!(
        launcher.documents(),
        vec![PathBuf::from("/s/a.ma"), PathBuf::from("/s/b.ma"), PathBuf::from("/s/c.ma")]
    );
}

#[tokio::test]
async fn fake_launcher_writes_scripted_report() {
    let dir = TempDir::new().unwrap();
    let result = dir.path().join("a.result.json");
    let mut report = JobReport::new("/s/a.ma");
    report.references_found = 1;
    report.repathed.push(RepathedReference::new("heroRN", "/old/hero.ma", "/new/hero.ma"));

    let launcher = FakeLauncher::new();
    launcher.script("/s/a.ma", FakeLaunch::report(report.clone()));
    let spec = LaunchSpec::new("host")
        .env(ARG_MAYA_FILE, "/s/a.ma")
        .env(ARG_RESULT, result.display().to_string());
    launcher.launch(&spec).await.unwrap();

    assert_eq!(JobReport::read(&result).unwrap(), report);
}
