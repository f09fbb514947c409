// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `refrepath batch`: discovery, isolation and the final summary.
//!
//! Without a Maya executable each job runs this binary's own worker.

use crate::prelude::*;

fn is_batch_log(name: &str) -> bool {
    name.starts_with("refrepath-") && name.ends_with(".log")
}

#[test]
fn repaths_every_scene_through_a_child_worker() {
    let temp = Project::shots();
    let new_root = temp.join("new/assets");
    let hero = new_root.join("chr/hero.ma");

    temp.refrepath()
        .args(&["batch", "shots", "--new-root-dir"])
        .args(&[&new_root])
        .passes()
        .stdout_has("sh010.ma  completed  1 reference, saved to")
        .stdout_has("1/1 documents processed, 0 failed, 1 references, 1 documents updated");

    assert!(temp.read("shots/sh010.ma").contains(&*hero.to_string_lossy()));

    let files = temp.list("shots");
    assert!(files.contains(&"sh010.refrepathbackup.0001.ma".to_string()));
    assert!(files.iter().any(|f| is_batch_log(f)), "no batch log in {files:?}");
    let result = files
        .iter()
        .find(|f| f.starts_with("refrepath.batch-sh010.ma-") && f.ends_with(".result.json"))
        .expect("job result file");
    let report: serde_json::Value =
        serde_json::from_str(&temp.read(&format!("shots/{result}"))).unwrap();
    assert_eq!(report["references_found"], 1);
    assert_eq!(report["repathed"][0]["node_name"], "heroRN");
}

#[test]
fn jobs_run_concurrently_and_report_in_discovery_order() {
    let temp = Project::shots();
    temp.file("shots/seq/sh020.ma", &scene("/proj/old/assets/chr/hero.ma"));
    let new_root = temp.join("new/assets");

    let run = temp
        .refrepath()
        .args(&["batch", "shots", "--jobs", "2", "--new-root-dir"])
        .args(&[&new_root])
        .passes()
        .stdout_has("2/2 documents processed");

    let stdout = run.stdout();
    let summary: Vec<&str> = stdout
        .lines()
        .filter(|l| l.starts_with("seq/sh020.ma") || l.starts_with("sh010.ma"))
        .collect();
    assert_eq!(summary.len(), 2, "unexpected summary:\n{stdout}");
    assert!(summary[0].starts_with("seq/sh020.ma"));
    assert!(summary[1].starts_with("sh010.ma"));
}

#[test]
fn dry_run_launches_nothing_and_writes_nothing() {
    let temp = Project::shots();
    let before = temp.read("shots/sh010.ma");
    let new_root = temp.join("new/assets");

    temp.refrepath()
        .args(&["batch", "shots", "--dry-run", "--new-root-dir"])
        .args(&[&new_root])
        .passes()
        .stdout_has("Dry run")
        .stdout_has("sh010.ma  dry-run")
        .stdout_has("0/1 documents processed");

    assert_eq!(temp.list("shots"), vec!["sh010.ma"]);
    assert_eq!(temp.read("shots/sh010.ma"), before);
}

#[test]
fn previous_backups_are_skipped_unless_included() {
    let temp = Project::shots();
    temp.file("shots/sh010.refrepathbackup.0001.ma", &scene("/proj/old/assets/chr/hero.ma"));
    let new_root = temp.join("new/assets");

    temp.refrepath()
        .args(&["batch", "shots", "--dry-run", "--new-root-dir"])
        .args(&[&new_root])
        .passes()
        .stdout_has("0/1 documents processed")
        .stdout_lacks("refrepathbackup");

    temp.refrepath()
        .args(&["batch", "shots", "--dry-run", "--include-backups", "--new-root-dir"])
        .args(&[&new_root])
        .passes()
        .stdout_has("0/2 documents processed")
        .stdout_has("sh010.refrepathbackup.0001.ma  dry-run");
}

#[test]
fn second_run_leaves_backups_alone() {
    let temp = Project::shots();
    let new_root = temp.join("new/assets");

    for _ in 0..2 {
        temp.refrepath()
            .args(&["batch", "shots", "--new-root-dir"])
            .args(&[&new_root])
            .passes()
            .stdout_has("1/1 documents processed, 0 failed");
    }

    let backups: Vec<String> =
        temp.list("shots").into_iter().filter(|f| f.contains("refrepathbackup")).collect();
    assert_eq!(backups, vec!["sh010.refrepathbackup.0001.ma"]);
    assert!(temp
        .read("shots/sh010.refrepathbackup.0001.ma")
        .contains("/proj/old/assets/chr/hero.ma"));
}

#[test]
fn relative_paths_are_resolved_against_the_working_directory() {
    let temp = Project::shots();
    let hero = std::fs::canonicalize(temp.join("new/assets/chr/hero.ma")).unwrap();

    temp.refrepath()
        .args(&["batch", "shots", "--new-root-dir", "new/assets"])
        .passes()
        .stdout_has("1/1 documents processed, 0 failed");

    let saved = temp.read("shots/sh010.ma");
    assert!(saved.contains(&format!("\"{}\";", hero.display())), "relative path in:\n{saved}");
    assert!(!saved.contains("\"new/assets/"));

    let result = temp
        .list("shots")
        .into_iter()
        .find(|f| f.ends_with(".result.json"))
        .expect("job result file");
    let report: serde_json::Value =
        serde_json::from_str(&temp.read(&format!("shots/{result}"))).unwrap();
    let document = std::path::PathBuf::from(report["document"].as_str().unwrap());
    assert!(document.is_absolute(), "{}", document.display());
    assert!(document.ends_with("shots/sh010.ma"));
    let new_path = std::path::PathBuf::from(report["repathed"][0]["new_path"].as_str().unwrap());
    assert!(new_path.is_absolute(), "{}", new_path.display());
}

#[test]
fn missing_target_fails_the_document() {
    let temp = Project::shots();
    temp.file("shots/sh010.ma", &scene("/proj/old/assets/chr/ghost.ma"));
    let before = temp.read("shots/sh010.ma");
    let new_root = temp.join("new/assets");

    temp.refrepath()
        .args(&["batch", "shots", "--new-root-dir"])
        .args(&[&new_root])
        .passes()
        .stdout_has("sh010.ma  failed")
        .stdout_has("0/1 documents processed, 1 failed");

    assert_eq!(temp.read("shots/sh010.ma"), before);
    assert!(!temp.list("shots").iter().any(|f| f.contains("refrepathbackup")));
}

#[test]
fn unlaunchable_host_fails_the_document_not_the_batch() {
    let temp = Project::shots();
    let new_root = temp.join("new/assets");
    let missing = temp.join("no-such-mayabatch");

    temp.refrepath()
        .args(&["batch", "shots", "--host-batch"])
        .args(&[&missing])
        .args(&["--new-root-dir"])
        .args(&[&new_root])
        .passes()
        .stdout_has("sh010.ma  failed")
        .stdout_has("0/1 documents processed, 1 failed");
}

#[test]
fn missing_root_is_a_config_error() {
    let temp = Project::shots();
    let new_root = temp.join("new/assets");

    temp.refrepath()
        .args(&["batch", "nope", "--new-root-dir"])
        .args(&[&new_root])
        .exits_with(2)
        .stderr_has("root directory does not exist");
}

#[test]
fn missing_replacement_is_a_config_error() {
    let temp = Project::shots();
    let missing = temp.join("elsewhere/assets");

    temp.refrepath()
        .args(&["batch", "shots", "--new-root-dir"])
        .args(&[&missing])
        .exits_with(2)
        .stderr_has("replacement path does not exist");
}

#[test]
fn zero_jobs_is_a_config_error() {
    let temp = Project::shots();
    let new_root = temp.join("new/assets");

    temp.refrepath()
        .args(&["batch", "shots", "--jobs", "0", "--new-root-dir"])
        .args(&[&new_root])
        .exits_with(2);
}

#[test]
fn invalid_regex_is_a_config_error() {
    let temp = Project::shots();
    temp.refrepath()
        .args(&["batch", "shots", "--search", "(", "--replace", "/x"])
        .exits_with(2)
        .stderr_has("invalid search pattern");
}
