// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `refrepath worker`: the child side of a batch job.

use crate::prelude::*;

#[test]
fn processes_the_scene_named_by_the_environment() {
    let temp = Project::shots();
    let document = temp.join("shots/sh010.ma");
    let result = temp.join("job.result.json");
    let log = temp.join("job.log");

    cli()
        .args(&["worker", "--log"])
        .args(&[&log])
        .env("REFREPATH_ARG_MAYA_FILE", &document)
        .env("REFREPATH_ARG_DENOMINATOR", "assets")
        .env("REFREPATH_ARG_ROOT", temp.join("new/assets"))
        .env("REFREPATH_ARG_RESULT", &result)
        .env("REFREPATH_ARG_ZFILL", "3")
        .passes()
        .stdout_has("1/1 repathing heroRN")
        .stdout_has("backup written to")
        .stdout_has("finished.");

    let report: serde_json::Value = serde_json::from_str(&temp.read("job.result.json")).unwrap();
    assert_eq!(report["references_found"], 1);
    assert_eq!(report["repathed"][0]["previous_path"], "/proj/old/assets/chr/hero.ma");
    assert_eq!(report["errors"], serde_json::json!([]));
    assert!(temp.list("shots").contains(&"sh010.refrepathbackup.001.ma".to_string()));
    assert!(temp.read("job.log").contains("finished."));
}

#[test]
fn missing_environment_is_a_config_error() {
    cli()
        .args(&["worker"])
        .exits_with(2)
        .stderr_has("missing REFREPATH_ARG_MAYA_FILE variable");
}

#[test]
fn aborted_session_exits_non_zero_after_writing_the_result_file() {
    let temp = Project::empty();
    temp.file("shots/sh010.ma", &scene("/proj/old/assets/chr/ghost.ma"));
    temp.file("new/assets/.keep", "");
    let result = temp.join("job.result.json");

    cli()
        .args(&["worker"])
        .env("REFREPATH_ARG_MAYA_FILE", temp.join("shots/sh010.ma"))
        .env("REFREPATH_ARG_SEARCH", "^/proj/old")
        .env("REFREPATH_ARG_REPLACE", temp.join("new"))
        .env("REFREPATH_ARG_RESULT", &result)
        .exits_with(2)
        .stdout_has("ERROR")
        .stderr_has("doesn't exist on disk");

    let report: serde_json::Value = serde_json::from_str(&temp.read("job.result.json")).unwrap();
    assert_eq!(report["references_found"], 1);
    assert!(report["errors"][0].as_str().unwrap().contains("doesn't exist on disk"));
    assert_eq!(temp.list("shots"), vec!["sh010.ma"]);
}
