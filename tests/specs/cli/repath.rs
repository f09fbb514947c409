// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `refrepath repath`: single scene, in process.

use crate::prelude::*;

#[test]
fn lists_changes_without_touching_the_scene() {
    let temp = Project::shots();
    let before = temp.read("shots/sh010.ma");
    let new_root = temp.join("new/assets");

    temp.refrepath()
        .args(&["repath", "shots/sh010.ma", "--new-root-dir"])
        .args(&[&new_root])
        .passes()
        .stdout_has("1 references, 1 repathed")
        .stdout_has("heroRN")
        .stdout_has("/proj/old/assets/chr/hero.ma")
        .stdout_has("not saved");

    assert_eq!(temp.read("shots/sh010.ma"), before);
    assert_eq!(temp.list("shots"), vec!["sh010.ma"]);
}

#[test]
fn save_writes_backup_then_scene() {
    let temp = Project::shots();
    let new_root = temp.join("new/assets");
    let hero = new_root.join("chr/hero.ma");

    temp.refrepath()
        .args(&["repath", "shots/sh010.ma", "--save", "--new-root-dir"])
        .args(&[&new_root])
        .passes()
        .stdout_has("backup:")
        .stdout_has("saved:");

    assert_eq!(temp.list("shots"), vec!["sh010.ma", "sh010.refrepathbackup.0001.ma"]);
    assert!(temp.read("shots/sh010.ma").contains(&*hero.to_string_lossy()));
    assert!(temp
        .read("shots/sh010.refrepathbackup.0001.ma")
        .contains("/proj/old/assets/chr/hero.ma"));
}

#[test]
fn relative_new_root_is_written_as_an_absolute_path() {
    let temp = Project::shots();
    let hero = std::fs::canonicalize(temp.join("new/assets/chr/hero.ma")).unwrap();

    temp.refrepath()
        .args(&["repath", "shots/sh010.ma", "--save", "--new-root-dir", "new/assets"])
        .passes()
        .stdout_has(&format!("-> {}", hero.display()));

    let saved = temp.read("shots/sh010.ma");
    assert!(saved.contains(&format!("\"{}\";", hero.display())), "relative path in:\n{saved}");
}

#[test]
fn second_run_is_a_no_op() {
    let temp = Project::shots();
    let new_root = temp.join("new/assets");

    for _ in 0..2 {
        temp.refrepath()
            .args(&["repath", "shots/sh010.ma", "--save", "--new-root-dir"])
            .args(&[&new_root])
            .passes();
    }

    // the second run found nothing to update and did not back up again
    assert_eq!(temp.list("shots"), vec!["sh010.ma", "sh010.refrepathbackup.0001.ma"]);
}

#[test]
fn pattern_substitution_with_increment_save() {
    let temp = Project::shots();
    let new_root = temp.join("new");

    temp.refrepath()
        .args(&["repath", "shots/sh010.ma", "--save", "--save-mode", "increment"])
        .args(&["--search", "^/proj/old", "--replace"])
        .args(&[&new_root])
        .passes();

    assert_eq!(temp.list("shots"), vec!["sh010.0001.ma", "sh010.ma"]);
    assert!(temp.read("shots/sh010.ma").contains("/proj/old/assets/chr/hero.ma"));
}

#[test]
fn missing_target_aborts_with_substitution_error() {
    let temp = Project::empty();
    temp.file("shots/sh010.ma", &scene("/proj/old/assets/chr/ghost.ma"));
    temp.file("new/assets/.keep", "");
    let new_root = temp.join("new/assets");

    temp.refrepath()
        .args(&["repath", "shots/sh010.ma", "--save", "--new-root-dir"])
        .args(&[&new_root])
        .exits_with(1)
        .stderr_has("doesn't exist on disk");
}

#[test]
fn missing_scene_is_a_config_error() {
    let temp = Project::empty();
    temp.refrepath()
        .args(&["repath", "nope.ma", "--new-root-dir", "/tmp"])
        .exits_with(2)
        .stderr_has("scene does not exist");
}

#[test]
fn substitution_flags_are_required() {
    let temp = Project::shots();
    temp.refrepath()
        .args(&["repath", "shots/sh010.ma"])
        .exits_with(2)
        .stderr_has("--new-root-dir");
}
