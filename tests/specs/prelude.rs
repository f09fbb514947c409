// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared helpers: a scratch project on disk and a fluent runner for the
//! `refrepath` binary.

use std::path::{Path, PathBuf};
use std::process::Output;

use tempfile::TempDir;

/// Variables that would change how jobs are launched on a developer machine.
const SCRUBBED_ENV: [&str; 5] =
    ["REFREPATH_HOST_BATCH", "MAYA_BATCH_PATH", "REFREPATH_LOG", "COLOR", "PYTHONPATH"];

/// Minimal Maya ASCII scene with one loaded reference.
pub fn scene(reference_path: &str) -> String {
    format!(
        r#"//Maya ASCII 2023 scene
//Codeset: UTF-8
file -rdi 1 -ns "hero" -rfn "heroRN" -typ "mayaAscii" "{reference_path}";
file -r -ns "hero" -dr 1 -rfn "heroRN" -typ "mayaAscii" "{reference_path}";
requires maya "2023";
createNode reference -n "sharedReferenceNode";
createNode reference -n "heroRN";
"#
    )
}

pub fn cli() -> Cli {
    Cli::new(None)
}

pub struct Project {
    dir: TempDir,
}

impl Project {
    pub fn empty() -> Self {
        Self { dir: TempDir::new().unwrap() }
    }

    /// A project with `shots/sh010.ma` pointing at an old asset location and
    /// `new/assets/chr/hero.ma` present on disk.
    pub fn shots() -> Self {
        let project = Self::empty();
        project.file("shots/sh010.ma", &scene("/proj/old/assets/chr/hero.ma"));
        project.file("new/assets/chr/hero.ma", "");
        project
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn join(&self, rel: &str) -> PathBuf {
        self.dir.path().join(rel)
    }

    pub fn file(&self, rel: &str, content: &str) {
        let path = self.join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, content).unwrap();
    }

    pub fn read(&self, rel: &str) -> String {
        std::fs::read_to_string(self.join(rel)).unwrap()
    }

    /// File names in `rel`, sorted.
    pub fn list(&self, rel: &str) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(self.join(rel))
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    pub fn refrepath(&self) -> Cli {
        Cli::new(Some(self.path().to_path_buf()))
    }
}

pub struct Cli {
    cmd: assert_cmd::Command,
}

impl Cli {
    fn new(dir: Option<PathBuf>) -> Self {
        let mut cmd = assert_cmd::Command::cargo_bin("refrepath").unwrap();
        for name in SCRUBBED_ENV {
            cmd.env_remove(name);
        }
        cmd.env("NO_COLOR", "1");
        if let Some(dir) = dir {
            cmd.current_dir(dir);
        }
        Self { cmd }
    }

    pub fn args<S: AsRef<std::ffi::OsStr>>(mut self, args: &[S]) -> Self {
        self.cmd.args(args);
        self
    }

    pub fn env(mut self, key: &str, value: impl AsRef<std::ffi::OsStr>) -> Self {
        self.cmd.env(key, value);
        self
    }

    fn run(mut self) -> Run {
        Run { output: self.cmd.output().unwrap() }
    }

    pub fn passes(self) -> Run {
        let run = self.run();
        assert!(run.output.status.success(), "expected success\n{}", run.dump());
        run
    }

    pub fn fails(self) -> Run {
        let run = self.run();
        assert!(!run.output.status.success(), "expected failure\n{}", run.dump());
        run
    }

    pub fn exits_with(self, code: i32) -> Run {
        let run = self.run();
        assert_eq!(run.output.status.code(), Some(code), "unexpected exit code\n{}", run.dump());
        run
    }
}

pub struct Run {
    output: Output,
}

impl Run {
    pub fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.output.stdout).into_owned()
    }

    pub fn stderr(&self) -> String {
        String::from_utf8_lossy(&self.output.stderr).into_owned()
    }

    fn dump(&self) -> String {
        format!("--- stdout ---\n{}\n--- stderr ---\n{}", self.stdout(), self.stderr())
    }

    pub fn stdout_has(self, needle: &str) -> Self {
        assert!(self.stdout().contains(needle), "stdout lacks {needle:?}\n{}", self.dump());
        self
    }

    pub fn stdout_lacks(self, needle: &str) -> Self {
        assert!(!self.stdout().contains(needle), "stdout has {needle:?}\n{}", self.dump());
        self
    }

    pub fn stderr_has(self, needle: &str) -> Self {
        assert!(self.stderr().contains(needle), "stderr lacks {needle:?}\n{}", self.dump());
        self
    }
}
