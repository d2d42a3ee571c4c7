#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use serde_json::Value;
use tempfile::TempDir;

pub struct TestData {
    dir: TempDir,
}

impl TestData {
    pub fn init() -> std::io::Result<Self> {
        Ok(Self {
            dir: tempfile::tempdir()?,
        })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn tasks_file(&self) -> PathBuf {
        self.dir.path().join("tasks.json")
    }

    pub fn write_file(&self, rel_path: &str, contents: &str) -> std::io::Result<PathBuf> {
        let path = self.dir.path().join(rel_path);
        fs::write(&path, contents)?;
        Ok(path)
    }

    pub fn read_tasks(&self) -> Result<Vec<Value>, Box<dyn std::error::Error>> {
        let contents = fs::read_to_string(self.tasks_file())?;
        let value: Value = serde_json::from_str(&contents)?;
        Ok(value.as_array().cloned().unwrap_or_default())
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = taskflow_cmd();
        cmd.env("TASKFLOW_DIR", self.dir.path());
        cmd
    }

    /// Run a command with `--json` and return the parsed envelope.
    pub fn json(&self, args: &[&str]) -> Value {
        let output = self
            .cmd()
            .args(args)
            .arg("--json")
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        serde_json::from_slice(&output).expect("json envelope")
    }

    pub fn add(&self, args: &[&str]) -> String {
        let mut full = vec!["add"];
        full.extend_from_slice(args);
        let value = self.json(&full);
        value["data"]["task"]["id"]
            .as_str()
            .expect("task id")
            .to_string()
    }
}

pub fn taskflow_cmd() -> Command {
    let mut cmd = Command::cargo_bin("taskflow").expect("binary");
    cmd.env_remove("RUST_LOG");
    cmd.env_remove("TASKFLOW_DIR");
    cmd
}
