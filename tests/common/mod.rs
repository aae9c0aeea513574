#![allow(dead_code)]

use std::fs;
use std::process::{Command, Output};
use tempfile::TempDir;

pub fn safwa_binary() -> &'static str {
    env!("CARGO_BIN_EXE_safwa")
}

/// Helper struct to run safwa commands in an isolated temp directory
pub struct SafwaTest {
    pub temp_dir: TempDir,
}

impl SafwaTest {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        SafwaTest { temp_dir }
    }

    pub fn run(&self, args: &[&str]) -> Output {
        Command::new(safwa_binary())
            .args(args)
            .current_dir(self.temp_dir.path())
            .env_remove("SAFWA_BACKEND_URL")
            .env_remove("SAFWA_BACKEND_KEY")
            .env("NO_COLOR", "1")
            .output()
            .expect("Failed to execute safwa command")
    }

    pub fn run_success(&self, args: &[&str]) -> String {
        let output = self.run(args);
        if !output.status.success() {
            panic!(
                "Command {:?} failed with status {:?}\nstdout: {}\nstderr: {}",
                args,
                output.status,
                String::from_utf8_lossy(&output.stdout),
                String::from_utf8_lossy(&output.stderr)
            );
        }
        String::from_utf8_lossy(&output.stdout).to_string()
    }

    pub fn run_failure(&self, args: &[&str]) -> String {
        let output = self.run(args);
        assert!(
            !output.status.success(),
            "Expected command {:?} to fail, but it succeeded",
            args
        );
        String::from_utf8_lossy(&output.stderr).to_string()
    }

    pub fn run_json(&self, args: &[&str]) -> serde_json::Value {
        let mut full = args.to_vec();
        full.push("--json");
        let stdout = self.run_success(&full);
        serde_json::from_str(&stdout).expect("Command output should be valid JSON")
    }

    pub fn write_config(&self, content: &str) {
        let dir = self.temp_dir.path().join(".safwa");
        fs::create_dir_all(&dir).expect("Failed to create .safwa directory");
        fs::write(dir.join("config.yaml"), content).expect("Failed to write config file");
    }

    pub fn read_config(&self) -> Option<String> {
        fs::read_to_string(self.temp_dir.path().join(".safwa").join("config.yaml")).ok()
    }
}
