use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// TestHarness provides an isolated workspace for driving the reprokit binary.
/// Each harness creates a temporary directory holding `incoming/` for new
/// submissions. `users/` is left for the organizer to create.
pub struct TestHarness {
    pub dir: TempDir,
    pub source_dir: PathBuf,
    #[allow(dead_code)]
    pub target_dir: PathBuf,
    pub binary: PathBuf,
}

impl TestHarness {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let source_dir = temp_dir.path().join("incoming");
        let target_dir = temp_dir.path().join("users");
        fs::create_dir_all(&source_dir).expect("Failed to create source dir");

        TestHarness {
            dir: temp_dir,
            source_dir,
            target_dir,
            binary: PathBuf::from(env!("CARGO_BIN_EXE_reprokit")),
        }
    }

    /// Creates a harness with a project config at `.reprokit/config.md`.
    #[allow(dead_code)]
    pub fn with_config(config_content: &str) -> Self {
        let harness = Self::new();
        let config_dir = harness.path().join(".reprokit");
        fs::create_dir_all(&config_dir).expect("Failed to create config dir");
        fs::write(config_dir.join("config.md"), config_content).expect("Failed to write config");
        harness
    }

    /// Returns the base directory path (the TempDir path).
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Executes reprokit with the given arguments in the harness directory.
    /// HOME points at the harness so no global config leaks in.
    pub fn run(&self, args: &[&str]) -> Output {
        Command::new(&self.binary)
            .args(args)
            .current_dir(self.path())
            .env("HOME", self.path())
            .output()
            .expect("Failed to run reprokit")
    }

    /// Writes a file into the incoming directory and returns its path.
    #[allow(dead_code)]
    pub fn write_submission(&self, name: &str, content: &str) -> PathBuf {
        let path = self.source_dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dir");
        }
        fs::write(&path, content).expect("Failed to write submission");
        path
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

#[allow(dead_code)]
pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

#[allow(dead_code)]
pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}
