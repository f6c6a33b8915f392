//! Isolated environment for running the `wsfront` binary.

use anyhow::Result;
use assert_cmd::Command;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Temporary directory holding a config file and scenario files.
///
/// # Example
/// ```ignore
/// use assert_cmd::cargo::cargo_bin_cmd;
/// use wsfront_testing::cli::CliWorld;
///
/// let world = CliWorld::new().unwrap();
/// let mut cmd = cargo_bin_cmd!("wsfront");
/// world.configure_command(&mut cmd).arg("config").arg("show");
/// ```
pub struct CliWorld {
    temp_dir: TempDir,
    config_path: PathBuf,
    env_vars: HashMap<String, String>,
}

impl CliWorld {
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("wsfront").join("config.toml");
        Ok(Self {
            temp_dir,
            config_path,
            env_vars: HashMap::new(),
        })
    }

    pub fn temp_dir(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Write the config file used by every configured command.
    pub fn with_config(self, contents: &str) -> Result<Self> {
        if let Some(parent) = self.config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.config_path, contents)?;
        Ok(self)
    }

    /// Set an environment variable for CLI execution.
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env_vars.insert(key.into(), value.into());
        self
    }

    /// Write a scenario file and return its path.
    pub fn write_scenario(&self, name: &str, contents: &str) -> Result<PathBuf> {
        let path = self.temp_dir.path().join(name);
        std::fs::write(&path, contents)?;
        Ok(path)
    }

    /// Point the command at this world's config file and working directory.
    pub fn configure_command<'a>(&self, cmd: &'a mut Command) -> &'a mut Command {
        cmd.arg("--config").arg(&self.config_path);
        cmd.current_dir(self.temp_dir.path());
        for (key, value) in &self.env_vars {
            cmd.env(key, value);
        }
        cmd
    }
}
