use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Name of the configuration file seeded next to the staged executable.
pub const CONFIG_FILE_NAME: &str = "config.json";

fn default_example_config() -> String {
    "{}\n".to_string()
}

/// Description of the service to install.
///
/// Built once by the caller (or read from a TOML file with [`load_spec`]) and
/// only borrowed by the installer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallSpec {
    /// System account the service runs as.
    pub user: String,
    /// Supplementary groups granted to `user`.
    #[serde(default)]
    pub user_groups: BTreeSet<String>,
    /// Where the unit file is written, e.g. `/etc/systemd/system/foo.service`.
    pub service_path: PathBuf,
    pub service_description: String,
    /// Installation directory; also the service's working directory.
    pub exec_dir: PathBuf,
    /// File name of the staged executable inside `exec_dir`.
    pub exec_name: String,
    /// Never seed `config.json` when set.
    #[serde(default)]
    pub skip_config: bool,
    /// Fallback `config.json` content when no local one is found.
    #[serde(default = "default_example_config")]
    pub example_config: String,
}

impl InstallSpec {
    pub fn new(
        user: impl Into<String>,
        service_path: impl Into<PathBuf>,
        exec_dir: impl Into<PathBuf>,
        exec_name: impl Into<String>,
    ) -> Self {
        Self {
            user: user.into(),
            user_groups: BTreeSet::new(),
            service_path: service_path.into(),
            service_description: String::new(),
            exec_dir: exec_dir.into(),
            exec_name: exec_name.into(),
            skip_config: false,
            example_config: default_example_config(),
        }
    }

    /// Set description
    pub fn description(mut self, desc: impl Into<String>) -> Self {
        self.service_description = desc.into();
        self
    }

    /// Add a supplementary group
    pub fn group(mut self, group: impl Into<String>) -> Self {
        self.user_groups.insert(group.into());
        self
    }

    pub fn skip_config(mut self, skip: bool) -> Self {
        self.skip_config = skip;
        self
    }

    pub fn example_config(mut self, content: impl Into<String>) -> Self {
        self.example_config = content.into();
        self
    }

    /// Path of the staged executable.
    pub fn exec_path(&self) -> PathBuf {
        self.exec_dir.join(&self.exec_name)
    }

    /// Path of the seeded configuration file.
    pub fn config_path(&self) -> PathBuf {
        self.exec_dir.join(CONFIG_FILE_NAME)
    }

    /// Sample spec printed by `servicemaker example-spec`.
    pub fn example() -> Self {
        Self::new(
            "sensor",
            "/etc/systemd/system/sensor.service",
            "/opt/sensor",
            "sensor",
        )
        .description("Sensor data collector")
        .group("dialout")
        .example_config("{\n  \"port\": \"/dev/ttyUSB0\"\n}\n")
    }
}

/// Read an [`InstallSpec`] from a TOML file.
pub fn load_spec(path: &Path) -> Result<InstallSpec> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read spec file {}", path.display()))?;
    let spec: InstallSpec = toml::from_str(&raw)
        .with_context(|| format!("Failed to parse spec file {}", path.display()))?;
    Ok(spec)
}
