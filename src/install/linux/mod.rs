//! Linux install sequence for systemd hosts.
//!
//! # Module Structure
//!
//! - `preflight` - Init system detection
//! - `users` - Service account and group provisioning
//! - `staging` - Executable and configuration staging
//! - `file_ops` - Atomic file operations
//! - `unit` - Systemd unit file rendering and installation
//! - `service_control` - Boot-time enablement

use std::path::PathBuf;

use log::info;

use super::{HostOps, HostProfile, InstallerError};
use crate::config::InstallSpec;

mod file_ops;
mod preflight;
mod service_control;
mod staging;
mod unit;
mod users;

pub use unit::render_unit;

/// Operating system the install sequence supports.
pub const SUPPORTED_OS: &str = "linux";

/// Runs the install sequence against a [`HostOps`] implementation.
pub struct Installer<H> {
    host: H,
    profile: HostProfile,
    target_os: String,
    invocation_dir: Option<PathBuf>,
}

impl<H: HostOps> Installer<H> {
    pub fn new(host: H, profile: HostProfile) -> Self {
        Self {
            host,
            profile,
            target_os: std::env::consts::OS.to_string(),
            invocation_dir: None,
        }
    }

    /// Override the detected operating system.
    pub fn target_os(mut self, os: impl Into<String>) -> Self {
        self.target_os = os.into();
        self
    }

    /// Directory searched for a local `config.json`. Defaults to the process
    /// working directory at install time.
    pub fn invocation_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.invocation_dir = Some(dir.into());
        self
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Install `spec` as a boot-enabled service.
    ///
    /// Steps run in order and the first failure aborts the rest. Nothing is
    /// rolled back; running again with the same spec picks up where a failed
    /// run stopped.
    pub fn install(&self, spec: &InstallSpec) -> Result<(), InstallerError> {
        if self.target_os != SUPPORTED_OS {
            return Err(InstallerError::UnsupportedPlatform {
                os: self.target_os.clone(),
            });
        }

        preflight::check_init_system(&self.profile)?;

        // Rendering has no side effects, so a bad spec fails before the host is touched.
        let unit_content = render_unit(spec)?;

        info!("Provisioning user {}", spec.user);
        users::ensure_user(&self.host, spec)?;

        let invocation_dir = match &self.invocation_dir {
            Some(dir) => dir.clone(),
            None => std::env::current_dir()
                .map_err(|e| InstallerError::staging("error resolving working directory", e))?,
        };
        info!("Staging files into {}", spec.exec_dir.display());
        staging::stage_files(&self.host, spec, &invocation_dir)?;

        unit::write_unit(&spec.service_path, &unit_content)?;

        service_control::enable_service(&self.host, spec)?;

        info!(
            "Installed {} as {}",
            spec.exec_path().display(),
            spec.service_path.display()
        );
        Ok(())
    }
}
