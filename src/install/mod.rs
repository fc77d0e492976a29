//! Service installation.
//!
//! [`install`] is the entry point for callers: it wires the real host
//! operations to the systemd profile and runs the install sequence.
//! [`Installer`] exposes the same sequence over any [`HostOps`].

pub mod error;
pub mod host;

#[cfg(unix)]
pub mod linux;

#[cfg(test)]
pub(crate) mod testing;

pub use error::InstallerError;
pub use host::{CommandFailure, HostCommands, HostOps, HostProfile, SystemHost};

#[cfg(unix)]
pub use linux::{Installer, SUPPORTED_OS, render_unit};

use crate::config::InstallSpec;

/// Install `spec` as a systemd service on this host.
pub fn install(spec: &InstallSpec) -> Result<(), InstallerError> {
    cfg_if::cfg_if! {
        if #[cfg(unix)] {
            let profile = HostProfile::systemd();
            Installer::new(SystemHost::new(profile.commands.clone()), profile).install(spec)
        } else {
            let _ = spec;
            Err(InstallerError::UnsupportedPlatform {
                os: std::env::consts::OS.to_string(),
            })
        }
    }
}
