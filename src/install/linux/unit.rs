//! Systemd unit file rendering and installation.

use std::fs;
use std::path::Path;

use log::info;

use super::file_ops::write_file_atomic;
use super::{InstallSpec, InstallerError};

const UNIT_FILE_MODE: u32 = 0o644;

/// Render the unit file for `spec`.
///
/// Pure function of the [`InstallSpec`]: description, user, working directory and
/// executable path are the only substitutions. Values that would break the
/// unit's line-oriented syntax are rejected instead of being written out.
///
/// The text always ends with a single trailing newline after
/// `WantedBy=multi-user.target`.
pub fn render_unit(spec: &InstallSpec) -> Result<String, InstallerError> {
    let exec_dir = spec.exec_dir.to_str().ok_or_else(|| {
        InstallerError::TemplateRender(format!(
            "install directory {} is not valid UTF-8",
            spec.exec_dir.display()
        ))
    })?;

    if !spec.exec_dir.is_absolute() {
        return Err(InstallerError::TemplateRender(format!(
            "install directory {exec_dir} must be an absolute path"
        )));
    }
    if spec.user.is_empty() {
        return Err(InstallerError::TemplateRender("user must not be empty".into()));
    }
    if spec.exec_name.is_empty() || spec.exec_name.contains('/') {
        return Err(InstallerError::TemplateRender(format!(
            "executable name {:?} must be a plain file name",
            spec.exec_name
        )));
    }

    for (field, value) in [
        ("description", spec.service_description.as_str()),
        ("user", spec.user.as_str()),
        ("install directory", exec_dir),
        ("executable name", spec.exec_name.as_str()),
    ] {
        if value.contains(['\n', '\r']) {
            return Err(InstallerError::TemplateRender(format!(
                "{field} must not contain line breaks"
            )));
        }
    }

    let exec_dir = exec_dir.trim_end_matches('/');
    let working_dir = if exec_dir.is_empty() { "/" } else { exec_dir };

    Ok(format!(
        "[Unit]
Description={description}
After=network.target
StartLimitIntervalSec=0

[Service]
Type=simple
Restart=always
RestartSec=5
User={user}
WorkingDirectory={working_dir}
ExecStart={exec_dir}/{exec_name}

[Install]
WantedBy=multi-user.target
",
        description = spec.service_description,
        user = spec.user,
        exec_name = spec.exec_name,
    ))
}

/// Write rendered unit `content` to `unit_path`, replacing any previous file.
pub(super) fn write_unit(unit_path: &Path, content: &str) -> Result<(), InstallerError> {
    if let Some(parent) = unit_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            InstallerError::staging(
                format!("error creating unit directory {}", parent.display()),
                e,
            )
        })?;
    }

    info!("Writing unit file {}", unit_path.display());
    write_file_atomic(unit_path, content.as_bytes(), UNIT_FILE_MODE).map_err(|e| {
        InstallerError::staging(format!("error creating file {}", unit_path.display()), e)
    })
}

/// Name `systemctl` knows the unit by: the unit file's base name.
pub(super) fn unit_name(service_path: &Path) -> Result<&str, InstallerError> {
    service_path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| {
            InstallerError::TemplateRender(format!(
                "unit path {} has no usable file name",
                service_path.display()
            ))
        })
}
