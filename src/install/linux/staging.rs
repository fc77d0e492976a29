//! Staging of the executable and its configuration into the install directory.

use std::fs::{self, DirBuilder};
use std::io::ErrorKind;
use std::os::unix::fs::{DirBuilderExt, PermissionsExt};
use std::path::Path;

use log::{debug, info};

use super::file_ops::write_file_atomic;
use super::{HostOps, InstallSpec, InstallerError};
use crate::config::CONFIG_FILE_NAME;

/// Mode of a freshly created install directory.
const EXEC_DIR_MODE: u32 = 0o755;
/// Mode of a seeded `config.json`.
const CONFIG_FILE_MODE: u32 = 0o644;

/// Create the install directory, copy the running executable into it, seed
/// `config.json` and hand the whole tree to the service user.
pub(super) fn stage_files(
    host: &dyn HostOps,
    spec: &InstallSpec,
    invocation_dir: &Path,
) -> Result<(), InstallerError> {
    ensure_exec_dir(&spec.exec_dir)?;
    copy_executable(host, spec)?;

    if spec.skip_config {
        debug!("Config seeding skipped");
    } else {
        seed_config(spec, invocation_dir)?;
    }

    host.chown_recursive(&spec.user, &spec.exec_dir)
        .map_err(|e| {
            InstallerError::staging(
                format!("error running chown on {}", spec.exec_dir.display()),
                e,
            )
        })?;

    Ok(())
}

fn ensure_exec_dir(dir: &Path) -> Result<(), InstallerError> {
    match fs::metadata(dir) {
        Ok(meta) if meta.is_dir() => {
            debug!("Install directory {} already exists", dir.display());
            Ok(())
        }
        Ok(_) => Err(InstallerError::staging(
            format!("path {} is not a directory", dir.display()),
            "install directory must be a directory",
        )),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            info!("Creating install directory {}", dir.display());
            DirBuilder::new()
                .recursive(true)
                .mode(EXEC_DIR_MODE)
                .create(dir)
                .and_then(|()| fs::set_permissions(dir, fs::Permissions::from_mode(EXEC_DIR_MODE)))
                .map_err(|e| {
                    InstallerError::staging(
                        format!("error creating directory {} for executable", dir.display()),
                        e,
                    )
                })
        }
        Err(e) => Err(InstallerError::staging(
            format!("error when opening install directory {}", dir.display()),
            e,
        )),
    }
}

fn copy_executable(host: &dyn HostOps, spec: &InstallSpec) -> Result<(), InstallerError> {
    let exe = host
        .current_exe()
        .map_err(|e| InstallerError::staging("error checking executable path", e))?;
    let target = spec.exec_path();

    // Re-running from the installed copy: cp refuses to copy a file onto itself.
    if let (Ok(a), Ok(b)) = (fs::canonicalize(&exe), fs::canonicalize(&target)) {
        if a == b {
            debug!("{} is already the running executable", target.display());
            return Ok(());
        }
    }

    info!("Copying {} to {}", exe.display(), target.display());
    host.copy_file(&exe, &target)
        .map_err(|e| InstallerError::staging("error copying executable", e))
}

fn seed_config(spec: &InstallSpec, invocation_dir: &Path) -> Result<(), InstallerError> {
    let target = spec.config_path();

    match fs::metadata(&target) {
        Ok(_) => {
            debug!("Keeping existing {}", target.display());
            return Ok(());
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => {
            return Err(InstallerError::staging(
                format!("error checking {}", target.display()),
                e,
            ));
        }
    }

    let local = invocation_dir.join(CONFIG_FILE_NAME);
    let content = match fs::read(&local) {
        Ok(bytes) => {
            info!("Seeding {} from {}", target.display(), local.display());
            bytes
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            info!("Seeding {} with default configuration", target.display());
            spec.example_config.clone().into_bytes()
        }
        Err(e) => {
            return Err(InstallerError::staging(
                format!("error reading {}", local.display()),
                e,
            ));
        }
    };

    write_file_atomic(&target, &content, CONFIG_FILE_MODE).map_err(|e| {
        InstallerError::staging(
            format!("error writing {CONFIG_FILE_NAME} to {}", spec.exec_dir.display()),
            e,
        )
    })
}
