//! Service account provisioning.

use log::{debug, info};

use super::{HostOps, InstallSpec, InstallerError};

/// Make sure the service user exists, then grant every configured group.
///
/// Group grants run even when the user already existed; `usermod -a` is
/// idempotent.
pub(super) fn ensure_user(host: &dyn HostOps, spec: &InstallSpec) -> Result<(), InstallerError> {
    let user = spec.user.as_str();

    let exists = host
        .user_exists(user)
        .map_err(|e| InstallerError::user(format!("error checking user {user}"), e))?;

    if exists {
        debug!("User {user} already exists");
    } else {
        info!("Creating system user {user}");
        host.create_system_user(user)
            .map_err(|e| InstallerError::user(format!("error creating user {user}"), e))?;
    }

    for group in &spec.user_groups {
        debug!("Adding {user} to group {group}");
        host.add_user_to_group(user, group).map_err(|e| {
            InstallerError::user(format!("error appending group {group} for user {user}"), e)
        })?;
    }

    Ok(())
}
