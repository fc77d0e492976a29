//! Init system detection run before anything touches the host.

use std::fs;

use super::{HostProfile, InstallerError};

/// Fail unless the profile's init marker is present.
pub(super) fn check_init_system(profile: &HostProfile) -> Result<(), InstallerError> {
    if fs::metadata(&profile.init_marker).is_err() {
        return Err(InstallerError::Precondition {
            init_system: profile.init_system.clone(),
            marker: profile.init_marker.clone(),
        });
    }

    Ok(())
}
