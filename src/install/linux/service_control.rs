//! Boot-time registration with the init system.

use log::info;

use super::unit::unit_name;
use super::{HostOps, InstallSpec, InstallerError};

/// Enable the installed unit. The service is not started.
pub(super) fn enable_service(host: &dyn HostOps, spec: &InstallSpec) -> Result<(), InstallerError> {
    let unit = unit_name(&spec.service_path)?;

    info!("Enabling {unit}");
    host.enable_unit(unit).map_err(|e| {
        InstallerError::registration(
            format!("error enabling systemd service {}", spec.service_path.display()),
            e,
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::install::testing::{Call, RecordingHost};

    fn spec() -> InstallSpec {
        InstallSpec::new("svc", "/etc/systemd/system/svc.service", "/opt/svc", "svc")
    }

    #[test]
    fn enables_by_base_name() {
        let host = RecordingHost::new("/bin/true");
        enable_service(&host, &spec()).unwrap();
        assert_eq!(host.calls(), vec![Call::Enable("svc.service".into())]);
    }

    #[test]
    fn failure_is_a_registration_error() {
        let host = RecordingHost::new("/bin/true").failing("systemctl");
        let err = enable_service(&host, &spec()).unwrap_err();
        match err {
            InstallerError::Registration { context, diagnostic } => {
                assert_eq!(
                    context,
                    "error enabling systemd service /etc/systemd/system/svc.service"
                );
                assert!(diagnostic.contains("simulated failure"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
