//! Install a compiled program as a systemd-managed service.
//!
//! The program provisions a system user, stages its own executable and a
//! `config.json` into an install directory, writes a unit file and enables it
//! for future boots.
//!
//! ```no_run
//! use servicemaker::{InstallSpec, install};
//!
//! let spec = InstallSpec::new(
//!     "sensor",
//!     "/etc/systemd/system/sensor.service",
//!     "/opt/sensor",
//!     "sensor",
//! )
//! .description("Sensor data collector")
//! .group("dialout");
//!
//! install::install(&spec)?;
//! # Ok::<(), servicemaker::InstallerError>(())
//! ```

pub mod config;
pub mod install;

pub use config::{InstallSpec, load_spec};
pub use install::InstallerError;
