//! Installer error taxonomy.

use std::path::PathBuf;

use thiserror::Error;

use super::host::CommandFailure;

#[derive(Debug, Error)]
pub enum InstallerError {
    #[error("unsupported operating system: {os}")]
    UnsupportedPlatform { os: String },

    #[error("{init_system} not found but required (missing {}), check if installed", marker.display())]
    Precondition {
        init_system: String,
        marker: PathBuf,
    },

    #[error("{context}: {diagnostic}")]
    UserProvisioning { context: String, diagnostic: String },

    #[error("{context}: {diagnostic}")]
    FileStaging { context: String, diagnostic: String },

    #[error("{context}: {diagnostic}")]
    Registration { context: String, diagnostic: String },

    #[error("cannot render unit file: {0}")]
    TemplateRender(String),
}

impl InstallerError {
    pub(crate) fn user(context: impl Into<String>, failure: CommandFailure) -> Self {
        Self::UserProvisioning {
            context: context.into(),
            diagnostic: failure.to_string(),
        }
    }

    pub(crate) fn staging(context: impl Into<String>, diagnostic: impl ToString) -> Self {
        Self::FileStaging {
            context: context.into(),
            diagnostic: diagnostic.to_string(),
        }
    }

    pub(crate) fn registration(context: impl Into<String>, failure: CommandFailure) -> Self {
        Self::Registration {
            context: context.into(),
            diagnostic: failure.to_string(),
        }
    }
}
