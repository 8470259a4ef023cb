//! ACU-prefixed error types with structured error codes.

#![allow(missing_docs)]

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Shared `Result` alias for the project.
pub type Result<T> = std::result::Result<T, AcuityError>;

/// Top-level error type for the acuity kiosk.
#[derive(Debug, Error)]
pub enum AcuityError {
    #[error("[ACU-1001] invalid configuration: {details}")]
    InvalidConfig { details: String },

    #[error("[ACU-1002] missing configuration file: {path}")]
    MissingConfig { path: PathBuf },

    #[error("[ACU-1003] configuration parse failure in {context}: {details}")]
    ConfigParse {
        context: &'static str,
        details: String,
    },

    #[error("[ACU-2001] invalid calibration value {value}: {reason}")]
    InvalidCalibration { value: f64, reason: &'static str },

    #[error("[ACU-2002] unknown chart variant: {name}")]
    UnknownChart { name: String },

    #[error("[ACU-2101] serialization failure in {context}: {details}")]
    Serialization {
        context: &'static str,
        details: String,
    },

    #[error("[ACU-3001] IO failure at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("[ACU-3002] terminal failure: {source}")]
    Terminal {
        #[source]
        source: std::io::Error,
    },

    #[error("[ACU-3101] fullscreen request rejected: {details}")]
    FullscreenRejected { details: String },

    #[error("[ACU-3900] runtime failure: {details}")]
    Runtime { details: String },
}

impl AcuityError {
    /// Stable machine-parseable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidConfig { .. } => "ACU-1001",
            Self::MissingConfig { .. } => "ACU-1002",
            Self::ConfigParse { .. } => "ACU-1003",
            Self::InvalidCalibration { .. } => "ACU-2001",
            Self::UnknownChart { .. } => "ACU-2002",
            Self::Serialization { .. } => "ACU-2101",
            Self::Io { .. } => "ACU-3001",
            Self::Terminal { .. } => "ACU-3002",
            Self::FullscreenRejected { .. } => "ACU-3101",
            Self::Runtime { .. } => "ACU-3900",
        }
    }

    /// Whether the failure belongs to a host capability and must degrade to a
    /// no-op inside the kiosk instead of ending the session.
    #[must_use]
    pub const fn is_host_degradable(&self) -> bool {
        matches!(
            self,
            Self::FullscreenRejected { .. } | Self::Io { .. } | Self::Serialization { .. }
        )
    }

    /// Convenience constructor for IO errors with a known path.
    #[must_use]
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

impl From<serde_json::Error> for AcuityError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization {
            context: "serde_json",
            details: value.to_string(),
        }
    }
}

impl From<toml::de::Error> for AcuityError {
    fn from(value: toml::de::Error) -> Self {
        Self::ConfigParse {
            context: "toml",
            details: value.to_string(),
        }
    }
}
