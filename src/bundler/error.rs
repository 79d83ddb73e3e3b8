//! Error types for staging operations.
//!
//! Fatal conditions carry enough structure to name the component or plugin
//! group that failed and the locations that were inspected. Recoverable
//! conditions (optional library absent, strategy miss) never surface here.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for staging operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while staging a bundle.
#[derive(Error, Debug)]
pub enum Error {
    /// IO errors
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Directory walk errors during recursive copies
    #[error("directory walk error: {0}")]
    Walkdir(#[from] walkdir::Error),

    /// Path prefix errors while rebasing copied paths
    #[error("path prefix error: {0}")]
    StripPrefix(#[from] std::path::StripPrefixError),

    /// An external tool could not be spawned
    #[error("failed to run {command}: {error}")]
    CommandFailed {
        /// Command that failed
        command: String,
        /// Underlying spawn error
        #[source]
        error: std::io::Error,
    },

    /// An external tool ran but exited non-zero
    #[error("{command} exited with status {status:?}")]
    ToolFailed {
        /// Command that failed
        command: String,
        /// Exit code, if the process produced one
        status: Option<i32>,
    },

    /// No version strategy succeeded for a component whose policy demands one
    #[error("could not resolve a version for component `{component}`")]
    VersionUnresolved {
        /// Component name
        component: String,
    },

    /// A required component was configured without a root directory
    #[error("required component `{component}` has no root directory configured")]
    ComponentRootMissing {
        /// Component name
        component: String,
    },

    /// No plugin directory matched any known layout for a component
    #[error("no plugin directory found for component `{component}`; looked in: {}", display_paths(.searched))]
    PluginDirsNotFound {
        /// Component name
        component: String,
        /// Every location that was probed
        searched: Vec<PathBuf>,
    },

    /// One or more required plugin groups have zero satisfied members
    #[error("required plugin group(s) missing: {}; looked in: {}", display_groups(.groups), display_paths(.searched))]
    PluginGroupsMissing {
        /// Names of every unsatisfied group, collected into one report
        groups: Vec<String>,
        /// Destination directories that were checked
        searched: Vec<PathBuf>,
    },

    /// Generic errors
    #[error("{0}")]
    GenericError(String),
}

fn display_groups(groups: &[String]) -> String {
    groups.join(", ")
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Return early with a [`Error::GenericError`] built from format arguments.
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::bundler::error::Error::GenericError(format!($($arg)*)).into())
    };
}

/// Attach a message to `Option`/`Result` values, mirroring `anyhow::Context`.
pub trait Context<T> {
    /// Convert a miss into a [`Error::GenericError`] with the given message.
    fn context(self, msg: &str) -> Result<T>;
}

impl<T> Context<T> for Option<T> {
    fn context(self, msg: &str) -> Result<T> {
        self.ok_or_else(|| Error::GenericError(msg.to_string()))
    }
}

impl<T, E: std::fmt::Display> Context<T> for std::result::Result<T, E> {
    fn context(self, msg: &str) -> Result<T> {
        self.map_err(|e| Error::GenericError(format!("{msg}: {e}")))
    }
}

/// Filesystem-flavored context: the operation plus the path it touched.
pub trait ErrorExt<T> {
    /// Wrap an IO error with the operation name and affected path.
    fn fs_context(self, op: &str, path: &std::path::Path) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, std::io::Error> {
    fn fs_context(self, op: &str, path: &std::path::Path) -> Result<T> {
        self.map_err(|e| Error::GenericError(format!("{op} ({}): {e}", path.display())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plugin_groups_error_names_every_group() {
        let err = Error::PluginGroupsMissing {
            groups: vec!["crystallography".into(), "xml-formats".into()],
            searched: vec![PathBuf::from("/dist/lib/openbabel/3.1.1")],
        };
        let msg = err.to_string();
        assert!(msg.contains("crystallography"));
        assert!(msg.contains("xml-formats"));
        assert!(msg.contains("/dist/lib/openbabel/3.1.1"));
    }

    #[test]
    fn context_on_option_miss() {
        let missing: Option<u32> = None;
        let err = missing.context("value is required").unwrap_err();
        assert!(err.to_string().contains("value is required"));
    }
}
