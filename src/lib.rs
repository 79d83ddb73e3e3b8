//! Dependency-resolution and artifact-staging engine for desktop chemistry
//! application bundles.
//!
//! Given a primary build output and a set of external component roots, this
//! library resolves each component's version and on-disk layout, stages
//! everything into one normalized bundle tree, and drives the external
//! install/deploy/packager tools around it.
//!
//! It can be used both as a CLI tool and as a library dependency.

pub mod bundler;
pub mod cli;
pub mod error;

// Re-export commonly used types
pub use error::{BundlerError, CliError, Result};
