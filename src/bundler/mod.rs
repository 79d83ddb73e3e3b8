//! Bundle staging engine.
//!
//! Locates version-specific subtrees of external components across
//! incompatible on-disk layouts, copies the right files into one normalized
//! output tree, and hands the finished tree to the installer compiler.
//!
//! # Module Organization
//!
//! - `probe` - first-existing-path primitive shared by every resolver
//! - `version` - per-component version strategy chain
//! - `plugins` - plugin-module location and required-group validation
//! - `deps` - auxiliary runtime library staging
//! - `assembler` - the staging state machine and external tool seam
//! - `settings` - per-run configuration and the declarative component tables

pub mod assembler;
pub mod deps;
pub mod error;
pub mod plugins;
pub mod probe;
pub mod settings;
pub mod utils;
pub mod version;

// Re-export commonly used types
pub use assembler::{BundleAssembler, ProcessRunner, ResolvedComponent, StagedBundle, ToolInvocation, ToolRunner};
pub use error::{Error, Result};
pub use settings::{Settings, SettingsBuilder};
