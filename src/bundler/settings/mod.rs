//! Configuration structures for staging operations.
//!
//! This module provides the per-run [`Settings`] built from environment-style
//! configuration, the [`SettingsBuilder`] used to construct them, and the
//! declarative component tables consumed by the resolution engine.

mod builder;
mod component;
mod core;

// Re-export all public types
pub use builder::SettingsBuilder;
pub use component::{
    AuxLibrary, ComponentSpec, PayloadFile, PluginSet, VersionPolicy, VersionStrategy,
    compression_library, engine_component, math_libraries, toolkit_component, xml_library,
};
pub use core::Settings;
