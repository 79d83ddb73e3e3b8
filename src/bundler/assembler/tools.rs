//! External tool invocation and detection.
//!
//! The install step, the shared-runtime deployer, and the installer compiler
//! are opaque collaborators. They run through the [`ToolRunner`] seam so the
//! assembler can be exercised in tests without spawning anything.

use crate::bundler::error::{Error, Result};
use std::sync::LazyLock;

/// One external tool call: program plus arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInvocation {
    /// Program name or path.
    pub program: String,
    /// Arguments, in order.
    pub args: Vec<String>,
}

impl ToolInvocation {
    /// Builds an invocation from a program and its arguments.
    pub fn new(program: &str, args: Vec<String>) -> Self {
        Self {
            program: program.to_string(),
            args,
        }
    }
}

/// Seam for running external tools.
///
/// The production implementation spawns processes; tests substitute a
/// recording mock to assert ordering and absence of calls.
#[allow(async_fn_in_trait)]
pub trait ToolRunner: Send + Sync {
    /// Run the tool to completion. Non-zero exit is an error; a partially
    /// staged bundle must never reach the packager.
    async fn run(&self, invocation: &ToolInvocation) -> Result<()>;
}

/// Production runner: spawns the tool and waits for it.
#[derive(Debug, Default, Clone)]
pub struct ProcessRunner;

impl ToolRunner for ProcessRunner {
    async fn run(&self, invocation: &ToolInvocation) -> Result<()> {
        log::info!(
            "Running {} {}",
            invocation.program,
            invocation.args.join(" ")
        );

        let status = tokio::process::Command::new(&invocation.program)
            .args(&invocation.args)
            .status()
            .await
            .map_err(|e| Error::CommandFailed {
                command: invocation.program.clone(),
                error: e,
            })?;

        if !status.success() {
            return Err(Error::ToolFailed {
                command: invocation.program.clone(),
                status: status.code(),
            });
        }

        Ok(())
    }
}

/// Check if makensis is available for installer compilation.
///
/// Cached result to avoid repeated subprocess calls during staging.
pub static HAS_MAKENSIS: LazyLock<bool> = LazyLock::new(|| match which::which("makensis") {
    Ok(path) => {
        log::debug!("Found makensis at: {}", path.display());
        true
    }
    Err(e) => {
        log::debug!("makensis not found in PATH: {e}");
        false
    }
});

/// Check if the shared-runtime deployer is available.
pub static HAS_WINDEPLOYQT: LazyLock<bool> = LazyLock::new(|| match which::which("windeployqt") {
    Ok(path) => {
        log::debug!("Found windeployqt at: {}", path.display());
        true
    }
    Err(e) => {
        log::debug!("windeployqt not found in PATH: {e}");
        false
    }
});
