//! Component version resolution.
//!
//! Resolves a component's version string through a fixed-precedence strategy
//! chain. Each strategy is independent; one that errors unexpectedly is
//! treated as a miss so a broken install never aborts the chain early. Only
//! exhaustion under a `MustResolve` policy is fatal.

use crate::bundler::{
    error::{Error, Result},
    settings::{ComponentSpec, VersionPolicy, VersionStrategy},
};
use regex::Regex;
use std::path::Path;

/// Resolve a component's version string.
///
/// Precedence:
/// 1. Explicit override: always wins, no filesystem access at all
/// 2. The spec's strategy chain, in order (skipped when no root is supplied)
/// 3. The terminal policy: a hard-coded default, or a fatal
///    [`Error::VersionUnresolved`]
///
/// The assembler calls this at most once per component per run and caches the
/// result for later stages (launcher scripts, packager defines).
pub async fn resolve(spec: &ComponentSpec) -> Result<String> {
    if let Some(version) = &spec.version_override {
        log::debug!("{}: version {} (override)", spec.name, version);
        return Ok(version.clone());
    }

    if let Some(root) = &spec.root {
        for strategy in &spec.strategies {
            if let Some(version) = try_strategy(root, strategy).await {
                log::debug!("{}: version {} ({})", spec.name, version, strategy_name(strategy));
                return Ok(version);
            }
        }
    }

    match &spec.policy {
        VersionPolicy::DefaultTo(version) => {
            log::debug!("{}: version {} (default)", spec.name, version);
            Ok(version.clone())
        }
        VersionPolicy::MustResolve => Err(Error::VersionUnresolved {
            component: spec.name.clone(),
        }),
    }
}

fn strategy_name(strategy: &VersionStrategy) -> &'static str {
    match strategy {
        VersionStrategy::HeaderMarker { .. } => "header marker",
        VersionStrategy::DataDirScan { .. } => "data dir scan",
        VersionStrategy::ExecutableProbe { .. } => "executable probe",
    }
}

async fn try_strategy(root: &Path, strategy: &VersionStrategy) -> Option<String> {
    match strategy {
        VersionStrategy::HeaderMarker { file, markers } => {
            parse_header_markers(&root.join(file), markers).await
        }
        VersionStrategy::DataDirScan { dir } => scan_versioned_dir(&root.join(dir)).await,
        VersionStrategy::ExecutableProbe { exe, flag } => {
            probe_executable(&root.join(exe), flag).await
        }
    }
}

/// Parse `#define <marker> "x.y.z"` from a metadata header.
///
/// Markers are tried in order; the first matching define wins.
async fn parse_header_markers(path: &Path, markers: &[String]) -> Option<String> {
    let contents = tokio::fs::read_to_string(path).await.ok()?;
    for marker in markers {
        let pattern = format!(r#"#define\s+{}\s+"([^"]+)""#, regex::escape(marker));
        let re = Regex::new(&pattern).ok()?;
        if let Some(caps) = re.captures(&contents) {
            return Some(caps[1].to_string());
        }
    }
    None
}

/// First subdirectory whose name begins with an ASCII digit, in
/// directory-listing order.
async fn scan_versioned_dir(dir: &Path) -> Option<String> {
    let mut entries = tokio::fs::read_dir(dir).await.ok()?;
    while let Ok(Some(entry)) = entries.next_entry().await {
        let is_dir = entry
            .file_type()
            .await
            .map(|t| t.is_dir())
            .unwrap_or(false);
        if !is_dir {
            continue;
        }
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if name.chars().next().is_some_and(|c| c.is_ascii_digit()) {
            return Some(name.into_owned());
        }
    }
    None
}

/// Run the component executable with its version flag and take the first
/// dotted-number token from stdout or stderr. Any spawn or parse failure is
/// a miss.
async fn probe_executable(exe: &Path, flag: &str) -> Option<String> {
    let output = tokio::process::Command::new(exe)
        .arg(flag)
        .output()
        .await
        .ok()?;
    let text = format!(
        "{}{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    extract_version_token(&text)
}

/// First `digits(.digits)+` token in the text.
fn extract_version_token(text: &str) -> Option<String> {
    let re = Regex::new(r"\d+(?:\.\d+)+").ok()?;
    re.find(text).map(|m| m.as_str().to_string())
}
