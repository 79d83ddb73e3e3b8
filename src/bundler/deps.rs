//! Auxiliary runtime library staging.
//!
//! Copies transitive runtime libraries (libxml2, zlib, vendor math runtimes)
//! next to the main binary and, for libraries loaded by plugin modules, into
//! the resolved plugin destinations. Absence of an optional library is a
//! skip: many of these are only present on builds linked against the
//! optional feature.

use crate::bundler::{probe, settings::AuxLibrary, utils::fs as fs_utils, Result};
use std::path::{Path, PathBuf};

/// Resolve and copy one auxiliary library.
///
/// Candidates are probed relative to the hint path (the hint may be a library
/// file; its directory is used then). The first existing candidate is copied
/// into `bin_dir` and, when the library is plugin-adjacent, into every
/// resolved plugin destination. Plugin-adjacent copies happen only when at
/// least one plugin destination exists this run.
///
/// Returns whether the library was staged. A miss across all candidates is
/// `Ok(false)`, never an error.
pub async fn copy_aux_library(
    lib: &AuxLibrary,
    hint: &Path,
    bin_dir: &Path,
    plugin_dests: &[PathBuf],
) -> Result<bool> {
    let Some(source) = probe::first_existing_relative(hint, &lib.candidates) else {
        log::debug!("{}: not found near {}, skipping", lib.name, hint.display());
        return Ok(false);
    };

    fs_utils::copy_file(&source, &bin_dir.join(&lib.name)).await?;

    if lib.plugin_adjacent {
        for dest in plugin_dests {
            fs_utils::copy_file(&source, &dest.join(&lib.name)).await?;
        }
    }

    log::info!("✓ Staged {} from {}", lib.name, source.display());
    Ok(true)
}
