//! First-existing-path probe.
//!
//! Every "it might be here, or here, or here" decision in the staging engine
//! goes through this one primitive so the fallback behavior is uniform and
//! tested in a single place.

use std::path::{Path, PathBuf};

/// Returns the first candidate that exists on disk, in list order.
///
/// Deterministic with respect to its inputs; the only side effect is the
/// existence check itself. An empty candidate list is simply a miss.
pub fn first_existing<I, P>(candidates: I) -> Option<PathBuf>
where
    I: IntoIterator<Item = P>,
    P: Into<PathBuf>,
{
    for candidate in candidates {
        let candidate = candidate.into();
        if candidate.exists() {
            log::debug!("probe hit: {}", candidate.display());
            return Some(candidate);
        }
        log::trace!("probe miss: {}", candidate.display());
    }
    None
}

/// Like [`first_existing`], but only directories count as hits.
pub fn first_existing_dir<I, P>(candidates: I) -> Option<PathBuf>
where
    I: IntoIterator<Item = P>,
    P: Into<PathBuf>,
{
    for candidate in candidates {
        let candidate = candidate.into();
        if candidate.is_dir() {
            log::debug!("probe hit: {}", candidate.display());
            return Some(candidate);
        }
        log::trace!("probe miss: {}", candidate.display());
    }
    None
}

/// Joins each relative candidate onto `base` before probing.
///
/// When `base` is a file (a library path supplied by the build system, for
/// example), its parent directory is used instead.
pub fn first_existing_relative(base: &Path, candidates: &[String]) -> Option<PathBuf> {
    let base = if base.is_file() {
        base.parent().unwrap_or(base)
    } else {
        base
    };
    first_existing(candidates.iter().map(|c| base.join(c)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_existing_respects_list_order() {
        let dir = tempfile::tempdir().expect("tempdir");
        let first = dir.path().join("first");
        let second = dir.path().join("second");
        std::fs::write(&first, b"").expect("write");
        std::fs::write(&second, b"").expect("write");

        let hit = first_existing([second.clone(), first.clone()]);
        assert_eq!(hit, Some(second));
    }

    #[test]
    fn skips_missing_candidates() {
        let dir = tempfile::tempdir().expect("tempdir");
        let missing = dir.path().join("missing");
        let present = dir.path().join("present");
        std::fs::write(&present, b"").expect("write");

        let hit = first_existing([missing, present.clone()]);
        assert_eq!(hit, Some(present));
    }

    #[test]
    fn miss_is_deterministic() {
        let dir = tempfile::tempdir().expect("tempdir");
        let candidates = [dir.path().join("a"), dir.path().join("b")];
        assert_eq!(first_existing(candidates.clone()), None);
        assert_eq!(first_existing(candidates), None);
    }

    #[test]
    fn dir_probe_ignores_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        let file = dir.path().join("plugins");
        std::fs::write(&file, b"").expect("write");
        let real = dir.path().join("lib");
        std::fs::create_dir(&real).expect("mkdir");

        let hit = first_existing_dir([file, real.clone()]);
        assert_eq!(hit, Some(real));
    }

    #[test]
    fn dir_probe_respects_list_order() {
        let dir = tempfile::tempdir().expect("tempdir");
        let versioned = dir.path().join("lib-3.1.1");
        let plain = dir.path().join("lib");
        std::fs::create_dir(&versioned).expect("mkdir");
        std::fs::create_dir(&plain).expect("mkdir");

        let hit = first_existing_dir([versioned.clone(), plain]);
        assert_eq!(hit, Some(versioned));
    }

    #[test]
    fn relative_probe_uses_parent_of_file_base() {
        let dir = tempfile::tempdir().expect("tempdir");
        let lib = dir.path().join("libxml2.lib");
        std::fs::write(&lib, b"").expect("write");
        let sibling = dir.path().join("libxml2.dll");
        std::fs::write(&sibling, b"").expect("write");

        let hit = first_existing_relative(&lib, &["libxml2.dll".to_string()]);
        assert_eq!(hit, Some(sibling));
    }
}
