//! Plugin module location and validation.
//!
//! Finds the toolkit's plugin-module directories across the layout variants
//! that different installers have produced over the years, and validates that
//! every required plugin group is satisfied after staging.

use crate::bundler::{
    error::{Error, Result},
    probe,
    settings::{ComponentSpec, PluginSet},
};
use std::path::{Path, PathBuf};

/// Extensions a plugin identifier may carry on disk.
const PLUGIN_EXTENSIONS: &[&str] = &["obf", "dll", "so"];

/// Locate the plugin-module source directories for a component.
///
/// The ordered layout templates are probed first; the first existing
/// directory wins. When no templated layout matches, a recursive scan for
/// plugin-looking files takes over, grouping hits by parent directory. That
/// scan is the layout-agnostic fallback for installations that follow no
/// known convention.
///
/// Returns an empty list only for components without plugin layouts. A
/// component that declares layouts but matches nothing is a fatal
/// [`Error::PluginDirsNotFound`] listing every location inspected.
pub fn locate(spec: &ComponentSpec, root: &Path, version: &str) -> Result<Vec<PathBuf>> {
    if spec.plugin_layouts.is_empty() {
        return Ok(vec![]);
    }

    let candidates = spec.plugin_candidates(root, version);
    if let Some(dir) = probe::first_existing_dir(candidates.iter().cloned()) {
        log::debug!("{}: plugin dir {} (layout template)", spec.name, dir.display());
        return Ok(vec![dir]);
    }

    let scanned = scan_for_plugins(root, &spec.plugin_file_patterns);
    if !scanned.is_empty() {
        log::debug!(
            "{}: {} plugin dir(s) found by recursive scan",
            spec.name,
            scanned.len()
        );
        return Ok(scanned);
    }

    let mut searched = candidates;
    searched.push(root.to_path_buf());
    Err(Error::PluginDirsNotFound {
        component: spec.name.clone(),
        searched,
    })
}

/// Recursive scan for files matching the component's plugin patterns,
/// grouped by parent directory. Order follows the walk; duplicates are
/// collapsed.
fn scan_for_plugins(root: &Path, patterns: &[String]) -> Vec<PathBuf> {
    let compiled: Vec<glob::Pattern> = patterns
        .iter()
        .filter_map(|p| glob::Pattern::new(p).ok())
        .collect();

    let mut dirs: Vec<PathBuf> = Vec::new();
    for entry in walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        let name = entry.file_name().to_string_lossy();
        if compiled.iter().any(|p| p.matches(&name)) {
            if let Some(parent) = entry.path().parent() {
                let parent = parent.to_path_buf();
                if !dirs.contains(&parent) {
                    dirs.push(parent);
                }
            }
        }
    }
    dirs
}

/// Validate every required plugin group against the destination directories.
///
/// A group is satisfied when any one of its members exists as a file in any
/// destination. ALL failing groups are collected into one combined
/// [`Error::PluginGroupsMissing`], so a bundle missing several groups reports
/// them together instead of aborting on the first.
pub fn validate_sets(dests: &[PathBuf], sets: &[PluginSet]) -> Result<()> {
    let missing: Vec<String> = sets
        .iter()
        .filter(|set| !set_satisfied(dests, set))
        .map(|set| set.name.clone())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(Error::PluginGroupsMissing {
            groups: missing,
            searched: dests.to_vec(),
        })
    }
}

fn set_satisfied(dests: &[PathBuf], set: &PluginSet) -> bool {
    set.members
        .iter()
        .any(|member| dests.iter().any(|dir| member_present(dir, member)))
}

fn member_present(dir: &Path, member: &str) -> bool {
    if dir.join(member).is_file() {
        return true;
    }
    PLUGIN_EXTENSIONS
        .iter()
        .any(|ext| dir.join(format!("{member}.{ext}")).is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundler::settings::{VersionPolicy, toolkit_component};

    fn toolkit(root: &Path) -> ComponentSpec {
        toolkit_component(Some(root.to_path_buf()), None, true)
    }

    #[test]
    fn versioned_layout_wins_over_unversioned() {
        let dir = tempfile::tempdir().expect("tempdir");
        let versioned = dir.path().join("lib/openbabel/3.1.1");
        let unversioned = dir.path().join("lib/openbabel");
        std::fs::create_dir_all(&versioned).expect("mkdir");
        std::fs::write(unversioned.join("stray.obf"), b"").expect("write");

        let spec = toolkit(dir.path());
        let found = locate(&spec, dir.path(), "3.1.1").expect("locate");
        assert_eq!(found, vec![versioned]);
    }

    #[test]
    fn falls_back_to_recursive_scan() {
        let dir = tempfile::tempdir().expect("tempdir");
        // No conventional layout at all; plugins dumped in odd places
        let odd_a = dir.path().join("stuff/modules");
        let odd_b = dir.path().join("other");
        std::fs::create_dir_all(&odd_a).expect("mkdir");
        std::fs::create_dir_all(&odd_b).expect("mkdir");
        std::fs::write(odd_a.join("cifformat.obf"), b"").expect("write");
        std::fs::write(odd_b.join("plugin_colors.dll"), b"").expect("write");
        std::fs::write(odd_b.join("readme.txt"), b"").expect("write");

        let spec = toolkit(dir.path());
        let found = locate(&spec, dir.path(), "3.1.1").expect("locate");
        assert_eq!(found.len(), 2);
        assert!(found.contains(&odd_a));
        assert!(found.contains(&odd_b));
    }

    #[test]
    fn nothing_found_is_fatal_and_lists_locations() {
        let dir = tempfile::tempdir().expect("tempdir");
        let spec = toolkit(dir.path());
        let err = locate(&spec, dir.path(), "3.1.1").unwrap_err();
        match err {
            Error::PluginDirsNotFound { component, searched } => {
                assert_eq!(component, "openbabel");
                assert!(searched.iter().any(|p| p.ends_with("lib/openbabel/3.1.1")));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn component_without_layouts_locates_nothing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut spec = toolkit(dir.path());
        spec.plugin_layouts.clear();
        spec.policy = VersionPolicy::DefaultTo("unknown".to_string());
        let found = locate(&spec, dir.path(), "1.0").expect("locate");
        assert!(found.is_empty());
    }

    #[test]
    fn validation_reports_all_missing_groups_in_one_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let dest_a = dir.path().join("lib/openbabel/3.1.1");
        let dest_b = dir.path().join("bin/plugins/3.1.1");
        std::fs::create_dir_all(&dest_a).expect("mkdir");
        std::fs::create_dir_all(&dest_b).expect("mkdir");

        let sets = vec![
            PluginSet::new("crystallography", &["cifformat", "formats_misc"]),
            PluginSet::new("xml-formats", &["formats_xml"]),
        ];
        let err = validate_sets(&[dest_a, dest_b], &sets).unwrap_err();
        match err {
            Error::PluginGroupsMissing { groups, .. } => {
                assert_eq!(groups, vec!["crystallography", "xml-formats"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn one_member_in_any_destination_satisfies_the_group() {
        let dir = tempfile::tempdir().expect("tempdir");
        let dest_a = dir.path().join("lib/openbabel/3.1.1");
        let dest_b = dir.path().join("bin/plugins/3.1.1");
        std::fs::create_dir_all(&dest_a).expect("mkdir");
        std::fs::create_dir_all(&dest_b).expect("mkdir");
        // Present only in the second destination, with an extension
        std::fs::write(dest_b.join("formats_misc.obf"), b"").expect("write");

        let sets = vec![PluginSet::new("crystallography", &["cifformat", "formats_misc"])];
        validate_sets(&[dest_a, dest_b], &sets).expect("satisfied");
    }
}
