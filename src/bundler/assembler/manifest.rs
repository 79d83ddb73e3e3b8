//! Bundle manifest generation.
//!
//! The manifest records what went into the staged tree: product version and
//! the per-component resolved versions, so an installer can be traced back to
//! the exact component builds it carried. Deliberately free of timestamps so
//! identical inputs stage byte-identical trees.

use super::ResolvedComponent;
use crate::bundler::{error::Result, settings::Settings, utils::fs as fs_utils};
use serde::Serialize;
use std::{collections::BTreeMap, path::Path};

/// Serialized as `bundle-manifest.json` at the bundle root.
#[derive(Debug, Serialize)]
pub struct BundleManifest {
    /// Product name.
    pub product: String,
    /// Product version handed to the packager.
    pub version: String,
    /// Resolved version per staged component, sorted by name.
    pub components: BTreeMap<String, String>,
    /// Regular files staged under the bundle tree.
    pub file_count: usize,
}

/// Write the bundle manifest into the bundle root.
pub async fn write_manifest(
    settings: &Settings,
    bundle_dir: &Path,
    components: &[ResolvedComponent],
) -> Result<()> {
    let manifest = BundleManifest {
        product: settings.product_name().to_string(),
        version: settings.product_version().to_string(),
        components: components
            .iter()
            .map(|c| (c.name.clone(), c.version.clone()))
            .collect(),
        file_count: fs_utils::count_files(bundle_dir),
    };

    let path = bundle_dir.join("bundle-manifest.json");
    let json = serde_json::to_vec_pretty(&manifest)?;
    tokio::fs::write(&path, json).await?;
    Ok(())
}

/// Copy the product license next to the binaries when the build tree
/// carries one.
pub async fn copy_license(build_dir: &Path, bundle_dir: &Path) -> Result<()> {
    let candidates = ["LICENSE", "LICENSE.txt", "COPYING"];
    if let Some(license) =
        crate::bundler::probe::first_existing(candidates.iter().map(|c| build_dir.join(c)))
    {
        let name = license
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "LICENSE".into());
        fs_utils::copy_file(&license, &bundle_dir.join(name)).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundler::SettingsBuilder;

    #[tokio::test]
    async fn manifest_records_component_versions() {
        let dir = tempfile::tempdir().expect("tempdir");
        let bundle = dir.path().join("dist");
        std::fs::create_dir_all(bundle.join("bin")).expect("mkdir");
        std::fs::write(bundle.join("bin/app.exe"), b"").expect("write");

        let settings = SettingsBuilder::new()
            .product_name("molview")
            .product_version("1.2.0")
            .build_dir(dir.path().join("build"))
            .bundle_dir(&bundle)
            .build()
            .expect("settings");

        let components = vec![ResolvedComponent {
            name: "openbabel".to_string(),
            version: "3.1.1".to_string(),
            plugin_dests: vec![],
        }];
        write_manifest(&settings, &bundle, &components)
            .await
            .expect("manifest");

        let text =
            std::fs::read_to_string(bundle.join("bundle-manifest.json")).expect("read");
        assert!(text.contains("\"openbabel\": \"3.1.1\""));
        assert!(text.contains("\"version\": \"1.2.0\""));
    }
}
