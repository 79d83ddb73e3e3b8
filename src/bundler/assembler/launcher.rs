//! Launcher script generation.
//!
//! Renders `.bat` launchers that set the toolkit environment variables
//! before delegating to the staged executables. The plugin loader and the
//! data reader both search paths taken from the environment, so a bare
//! double-click on the executable would otherwise find nothing.

use super::ResolvedComponent;
use crate::bundler::{
    error::{Error, Result},
    settings::Settings,
};
use handlebars::Handlebars;
use std::{collections::BTreeMap, path::{Path, PathBuf}};

const APP_LAUNCHER_TEMPLATE: &str = "@echo off\r
set BABEL_LIBDIR=%~dp0plugins\\{{toolkit_version}}\r
set BABEL_DATADIR=%~dp0..\\share\\openbabel\\{{toolkit_version}}\r
start \"\" \"%~dp0{{binary_name}}.exe\" %*\r
";

const TOOL_LAUNCHER_TEMPLATE: &str = "@echo off\r
set BABEL_LIBDIR=%~dp0plugins\\{{toolkit_version}}\r
set BABEL_DATADIR=%~dp0..\\share\\openbabel\\{{toolkit_version}}\r
\"%~dp0{{tool_name}}.exe\" %*\r
";

/// Write the launcher scripts into the bundle's binary directory.
///
/// The main launcher always gets written. A command-line toolkit launcher is
/// added when the toolkit component was staged this run, since `obabel.exe`
/// only exists in the bundle then.
pub async fn write_launcher_scripts(
    settings: &Settings,
    bin_dir: &Path,
    components: &[ResolvedComponent],
) -> Result<Vec<PathBuf>> {
    let toolkit_version = components
        .iter()
        .find(|c| c.name == "openbabel")
        .map(|c| c.version.as_str())
        .unwrap_or("unknown");

    let mut handlebars = Handlebars::new();
    handlebars.register_escape_fn(handlebars::no_escape);
    handlebars
        .register_template_string("app_launcher", APP_LAUNCHER_TEMPLATE)
        .map_err(|e| Error::GenericError(format!("failed to register launcher template: {e}")))?;
    handlebars
        .register_template_string("tool_launcher", TOOL_LAUNCHER_TEMPLATE)
        .map_err(|e| Error::GenericError(format!("failed to register launcher template: {e}")))?;

    let mut data = BTreeMap::new();
    data.insert("toolkit_version", toolkit_version.to_string());
    data.insert("binary_name", settings.product_name().to_string());

    let mut written = Vec::new();

    let app_script = bin_dir.join(format!("{}.bat", settings.product_name()));
    let content = handlebars
        .render("app_launcher", &data)
        .map_err(|e| Error::GenericError(format!("failed to render launcher: {e}")))?;
    tokio::fs::write(&app_script, content).await?;
    written.push(app_script);

    if components.iter().any(|c| c.name == "openbabel") {
        data.insert("tool_name", "obabel".to_string());
        let tool_script = bin_dir.join("obabel.bat");
        let content = handlebars
            .render("tool_launcher", &data)
            .map_err(|e| Error::GenericError(format!("failed to render launcher: {e}")))?;
        tokio::fs::write(&tool_script, content).await?;
        written.push(tool_script);
    }

    log::info!("✓ Wrote {} launcher script(s)", written.len());
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundler::SettingsBuilder;

    fn settings(dir: &Path) -> Settings {
        SettingsBuilder::new()
            .product_name("molview")
            .product_version("1.2.0")
            .build_dir(dir.join("build"))
            .bundle_dir(dir.join("dist"))
            .build()
            .expect("settings")
    }

    #[tokio::test]
    async fn launcher_carries_the_resolved_toolkit_version() {
        let dir = tempfile::tempdir().expect("tempdir");
        let bin = dir.path().join("dist/bin");
        std::fs::create_dir_all(&bin).expect("mkdir");

        let components = vec![ResolvedComponent {
            name: "openbabel".to_string(),
            version: "3.1.1".to_string(),
            plugin_dests: vec![],
        }];
        let written = write_launcher_scripts(&settings(dir.path()), &bin, &components)
            .await
            .expect("write");

        assert_eq!(written.len(), 2);
        let content = std::fs::read_to_string(&written[0]).expect("read");
        assert!(content.contains("BABEL_LIBDIR"));
        assert!(content.contains("3.1.1"));
        assert!(content.contains("molview.exe"));
    }

    #[tokio::test]
    async fn toolkit_launcher_skipped_without_toolkit() {
        let dir = tempfile::tempdir().expect("tempdir");
        let bin = dir.path().join("dist/bin");
        std::fs::create_dir_all(&bin).expect("mkdir");

        let written = write_launcher_scripts(&settings(dir.path()), &bin, &[])
            .await
            .expect("write");
        assert_eq!(written.len(), 1);
        assert!(!bin.join("obabel.bat").exists());
    }
}
