//! Builder for constructing Settings.

use super::Settings;
use std::path::{Path, PathBuf};

/// Builder for constructing [`Settings`].
///
/// Provides a fluent API for building staging settings with validation.
///
/// # Examples
///
/// ```no_run
/// use chem_bundler::bundler::SettingsBuilder;
///
/// # fn example() -> chem_bundler::bundler::Result<()> {
/// let settings = SettingsBuilder::new()
///     .product_name("molview")
///     .product_version("1.2.0")
///     .build_dir("build")
///     .bundle_dir("dist")
///     .toolkit_root("C:/openbabel")
///     .toolkit_version("3.1.1")
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct SettingsBuilder {
    product_name: Option<String>,
    product_version: Option<String>,
    build_dir: Option<PathBuf>,
    bundle_dir: Option<PathBuf>,
    installer_script: Option<PathBuf>,
    toolkit_root: Option<PathBuf>,
    toolkit_version: Option<String>,
    toolkit_required: bool,
    engine_root: Option<PathBuf>,
    engine_version: Option<String>,
    xml_library: Option<PathBuf>,
    zlib_library: Option<PathBuf>,
    mkl_root: Option<PathBuf>,
}

impl SettingsBuilder {
    /// Creates a new settings builder.
    pub fn new() -> Self {
        Default::default()
    }

    /// Sets the product name.
    ///
    /// # Required
    ///
    /// This field is required for building.
    pub fn product_name(mut self, name: &str) -> Self {
        self.product_name = Some(name.to_string());
        self
    }

    /// Sets the product version string passed to the packager.
    ///
    /// # Required
    ///
    /// This field is required for building.
    pub fn product_version(mut self, version: &str) -> Self {
        self.product_version = Some(version.to_string());
        self
    }

    /// Sets the primary build-output directory.
    ///
    /// # Required
    ///
    /// This field is required for building.
    pub fn build_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.build_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the bundle output directory.
    ///
    /// # Required
    ///
    /// This field is required for building.
    pub fn bundle_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.bundle_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the installer script handed to the packager.
    ///
    /// Default: `scripts/installer/setup.nsi`
    pub fn installer_script<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.installer_script = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the chemistry toolkit root directory.
    ///
    /// Default: None (toolkit staging is skipped)
    pub fn toolkit_root<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.toolkit_root = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets an explicit toolkit version, bypassing every detection strategy.
    pub fn toolkit_version(mut self, version: &str) -> Self {
        self.toolkit_version = Some(version.to_string());
        self
    }

    /// Makes a missing toolkit root fatal.
    ///
    /// Default: false (the toolkit is optional-by-omission)
    pub fn toolkit_required(mut self, required: bool) -> Self {
        self.toolkit_required = required;
        self
    }

    /// Sets the quantum-chemistry engine root directory.
    ///
    /// Default: None (engine staging is skipped)
    pub fn engine_root<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.engine_root = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets an explicit engine version, bypassing the executable probe.
    pub fn engine_version(mut self, version: &str) -> Self {
        self.engine_version = Some(version.to_string());
        self
    }

    /// Sets the hint path for the XML runtime library.
    ///
    /// May point at the import library; sibling `bin/` locations are derived
    /// from it during the copy step.
    pub fn xml_library<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.xml_library = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the hint path for the compression runtime library.
    pub fn zlib_library<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.zlib_library = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the vendor math runtime root.
    pub fn mkl_root<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.mkl_root = Some(path.as_ref().to_path_buf());
        self
    }

    /// Builds the settings.
    ///
    /// # Errors
    ///
    /// Returns an error if required fields are missing:
    /// - `product_name`
    /// - `product_version`
    /// - `build_dir`
    /// - `bundle_dir`
    pub fn build(self) -> crate::bundler::Result<Settings> {
        use crate::bundler::error::Context;

        Ok(Settings::new(
            self.product_name.context("product_name is required")?,
            self.product_version.context("product_version is required")?,
            self.build_dir.context("build_dir is required")?,
            self.bundle_dir.context("bundle_dir is required")?,
            self.installer_script
                .unwrap_or_else(|| PathBuf::from("scripts/installer/setup.nsi")),
            self.toolkit_root,
            self.toolkit_version,
            self.toolkit_required,
            self.engine_root,
            self.engine_version,
            self.xml_library,
            self.zlib_library,
            self.mkl_root,
        ))
    }
}
