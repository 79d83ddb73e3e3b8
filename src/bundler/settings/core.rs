//! Core Settings struct and implementations.

use super::component::{self, AuxLibrary, ComponentSpec};
use std::path::{Path, PathBuf};

/// Main settings for a staging run.
///
/// Central configuration for the assembler, constructed via
/// [`super::SettingsBuilder`]. Carries the primary build-output directory,
/// the bundle output directory, and every per-component root/version override
/// supplied by the environment.
///
/// All fields are fixed for the lifetime of a run; the component table derived
/// from them is immutable.
///
/// # Examples
///
/// ```no_run
/// use chem_bundler::bundler::{Settings, SettingsBuilder};
///
/// # fn example() -> chem_bundler::bundler::Result<()> {
/// let settings = SettingsBuilder::new()
///     .product_name("molview")
///     .product_version("1.2.0")
///     .build_dir("build")
///     .bundle_dir("dist")
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct Settings {
    /// Product name used for launcher scripts and packager defines.
    product_name: String,

    /// Product version string passed to the packager.
    product_version: String,

    /// Primary build-output directory (the build system's binary tree).
    build_dir: PathBuf,

    /// Bundle output tree. Recreated empty at the start of every run.
    bundle_dir: PathBuf,

    /// Installer script handed to the packager.
    installer_script: PathBuf,

    /// Chemistry toolkit root, when supplied.
    toolkit_root: Option<PathBuf>,

    /// Explicit toolkit version override.
    toolkit_version: Option<String>,

    /// Whether a missing toolkit root aborts the run.
    toolkit_required: bool,

    /// Quantum-chemistry engine root, when supplied.
    engine_root: Option<PathBuf>,

    /// Explicit engine version override.
    engine_version: Option<String>,

    /// Hint path for the XML runtime library (a library file or a directory).
    xml_library: Option<PathBuf>,

    /// Hint path for the compression runtime library.
    zlib_library: Option<PathBuf>,

    /// Vendor math runtime root.
    mkl_root: Option<PathBuf>,
}

impl Settings {
    /// Returns the product name.
    pub fn product_name(&self) -> &str {
        &self.product_name
    }

    /// Returns the product version string.
    pub fn product_version(&self) -> &str {
        &self.product_version
    }

    /// Returns the primary build-output directory.
    pub fn build_dir(&self) -> &Path {
        &self.build_dir
    }

    /// Returns the bundle output directory.
    pub fn bundle_dir(&self) -> &Path {
        &self.bundle_dir
    }

    /// Returns the installer script handed to the packager.
    pub fn installer_script(&self) -> &Path {
        &self.installer_script
    }

    /// Builds the component table for this run.
    ///
    /// One [`ComponentSpec`] per external component, in staging order. The
    /// table is the single source of truth for version strategies, layout
    /// templates, and required plugin groups.
    pub fn components(&self) -> Vec<ComponentSpec> {
        vec![
            component::toolkit_component(
                self.toolkit_root.clone(),
                self.toolkit_version.clone(),
                self.toolkit_required,
            ),
            component::engine_component(self.engine_root.clone(), self.engine_version.clone()),
        ]
    }

    /// Returns the auxiliary library table paired with each library's hint
    /// path. A `None` hint means the library was not configured and its copy
    /// step is skipped.
    pub fn aux_libraries(&self) -> Vec<(AuxLibrary, Option<PathBuf>)> {
        let mut libs = vec![
            (component::xml_library(), self.xml_library.clone()),
            (component::compression_library(), self.zlib_library.clone()),
        ];
        for lib in component::math_libraries() {
            libs.push((lib, self.mkl_root.clone()));
        }
        libs
    }

    /// Creates a new Settings instance (used by SettingsBuilder).
    #[allow(clippy::too_many_arguments)]
    pub(super) fn new(
        product_name: String,
        product_version: String,
        build_dir: PathBuf,
        bundle_dir: PathBuf,
        installer_script: PathBuf,
        toolkit_root: Option<PathBuf>,
        toolkit_version: Option<String>,
        toolkit_required: bool,
        engine_root: Option<PathBuf>,
        engine_version: Option<String>,
        xml_library: Option<PathBuf>,
        zlib_library: Option<PathBuf>,
        mkl_root: Option<PathBuf>,
    ) -> Self {
        Self {
            product_name,
            product_version,
            build_dir,
            bundle_dir,
            installer_script,
            toolkit_root,
            toolkit_version,
            toolkit_required,
            engine_root,
            engine_version,
            xml_library,
            zlib_library,
            mkl_root,
        }
    }
}
