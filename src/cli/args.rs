//! Command line argument parsing and validation.
//!
//! Every component root and version can come from the environment as well as
//! from flags, matching how build machines configure third-party installs.

use clap::Parser;
use std::path::PathBuf;

/// Bundle staging tool for desktop chemistry application builds
#[derive(Parser, Debug)]
#[command(
    name = "chem_bundler",
    version,
    about = "Stages a redistributable application bundle and compiles its installer",
    long_about = "Locates external chemistry components (OpenBabel, xtb, runtime libraries) \
across their historical install layouts, stages everything into one normalized \
bundle tree, and invokes makensis on the result.

Usage:
  chem_bundler --build-dir build --product-name molview --product-version 1.2.0
  OPENBABEL_ROOT=C:/openbabel chem_bundler --build-dir build --product-name molview --product-version 1.2.0

Exit code 0 = a fully validated bundle was staged and packaged."
)]
pub struct Args {
    /// Primary build-output directory (the build system's binary tree)
    #[arg(long, env = "BUILD_DIR", value_name = "DIR")]
    pub build_dir: PathBuf,

    /// Bundle output directory; recreated empty on every run
    #[arg(long, value_name = "DIR", default_value = "dist")]
    pub output: PathBuf,

    /// Product name used for launchers and packager defines
    #[arg(long, value_name = "NAME")]
    pub product_name: String,

    /// Product version passed to the packager
    #[arg(long, env = "PRODUCT_VERSION", value_name = "VERSION")]
    pub product_version: String,

    /// Installer script handed to makensis
    #[arg(long, value_name = "FILE", default_value = "scripts/installer/setup.nsi")]
    pub installer_script: PathBuf,

    /// OpenBabel installation root
    #[arg(long, env = "OPENBABEL_ROOT", value_name = "DIR")]
    pub openbabel_root: Option<PathBuf>,

    /// Explicit OpenBabel version, bypassing detection
    #[arg(long, env = "OPENBABEL_VERSION", value_name = "VERSION")]
    pub openbabel_version: Option<String>,

    /// Fail when no OpenBabel root is configured
    #[arg(long)]
    pub require_openbabel: bool,

    /// xtb installation root
    #[arg(long, env = "XTB_DIR", value_name = "DIR")]
    pub xtb_dir: Option<PathBuf>,

    /// Explicit xtb version, bypassing detection
    #[arg(long, env = "XTB_VERSION", value_name = "VERSION")]
    pub xtb_version: Option<String>,

    /// libxml2 library path or directory (DLL located relative to it)
    #[arg(long, env = "LIBXML2_LIBRARY", value_name = "PATH")]
    pub libxml2_library: Option<PathBuf>,

    /// zlib library path or directory
    #[arg(long, env = "ZLIB_LIBRARY", value_name = "PATH")]
    pub zlib_library: Option<PathBuf>,

    /// Vendor math runtime root
    #[arg(long, env = "MKL_ROOT", value_name = "DIR")]
    pub mkl_root: Option<PathBuf>,

    /// Enable verbose probe logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<(), String> {
        if self.product_name.trim().is_empty() {
            return Err("Product name cannot be empty".to_string());
        }
        if self.product_version.trim().is_empty() {
            return Err("Product version cannot be empty".to_string());
        }
        if !self.build_dir.is_dir() {
            return Err(format!(
                "Build directory does not exist: {}",
                self.build_dir.display()
            ));
        }
        Ok(())
    }
}
