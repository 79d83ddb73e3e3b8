//! Command line interface for the bundle staging tool.
//!
//! Parses environment-style configuration into [`Settings`], runs the
//! assembler, and maps every fatal condition to a non-zero exit code.

mod args;

pub use args::Args;

use crate::{
    bundler::{BundleAssembler, Settings, SettingsBuilder, assembler},
    error::{CliError, Result},
};

/// Main CLI entry point
pub async fn run() -> Result<i32> {
    let args = Args::parse_args();
    init_logging(args.verbose);
    log::debug!("configuration: {args:?}");
    args.validate()
        .map_err(|reason| CliError::InvalidArguments { reason })?;

    if !*assembler::HAS_MAKENSIS {
        log::warn!("makensis not found in PATH; the packager step will fail");
    }
    if !*assembler::HAS_WINDEPLOYQT {
        log::warn!("windeployqt not found in PATH; the runtime deploy step will fail");
    }

    let settings = build_settings(&args)?;
    let staged = BundleAssembler::new(settings).assemble().await?;

    for component in &staged.components {
        log::info!("  {} {}", component.name, component.version);
    }
    log::info!("Bundle ready: {}", staged.bundle_dir.display());
    match &staged.checksum {
        Some(digest) => log::info!(
            "Installer {} (sha256 {})",
            staged.installer.display(),
            digest
        ),
        None => log::info!("Installer target: {}", staged.installer.display()),
    }

    Ok(0)
}

/// Logger setup: `RUST_LOG` is honored as usual, and the verbosity flag
/// raises the default level to `Debug` so probe and strategy traces show up
/// without extra environment plumbing.
fn init_logging(verbose: bool) {
    let mut builder = env_logger::Builder::from_default_env();
    if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.init();
}

fn build_settings(args: &Args) -> Result<Settings> {
    let mut builder = SettingsBuilder::new()
        .product_name(&args.product_name)
        .product_version(&args.product_version)
        .build_dir(&args.build_dir)
        .bundle_dir(&args.output)
        .installer_script(&args.installer_script)
        .toolkit_required(args.require_openbabel);

    if let Some(root) = &args.openbabel_root {
        builder = builder.toolkit_root(root);
    }
    if let Some(version) = &args.openbabel_version {
        builder = builder.toolkit_version(version);
    }
    if let Some(root) = &args.xtb_dir {
        builder = builder.engine_root(root);
    }
    if let Some(version) = &args.xtb_version {
        builder = builder.engine_version(version);
    }
    if let Some(path) = &args.libxml2_library {
        builder = builder.xml_library(path);
    }
    if let Some(path) = &args.zlib_library {
        builder = builder.zlib_library(path);
    }
    if let Some(root) = &args.mkl_root {
        builder = builder.mkl_root(root);
    }

    Ok(builder.build()?)
}
