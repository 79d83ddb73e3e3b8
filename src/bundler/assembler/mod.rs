//! Bundle assembly orchestration.
//!
//! Drives the full staging sequence as a linear state machine:
//!
//! `CLEAN → INSTALL_PRIMARY → DEPLOY_SHARED_RUNTIME →
//! RESOLVE_AND_COPY_COMPONENTS → COPY_AUX_LIBRARIES →
//! WRITE_LAUNCHER_SCRIPTS → FINALIZE_METADATA → INVOKE_PACKAGER`
//!
//! Later stages depend on directories earlier stages created, and aux-library
//! placement needs the plugin destination list from component resolution, so
//! the order is fixed. The packager is only ever reached when every
//! required-component validation succeeded.

mod launcher;
mod manifest;
mod tools;

pub use tools::{HAS_MAKENSIS, HAS_WINDEPLOYQT, ProcessRunner, ToolInvocation, ToolRunner};

use crate::{
    bail,
    bundler::{
        deps,
        error::{Error, Result},
        plugins, probe,
        settings::{ComponentSpec, Settings},
        utils::{checksum, fs as fs_utils},
        version,
    },
};
use std::path::{Path, PathBuf};

/// A component after resolution: cached version plus the plugin destination
/// directories its modules were staged into.
#[derive(Debug, Clone)]
pub struct ResolvedComponent {
    /// Component name.
    pub name: String,
    /// Version string, resolved exactly once per run.
    pub version: String,
    /// Plugin destination directories inside the bundle. Empty for
    /// components without plugin modules.
    pub plugin_dests: Vec<PathBuf>,
}

/// Result of a completed staging run.
#[derive(Debug)]
pub struct StagedBundle {
    /// The staged output tree.
    pub bundle_dir: PathBuf,
    /// Every component that was staged, with its resolved version.
    pub components: Vec<ResolvedComponent>,
    /// Path the packager was asked to write the installer to.
    pub installer: PathBuf,
    /// SHA-256 of the installer, when the packager produced one.
    pub checksum: Option<String>,
}

/// Orchestrates the staging sequence.
///
/// Generic over the [`ToolRunner`] seam so the external install, deploy, and
/// packager steps can be mocked in tests.
///
/// # Examples
///
/// ```no_run
/// use chem_bundler::bundler::{BundleAssembler, SettingsBuilder};
///
/// # async fn example() -> chem_bundler::bundler::Result<()> {
/// let settings = SettingsBuilder::new()
///     .product_name("molview")
///     .product_version("1.2.0")
///     .build_dir("build")
///     .bundle_dir("dist")
///     .build()?;
///
/// let staged = BundleAssembler::new(settings).assemble().await?;
/// println!("Staged {} component(s)", staged.components.len());
/// # Ok(())
/// # }
/// ```
pub struct BundleAssembler<R: ToolRunner = ProcessRunner> {
    settings: Settings,
    runner: R,
}

impl BundleAssembler<ProcessRunner> {
    /// Creates an assembler that spawns real external tools.
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            runner: ProcessRunner,
        }
    }
}

impl<R: ToolRunner> BundleAssembler<R> {
    /// Creates an assembler with a custom tool runner.
    pub fn with_runner(settings: Settings, runner: R) -> Self {
        Self { settings, runner }
    }

    /// Returns a reference to the assembler settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Runs the full staging sequence.
    ///
    /// Any fatal condition aborts immediately: a partially staged bundle is
    /// never handed to the packager.
    pub async fn assemble(&self) -> Result<StagedBundle> {
        self.clean().await?;
        self.install_primary().await?;
        self.deploy_shared_runtime().await?;
        let components = self.resolve_and_copy_components().await?;
        self.copy_aux_libraries(&components).await?;
        launcher::write_launcher_scripts(&self.settings, &self.bin_dir(), &components).await?;
        self.finalize_metadata(&components).await?;
        let (installer, sha256) = self.invoke_packager(&components).await?;

        log::info!(
            "✓ Staged bundle at {} ({} component(s))",
            self.settings.bundle_dir().display(),
            components.len()
        );

        Ok(StagedBundle {
            bundle_dir: self.settings.bundle_dir().to_path_buf(),
            components,
            installer,
            checksum: sha256,
        })
    }

    fn bin_dir(&self) -> PathBuf {
        self.settings.bundle_dir().join("bin")
    }

    /// Destination directories for a component's plugin modules: one under
    /// the library tree and one executable-adjacent, covering both loader
    /// search paths seen in the wild.
    fn plugin_dests(&self, spec: &ComponentSpec, version: &str) -> Vec<PathBuf> {
        vec![
            self.settings
                .bundle_dir()
                .join(format!("lib/{}/{}", spec.name, version)),
            self.bin_dir().join(format!("plugins/{version}")),
        ]
    }

    /// CLEAN: recreate the output tree empty, then lay down the fixed
    /// top-level shape. Unconditional and destructive; nothing from a
    /// previous run survives.
    async fn clean(&self) -> Result<()> {
        let bundle = self.settings.bundle_dir();
        fs_utils::create_dir_all(bundle, true).await?;
        for sub in ["bin", "lib", "share"] {
            fs_utils::create_dir_all(&bundle.join(sub), false).await?;
        }
        log::info!("✓ Cleaned bundle tree {}", bundle.display());
        Ok(())
    }

    /// INSTALL_PRIMARY: materialize the build's install prefix into the
    /// bundle tree. Non-zero exit is fatal.
    async fn install_primary(&self) -> Result<()> {
        let invocation = ToolInvocation::new(
            "cmake",
            vec![
                "--install".to_string(),
                self.settings.build_dir().display().to_string(),
                "--prefix".to_string(),
                self.settings.bundle_dir().display().to_string(),
            ],
        );
        self.runner.run(&invocation).await
    }

    /// DEPLOY_SHARED_RUNTIME: copy the windowing/UI runtime next to the
    /// primary executable. Non-zero exit is fatal.
    async fn deploy_shared_runtime(&self) -> Result<()> {
        let exe = self
            .bin_dir()
            .join(format!("{}.exe", self.settings.product_name()));
        let invocation = ToolInvocation::new(
            "windeployqt",
            vec!["--release".to_string(), exe.display().to_string()],
        );
        self.runner.run(&invocation).await
    }

    /// RESOLVE_AND_COPY_COMPONENTS: per component, resolve the version once,
    /// stage plugin modules, shared data, and binary payload, then validate
    /// the required plugin groups.
    async fn resolve_and_copy_components(&self) -> Result<Vec<ResolvedComponent>> {
        let mut resolved = Vec::new();

        for spec in self.settings.components() {
            let Some(root) = spec.root.clone() else {
                if spec.required {
                    return Err(Error::ComponentRootMissing {
                        component: spec.name.clone(),
                    });
                }
                log::info!("Component {} not configured, skipping", spec.name);
                continue;
            };

            let version = version::resolve(&spec).await?;
            log::info!("Component {} version {}", spec.name, version);

            let sources = plugins::locate(&spec, &root, &version)?;
            let dests = if sources.is_empty() {
                vec![]
            } else {
                let dests = self.plugin_dests(&spec, &version);
                for dest in &dests {
                    fs_utils::create_dir_all(dest, false).await?;
                    for source in &sources {
                        fs_utils::copy_dir(source, dest).await?;
                    }
                }
                dests
            };

            self.copy_component_data(&spec, &root, &version).await?;
            self.copy_component_payload(&spec, &root).await?;

            plugins::validate_sets(&dests, &spec.required_sets)?;

            resolved.push(ResolvedComponent {
                name: spec.name.clone(),
                version,
                plugin_dests: dests,
            });
        }

        Ok(resolved)
    }

    /// Stage the component's versioned shared-data directory, when it has
    /// one. The destination carries the resolved version so the launcher
    /// environment can point straight at it.
    async fn copy_component_data(
        &self,
        spec: &ComponentSpec,
        root: &Path,
        version: &str,
    ) -> Result<()> {
        if spec.data_layouts.is_empty() {
            return Ok(());
        }
        let Some(source) = probe::first_existing_dir(spec.data_candidates(root, version)) else {
            log::debug!("{}: no shared-data directory found", spec.name);
            return Ok(());
        };
        let dest = self
            .settings
            .bundle_dir()
            .join(format!("share/{}/{}", spec.name, version));
        fs_utils::copy_dir(&source, &dest).await?;
        log::info!("✓ Staged {} data from {}", spec.name, source.display());
        Ok(())
    }

    /// Stage the component's binary payload into `bin/`. A required payload
    /// file missing under a configured root is a broken installation and
    /// therefore fatal.
    async fn copy_component_payload(&self, spec: &ComponentSpec, root: &Path) -> Result<()> {
        for file in &spec.payload {
            let Some(source) = probe::first_existing_relative(root, &file.candidates) else {
                if file.required {
                    bail!(
                        "component `{}` is missing required file {} under {}",
                        spec.name,
                        file.name,
                        root.display()
                    );
                }
                log::debug!("{}: optional file {} not found", spec.name, file.name);
                continue;
            };
            fs_utils::copy_file(&source, &self.bin_dir().join(&file.name)).await?;
            log::info!("✓ Staged {} from {}", file.name, source.display());
        }
        Ok(())
    }

    /// COPY_AUX_LIBRARIES: runs after component resolution because
    /// plugin-adjacent libraries land in the resolved plugin destinations.
    async fn copy_aux_libraries(&self, components: &[ResolvedComponent]) -> Result<()> {
        let plugin_dests: Vec<PathBuf> = components
            .iter()
            .flat_map(|c| c.plugin_dests.iter().cloned())
            .collect();
        let bin_dir = self.bin_dir();

        for (lib, hint) in self.settings.aux_libraries() {
            let Some(hint) = hint else {
                log::debug!("{}: no hint path configured, skipping", lib.name);
                continue;
            };
            deps::copy_aux_library(&lib, &hint, &bin_dir, &plugin_dests).await?;
        }
        Ok(())
    }

    /// FINALIZE_METADATA: license text plus the bundle manifest.
    async fn finalize_metadata(&self, components: &[ResolvedComponent]) -> Result<()> {
        manifest::copy_license(self.settings.build_dir(), self.settings.bundle_dir()).await?;
        manifest::write_manifest(&self.settings, self.settings.bundle_dir(), components).await
    }

    /// INVOKE_PACKAGER: terminal step, reached only when every validation
    /// passed. Component versions ride along as preprocessor defines.
    async fn invoke_packager(
        &self,
        components: &[ResolvedComponent],
    ) -> Result<(PathBuf, Option<String>)> {
        let out_dir = self
            .settings
            .bundle_dir()
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf();
        let installer = out_dir.join(format!(
            "{}_{}-setup.exe",
            self.settings.product_name(),
            self.settings.product_version()
        ));

        let mut args = vec![
            "-V3".to_string(),
            format!("-DPRODUCT_VERSION={}", self.settings.product_version()),
            format!("-DBUNDLE_DIR={}", self.settings.bundle_dir().display()),
            format!("-DOUTPUT_FILE={}", installer.display()),
        ];
        for component in components {
            args.push(format!(
                "-D{}_VERSION={}",
                component.name.to_uppercase(),
                component.version
            ));
        }
        args.push(self.settings.installer_script().display().to_string());

        self.runner.run(&ToolInvocation::new("makensis", args)).await?;

        let sha256 = if installer.is_file() {
            let digest = checksum::calculate_sha256(&installer).await?;
            log::info!("✓ Created installer {} (sha256 {})", installer.display(), digest);
            Some(digest)
        } else {
            None
        };

        Ok((installer, sha256))
    }
}
