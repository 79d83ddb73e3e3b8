//! Declarative component descriptions.
//!
//! Each external component (the OpenBabel toolkit, the xtb engine, the
//! auxiliary runtime libraries) is described by a data table consumed by one
//! generic resolution engine, instead of a per-component probe cascade.

use std::path::{Path, PathBuf};

/// One detection method in a component's version strategy chain.
///
/// Strategies are tried in order; the first success wins. A strategy that
/// errors unexpectedly counts as a miss, never as an abort.
#[derive(Debug, Clone)]
pub enum VersionStrategy {
    /// Parse `#define <marker> "x.y.z"` from a header-style metadata file.
    ///
    /// Markers are tried in order; the secondary marker covers installs
    /// that renamed the primary one between toolkit releases.
    HeaderMarker {
        /// Metadata file, relative to the component root.
        file: PathBuf,
        /// Marker names, primary first.
        markers: Vec<String>,
    },

    /// Take the first subdirectory of `dir` whose name starts with a digit.
    ///
    /// Versioned data layouts ship their files under `share/<name>/<version>`,
    /// so the directory name itself is the version token.
    DataDirScan {
        /// Data directory, relative to the component root.
        dir: PathBuf,
    },

    /// Run the component's own executable and parse a version token from
    /// its textual output. Spawn failures are strategy misses.
    ExecutableProbe {
        /// Executable, relative to the component root.
        exe: PathBuf,
        /// Version flag to pass, e.g. `-V` or `--version`.
        flag: String,
    },
}

/// Terminal policy when every strategy in the chain misses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionPolicy {
    /// Tolerate an unknown version and fall back to this string.
    DefaultTo(String),

    /// Resolution failure is fatal. Used where a wrong version string would
    /// silently produce an empty or mismatched bundle.
    MustResolve,
}

/// Named group of plugin identifiers; any one present member satisfies
/// the group.
#[derive(Debug, Clone)]
pub struct PluginSet {
    /// Group name, used verbatim in failure reports.
    pub name: String,
    /// Member identifiers (file stems, extension-agnostic).
    pub members: Vec<String>,
}

impl PluginSet {
    /// Builds a plugin set from a name and member identifiers.
    pub fn new(name: &str, members: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            members: members.iter().map(|m| m.to_string()).collect(),
        }
    }
}

/// A file copied from the component root into the bundle's binary directory.
#[derive(Debug, Clone)]
pub struct PayloadFile {
    /// Destination file name inside `bin/`.
    pub name: String,
    /// Candidate locations relative to the component root, probed in order.
    pub candidates: Vec<String>,
    /// Whether absence is fatal once the component root was supplied.
    pub required: bool,
}

/// Immutable description of one external component.
///
/// Built once per run from [`super::Settings`] and consulted by the version
/// resolver, the plugin locator, and the assembler loop.
#[derive(Debug, Clone)]
pub struct ComponentSpec {
    /// Component name, used in logs and error reports.
    pub name: String,

    /// Root directory of the installation, when supplied.
    pub root: Option<PathBuf>,

    /// Externally supplied version; always wins over every strategy.
    pub version_override: Option<String>,

    /// Ordered version detection chain.
    pub strategies: Vec<VersionStrategy>,

    /// What to do when the whole chain misses.
    pub policy: VersionPolicy,

    /// Plugin directory layout templates relative to the root, probed in
    /// order. `{version}` is substituted before probing.
    pub plugin_layouts: Vec<String>,

    /// Glob patterns identifying plugin files during the layout-agnostic
    /// fallback scan.
    pub plugin_file_patterns: Vec<String>,

    /// Shared-data directory layout templates, same substitution rules.
    pub data_layouts: Vec<String>,

    /// Files copied into the bundle binary directory.
    pub payload: Vec<PayloadFile>,

    /// Plugin groups that must be satisfied after staging.
    pub required_sets: Vec<PluginSet>,

    /// Whether the run fails when no root directory was supplied.
    pub required: bool,
}

impl ComponentSpec {
    /// Renders the plugin layout templates against a resolved version.
    pub fn plugin_candidates(&self, root: &Path, version: &str) -> Vec<PathBuf> {
        render_layouts(root, &self.plugin_layouts, version)
    }

    /// Renders the data layout templates against a resolved version.
    pub fn data_candidates(&self, root: &Path, version: &str) -> Vec<PathBuf> {
        render_layouts(root, &self.data_layouts, version)
    }
}

fn render_layouts(root: &Path, layouts: &[String], version: &str) -> Vec<PathBuf> {
    layouts
        .iter()
        .map(|l| root.join(l.replace("{version}", version)))
        .collect()
}

/// Auxiliary runtime library copied next to the main binary.
#[derive(Debug, Clone)]
pub struct AuxLibrary {
    /// Destination file name.
    pub name: String,
    /// Candidate paths relative to the hint directory, probed in order.
    pub candidates: Vec<String>,
    /// Also copied into resolved plugin destinations: the library is loaded
    /// by plugin modules rather than the main executable.
    pub plugin_adjacent: bool,
}

impl AuxLibrary {
    fn new(name: &str, candidates: &[&str], plugin_adjacent: bool) -> Self {
        Self {
            name: name.to_string(),
            candidates: candidates.iter().map(|c| c.to_string()).collect(),
            plugin_adjacent,
        }
    }
}

/// OpenBabel chemistry toolkit: version-suffixed plugin and data layouts,
/// with required format groups validated after staging.
pub fn toolkit_component(
    root: Option<PathBuf>,
    version_override: Option<String>,
    required: bool,
) -> ComponentSpec {
    ComponentSpec {
        name: "openbabel".to_string(),
        root,
        version_override,
        strategies: vec![
            VersionStrategy::HeaderMarker {
                file: PathBuf::from("include/openbabel3/openbabel/babelconfig.h"),
                markers: vec!["BABEL_VERSION".to_string(), "OB_VERSION".to_string()],
            },
            VersionStrategy::HeaderMarker {
                file: PathBuf::from("include/openbabel/babelconfig.h"),
                markers: vec!["BABEL_VERSION".to_string(), "OB_VERSION".to_string()],
            },
            VersionStrategy::DataDirScan {
                dir: PathBuf::from("share/openbabel"),
            },
            VersionStrategy::ExecutableProbe {
                exe: PathBuf::from("bin/obabel.exe"),
                flag: "-V".to_string(),
            },
        ],
        // A wrong toolkit version yields empty plugin/data directories in the
        // bundle, so exhaustion is fatal rather than defaulted.
        policy: VersionPolicy::MustResolve,
        plugin_layouts: vec![
            "lib/openbabel/{version}".to_string(),
            "lib/openbabel".to_string(),
            "bin/obplugins-{version}".to_string(),
            "bin/obplugins".to_string(),
            "plugins".to_string(),
        ],
        plugin_file_patterns: vec!["*.obf".to_string(), "plugin_*".to_string()],
        data_layouts: vec![
            "share/openbabel/{version}".to_string(),
            "share/openbabel".to_string(),
            "data".to_string(),
        ],
        payload: vec![],
        required_sets: vec![
            PluginSet::new("crystallography", &["cifformat", "formats_misc"]),
            PluginSet::new("xml-formats", &["formats_xml", "xmlformat"]),
        ],
        required,
    }
}

/// xtb quantum-chemistry engine: a plain binary payload with no plugin
/// modules. Tolerates an unknown version.
pub fn engine_component(root: Option<PathBuf>, version_override: Option<String>) -> ComponentSpec {
    ComponentSpec {
        name: "xtb".to_string(),
        root,
        version_override,
        strategies: vec![VersionStrategy::ExecutableProbe {
            exe: PathBuf::from("bin/xtb.exe"),
            flag: "--version".to_string(),
        }],
        policy: VersionPolicy::DefaultTo("unknown".to_string()),
        plugin_layouts: vec![],
        plugin_file_patterns: vec![],
        data_layouts: vec![],
        payload: vec![
            PayloadFile {
                name: "xtb.exe".to_string(),
                candidates: vec!["bin/xtb.exe".to_string(), "xtb.exe".to_string()],
                required: true,
            },
            PayloadFile {
                name: "libiomp5md.dll".to_string(),
                candidates: vec![
                    "bin/libiomp5md.dll".to_string(),
                    "libiomp5md.dll".to_string(),
                ],
                required: false,
            },
        ],
        required_sets: vec![],
        required: false,
    }
}

/// libxml2 runtime, loaded by the XML format plugins.
pub fn xml_library() -> AuxLibrary {
    AuxLibrary::new(
        "libxml2.dll",
        &["libxml2.dll", "../bin/libxml2.dll", "bin/libxml2.dll"],
        true,
    )
}

/// zlib compression runtime, loaded by compressed-format plugins.
pub fn compression_library() -> AuxLibrary {
    AuxLibrary::new(
        "zlib1.dll",
        &["zlib1.dll", "../bin/zlib1.dll", "bin/zlib1.dll"],
        true,
    )
}

/// Vendor math runtimes linked by the main executable only.
pub fn math_libraries() -> Vec<AuxLibrary> {
    vec![
        AuxLibrary::new(
            "mkl_core.dll",
            &[
                "redist/intel64/mkl_core.dll",
                "bin/mkl_core.dll",
                "mkl_core.dll",
            ],
            false,
        ),
        AuxLibrary::new(
            "mkl_intel_thread.dll",
            &[
                "redist/intel64/mkl_intel_thread.dll",
                "bin/mkl_intel_thread.dll",
                "mkl_intel_thread.dll",
            ],
            false,
        ),
    ]
}
