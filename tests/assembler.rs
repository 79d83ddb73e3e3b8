//! End-to-end staging tests against fixture trees, with external tools
//! replaced by recording mocks.

use chem_bundler::bundler::{
    BundleAssembler, Error, Result, Settings, SettingsBuilder, ToolInvocation, ToolRunner,
    utils::checksum,
};
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Records every invocation and succeeds.
#[derive(Default, Clone)]
struct RecordingRunner {
    calls: Arc<Mutex<Vec<ToolInvocation>>>,
}

impl RecordingRunner {
    fn programs(&self) -> Vec<String> {
        self.calls
            .lock()
            .expect("lock")
            .iter()
            .map(|c| c.program.clone())
            .collect()
    }

    fn invocations(&self) -> Vec<ToolInvocation> {
        self.calls.lock().expect("lock").clone()
    }
}

impl ToolRunner for RecordingRunner {
    async fn run(&self, invocation: &ToolInvocation) -> Result<()> {
        self.calls.lock().expect("lock").push(invocation.clone());
        Ok(())
    }
}

/// Records every invocation and fails for one named program.
#[derive(Clone)]
struct FailingRunner {
    fail_program: String,
    calls: Arc<Mutex<Vec<ToolInvocation>>>,
}

impl FailingRunner {
    fn new(fail_program: &str) -> Self {
        Self {
            fail_program: fail_program.to_string(),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl ToolRunner for FailingRunner {
    async fn run(&self, invocation: &ToolInvocation) -> Result<()> {
        self.calls.lock().expect("lock").push(invocation.clone());
        if invocation.program == self.fail_program {
            return Err(Error::ToolFailed {
                command: invocation.program.clone(),
                status: Some(1),
            });
        }
        Ok(())
    }
}

fn base_settings(root: &Path) -> SettingsBuilder {
    let build = root.join("build");
    std::fs::create_dir_all(&build).expect("mkdir build");
    SettingsBuilder::new()
        .product_name("molview")
        .product_version("1.2.0")
        .build_dir(&build)
        .bundle_dir(root.join("dist"))
}

/// Lay down an OpenBabel install with a conventional versioned layout.
fn openbabel_fixture(root: &Path, version: &str) -> std::path::PathBuf {
    let ob = root.join("openbabel");
    let plugins = ob.join(format!("lib/openbabel/{version}"));
    let data = ob.join(format!("share/openbabel/{version}"));
    std::fs::create_dir_all(&plugins).expect("mkdir plugins");
    std::fs::create_dir_all(&data).expect("mkdir data");
    std::fs::write(plugins.join("cifformat.obf"), b"cif").expect("write");
    std::fs::write(plugins.join("formats_xml.obf"), b"xml").expect("write");
    std::fs::write(data.join("element.txt"), b"H He Li").expect("write");
    ob
}

#[tokio::test]
async fn full_run_invokes_tools_in_order() {
    let dir = tempfile::tempdir().expect("tempdir");
    let ob = openbabel_fixture(dir.path(), "3.1.1");

    // zlib install whose DLL sits next to the import library hint
    let zlib = dir.path().join("zlib");
    std::fs::create_dir_all(&zlib).expect("mkdir");
    std::fs::write(zlib.join("zlib1.dll"), b"z").expect("write");

    let settings: Settings = base_settings(dir.path())
        .toolkit_root(&ob)
        .toolkit_version("3.1.1")
        .zlib_library(&zlib)
        .build()
        .expect("settings");

    let runner = RecordingRunner::default();
    let staged = BundleAssembler::with_runner(settings, runner.clone())
        .assemble()
        .await
        .expect("assemble");

    assert_eq!(runner.programs(), vec!["cmake", "windeployqt", "makensis"]);

    // Packager defines carry the resolved component version
    let makensis = &runner.invocations()[2];
    assert!(makensis.args.iter().any(|a| a == "-DOPENBABEL_VERSION=3.1.1"));
    assert!(makensis.args.iter().any(|a| a == "-DPRODUCT_VERSION=1.2.0"));

    // Plugins staged into both loader search paths
    let dist = dir.path().join("dist");
    assert!(dist.join("lib/openbabel/3.1.1/cifformat.obf").is_file());
    assert!(dist.join("bin/plugins/3.1.1/cifformat.obf").is_file());

    // Shared data staged under the resolved version
    assert!(dist.join("share/openbabel/3.1.1/element.txt").is_file());

    // Plugin-adjacent zlib reached bin and both plugin destinations
    assert!(dist.join("bin/zlib1.dll").is_file());
    assert!(dist.join("lib/openbabel/3.1.1/zlib1.dll").is_file());
    assert!(dist.join("bin/plugins/3.1.1/zlib1.dll").is_file());

    // Launchers and manifest written
    assert!(dist.join("bin/molview.bat").is_file());
    assert!(dist.join("bin/obabel.bat").is_file());
    assert!(dist.join("bundle-manifest.json").is_file());

    assert_eq!(staged.components.len(), 1);
    assert_eq!(staged.components[0].version, "3.1.1");
}

#[tokio::test]
async fn missing_plugin_groups_abort_before_packager() {
    let dir = tempfile::tempdir().expect("tempdir");

    // Plugin directory exists but satisfies no required group
    let ob = dir.path().join("openbabel");
    std::fs::create_dir_all(ob.join("lib/openbabel/3.1.1")).expect("mkdir");
    std::fs::write(
        ob.join("lib/openbabel/3.1.1/unrelated.obf"),
        b"",
    )
    .expect("write");

    let settings = base_settings(dir.path())
        .toolkit_root(&ob)
        .toolkit_version("3.1.1")
        .build()
        .expect("settings");

    let runner = RecordingRunner::default();
    let err = BundleAssembler::with_runner(settings, runner.clone())
        .assemble()
        .await
        .unwrap_err();

    match err {
        Error::PluginGroupsMissing { groups, .. } => {
            // Both groups reported in one combined error
            assert_eq!(groups, vec!["crystallography", "xml-formats"]);
        }
        other => panic!("unexpected error: {other}"),
    }

    // The packager is never reached after a validation failure
    assert!(!runner.programs().iter().any(|p| p == "makensis"));
}

#[tokio::test]
async fn omitted_component_roots_skip_their_stages() {
    let dir = tempfile::tempdir().expect("tempdir");
    let settings = base_settings(dir.path()).build().expect("settings");

    let runner = RecordingRunner::default();
    BundleAssembler::with_runner(settings, runner.clone())
        .assemble()
        .await
        .expect("assemble succeeds without optional components");

    let dist = dir.path().join("dist");
    assert!(!dist.join("lib/openbabel").exists());
    assert!(dist.join("bin/molview.bat").is_file());
    assert!(!dist.join("bin/obabel.bat").exists());
    assert_eq!(runner.programs(), vec!["cmake", "windeployqt", "makensis"]);
}

#[tokio::test]
async fn reruns_stage_byte_identical_trees() {
    let dir = tempfile::tempdir().expect("tempdir");
    let ob = openbabel_fixture(dir.path(), "3.1.1");
    let settings = base_settings(dir.path())
        .toolkit_root(&ob)
        .toolkit_version("3.1.1")
        .build()
        .expect("settings");

    let assembler = BundleAssembler::with_runner(settings, RecordingRunner::default());
    assembler.assemble().await.expect("first run");
    let first = checksum::calculate_sha256(&dir.path().join("dist"))
        .await
        .expect("hash");

    assembler.assemble().await.expect("second run");
    let second = checksum::calculate_sha256(&dir.path().join("dist"))
        .await
        .expect("hash");

    assert_eq!(first, second);
}

#[tokio::test]
async fn clean_removes_stale_files_from_previous_runs() {
    let dir = tempfile::tempdir().expect("tempdir");
    let stale = dir.path().join("dist/bin/stale.dll");
    std::fs::create_dir_all(stale.parent().expect("parent")).expect("mkdir");
    std::fs::write(&stale, b"old").expect("write");

    let settings = base_settings(dir.path()).build().expect("settings");
    BundleAssembler::with_runner(settings, RecordingRunner::default())
        .assemble()
        .await
        .expect("assemble");

    assert!(!stale.exists());
}

#[tokio::test]
async fn failing_install_tool_aborts_the_run() {
    let dir = tempfile::tempdir().expect("tempdir");
    let settings = base_settings(dir.path()).build().expect("settings");

    let runner = FailingRunner::new("cmake");
    let err = BundleAssembler::with_runner(settings, runner.clone())
        .assemble()
        .await
        .unwrap_err();

    assert!(matches!(err, Error::ToolFailed { ref command, .. } if command == "cmake"));
    // Nothing after the failed install step ran
    assert_eq!(runner.calls.lock().expect("lock").len(), 1);
}

#[tokio::test]
async fn required_toolkit_without_root_is_fatal() {
    let dir = tempfile::tempdir().expect("tempdir");
    let settings = base_settings(dir.path())
        .toolkit_required(true)
        .build()
        .expect("settings");

    let runner = RecordingRunner::default();
    let err = BundleAssembler::with_runner(settings, runner.clone())
        .assemble()
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::ComponentRootMissing { ref component } if component == "openbabel"
    ));
    assert!(!runner.programs().iter().any(|p| p == "makensis"));
}

#[tokio::test]
async fn engine_payload_is_staged_into_bin() {
    let dir = tempfile::tempdir().expect("tempdir");
    let xtb = dir.path().join("xtb");
    std::fs::create_dir_all(xtb.join("bin")).expect("mkdir");
    std::fs::write(xtb.join("bin/xtb.exe"), b"xtb").expect("write");
    std::fs::write(xtb.join("bin/libiomp5md.dll"), b"omp").expect("write");

    let settings = base_settings(dir.path())
        .engine_root(&xtb)
        .engine_version("6.5.1")
        .build()
        .expect("settings");

    let runner = RecordingRunner::default();
    BundleAssembler::with_runner(settings, runner.clone())
        .assemble()
        .await
        .expect("assemble");

    let dist = dir.path().join("dist");
    assert!(dist.join("bin/xtb.exe").is_file());
    assert!(dist.join("bin/libiomp5md.dll").is_file());

    let makensis = runner.invocations().pop().expect("makensis call");
    assert!(makensis.args.iter().any(|a| a == "-DXTB_VERSION=6.5.1"));
}

#[tokio::test]
async fn broken_engine_install_is_fatal() {
    let dir = tempfile::tempdir().expect("tempdir");
    // Root supplied but the executable is absent: a broken configuration,
    // not an omitted component.
    let xtb = dir.path().join("xtb");
    std::fs::create_dir_all(xtb.join("bin")).expect("mkdir");

    let settings = base_settings(dir.path())
        .engine_root(&xtb)
        .engine_version("6.5.1")
        .build()
        .expect("settings");

    let runner = RecordingRunner::default();
    let err = BundleAssembler::with_runner(settings, runner.clone())
        .assemble()
        .await
        .unwrap_err();

    assert!(err.to_string().contains("xtb"));
    assert!(!runner.programs().iter().any(|p| p == "makensis"));
}
