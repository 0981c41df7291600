//! Lifecycle tests against a real temporary filesystem
#![cfg(unix)]

use evm_builder::RecordingBuilder;
use evm_errors::{BuildError, Error, PackageError, StorageError};
use evm_index::MemoryCatalog;
use evm_package::{
    deactivate, doctor, shim_script, Layout, MemoryShimWriter, Package, PackageCtx,
};
use evm_platform::FixedPlatform;
use evm_state::{MemorySettings, SettingKey, SettingsStore};
use evm_types::FindingKind;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

struct Fixture {
    _temp: TempDir,
    ctx: Arc<PackageCtx>,
    builder: Arc<RecordingBuilder>,
    settings: Arc<MemorySettings>,
    base: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        Self::with(FixedPlatform::linux(), RecordingBuilder::producing_binary())
    }

    fn with(platform: FixedPlatform, builder: RecordingBuilder) -> Self {
        let temp = TempDir::new().unwrap();
        let base = temp.path().join("installations");
        std::fs::create_dir(&base).unwrap();
        let layout = Layout::with_home(&base, &temp.path().join("home"));

        let builder = Arc::new(builder);
        let settings = Arc::new(MemorySettings::new());
        let ctx = PackageCtx::new(
            layout,
            Arc::new(MemoryCatalog::with_names(["foo", "bar", "baz"])),
            builder.clone(),
            Arc::new(platform),
            settings.clone(),
        );

        Self {
            _temp: temp,
            ctx: Arc::new(ctx),
            builder,
            settings,
            base,
        }
    }

    fn primary(&self) -> &Path {
        &self.ctx.layout.primary_shim
    }

    fn managed(&self) -> &Path {
        &self.ctx.layout.managed_shim
    }

    async fn package(&self, name: &str) -> Package {
        Package::find(&self.ctx, name).await.unwrap()
    }

    fn install_binary(&self, name: &str, mode: u32) -> PathBuf {
        let bin_dir = self.base.join(name).join("bin");
        std::fs::create_dir_all(&bin_dir).unwrap();
        let bin = bin_dir.join("emacs");
        std::fs::write(&bin, "#!/bin/sh\n").unwrap();
        std::fs::set_permissions(&bin, std::fs::Permissions::from_mode(mode)).unwrap();
        bin
    }
}

fn mode(path: &Path) -> u32 {
    std::fs::metadata(path).unwrap().permissions().mode() & 0o777
}

#[tokio::test]
async fn test_find_known_and_unknown_names() {
    let fx = Fixture::new();
    for name in ["foo", "bar", "baz"] {
        assert_eq!(fx.package(name).await.name(), name);
    }

    let err = Package::find(&fx.ctx, "qux").await.unwrap_err();
    assert!(err.is_package_not_found());
    assert!(err.to_string().contains("No such package: qux"));
}

#[tokio::test]
async fn test_all_preserves_catalog_order() {
    let fx = Fixture::new();
    let names: Vec<String> = Package::all(&fx.ctx)
        .await
        .unwrap()
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(names, vec!["foo", "bar", "baz"]);
}

#[tokio::test]
async fn test_path_is_under_base() {
    let fx = Fixture::new();
    assert_eq!(fx.package("foo").await.path(), fx.base.join("foo"));
}

#[tokio::test]
async fn test_is_installed_requires_executable_regular_file() {
    let fx = Fixture::new();
    let foo = fx.package("foo").await;
    assert!(!foo.is_installed().await);

    let bin = fx.install_binary("foo", 0o644);
    assert!(!foo.is_installed().await);

    std::fs::set_permissions(&bin, std::fs::Permissions::from_mode(0o744)).unwrap();
    assert!(foo.is_installed().await);

    // a directory in place of the binary
    std::fs::remove_file(&bin).unwrap();
    std::fs::create_dir(&bin).unwrap();
    std::fs::set_permissions(&bin, std::fs::Permissions::from_mode(0o755)).unwrap();
    assert!(!foo.is_installed().await);
}

#[tokio::test]
async fn test_macos_prefers_app_bundle() {
    let fx = Fixture::with(FixedPlatform::macos(), RecordingBuilder::new());
    let foo = fx.package("foo").await;
    assert_eq!(foo.bin().await, fx.base.join("foo/bin/emacs"));

    std::fs::create_dir_all(fx.base.join("foo/Emacs.app")).unwrap();
    assert_eq!(
        foo.bin().await,
        fx.base.join("foo/Emacs.app/Contents/MacOS/Emacs")
    );
}

#[tokio::test]
async fn test_linux_ignores_app_bundle() {
    let fx = Fixture::new();
    std::fs::create_dir_all(fx.base.join("foo/Emacs.app")).unwrap();
    assert_eq!(
        fx.package("foo").await.bin().await,
        fx.base.join("foo/bin/emacs")
    );
}

#[tokio::test]
async fn test_is_current_false_when_nothing_recorded() {
    let fx = Fixture::new();
    assert!(!fx.package("foo").await.is_current().await.unwrap());

    fx.settings
        .set(SettingKey::Current, Some(""))
        .await
        .unwrap();
    assert!(!fx.package("foo").await.is_current().await.unwrap());
    assert!(Package::current(&fx.ctx).await.unwrap().is_none());
}

#[tokio::test]
async fn test_is_current_matches_recorded_name() {
    let fx = Fixture::new();
    fx.settings.set(SettingKey::Current, Some("bar")).await.unwrap();

    assert!(fx.package("bar").await.is_current().await.unwrap());
    assert!(!fx.package("foo").await.is_current().await.unwrap());
}

#[tokio::test]
async fn test_stale_current_name_is_not_found() {
    let fx = Fixture::new();
    fx.settings
        .set(SettingKey::Current, Some("emacs-18"))
        .await
        .unwrap();

    let err = Package::current(&fx.ctx).await.unwrap_err();
    assert!(err.is_package_not_found());
}

#[tokio::test]
async fn test_install_creates_directories_and_builds_once() {
    let fx = Fixture::new();
    let foo = fx.package("foo").await;
    assert!(!foo.is_installed().await);
    assert!(!foo.is_current().await.unwrap());

    foo.install().await.unwrap();

    assert!(fx.base.join("foo").is_dir());
    assert!(fx.base.join("tmp").is_dir());
    let calls = fx.builder.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].recipe, "foo");
    assert_eq!(calls[0].install, fx.base.join("foo"));
    assert_eq!(calls[0].tmp, fx.base.join("tmp"));
    assert!(foo.is_installed().await);
}

#[tokio::test]
async fn test_install_twice_keeps_existing_directories() {
    let fx = Fixture::new();
    let foo = fx.package("foo").await;
    foo.install().await.unwrap();

    let marker = fx.base.join("foo").join("marker");
    let tmp_marker = fx.base.join("tmp").join("marker");
    std::fs::write(&marker, "x").unwrap();
    std::fs::write(&tmp_marker, "x").unwrap();

    foo.install().await.unwrap();

    assert!(marker.exists());
    assert!(tmp_marker.exists());
    assert_eq!(fx.builder.calls().len(), 2);
}

#[tokio::test]
async fn test_install_requires_existing_base() {
    let fx = Fixture::new();
    std::fs::remove_dir(&fx.base).unwrap();

    let err = fx.package("foo").await.install().await.unwrap_err();
    assert!(matches!(
        err,
        Error::Storage(StorageError::CreateDirFailed { .. })
    ));
    assert!(fx.builder.calls().is_empty());
}

#[tokio::test]
async fn test_build_failure_propagates_and_keeps_directories() {
    let fx = Fixture::with(FixedPlatform::linux(), RecordingBuilder::failing("make: *** [all] Error 2"));
    let foo = fx.package("foo").await;

    let err = foo.install().await.unwrap_err();
    assert!(matches!(
        err,
        Error::Build(BuildError::Failed { ref message }) if message.contains("Error 2")
    ));
    assert!(fx.base.join("foo").is_dir());
    assert!(fx.base.join("tmp").is_dir());
    assert!(!foo.is_installed().await);
}

#[tokio::test]
async fn test_activate_writes_both_shims() {
    let fx = Fixture::new();
    let foo = fx.package("foo").await;
    foo.install().await.unwrap();

    foo.activate().await.unwrap();

    let expected = shim_script(&fx.base.join("foo/bin/emacs"));
    for shim in [fx.primary(), fx.managed()] {
        assert_eq!(std::fs::read_to_string(shim).unwrap(), expected);
        assert_eq!(mode(shim), 0o755);
    }
    assert_eq!(
        Package::current(&fx.ctx).await.unwrap().unwrap().name(),
        "foo"
    );
    assert!(foo.is_current().await.unwrap());
}

#[tokio::test]
async fn test_activate_leaves_existing_primary_untouched() {
    let fx = Fixture::new();
    std::fs::create_dir_all(fx.primary().parent().unwrap()).unwrap();
    let user_script = b"#!/bin/sh\nexec /usr/bin/emacs \"$@\"\n";
    std::fs::write(fx.primary(), user_script).unwrap();
    std::fs::write(fx.managed(), "garbage").unwrap();

    let bar = fx.package("bar").await;
    bar.activate().await.unwrap();

    assert_eq!(std::fs::read(fx.primary()).unwrap(), user_script);
    assert_eq!(
        std::fs::read_to_string(fx.managed()).unwrap(),
        shim_script(&fx.base.join("bar/bin/emacs"))
    );
}

#[tokio::test]
async fn test_activate_treats_dangling_symlink_as_occupied() {
    let fx = Fixture::new();
    std::fs::create_dir_all(fx.primary().parent().unwrap()).unwrap();
    std::os::unix::fs::symlink("/nowhere/emacs", fx.primary()).unwrap();

    fx.package("foo").await.activate().await.unwrap();

    let link = std::fs::read_link(fx.primary()).unwrap();
    assert_eq!(link, PathBuf::from("/nowhere/emacs"));
}

#[tokio::test]
async fn test_primary_is_not_refreshed_for_another_package() {
    let fx = Fixture::new();
    fx.package("foo").await.activate().await.unwrap();
    fx.package("bar").await.activate().await.unwrap();

    assert_eq!(
        std::fs::read_to_string(fx.primary()).unwrap(),
        shim_script(&fx.base.join("foo/bin/emacs"))
    );
    assert_eq!(
        std::fs::read_to_string(fx.managed()).unwrap(),
        shim_script(&fx.base.join("bar/bin/emacs"))
    );
    assert!(fx.package("bar").await.is_current().await.unwrap());
}

#[tokio::test]
async fn test_deactivate_is_idempotent() {
    let fx = Fixture::new();
    fx.package("foo").await.activate().await.unwrap();

    deactivate(&fx.ctx).await.unwrap();
    let first = (
        fx.primary().exists(),
        fx.managed().exists(),
        fx.settings.get(SettingKey::Current).await.unwrap(),
    );
    fx.package("baz").await.deactivate().await.unwrap();
    let second = (
        fx.primary().exists(),
        fx.managed().exists(),
        fx.settings.get(SettingKey::Current).await.unwrap(),
    );

    assert_eq!(first, (false, false, None));
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_deactivate_removes_user_primary_too() {
    let fx = Fixture::new();
    std::fs::create_dir_all(fx.primary().parent().unwrap()).unwrap();
    std::fs::write(fx.primary(), "user owned").unwrap();

    deactivate(&fx.ctx).await.unwrap();
    assert!(!fx.primary().exists());
}

#[tokio::test]
async fn test_deactivate_refuses_directory_at_primary() {
    let fx = Fixture::new();
    let notes = fx.primary().join("user-data").join("notes.txt");
    std::fs::create_dir_all(notes.parent().unwrap()).unwrap();
    std::fs::write(&notes, "keep me").unwrap();

    let err = deactivate(&fx.ctx).await.unwrap_err();

    assert!(matches!(err, Error::Storage(_)), "unexpected error: {err:?}");
    assert_eq!(std::fs::read_to_string(&notes).unwrap(), "keep me");
}

#[tokio::test]
async fn test_uninstall_missing_directory_is_noop() {
    let fx = Fixture::new();
    let foo = fx.package("foo").await;
    foo.activate().await.unwrap();
    let primary_before = std::fs::read(fx.primary()).unwrap();
    let managed_before = std::fs::read(fx.managed()).unwrap();

    fx.package("bar").await.uninstall().await.unwrap();

    assert_eq!(std::fs::read(fx.primary()).unwrap(), primary_before);
    assert_eq!(std::fs::read(fx.managed()).unwrap(), managed_before);
}

#[tokio::test]
async fn test_uninstall_active_package_keeps_primary() {
    let fx = Fixture::new();
    let foo = fx.package("foo").await;
    foo.install().await.unwrap();
    std::fs::create_dir_all(fx.base.join("foo/share/emacs")).unwrap();
    foo.activate().await.unwrap();
    let primary_before = std::fs::read(fx.primary()).unwrap();

    foo.uninstall().await.unwrap();

    assert!(!fx.base.join("foo").exists());
    assert!(!fx.managed().exists());
    assert_eq!(std::fs::read(fx.primary()).unwrap(), primary_before);
    assert_eq!(
        fx.settings.get(SettingKey::Current).await.unwrap().as_deref(),
        Some("foo")
    );
}

#[tokio::test]
async fn test_uninstall_inactive_package_touches_no_shim() {
    let fx = Fixture::new();
    fx.package("foo").await.activate().await.unwrap();
    let bar = fx.package("bar").await;
    bar.install().await.unwrap();

    bar.uninstall().await.unwrap();

    assert!(!fx.base.join("bar").exists());
    assert!(fx.managed().exists());
    assert!(fx.primary().exists());
}

#[tokio::test]
async fn test_memory_shim_writer_supports_lifecycle() {
    let fx = Fixture::new();
    let shims = Arc::new(MemoryShimWriter::new());
    let ctx = PackageCtx::new(
        fx.ctx.layout.clone(),
        Arc::new(MemoryCatalog::with_names(["foo"])),
        Arc::new(RecordingBuilder::new()),
        Arc::new(FixedPlatform::linux()),
        Arc::new(MemorySettings::new()),
    )
    .with_shims(shims.clone());
    let ctx = Arc::new(ctx);

    shims.insert_raw(fx.primary(), "mine").await;
    let foo = Package::find(&ctx, "foo").await.unwrap();
    foo.activate().await.unwrap();

    assert_eq!(shims.contents(fx.primary()).await.as_deref(), Some("mine"));
    assert_eq!(
        shims.contents(fx.managed()).await,
        Some(shim_script(&fx.base.join("foo/bin/emacs")))
    );
    assert!(!fx.managed().exists());
}

#[tokio::test]
async fn test_doctor_healthy_after_activation() {
    let fx = Fixture::new();
    let foo = fx.package("foo").await;
    foo.install().await.unwrap();
    foo.activate().await.unwrap();

    let report = doctor(&fx.ctx).await.unwrap();
    assert_eq!(report.current.as_deref(), Some("foo"));
    assert!(report.is_healthy(), "{:?}", report.findings);
}

#[tokio::test]
async fn test_doctor_reports_stale_primary_and_missing_install() {
    let fx = Fixture::new();
    fx.package("foo").await.activate().await.unwrap();
    fx.package("bar").await.activate().await.unwrap();

    let kinds: Vec<FindingKind> = doctor(&fx.ctx)
        .await
        .unwrap()
        .findings
        .into_iter()
        .map(|f| f.kind)
        .collect();
    assert_eq!(
        kinds,
        vec![FindingKind::CurrentNotInstalled, FindingKind::PrimaryShimStale]
    );
}

#[tokio::test]
async fn test_doctor_after_uninstalling_active_package() {
    let fx = Fixture::new();
    let foo = fx.package("foo").await;
    foo.install().await.unwrap();
    foo.activate().await.unwrap();
    foo.uninstall().await.unwrap();

    let kinds: Vec<FindingKind> = doctor(&fx.ctx)
        .await
        .unwrap()
        .findings
        .into_iter()
        .map(|f| f.kind)
        .collect();
    assert_eq!(
        kinds,
        vec![FindingKind::CurrentNotInstalled, FindingKind::ManagedShimMissing]
    );
}

#[tokio::test]
async fn test_doctor_orphans_and_unknown_current() {
    let fx = Fixture::new();
    fx.package("foo").await.activate().await.unwrap();
    fx.settings.set(SettingKey::Current, None).await.unwrap();

    let report = doctor(&fx.ctx).await.unwrap();
    assert!(report
        .findings
        .iter()
        .all(|f| f.kind == FindingKind::OrphanedShim));
    assert_eq!(report.findings.len(), 2);

    fx.settings
        .set(SettingKey::Current, Some("emacs-18"))
        .await
        .unwrap();
    let report = doctor(&fx.ctx).await.unwrap();
    assert_eq!(report.findings[0].kind, FindingKind::CurrentUnknown);
    assert_eq!(report.findings[0].subject, "emacs-18");
}

#[tokio::test]
async fn test_doctor_flags_foreign_primary() {
    let fx = Fixture::new();
    std::fs::create_dir_all(fx.primary().parent().unwrap()).unwrap();
    std::fs::write(fx.primary(), "#!/bin/sh\nexec /usr/bin/emacs\n").unwrap();

    let report = doctor(&fx.ctx).await.unwrap();
    assert_eq!(report.findings.len(), 1);
    assert_eq!(report.findings[0].kind, FindingKind::PrimaryShimForeign);
    // read-only
    assert!(fx.primary().exists());
}

#[tokio::test]
async fn test_names_escaping_the_base_are_refused() {
    let temp = TempDir::new().unwrap();
    let base = temp.path().join("installations");
    std::fs::create_dir(&base).unwrap();
    let sentinel = temp.path().join("sentinel");
    std::fs::write(&sentinel, "still here").unwrap();

    let ctx = Arc::new(PackageCtx::new(
        Layout::with_home(&base, &temp.path().join("home")),
        Arc::new(MemoryCatalog::with_names(["tmp", "..", "emacs-29.4"])),
        Arc::new(RecordingBuilder::new()),
        Arc::new(FixedPlatform::linux()),
        Arc::new(MemorySettings::new()),
    ));

    for name in ["tmp", ".."] {
        let err = Package::find(&ctx, name).await.unwrap_err();
        assert!(
            matches!(err, Error::Package(PackageError::InvalidRecipe { .. })),
            "{name}: {err:?}"
        );
    }
    assert!(Package::all(&ctx).await.is_err());
    assert!(Package::find(&ctx, "emacs-29.4").await.is_ok());
    assert_eq!(std::fs::read_to_string(&sentinel).unwrap(), "still here");
}
