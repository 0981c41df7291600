//! Integration tests for ops crate
#![cfg(unix)]

use async_trait::async_trait;
use evm_builder::RecordingBuilder;
use evm_errors::{ConfigError, Error, OpsError, PlatformError};
use evm_index::{MemoryCatalog, RecipeRepository};
use evm_ops::*;
use evm_package::{Layout, PackageCtx};
use evm_platform::{CommandOutput, FixedPlatform, PlatformCommand, ProcessOperations};
use evm_state::{MemorySettings, SettingKey};
use evm_types::InstallAction;
use std::os::unix::process::ExitStatusExt;
use std::path::PathBuf;
use std::process::ExitStatus;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

#[derive(Default)]
struct RecordingProcess {
    commands: Mutex<Vec<String>>,
}

#[async_trait]
impl ProcessOperations for RecordingProcess {
    async fn execute_command(&self, cmd: PlatformCommand) -> Result<CommandOutput, Error> {
        self.commands.lock().unwrap().push(cmd.display());
        Ok(CommandOutput {
            status: ExitStatus::from_raw(0),
            stdout: Vec::new(),
            stderr: Vec::new(),
        })
    }
}

struct Fixture {
    temp: TempDir,
    ctx: OpsCtx,
    builder: Arc<RecordingBuilder>,
    process: Arc<RecordingProcess>,
}

impl Fixture {
    fn new(recipes_url: Option<&str>) -> Self {
        let temp = TempDir::new().unwrap();
        let base = temp.path().join("installations");
        std::fs::create_dir(&base).unwrap();

        let builder = Arc::new(RecordingBuilder::producing_binary());
        let package = PackageCtx::new(
            Layout::with_home(&base, &temp.path().join("home")),
            Arc::new(MemoryCatalog::with_names(["emacs-28.2", "emacs-29.4", "emacs-30.1"])),
            builder.clone(),
            Arc::new(FixedPlatform::linux()),
            Arc::new(MemorySettings::new()),
        );
        let process = Arc::new(RecordingProcess::default());
        let ctx = OpsContextBuilder::new()
            .with_package_ctx(Arc::new(package))
            .with_recipe_repository(RecipeRepository::new(
                temp.path().join("home").join("recipes"),
                process.clone(),
            ))
            .with_recipes_url(recipes_url.map(str::to_string))
            .build()
            .unwrap();

        Self {
            temp,
            ctx,
            builder,
            process,
        }
    }

    fn managed_shim(&self) -> PathBuf {
        self.ctx.package.layout.managed_shim.clone()
    }
}

#[tokio::test]
async fn test_builder_requires_components() {
    let err = OpsContextBuilder::new().build().err().unwrap();
    assert!(matches!(
        err,
        Error::Ops(OpsError::InitializationFailed { .. })
    ));
}

#[tokio::test]
async fn test_install_then_use() {
    let fx = Fixture::new(None);

    let report = install(&fx.ctx, &InstallRequest::new("emacs-29.4"))
        .await
        .unwrap();
    assert_eq!(report.action, InstallAction::Installed);
    assert!(!report.activated);
    assert!(report.binary.ends_with("emacs-29.4/bin/emacs"));

    use_package(&fx.ctx, "emacs-29.4").await.unwrap();
    let listing = list_packages(&fx.ctx).await.unwrap();
    let flags: Vec<(&str, bool, bool)> = listing
        .iter()
        .map(|l| (l.name.as_str(), l.installed, l.current))
        .collect();
    assert_eq!(
        flags,
        vec![
            ("emacs-28.2", false, false),
            ("emacs-29.4", true, true),
            ("emacs-30.1", false, false),
        ]
    );
}

#[tokio::test]
async fn test_install_unknown_package() {
    let fx = Fixture::new(None);
    let err = install(&fx.ctx, &InstallRequest::new("emacs-1.0"))
        .await
        .unwrap_err();
    assert!(err.is_package_not_found());
    assert!(fx.builder.calls().is_empty());
}

#[tokio::test]
async fn test_install_flags_for_installed_package() {
    let fx = Fixture::new(None);
    install(&fx.ctx, &InstallRequest::new("emacs-30.1"))
        .await
        .unwrap();

    let err = install(&fx.ctx, &InstallRequest::new("emacs-30.1"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Ops(OpsError::AlreadyInstalled { ref package }) if package == "emacs-30.1"
    ));

    let skipped = install(
        &fx.ctx,
        &InstallRequest {
            skip_installed: true,
            ..InstallRequest::new("emacs-30.1")
        },
    )
    .await
    .unwrap();
    assert_eq!(skipped.action, InstallAction::Skipped);
    assert_eq!(fx.builder.calls().len(), 1);

    let forced = install(
        &fx.ctx,
        &InstallRequest {
            force: true,
            use_after: true,
            ..InstallRequest::new("emacs-30.1")
        },
    )
    .await
    .unwrap();
    assert_eq!(forced.action, InstallAction::Reinstalled);
    assert!(forced.activated);
    assert_eq!(fx.builder.calls().len(), 2);
    assert_eq!(
        config_get(&fx.ctx, SettingKey::Current).await.unwrap().as_deref(),
        Some("emacs-30.1")
    );
}

#[tokio::test]
async fn test_use_requires_installation() {
    let fx = Fixture::new(None);
    let err = use_package(&fx.ctx, "emacs-28.2").await.unwrap_err();
    assert!(matches!(err, Error::Ops(OpsError::NotInstalled { .. })));
    assert!(err.to_string().contains("Not installed emacs-28.2"));
    assert!(!fx.managed_shim().exists());
}

#[tokio::test]
async fn test_uninstall_current_reports_and_keeps_current() {
    let fx = Fixture::new(None);
    install(
        &fx.ctx,
        &InstallRequest {
            use_after: true,
            ..InstallRequest::new("emacs-29.4")
        },
    )
    .await
    .unwrap();

    let report = uninstall(&fx.ctx, "emacs-29.4").await.unwrap();
    assert!(report.was_current);
    assert!(!fx.managed_shim().exists());
    assert_eq!(
        config_get(&fx.ctx, SettingKey::Current).await.unwrap().as_deref(),
        Some("emacs-29.4")
    );

    let err = uninstall(&fx.ctx, "emacs-29.4").await.unwrap_err();
    assert!(matches!(err, Error::Ops(OpsError::NotInstalled { .. })));

    disuse(&fx.ctx).await.unwrap();
    assert_eq!(config_get(&fx.ctx, SettingKey::Current).await.unwrap(), None);
}

#[tokio::test]
async fn test_bin_named_and_current() {
    let fx = Fixture::new(None);
    let err = bin(&fx.ctx, None).await.unwrap_err();
    assert!(matches!(err, Error::Ops(OpsError::NoCurrentPackage)));

    let named = bin(&fx.ctx, Some("emacs-28.2")).await.unwrap();
    assert_eq!(
        named,
        fx.temp.path().join("installations/emacs-28.2/bin/emacs")
    );

    install(
        &fx.ctx,
        &InstallRequest {
            use_after: true,
            ..InstallRequest::new("emacs-30.1")
        },
    )
    .await
    .unwrap();
    assert!(bin(&fx.ctx, None)
        .await
        .unwrap()
        .ends_with("emacs-30.1/bin/emacs"));
}

#[tokio::test]
async fn test_config_set_validates_path() {
    let fx = Fixture::new(None);
    let err = config_set(&fx.ctx, SettingKey::Path, Some("relative/dir"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Config(ConfigError::InvalidValue { .. })));

    config_set(&fx.ctx, SettingKey::Path, Some("/opt/emacsen"))
        .await
        .unwrap();
    assert_eq!(
        config_get(&fx.ctx, SettingKey::Path).await.unwrap().as_deref(),
        Some("/opt/emacsen")
    );
}

#[tokio::test]
async fn test_update_recipes_clones_then_pulls() {
    let fx = Fixture::new(Some("https://example.com/evm-recipes.git"));

    let message = update_recipes(&fx.ctx).await.unwrap();
    assert!(message.contains("Cloned"));

    // the fake git does not create the checkout; do it by hand
    std::fs::create_dir_all(fx.ctx.recipes.path()).unwrap();
    update_recipes(&fx.ctx).await.unwrap();

    let commands = fx.process.commands.lock().unwrap();
    assert!(commands[0].starts_with("git clone https://example.com/evm-recipes.git"));
    assert_eq!(commands[1], "git pull --depth=1");
}

#[tokio::test]
async fn test_update_recipes_needs_url() {
    let fx = Fixture::new(None);
    let err = update_recipes(&fx.ctx).await.unwrap_err();
    assert!(matches!(err, Error::Ops(OpsError::RecipesNotConfigured)));
    assert!(!ensure_recipes(&fx.ctx).await.unwrap());
}

#[tokio::test]
async fn test_doctor_result_success_flag() {
    let fx = Fixture::new(None);
    let report = doctor(&fx.ctx).await.unwrap();
    assert!(OperationResult::Doctor(report).is_success());

    let json = OperationResult::Binary(PathBuf::from("/x/bin/emacs"))
        .to_json()
        .unwrap();
    assert!(json.contains("\"type\": \"Binary\""));
}

#[tokio::test]
async fn test_platform_errors_surface_from_git() {
    struct MissingGit;

    #[async_trait]
    impl ProcessOperations for MissingGit {
        async fn execute_command(&self, cmd: PlatformCommand) -> Result<CommandOutput, Error> {
            Err(PlatformError::CommandNotFound {
                command: cmd.program().to_string(),
            }
            .into())
        }
    }

    let fx = Fixture::new(Some("https://example.com/r.git"));
    let ctx = OpsContextBuilder::new()
        .with_package_ctx(fx.ctx.package.clone())
        .with_recipe_repository(RecipeRepository::new(
            fx.temp.path().join("other"),
            Arc::new(MissingGit),
        ))
        .with_recipes_url(Some("https://example.com/r.git".into()))
        .build()
        .unwrap();

    let err = ensure_recipes(&ctx).await.unwrap_err();
    assert!(matches!(
        err,
        Error::Platform(PlatformError::CommandNotFound { .. })
    ));
}
