//! Integration tests for platform filesystem helpers

#[cfg(all(test, unix))]
mod tests {
    use evm_errors::{Error, StorageError};
    use evm_platform::filesystem_helpers as fs;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_exists_counts_dangling_symlink() {
        let temp = TempDir::new().unwrap();
        let link = temp.path().join("emacs");
        std::os::unix::fs::symlink(temp.path().join("missing"), &link).unwrap();

        assert!(fs::exists(&link).await);
        assert!(!fs::is_executable_file(&link).await);
        assert!(!fs::exists(&temp.path().join("nothing")).await);
    }

    #[tokio::test]
    async fn test_create_dir_is_not_recursive() {
        let temp = TempDir::new().unwrap();
        let nested = temp.path().join("a").join("b");

        let err = fs::create_dir(&nested).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Storage(StorageError::CreateDirFailed { .. })
        ));

        fs::create_dir_all(&nested).await.unwrap();
        assert!(fs::is_dir(&nested).await);
    }

    #[tokio::test]
    async fn test_write_executable_sets_mode() {
        let temp = TempDir::new().unwrap();
        let script = temp.path().join("evm-emacs");

        fs::write_executable(&script, "#!/bin/bash\n").await.unwrap();

        let mode = std::fs::metadata(&script).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
        assert!(fs::is_executable_file(&script).await);
        assert_eq!(fs::read_to_string(&script).await.unwrap(), "#!/bin/bash\n");
    }

    #[tokio::test]
    async fn test_plain_file_is_not_executable() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("data");
        std::fs::write(&file, "x").unwrap();
        std::fs::set_permissions(&file, std::fs::Permissions::from_mode(0o644)).unwrap();

        assert!(!fs::is_executable_file(&file).await);
        assert!(!fs::is_executable_file(temp.path()).await);
    }

    #[tokio::test]
    async fn test_ensure_empty_dir_clears_contents() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("build");
        std::fs::create_dir(&dir).unwrap();
        std::fs::write(dir.join("stale.o"), "").unwrap();

        fs::ensure_empty_dir(&dir).await.unwrap();
        assert!(fs::is_dir(&dir).await);
        assert_eq!(std::fs::read_dir(&dir).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_read_missing_file_carries_path() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("config.json");
        match fs::read_to_string(&missing).await.unwrap_err() {
            Error::Io { kind, path, .. } => {
                assert_eq!(kind, std::io::ErrorKind::NotFound);
                assert_eq!(path.as_deref(), Some(missing.as_path()));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
