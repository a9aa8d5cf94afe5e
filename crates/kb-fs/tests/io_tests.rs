use kb_fs::{Error, NormalizedPath, RobustnessConfig, io};
use std::fs;
use std::time::Duration;
use tempfile::TempDir;

fn fast() -> RobustnessConfig {
    RobustnessConfig {
        lock_timeout: Duration::from_millis(500),
        enable_fsync: false,
    }
}

#[test]
fn test_write_atomic_creates_file() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("test.txt"));

    io::write_atomic(&path, b"hello world", fast()).unwrap();

    let content = fs::read_to_string(path.to_native()).unwrap();
    assert_eq!(content, "hello world");
}

#[test]
fn test_write_atomic_overwrites_existing() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("test.txt");
    fs::write(&file_path, "original").unwrap();

    let path = NormalizedPath::new(&file_path);
    io::write_atomic(&path, b"updated", RobustnessConfig::default()).unwrap();

    let content = fs::read_to_string(&file_path).unwrap();
    assert_eq!(content, "updated");
}

#[test]
fn test_write_atomic_creates_missing_parents() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join(".knowledge_cache/deep/status.json"));

    io::write_atomic(&path, b"{}", fast()).unwrap();

    assert_eq!(io::read_text(&path).unwrap(), "{}");
}

#[test]
fn test_write_atomic_leaves_no_temp_files() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("target.txt"));

    io::write_text(&path, "content").unwrap();

    let leftovers: Vec<_> = fs::read_dir(temp.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
        .collect();
    assert!(
        leftovers.is_empty(),
        "No temp files should remain, found: {:?}",
        leftovers.iter().map(|e| e.file_name()).collect::<Vec<_>>()
    );
}

#[test]
fn test_read_bytes_existing_file() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("card.yaml");
    fs::write(&file_path, "title: x\n").unwrap();

    let bytes = io::read_bytes(&NormalizedPath::new(&file_path)).unwrap();
    assert_eq!(bytes, b"title: x\n");
}

#[test]
fn test_read_text_nonexistent_file_is_not_found() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("does_not_exist.txt"));

    let result = io::read_text(&path);
    assert!(matches!(result, Err(Error::NotFound { .. })));
}

#[cfg(unix)]
mod unix_tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;

    fn running_as_root() -> bool {
        // Root ignores permission bits
        let probe = TempDir::new().unwrap();
        let locked = probe.path().join("locked");
        fs::create_dir(&locked).unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o555)).unwrap();
        let writable = fs::write(locked.join("probe"), "x").is_ok();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        writable
    }

    #[test]
    fn write_into_readonly_dir_fails_and_preserves_original() {
        if running_as_root() {
            return;
        }
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("ro");
        fs::create_dir(&dir).unwrap();
        let file_path = dir.join("status.json");
        fs::write(&file_path, "original").unwrap();
        // Lock sidecar must exist up front since the dir becomes read-only
        fs::write(dir.join("status.json.lock"), "").unwrap();
        fs::set_permissions(&dir, fs::Permissions::from_mode(0o555)).unwrap();

        let result = io::write_atomic(&NormalizedPath::new(&file_path), b"new", fast());

        fs::set_permissions(&dir, fs::Permissions::from_mode(0o755)).unwrap();
        assert!(result.is_err(), "write into read-only dir should fail");
        assert_eq!(fs::read_to_string(&file_path).unwrap(), "original");
    }
}
