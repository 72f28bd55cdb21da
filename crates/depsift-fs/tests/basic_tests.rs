//! Basic tests for FileSystem implementations.

use depsift_fs::{FileSystem, MemoryFileSystem, NativeFileSystem};
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write_manifest(dir: &Path, name: &str) {
    fs::create_dir_all(dir).unwrap();
    fs::write(
        dir.join("package.json"),
        format!(r#"{{"name":"{name}","version":"1.0.0"}}"#),
    )
    .unwrap();
}

#[tokio::test]
async fn test_native_exists() {
    let temp_dir = TempDir::new().unwrap();
    let fs = NativeFileSystem::new(temp_dir.path()).unwrap();

    assert!(!fs.exists(Path::new("/tsconfig.json")).await.unwrap());

    fs::write(temp_dir.path().join("tsconfig.json"), "{}").unwrap();
    assert!(fs.exists(Path::new("/tsconfig.json")).await.unwrap());
}

#[tokio::test]
async fn test_native_read_root_relative() {
    let temp_dir = TempDir::new().unwrap();
    let fs = NativeFileSystem::new(temp_dir.path()).unwrap();

    fs::write(temp_dir.path().join("test.txt"), "Hello, World!").unwrap();

    assert_eq!(
        fs.read_to_string(Path::new("/test.txt")).await.unwrap(),
        "Hello, World!"
    );
    assert_eq!(
        fs.read_to_string(Path::new("test.txt")).await.unwrap(),
        "Hello, World!"
    );
}

#[tokio::test]
async fn test_native_lists_nested_manifests() {
    let temp_dir = TempDir::new().unwrap();
    write_manifest(temp_dir.path(), "root");
    write_manifest(&temp_dir.path().join("node_modules/a"), "a");
    write_manifest(&temp_dir.path().join("node_modules/@scope/b"), "@scope/b");
    write_manifest(&temp_dir.path().join("node_modules/a/node_modules/c"), "c");
    fs::write(temp_dir.path().join("node_modules/a/index.js"), "module.exports = 1;").unwrap();

    let fs = NativeFileSystem::new(temp_dir.path()).unwrap();
    let files = fs.list_package_files().await.unwrap();

    assert_eq!(
        files,
        vec![
            PathBuf::from("node_modules/@scope/b/package.json"),
            PathBuf::from("node_modules/a/node_modules/c/package.json"),
            PathBuf::from("node_modules/a/package.json"),
        ]
    );
    assert!(fs.install_size().await.unwrap() > 0);
}

#[tokio::test]
async fn test_native_without_node_modules() {
    let temp_dir = TempDir::new().unwrap();
    write_manifest(temp_dir.path(), "root");

    let fs = NativeFileSystem::new(temp_dir.path()).unwrap();
    assert!(fs.list_package_files().await.unwrap().is_empty());
    assert_eq!(fs.install_size().await.unwrap(), 0);
}

#[cfg(unix)]
#[tokio::test]
async fn test_native_follows_symlinked_packages() {
    let temp_dir = TempDir::new().unwrap();
    write_manifest(temp_dir.path(), "root");
    write_manifest(&temp_dir.path().join("real-package"), "linked-package");
    fs::create_dir_all(temp_dir.path().join("node_modules")).unwrap();
    std::os::unix::fs::symlink(
        temp_dir.path().join("real-package"),
        temp_dir.path().join("node_modules/linked-package"),
    )
    .unwrap();

    let fs = NativeFileSystem::new(temp_dir.path()).unwrap();
    let files = fs.list_package_files().await.unwrap();
    assert_eq!(files, vec![PathBuf::from("node_modules/linked-package/package.json")]);

    let manifest = fs.read_to_string(&files[0]).await.unwrap();
    assert!(manifest.contains("linked-package"));
}

fn pack(files: &[(&str, &str)]) -> Vec<u8> {
    let mut builder = tar::Builder::new(GzEncoder::new(Vec::new(), Compression::default()));
    for (path, contents) in files {
        let mut header = tar::Header::new_gnu();
        header.set_size(contents.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder
            .append_data(&mut header, format!("package/{path}"), contents.as_bytes())
            .unwrap();
    }
    builder.into_inner().unwrap().finish().unwrap()
}

#[tokio::test]
async fn test_tarball_strips_package_prefix() {
    let bytes = pack(&[
        ("package.json", r#"{"name":"test-package","version":"1.0.0"}"#),
        ("lib/index.js", "export {};"),
    ]);

    let fs = MemoryFileSystem::from_tarball(&bytes).unwrap();

    assert!(fs.exists(Path::new("/package.json")).await.unwrap());
    assert!(fs.exists(Path::new("/lib/index.js")).await.unwrap());
    assert!(!fs.exists(Path::new("/tsconfig.json")).await.unwrap());
    assert!(fs
        .read_to_string(Path::new("package.json"))
        .await
        .unwrap()
        .contains("test-package"));
}

#[tokio::test]
async fn test_tarball_install_size_is_packed_size() {
    let bytes = pack(&[("package.json", "{}"), ("index.js", "1234567890")]);
    let fs = MemoryFileSystem::from_tarball(&bytes).unwrap();

    assert_eq!(fs.install_size().await.unwrap(), 12);
}

#[test]
fn test_tarball_rejects_garbage() {
    assert!(MemoryFileSystem::from_tarball(b"not a tarball").is_err());
}
