//! Scratch files for tests, kept under `<workspace>/test_output/`.

use std::path::PathBuf;
use std::sync::OnceLock;

fn test_output_dir() -> &'static PathBuf {
    static DIR: OnceLock<PathBuf> = OnceLock::new();
    DIR.get_or_init(|| {
        // common/ sits directly under the workspace root
        let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        let root = manifest_dir
            .parent()
            .map(|p| p.to_path_buf())
            .unwrap_or(manifest_dir);
        let dir = root.join("test_output");
        std::fs::create_dir_all(&dir).expect("Failed to create test_output directory");
        dir
    })
}

/// Path of a file in the test output directory. The file may be left over
/// from an earlier run.
pub fn test_output_path(name: &str) -> PathBuf {
    test_output_dir().join(name)
}

/// Like [`test_output_path`], but removes any file left from an earlier run.
pub fn fresh_test_output_path(name: &str) -> PathBuf {
    let path = test_output_path(name);
    if path.exists() {
        std::fs::remove_file(&path).expect("Failed to remove stale test output");
    }
    path
}
