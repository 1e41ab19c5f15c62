use std::path::{Path, PathBuf};

use super::FileExistence;

/// Checks output names relative to a project root on the local disk.
#[derive(Debug, Clone)]
pub struct FsFileExistence {
    root: PathBuf,
}

impl FsFileExistence {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl FileExistence for FsFileExistence {
    fn exists(&self, path: &str) -> bool {
        let candidate = Path::new(path);
        if candidate.is_absolute() {
            candidate.is_file()
        } else {
            self.root.join(candidate).is_file()
        }
    }
}
