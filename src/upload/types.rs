use std::path::{Path, PathBuf};

/// Extensions offered by the file dialog. Advisory only: the backend decides what it accepts.
pub const ACCEPTED_EXTENSIONS: [&str; 8] = ["txt", "json", "zip", "rar", "7z", "xlsx", "xls", "csv"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub path: PathBuf,
    pub name: String,
    pub size: Option<u64>,
}

impl SelectedFile {
    pub fn from_path(path: impl Into<PathBuf>) -> Option<Self> {
        let path = path.into();
        let name = path.file_name()?.to_string_lossy().to_string();
        let size = std::fs::metadata(&path)
            .ok()
            .filter(|meta| meta.is_file())
            .map(|meta| meta.len());

        Some(Self { path, name, size })
    }

    pub fn has_accepted_extension(&self) -> bool {
        is_accepted(&self.path)
    }
}

pub fn is_accepted(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| ACCEPTED_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}
