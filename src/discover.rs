//! Recursive discovery of Ableton Live project files.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Extension that marks a file as an Ableton Live project archive.
pub const PROJECT_FILE_EXTENSION: &str = ".als";

/// Walks `root` recursively and returns every project file found, in
/// traversal order. The extension comparison is case-insensitive.
///
/// Unreadable directories are logged and skipped so one bad subtree never
/// sinks the whole walk. A root with no project files yields an empty list.
pub fn find_project_files(root: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root).follow_links(false) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                log::warn!("skipping entry while walking {}: {}", root.display(), err);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if name.to_ascii_lowercase().ends_with(PROJECT_FILE_EXTENSION) {
            files.push(entry.into_path());
        }
    }

    files
}
