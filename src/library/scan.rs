use std::path::{Path, PathBuf};

use log::warn;
use walkdir::WalkDir;

use crate::config::LibrarySettings;

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| ext.eq_ignore_ascii_case(extension))
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// Recursively collect files under `dir` with the configured extension.
///
/// Files come back in walk order; nothing is sorted. Entries that cannot be
/// read are logged and skipped. `on_found` is called with the running count.
pub fn scan(
    dir: &Path,
    settings: &LibrarySettings,
    mut on_found: impl FnMut(usize),
) -> Vec<PathBuf> {
    let extension = settings.normalized_extension();
    let mut files: Vec<PathBuf> = Vec::new();

    let walker = WalkDir::new(dir).follow_links(settings.follow_links);

    for entry in walker
        .into_iter()
        .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("skipping unreadable entry: {e}");
                continue;
            }
        };

        let path = entry.path();
        if entry.file_type().is_file() && has_extension(path, &extension) {
            files.push(path.to_path_buf());
            on_found(files.len());
        }
    }

    files
}
