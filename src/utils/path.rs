use crate::config::InputConfig;
use glob::{Pattern, glob};
use std::path::PathBuf;

/// Expand paths, directories and glob patterns into a list of response files.
///
/// Plain file paths are kept as given. Directories are searched recursively
/// and only files with a configured extension are kept. Glob patterns keep
/// every file they match. A path that exists is never treated as a glob,
/// even when its name contains `*`, `?` or `[`.
pub fn expand_paths(patterns: &[String], input: &InputConfig) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    for pattern in patterns {
        let path = PathBuf::from(pattern);
        if path.is_dir() {
            let recursive_pattern =
                format!("{}/**/*", Pattern::escape(pattern.trim_end_matches('/')));
            let expanded = expand_paths(&[recursive_pattern], input);
            paths.extend(expanded.into_iter().filter(|p| input.accepts(p)));
            continue;
        }
        if path.exists() {
            paths.push(path);
            continue;
        }
        if !pattern.contains('*') && !pattern.contains('?') && !pattern.contains('[') {
            // Reported by the processor when it fails to read the file
            paths.push(path);
            continue;
        }

        match glob(pattern) {
            Ok(entries) => {
                for entry in entries.flatten() {
                    if entry.is_file() {
                        paths.push(entry);
                    }
                }
            }
            Err(err) => log::warn!("Invalid pattern '{}': {}", pattern, err),
        }
    }
    paths
}
