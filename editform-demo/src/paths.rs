//! Platform-specific directory paths.
//!
//! Uses XDG on Linux, standard locations on macOS/Windows.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;

const QUALIFIER: &str = "dev";
const ORGANIZATION: &str = "editform";
const APPLICATION: &str = "editform-demo";

/// Log file used when no home directory can be determined.
const FALLBACK_LOG: &str = "editform-demo.log";

/// Maximum number of archived log files to keep.
const MAX_OLD_LOGS: usize = 25;

/// Get project directories, or None if home directory cannot be determined.
fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
}

/// Get the cache directory, which holds the logs.
///
/// - Linux: `$XDG_CACHE_HOME/editform-demo` or `~/.cache/editform-demo`
/// - macOS: `~/Library/Caches/dev.editform.editform-demo`
/// - Windows: `C:\Users\<User>\AppData\Local\editform\editform-demo\cache`
pub fn cache_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.cache_dir().to_path_buf())
}

/// Path of the current log file.
pub fn log_file() -> PathBuf {
    cache_dir()
        .map(|dir| dir.join("latest.log"))
        .unwrap_or_else(|| PathBuf::from(FALLBACK_LOG))
}

/// Archive the previous `latest.log` under a timestamped name and prune
/// old archives.
///
/// Call this at startup before creating the new log file.
pub fn rotate_logs() {
    let Some(cache) = cache_dir() else { return };
    if fs::create_dir_all(&cache).is_err() {
        return;
    }

    let latest = cache.join("latest.log");
    if latest.exists() {
        let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        let _ = fs::rename(&latest, cache.join(format!("{}.log", timestamp)));
    }

    cleanup_old_logs(&cache);
}

/// Remove archived logs beyond the newest MAX_OLD_LOGS.
fn cleanup_old_logs(cache_dir: &Path) {
    let Ok(entries) = fs::read_dir(cache_dir) else { return };

    let mut logs: Vec<_> = entries
        .filter_map(|e| e.ok())
        .filter(|e| {
            let name = e.file_name();
            let name = name.to_string_lossy();
            name.ends_with(".log") && name != "latest.log"
        })
        .collect();

    // Oldest first
    logs.sort_by_key(|e| e.metadata().and_then(|m| m.modified()).ok());

    let excess = logs.len().saturating_sub(MAX_OLD_LOGS);
    for entry in logs.iter().take(excess) {
        let _ = fs::remove_file(entry.path());
    }
}
