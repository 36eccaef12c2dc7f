// ── Well-known application paths ──────────────────────────────────────────────

use std::env;
use std::path::PathBuf;

/// Per-user roaming data directory for the application:
/// `%APPDATA%\<app_name>\`.  `None` when the environment does not provide
/// `APPDATA` (never the case on a real Windows session).
pub fn app_data_path(app_name: &str) -> Option<PathBuf> {
    let base = env::var_os("APPDATA")?;
    if base.is_empty() {
        return None;
    }
    let mut path = PathBuf::from(base);
    path.push(app_name);
    Some(path)
}

/// Absolute path of the running executable.
///
/// Falls back to `argv[0]` when the OS query fails; `None` only when both
/// sources are unavailable.
pub fn current_executable_path() -> Option<PathBuf> {
    env::current_exe()
        .ok()
        .or_else(|| env::args_os().next().map(PathBuf::from))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
