// ── Application identity ──────────────────────────────────────────────────────
//
// The process-wide configuration every shell-integration operation reads:
// executable location, working directory, and the branding strings that end
// up in the registry and in shortcut files.  Defaults are the values the
// installed base expects (`tg:` scheme, `tdesktop.tg` prog-id, …); portable
// builds may override the branding with a small JSON file.

use std::{fs, path::Path, path::PathBuf};

use serde::{Deserialize, Serialize};

/// Identity and branding of the embedding application.
///
/// `exe_path` and `working_dir` are runtime state supplied by the host (they
/// are not part of the override file).  An empty `exe_path` means the
/// executable name has not been resolved yet; shell-integration operations
/// treat that as a precondition and skip silently.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppIdentity {
    /// Display name used for Default Programs registration ("Telegram Desktop").
    pub app_name: String,
    /// File stem for shortcut files and window titles ("Telegram" → Telegram.lnk).
    pub app_file: String,
    /// Installer product id; keys under `...\CurrentVersion\Uninstall\<id>_is1`.
    pub app_id: String,
    /// AppUserModelID stamped onto shortcut links.
    pub app_user_model_id: String,
    /// Custom URI scheme ("tg").
    pub scheme: String,
    /// Vendor-qualified prog-id for Default Programs ("tdesktop.tg").
    pub prog_id: String,
    /// Vendor key under HKCU\Software holding the Capabilities tree.
    pub vendor_key: String,

    /// Absolute path to the running executable; empty until resolved.
    #[serde(skip)]
    pub exe_path: PathBuf,
    /// Absolute working directory passed back via `-workdir` on launches.
    #[serde(skip)]
    pub working_dir: PathBuf,
}

impl Default for AppIdentity {
    fn default() -> Self {
        Self {
            app_name: "Telegram Desktop".to_owned(),
            app_file: "Telegram".to_owned(),
            app_id: "{53F49750-6209-4FBF-9CA8-7A333C87D1ED}".to_owned(),
            app_user_model_id: "Telegram.TelegramDesktop".to_owned(),
            scheme: "tg".to_owned(),
            prog_id: "tdesktop.tg".to_owned(),
            vendor_key: "TelegramDesktop".to_owned(),
            exe_path: PathBuf::new(),
            working_dir: PathBuf::new(),
        }
    }
}

impl AppIdentity {
    /// Default identity bound to the given executable path and working dir.
    pub fn with_paths(exe_path: PathBuf, working_dir: PathBuf) -> Self {
        Self {
            exe_path,
            working_dir,
            ..Self::default()
        }
    }

    /// `true` once the executable path has been resolved.
    ///
    /// Registration and shortcut management are silently skipped while this
    /// is `false` — a precondition, not an error.
    pub fn has_executable(&self) -> bool {
        self.exe_path.file_name().is_some()
    }

    /// The executable path as it is written into registry commands.
    pub fn exe_display(&self) -> String {
        self.exe_path.to_string_lossy().into_owned()
    }

    /// The working directory as it is written into registry commands.
    pub fn working_dir_display(&self) -> String {
        self.working_dir.to_string_lossy().into_owned()
    }

    /// Shortcut file name, e.g. `Telegram.lnk`.
    pub fn link_file_name(&self) -> String {
        format!("{}.lnk", self.app_file)
    }

    /// Human-readable label of the URI scheme, e.g. `URL:Telegram Link`.
    pub fn scheme_label(&self) -> String {
        format!("URL:{} Link", self.app_file)
    }
}

// ── Branding override file ────────────────────────────────────────────────────

/// Read a branding override file.
///
/// Returns `None` on any error: file missing, JSON parse failure.  Missing
/// fields fall back to the defaults, so a partial override is fine.  Runtime
/// paths (`exe_path`, `working_dir`) always start empty and must be set by
/// the host afterwards.
pub fn load_overrides(path: &Path) -> Option<AppIdentity> {
    let data = fs::read(path).ok()?;
    serde_json::from_slice(&data).ok()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
