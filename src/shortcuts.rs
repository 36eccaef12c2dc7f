// ── Shortcut link management ──────────────────────────────────────────────────
//
// Autostart and Send-To integration are the same operation with different
// parameters: put a shell link at `<well-known folder>\<AppFile>.lnk`, or
// delete it.  The existence of the file *is* the on/off state — there is no
// separate flag anywhere.
//
// Link persistence goes through the `LinkStore` seam; the COM implementation
// lives in `win32::links`.

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::identity::AppIdentity;

// ── Folders ───────────────────────────────────────────────────────────────────

/// Well-known shell folders this crate places or inspects links in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShellFolder {
    /// Per-user Startup folder — autostart link.
    Startup,
    /// Per-user SendTo folder — "Send to" menu link.
    SendTo,
    /// Per-user desktop — legacy-install cleanup only.
    Desktop,
    /// All-users desktop — legacy-install cleanup only.
    CommonDesktop,
}

// ── Link contents ─────────────────────────────────────────────────────────────

/// Everything a persisted shell link carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkSpec {
    /// Absolute path of the executable the link launches.
    pub target: PathBuf,
    pub working_dir: PathBuf,
    /// Argument string, e.g. `-autostart`.
    pub arguments: String,
    pub description: String,
    /// AppUserModelID stamped into the link's property store.
    pub app_user_model_id: String,
}

// ── Store contract ────────────────────────────────────────────────────────────

/// Shell-link persistence operations.
pub trait LinkStore {
    /// Resolve the absolute path of a well-known folder.
    fn folder_path(&self, folder: ShellFolder) -> Result<PathBuf>;

    /// Create or overwrite a link file at `path`.
    fn write_link(&mut self, path: &Path, spec: &LinkSpec) -> Result<()>;

    /// Delete the link file.  Absence is success.
    fn remove_link(&mut self, path: &Path) -> Result<()>;

    fn link_exists(&self, path: &Path) -> bool;
}

// ── Manager ───────────────────────────────────────────────────────────────────

/// Create or remove the application link in `folder`.
///
/// On `create`, any failure (folder resolution, link building, persistence)
/// is logged — unless `silent` — and aborts the operation; no partial file is
/// left behind because the link is only written in the final persist step.
/// On `!create`, a missing file is a silent success.
///
/// Skipped silently while the executable name is unresolved.
pub fn manage_link(
    store: &mut impl LinkStore,
    identity: &AppIdentity,
    create: bool,
    silent: bool,
    folder: ShellFolder,
    arguments: &str,
    description: &str,
) -> Result<()> {
    if !identity.has_executable() {
        return Ok(());
    }

    let dir = match store.folder_path(folder) {
        Ok(dir) => dir,
        Err(e) => {
            if !silent {
                log::error!("could not resolve {folder:?} folder: {e}");
            }
            return Err(e);
        }
    };
    let link = dir.join(identity.link_file_name());

    if create {
        let spec = LinkSpec {
            target: identity.exe_path.clone(),
            working_dir: identity.working_dir.clone(),
            arguments: arguments.to_owned(),
            description: description.to_owned(),
            app_user_model_id: identity.app_user_model_id.clone(),
        };
        if let Err(e) = store.write_link(&link, &spec) {
            if !silent {
                log::error!("could not save link '{}': {e}", link.display());
            }
            return Err(e);
        }
    } else {
        store.remove_link(&link)?;
    }
    Ok(())
}

/// Enable or disable launching the application at login.
pub fn autostart(
    store: &mut impl LinkStore,
    identity: &AppIdentity,
    enabled: bool,
    silent: bool,
) -> Result<()> {
    let description = format!(
        "{name} autorun link.\nYou can disable autorun in {name} settings.",
        name = identity.app_file,
    );
    manage_link(
        store,
        identity,
        enabled,
        silent,
        ShellFolder::Startup,
        "-autostart",
        &description,
    )
}

/// Add or remove the "Send to" menu entry.
pub fn send_to_menu(
    store: &mut impl LinkStore,
    identity: &AppIdentity,
    enabled: bool,
    silent: bool,
) -> Result<()> {
    let description = format!(
        "{name} send to link.\nYou can disable send to menu item in {name} settings.",
        name = identity.app_file,
    );
    manage_link(
        store,
        identity,
        enabled,
        silent,
        ShellFolder::SendTo,
        "-sendpath",
        &description,
    )
}

/// Remove both managed links, best-effort and silent.  Used by the uninstall
/// cleanup path; individual failures are swallowed.
pub fn remove_shortcuts(store: &mut impl LinkStore, identity: &AppIdentity) {
    let _ = autostart(store, identity, false, true);
    let _ = send_to_menu(store, identity, false, true);
}

// ── In-memory store (test double) ─────────────────────────────────────────────

#[cfg(test)]
pub(crate) mod mem {
    use std::collections::HashMap;
    use std::path::{Path, PathBuf};

    use super::{LinkSpec, LinkStore, ShellFolder};
    use crate::error::{PlatformError, Result};

    /// In-memory link store with resolvable folders and injectable failures.
    #[derive(Default)]
    pub(crate) struct MemLinkStore {
        pub folders: HashMap<ShellFolder, PathBuf>,
        pub links: HashMap<PathBuf, LinkSpec>,
        pub fail_folder: Option<ShellFolder>,
        pub fail_write: bool,
        pub removals: usize,
    }

    impl MemLinkStore {
        /// A store with all four folders resolvable at conventional paths.
        pub fn with_default_folders() -> Self {
            let mut folders = HashMap::new();
            folders.insert(
                ShellFolder::Startup,
                PathBuf::from(r"C:\Users\u\Start Menu\Programs\Startup"),
            );
            folders.insert(ShellFolder::SendTo, PathBuf::from(r"C:\Users\u\SendTo"));
            folders.insert(ShellFolder::Desktop, PathBuf::from(r"C:\Users\u\Desktop"));
            folders.insert(
                ShellFolder::CommonDesktop,
                PathBuf::from(r"C:\Users\Public\Desktop"),
            );
            Self {
                folders,
                ..Self::default()
            }
        }
    }

    impl LinkStore for MemLinkStore {
        fn folder_path(&self, folder: ShellFolder) -> Result<PathBuf> {
            if self.fail_folder == Some(folder) {
                return Err(PlatformError::Win32 {
                    function: "SHGetKnownFolderPath",
                    code: 0x8007_0002, // HRESULT_FROM_WIN32(ERROR_FILE_NOT_FOUND)
                });
            }
            self.folders
                .get(&folder)
                .cloned()
                .ok_or(PlatformError::Win32 {
                    function: "SHGetKnownFolderPath",
                    code: 0x8007_0002,
                })
        }

        fn write_link(&mut self, path: &Path, spec: &LinkSpec) -> Result<()> {
            if self.fail_write {
                return Err(PlatformError::Win32 {
                    function: "IPersistFile::Save",
                    code: 0x8007_0005, // E_ACCESSDENIED flavour
                });
            }
            self.links.insert(path.to_owned(), spec.clone());
            Ok(())
        }

        fn remove_link(&mut self, path: &Path) -> Result<()> {
            if self.links.remove(path).is_some() {
                self.removals += 1;
            }
            Ok(())
        }

        fn link_exists(&self, path: &Path) -> bool {
            self.links.contains_key(path)
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
