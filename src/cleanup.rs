// ── Legacy-install cleanup ────────────────────────────────────────────────────
//
// Early installers registered the uninstall entry under HKLM; current ones
// use HKCU.  When both generations are present Windows shows two "Apps &
// features" rows, and a stray all-users desktop shortcut can shadow the
// per-user one.  This pass detects the current-generation markers and removes
// the stale machine-wide leftovers.
//
// The whole routine is wrapped in `catch_unwind` and always yields a report:
// cleanup is opportunistic and must never take the host down.

use std::panic::{self, AssertUnwindSafe};

use crate::identity::AppIdentity;
use crate::registry::{RegRoot, RegistryStore};
use crate::shortcuts::{LinkStore, ShellFolder};

/// What a cleanup pass actually changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanupReport {
    /// Stale HKLM uninstall keys deleted.
    pub removed_registry_keys: usize,
    /// All-users desktop shortcut deleted because a per-user one exists.
    pub removed_duplicate_shortcut: bool,
}

/// Uninstall-entry key path for `app_id`, optionally under Wow6432Node.
fn uninstall_key(prefix: &str, wow64: bool, app_id: &str) -> String {
    let node = if wow64 { r"Wow6432Node\" } else { "" };
    format!(r"{prefix}\{node}Microsoft\Windows\CurrentVersion\Uninstall\{app_id}_is1")
}

fn cleanup_registry(store: &mut impl RegistryStore, identity: &AppIdentity) -> usize {
    // The per-user entry written by current installers, 32- or 64-bit view.
    let installed_per_user = [true, false].into_iter().any(|wow64| {
        store.value_exists(
            RegRoot::CurrentUser,
            &uninstall_key("Software", wow64, &identity.app_id),
            Some("InstallDate"),
        )
    });
    if !installed_per_user {
        return 0;
    }

    let mut removed = 0;
    for wow64 in [true, false] {
        let old = uninstall_key("SOFTWARE", wow64, &identity.app_id);
        if !store.value_exists(RegRoot::LocalMachine, &old, Some("InstallDate")) {
            continue;
        }
        match store.delete_key(RegRoot::LocalMachine, &old) {
            Ok(()) => removed += 1,
            Err(e) => log::warn!("could not delete stale uninstall key '{old}': {e}"),
        }
    }
    removed
}

fn cleanup_desktop_shortcut(links: &mut impl LinkStore, identity: &AppIdentity) -> bool {
    let (user, common) = match (
        links.folder_path(ShellFolder::Desktop),
        links.folder_path(ShellFolder::CommonDesktop),
    ) {
        (Ok(u), Ok(c)) => (u, c),
        _ => return false,
    };
    if user == common {
        return false;
    }

    let user_link = user.join(identity.link_file_name());
    let common_link = common.join(identity.link_file_name());
    if !links.link_exists(&user_link) || !links.link_exists(&common_link) {
        return false;
    }
    match links.remove_link(&common_link) {
        Ok(()) => true,
        Err(e) => {
            log::warn!(
                "could not delete duplicate shortcut '{}': {e}",
                common_link.display()
            );
            false
        }
    }
}

/// Remove machine-wide leftovers from a previous installer generation.
///
/// Runs only when the current per-user uninstall entry is present (checked
/// via its `InstallDate` value).  Swallows every failure, panics included,
/// and reports what was removed; a clean system yields the default report.
pub fn fix_previous_installation(
    store: &mut impl RegistryStore,
    links: &mut impl LinkStore,
    identity: &AppIdentity,
) -> CleanupReport {
    let result = panic::catch_unwind(AssertUnwindSafe(|| CleanupReport {
        removed_registry_keys: cleanup_registry(store, identity),
        removed_duplicate_shortcut: cleanup_desktop_shortcut(links, identity),
    }));
    match result {
        Ok(report) => report,
        Err(_) => {
            log::error!("previous-install cleanup panicked; skipped");
            CleanupReport::default()
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
