// ── Version-change hooks ──────────────────────────────────────────────────────

use crate::error::Result;
use crate::identity::AppIdentity;
use crate::registry::RegistryStore;
use crate::scheme;

/// Builds older than this shipped a broken protocol icon; upgrading across
/// the boundary must flush the shell's association cache once.
const ICON_CACHE_RESET_VERSION: u32 = 10021;

/// Run once after the app version changes.
///
/// Re-registers the custom scheme (the registered command embeds the
/// executable path, which an update may have moved), then flushes the shell
/// association cache when upgrading from an affected build.
/// `old_settings_version` is `0` on a fresh install, which needs no flush.
/// `notify_assoc_changed` is `win32::system::notify_assoc_changed` in
/// production.
pub fn handle_new_version(
    store: &mut impl RegistryStore,
    identity: &AppIdentity,
    old_settings_version: u32,
    notify_assoc_changed: impl FnOnce(),
) -> Result<()> {
    scheme::register_custom_scheme(store, identity)?;
    if old_settings_version > 0 && old_settings_version < ICON_CACHE_RESET_VERSION {
        log::info!(
            "refreshing shell association cache (upgraded from {old_settings_version})"
        );
        notify_assoc_changed();
    }
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::path::PathBuf;

    use super::*;
    use crate::registry::mem::MemRegistry;
    use crate::registry::RegRoot;

    fn identity() -> AppIdentity {
        AppIdentity::with_paths(
            PathBuf::from(r"C:\Telegram\Telegram.exe"),
            PathBuf::from(r"C:\Telegram\work"),
        )
    }

    fn run(old: u32) -> bool {
        let mut store = MemRegistry::new();
        let notified = Cell::new(false);
        handle_new_version(&mut store, &identity(), old, || notified.set(true))
            .expect("version hook");
        notified.get()
    }

    #[test]
    fn upgrade_from_affected_build_flushes_cache() {
        assert!(run(9016));
        assert!(run(10020));
    }

    #[test]
    fn fresh_install_does_not_flush() {
        assert!(!run(0));
    }

    #[test]
    fn upgrade_from_fixed_build_does_not_flush() {
        assert!(!run(10021));
        assert!(!run(20000));
    }

    #[test]
    fn scheme_is_reregistered() {
        let mut store = MemRegistry::new();
        handle_new_version(&mut store, &identity(), 0, || {}).expect("version hook");
        assert!(store.key_exists(RegRoot::CurrentUser, r"Software\Classes\tg"));
    }
}
