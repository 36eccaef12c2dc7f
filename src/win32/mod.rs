// ── Win32 platform implementation ─────────────────────────────────────────────
//
// This is the only module in the codebase where `unsafe` code is permitted.
// Every `unsafe` block MUST carry a `// SAFETY:` comment that states:
//   • which invariant makes the operation sound, and
//   • what the caller is responsible for maintaining.
//
// Nothing in this module is `pub` beyond what callers genuinely need; keep the
// unsafe surface as small as possible.  The logic lives in the crate-root
// modules against the `RegistryStore`/`LinkStore` seams; this module provides
// the real backends plus convenience entry points that wire them up.

#![allow(unsafe_code)]

// ── Sub-modules ───────────────────────────────────────────────────────────────

pub mod links; // IShellLinkW shortcut persistence, known-folder resolution
pub mod registry; // HKCU/HKLM string-value store
pub mod system; // ShellExecute, assoc-change notify, process memory, idle time
pub mod window; // window activation, monitor work area

use crate::cleanup::CleanupReport;
use crate::error::Result;
use crate::identity::AppIdentity;
use crate::permissions::{PermissionStatus, PermissionType, SystemSettingsType, UiDispatcher};

/// Null-terminated UTF-16 copy of `s` for PCWSTR parameters.
pub(crate) fn wide(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}

// ── Wired-up entry points ─────────────────────────────────────────────────────

pub fn register_custom_scheme(identity: &AppIdentity) -> Result<()> {
    crate::scheme::register_custom_scheme(&mut registry::Win32Registry, identity)
}

pub fn autostart(identity: &AppIdentity, enabled: bool, silent: bool) -> Result<()> {
    crate::shortcuts::autostart(&mut links::Win32LinkStore, identity, enabled, silent)
}

pub fn send_to_menu(identity: &AppIdentity, enabled: bool, silent: bool) -> Result<()> {
    crate::shortcuts::send_to_menu(&mut links::Win32LinkStore, identity, enabled, silent)
}

/// Best-effort removal of both managed links, for uninstall.
pub fn remove_shortcuts(identity: &AppIdentity) {
    crate::shortcuts::remove_shortcuts(&mut links::Win32LinkStore, identity);
}

pub fn permission_status(permission: PermissionType) -> PermissionStatus {
    crate::permissions::permission_status(&registry::Win32Registry, permission)
}

pub fn fix_previous_installation(identity: &AppIdentity) -> CleanupReport {
    crate::cleanup::fix_previous_installation(
        &mut registry::Win32Registry,
        &mut links::Win32LinkStore,
        identity,
    )
}

pub fn handle_new_version(identity: &AppIdentity, old_settings_version: u32) -> Result<()> {
    crate::lifecycle::handle_new_version(
        &mut registry::Win32Registry,
        identity,
        old_settings_version,
        system::notify_assoc_changed,
    )
}

/// Open the Settings privacy page for `permission` on the UI thread.
pub fn open_settings_for_permission(dispatcher: &impl UiDispatcher, permission: PermissionType) {
    crate::permissions::open_settings_for_permission(dispatcher, permission, |uri| {
        if !system::shell_open(uri, None) {
            log::warn!("could not open '{uri}'");
        }
    });
}

/// Open a legacy control-panel settings page on the UI thread.  Always
/// reports `true`; the launch result is logged but not surfaced.
pub fn open_system_settings(dispatcher: &impl UiDispatcher, settings: SystemSettingsType) -> bool {
    crate::permissions::open_system_settings(dispatcher, settings, |program, parameters| {
        if !system::shell_open(program, Some(parameters)) {
            log::warn!("could not launch '{program} {parameters}'");
        }
    })
}
