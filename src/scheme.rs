// ── Custom URI scheme registration ────────────────────────────────────────────
//
// Registers the `tg:` link handler three ways, all under HKCU:
//   • legacy `Software\Classes\<scheme>` entry (protocol marker, icon, command)
//   • a vendor-qualified prog-id (`tdesktop.tg`) for Default Programs
//   • the Capabilities / RegisteredApplications pair that makes the app
//     selectable in Windows Settings
//
// The whole operation is an ordered descriptor list fed to
// `registry::apply_values`: idempotent, fail-fast, no rollback.

use crate::error::Result;
use crate::identity::AppIdentity;
use crate::registry::{apply_values, RegRoot, RegistryStore, ValueEntry};

/// Build the full descriptor list for `identity`.
///
/// The key paths, value names and the command-line template
/// `"<exe>" -workdir "<dir>" -- "%1"` are load-bearing: the installed base
/// (and Windows itself, once a default is chosen) looks these up verbatim.
pub fn scheme_values(identity: &AppIdentity) -> Vec<ValueEntry> {
    let exe = identity.exe_display();
    let icon = format!("\"{exe},1\"");
    let command = format!(
        "\"{exe}\" -workdir \"{dir}\" -- \"%1\"",
        dir = identity.working_dir_display(),
    );

    let classes = format!(r"Software\Classes\{}", identity.scheme);
    let prog_id = format!(r"Software\Classes\{}", identity.prog_id);
    let capabilities = format!(r"Software\{}\Capabilities", identity.vendor_key);

    vec![
        // Legacy URI scheme registration.
        ValueEntry::new(&classes, Some("URL Protocol"), ""),
        ValueEntry::new(&classes, None, identity.scheme_label()),
        ValueEntry::new(format!(r"{classes}\DefaultIcon"), None, &icon),
        ValueEntry::new(format!(r"{classes}\shell\open\command"), None, &command),
        // URI scheme registration as Default Program.
        ValueEntry::new(format!(r"{prog_id}\DefaultIcon"), None, &icon),
        ValueEntry::new(format!(r"{prog_id}\shell\open\command"), None, &command),
        ValueEntry::new(&capabilities, Some("ApplicationName"), &identity.app_name),
        ValueEntry::new(
            &capabilities,
            Some("ApplicationDescription"),
            &identity.app_name,
        ),
        ValueEntry::new(
            format!(r"{capabilities}\UrlAssociations"),
            Some(identity.scheme.as_str()),
            &identity.prog_id,
        ),
        ValueEntry::new(
            r"Software\RegisteredApplications",
            Some(identity.app_name.as_str()),
            format!(r"SOFTWARE\{}\Capabilities", identity.vendor_key),
        ),
    ]
}

/// Install (or refresh) the custom scheme registration.
///
/// Idempotent: a second run with unchanged configuration performs zero
/// registry writes.  Fails fast at the first key that cannot be opened,
/// created or written; already-applied entries are left in place and a later
/// re-run resumes from there.
///
/// Skipped silently while the executable name is unresolved.
pub fn register_custom_scheme(
    store: &mut impl RegistryStore,
    identity: &AppIdentity,
) -> Result<()> {
    if !identity.has_executable() {
        return Ok(());
    }
    log::debug!("checking custom scheme '{}'", identity.scheme);
    apply_values(store, RegRoot::CurrentUser, &scheme_values(identity))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::registry::mem::MemRegistry;

    fn identity() -> AppIdentity {
        AppIdentity::with_paths(
            PathBuf::from(r"C:\Telegram\Telegram.exe"),
            PathBuf::from(r"C:\Telegram\work"),
        )
    }

    fn value(store: &MemRegistry, path: &str, name: Option<&str>) -> Option<String> {
        store.read_string(RegRoot::CurrentUser, path, name)
    }

    #[test]
    fn registers_exact_layout() {
        let mut store = MemRegistry::new();
        register_custom_scheme(&mut store, &identity()).expect("register");

        assert_eq!(
            value(&store, r"Software\Classes\tg", Some("URL Protocol")),
            Some(String::new())
        );
        assert_eq!(
            value(&store, r"Software\Classes\tg", None),
            Some("URL:Telegram Link".to_owned())
        );
        assert_eq!(
            value(&store, r"Software\Classes\tg\DefaultIcon", None),
            Some(r#""C:\Telegram\Telegram.exe,1""#.to_owned())
        );
        let command = r#""C:\Telegram\Telegram.exe" -workdir "C:\Telegram\work" -- "%1""#;
        assert_eq!(
            value(&store, r"Software\Classes\tg\shell\open\command", None),
            Some(command.to_owned())
        );
        assert_eq!(
            value(&store, r"Software\Classes\tdesktop.tg\shell\open\command", None),
            Some(command.to_owned())
        );
        assert_eq!(
            value(
                &store,
                r"Software\TelegramDesktop\Capabilities",
                Some("ApplicationName")
            ),
            Some("Telegram Desktop".to_owned())
        );
        assert_eq!(
            value(
                &store,
                r"Software\TelegramDesktop\Capabilities\UrlAssociations",
                Some("tg")
            ),
            Some("tdesktop.tg".to_owned())
        );
        assert_eq!(
            value(
                &store,
                r"Software\RegisteredApplications",
                Some("Telegram Desktop")
            ),
            Some(r"SOFTWARE\TelegramDesktop\Capabilities".to_owned())
        );
    }

    #[test]
    fn second_run_writes_nothing() {
        let mut store = MemRegistry::new();
        register_custom_scheme(&mut store, &identity()).expect("first");
        let first_run_writes = store.writes.len();
        assert!(first_run_writes > 0);
        store.writes.clear();

        register_custom_scheme(&mut store, &identity()).expect("second");
        assert!(
            store.writes.is_empty(),
            "unchanged config must not write: {:?}",
            store.writes
        );
    }

    #[test]
    fn fails_fast_and_resumes_on_retry() {
        let mut store = MemRegistry::new();
        store.fail_on_path = Some(r"Software\Classes\tdesktop.tg\DefaultIcon".to_owned());
        assert!(register_custom_scheme(&mut store, &identity()).is_err());

        // Everything before the failing key was applied, nothing after it.
        assert!(value(&store, r"Software\Classes\tg\shell\open\command", None).is_some());
        assert!(value(&store, r"Software\RegisteredApplications", Some("Telegram Desktop")).is_none());

        // A retry with the fault cleared completes the remainder.
        store.fail_on_path = None;
        register_custom_scheme(&mut store, &identity()).expect("retry");
        assert!(value(&store, r"Software\RegisteredApplications", Some("Telegram Desktop")).is_some());
    }

    #[test]
    fn unresolved_executable_skips_silently() {
        let mut store = MemRegistry::new();
        let identity = AppIdentity::default(); // no exe path
        register_custom_scheme(&mut store, &identity).expect("skip is Ok");
        assert!(store.writes.is_empty());
        assert!(!store.key_exists(RegRoot::CurrentUser, r"Software\Classes\tg"));
    }
}
