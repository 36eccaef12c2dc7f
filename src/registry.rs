// ── Registry abstraction ──────────────────────────────────────────────────────
//
// Shell integration is a sequence of "ensure key exists, ensure value equals"
// steps against the Windows registry.  This module defines that contract as a
// trait plus a descriptor type, so the install sequences are plain data and
// the logic is testable without touching the real registry.  The Win32
// implementation lives in `win32::registry`.

use crate::error::Result;

// ── Roots ─────────────────────────────────────────────────────────────────────

/// Predefined registry roots this crate touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RegRoot {
    /// `HKEY_CURRENT_USER` — all per-user integration lives here.
    CurrentUser,
    /// `HKEY_LOCAL_MACHINE` — only read/deleted by legacy-install cleanup.
    LocalMachine,
}

// ── Store contract ────────────────────────────────────────────────────────────

/// String-valued registry operations.
///
/// Key paths are backslash-separated and relative to the root.  A `name` of
/// `None` addresses the key's default value.  Creating a key that already
/// exists is a no-op; reading or deleting something absent is a normal state,
/// not an error.
pub trait RegistryStore {
    /// Open `path` for read/write, creating it (non-volatile) if absent.
    fn ensure_key(&mut self, root: RegRoot, path: &str) -> Result<()>;

    /// Read a `REG_SZ` value.  `None` when the key or value is absent, or the
    /// value has a different type.
    fn read_string(&self, root: RegRoot, path: &str, name: Option<&str>) -> Option<String>;

    /// Unconditionally write a `REG_SZ` value.  The key must exist.
    fn write_string(
        &mut self,
        root: RegRoot,
        path: &str,
        name: Option<&str>,
        value: &str,
    ) -> Result<()>;

    /// `true` when the key exists.
    fn key_exists(&self, root: RegRoot, path: &str) -> bool;

    /// `true` when the value exists under the key, regardless of its type.
    fn value_exists(&self, root: RegRoot, path: &str, name: Option<&str>) -> bool {
        self.read_string(root, path, name).is_some()
    }

    /// Delete a key (non-recursive).  Absence is success.
    fn delete_key(&mut self, root: RegRoot, path: &str) -> Result<()>;

    /// Write `value` only when the stored value differs (wrong type, length or
    /// content).  Returns whether a write happened.  This is what makes
    /// repeated installs no-ops and spares the registry spurious churn.
    fn ensure_string(
        &mut self,
        root: RegRoot,
        path: &str,
        name: Option<&str>,
        value: &str,
    ) -> Result<bool> {
        if self.read_string(root, path, name).as_deref() == Some(value) {
            return Ok(false);
        }
        self.write_string(root, path, name, value)?;
        Ok(true)
    }
}

// ── Descriptors ───────────────────────────────────────────────────────────────

/// One `(key path, value name, desired value)` step of an install sequence.
///
/// Intermediate keys are created implicitly (`RegCreateKeyExW` semantics), so
/// a sequence only lists the keys that carry values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueEntry {
    pub path: String,
    /// `None` addresses the key's default value.
    pub name: Option<String>,
    pub data: String,
}

impl ValueEntry {
    pub fn new(path: impl Into<String>, name: Option<&str>, data: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.map(str::to_owned),
            data: data.into(),
        }
    }
}

/// Apply an ordered descriptor list: ensure each key, then compare-and-write
/// the value.  Stops at the first failure — the failed and remaining entries
/// are simply not applied.  There is no rollback; every step is individually
/// idempotent, so a later re-run resumes safely from wherever this stopped.
pub fn apply_values(
    store: &mut impl RegistryStore,
    root: RegRoot,
    entries: &[ValueEntry],
) -> Result<()> {
    for entry in entries {
        if let Err(e) = store.ensure_key(root, &entry.path) {
            log::error!("could not open or create registry key '{}': {e}", entry.path);
            return Err(e);
        }
        if let Err(e) = store.ensure_string(root, &entry.path, entry.name.as_deref(), &entry.data) {
            log::error!(
                "could not set {} under '{}': {e}",
                entry
                    .name
                    .as_deref()
                    .map_or("(Default)".to_owned(), |n| format!("'{n}'")),
                entry.path,
            );
            return Err(e);
        }
    }
    Ok(())
}

// ── In-memory store (test double) ─────────────────────────────────────────────


// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::mem::MemRegistry;
    use super::*;

    fn entries() -> Vec<ValueEntry> {
        vec![
            ValueEntry::new(r"Software\Classes\x", Some("URL Protocol"), ""),
            ValueEntry::new(r"Software\Classes\x", None, "URL:X Link"),
            ValueEntry::new(r"Software\Classes\x\DefaultIcon", None, r#""C:\x.exe,1""#),
        ]
    }

    #[test]
    fn apply_writes_everything_once() {
        let mut store = MemRegistry::new();
        apply_values(&mut store, RegRoot::CurrentUser, &entries()).expect("apply");
        assert_eq!(store.writes.len(), 3);
        assert_eq!(
            store.read_string(RegRoot::CurrentUser, r"Software\Classes\x", None),
            Some("URL:X Link".to_owned())
        );
    }

    #[test]
    fn second_apply_is_a_no_op() {
        let mut store = MemRegistry::new();
        apply_values(&mut store, RegRoot::CurrentUser, &entries()).expect("first");
        store.writes.clear();
        apply_values(&mut store, RegRoot::CurrentUser, &entries()).expect("second");
        assert!(store.writes.is_empty(), "second run must skip every write");
    }

    #[test]
    fn changed_value_is_rewritten() {
        let mut store = MemRegistry::new();
        apply_values(&mut store, RegRoot::CurrentUser, &entries()).expect("first");
        store.seed(
            RegRoot::CurrentUser,
            r"Software\Classes\x\DefaultIcon",
            None,
            "stale",
        );
        store.writes.clear();
        apply_values(&mut store, RegRoot::CurrentUser, &entries()).expect("second");
        assert_eq!(store.writes.len(), 1);
        assert_eq!(store.writes[0].0, r"Software\Classes\x\DefaultIcon");
    }

    #[test]
    fn failure_stops_later_entries() {
        let mut store = MemRegistry::new();
        store.fail_on_path = Some(r"Software\Classes\x\DefaultIcon".to_owned());
        let err = apply_values(&mut store, RegRoot::CurrentUser, &entries());
        assert!(err.is_err());
        // The two entries before the failing key were written, nothing after.
        assert_eq!(store.writes.len(), 2);
        assert!(store.writes.iter().all(|(p, _, _)| p == r"Software\Classes\x"));
    }

    #[test]
    fn ensure_string_reports_whether_it_wrote() {
        let mut store = MemRegistry::new();
        store.ensure_key(RegRoot::CurrentUser, "k").expect("key");
        assert!(store
            .ensure_string(RegRoot::CurrentUser, "k", Some("v"), "1")
            .expect("write"));
        assert!(!store
            .ensure_string(RegRoot::CurrentUser, "k", Some("v"), "1")
            .expect("skip"));
    }

    #[test]
    fn delete_absent_key_is_success() {
        let mut store = MemRegistry::new();
        store
            .delete_key(RegRoot::LocalMachine, r"Software\Nope")
            .expect("absence is a normal state");
    }
}
