// ── Win32 registry backend ────────────────────────────────────────────────────
//
// `RegistryStore` over the real HKCU/HKLM hives.  String values travel as
// null-terminated UTF-16 (`REG_SZ`); a value of a different type reads as
// absent, which is exactly what the compare-then-write layer needs to repair
// a key something else has mangled.
//
// This is inside `win32` so `unsafe` is permitted per crate policy.

#![allow(unsafe_code)]

use windows::core::PCWSTR;
use windows::Win32::Foundation::{ERROR_FILE_NOT_FOUND, ERROR_SUCCESS, WIN32_ERROR};
use windows::Win32::System::Registry::{
    RegCloseKey, RegCreateKeyExW, RegDeleteKeyW, RegOpenKeyExW, RegQueryValueExW, RegSetValueExW,
    HKEY, HKEY_CURRENT_USER, HKEY_LOCAL_MACHINE, KEY_READ, KEY_WRITE,
    REG_CREATE_KEY_DISPOSITION, REG_OPTION_NON_VOLATILE, REG_SAM_FLAGS, REG_SZ, REG_VALUE_TYPE,
};

use super::wide;
use crate::error::{PlatformError, Result};
use crate::registry::{RegRoot, RegistryStore};

/// The real registry.  Stateless; every call opens and closes its own key.
pub struct Win32Registry;

fn hive(root: RegRoot) -> HKEY {
    match root {
        RegRoot::CurrentUser => HKEY_CURRENT_USER,
        RegRoot::LocalMachine => HKEY_LOCAL_MACHINE,
    }
}

fn check(status: WIN32_ERROR, function: &'static str) -> Result<()> {
    if status == ERROR_SUCCESS {
        Ok(())
    } else {
        Err(PlatformError::Win32 {
            function,
            code: status.0,
        })
    }
}

/// Open key handle, closed on drop.
struct Key(HKEY);

impl Drop for Key {
    fn drop(&mut self) {
        // SAFETY: self.0 was opened by RegOpenKeyExW/RegCreateKeyExW in this
        // module and is closed exactly once, here.
        unsafe {
            let _ = RegCloseKey(self.0);
        }
    }
}

fn open(root: RegRoot, path: &str, access: REG_SAM_FLAGS) -> Option<Key> {
    let path_w = wide(path);
    let mut hkey = HKEY::default();
    // SAFETY: path_w is a valid null-terminated UTF-16 string that outlives
    // the call; hkey receives the opened handle only on ERROR_SUCCESS.
    let status =
        unsafe { RegOpenKeyExW(hive(root), PCWSTR(path_w.as_ptr()), 0, access, &mut hkey) };
    (status == ERROR_SUCCESS).then(|| Key(hkey))
}

/// Query one value into `(type, raw bytes)`.  `None` when key or value is
/// absent or any query step fails.
fn query_raw(key: &Key, name: Option<&str>) -> Option<(REG_VALUE_TYPE, Vec<u8>)> {
    let name_w = name.map(wide);
    let name_ptr = name_w
        .as_ref()
        .map_or(PCWSTR::null(), |w| PCWSTR(w.as_ptr()));

    let mut ty = REG_VALUE_TYPE::default();
    let mut size = 0u32;
    // SAFETY: name_ptr is null (default value) or points into name_w, which
    // outlives both calls; size-only query first, then a data query with a
    // buffer of exactly that size.
    let status =
        unsafe { RegQueryValueExW(key.0, name_ptr, None, Some(&mut ty), None, Some(&mut size)) };
    if status != ERROR_SUCCESS {
        return None;
    }

    let mut buf = vec![0u8; size as usize];
    // SAFETY: buf is `size` bytes as reported by the query above; a racing
    // grow of the value makes this fail cleanly with ERROR_MORE_DATA.
    let status = unsafe {
        RegQueryValueExW(
            key.0,
            name_ptr,
            None,
            Some(&mut ty),
            Some(buf.as_mut_ptr()),
            Some(&mut size),
        )
    };
    if status != ERROR_SUCCESS {
        return None;
    }
    buf.truncate(size as usize);
    Some((ty, buf))
}

fn decode_utf16(bytes: &[u8]) -> String {
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect();
    String::from_utf16_lossy(&units)
        .trim_end_matches('\0')
        .to_owned()
}

impl RegistryStore for Win32Registry {
    fn ensure_key(&mut self, root: RegRoot, path: &str) -> Result<()> {
        let path_w = wide(path);
        let mut hkey = HKEY::default();
        let mut disposition = REG_CREATE_KEY_DISPOSITION::default();
        // SAFETY: path_w outlives the call; hkey and disposition are plain
        // out-parameters.  Opens the key when it already exists.
        let status = unsafe {
            RegCreateKeyExW(
                hive(root),
                PCWSTR(path_w.as_ptr()),
                0,
                PCWSTR::null(),
                REG_OPTION_NON_VOLATILE,
                KEY_READ | KEY_WRITE,
                None,
                &mut hkey,
                Some(&mut disposition),
            )
        };
        check(status, "RegCreateKeyExW")?;
        drop(Key(hkey));
        Ok(())
    }

    fn read_string(&self, root: RegRoot, path: &str, name: Option<&str>) -> Option<String> {
        let key = open(root, path, KEY_READ)?;
        let (ty, bytes) = query_raw(&key, name)?;
        (ty == REG_SZ).then(|| decode_utf16(&bytes))
    }

    fn write_string(
        &mut self,
        root: RegRoot,
        path: &str,
        name: Option<&str>,
        value: &str,
    ) -> Result<()> {
        let key = open(root, path, KEY_WRITE).ok_or(PlatformError::Win32 {
            function: "RegOpenKeyExW",
            code: ERROR_FILE_NOT_FOUND.0,
        })?;

        let name_w = name.map(wide);
        let name_ptr = name_w
            .as_ref()
            .map_or(PCWSTR::null(), |w| PCWSTR(w.as_ptr()));
        // REG_SZ data is the UTF-16 string including its null terminator.
        let data: Vec<u8> = wide(value)
            .into_iter()
            .flat_map(u16::to_le_bytes)
            .collect();

        // SAFETY: name_ptr and data outlive the call; the key was opened with
        // KEY_WRITE above.
        let status = unsafe { RegSetValueExW(key.0, name_ptr, 0, REG_SZ, Some(&data)) };
        check(status, "RegSetValueExW")
    }

    fn key_exists(&self, root: RegRoot, path: &str) -> bool {
        open(root, path, KEY_READ).is_some()
    }

    // Type-agnostic, unlike the REG_SZ-only default.
    fn value_exists(&self, root: RegRoot, path: &str, name: Option<&str>) -> bool {
        open(root, path, KEY_READ)
            .and_then(|key| query_raw(&key, name))
            .is_some()
    }

    fn delete_key(&mut self, root: RegRoot, path: &str) -> Result<()> {
        let path_w = wide(path);
        // SAFETY: path_w outlives the call.  Non-recursive by contract; the
        // keys this crate deletes carry values only.
        let status = unsafe { RegDeleteKeyW(hive(root), PCWSTR(path_w.as_ptr())) };
        if status == ERROR_FILE_NOT_FOUND {
            return Ok(());
        }
        check(status, "RegDeleteKeyW")
    }
}
