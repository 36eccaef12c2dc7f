// ── Win32 shortcut backend ────────────────────────────────────────────────────
//
// `LinkStore` over real `.lnk` files: known-folder resolution via
// `SHGetKnownFolderPath`, link creation via the COM `ShellLink` object with
// the AppUserModelID stamped into its property store (required for toasts to
// attribute notifications to the app), persistence via `IPersistFile`.
//
// COM is initialised per write; the apartment-threaded init/uninit pair is
// scoped, so callers need no COM state of their own.
//
// This is inside `win32` so `unsafe` is permitted per crate policy.

#![allow(unsafe_code)]

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use windows::core::{Interface, GUID, PCWSTR, PROPVARIANT};
use windows::Win32::System::Com::{
    CoCreateInstance, CoInitializeEx, CoTaskMemFree, CoUninitialize, IPersistFile,
    CLSCTX_INPROC_SERVER, COINIT_APARTMENTTHREADED,
};
use windows::Win32::UI::Shell::PropertiesSystem::{IPropertyStore, PROPERTYKEY};
use windows::Win32::UI::Shell::{
    FOLDERID_Desktop, FOLDERID_PublicDesktop, FOLDERID_SendTo, FOLDERID_Startup, IShellLinkW,
    SHGetKnownFolderPath, ShellLink, KF_FLAG_DEFAULT,
};

use super::wide;
use crate::error::Result;
use crate::shortcuts::{LinkSpec, LinkStore, ShellFolder};

// PKEY_AppUserModel_ID: {9F4C2855-9F79-4B39-A8D0-E1D42DE1D5F3}, 5
const PKEY_APPUSERMODEL_ID: PROPERTYKEY = PROPERTYKEY {
    fmtid: GUID::from_u128(0x9F4C2855_9F79_4B39_A8D0_E1D42DE1D5F3),
    pid: 5,
};

/// The real shell.  Stateless.
pub struct Win32LinkStore;

/// Apartment-threaded COM init scoped to one operation.
struct ComScope;

impl ComScope {
    fn new() -> Result<Self> {
        // SAFETY: paired with the CoUninitialize in Drop on the same thread.
        // S_FALSE (already initialised) is a success and still needs the
        // balancing uninit, which the guard provides.
        unsafe { CoInitializeEx(None, COINIT_APARTMENTTHREADED).ok()? };
        Ok(Self)
    }
}

impl Drop for ComScope {
    fn drop(&mut self) {
        // SAFETY: balances the CoInitializeEx that created this guard.
        unsafe { CoUninitialize() };
    }
}

fn folder_id(folder: ShellFolder) -> &'static GUID {
    match folder {
        ShellFolder::Startup => &FOLDERID_Startup,
        ShellFolder::SendTo => &FOLDERID_SendTo,
        ShellFolder::Desktop => &FOLDERID_Desktop,
        ShellFolder::CommonDesktop => &FOLDERID_PublicDesktop,
    }
}

impl LinkStore for Win32LinkStore {
    fn folder_path(&self, folder: ShellFolder) -> Result<PathBuf> {
        // SAFETY: the returned PWSTR is a valid null-terminated string
        // allocated by the shell; it is copied out and freed exactly once.
        unsafe {
            let pwstr = SHGetKnownFolderPath(folder_id(folder), KF_FLAG_DEFAULT, None)?;
            let path = String::from_utf16_lossy(pwstr.as_wide());
            CoTaskMemFree(Some(pwstr.0 as *const _));
            Ok(PathBuf::from(path))
        }
    }

    fn write_link(&mut self, path: &Path, spec: &LinkSpec) -> Result<()> {
        let _com = ComScope::new()?;

        let target = wide(&spec.target.to_string_lossy());
        let working_dir = wide(&spec.working_dir.to_string_lossy());
        let arguments = wide(&spec.arguments);
        let description = wide(&spec.description);
        let link_path = wide(&path.to_string_lossy());

        // SAFETY: all PCWSTR arguments point into the null-terminated UTF-16
        // buffers above, which outlive every call; the COM interfaces come
        // from CoCreateInstance/cast and are used within the ComScope.
        unsafe {
            let shell_link: IShellLinkW = CoCreateInstance(&ShellLink, None, CLSCTX_INPROC_SERVER)?;
            shell_link.SetPath(PCWSTR(target.as_ptr()))?;
            shell_link.SetWorkingDirectory(PCWSTR(working_dir.as_ptr()))?;
            shell_link.SetArguments(PCWSTR(arguments.as_ptr()))?;
            shell_link.SetDescription(PCWSTR(description.as_ptr()))?;

            let prop_store: IPropertyStore = shell_link.cast()?;
            let aumid = PROPVARIANT::from(spec.app_user_model_id.as_str());
            prop_store.SetValue(&PKEY_APPUSERMODEL_ID, &aumid)?;
            prop_store.Commit()?;

            let persist: IPersistFile = shell_link.cast()?;
            persist.Save(PCWSTR(link_path.as_ptr()), true)?;
        }
        Ok(())
    }

    fn remove_link(&mut self, path: &Path) -> Result<()> {
        match std::fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn link_exists(&self, path: &Path) -> bool {
        path.exists()
    }
}
