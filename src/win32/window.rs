// ── Window activation and monitor geometry ────────────────────────────────────
//
// This is inside `win32` so `unsafe` is permitted per crate policy.

#![allow(unsafe_code)]

use windows::Win32::Foundation::{BOOL, FALSE, HWND, LPARAM, TRUE};
use windows::Win32::Graphics::Gdi::{
    GetMonitorInfoW, MonitorFromWindow, MONITORINFO, MONITOR_DEFAULTTONEAREST,
};
use windows::Win32::UI::Input::KeyboardAndMouse::SetFocus;
use windows::Win32::UI::WindowsAndMessaging::{
    EnumWindows, GetWindowTextW, GetWindowThreadProcessId, SetForegroundWindow,
};

use crate::activation::is_app_window_title;
use crate::monitor::Rect;

// ── Activation ────────────────────────────────────────────────────────────────

struct Search {
    pid: u32,
    app_name: String,
    found: Option<HWND>,
}

unsafe extern "system" fn find_window_cb(hwnd: HWND, lparam: LPARAM) -> BOOL {
    // SAFETY (whole body): lparam is the Search pointer passed by
    // activate_process below, valid for the duration of the synchronous
    // EnumWindows call on this thread; hwnd is supplied by the enumeration.
    let search = &mut *(lparam.0 as *mut Search);

    let mut pid = 0u32;
    GetWindowThreadProcessId(hwnd, Some(&mut pid));
    if pid != search.pid {
        return TRUE;
    }

    let mut buf = [0u16; 256];
    let len = GetWindowTextW(hwnd, &mut buf);
    let title = String::from_utf16_lossy(&buf[..len as usize]);
    if is_app_window_title(&title, &search.app_name) {
        search.found = Some(hwnd);
        return FALSE; // stop enumerating
    }
    TRUE
}

/// Bring the main window of the process `pid` to the foreground.
///
/// Matches top-level windows by process id and title (the app name with an
/// optional unread-count suffix).  Returns whether a window was found; the
/// foreground/focus calls themselves are best-effort — Windows may refuse
/// foreground changes from a background process.
pub fn activate_process(pid: u32, app_name: &str) -> bool {
    let mut search = Search {
        pid,
        app_name: app_name.to_owned(),
        found: None,
    };
    // SAFETY: the pointer to `search` stays valid for the synchronous
    // EnumWindows call.  The callback returning FALSE makes EnumWindows
    // report failure; that is the found case, not an error.
    unsafe {
        let _ = EnumWindows(
            Some(find_window_cb),
            LPARAM(&mut search as *mut Search as isize),
        );
    }

    let Some(hwnd) = search.found else {
        return false;
    };
    // SAFETY: hwnd was produced by the enumeration above; both calls tolerate
    // a window that has since been destroyed.
    unsafe {
        let _ = SetForegroundWindow(hwnd);
        let _ = SetFocus(hwnd);
    }
    true
}

// ── Monitor geometry ──────────────────────────────────────────────────────────

/// Work area of the monitor nearest to `hwnd`, in virtual-desktop
/// coordinates.  `None` when the query fails.  Feed this to
/// `DesktopRectCache::get` as the refresh closure.
pub fn desktop_work_area(hwnd: HWND) -> Option<Rect> {
    // SAFETY: MONITOR_DEFAULTTONEAREST guarantees a monitor handle even for
    // an off-screen or null hwnd.
    let monitor = unsafe { MonitorFromWindow(hwnd, MONITOR_DEFAULTTONEAREST) };
    if monitor.is_invalid() {
        return None;
    }

    let mut info = MONITORINFO {
        cbSize: std::mem::size_of::<MONITORINFO>() as u32,
        ..Default::default()
    };
    // SAFETY: info.cbSize is set as GetMonitorInfoW requires; the pointer is
    // valid for the call.
    if !unsafe { GetMonitorInfoW(monitor, &mut info) }.as_bool() {
        return None;
    }

    let work = info.rcWork;
    Some(Rect {
        x: work.left,
        y: work.top,
        width: work.right - work.left,
        height: work.bottom - work.top,
    })
}
