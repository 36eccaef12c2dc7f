// ── Shell launches and process diagnostics ────────────────────────────────────
//
// This is inside `win32` so `unsafe` is permitted per crate policy.

#![allow(unsafe_code)]

use std::time::Duration;

use windows::core::PCWSTR;
use windows::Win32::System::ProcessStatus::{GetProcessMemoryInfo, PROCESS_MEMORY_COUNTERS};
use windows::Win32::System::SystemInformation::GetTickCount;
use windows::Win32::System::Threading::GetCurrentProcess;
use windows::Win32::UI::Input::KeyboardAndMouse::{GetLastInputInfo, LASTINPUTINFO};
use windows::Win32::UI::Shell::{SHChangeNotify, ShellExecuteW, SHCNE_ASSOCCHANGED, SHCNF_IDLIST};
use windows::Win32::UI::WindowsAndMessaging::SW_SHOWNORMAL;

use super::wide;
use crate::diagnostics::MemoryCounters;
use crate::error::Result;

// ── Shell launches ────────────────────────────────────────────────────────────

/// `ShellExecute` the "open" verb on `file` (a path, program name or URI such
/// as `ms-settings:privacy-microphone`).  Fire-and-forget; returns whether
/// the shell accepted the launch.
pub fn shell_open(file: &str, parameters: Option<&str>) -> bool {
    let verb = wide("open");
    let file_w = wide(file);
    let params_w = parameters.map(wide);
    let params_ptr = params_w
        .as_ref()
        .map_or(PCWSTR::null(), |w| PCWSTR(w.as_ptr()));

    // SAFETY: all strings are null-terminated UTF-16 buffers that outlive the
    // call; no owner window.
    let instance = unsafe {
        ShellExecuteW(
            None,
            PCWSTR(verb.as_ptr()),
            PCWSTR(file_w.as_ptr()),
            params_ptr,
            PCWSTR::null(),
            SW_SHOWNORMAL,
        )
    };
    // Values <= 32 are error codes by ShellExecute contract.
    instance.0 as isize > 32
}

/// Tell the shell that file-type/protocol associations changed, flushing its
/// icon cache.  Global form; no item pointers.
pub fn notify_assoc_changed() {
    // SAFETY: SHCNF_IDLIST with null items is the documented "everything
    // changed" broadcast; no pointers are read.
    unsafe { SHChangeNotify(SHCNE_ASSOCCHANGED, SHCNF_IDLIST, None, None) };
}

// ── Process diagnostics ───────────────────────────────────────────────────────

/// Memory counters of the current process, for crash-report output.
pub fn memory_counters() -> Result<MemoryCounters> {
    let mut counters = PROCESS_MEMORY_COUNTERS {
        cb: std::mem::size_of::<PROCESS_MEMORY_COUNTERS>() as u32,
        ..Default::default()
    };
    // SAFETY: GetCurrentProcess returns the pseudo handle, which needs no
    // closing; counters is a properly sized out-structure with cb set.
    unsafe { GetProcessMemoryInfo(GetCurrentProcess(), &mut counters, counters.cb)? };
    Ok(MemoryCounters {
        working_set: counters.WorkingSetSize as u64,
        peak_working_set: counters.PeakWorkingSetSize as u64,
        pagefile: counters.PagefileUsage as u64,
        peak_pagefile: counters.PeakPagefileUsage as u64,
    })
}

/// Time since the last user input (keyboard or mouse), session-wide.
/// `None` when the query fails.
pub fn last_input_idle() -> Option<Duration> {
    let mut info = LASTINPUTINFO {
        cbSize: std::mem::size_of::<LASTINPUTINFO>() as u32,
        dwTime: 0,
    };
    // SAFETY: cbSize is set as required; the pointer is valid for the call.
    if !unsafe { GetLastInputInfo(&mut info) }.as_bool() {
        return None;
    }
    // SAFETY: GetTickCount has no preconditions.
    let now = unsafe { GetTickCount() };
    // Tick count wraps every 49.7 days; wrapping_sub stays correct across it.
    Some(Duration::from_millis(u64::from(now.wrapping_sub(info.dwTime))))
}
