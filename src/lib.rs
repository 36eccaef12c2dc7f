// ── tgwin — Windows platform integration ──────────────────────────────────────
//
// Registry-based shell integration (tg: URI scheme, Send-To and autostart
// shortcuts), capability/permission queries, legacy-installation cleanup,
// window activation and monitor-geometry helpers for a Telegram-compatible
// desktop messaging client.
//
// All operations are synchronous, blocking and single-threaded; nothing here
// is safe to call concurrently with itself.  The two settings-panel launchers
// accept a `UiDispatcher` so a background thread can defer the shell call onto
// the UI thread — everything else assumes it already runs on a suitable thread.
//
// ── Safety policy ─────────────────────────────────────────────────────────────
// Unsafe code is forbidden everywhere except `win32` (Win32 / COM FFI).
// Each unsafe block in that module MUST carry a `// SAFETY:` comment.
#![deny(unsafe_code)]

pub mod activation;
pub mod cleanup;
pub mod diagnostics;
pub mod error;
pub mod identity;
pub mod lifecycle;
pub mod monitor;
pub mod paths;
pub mod permissions;
pub mod registry;
pub mod scheme;
pub mod shortcuts;

#[cfg(windows)]
pub mod win32;

pub use error::{PlatformError, Result};
pub use identity::AppIdentity;
