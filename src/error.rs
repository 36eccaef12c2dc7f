// ── Error type ────────────────────────────────────────────────────────────────
//
// Shell integration fails in two ways: an OS call reports a status code, or
// a shortcut file operation goes wrong.  Neither is fatal to the embedding
// application; callers log the failure and abandon the current operation.
// Every install step is idempotent, so abandoning and re-running later is
// always safe.

/// Failure of a single shell-integration step.
#[derive(Debug)]
pub enum PlatformError {
    /// A registry, shell or COM call reported a failure status.
    Win32 {
        /// API that reported the failure.
        function: &'static str,
        /// The status as reported: `LSTATUS` for the registry functions, an
        /// HRESULT for COM (wrapped Win32 codes appear as `0x8007xxxx`).
        code: u32,
    },

    /// Filesystem failure while managing a shortcut file.
    Io(std::io::Error),
}

impl std::fmt::Display for PlatformError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Win32 { function, code } => write!(f, "{function} returned {code:#010x}"),
            Self::Io(e) => write!(f, "file operation failed: {e}"),
        }
    }
}

impl std::error::Error for PlatformError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Win32 { .. } => None,
        }
    }
}

impl From<std::io::Error> for PlatformError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

// The COM link writer and the known-folder query speak
// `windows::core::Result`; fold those HRESULTs into the Win32 shape so `?`
// works across the whole `win32` module.
#[cfg(windows)]
impl From<windows::core::Error> for PlatformError {
    fn from(e: windows::core::Error) -> Self {
        Self::Win32 {
            function: "windows",
            code: e.code().0 as u32,
        }
    }
}

/// Alias used by every fallible operation in this crate.
pub type Result<T> = std::result::Result<T, PlatformError>;

// ── Tests ─────────────────────────────────────────────────────────────────────
