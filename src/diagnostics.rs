// ── Crash-report diagnostics ──────────────────────────────────────────────────
//
// Two fixed lines appended to crash dumps.  The format is parsed by the
// report collector, so it stays byte-stable; values are whole mebibytes,
// truncated.

use std::fmt;

/// Process memory counters, in bytes.  Filled from
/// `win32::system::memory_counters` in production.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoryCounters {
    pub working_set: u64,
    pub peak_working_set: u64,
    pub pagefile: u64,
    pub peak_pagefile: u64,
}

const MEBIBYTE: u64 = 1024 * 1024;

/// Write the memory-usage section of a crash report.
pub fn write_memory_report(out: &mut impl fmt::Write, counters: &MemoryCounters) -> fmt::Result {
    writeln!(
        out,
        "Memory-usage: {} MB (peak), {} MB (current)",
        counters.peak_working_set / MEBIBYTE,
        counters.working_set / MEBIBYTE,
    )?;
    writeln!(
        out,
        "Pagefile-usage: {} MB (peak), {} MB (current)",
        counters.peak_pagefile / MEBIBYTE,
        counters.pagefile / MEBIBYTE,
    )
}

// ── Tests ─────────────────────────────────────────────────────────────────────
