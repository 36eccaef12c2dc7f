// ── Monitor geometry cache ────────────────────────────────────────────────────
//
// The work-area rectangle of the monitor hosting the main window is queried
// on every frame by layout code, but the underlying OS call is not free.
// Cache it for a second; monitor topology changes settle well within that.

use std::time::{Duration, Instant};

/// A screen rectangle in virtual-desktop coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// Time-based cache for the desktop work-area rectangle.
///
/// Callers inject `now` and the refresh closure, so the cache itself has no
/// clock or OS dependency.  Single-threaded by design, like the rest of the
/// crate surface.
#[derive(Debug)]
pub struct DesktopRectCache {
    value: Rect,
    last_refresh: Option<Instant>,
    ttl: Duration,
}

impl Default for DesktopRectCache {
    fn default() -> Self {
        Self::new(Duration::from_millis(1000))
    }
}

impl DesktopRectCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            value: Rect::default(),
            last_refresh: None,
            ttl,
        }
    }

    /// Current work-area rectangle, refreshing via `refresh` when the cached
    /// value is older than the TTL (or was never filled).
    ///
    /// The refresh timestamp is taken even when `refresh` fails, so a broken
    /// query is retried once per TTL instead of on every call.  A failed
    /// refresh keeps the previous value.
    pub fn get(&mut self, now: Instant, refresh: impl FnOnce() -> Option<Rect>) -> Rect {
        let fresh = self
            .last_refresh
            .is_some_and(|at| now.duration_since(at) < self.ttl);
        if !fresh {
            self.last_refresh = Some(now);
            if let Some(rect) = refresh() {
                self.value = rect;
            }
        }
        self.value
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
