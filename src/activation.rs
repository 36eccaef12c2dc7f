// ── Window title matching ─────────────────────────────────────────────────────
//
// Bringing a running instance to the foreground enumerates top-level windows
// and picks ours by title.  The title is either the bare app name or the app
// name followed by an unread-count suffix like " (3)".  The matcher is pure
// so it can be tested without windows to enumerate; the enumeration itself
// lives in `win32::window`.

/// `true` when `title` is `app_name`, optionally followed by whitespace and a
/// parenthesised decimal count.
pub fn is_app_window_title(title: &str, app_name: &str) -> bool {
    let Some(rest) = title.strip_prefix(app_name) else {
        return false;
    };
    if rest.is_empty() {
        return true;
    }
    let rest = rest.trim_start();
    let Some(digits) = rest.strip_prefix('(').and_then(|r| r.strip_suffix(')')) else {
        return false;
    };
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
