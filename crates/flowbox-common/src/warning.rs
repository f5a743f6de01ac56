//! Layout warnings routed through the `log` facade.
//!
//! Provides deduplication to avoid spamming the same warning multiple times.
//! Used by the layout engine to report unsupported features and overflow
//! that it resolves by a fallback rather than an error.

use std::collections::HashSet;
use std::sync::Mutex;

/// Global set of warnings we've already emitted (to deduplicate)
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// Warn about degraded behavior (emitted once per unique message)
///
/// The warning goes to `log::warn!` under the `flowbox` target, prefixed
/// with the reporting component.
///
/// # Example
/// ```ignore
/// warn_once("float", "float is wider than its containing block");
/// ```
pub fn warn_once(component: &str, message: &str) {
    let key = format!("[{component}] {message}");
    // A poisoned set only loses deduplication, the warning is still emitted.
    let should_emit = WARNED.lock().map_or(true, |mut guard| {
        guard.get_or_insert_with(HashSet::new).insert(key)
    });

    if should_emit {
        log::warn!(target: "flowbox", "[{component}] {message}");
    }
}

/// Returns true if `warn_once` already emitted this exact message.
#[must_use]
pub fn was_warned(component: &str, message: &str) -> bool {
    let key = format!("[{component}] {message}");
    WARNED
        .lock()
        .is_ok_and(|guard| guard.as_ref().is_some_and(|set| set.contains(&key)))
}

/// Clear all recorded warnings (call before an unrelated layout pass)
pub fn clear_warnings() {
    if let Ok(mut guard) = WARNED.lock()
        && let Some(set) = guard.as_mut()
    {
        set.clear();
    }
}
