//! Pipeline warnings with colored terminal output.
//!
//! [§7 Error handling design] "Resource errors: ...the parser/layout logs
//! and proceeds with the resource absent." and "Script errors: the host
//! reports an exception; the script is abandoned, logged, and following
//! scripts continue."
//!
//! This is the engine's logging surface. Warnings are deduplicated so a
//! repeated failure (the same missing stylesheet fetched from many pages of
//! a batch run, say) does not spam the terminal.

use std::collections::HashSet;
use std::sync::Mutex;

use owo_colors::OwoColorize;

static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// Warn about a recoverable failure, printing at most once per unique
/// `(component, message)` pair.
///
/// # Panics
///
/// Panics if the global warning set mutex is poisoned.
pub fn warn_once(component: &str, message: &str) {
    let key = format!("[{component}] {message}");
    let should_print = WARNED
        .lock()
        .unwrap()
        .get_or_insert_with(HashSet::new)
        .insert(key);

    if should_print {
        eprintln!("{} {component} {message}", "warning:".yellow().bold());
    }
}

/// Clear all recorded warnings, call when starting a fresh pipeline run so
/// the next document's warnings are not suppressed by the previous one's.
///
/// # Panics
///
/// Panics if the global warning set mutex is poisoned.
pub fn clear_warnings() {
    let mut guard = WARNED.lock().unwrap();
    if let Some(set) = guard.as_mut() {
        set.clear();
    }
}
