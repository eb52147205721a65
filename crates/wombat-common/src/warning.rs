//! Engine warnings with colored terminal output.
//!
//! Provides deduplication to avoid spamming the same warning multiple times.
//! Used by the CSS parser and cascade to report dropped rules, declarations,
//! and unsupported features — permissive parsing means these are never errors,
//! but they should still be visible once.

use std::collections::BTreeSet;
use std::sync::Mutex;

/// ANSI color codes for terminal output
const YELLOW: &str = "\x1b[33m";
const RESET: &str = "\x1b[0m";

/// Global set of warnings we've already printed (to deduplicate)
static WARNED: Mutex<BTreeSet<String>> = Mutex::new(BTreeSet::new());

/// Warn about a dropped or unsupported construct (prints once per unique message)
///
/// # Example
/// ```ignore
/// warn_once("CSS", "dropped declaration with unknown property 'colr'");
/// ```
///
/// # Panics
/// Panics if the global warning set mutex is poisoned.
pub fn warn_once(component: &str, message: &str) {
    let key = format!("[{component}] {message}");
    let should_print = WARNED.lock().unwrap().insert(key);

    if should_print {
        eprintln!("{YELLOW}[Wombat {component}] ⚠ {message}{RESET}");
    }
}

/// Clear all recorded warnings (call when resolving a fresh document)
///
/// # Panics
/// Panics if the global warning set mutex is poisoned.
pub fn clear_warnings() {
    WARNED.lock().unwrap().clear();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_warnings_are_suppressed_until_cleared() {
        let key = "[test] duplicate suppression".to_string();
        assert!(WARNED.lock().unwrap().insert(key.clone()));
        // A second insert of the same key reports already-seen.
        assert!(!WARNED.lock().unwrap().insert(key.clone()));
        clear_warnings();
        assert!(WARNED.lock().unwrap().insert(key));
    }
}
