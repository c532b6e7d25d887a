//! Opt-in parser tracing
//!
//! Tracing goes to stderr and is off unless `FLUX_DEBUG` is set to a value
//! other than `0`, `false` or the empty string, or [`enable_debug`] is called
//! (the driver's `--debug` flag).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Once;

static DEBUG_ENABLED: AtomicBool = AtomicBool::new(false);

// The environment is consulted once per process
static INIT: Once = Once::new();

fn requests_tracing(value: &str) -> bool {
    !matches!(value.trim().to_ascii_lowercase().as_str(), "" | "0" | "false")
}

fn init_from_env() {
    INIT.call_once(|| {
        if let Ok(value) = std::env::var("FLUX_DEBUG") {
            if requests_tracing(&value) {
                DEBUG_ENABLED.store(true, Ordering::Relaxed);
            }
        }
    });
}

/// Turn tracing on for the rest of the process
pub fn enable_debug() {
    DEBUG_ENABLED.store(true, Ordering::Relaxed);
}

pub fn is_debug_enabled() -> bool {
    init_from_env();
    DEBUG_ENABLED.load(Ordering::Relaxed)
}

/// `eprintln!` that only fires while tracing is enabled
#[macro_export]
macro_rules! debug_println {
    ($($arg:tt)*) => {
        if $crate::debug::is_debug_enabled() {
            eprintln!($($arg)*);
        }
    };
}

#[cfg(test)]
mod tests {
    use super::requests_tracing;

    #[test]
    fn test_env_values() {
        assert!(requests_tracing("1"));
        assert!(requests_tracing("parser"));
        assert!(!requests_tracing("0"));
        assert!(!requests_tracing(" FALSE "));
        assert!(!requests_tracing(""));
    }
}
