//! Timer and buffer constants (spec.md §4.3, §4.4, §5).

pub const HELLO_TIMER_MS: u64 = 500;
pub const DEAD_TIMER_MS: u64 = 1500;
pub const STARTUP_SETTLE_MS: u64 = 3_000;
pub const RECOVERY_THRESHOLD: u8 = 3;

/// Octet index (0-based) a leaf's root VID is derived from: the *third*
/// octet of its compute-subnet IPv4 address (spec.md §4.1).
pub const VID_OCTET: usize = 2;

/// Recommended receive buffer size (spec.md §5).
pub const MAX_BUFFER_SIZE: usize = 9000;

pub fn now_ms() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before unix epoch")
        .as_millis() as u64
}
