/*!
Shutdown: SIGHUP/SIGINT/SIGTERM all do the same thing (spec.md §4.8, §6).
*/
use std::fs::OpenOptions;
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::DaemonError;
use crate::timers::now_ms;

/// Install one handler for all three signals. The handler only flips a
/// flag; the event loop does the actual shutdown I/O on the main thread
/// once it observes the flag (spec.md §5: no file I/O inside the signal
/// callback).
pub fn install() -> Result<Arc<AtomicBool>, DaemonError> {
    let shutdown = Arc::new(AtomicBool::new(false));
    let flag = shutdown.clone();
    ctrlc::set_handler(move || {
        flag.store(true, Ordering::SeqCst);
    })
    .map_err(|e| DaemonError::Config(format!("failed to install signal handler: {}", e)))?;
    Ok(shutdown)
}

/// Append the shutdown marker the emulator waits on.
pub fn write_node_down_log() -> Result<(), DaemonError> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open("node_down.log")?;
    writeln!(file, "{}", now_ms())?;
    Ok(())
}
