/*!
Keep-alive emission and failure detection (spec.md §4.4, §4.7).
*/
use std::collections::HashSet;

use crate::daemon::{Daemon, FrameSink};
use crate::datalink::pnet::list_interfaces;
use crate::error::DaemonError;
use crate::flood;
use crate::mtp::MtpMessage;
use crate::ports::{FailType, PortHandle};
use crate::timers::{DEAD_TIMER_MS, HELLO_TIMER_MS, RECOVERY_THRESHOLD};

/// Interfaces currently visible to the kernel whose name starts with
/// `node_name` (spec.md §4.4's "immediate detect" re-probe).
fn live_interface_names(node_name: &str) -> HashSet<String> {
    list_interfaces()
        .into_iter()
        .filter(|iface| iface.is_up() && iface.name.starts_with(node_name))
        .map(|iface| iface.name)
        .collect()
}

fn mark_down(daemon: &mut Daemon, port: PortHandle, fail_type: FailType) {
    let p = daemon.ports.get_mut(port);
    p.is_up = false;
    p.fail_type = fail_type;
    p.continue_count = 0;
}

/// One pass over every control port with `start == true`: emit due
/// keep-alives, then run miss- and presence-based failure detection.
pub fn tick(daemon: &mut Daemon, sink: &mut impl FrameSink, now: u64) -> Result<(), DaemonError> {
    let present = live_interface_names(&daemon.node_name);

    for port in daemon.ports.handles().collect::<Vec<_>>() {
        tick_port(daemon, sink, port, now, &present)?;
    }
    Ok(())
}

fn tick_port(
    daemon: &mut Daemon,
    sink: &mut impl FrameSink,
    port: PortHandle,
    now: u64,
    present: &HashSet<String>,
) -> Result<(), DaemonError> {
    if !daemon.ports.get(port).start {
        return Ok(());
    }

    if now.saturating_sub(daemon.ports.get(port).last_sent_time) >= HELLO_TIMER_MS {
        daemon.send_message(sink, port, &MtpMessage::KeepAlive)?;
        daemon.ports.get_mut(port).last_sent_time = now;
    }

    let is_present = present.contains(&daemon.ports.get(port).name);
    let is_up = daemon.ports.get(port).is_up;
    let fail_type = daemon.ports.get(port).fail_type;

    if is_up && !is_present {
        mark_down(daemon, port, FailType::DetectFail);
        flood::run_failure(daemon, sink, port)?;
        return Ok(());
    }
    if !is_up && fail_type == FailType::DetectFail && is_present {
        daemon.ports.get_mut(port).fail_type = FailType::None;
    }

    let is_up = daemon.ports.get(port).is_up;
    let last_received_time = daemon.ports.get(port).last_received_time;
    if is_up && last_received_time > 0 && now.saturating_sub(last_received_time) >= DEAD_TIMER_MS {
        mark_down(daemon, port, FailType::MissFail);
        flood::run_failure(daemon, sink, port)?;
    }

    Ok(())
}

/// KEEP_ALIVE received on `port`. Always refreshes `last_received_time`;
/// while down (and not ignoring due to `DetectFail`), three consecutive
/// on-time receptions bring the port back up (spec.md §4.4).
pub fn handle_keep_alive(
    daemon: &mut Daemon,
    sink: &mut impl FrameSink,
    port: PortHandle,
    now: u64,
) -> Result<(), DaemonError> {
    let prev_received = daemon.ports.get(port).last_received_time;
    daemon.ports.get_mut(port).last_received_time = now;

    if daemon.ports.get(port).is_up {
        return Ok(());
    }
    if daemon.ports.get(port).fail_type == FailType::DetectFail {
        return Ok(());
    }

    if prev_received > 0 && now.saturating_sub(prev_received) < DEAD_TIMER_MS {
        let count = daemon.ports.get(port).continue_count.saturating_add(1);
        daemon.ports.get_mut(port).continue_count = count;
        if count >= RECOVERY_THRESHOLD {
            let was_isolated = daemon.all_offered_ports_down();
            let p = daemon.ports.get_mut(port);
            p.is_up = true;
            p.fail_type = FailType::None;
            flood::run_recover(daemon, sink, port, was_isolated)?;
        }
    } else {
        daemon.ports.get_mut(port).continue_count = 0;
    }

    Ok(())
}
