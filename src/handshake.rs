/*!
VID propagation: the four-way Hello-NR / Join-Req / Join-Res / Join-Ack
handshake and the Start-Hello that follows it (spec.md §4.3).
*/
use crate::daemon::{Daemon, FrameSink};
use crate::error::DaemonError;
use crate::mtp::{MtpMessage, Vid, VidList};
use crate::ports::PortHandle;
use crate::timers::STARTUP_SETTLE_MS;

fn broadcast_hello_nr(
    daemon: &Daemon,
    sink: &mut impl FrameSink,
    tier: u8,
    vids: &[Vid],
) -> Result<(), DaemonError> {
    let msg = MtpMessage::HelloNr {
        tier,
        vids: VidList::from_vids(vids),
    };
    let all: Vec<PortHandle> = daemon.ports.handles().collect();
    daemon.send_to_many(sink, &all, &msg)
}

/// Step 1: after the 3s startup settle, a leaf broadcasts Hello-NR on every
/// control port. Idempotent: fires at most once per process.
pub fn start_bootstrap(
    daemon: &mut Daemon,
    sink: &mut impl FrameSink,
    now: u64,
) -> Result<(), DaemonError> {
    if daemon.bootstrap_sent || !daemon.is_leaf() {
        return Ok(());
    }
    if now.saturating_sub(daemon.start_time) < STARTUP_SETTLE_MS {
        return Ok(());
    }

    let my_vid = match &daemon.my_vid {
        Some(v) => v.clone(),
        None => return Ok(()),
    };

    broadcast_hello_nr(daemon, sink, 1, &[my_vid])?;
    daemon.bootstrap_sent = true;
    Ok(())
}

/// Step 2: a higher-tier node receiving Hello-NR from below replies Join-Req.
pub fn handle_hello_nr(
    daemon: &mut Daemon,
    sink: &mut impl FrameSink,
    ingress: PortHandle,
    sender_tier: u8,
    vids: &VidList,
) -> Result<(), DaemonError> {
    if sender_tier as u32 >= daemon.tier {
        tracing::debug!(
            port = daemon.ports.get(ingress).name.as_str(),
            "dropping Hello-NR from a peer at or above our tier"
        );
        return Ok(());
    }

    let msg = MtpMessage::JoinReq { vids: vids.clone() };
    daemon.send_message(sink, ingress, &msg)
}

/// Step 3: the originator extends every VID by the ingress port's suffix
/// and replies Join-Res.
pub fn handle_join_req(
    daemon: &mut Daemon,
    sink: &mut impl FrameSink,
    ingress: PortHandle,
    vids: &VidList,
) -> Result<(), DaemonError> {
    let suffix = match daemon.ports.get(ingress).numeric_suffix() {
        Some(s) => s,
        None => {
            tracing::debug!(
                port = daemon.ports.get(ingress).name.as_str(),
                "malformed frame: control port name carries no numeric suffix"
            );
            return Ok(());
        }
    };

    let parsed = vids.to_vids()?;
    let extended: Vec<Vid> = parsed.iter().map(|v| v.extend(suffix)).collect();

    let msg = MtpMessage::JoinRes {
        vids: VidList::from_vids(&extended),
    };
    daemon.send_message(sink, ingress, &msg)
}

/// Step 4: the receiver installs the extended VIDs as accepted, propagates
/// Hello-NR further upward unless it's the top spine, then acknowledges.
pub fn handle_join_res(
    daemon: &mut Daemon,
    sink: &mut impl FrameSink,
    ingress: PortHandle,
    vids: &VidList,
) -> Result<(), DaemonError> {
    let parsed = vids.to_vids()?;

    {
        let entry = daemon.accepted.entry(ingress);
        for vid in &parsed {
            entry.vids.insert(vid.clone());
        }
    }

    if !daemon.is_top_spine {
        broadcast_hello_nr(daemon, sink, daemon.tier as u8, &parsed)?;
    }

    let msg = MtpMessage::JoinAck { vids: vids.clone() };
    daemon.send_message(sink, ingress, &msg)
}

/// Step 5: the originator installs the acknowledged VIDs as offered, brings
/// the port up, and starts its keep-alive session.
pub fn handle_join_ack(
    daemon: &mut Daemon,
    sink: &mut impl FrameSink,
    ingress: PortHandle,
    vids: &VidList,
) -> Result<(), DaemonError> {
    let parsed = vids.to_vids()?;

    {
        let entry = daemon.offered.entry(ingress);
        for vid in &parsed {
            entry.vids.insert(vid.clone());
        }
    }

    {
        let port = daemon.ports.get_mut(ingress);
        port.is_up = true;
        port.start = true;
    }

    daemon.send_message(sink, ingress, &MtpMessage::StartHello)
}

/// Step 6: the peer that sent Join-Ack also brings its side of the session up.
pub fn handle_start_hello(daemon: &mut Daemon, ingress: PortHandle) {
    let port = daemon.ports.get_mut(ingress);
    port.is_up = true;
    port.start = true;
}
