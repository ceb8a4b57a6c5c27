/*!
Data-plane forwarding: leaf IPv4 encap, spine VID-matched or hash-multipath
forward, leaf MTP decap (spec.md §4.6).
*/
use std::net::Ipv4Addr;

use deku::prelude::*;

use crate::daemon::{Daemon, FrameSink};
use crate::error::DaemonError;
use crate::layer::Ipv4;
use crate::mtp::{MtpError, MtpMessage, Vid};
use crate::ports::PortHandle;
use crate::timers::VID_OCTET;

/// Jenkins' one-at-a-time hash, used to pick among several equally valid
/// uplinks (spec.md §4.6, §8 scenario 6).
pub fn jenkins_one_at_a_time(data: &[u8]) -> u32 {
    let mut hash: u32 = 0;
    for &b in data {
        hash = hash.wrapping_add(u32::from(b));
        hash = hash.wrapping_add(hash << 10);
        hash ^= hash >> 6;
    }
    hash = hash.wrapping_add(hash << 3);
    hash ^= hash >> 11;
    hash = hash.wrapping_add(hash << 15);
    hash
}

fn multipath_key(src: Ipv4Addr, dst: Ipv4Addr) -> [u8; 4] {
    let s = src.octets();
    let d = dst.octets();
    [s[2], s[3], d[2], d[3]]
}

/// Offered ports that are up and not explicitly reported unreachable for a
/// VID rooted at leaf `dest_vid`; candidates for hash multipath selection.
/// Unreachable entries carry extended path VIDs, so matching is by root
/// segment rather than full-string equality (spec.md §4.6).
fn available_offered_ports(daemon: &Daemon, dest_vid: u16) -> Vec<PortHandle> {
    daemon
        .offered
        .iter()
        .filter(|e| {
            daemon.ports.get(e.port).is_up && !e.unreachable.iter().any(|v| v.root_matches(dest_vid))
        })
        .map(|e| e.port)
        .collect()
}

fn pick_multipath(available: &[PortHandle], key: [u8; 4]) -> Option<PortHandle> {
    if available.is_empty() {
        return None;
    }
    let hash = jenkins_one_at_a_time(&key);
    Some(available[hash as usize % available.len()])
}

/// IPv4 received on the compute socket of a leaf: encapsulate into a
/// DATA_MSG and hash-forward it across an available uplink.
pub fn leaf_ingress(
    daemon: &mut Daemon,
    sink: &mut impl FrameSink,
    src: Ipv4Addr,
    dst: Ipv4Addr,
    payload: &[u8],
    now: u64,
) -> Result<(), DaemonError> {
    let src_vid = u16::from(src.octets()[VID_OCTET]);
    let dest_vid_num = u16::from(dst.octets()[VID_OCTET]);

    let available = available_offered_ports(daemon, dest_vid_num);
    let chosen = match pick_multipath(&available, multipath_key(src, dst)) {
        Some(p) => p,
        None => {
            tracing::debug!(dest_vid = dest_vid_num, "unroutable: no available offered port");
            return Ok(());
        }
    };

    daemon.ports.get_mut(chosen).last_sent_time = now;
    let msg = MtpMessage::DataMsg {
        src_vid,
        dest_vid: dest_vid_num,
        payload: payload.to_vec(),
    };
    daemon.send_message(sink, chosen, &msg)
}

/// DATA_MSG received on a control port of a (possibly mid-tier) spine.
pub fn spine_forward(
    daemon: &mut Daemon,
    sink: &mut impl FrameSink,
    src_vid: u16,
    dest_vid: u16,
    payload: &[u8],
) -> Result<(), DaemonError> {
    let up: std::collections::HashSet<PortHandle> = daemon
        .ports
        .handles()
        .filter(|h| daemon.ports.get(*h).is_up)
        .collect();
    let accepted_port = daemon.accepted.reachable_port_for(dest_vid, |p| up.contains(&p));

    let msg = MtpMessage::DataMsg {
        src_vid,
        dest_vid,
        payload: payload.to_vec(),
    };

    if let Some(port) = accepted_port {
        return daemon.send_message(sink, port, &msg);
    }

    let available = available_offered_ports(daemon, dest_vid);
    let (_rest, ipv4) = match Ipv4::from_bytes((payload, 0)) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::debug!(error = %e, "malformed frame: DATA_MSG payload has no IPv4 header");
            return Ok(());
        }
    };
    let key = multipath_key(ipv4.src_addr(), ipv4.dst_addr());

    match pick_multipath(&available, key) {
        Some(port) => daemon.send_message(sink, port, &msg),
        None => {
            tracing::debug!(dest_vid, "unroutable: no accepted match and no available offered port");
            Ok(())
        }
    }
}

/// DATA_MSG arrives at its destination leaf: rebuild an Ethernet frame
/// around the (already MTP-header-stripped) IPv4 payload and hand it to
/// the compute interface.
pub fn leaf_egress(daemon: &Daemon, sink: &mut impl FrameSink, payload: &[u8]) -> Result<(), DaemonError> {
    let compute = daemon
        .compute
        .as_ref()
        .ok_or_else(|| DaemonError::Config("DATA_MSG delivered to a node with no compute port".to_string()))?;

    let mut bytes = compute.ether_header.to_bytes().map_err(MtpError::from)?;
    bytes.extend_from_slice(payload);
    sink.send_compute(&bytes)
}
