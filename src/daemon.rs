/*!
Per-daemon state (spec.md §9 Design Notes: one value threaded through every
handler, no process-wide singletons beyond the log file handle).
*/
use crate::config::ConfigFile;
use crate::error::DaemonError;
use crate::mtp::{encode_frame, MtpMessage, Vid};
use crate::ports::{ComputePort, ControlPort, PortHandle, PortTable};
use crate::vidtable::{AcceptedVidTable, OfferedVidTable};

/// Where a frame for a port ends up: real sockets in production, an
/// in-memory log in tests (spec.md's ambient test-tooling expansion).
pub trait FrameSink {
    fn send_control(&mut self, port: PortHandle, frame: &[u8]) -> Result<(), DaemonError>;
    fn send_compute(&mut self, frame: &[u8]) -> Result<(), DaemonError>;
}

/// A `FrameSink` that only records what would have been sent; used by the
/// protocol-level unit and integration tests, which never touch a real
/// socket (SPEC_FULL.md's ambient test-tooling section).
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub control_sent: Vec<(PortHandle, Vec<u8>)>,
    pub compute_sent: Vec<Vec<u8>>,
}

impl FrameSink for RecordingSink {
    fn send_control(&mut self, port: PortHandle, frame: &[u8]) -> Result<(), DaemonError> {
        self.control_sent.push((port, frame.to_vec()));
        Ok(())
    }

    fn send_compute(&mut self, frame: &[u8]) -> Result<(), DaemonError> {
        self.compute_sent.push(frame.to_vec());
        Ok(())
    }
}

pub struct Daemon {
    pub node_name: String,
    pub tier: u32,
    pub is_top_spine: bool,
    pub my_vid: Option<Vid>,
    pub ports: PortTable,
    pub accepted: AcceptedVidTable,
    pub offered: OfferedVidTable,
    pub compute: Option<ComputePort>,
    pub start_time: u64,
    pub bootstrap_sent: bool,
}

impl Daemon {
    pub fn new(node_name: String, cfg: &ConfigFile, start_time: u64) -> Self {
        Daemon {
            node_name,
            tier: cfg.tier,
            is_top_spine: cfg.is_top_spine,
            my_vid: None,
            ports: PortTable::new(),
            accepted: AcceptedVidTable::new(),
            offered: OfferedVidTable::new(),
            compute: None,
            start_time,
            bootstrap_sent: false,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.tier == 1
    }

    pub fn add_control_port(&mut self, port: ControlPort) -> PortHandle {
        self.ports.push(port)
    }

    /// Whether `port` has resolved to the accepted (downstream) side.
    pub fn is_accepted_port(&self, port: PortHandle) -> bool {
        self.accepted.find(port).is_some()
    }

    /// Whether `port` has resolved to the offered (upstream) side.
    pub fn is_offered_port(&self, port: PortHandle) -> bool {
        self.offered.find(port).is_some()
    }

    /// True once every offered port is down (spec.md §4.5's isolated-subtree
    /// trigger). Vacuously true if there are no offered ports at all (a leaf,
    /// or a top spine, neither of which push VIDs upward).
    pub fn all_offered_ports_down(&self) -> bool {
        self.offered
            .iter()
            .all(|entry| !self.ports.get(entry.port).is_up)
    }

    pub fn up_control_ports(&self) -> Vec<PortHandle> {
        self.ports
            .iter()
            .filter(|(_, p)| p.is_up)
            .map(|(h, _)| h)
            .collect()
    }

    pub fn up_offered_ports(&self) -> Vec<PortHandle> {
        self.offered
            .iter()
            .map(|e| e.port)
            .filter(|h| self.ports.get(*h).is_up)
            .collect()
    }

    pub fn up_accepted_ports(&self) -> Vec<PortHandle> {
        self.accepted
            .iter()
            .map(|e| e.port)
            .filter(|h| self.ports.get(*h).is_up)
            .collect()
    }

    /// Every up control port except `excluded`.
    pub fn up_ports_except(&self, excluded: PortHandle) -> Vec<PortHandle> {
        self.up_control_ports()
            .into_iter()
            .filter(|h| *h != excluded)
            .collect()
    }

    /// Encode `msg` behind `port`'s prebuilt Ethernet header and hand it to `sink`.
    pub fn send_message(
        &self,
        sink: &mut impl FrameSink,
        port: PortHandle,
        msg: &MtpMessage,
    ) -> Result<(), DaemonError> {
        let ether = self.ports.get(port).ether_header.clone();
        let bytes = encode_frame(&ether, msg)?;
        sink.send_control(port, &bytes)
    }

    pub fn send_to_many(
        &self,
        sink: &mut impl FrameSink,
        ports: &[PortHandle],
        msg: &MtpMessage,
    ) -> Result<(), DaemonError> {
        for port in ports {
            self.send_message(sink, *port, msg)?;
        }
        Ok(())
    }

    /// P5: a started port resolves to exactly one of {accepted, offered}.
    /// Checked defensively by the event loop and exhaustively by tests.
    #[cfg(debug_assertions)]
    pub fn debug_assert_invariants(&self) {
        self.offered.debug_assert_invariants();
        for (handle, port) in self.ports.iter() {
            if port.start {
                debug_assert_ne!(
                    self.is_accepted_port(handle),
                    self.is_offered_port(handle),
                    "port {:?} ({}) is in both or neither of accepted/offered",
                    handle,
                    port.name
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::{Ether, EtherType, MacAddress};

    fn cfg(tier: u32, is_top_spine: bool) -> ConfigFile {
        ConfigFile { is_top_spine, tier }
    }

    fn dummy_port(name: &str) -> ControlPort {
        ControlPort::new(
            name.to_string(),
            Ether::broadcast_header(MacAddress([0; 6]), EtherType::Mtp),
        )
    }

    #[test]
    fn test_is_leaf_from_tier() {
        let d = Daemon::new("l1".to_string(), &cfg(1, false), 0);
        assert!(d.is_leaf());
        let d = Daemon::new("t1".to_string(), &cfg(2, false), 0);
        assert!(!d.is_leaf());
    }

    #[test]
    fn test_all_offered_ports_down_vacuously_true_with_no_offered_entries() {
        let d = Daemon::new("s1".to_string(), &cfg(3, true), 0);
        assert!(d.all_offered_ports_down());
    }

    #[test]
    fn test_all_offered_ports_down_false_when_one_is_up() {
        let mut d = Daemon::new("t1".to_string(), &cfg(2, false), 0);
        let h = d.add_control_port(dummy_port("t1eth0"));
        d.ports.get_mut(h).is_up = true;
        d.offered.entry(h);
        assert!(!d.all_offered_ports_down());
    }

    #[test]
    fn test_debug_assert_invariants_p5_passes_with_exclusive_membership() {
        let mut d = Daemon::new("t1".to_string(), &cfg(2, false), 0);
        let h = d.add_control_port(dummy_port("t1eth0"));
        d.ports.get_mut(h).start = true;
        d.accepted.entry(h);
        d.debug_assert_invariants();
    }

    #[test]
    #[should_panic]
    fn test_debug_assert_invariants_p5_catches_a_started_port_in_neither_table() {
        let mut d = Daemon::new("t1".to_string(), &cfg(2, false), 0);
        let h = d.add_control_port(dummy_port("t1eth0"));
        d.ports.get_mut(h).start = true;
        d.debug_assert_invariants();
    }
}
