/*!
Bootstrap & interface classification (spec.md §4.1).
*/
use pnet::datalink::NetworkInterface;
use pnet::ipnetwork::IpNetwork;
use std::fs::{File, OpenOptions};
use std::net::Ipv4Addr;
use std::path::Path;

use crate::datalink::pnet::{list_interfaces, mac_of};
use crate::error::DaemonError;
use crate::layer::{Ether, EtherType};
use crate::mtp::Vid;
use crate::ports::{ComputePort, ControlPort};
use crate::timers::VID_OCTET;

/// Parsed `<node_name>.conf` (spec.md §4.1, §6): line-oriented `key:value`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    pub is_top_spine: bool,
    pub tier: u32,
}

impl ConfigFile {
    pub fn parse(contents: &str) -> Result<Self, DaemonError> {
        let mut is_top_spine = false;
        let mut tier = None;

        for raw_line in contents.lines() {
            let line = raw_line.trim();
            if line.is_empty() {
                continue;
            }

            let parts: Vec<&str> = line.splitn(2, ':').collect();
            if parts.len() != 2 || parts[0].trim().is_empty() {
                tracing::warn!(line = raw_line, "config: malformed line, skipping");
                continue;
            }
            let key = parts[0].trim();
            let value = parts[1].trim();

            match key {
                "isTopSpine" => is_top_spine = value.eq_ignore_ascii_case("true"),
                "tier" => match value.parse::<u32>() {
                    Ok(t) if t >= 1 => tier = Some(t),
                    _ => tracing::warn!(value, "config: invalid tier, skipping"),
                },
                other => tracing::warn!(key = other, "config: unknown key, ignoring"),
            }
        }

        let tier = tier.ok_or_else(|| DaemonError::Config("missing required key 'tier'".to_string()))?;
        Ok(ConfigFile { is_top_spine, tier })
    }

    pub fn read(dir: &Path, node_name: &str) -> Result<Self, DaemonError> {
        let path = dir.join(format!("{}.conf", node_name));
        let contents = std::fs::read_to_string(&path)?;
        Self::parse(&contents)
    }

    pub fn is_leaf(&self) -> bool {
        self.tier == 1
    }
}

/// Open `<dir>/<node_name>.log` for append, creating it if absent
/// (spec.md §4.8, §6). Kept open for the process lifetime; a failure to
/// open it is Startup-fatal, the same class as a missing config file.
pub fn open_node_log(dir: &Path, node_name: &str) -> Result<File, DaemonError> {
    let path = dir.join(format!("{}.log", node_name));
    Ok(OpenOptions::new().create(true).append(true).open(&path)?)
}

/// Live interfaces whose name is prefixed by `node_name`, split into the
/// compute interface (leaves only, last IPv4-bearing match wins) and the
/// remaining control interfaces (spec.md §4.1).
pub fn classify_interfaces(
    node_name: &str,
    is_leaf: bool,
) -> (Vec<NetworkInterface>, Option<NetworkInterface>) {
    let matches: Vec<NetworkInterface> = list_interfaces()
        .into_iter()
        .filter(|iface| iface.is_up() && iface.name.starts_with(node_name))
        .collect();

    let compute = if is_leaf {
        matches
            .iter()
            .rev()
            .find(|iface| ipv4_of(iface).is_some())
            .cloned()
    } else {
        None
    };

    let control = matches
        .into_iter()
        .filter(|iface| compute.as_ref().map_or(true, |c| c.name != iface.name))
        .collect();

    (control, compute)
}

fn ipv4_of(iface: &NetworkInterface) -> Option<Ipv4Addr> {
    iface.ips.iter().find_map(|ip| match ip {
        IpNetwork::V4(net) => Some(net.ip()),
        _ => None,
    })
}

/// Build the prebuilt control-port record for a classified control interface.
pub fn build_control_port(iface: &NetworkInterface) -> Result<ControlPort, DaemonError> {
    let mac = mac_of(iface).ok_or_else(|| {
        DaemonError::Config(format!("control interface {} has no MAC address", iface.name))
    })?;
    let header = Ether::broadcast_header(mac, EtherType::Mtp);
    Ok(ControlPort::new(iface.name.clone(), header))
}

/// Build the prebuilt compute-port record, if this node is a leaf.
pub fn build_compute_port(iface: &NetworkInterface) -> Result<ComputePort, DaemonError> {
    let mac = mac_of(iface).ok_or_else(|| {
        DaemonError::Config(format!("compute interface {} has no MAC address", iface.name))
    })?;
    let header = Ether::broadcast_header(mac, EtherType::IPv4);
    Ok(ComputePort {
        name: iface.name.clone(),
        ether_header: header,
    })
}

/// Derive `my_VID`: the leaf's root VID, taken from the `VID_OCTET`-th
/// octet of its compute interface's IPv4 address (spec.md §4.1).
pub fn derive_root_vid(iface: &NetworkInterface) -> Result<Vid, DaemonError> {
    let addr = ipv4_of(iface)
        .ok_or_else(|| DaemonError::Config(format!("compute interface {} has no IPv4 address", iface.name)))?;
    Ok(Vid::root(addr.octets()[VID_OCTET]))
}
