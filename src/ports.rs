/*!
Control and compute port records (spec.md §3).

Control ports are held in one `PortTable`, addressable by a small integer
`PortHandle` rather than the original C daemon's reciprocal pointers
between a port and its accepted/offered table entry (spec.md §9 Design
Notes) — accepted/offered entries below just store the handle.
*/
use crate::layer::Ether;

/// Why a control port is currently down, if it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailType {
    None,
    MissFail,
    DetectFail,
}

/// Opaque reference to a row in a `PortTable`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PortHandle(pub usize);

#[derive(Debug, Clone)]
pub struct ControlPort {
    pub name: String,
    pub ether_header: Ether,
    pub is_up: bool,
    pub start: bool,
    pub last_sent_time: u64,
    pub last_received_time: u64,
    pub fail_type: FailType,
    pub continue_count: u8,
}

impl ControlPort {
    pub fn new(name: String, ether_header: Ether) -> Self {
        ControlPort {
            name,
            ether_header,
            is_up: false,
            start: false,
            last_sent_time: 0,
            last_received_time: 0,
            fail_type: FailType::None,
            continue_count: 0,
        }
    }

    /// The digits after `ethN` in this port's interface name, used to
    /// extend a VID across this hop (spec.md §4.3 step 3).
    pub fn numeric_suffix(&self) -> Option<u32> {
        let digits: String = self
            .name
            .chars()
            .rev()
            .take_while(|c| c.is_ascii_digit())
            .collect();
        if digits.is_empty() {
            return None;
        }
        digits.chars().rev().collect::<String>().parse().ok()
    }
}

#[derive(Debug, Clone)]
pub struct ComputePort {
    pub name: String,
    pub ether_header: Ether,
}

/// Ordered container of every control port, created once at startup and
/// retained for the process lifetime (spec.md §3 Lifecycles).
#[derive(Debug, Default)]
pub struct PortTable {
    ports: Vec<ControlPort>,
}

impl PortTable {
    pub fn new() -> Self {
        PortTable { ports: Vec::new() }
    }

    pub fn push(&mut self, port: ControlPort) -> PortHandle {
        self.ports.push(port);
        PortHandle(self.ports.len() - 1)
    }

    pub fn get(&self, handle: PortHandle) -> &ControlPort {
        &self.ports[handle.0]
    }

    pub fn get_mut(&mut self, handle: PortHandle) -> &mut ControlPort {
        &mut self.ports[handle.0]
    }

    pub fn len(&self) -> usize {
        self.ports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ports.is_empty()
    }

    pub fn handles(&self) -> impl Iterator<Item = PortHandle> + '_ {
        (0..self.ports.len()).map(PortHandle)
    }

    pub fn iter(&self) -> impl Iterator<Item = (PortHandle, &ControlPort)> {
        self.ports.iter().enumerate().map(|(i, p)| (PortHandle(i), p))
    }

    pub fn find_by_name(&self, name: &str) -> Option<PortHandle> {
        self.ports
            .iter()
            .position(|p| p.name == name)
            .map(PortHandle)
    }
}
