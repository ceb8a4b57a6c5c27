/*!
Accepted-VID and offered-VID tables (spec.md §3).

An accepted entry is created the first time a downstream peer's
`JOIN_RES` is processed on a port; an offered entry the first time a
`JOIN_ACK` is processed. Entries live for the process lifetime and are
only ever emptied of VIDs, never removed (spec.md §3 Lifecycles).
*/
use std::collections::BTreeSet;

use crate::mtp::Vid;
use crate::ports::PortHandle;

#[derive(Debug, Clone)]
pub struct AcceptedEntry {
    pub port: PortHandle,
    pub vids: BTreeSet<Vid>,
    pub unreachable: BTreeSet<Vid>,
}

impl AcceptedEntry {
    fn new(port: PortHandle) -> Self {
        AcceptedEntry {
            port,
            vids: BTreeSet::new(),
            unreachable: BTreeSet::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct OfferedEntry {
    pub port: PortHandle,
    pub vids: BTreeSet<Vid>,
    pub reachable: BTreeSet<Vid>,
    pub unreachable: BTreeSet<Vid>,
}

impl OfferedEntry {
    fn new(port: PortHandle) -> Self {
        OfferedEntry {
            port,
            vids: BTreeSet::new(),
            reachable: BTreeSet::new(),
            unreachable: BTreeSet::new(),
        }
    }

    /// An offered port is clean when both sub-tables are empty (spec.md §4.5).
    pub fn is_clean(&self) -> bool {
        self.reachable.is_empty() && self.unreachable.is_empty()
    }

    /// P2: a VID never sits in both sub-tables of the same offered entry at once.
    #[cfg(debug_assertions)]
    pub fn debug_assert_invariants(&self) {
        debug_assert!(
            self.reachable.is_disjoint(&self.unreachable),
            "offered entry for {:?} has a VID in both reachable and unreachable",
            self.port
        );
    }
}

#[derive(Debug, Default)]
pub struct AcceptedVidTable {
    entries: Vec<AcceptedEntry>,
}

impl AcceptedVidTable {
    pub fn new() -> Self {
        AcceptedVidTable { entries: Vec::new() }
    }

    /// Fetch the entry for `port`, creating it (empty) on first touch.
    pub fn entry(&mut self, port: PortHandle) -> &mut AcceptedEntry {
        if let Some(idx) = self.entries.iter().position(|e| e.port == port) {
            &mut self.entries[idx]
        } else {
            self.entries.push(AcceptedEntry::new(port));
            self.entries.last_mut().unwrap()
        }
    }

    pub fn find(&self, port: PortHandle) -> Option<&AcceptedEntry> {
        self.entries.iter().find(|e| e.port == port)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AcceptedEntry> {
        self.entries.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut AcceptedEntry> {
        self.entries.iter_mut()
    }

    /// Which up port, if any, carries a VID rooted at leaf `dest` and does
    /// not list it unreachable (used by spine forwarding, spec.md §4.6).
    /// VIDs accumulate a `".port"` suffix per hop, so matching is by root
    /// segment rather than full-string equality.
    pub fn reachable_port_for(&self, dest: u16, up_ports: impl Fn(PortHandle) -> bool) -> Option<PortHandle> {
        self.entries
            .iter()
            .find(|e| {
                up_ports(e.port)
                    && e.vids.iter().any(|v| v.root_matches(dest))
                    && !e.unreachable.iter().any(|v| v.root_matches(dest))
            })
            .map(|e| e.port)
    }

    /// All VIDs across every accepted entry (used by the isolated-subtree
    /// REACHABLE flood, spec.md §4.5).
    pub fn all_vids(&self) -> BTreeSet<Vid> {
        self.entries.iter().flat_map(|e| e.vids.iter().cloned()).collect()
    }
}

#[derive(Debug, Default)]
pub struct OfferedVidTable {
    entries: Vec<OfferedEntry>,
}

impl OfferedVidTable {
    pub fn new() -> Self {
        OfferedVidTable { entries: Vec::new() }
    }

    pub fn entry(&mut self, port: PortHandle) -> &mut OfferedEntry {
        if let Some(idx) = self.entries.iter().position(|e| e.port == port) {
            &mut self.entries[idx]
        } else {
            self.entries.push(OfferedEntry::new(port));
            self.entries.last_mut().unwrap()
        }
    }

    pub fn find(&self, port: PortHandle) -> Option<&OfferedEntry> {
        self.entries.iter().find(|e| e.port == port)
    }

    pub fn iter(&self) -> impl Iterator<Item = &OfferedEntry> {
        self.entries.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut OfferedEntry> {
        self.entries.iter_mut()
    }

    /// A set of offered ports is all-clean when every member is clean.
    pub fn all_clean(&self) -> bool {
        self.entries.iter().all(|e| e.is_clean())
    }

    /// The union of every offered port's unreachable sub-table.
    pub fn all_unreachable(&self) -> BTreeSet<Vid> {
        self.entries
            .iter()
            .flat_map(|e| e.unreachable.iter().cloned())
            .collect()
    }

    pub fn all_vids(&self) -> BTreeSet<Vid> {
        self.entries.iter().flat_map(|e| e.vids.iter().cloned()).collect()
    }

    #[cfg(debug_assertions)]
    pub fn debug_assert_invariants(&self) {
        for e in &self.entries {
            e.debug_assert_invariants();
        }
    }
}
