/*!
Virtual ID (VID): a dotted-integer path identifier anchored at a leaf.
*/
use std::convert::TryFrom;
use std::fmt;

use deku::prelude::*;

use super::error::MtpError;

/// On-wire fixed width of a single VID field, including its NUL terminator.
pub const VID_LEN: usize = 64;

/// Fixed-width, zero-padded wire representation of one VID.
#[derive(Debug, PartialEq, Eq, Clone, DekuRead, DekuWrite)]
pub struct VidBytes(pub [u8; VID_LEN]);

impl Default for VidBytes {
    fn default() -> Self {
        VidBytes([0u8; VID_LEN])
    }
}

/// A VID, e.g. `"1"` (a root leaf VID) or `"1.2"` (extended one hop up).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Vid(String);

impl Vid {
    /// Build the root VID a leaf derives from its compute-subnet IPv4 octet.
    pub fn root(octet: u8) -> Vid {
        Vid(octet.to_string())
    }

    /// Extend a VID with the ingress control port's numeric suffix, e.g.
    /// `"1"` + port `2` (from `eth2`) -> `"1.2"`.
    pub fn extend(&self, port_suffix: u32) -> Vid {
        Vid(format!("{}.{}", self.0, port_suffix))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True only for a single-integer root VID, the only shape that fits in
    /// the 2-byte on-wire field `DATA_MSG` uses (spec.md §4.2, §9).
    pub fn as_u16(&self) -> Option<u16> {
        self.0.parse::<u16>().ok()
    }

    pub fn from_u16(n: u16) -> Vid {
        Vid(n.to_string())
    }

    /// The leaf-anchoring first segment of a (possibly extended) VID, e.g.
    /// `"4.0.2"` -> `"4"`.
    pub fn root_segment(&self) -> &str {
        self.0.split('.').next().unwrap_or(&self.0)
    }

    /// True if this VID is rooted at leaf `n` — how a `DATA_MSG`'s 16-bit
    /// integer VID is matched against an extended path VID (spec.md §4.6).
    pub fn root_matches(&self, n: u16) -> bool {
        self.root_segment().parse::<u16>() == Ok(n)
    }

    pub fn parse(s: &str) -> Result<Vid, MtpError> {
        if s.is_empty() || s.len() >= VID_LEN {
            return Err(MtpError::Parse(format!("invalid VID {:?}", s)));
        }
        if !s.split('.').all(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_digit()))
        {
            return Err(MtpError::Parse(format!("invalid VID {:?}", s)));
        }
        Ok(Vid(s.to_string()))
    }
}

impl fmt::Display for Vid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&Vid> for VidBytes {
    fn from(vid: &Vid) -> Self {
        let mut bytes = [0u8; VID_LEN];
        let s = vid.0.as_bytes();
        bytes[..s.len()].copy_from_slice(s);
        VidBytes(bytes)
    }
}

impl TryFrom<&VidBytes> for Vid {
    type Error = MtpError;

    fn try_from(raw: &VidBytes) -> Result<Self, Self::Error> {
        let nul = raw.0.iter().position(|&b| b == 0).unwrap_or(VID_LEN);
        let s = std::str::from_utf8(&raw.0[..nul])
            .map_err(|e| MtpError::Parse(e.to_string()))?;
        Vid::parse(s)
    }
}
