/*!
MTP message codec (spec.md §4.2, §6).

Every message is carried inside a 14-byte Ethernet II frame (EtherType
`0x8850`, destination `ff:ff:ff:ff:ff:ff`); `MtpMessage` models the 1-byte
type tag plus its body as a single `deku` enum, the same declarative style
the teacher uses for `EtherType`.
*/
use deku::bitvec::{BitSlice, Msb0};
use deku::prelude::*;

use super::error::MtpError;
use super::vid::VidBytes;

/// Length-prefixed sequence of fixed-width VID strings (spec.md §4.2).
#[derive(Debug, PartialEq, Clone, Default, DekuRead, DekuWrite)]
#[deku(endian = "big")]
pub struct VidList {
    #[deku(update = "self.vids.len()")]
    count: u16,
    #[deku(count = "count")]
    pub vids: Vec<VidBytes>,
}

impl VidList {
    pub fn new(vids: Vec<VidBytes>) -> Self {
        VidList {
            count: vids.len() as u16,
            vids,
        }
    }

    pub fn from_vids(vids: &[super::vid::Vid]) -> Self {
        Self::new(vids.iter().map(|v| v.into()).collect())
    }

    pub fn to_vids(&self) -> Result<Vec<super::vid::Vid>, MtpError> {
        use std::convert::TryFrom;
        self.vids.iter().map(super::vid::Vid::try_from).collect()
    }
}

/// `REACHABLE`/`UNREACHABLE` option carried by `FAILURE_UPDATE`/`RECOVER_UPDATE`.
#[derive(Debug, PartialEq, Eq, Clone, Copy, DekuRead, DekuWrite)]
#[deku(id_type = "u8")]
pub enum UpdateOption {
    #[deku(id = "1")]
    Reachable,
    #[deku(id = "2")]
    Unreachable,
}

fn read_rest(rest: &BitSlice<Msb0, u8>) -> Result<(&BitSlice<Msb0, u8>, Vec<u8>), DekuError> {
    let data = rest.as_slice().to_vec();
    let (empty, _) = rest.split_at(0);
    Ok((empty, data))
}

/// The 1-byte MTP message type tag plus its body, read and written together.
#[derive(Debug, PartialEq, Clone, DekuRead, DekuWrite)]
#[deku(id_type = "u8")]
pub enum MtpMessage {
    #[deku(id = "1")]
    HelloNr { tier: u8, vids: VidList },
    #[deku(id = "2")]
    JoinReq { vids: VidList },
    #[deku(id = "3")]
    JoinRes { vids: VidList },
    #[deku(id = "4")]
    JoinAck { vids: VidList },
    #[deku(id = "5")]
    StartHello,
    #[deku(id = "6")]
    DataMsg {
        src_vid: u16,
        dest_vid: u16,
        #[deku(reader = "read_rest(rest)")]
        payload: Vec<u8>,
    },
    #[deku(id = "7")]
    KeepAlive,
    #[deku(id = "8")]
    FailureUpdate { option: UpdateOption, vids: VidList },
    #[deku(id = "9")]
    RecoverUpdate { option: UpdateOption, vids: VidList },
}

impl MtpMessage {
    pub fn decode(body: &[u8]) -> Result<MtpMessage, MtpError> {
        if body.is_empty() {
            return Err(MtpError::TooShort);
        }
        if !(1..=9).contains(&body[0]) {
            return Err(MtpError::UnknownType(body[0]));
        }
        let (_rest, msg) = MtpMessage::from_bytes((body, 0))?;
        Ok(msg)
    }

    pub fn encode(&self) -> Result<Vec<u8>, MtpError> {
        Ok(self.to_bytes()?)
    }
}
