/*!
MTP-DCN wire protocol: message codec (spec.md §4.2) and VID type (spec.md §3).
*/
pub mod codec;
pub mod error;
pub mod vid;

pub use codec::{MtpMessage, UpdateOption, VidList};
pub use error::MtpError;
pub use vid::{Vid, VidBytes, VID_LEN};

use deku::prelude::*;

use crate::layer::Ether;

/// Encode a full MTP frame: prebuilt Ethernet header + message body.
pub fn encode_frame(ether: &Ether, msg: &MtpMessage) -> Result<Vec<u8>, MtpError> {
    let mut bytes = ether.to_bytes()?;
    bytes.extend(msg.encode()?);
    Ok(bytes)
}

/// Decode a full MTP frame received off the wire.
pub fn decode_frame(bytes: &[u8]) -> Result<(Ether, MtpMessage), MtpError> {
    let (rest, ether) = Ether::from_bytes((bytes, 0))?;
    let (_rest, msg) = MtpMessage::from_bytes(rest)?;
    Ok((ether, msg))
}
