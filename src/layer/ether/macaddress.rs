use crate::layer::LayerError;
use deku::bitvec::BitView;
use deku::prelude::*;
use nom::bytes::{complete::tag, complete::take_while_m_n};
use nom::combinator::{map_res, verify};
use nom::multi::separated_nonempty_list;
use nom::IResult;

const MACADDR_SIZE: usize = 6;

// Parse mac address from string and return a Vec<u8>
// Format: MM:MM:MM:SS:SS:SS
fn parse_macaddr_str(input: &str) -> IResult<&str, Vec<u8>> {
    fn from_hex(input: &str) -> Result<u8, std::num::ParseIntError> {
        u8::from_str_radix(input, 16)
    }

    fn is_hex_digit(c: char) -> bool {
        c.is_digit(16)
    }

    fn hex_2(input: &str) -> IResult<&str, u8> {
        map_res(take_while_m_n(2, 2, is_hex_digit), from_hex)(input)
    }

    verify(separated_nonempty_list(tag(":"), hex_2), |v: &Vec<u8>| {
        v.len() == MACADDR_SIZE
    })(input)
}

/// Type representing an ethernet mac address
#[derive(Debug, PartialEq, Clone, Default, DekuRead, DekuWrite)]
#[deku(
    ctx_default = "deku::ctx::Endian::Big",
    ctx = "_endian: deku::ctx::Endian"
)]
pub struct MacAddress(pub [u8; MACADDR_SIZE]);

impl std::str::FromStr for MacAddress {
    type Err = LayerError;

    /// From a `MM:MM:MM:SS:SS:SS` formatted mac address
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let res = parse_macaddr_str(s)
            .map_err(|_e| LayerError::Parse("parsing failure, invalid format".to_string()))?
            .1;

        let (_rest, mac_addr) = MacAddress::read(res.view_bits(), deku::ctx::Endian::Big)?;

        Ok(mac_addr)
    }
}
