pub mod ether;
pub mod ip;

pub use ether::{Ether, EtherType, MacAddress};
pub use ip::Ipv4;

pub mod error;
pub use error::LayerError;
