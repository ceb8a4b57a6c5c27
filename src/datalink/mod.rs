/*!
Module to send and receive raw Ethernet frames over an interface.
*/

pub mod error;
pub mod pnet;

pub use error::DataLinkError;
pub use pnet::PnetPort;
