pub mod ipv4;

pub use ipv4::Ipv4;
