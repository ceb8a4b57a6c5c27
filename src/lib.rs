/*!
Meshed Tree Protocol (MTP-DCN) switch daemon: emulates the control plane of
a folded-Clos fabric node (leaf or spine) over real Linux interfaces.
*/

pub mod config;
pub mod daemon;
pub mod datalink;
pub mod error;
pub mod flood;
pub mod forwarding;
pub mod handshake;
pub mod keepalive;
pub mod layer;
pub mod mtp;
pub mod ports;
pub mod signal;
pub mod timers;
pub mod vidtable;

pub use config::ConfigFile;
pub use daemon::{Daemon, FrameSink};
pub use error::DaemonError;
