/*!
Packet interface implementation using `libpnet`

Each classified port (control or compute) gets one of these: a raw
Ethernet channel opened with a zero-length read timeout, which gives us
the "non-blocking receive" behavior spec.md's event loop needs without
pulling in an async runtime.
*/
use std::time::Duration;

use pnet::datalink::{self, Channel, Config, DataLinkReceiver, DataLinkSender, NetworkInterface};

use super::error::DataLinkError;
use crate::layer::MacAddress;
use crate::timers::MAX_BUFFER_SIZE;

pub struct PnetPort {
    tx: Box<dyn DataLinkSender>,
    rx: Box<dyn DataLinkReceiver>,
}

impl PnetPort {
    /// Open a raw Ethernet channel on `interface_name`.
    pub fn open(interface_name: &str) -> Result<Self, DataLinkError> {
        let interface = find_interface(interface_name)?;

        let mut config = Config::default();
        config.read_timeout = Some(Duration::from_millis(0));
        config.read_buffer_size = MAX_BUFFER_SIZE;
        config.write_buffer_size = MAX_BUFFER_SIZE;

        let (tx, rx) = match datalink::channel(&interface, config) {
            Ok(Channel::Ethernet(tx, rx)) => (tx, rx),
            Ok(_) => return Err(DataLinkError::UnhandledInterfaceType),
            Err(e) => return Err(DataLinkError::IoError(e)),
        };

        Ok(PnetPort { tx, rx })
    }

    /// Non-blocking receive. `Ok(None)` means nothing was queued within the
    /// read timeout (spec.md's `EAGAIN`/`EWOULDBLOCK` Transient I/O case).
    pub fn try_recv(&mut self) -> Result<Option<Vec<u8>>, DataLinkError> {
        match self.rx.next() {
            Ok(bytes) => Ok(Some(bytes.to_vec())),
            Err(e)
                if matches!(
                    e.kind(),
                    std::io::ErrorKind::WouldBlock | std::io::ErrorKind::TimedOut
                ) =>
            {
                Ok(None)
            }
            Err(e) => Err(DataLinkError::IoError(e)),
        }
    }

    pub fn send(&mut self, frame: &[u8]) -> Result<(), DataLinkError> {
        match self.tx.send_to(frame, None) {
            Some(res) => Ok(res?),
            None => Err(DataLinkError::BufferError),
        }
    }
}

/// Find a live interface by name.
pub fn find_interface(name: &str) -> Result<NetworkInterface, DataLinkError> {
    datalink::interfaces()
        .into_iter()
        .find(|iface| iface.name == name)
        .ok_or(DataLinkError::InterfaceNotFound)
}

/// All interfaces visible to this process, as reported by the kernel.
pub fn list_interfaces() -> Vec<NetworkInterface> {
    datalink::interfaces()
}

/// Convert a `pnet` MAC address into our wire-level `MacAddress`.
pub fn mac_of(iface: &NetworkInterface) -> Option<MacAddress> {
    iface
        .mac
        .map(|m| MacAddress([m.0, m.1, m.2, m.3, m.4, m.5]))
}
