/*!
Ethernet layer
*/

mod ethertype;
mod macaddress;

use deku::prelude::*;

pub use ethertype::EtherType;
pub use macaddress::MacAddress;

/**
Ethernet Frame Header

```text
 0                   1                   2                   3
 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
|                      Destination Address                      |
+                               +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
|                               |                               |
+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+                               +
|                         Source Address                        |
+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
|           EtherType           |                               |
+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+                               +
|                                                               |
+                             Payload                           +
|                                                               |
+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
```
*/
#[derive(Debug, PartialEq, Clone, Default, DekuRead, DekuWrite)]
#[deku(endian = "big")]
pub struct Ether {
    pub dst: MacAddress,
    pub src: MacAddress,
    pub ether_type: EtherType,
}

impl Ether {
    /// Broadcast header template for a port, stamped once at startup.
    pub fn broadcast_header(src: MacAddress, ether_type: EtherType) -> Self {
        Ether {
            dst: MacAddress([0xff; 6]),
            src,
            ether_type,
        }
    }
}
