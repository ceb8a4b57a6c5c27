/*!
Top-level daemon error, wrapping every lower-layer error this binary can
surface at startup (spec.md §7: these are all *Startup-fatal*).
*/
use crate::datalink::DataLinkError;
use crate::mtp::MtpError;

#[derive(Debug)]
pub enum DaemonError {
    Config(String),
    Io(std::io::Error),
    DataLink(DataLinkError),
    Mtp(MtpError),
}

impl From<std::io::Error> for DaemonError {
    fn from(e: std::io::Error) -> Self {
        DaemonError::Io(e)
    }
}

impl From<DataLinkError> for DaemonError {
    fn from(e: DataLinkError) -> Self {
        DaemonError::DataLink(e)
    }
}

impl From<MtpError> for DaemonError {
    fn from(e: MtpError) -> Self {
        DaemonError::Mtp(e)
    }
}

impl core::fmt::Display for DaemonError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match self {
            DaemonError::Config(err) => write!(f, "config error: {}", err),
            DaemonError::Io(err) => write!(f, "IO error: {}", err),
            DaemonError::DataLink(err) => write!(f, "datalink error: {}", err),
            DaemonError::Mtp(err) => write!(f, "MTP error: {}", err),
        }
    }
}

impl std::error::Error for DaemonError {
    fn cause(&self) -> Option<&dyn std::error::Error> {
        Some(self)
    }
}
