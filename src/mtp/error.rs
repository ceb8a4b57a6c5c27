#[derive(Debug, PartialEq)]
pub enum MtpError {
    Parse(String),
    DekuError(String),
    TooShort,
    UnknownType(u8),
}

impl From<deku::error::DekuError> for MtpError {
    fn from(e: deku::error::DekuError) -> Self {
        MtpError::DekuError(e.to_string())
    }
}

impl core::fmt::Display for MtpError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match self {
            MtpError::Parse(err) => write!(f, "VID parse error: {}", err),
            MtpError::DekuError(err) => write!(f, "codec error: {}", err),
            MtpError::TooShort => write!(f, "frame too short"),
            MtpError::UnknownType(t) => write!(f, "unknown MTP message type {:#x}", t),
        }
    }
}

impl std::error::Error for MtpError {
    fn cause(&self) -> Option<&dyn std::error::Error> {
        Some(self)
    }
}
