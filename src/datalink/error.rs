#[derive(Debug)]
pub enum DataLinkError {
    InterfaceNotFound,
    UnhandledInterfaceType,
    IoError(std::io::Error),
    BufferError,
}

impl From<std::io::Error> for DataLinkError {
    fn from(e: std::io::Error) -> Self {
        DataLinkError::IoError(e)
    }
}

impl core::fmt::Display for DataLinkError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match *self {
            DataLinkError::InterfaceNotFound => write!(f, "interface not found"),
            DataLinkError::UnhandledInterfaceType => write!(f, "unhandled interface type"),
            DataLinkError::IoError(ref err) => write!(f, "IO error: {}", err),
            DataLinkError::BufferError => write!(f, "buffer error"),
        }
    }
}

impl std::error::Error for DataLinkError {
    fn cause(&self) -> Option<&dyn std::error::Error> {
        Some(self)
    }
}
