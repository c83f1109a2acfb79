use std::fmt::{Display, Formatter};
use std::io::ErrorKind;

/// Errors that can occur when decoding a frame.
#[derive(Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// The buffer is shorter than the smallest possible frame.
    BufferTooSmall {
        /// Minimum size in bytes.
        expected: usize,
        /// Actual size in bytes.
        found: usize,
    },
    /// The buffer size does not match the frame kind.
    InvalidBufferSize {
        /// Expected size in bytes.
        expected: usize,
        /// Actual size in bytes.
        found: usize,
    },
    /// The header carries an unknown kind tag.
    InvalidKind(u8),
    /// The CRC checksum does not match the frame content.
    Checksum {
        /// Checksum calculated over the received bytes.
        expected: u16,
        /// Checksum carried by the frame.
        found: u16,
    },
    /// The payload exceeds the maximum payload size.
    PayloadTooLarge {
        /// Maximum payload size in bytes.
        max: usize,
        /// Actual payload size in bytes.
        size: usize,
    },
}

impl std::error::Error for Error {}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BufferTooSmall { expected, found } => write!(
                f,
                "Buffer too small. Expected at least {expected} bytes but found {found} bytes."
            ),
            Self::InvalidBufferSize { expected, found } => write!(
                f,
                "Invalid buffer size. Expected {expected} bytes, but found {found} bytes."
            ),
            Self::InvalidKind(header) => write!(f, "Invalid frame kind in header: {header:#04X}"),
            Self::Checksum { expected, found } => {
                write!(f, "CRC mismatch: expected {expected:#06X}, found {found:#06X}")
            }
            Self::PayloadTooLarge { max, size } => write!(f, "Payload too large: {size} > {max}"),
        }
    }
}

impl From<Error> for std::io::Error {
    fn from(error: Error) -> Self {
        Self::new(ErrorKind::InvalidData, error)
    }
}
