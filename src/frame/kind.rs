use std::fmt::{Display, Formatter};

/// Frame kinds.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[repr(u8)]
pub enum Kind {
    /// Data frame carrying a payload.
    Data = 0b00,
    /// Standalone acknowledgement.
    Ack = 0b01,
    /// Negative acknowledgement requesting a retransmission.
    Nak = 0b10,
}

impl Display for Kind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Data => write!(f, "DATA"),
            Self::Ack => write!(f, "ACK"),
            Self::Nak => write!(f, "NAK"),
        }
    }
}

impl TryFrom<u8> for Kind {
    type Error = u8;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        match tag {
            0b00 => Ok(Self::Data),
            0b01 => Ok(Self::Ack),
            0b10 => Ok(Self::Nak),
            other => Err(other),
        }
    }
}
