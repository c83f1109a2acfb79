//! Protocol frames and their wire representation.
//!
//! A frame consists of a single header byte, an optional payload (`DATA` frames only)
//! and a big endian CRC-16 checksum over header and payload.
//!
//! The header byte is laid out as `KK SSS AAA`, where `K` is the [`Kind`] tag,
//! `S` the sequence number and `A` the piggybacked acknowledgement number.

use std::array::IntoIter;
use std::fmt::{Display, Formatter};
use std::iter::{Chain, Copied};
use std::slice::Iter;

pub use self::error::Error;
pub use self::kind::Kind;
use crate::sequence::SeqNum;
use crate::types::{Payload, MAX_PAYLOAD_SIZE};
use crate::CRC;

mod error;
mod kind;

const KIND_OFFSET: u8 = 6;
const SEQ_OFFSET: u8 = 3;
const SEQ_MASK: u8 = 0b0011_1000;
const ACK_MASK: u8 = 0b0000_0111;

/// A protocol frame.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Frame {
    kind: Kind,
    seq: SeqNum,
    ack: SeqNum,
    payload: Option<Payload>,
}

impl Frame {
    /// Size of the header in bytes.
    pub const HEADER_SIZE: usize = 1;

    /// Size of the CRC checksum in bytes.
    pub const CRC_SIZE: usize = 2;

    /// Size of a frame without payload.
    pub const METADATA_SIZE: usize = Self::HEADER_SIZE + Self::CRC_SIZE;

    /// Maximum size of a serialized frame.
    pub const MAX_SIZE: usize = Self::METADATA_SIZE + MAX_PAYLOAD_SIZE;

    /// Creates a `DATA` frame.
    #[must_use]
    pub const fn data(seq: SeqNum, ack: SeqNum, payload: Payload) -> Self {
        Self {
            kind: Kind::Data,
            seq,
            ack,
            payload: Some(payload),
        }
    }

    /// Creates a standalone `ACK` frame.
    #[must_use]
    pub const fn ack(ack: SeqNum) -> Self {
        Self {
            kind: Kind::Ack,
            seq: SeqNum::ZERO,
            ack,
            payload: None,
        }
    }

    /// Creates a `NAK` frame.
    ///
    /// The missing frame is implied to be the successor of `ack`.
    #[must_use]
    pub const fn nak(ack: SeqNum) -> Self {
        Self {
            kind: Kind::Nak,
            seq: SeqNum::ZERO,
            ack,
            payload: None,
        }
    }

    /// Returns the frame kind.
    #[must_use]
    pub const fn kind(&self) -> Kind {
        self.kind
    }

    /// Returns the sequence number.
    ///
    /// This is only meaningful for `DATA` frames.
    #[must_use]
    pub const fn seq(&self) -> SeqNum {
        self.seq
    }

    /// Returns the cumulative acknowledgement number.
    #[must_use]
    pub const fn ack_num(&self) -> SeqNum {
        self.ack
    }

    /// Returns the payload, if this is a `DATA` frame.
    #[must_use]
    pub fn payload(&self) -> Option<&[u8]> {
        self.payload.as_deref()
    }

    /// Consumes the frame and returns its payload.
    #[must_use]
    pub fn into_payload(self) -> Option<Payload> {
        self.payload
    }

    /// Returns the header byte.
    #[must_use]
    pub const fn header(&self) -> u8 {
        ((self.kind as u8) << KIND_OFFSET) | (self.seq.as_u8() << SEQ_OFFSET) | self.ack.as_u8()
    }

    /// Calculates the CRC checksum over header and payload.
    #[must_use]
    pub fn crc(&self) -> u16 {
        let mut digest = CRC.digest();
        digest.update(&[self.header()]);
        digest.update(self.payload().unwrap_or_default());
        digest.finalize()
    }
}

impl Display for Frame {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            Kind::Data => write!(f, "{}({}, {})", self.kind, self.seq, self.ack),
            Kind::Ack | Kind::Nak => write!(f, "{}({})", self.kind, self.ack),
        }
    }
}

#[allow(clippy::into_iter_without_iter)]
impl<'a> IntoIterator for &'a Frame {
    type Item = u8;
    type IntoIter = Chain<
        Chain<IntoIter<Self::Item, 1>, Copied<Iter<'a, Self::Item>>>,
        IntoIter<Self::Item, 2>,
    >;

    fn into_iter(self) -> Self::IntoIter {
        [self.header()]
            .into_iter()
            .chain(self.payload().unwrap_or_default().iter().copied())
            .chain(self.crc().to_be_bytes())
    }
}

impl TryFrom<&[u8]> for Frame {
    type Error = Error;

    fn try_from(buffer: &[u8]) -> Result<Self, Self::Error> {
        if buffer.len() < Self::METADATA_SIZE {
            return Err(Error::BufferTooSmall {
                expected: Self::METADATA_SIZE,
                found: buffer.len(),
            });
        }

        let (body, checksum) = buffer.split_at(buffer.len() - Self::CRC_SIZE);
        let found = u16::from_be_bytes([checksum[0], checksum[1]]);
        let expected = CRC.checksum(body);

        if found != expected {
            return Err(Error::Checksum { expected, found });
        }

        let (&header, payload) = body.split_first().ok_or(Error::BufferTooSmall {
            expected: Self::METADATA_SIZE,
            found: buffer.len(),
        })?;
        let kind = Kind::try_from(header >> KIND_OFFSET).map_err(|_| Error::InvalidKind(header))?;
        let seq = SeqNum::from_u8_lossy((header & SEQ_MASK) >> SEQ_OFFSET);
        let ack = SeqNum::from_u8_lossy(header & ACK_MASK);

        match kind {
            Kind::Data => {
                let payload = Payload::try_from(payload).map_err(|()| Error::PayloadTooLarge {
                    max: MAX_PAYLOAD_SIZE,
                    size: payload.len(),
                })?;
                Ok(Self::data(seq, ack, payload))
            }
            Kind::Ack | Kind::Nak if !payload.is_empty() => Err(Error::InvalidBufferSize {
                expected: Self::METADATA_SIZE,
                found: buffer.len(),
            }),
            Kind::Ack | Kind::Nak => Ok(Self {
                kind,
                seq,
                ack,
                payload: None,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Error, Frame, Kind};
    use crate::sequence::SeqNum;
    use crate::types::{Payload, MAX_PAYLOAD_SIZE};
    use crate::CRC;

    fn seq(n: u8) -> SeqNum {
        SeqNum::from_u8_lossy(n)
    }

    fn payload(bytes: &[u8]) -> Payload {
        Payload::try_from(bytes).unwrap()
    }

    fn bytes(frame: &Frame) -> Vec<u8> {
        frame.into_iter().collect()
    }

    #[test]
    fn test_header() {
        assert_eq!(Frame::data(seq(5), seq(3), Payload::new()).header(), 0b00_101_011);
        assert_eq!(Frame::ack(seq(6)).header(), 0b01_000_110);
        assert_eq!(Frame::nak(seq(7)).header(), 0b10_000_111);
    }

    #[test]
    fn test_to_string() {
        assert_eq!(
            Frame::data(seq(2), seq(7), payload(b"abc")).to_string(),
            "DATA(2, 7)"
        );
        assert_eq!(Frame::ack(seq(4)).to_string(), "ACK(4)");
        assert_eq!(Frame::nak(seq(0)).to_string(), "NAK(0)");
    }

    #[test]
    fn test_bytes() {
        let frame = Frame::data(seq(1), seq(0), payload(&[0xAA, 0xBB]));
        let crc = CRC.checksum(&[0b00_001_000, 0xAA, 0xBB]).to_be_bytes();
        assert_eq!(bytes(&frame), vec![0b00_001_000, 0xAA, 0xBB, crc[0], crc[1]]);

        let frame = Frame::nak(seq(3));
        let crc = CRC.checksum(&[0b10_000_011]).to_be_bytes();
        assert_eq!(bytes(&frame), vec![0b10_000_011, crc[0], crc[1]]);
    }

    #[test]
    fn test_from_buffer() {
        let frame = Frame::data(seq(6), seq(5), payload(b"hello"));
        let decoded = Frame::try_from(bytes(&frame).as_slice()).unwrap();
        assert_eq!(decoded.kind(), Kind::Data);
        assert_eq!(decoded.seq(), 6);
        assert_eq!(decoded.ack_num(), 5);
        assert_eq!(decoded.payload(), Some(b"hello".as_slice()));

        let frame = Frame::ack(seq(2));
        assert_eq!(Frame::try_from(bytes(&frame).as_slice()).unwrap(), frame);
    }

    #[test]
    fn test_empty_data_payload() {
        let frame = Frame::data(seq(0), seq(7), Payload::new());
        let decoded = Frame::try_from(bytes(&frame).as_slice()).unwrap();
        assert_eq!(decoded.payload(), Some([].as_slice()));
    }

    #[test]
    fn test_buffer_too_small() {
        assert_eq!(
            Frame::try_from([0x40, 0x00].as_slice()),
            Err(Error::BufferTooSmall {
                expected: 3,
                found: 2
            })
        );
    }

    #[test]
    fn test_checksum_mismatch() {
        let mut buffer = bytes(&Frame::data(seq(1), seq(1), payload(b"xyz")));
        buffer[2] ^= 0x10;
        assert!(matches!(
            Frame::try_from(buffer.as_slice()),
            Err(Error::Checksum { .. })
        ));
    }

    #[test]
    fn test_invalid_kind() {
        let header = 0b11_000_000;
        let crc = CRC.checksum(&[header]).to_be_bytes();
        assert_eq!(
            Frame::try_from([header, crc[0], crc[1]].as_slice()),
            Err(Error::InvalidKind(header))
        );
    }

    #[test]
    fn test_control_frame_with_payload() {
        let body = [0b01_000_001, 0x42];
        let crc = CRC.checksum(&body).to_be_bytes();
        assert_eq!(
            Frame::try_from([body[0], body[1], crc[0], crc[1]].as_slice()),
            Err(Error::InvalidBufferSize {
                expected: 3,
                found: 4
            })
        );
    }

    #[test]
    fn test_payload_too_large() {
        let mut body = vec![0b00_000_000];
        body.extend(std::iter::repeat(0x55).take(MAX_PAYLOAD_SIZE + 1));
        body.extend(CRC.checksum(&body).to_be_bytes());
        assert_eq!(
            Frame::try_from(body.as_slice()),
            Err(Error::PayloadTooLarge {
                max: MAX_PAYLOAD_SIZE,
                size: MAX_PAYLOAD_SIZE + 1
            })
        );
    }
}
