//! Common buffer types.

use crate::frame::Frame;

/// The maximum amount of payload bytes a `DATA` frame can carry.
pub const MAX_PAYLOAD_SIZE: usize = 128;

/// In the worst case, all frame bytes are stuffed (*2) and we append the FLAG byte (+1).
pub const MAX_FRAME_SIZE: usize = Frame::MAX_SIZE * 2 + 1;

/// A stack-allocated buffer that can hold the bytes of a frame up to its maximum size with stuffing.
pub type RawFrame = heapless::Vec<u8, MAX_FRAME_SIZE>;

/// A stack-allocated buffer that can hold the payload of a `DATA` frame.
pub type Payload = heapless::Vec<u8, MAX_PAYLOAD_SIZE>;
