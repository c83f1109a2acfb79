//! Byte-level framing on stream transports.

pub use self::stuffing::{Stuff, Unstuff};

mod stuffing;

/// Flag byte terminating a frame.
pub const FLAG: u8 = 0x7E;
/// Escape byte preceding a stuffed reserved byte.
pub const ESCAPE: u8 = 0x7D;
/// Substitute byte marking a frame as damaged.
pub const SUBSTITUTE: u8 = 0x18;
/// Cancel byte discarding the frame received so far.
pub const CANCEL: u8 = 0x1A;
