//! The physical layer carrying frames between two engines.

pub use self::serial::{open, SerialTransport};
use crate::frame::Frame;

mod serial;

/// A transport for frames.
///
/// Implementations report arrived frames to the engine by emitting
/// [`Event::Arrival`](crate::Event::Arrival) and damaged frames by emitting
/// [`Event::Corrupt`](crate::Event::Corrupt).
pub trait Transport {
    /// Hands a frame over for transmission.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`](std::io::Error) if the frame could not be transmitted.
    fn send(&mut self, frame: &Frame) -> std::io::Result<()>;

    /// Returns the next arrived frame.
    ///
    /// The engine only calls this in response to an [`Event::Arrival`](crate::Event::Arrival).
    ///
    /// # Errors
    ///
    /// Returns an [`Error`](std::io::Error) if no frame can be received.
    fn receive(&mut self) -> std::io::Result<Frame>;
}
