//! Events driving the protocol engine.

use std::fmt::{Display, Formatter};
use std::io::{Error, ErrorKind};
use std::sync::mpsc::Receiver;

use crate::sequence::SeqNum;

/// An event the engine reacts to.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Event {
    /// The network layer has a payload ready to send.
    Ready,
    /// An undamaged frame arrived at the transport.
    Arrival,
    /// A damaged frame arrived at the transport.
    Corrupt,
    /// The retransmit timer of the given sequence number expired.
    Timeout(SeqNum),
    /// The acknowledgement delay timer expired.
    AckTimeout,
}

impl Display for Event {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ready => write!(f, "READY"),
            Self::Arrival => write!(f, "ARRIVAL"),
            Self::Corrupt => write!(f, "CORRUPT"),
            Self::Timeout(seq) => write!(f, "TIMEOUT({seq})"),
            Self::AckTimeout => write!(f, "ACK_TIMEOUT"),
        }
    }
}

/// A blocking source of events.
pub trait EventSource {
    /// Blocks until the next event is available and returns it.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] if no more events can ever arrive.
    fn wait_for_event(&mut self) -> std::io::Result<Event>;
}

impl EventSource for Receiver<Event> {
    fn wait_for_event(&mut self) -> std::io::Result<Event> {
        self.recv()
            .map_err(|_| Error::new(ErrorKind::BrokenPipe, "Event channel disconnected."))
    }
}

#[cfg(test)]
mod tests {
    use std::io::ErrorKind;
    use std::sync::mpsc::channel;

    use super::{Event, EventSource};
    use crate::sequence::SeqNum;

    #[test]
    fn test_receiver_delivers_in_order() {
        let (sender, mut receiver) = channel();
        sender.send(Event::Arrival).unwrap();
        sender.send(Event::Timeout(SeqNum::from_u8_lossy(3))).unwrap();
        assert_eq!(receiver.wait_for_event().unwrap(), Event::Arrival);
        assert_eq!(
            receiver.wait_for_event().unwrap(),
            Event::Timeout(SeqNum::from_u8_lossy(3))
        );
    }

    #[test]
    fn test_receiver_disconnected() {
        let (sender, mut receiver) = channel::<Event>();
        drop(sender);
        assert_eq!(
            receiver.wait_for_event().unwrap_err().kind(),
            ErrorKind::BrokenPipe
        );
    }

    #[test]
    fn test_to_string() {
        assert_eq!(Event::Timeout(SeqNum::from_u8_lossy(2)).to_string(), "TIMEOUT(2)");
        assert_eq!(Event::AckTimeout.to_string(), "ACK_TIMEOUT");
    }
}
