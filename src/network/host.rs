use std::io::{Error, ErrorKind};
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::time::Duration;

use log::trace;

use super::credit::Credit;
use crate::event::Event;
use crate::types::{Payload, MAX_PAYLOAD_SIZE};

/// Application handle to send and receive payloads through an engine.
///
/// # Usage
///
/// ```
/// use std::sync::mpsc::channel;
/// use swp::network::{pair, NetworkLayer};
///
/// let (events, _receiver) = channel();
/// let (host, mut channels) = pair(events);
/// channels.grant_credit(1);
/// host.send(b"hello").unwrap();
/// assert_eq!(channels.pull().as_deref(), Some(b"hello".as_slice()));
/// ```
#[derive(Debug)]
pub struct Host {
    outgoing: Sender<Payload>,
    delivered: Receiver<Payload>,
    events: Sender<Event>,
    credit: Arc<Credit>,
}

impl Host {
    pub(super) const fn new(
        outgoing: Sender<Payload>,
        delivered: Receiver<Payload>,
        events: Sender<Event>,
        credit: Arc<Credit>,
    ) -> Self {
        Self {
            outgoing,
            delivered,
            events,
            credit,
        }
    }

    /// Sends a payload, blocking until the engine grants credit.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] if the payload is too large or the engine is gone.
    pub fn send(&self, payload: &[u8]) -> std::io::Result<()> {
        let payload = Self::payload(payload)?;
        self.credit.acquire(None);
        self.enqueue(payload)
    }

    /// Sends a payload, waiting at most `timeout` for credit.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] of kind [`ErrorKind::TimedOut`] if no credit was granted in time,
    /// or any other [`Error`] for the reasons listed in [`Host::send`].
    pub fn send_timeout(&self, payload: &[u8], timeout: Duration) -> std::io::Result<()> {
        let payload = Self::payload(payload)?;

        if !self.credit.acquire(Some(timeout)) {
            return Err(Error::new(ErrorKind::TimedOut, "No send credit granted."));
        }

        self.enqueue(payload)
    }

    /// Blocks until the next in-order payload is delivered.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] if the engine is gone.
    pub fn receive(&self) -> std::io::Result<Payload> {
        self.delivered.recv().map_err(|_| disconnected())
    }

    /// Waits at most `timeout` for the next in-order payload.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] of kind [`ErrorKind::TimedOut`] if nothing was delivered in time,
    /// or of kind [`ErrorKind::BrokenPipe`] if the engine is gone.
    pub fn receive_timeout(&self, timeout: Duration) -> std::io::Result<Payload> {
        self.delivered
            .recv_timeout(timeout)
            .map_err(|error| match error {
                RecvTimeoutError::Timeout => {
                    Error::new(ErrorKind::TimedOut, "No payload delivered.")
                }
                RecvTimeoutError::Disconnected => disconnected(),
            })
    }

    /// Returns the amount of payloads that may currently be sent without blocking.
    #[must_use]
    pub fn credit(&self) -> usize {
        self.credit.available()
    }

    fn payload(payload: &[u8]) -> std::io::Result<Payload> {
        Payload::try_from(payload).map_err(|()| {
            Error::new(
                ErrorKind::InvalidInput,
                format!(
                    "Payload too large: {} > {MAX_PAYLOAD_SIZE}",
                    payload.len()
                ),
            )
        })
    }

    fn enqueue(&self, payload: Payload) -> std::io::Result<()> {
        trace!("Queueing payload: {:#04X?}", payload);
        self.outgoing.send(payload).map_err(|_| disconnected())?;
        self.events.send(Event::Ready).map_err(|_| disconnected())
    }
}

fn disconnected() -> Error {
    Error::new(ErrorKind::BrokenPipe, "Engine disconnected.")
}

#[cfg(test)]
mod tests {
    use std::io::ErrorKind;
    use std::sync::mpsc::channel;
    use std::time::Duration;

    use crate::event::Event;
    use crate::network::{pair, NetworkLayer};
    use crate::types::{Payload, MAX_PAYLOAD_SIZE};

    #[test]
    fn test_send_consumes_credit_and_signals_ready() {
        let (events, receiver) = channel();
        let (host, mut channels) = pair(events);
        channels.grant_credit(2);
        host.send(b"one").unwrap();
        assert_eq!(host.credit(), 1);
        assert_eq!(receiver.try_recv(), Ok(Event::Ready));
        assert_eq!(channels.pull().as_deref(), Some(b"one".as_slice()));
        assert_eq!(channels.pull(), None);
    }

    #[test]
    fn test_send_without_credit_times_out() {
        let (events, receiver) = channel();
        let (host, _channels) = pair(events);
        assert_eq!(
            host.send_timeout(b"blocked", Duration::from_millis(20))
                .unwrap_err()
                .kind(),
            ErrorKind::TimedOut
        );
        assert!(receiver.try_recv().is_err());
    }

    #[test]
    fn test_send_too_large() {
        let (events, _receiver) = channel();
        let (host, mut channels) = pair(events);
        channels.grant_credit(1);
        assert_eq!(
            host.send(&[0; MAX_PAYLOAD_SIZE + 1]).unwrap_err().kind(),
            ErrorKind::InvalidInput
        );
        assert_eq!(host.credit(), 1);
    }

    #[test]
    fn test_receive_delivered() {
        let (events, _receiver) = channel();
        let (host, mut channels) = pair(events);
        channels.push(Payload::try_from(b"delivered".as_slice()).unwrap());
        assert_eq!(host.receive().unwrap().as_slice(), b"delivered");
        assert_eq!(
            host.receive_timeout(Duration::from_millis(10))
                .unwrap_err()
                .kind(),
            ErrorKind::TimedOut
        );
    }

    #[test]
    fn test_receive_disconnected() {
        let (events, _receiver) = channel();
        let (host, channels) = pair(events);
        drop(channels);
        assert_eq!(host.receive().unwrap_err().kind(), ErrorKind::BrokenPipe);
    }
}
