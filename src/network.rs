//! The upper layer producing and consuming payloads.

use std::sync::mpsc::{channel, Sender};
use std::sync::Arc;

pub use self::channels::Channels;
use self::credit::Credit;
pub use self::host::Host;
use crate::event::Event;
use crate::types::Payload;

mod channels;
mod credit;
mod host;

/// The network layer as seen by the engine.
pub trait NetworkLayer {
    /// Takes the next payload to send.
    ///
    /// The engine only calls this in response to an [`Event::Ready`].
    /// Returns `None` if no payload is queued.
    fn pull(&mut self) -> Option<Payload>;

    /// Delivers an in-order payload.
    fn push(&mut self, payload: Payload);

    /// Permits the network layer to submit `credit` more payloads.
    fn grant_credit(&mut self, credit: usize);
}

/// Creates a connected pair of an application [`Host`] and the engine side [`Channels`].
///
/// The host emits an [`Event::Ready`] into `events` for every payload it queues.
#[must_use]
pub fn pair(events: Sender<Event>) -> (Host, Channels) {
    let credit = Arc::new(Credit::default());
    let (outgoing_tx, outgoing_rx) = channel();
    let (delivered_tx, delivered_rx) = channel();
    (
        Host::new(outgoing_tx, delivered_rx, events, credit.clone()),
        Channels::new(outgoing_rx, delivered_tx, credit),
    )
}
