//! Fault-injecting in-memory link.
//!
//! The link connects two [`Endpoint`]s, each implementing [`Transport`].
//! Every frame handed to an endpoint is subjected to a seeded fault model
//! before it reaches the peer:
//!
//! | Fault       | Effect                                                       |
//! |-------------|--------------------------------------------------------------|
//! | Loss        | The frame is silently dropped.                               |
//! | Corruption  | A random bit of the encoded frame is flipped.                |
//! | Duplication | The frame is delivered twice.                                |
//! | Reordering  | The frame is held back and delivered after the next frame.   |
//!
//! Corrupted frames are run through the real codec, so the peer sees them
//! as [`Event::Corrupt`] exactly like a damaged frame on a serial line.

use std::io::{Error, ErrorKind};
use std::sync::mpsc::{channel, Receiver, Sender, TryRecvError};

use log::{debug, trace};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::event::Event;
use crate::frame::Frame;
use crate::transport::Transport;

/// Fault probabilities of a simulated link.
///
/// All probabilities are in the range `[0.0, 1.0]` and apply independently per frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LinkConfig {
    /// Probability that a frame is dropped.
    pub loss_rate: f64,
    /// Probability that a frame is damaged.
    pub corruption_rate: f64,
    /// Probability that a frame is delivered twice.
    pub duplicate_rate: f64,
    /// Probability that a frame is overtaken by the next one.
    pub reorder_rate: f64,
}

/// One end of a simulated link.
#[derive(Debug)]
pub struct Endpoint {
    name: &'static str,
    config: LinkConfig,
    rng: StdRng,
    frames: Receiver<Frame>,
    peer_frames: Sender<Frame>,
    peer_events: Sender<Event>,
    held: Option<Frame>,
}

/// Creates two linked endpoints.
///
/// Endpoint `a` reports arrivals into `events_a`, endpoint `b` into `events_b`.
/// Both endpoints derive their fault sequences from `seed`, so runs are reproducible.
#[must_use]
pub fn pair(
    config: LinkConfig,
    seed: u64,
    events_a: Sender<Event>,
    events_b: Sender<Event>,
) -> (Endpoint, Endpoint) {
    let (to_a, frames_a) = channel();
    let (to_b, frames_b) = channel();
    (
        Endpoint {
            name: "A",
            config,
            rng: StdRng::seed_from_u64(seed),
            frames: frames_a,
            peer_frames: to_b,
            peer_events: events_b,
            held: None,
        },
        Endpoint {
            name: "B",
            config,
            rng: StdRng::seed_from_u64(seed.rotate_left(32) ^ 0x5357_5050),
            frames: frames_b,
            peer_frames: to_a,
            peer_events: events_a,
            held: None,
        },
    )
}

impl Endpoint {
    fn roll(&mut self, rate: f64) -> bool {
        self.rng.gen::<f64>() < rate
    }

    /// Hands a frame to the peer and signals its arrival.
    fn deliver(&mut self, frame: Frame) -> std::io::Result<()> {
        if self.roll(self.config.corruption_rate) {
            return self.corrupt(&frame);
        }

        let copies = if self.roll(self.config.duplicate_rate) {
            debug!("{}: duplicating {frame}", self.name);
            2
        } else {
            1
        };

        for _ in 0..copies {
            self.peer_frames
                .send(frame.clone())
                .map_err(|_| Error::new(ErrorKind::BrokenPipe, "Peer endpoint disconnected."))?;
            self.signal(Event::Arrival)?;
        }

        Ok(())
    }

    /// Flips a random bit of the encoded frame and lets the codec judge the result.
    fn corrupt(&mut self, frame: &Frame) -> std::io::Result<()> {
        let mut bytes: Vec<u8> = frame.into_iter().collect();
        let index = self.rng.gen_range(0..bytes.len());
        bytes[index] ^= 1_u8 << self.rng.gen_range(0..8_u8);

        match Frame::try_from(bytes.as_slice()) {
            Ok(frame) => {
                debug!("{}: damage to {frame} went undetected", self.name);
                self.peer_frames
                    .send(frame)
                    .map_err(|_| Error::new(ErrorKind::BrokenPipe, "Peer endpoint disconnected."))?;
                self.signal(Event::Arrival)
            }
            Err(error) => {
                debug!("{}: corrupting frame: {error}", self.name);
                self.signal(Event::Corrupt)
            }
        }
    }

    fn signal(&self, event: Event) -> std::io::Result<()> {
        self.peer_events
            .send(event)
            .map_err(|_| Error::new(ErrorKind::BrokenPipe, "Peer engine disconnected."))
    }
}

impl Transport for Endpoint {
    fn send(&mut self, frame: &Frame) -> std::io::Result<()> {
        if self.roll(self.config.loss_rate) {
            debug!("{}: dropping {frame}", self.name);
            return Ok(());
        }

        if self.held.is_none() && self.roll(self.config.reorder_rate) {
            debug!("{}: holding back {frame}", self.name);
            self.held = Some(frame.clone());
            return Ok(());
        }

        trace!("{}: transmitting {frame}", self.name);
        self.deliver(frame.clone())?;

        if let Some(held) = self.held.take() {
            trace!("{}: releasing {held}", self.name);
            self.deliver(held)?;
        }

        Ok(())
    }

    fn receive(&mut self) -> std::io::Result<Frame> {
        self.frames.try_recv().map_err(|error| match error {
            TryRecvError::Empty => Error::new(ErrorKind::WouldBlock, "No frame arrived."),
            TryRecvError::Disconnected => {
                Error::new(ErrorKind::BrokenPipe, "Peer endpoint disconnected.")
            }
        })
    }
}
