//! Selective-repeat sliding window protocol
//!
//! This library implements a full-duplex, selective-repeat sliding window protocol
//! with piggybacked cumulative acknowledgements, negative acknowledgements and
//! per-frame retransmit timers over an unreliable frame transport.
//!
//! The [`Engine`] is driven by a single stream of [`Event`]s. Its collaborators,
//! the [`Transport`], the [`NetworkLayer`] and the [`TimerService`],
//! only ever communicate with it through that stream.

use crc::{Crc, CRC_16_IBM_3740};

pub use config::Config;
pub use engine::{Engine, State};
pub use event::{Event, EventSource};
pub use frame::{Frame, Kind};
pub use network::{Channels, Host, NetworkLayer};
pub use sequence::{between, inc, SeqNum, MAX_SEQ, POOL_SIZE, RING_SIZE};
pub use timer::{TimerService, TimerThread};
pub use transport::{open, SerialTransport, Transport};
pub use types::{Payload, MAX_PAYLOAD_SIZE};

pub mod config;
mod engine;
pub mod event;
pub mod frame;
mod frame_buffer;
pub mod network;
mod protocol;
pub mod sequence;
pub mod simulator;
pub mod timer;
pub mod transport;
mod types;

const CRC: Crc<u16> = Crc::<u16>::new(&CRC_16_IBM_3740);
