//! The selective-repeat protocol engine.
//!
//! The engine combines a sender and a receiver. It is the sole owner and mutator of
//! the windows, the buffer pool and the arrival tracker. All collaborators only
//! ever reach it through the event stream.

use log::{debug, error, info};

pub use self::state::State;
use self::buffers::Buffers;
use crate::config::Config;
use crate::event::{Event, EventSource};
use crate::network::NetworkLayer;
use crate::sequence::POOL_SIZE;
use crate::timer::TimerService;
use crate::transport::Transport;

mod buffers;
mod receiver;
mod send;
mod sender;
mod state;

/// Sliding window protocol engine.
///
/// # Usage
///
/// ```no_run
/// use std::sync::mpsc::channel;
/// use std::thread::spawn;
/// use swp::{network, open, Config, Engine, SerialTransport, TimerThread};
///
/// let (events, receiver) = channel();
/// let transport = SerialTransport::spawn(open("/dev/ttyUSB0", 115_200).unwrap(), events.clone()).unwrap();
/// let (host, channels) = network::pair(events.clone());
/// let timers = TimerThread::spawn(events);
/// let mut engine = Engine::new(transport, channels, receiver, timers, Config::default());
/// spawn(move || engine.run());
/// host.send(b"hello").unwrap();
/// println!("{:?}", host.receive().unwrap());
/// ```
#[derive(Debug)]
pub struct Engine<T, N, E, S> {
    transport: T,
    network: N,
    events: E,
    timers: S,
    config: Config,
    buffers: Buffers,
    state: State,
}

impl<T, N, E, S> Engine<T, N, E, S> {
    /// Creates a new engine with empty windows.
    #[must_use]
    pub fn new(transport: T, network: N, events: E, timers: S, config: Config) -> Self {
        Self {
            transport,
            network,
            events,
            timers,
            config,
            buffers: Buffers::default(),
            state: State::new(),
        }
    }

    /// Returns the current window state.
    #[must_use]
    pub const fn state(&self) -> &State {
        &self.state
    }

    /// Returns the timing configuration.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }
}

impl<T, N, E, S> Engine<T, N, E, S>
where
    T: Transport,
    N: NetworkLayer,
    E: EventSource,
    S: TimerService,
{
    /// Runs the event loop until the event source is closed.
    ///
    /// Failures while handling a single event are logged and do not stop the loop.
    pub fn run(&mut self) {
        self.start();

        loop {
            let event = match self.events.wait_for_event() {
                Ok(event) => event,
                Err(error) => {
                    info!("Event source closed ({error}), engine stopping.");
                    return;
                }
            };

            if let Err(error) = self.handle_event(event) {
                error!("Failed to handle {event}: {error}");
            }
        }
    }

    /// Grants the network layer enough credit to fill the sender window.
    pub fn start(&mut self) {
        info!("Engine started, granting {POOL_SIZE} unit(s) of credit.");
        self.network.grant_credit(POOL_SIZE);
    }

    /// Handles a single event.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`](std::io::Error) if the transport failed.
    pub fn handle_event(&mut self, event: Event) -> std::io::Result<()> {
        debug!("Handling {event}");

        match event {
            Event::Ready => self.handle_ready(),
            Event::Arrival => self.handle_arrival(),
            Event::Corrupt => self.handle_corrupt(),
            Event::Timeout(seq) => self.handle_timeout(seq),
            Event::AckTimeout => self.handle_ack_timeout(),
        }
    }
}
