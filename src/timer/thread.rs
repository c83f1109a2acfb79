use std::sync::mpsc::{SendError, Sender};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{spawn, JoinHandle};
use std::time::{Duration, Instant};

use log::{debug, error, trace};

use super::TimerService;
use crate::event::Event;
use crate::sequence::{SeqNum, POOL_SIZE};

/// Timers backed by a dedicated thread.
///
/// Expiry and cancellation are serialized through a shared deadline table,
/// so a timer that was cancelled successfully never emits its event.
#[derive(Debug)]
pub struct TimerThread {
    shared: Arc<Shared>,
    thread: Option<JoinHandle<()>>,
}

impl TimerThread {
    /// Spawns the timer thread emitting expiry events into `events`.
    #[must_use]
    pub fn spawn(events: Sender<Event>) -> Self {
        let shared = Arc::new(Shared::default());
        let worker = shared.clone();

        Self {
            shared,
            thread: Some(spawn(move || worker.run(&events))),
        }
    }

    fn deadlines(&self) -> MutexGuard<'_, Deadlines> {
        self.shared.lock()
    }
}

impl TimerService for TimerThread {
    fn start_timer(&mut self, seq: SeqNum, duration: Duration) {
        trace!("Starting retransmit timer for frame #{seq}.");
        self.deadlines().retransmit[seq.slot()] = Some((seq, Instant::now() + duration));
        self.shared.changed.notify_one();
    }

    fn stop_timer(&mut self, seq: SeqNum) -> bool {
        let cancelled = self.deadlines().retransmit[seq.slot()].take().is_some();
        trace!("Stopping retransmit timer for frame #{seq}: {cancelled}");
        cancelled
    }

    fn start_ack_timer(&mut self, duration: Duration) {
        self.deadlines().ack = Some(Instant::now() + duration);
        self.shared.changed.notify_one();
    }

    fn stop_ack_timer(&mut self) -> bool {
        self.deadlines().ack.take().is_some()
    }
}

impl Drop for TimerThread {
    fn drop(&mut self) {
        self.deadlines().shutdown = true;
        self.shared.changed.notify_one();

        if let Some(thread) = self.thread.take() {
            thread.join().unwrap_or_else(|_| {
                error!("Failed to join timer thread.");
            });
        }
    }
}

#[derive(Debug, Default)]
struct Shared {
    deadlines: Mutex<Deadlines>,
    changed: Condvar,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Deadlines> {
        self.deadlines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn run(&self, events: &Sender<Event>) {
        let mut deadlines = self.lock();

        loop {
            if deadlines.shutdown {
                debug!("Timer thread shutting down.");
                return;
            }

            let now = Instant::now();

            if deadlines.expire(now, events).is_err() {
                debug!("Event channel closed, timer thread exiting.");
                return;
            }

            deadlines = match deadlines.next() {
                Some(deadline) => {
                    self.changed
                        .wait_timeout(deadlines, deadline.saturating_duration_since(now))
                        .unwrap_or_else(PoisonError::into_inner)
                        .0
                }
                None => self
                    .changed
                    .wait(deadlines)
                    .unwrap_or_else(PoisonError::into_inner),
            };
        }
    }
}

#[derive(Debug, Default)]
struct Deadlines {
    retransmit: [Option<(SeqNum, Instant)>; POOL_SIZE],
    ack: Option<Instant>,
    shutdown: bool,
}

impl Deadlines {
    /// Returns the earliest live deadline.
    fn next(&self) -> Option<Instant> {
        self.retransmit
            .iter()
            .flatten()
            .map(|&(_, deadline)| deadline)
            .chain(self.ack)
            .min()
    }

    /// Removes all expired timers and emits their events.
    fn expire(&mut self, now: Instant, events: &Sender<Event>) -> Result<(), SendError<Event>> {
        for entry in &mut self.retransmit {
            if let Some((seq, deadline)) = *entry {
                if deadline <= now {
                    *entry = None;
                    trace!("Retransmit timer for frame #{seq} expired.");
                    events.send(Event::Timeout(seq))?;
                }
            }
        }

        if let Some(deadline) = self.ack {
            if deadline <= now {
                self.ack = None;
                trace!("Ack timer expired.");
                events.send(Event::AckTimeout)?;
            }
        }

        Ok(())
    }
}
