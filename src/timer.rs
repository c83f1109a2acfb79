//! Retransmit and acknowledgement delay timers.
//!
//! The engine owns one retransmit timer per outbound buffer slot and one shared
//! acknowledgement delay timer. Timers never touch engine state. On expiry they
//! only emit an [`Event`](crate::Event) into the engine's event stream.

use std::time::Duration;

pub use self::thread::TimerThread;
use crate::sequence::SeqNum;

mod thread;

/// A service providing one-shot, cancelable and restartable timers.
pub trait TimerService {
    /// Starts the retransmit timer for `seq`, replacing any live timer of its buffer slot.
    fn start_timer(&mut self, seq: SeqNum, duration: Duration);

    /// Stops the retransmit timer of the buffer slot of `seq`.
    ///
    /// Returns `true` if a live timer was cancelled.
    /// Stopping an expired or never started timer is a no-op.
    fn stop_timer(&mut self, seq: SeqNum) -> bool;

    /// Starts or restarts the acknowledgement delay timer.
    fn start_ack_timer(&mut self, duration: Duration);

    /// Stops the acknowledgement delay timer.
    ///
    /// Returns `true` if a live timer was cancelled.
    fn stop_ack_timer(&mut self) -> bool;
}
