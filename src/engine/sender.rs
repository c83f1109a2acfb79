//! Sender half of the engine.
//!
//! The sender retransmits a `DATA` frame if it
//!
//!   * has been `NAK`ed by the peer or
//!   * has not been acknowledged by the peer in time.
//!
use log::{debug, trace, warn};

use super::Engine;
use crate::frame::Kind;
use crate::network::NetworkLayer;
use crate::sequence::SeqNum;
use crate::timer::TimerService;
use crate::transport::Transport;

impl<T, N, E, S> Engine<T, N, E, S>
where
    T: Transport,
    N: NetworkLayer,
    S: TimerService,
{
    /// Fetches a new payload from the network layer and transmits it.
    pub(super) fn handle_ready(&mut self) -> std::io::Result<()> {
        // Unreachable for a host honoring its credit, which never exceeds the free window slots.
        if self.state.is_sender_window_full() {
            warn!("Network layer exceeded its credit: ready while the sender window is full. Ignoring.");
            return Ok(());
        }

        let Some(payload) = self.network.pull() else {
            warn!("Network layer ready without a payload. Ignoring.");
            return Ok(());
        };

        let seq = self.state.allocate();
        self.buffers.store_outbound(seq, payload);
        self.send_frame(Kind::Data, seq)
    }

    /// Retransmits the frame implied by a `NAK`, if it is still unacknowledged.
    pub(super) fn handle_nak(&mut self, ack: SeqNum) -> std::io::Result<()> {
        let seq = ack.inc();

        if self.state.in_sender_window(seq) {
            debug!("Retransmitting NAK'ed frame #{seq}.");
            self.send_frame(Kind::Data, seq)
        } else {
            trace!("NAK'ed frame #{seq} is not outstanding.");
            Ok(())
        }
    }

    /// Releases all outbound frames covered by the cumulative acknowledgement `ack`.
    pub(super) fn ack_sent_frames(&mut self, ack: SeqNum) {
        while self.state.in_sender_window(ack) {
            let seq = self.state.ack_expected();
            self.timers.stop_timer(seq);
            trace!("ACKed frame #{seq}.");
            self.state.advance_ack_expected();
            self.network.grant_credit(1);
        }
    }

    /// Retransmits the frame whose retransmit timer expired.
    pub(super) fn handle_timeout(&mut self, seq: SeqNum) -> std::io::Result<()> {
        if self.state.in_sender_window(seq) {
            debug!("Retransmitting timed-out frame #{seq}.");
            self.send_frame(Kind::Data, seq)
        } else {
            warn!("Ignoring stale timeout of frame #{seq}.");
            Ok(())
        }
    }
}
