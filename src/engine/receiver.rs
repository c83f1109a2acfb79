//! Receiver half of the engine.

use log::{debug, trace, warn};

use super::Engine;
use crate::frame::{Frame, Kind};
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
    /// Fetches the arrived frame and processes it.
    ///
    /// Every frame carries a cumulative acknowledgement, which is always processed.
    pub(super) fn handle_arrival(&mut self) -> std::io::Result<()> {
        let frame = self.transport.receive()?;
        trace!("Received {frame}");
        let ack = frame.ack_num();

        let result = match frame.kind() {
            Kind::Data => self.handle_data(frame),
            Kind::Nak => self.handle_nak(ack),
            Kind::Ack => Ok(()),
        };

        self.ack_sent_frames(ack);
        result
    }

    /// Handles an undamaged `DATA` frame.
    ///
    /// The frame is buffered even if the `NAK` for a gap could not be sent.
    fn handle_data(&mut self, frame: Frame) -> std::io::Result<()> {
        let seq = frame.seq();

        let result = if seq != self.state.frame_expected() && self.state.no_nak() {
            debug!(
                "Received frame #{seq} while expecting #{}. Sending NAK.",
                self.state.frame_expected()
            );
            self.send_frame(Kind::Nak, SeqNum::ZERO)
        } else {
            self.timers.start_ack_timer(self.config.ack_timeout());
            Ok(())
        };

        if !self.state.in_receiver_window(seq) || self.buffers.arrived(seq) {
            debug!("Discarding duplicate or out-of-window frame #{seq}.");
            return result;
        }

        let Some(payload) = frame.into_payload() else {
            warn!("DATA frame #{seq} without payload. Discarding.");
            return result;
        };

        trace!("Buffering frame #{seq}.");
        self.buffers.store_inbound(seq, payload);
        self.deliver();
        result
    }

    /// Passes all consecutively arrived frames to the network layer and advances the window.
    fn deliver(&mut self) {
        while let Some(payload) = self.buffers.take_inbound(self.state.frame_expected()) {
            debug!("Delivering frame #{}.", self.state.frame_expected());
            self.network.push(payload);
            self.state.set_no_nak(true);
            self.state.advance_receiver_window();
            self.timers.start_ack_timer(self.config.ack_timeout());
        }
    }

    /// Requests a retransmission of the expected frame after a damaged frame arrived.
    pub(super) fn handle_corrupt(&mut self) -> std::io::Result<()> {
        if self.state.no_nak() {
            debug!(
                "Received damaged frame. Sending NAK for #{}.",
                self.state.frame_expected()
            );
            self.send_frame(Kind::Nak, SeqNum::ZERO)
        } else {
            trace!("Received damaged frame. NAK already outstanding.");
            Ok(())
        }
    }

    /// Sends a standalone acknowledgement since no outgoing frame could carry it in time.
    pub(super) fn handle_ack_timeout(&mut self) -> std::io::Result<()> {
        debug!("Ack timer expired. Sending ACK({}).", self.state.ack_number());
        self.send_frame(Kind::Ack, SeqNum::ZERO)
    }
}
