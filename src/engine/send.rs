use log::{debug, trace};

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
    /// Builds and transmits a frame, piggybacking the cumulative acknowledgement.
    ///
    /// `seq` is only meaningful for `DATA` frames.
    ///
    /// Timers are updated even if the transport fails,
    /// so a `DATA` frame that never left is recovered like a lost one.
    pub(super) fn send_frame(&mut self, kind: Kind, seq: SeqNum) -> std::io::Result<()> {
        let ack = self.state.ack_number();
        let frame = match kind {
            Kind::Data => Frame::data(seq, ack, self.buffers.outbound(seq).clone()),
            Kind::Ack => Frame::ack(ack),
            Kind::Nak => Frame::nak(ack),
        };

        if kind == Kind::Nak {
            self.state.set_no_nak(false);
        }

        debug!("Sending {frame}");
        trace!("Payload: {:#04X?}", frame.payload());
        let result = self.transport.send(&frame);

        if kind == Kind::Data {
            self.timers
                .start_timer(seq, self.config.retransmit_timeout());
        }

        self.timers.stop_ack_timer();
        result
    }
}
