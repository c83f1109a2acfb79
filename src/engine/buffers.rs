use crate::sequence::{SeqNum, POOL_SIZE};
use crate::types::Payload;

/// Buffer pool of the engine.
///
/// Each direction has [`POOL_SIZE`] slots, addressed by `seq mod POOL_SIZE`.
/// An inbound slot holding a payload doubles as its arrival flag.
#[derive(Debug, Default)]
pub struct Buffers {
    outbound: [Payload; POOL_SIZE],
    inbound: [Option<Payload>; POOL_SIZE],
}

impl Buffers {
    /// Stores the payload to send as `seq`, overwriting the freed slot.
    pub fn store_outbound(&mut self, seq: SeqNum, payload: Payload) {
        self.outbound[seq.slot()] = payload;
    }

    /// Returns the payload last sent as `seq`.
    pub fn outbound(&self, seq: SeqNum) -> &Payload {
        &self.outbound[seq.slot()]
    }

    /// Returns whether the slot of `seq` holds an undelivered payload.
    pub fn arrived(&self, seq: SeqNum) -> bool {
        self.inbound[seq.slot()].is_some()
    }

    /// Buffers a received payload and marks its slot as arrived.
    pub fn store_inbound(&mut self, seq: SeqNum, payload: Payload) {
        self.inbound[seq.slot()] = Some(payload);
    }

    /// Takes the buffered payload of `seq`, clearing its arrival flag.
    pub fn take_inbound(&mut self, seq: SeqNum) -> Option<Payload> {
        self.inbound[seq.slot()].take()
    }
}
