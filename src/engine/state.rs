use crate::sequence::{between, SeqNum, POOL_SIZE};

/// Window state of the engine.
///
/// The sender window is `[ack_expected, next_frame_to_send)`,
/// the receiver window is `[frame_expected, too_far)`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct State {
    ack_expected: SeqNum,
    next_frame_to_send: SeqNum,
    frame_expected: SeqNum,
    too_far: SeqNum,
    no_nak: bool,
}

impl State {
    pub(super) const fn new() -> Self {
        Self {
            ack_expected: SeqNum::ZERO,
            next_frame_to_send: SeqNum::ZERO,
            frame_expected: SeqNum::ZERO,
            too_far: SeqNum::from_u8_lossy(POOL_SIZE as u8),
            no_nak: true,
        }
    }

    /// Returns the oldest unacknowledged outbound sequence number.
    #[must_use]
    pub const fn ack_expected(&self) -> SeqNum {
        self.ack_expected
    }

    /// Returns the sequence number the next outbound frame will get.
    #[must_use]
    pub const fn next_frame_to_send(&self) -> SeqNum {
        self.next_frame_to_send
    }

    /// Returns the sequence number the network layer is waiting for.
    #[must_use]
    pub const fn frame_expected(&self) -> SeqNum {
        self.frame_expected
    }

    /// Returns the upper edge of the receiver window (exclusive).
    #[must_use]
    pub const fn too_far(&self) -> SeqNum {
        self.too_far
    }

    /// Returns whether no `NAK` is outstanding.
    #[must_use]
    pub const fn no_nak(&self) -> bool {
        self.no_nak
    }

    /// Returns the cumulative acknowledgement, i.e. the last frame received in order.
    #[must_use]
    pub const fn ack_number(&self) -> SeqNum {
        self.frame_expected.prev()
    }

    /// Returns the amount of unacknowledged outbound frames.
    #[must_use]
    pub const fn outstanding(&self) -> usize {
        self.next_frame_to_send.distance_from(self.ack_expected) as usize
    }

    /// Returns whether the sender window has no spare capacity.
    #[must_use]
    pub const fn is_sender_window_full(&self) -> bool {
        self.outstanding() >= POOL_SIZE
    }

    /// Returns whether `seq` is sent but not yet acknowledged.
    #[must_use]
    pub const fn in_sender_window(&self, seq: SeqNum) -> bool {
        between(self.ack_expected, seq, self.next_frame_to_send)
    }

    /// Returns whether `seq` may be accepted by the receiver.
    #[must_use]
    pub const fn in_receiver_window(&self, seq: SeqNum) -> bool {
        between(self.frame_expected, seq, self.too_far)
    }

    /// Allocates the next outbound sequence number.
    pub(super) fn allocate(&mut self) -> SeqNum {
        let seq = self.next_frame_to_send;
        self.next_frame_to_send = seq.inc();
        seq
    }

    /// Advances the lower edge of the sender window.
    pub(super) fn advance_ack_expected(&mut self) {
        self.ack_expected = self.ack_expected.inc();
    }

    /// Slides the receiver window by one.
    pub(super) fn advance_receiver_window(&mut self) {
        self.frame_expected = self.frame_expected.inc();
        self.too_far = self.too_far.inc();
    }

    pub(super) fn set_no_nak(&mut self, no_nak: bool) {
        self.no_nak = no_nak;
    }
}
