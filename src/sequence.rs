//! Circular sequence number arithmetic.
//!
//! Sequence numbers live on a ring of [`RING_SIZE`] values.
//! Both windows are at most [`POOL_SIZE`] wide, which is half the ring,
//! so an old and a new frame sharing a buffer slot can never both be in a window.

use std::fmt::Display;

/// The highest sequence number.
pub const MAX_SEQ: u8 = 7;

/// The amount of distinct sequence numbers.
pub const RING_SIZE: u8 = MAX_SEQ + 1;

/// The amount of buffer slots per direction, which is also the maximum window size.
pub const POOL_SIZE: usize = RING_SIZE as usize / 2;

const _: () = assert!(RING_SIZE % 2 == 0, "ring size must be even");

/// A sequence number on the ring `[0, RING_SIZE)`.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[repr(transparent)]
pub struct SeqNum(u8);

impl SeqNum {
    /// The sequence number zero.
    pub const ZERO: Self = Self(0);

    /// Creates a sequence number, wrapping `n` onto the ring.
    #[must_use]
    pub const fn from_u8_lossy(n: u8) -> Self {
        Self(n % RING_SIZE)
    }

    /// Returns the number as an u8.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self.0
    }

    /// Returns the successor on the ring.
    #[must_use]
    pub const fn inc(self) -> Self {
        Self((self.0 + 1) % RING_SIZE)
    }

    /// Returns the predecessor on the ring.
    ///
    /// This is the cumulative acknowledgement for a receiver expecting `self`.
    #[must_use]
    pub const fn prev(self) -> Self {
        Self((self.0 + MAX_SEQ) % RING_SIZE)
    }

    /// Returns the buffer slot index this sequence number maps to.
    #[must_use]
    pub const fn slot(self) -> usize {
        self.0 as usize % POOL_SIZE
    }

    /// Returns the distance from `from` forward to `self` on the ring.
    #[must_use]
    pub const fn distance_from(self, from: Self) -> u8 {
        (self.0 + RING_SIZE - from.0) % RING_SIZE
    }
}

/// Determines whether `b` lies in the circular half-open interval `[a, c)`.
#[must_use]
pub const fn between(a: SeqNum, b: SeqNum, c: SeqNum) -> bool {
    let (a, b, c) = (a.0, b.0, c.0);
    (a <= b && b < c) || (c < a && a <= b) || (b < c && c < a)
}

/// Returns `(n + 1) mod RING_SIZE`.
#[must_use]
pub const fn inc(n: SeqNum) -> SeqNum {
    n.inc()
}

impl Display for SeqNum {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl PartialEq<u8> for SeqNum {
    fn eq(&self, other: &u8) -> bool {
        self.0 == *other
    }
}

impl From<SeqNum> for u8 {
    fn from(value: SeqNum) -> Self {
        value.as_u8()
    }
}

impl TryFrom<u8> for SeqNum {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if value < RING_SIZE {
            Ok(Self(value))
        } else {
            Err(value)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{between, inc, SeqNum, MAX_SEQ, POOL_SIZE, RING_SIZE};

    fn ring() -> impl Iterator<Item = SeqNum> + Clone {
        (0..RING_SIZE).map(SeqNum::from_u8_lossy)
    }

    #[test]
    fn test_constants() {
        assert_eq!(RING_SIZE, 8);
        assert_eq!(POOL_SIZE, 4);
    }

    #[test]
    fn test_from_u8_lossy() {
        for n in u8::MIN..=u8::MAX {
            assert_eq!(SeqNum::from_u8_lossy(n).as_u8(), n % RING_SIZE);
        }
    }

    #[test]
    fn test_try_from() {
        for n in 0..RING_SIZE {
            assert_eq!(SeqNum::try_from(n), Ok(SeqNum::from_u8_lossy(n)));
        }

        assert_eq!(SeqNum::try_from(RING_SIZE), Err(RING_SIZE));
        assert_eq!(SeqNum::try_from(u8::MAX), Err(u8::MAX));
    }

    #[test]
    fn test_between_matches_circular_interval() {
        for a in ring() {
            for b in ring() {
                for c in ring() {
                    // Walk forward from `a` until `c`, collecting the interval.
                    let mut member = false;
                    let mut cursor = a;

                    while cursor != c {
                        if cursor == b {
                            member = true;
                        }

                        cursor = cursor.inc();
                    }

                    assert_eq!(between(a, b, c), member, "between({a}, {b}, {c})");
                }
            }
        }
    }

    #[test]
    fn test_between_wraparound() {
        let n = SeqNum::from_u8_lossy;
        assert!(between(n(6), n(7), n(2)));
        assert!(between(n(6), n(0), n(2)));
        assert!(between(n(6), n(1), n(2)));
        assert!(!between(n(6), n(2), n(2)));
        assert!(!between(n(6), n(5), n(2)));
        assert!(!between(n(3), n(3), n(3)));
    }

    #[test]
    fn test_inc() {
        for n in ring() {
            assert_eq!(inc(n).as_u8(), (n.as_u8() + 1) % RING_SIZE);
        }
    }

    #[test]
    fn test_inc_full_cycle() {
        for start in ring() {
            let mut n = start;

            for _ in 0..RING_SIZE {
                n = inc(n);
            }

            assert_eq!(n, start);
        }
    }

    #[test]
    fn test_prev() {
        assert_eq!(SeqNum::ZERO.prev(), MAX_SEQ);
        assert_eq!(SeqNum::from_u8_lossy(5).prev(), 4);

        for n in ring() {
            assert_eq!(n.prev().inc(), n);
        }
    }

    #[test]
    fn test_slot() {
        for n in ring() {
            assert_eq!(n.slot(), n.as_u8() as usize % POOL_SIZE);
        }

        assert_eq!(SeqNum::from_u8_lossy(1).slot(), SeqNum::from_u8_lossy(5).slot());
    }

    #[test]
    fn test_distance_from() {
        let n = SeqNum::from_u8_lossy;
        assert_eq!(n(3).distance_from(n(1)), 2);
        assert_eq!(n(1).distance_from(n(6)), 3);
        assert_eq!(n(4).distance_from(n(4)), 0);
    }

    #[test]
    fn test_display() {
        assert_eq!(SeqNum::from_u8_lossy(13).to_string(), "5");
    }
}
