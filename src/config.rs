//! Engine timing configuration.

use std::fmt::{Display, Formatter};
use std::time::Duration;

/// Default time to wait for an acknowledgement before retransmitting a `DATA` frame.
pub const T_RETRANSMIT: Duration = Duration::from_millis(1600);

/// Default time to hold back an acknowledgement, hoping to piggyback it on outgoing data.
pub const T_ACK_DELAY: Duration = Duration::from_millis(20);

/// Timing configuration of the engine.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Config {
    retransmit_timeout: Duration,
    ack_timeout: Duration,
}

impl Config {
    /// Creates a new configuration.
    ///
    /// The retransmit timeout should exceed one round trip.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] if a duration is zero or the ack delay
    /// is not strictly shorter than the retransmit timeout.
    pub fn new(retransmit_timeout: Duration, ack_timeout: Duration) -> Result<Self, Error> {
        if retransmit_timeout.is_zero() || ack_timeout.is_zero() {
            return Err(Error::ZeroTimeout);
        }

        if ack_timeout >= retransmit_timeout {
            return Err(Error::AckDelayTooLong {
                ack_timeout,
                retransmit_timeout,
            });
        }

        Ok(Self {
            retransmit_timeout,
            ack_timeout,
        })
    }

    /// Returns the retransmit timeout.
    #[must_use]
    pub const fn retransmit_timeout(&self) -> Duration {
        self.retransmit_timeout
    }

    /// Returns the acknowledgement delay.
    #[must_use]
    pub const fn ack_timeout(&self) -> Duration {
        self.ack_timeout
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            retransmit_timeout: T_RETRANSMIT,
            ack_timeout: T_ACK_DELAY,
        }
    }
}

/// Invalid timing configuration.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Error {
    /// A timeout of zero was given.
    ZeroTimeout,
    /// The ack delay would stall the peer's retransmit timer.
    AckDelayTooLong {
        /// The requested ack delay.
        ack_timeout: Duration,
        /// The requested retransmit timeout.
        retransmit_timeout: Duration,
    },
}

impl std::error::Error for Error {}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ZeroTimeout => write!(f, "Timeouts must not be zero."),
            Self::AckDelayTooLong {
                ack_timeout,
                retransmit_timeout,
            } => write!(
                f,
                "Ack delay {ack_timeout:?} must be shorter than retransmit timeout {retransmit_timeout:?}."
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{Config, Error, T_ACK_DELAY, T_RETRANSMIT};

    #[test]
    fn test_default() {
        let config = Config::default();
        assert_eq!(config.retransmit_timeout(), T_RETRANSMIT);
        assert_eq!(config.ack_timeout(), T_ACK_DELAY);
        assert_eq!(Config::new(T_RETRANSMIT, T_ACK_DELAY), Ok(config));
    }

    #[test]
    fn test_zero_timeout() {
        assert_eq!(
            Config::new(Duration::ZERO, Duration::from_millis(1)),
            Err(Error::ZeroTimeout)
        );
        assert_eq!(
            Config::new(Duration::from_millis(1), Duration::ZERO),
            Err(Error::ZeroTimeout)
        );
    }

    #[test]
    fn test_ack_delay_too_long() {
        let timeout = Duration::from_millis(100);
        assert_eq!(
            Config::new(timeout, timeout),
            Err(Error::AckDelayTooLong {
                ack_timeout: timeout,
                retransmit_timeout: timeout
            })
        );
    }
}
