use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// Send credit shared between the engine and the host.
#[derive(Debug, Default)]
pub struct Credit {
    available: Mutex<usize>,
    granted: Condvar,
}

impl Credit {
    /// Adds `amount` units of credit and wakes blocked senders.
    pub fn grant(&self, amount: usize) {
        *self.lock() += amount;
        self.granted.notify_all();
    }

    /// Takes one unit of credit, blocking until it becomes available or `timeout` elapses.
    ///
    /// Returns whether a unit was taken.
    pub fn acquire(&self, timeout: Option<Duration>) -> bool {
        let deadline = timeout.map(|timeout| Instant::now() + timeout);
        let mut available = self.lock();

        while *available == 0 {
            available = match deadline {
                Some(deadline) => {
                    let remaining = deadline.saturating_duration_since(Instant::now());

                    if remaining.is_zero() {
                        return false;
                    }

                    self.granted
                        .wait_timeout(available, remaining)
                        .unwrap_or_else(PoisonError::into_inner)
                        .0
                }
                None => self
                    .granted
                    .wait(available)
                    .unwrap_or_else(PoisonError::into_inner),
            };
        }

        *available -= 1;
        true
    }

    /// Returns the currently available credit.
    pub fn available(&self) -> usize {
        *self.lock()
    }

    fn lock(&self) -> MutexGuard<'_, usize> {
        self.available
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread::spawn;
    use std::time::Duration;

    use super::Credit;

    #[test]
    fn test_acquire_granted() {
        let credit = Credit::default();
        credit.grant(2);
        assert!(credit.acquire(None));
        assert!(credit.acquire(Some(Duration::ZERO)));
        assert_eq!(credit.available(), 0);
    }

    #[test]
    fn test_acquire_times_out() {
        let credit = Credit::default();
        assert!(!credit.acquire(Some(Duration::from_millis(20))));
    }

    #[test]
    fn test_grant_wakes_waiter() {
        let credit = Arc::new(Credit::default());
        let waiter = {
            let credit = credit.clone();
            spawn(move || credit.acquire(Some(Duration::from_secs(5))))
        };
        credit.grant(1);
        assert!(waiter.join().unwrap());
    }
}
