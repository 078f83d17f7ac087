//! Cancellable one-shot timer
//!
//! A `TimerSlot` holds at most one pending deadline plus the payload to hand
//! back when it fires. Arming replaces whatever was pending, so a superseded
//! timer can never fire. The owner polls it with [`TimerSlot::take_if_due`],
//! usually from a `tokio::select!` branch sleeping until
//! [`TimerSlot::deadline`].

use tokio::time::Instant;

/// A single cancellable timer
#[derive(Debug)]
pub struct TimerSlot<T> {
    pending: Option<(Instant, T)>,
    generation: u64,
}

impl<T> Default for TimerSlot<T> {
    fn default() -> Self {
        Self {
            pending: None,
            generation: 0,
        }
    }
}

impl<T> TimerSlot<T> {
    /// Create an unarmed slot
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the timer, replacing any pending one
    ///
    /// Returns the generation of the new timer.
    pub fn arm(&mut self, deadline: Instant, payload: T) -> u64 {
        self.generation += 1;
        self.pending = Some((deadline, payload));
        self.generation
    }

    /// Drop the pending timer, if any
    pub fn cancel(&mut self) -> Option<T> {
        if self.pending.is_some() {
            self.generation += 1;
        }
        self.pending.take().map(|(_, payload)| payload)
    }

    /// Whether a timer is pending
    pub fn is_armed(&self) -> bool {
        self.pending.is_some()
    }

    /// Deadline of the pending timer
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(deadline, _)| *deadline)
    }

    /// Generation of the most recent arm or cancel
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Take the payload if the deadline has passed
    pub fn take_if_due(&mut self, now: Instant) -> Option<T> {
        match self.pending {
            Some((deadline, _)) if deadline <= now => {
                self.pending.take().map(|(_, payload)| payload)
            }
            _ => None,
        }
    }
}
