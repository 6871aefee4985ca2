//! Debounced activation scheduler.
//!
//! One pending check at a time, keyed by the slot it was armed for. Arming
//! again supersedes the previous check outright: there is no raw timer
//! handle to race against, only a deadline and a ticket. The event loop
//! awaits `expired()` (or polls `take_expired()` on its own clock) and hands
//! the ticket back to the controller, which verifies the slot is still the
//! active one before calling out.

use std::time::Duration;

use tokio::time::{sleep_until, Instant};

use super::item::SlotRef;

/// Delay between the last highlight change and the activation callback.
pub const DEFAULT_ACTIVATION_DELAY: Duration = Duration::from_millis(150);

/// Identifies one armed check. Tickets from superseded checks never match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivationTicket {
    seq: u64,
    pub slot: SlotRef,
}

#[derive(Debug, Clone, Copy)]
struct Pending {
    ticket: ActivationTicket,
    deadline: Instant,
}

#[derive(Debug)]
pub struct ActivationScheduler {
    delay: Duration,
    pending: Option<Pending>,
    seq: u64,
}

impl ActivationScheduler {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
            seq: 0,
        }
    }

    /// Arm a fresh check for `slot`, replacing whatever was pending.
    pub fn arm(&mut self, slot: SlotRef) -> ActivationTicket {
        self.seq += 1;
        let ticket = ActivationTicket {
            seq: self.seq,
            slot,
        };
        self.pending = Some(Pending {
            ticket,
            deadline: Instant::now() + self.delay,
        });
        ticket
    }

    /// Drop the pending check, if any.
    pub fn cancel(&mut self) -> Option<ActivationTicket> {
        self.pending.take().map(|p| p.ticket)
    }

    pub fn pending(&self) -> Option<ActivationTicket> {
        self.pending.map(|p| p.ticket)
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.map(|p| p.deadline)
    }

    /// Resolve once the pending check's deadline passes.
    ///
    /// Never resolves while nothing is pending. Cancel-safe: dropping the
    /// future leaves the check armed, so it can sit in a `select!` loop.
    pub async fn expired(&self) -> ActivationTicket {
        match self.pending {
            Some(Pending { ticket, deadline }) => {
                sleep_until(deadline).await;
                ticket
            }
            None => std::future::pending().await,
        }
    }

    /// Take the pending ticket if its deadline is at or before `now`.
    pub fn take_expired(&mut self, now: Instant) -> Option<ActivationTicket> {
        match self.pending {
            Some(p) if p.deadline <= now => {
                self.pending = None;
                Some(p.ticket)
            }
            _ => None,
        }
    }

    /// Consume `ticket` if it is the pending one. Stale tickets return false.
    pub fn settle(&mut self, ticket: ActivationTicket) -> bool {
        match self.pending {
            Some(p) if p.ticket == ticket => {
                self.pending = None;
                true
            }
            _ => false,
        }
    }
}

impl Default for ActivationScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_ACTIVATION_DELAY)
    }
}
