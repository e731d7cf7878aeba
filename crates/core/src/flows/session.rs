//! Per-wizard session guard.
//!
//! A wizard owns one [`SessionGuard`]. Starting a network call takes a
//! [`RequestTicket`], which marks the wizard busy until the ticket is dropped.
//! Closing the wizard rotates the session, so a ticket from the old session
//! no longer matches and its late response is discarded.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use uuid::Uuid;

#[derive(Debug)]
pub struct SessionGuard {
    session_id: Uuid,
    in_flight: Arc<AtomicBool>,
}

impl Default for SessionGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionGuard {
    pub fn new() -> Self {
        Self { session_id: Uuid::new_v4(), in_flight: Arc::new(AtomicBool::new(false)) }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Returns `None` while another request of this session is outstanding.
    pub fn begin(&self) -> Option<RequestTicket> {
        self.in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| RequestTicket {
                session_id: self.session_id,
                in_flight: Arc::clone(&self.in_flight),
            })
    }

    /// Starts a fresh session. Outstanding tickets keep the old flag, so the
    /// new session starts idle.
    pub fn rotate(&mut self) {
        self.session_id = Uuid::new_v4();
        self.in_flight = Arc::new(AtomicBool::new(false));
    }

    pub fn admits(&self, ticket: &RequestTicket) -> bool {
        ticket.session_id == self.session_id
    }
}

/// Proof that a request is in flight. Dropping it clears the busy flag on
/// every exit path, including early returns and panics.
#[derive(Debug)]
pub struct RequestTicket {
    session_id: Uuid,
    in_flight: Arc<AtomicBool>,
}

impl RequestTicket {
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }
}

impl Drop for RequestTicket {
    fn drop(&mut self) {
        self.in_flight.store(false, Ordering::SeqCst);
    }
}

/// What a wizard did with a completed response.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResponseDisposition {
    Applied,
    /// The response belonged to a session that has since been closed.
    Discarded,
}

#[cfg(test)]
mod tests {
    use super::SessionGuard;

    #[test]
    fn ticket_marks_guard_busy_until_dropped() {
        let guard = SessionGuard::new();
        let ticket = guard.begin().expect("idle guard hands out a ticket");
        assert!(guard.is_busy());
        assert!(guard.begin().is_none(), "one request in flight at a time");
        assert!(guard.admits(&ticket));

        drop(ticket);
        assert!(!guard.is_busy());
        assert!(guard.begin().is_some());
    }

    #[test]
    fn rotation_orphans_outstanding_tickets() {
        let mut guard = SessionGuard::new();
        let before = guard.session_id();
        let ticket = guard.begin().expect("ticket");

        guard.rotate();
        assert_ne!(guard.session_id(), before);
        assert!(!guard.is_busy(), "new session starts idle");
        assert!(!guard.admits(&ticket));

        let fresh = guard.begin().expect("new session accepts requests");
        drop(ticket);
        assert!(guard.is_busy(), "dropping a stale ticket leaves the new session alone");
        drop(fresh);
        assert!(!guard.is_busy());
    }
}
