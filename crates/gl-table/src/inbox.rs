//! Duplicate suppression for bus envelopes.

use crate::bus::{Envelope, SessionEvent};

/// Tracks the highest sequence number applied for one session.
///
/// The bus delivers in sequence order but may repeat envelopes after a
/// replay; anything at or below the watermark is a repeat. A
/// [`SessionEvent::Resync`] always passes and moves the watermark, since
/// the consumer refetches everything up to it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Inbox {
    applied: u64,
}

impl Inbox {
    /// An inbox that has applied nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// An inbox that has already applied everything up to `seq`.
    pub fn starting_at(seq: u64) -> Self {
        Self { applied: seq }
    }

    /// Highest sequence number applied.
    pub fn applied(&self) -> u64 {
        self.applied
    }

    /// Returns true if `envelope` should be applied, and records it.
    pub fn accept(&mut self, envelope: &Envelope) -> bool {
        if matches!(envelope.event, SessionEvent::Resync) {
            self.applied = self.applied.max(envelope.seq);
            return true;
        }
        if envelope.seq <= self.applied {
            return false;
        }
        self.applied = envelope.seq;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionId;
    use chrono::Utc;

    fn env(seq: u64, event: SessionEvent) -> Envelope {
        Envelope {
            session_id: SessionId::new(),
            seq,
            sent_at: Utc::now(),
            event,
        }
    }

    #[test]
    fn repeats_are_dropped() {
        let mut inbox = Inbox::new();
        assert!(inbox.accept(&env(1, SessionEvent::RefreshSession)));
        assert!(inbox.accept(&env(2, SessionEvent::RefreshSession)));
        assert!(!inbox.accept(&env(2, SessionEvent::RefreshSession)));
        assert!(!inbox.accept(&env(1, SessionEvent::RefreshSession)));
        assert_eq!(inbox.applied(), 2);
    }

    #[test]
    fn resync_always_passes() {
        let mut inbox = Inbox::starting_at(9);
        assert!(inbox.accept(&env(5, SessionEvent::Resync)));
        assert_eq!(inbox.applied(), 9);
        assert!(inbox.accept(&env(12, SessionEvent::Resync)));
        assert!(!inbox.accept(&env(11, SessionEvent::RefreshSession)));
    }
}
