//! The Keeper's live view of the party.

use std::collections::BTreeMap;

use gl_core::{Character, CharacterId, CharacterStatus, Track};
use serde::{Deserialize, Serialize};

use crate::bus::{Envelope, SessionEvent};
use crate::inbox::Inbox;
use crate::session::SessionId;

/// One investigator as the Keeper sees them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartyMember {
    /// Row id.
    pub character_id: CharacterId,
    /// Name.
    pub name: String,
    /// Occupation id.
    pub occupation: String,
    /// Hit points.
    pub hit_points: Track,
    /// Sanity.
    pub sanity: Track,
    /// Magic points.
    pub magic_points: Track,
    /// Status flags.
    pub status: CharacterStatus,
}

impl From<&Character> for PartyMember {
    fn from(c: &Character) -> Self {
        Self {
            character_id: c.id,
            name: c.name.clone(),
            occupation: c.occupation.clone(),
            hit_points: c.derived.hit_points,
            sanity: c.derived.sanity,
            magic_points: c.derived.magic_points,
            status: c.status,
        }
    }
}

/// What applying an envelope did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartyUpdate {
    /// The view changed.
    Applied,
    /// Duplicate, foreign session, or nothing to do.
    Ignored,
    /// The caller must refetch the party and call [`PartyView::refresh`].
    NeedsRefresh,
}

/// Party state kept current from bus envelopes.
#[derive(Debug, Clone)]
pub struct PartyView {
    session_id: SessionId,
    members: BTreeMap<CharacterId, PartyMember>,
    inbox: Inbox,
}

impl PartyView {
    /// An empty view for `session_id`.
    pub fn new(session_id: SessionId) -> Self {
        Self {
            session_id,
            members: BTreeMap::new(),
            inbox: Inbox::new(),
        }
    }

    /// Members in id order.
    pub fn members(&self) -> impl Iterator<Item = &PartyMember> {
        self.members.values()
    }

    /// One member.
    pub fn member(&self, id: CharacterId) -> Option<&PartyMember> {
        self.members.get(&id)
    }

    /// Replace the view with freshly fetched investigators.
    pub fn refresh(&mut self, characters: &[Character]) {
        self.members = characters
            .iter()
            .map(|c| (c.id, PartyMember::from(c)))
            .collect();
    }

    /// Apply one envelope.
    ///
    /// Status updates carry absolute values, so applying the same one twice
    /// leaves the view as applying it once.
    pub fn apply(&mut self, envelope: &Envelope) -> PartyUpdate {
        if envelope.session_id != self.session_id || !self.inbox.accept(envelope) {
            return PartyUpdate::Ignored;
        }
        match &envelope.event {
            SessionEvent::StatusUpdate {
                character_id,
                major_wound,
                madness,
            } => match self.members.get_mut(character_id) {
                Some(member) => {
                    member.status = CharacterStatus {
                        major_wound: *major_wound,
                        madness: *madness,
                    };
                    PartyUpdate::Applied
                }
                None => PartyUpdate::NeedsRefresh,
            },
            SessionEvent::RefreshSession | SessionEvent::Resync => PartyUpdate::NeedsRefresh,
            _ => PartyUpdate::Ignored,
        }
    }
}
