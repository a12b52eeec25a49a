//! Sessions, invite codes and the session/investigator link.

use std::fmt;

use chrono::{DateTime, Utc};
use gl_core::{CharacterId, UserId, define_id};
use rand::Rng;
use serde::{Deserialize, Serialize};

define_id!(
    /// Identifier of a game session.
    SessionId
);

/// Characters used in invite codes. No 0/O or 1/I.
pub const INVITE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Length of an invite code.
pub const INVITE_LENGTH: usize = 6;

/// A fresh random invite code.
pub fn generate_invite_code(rng: &mut impl Rng) -> String {
    (0..INVITE_LENGTH)
        .map(|_| INVITE_ALPHABET[rng.random_range(0..INVITE_ALPHABET.len())] as char)
        .collect()
}

/// Canonical form of a typed invite code, or `None` if it cannot be one.
pub fn normalize_invite_code(code: &str) -> Option<String> {
    let code: String = code
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .map(|c| c.to_ascii_uppercase())
        .collect();
    let valid = code.len() == INVITE_LENGTH && code.bytes().all(|b| INVITE_ALPHABET.contains(&b));
    valid.then_some(code)
}

/// How the table is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SceneMode {
    /// Normal play.
    #[default]
    Exploration,
    /// Letterboxed, sheets hidden.
    Cinematic,
}

impl fmt::Display for SceneMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exploration => write!(f, "exploration"),
            Self::Cinematic => write!(f, "cinematic"),
        }
    }
}

/// A game session run by one Keeper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Row id.
    pub id: SessionId,
    /// The Keeper's profile.
    pub keeper: UserId,
    /// Display name.
    pub name: String,
    /// Code players type to join.
    pub invite_code: String,
    /// Looping background track.
    #[serde(default)]
    pub ambient_audio: Option<String>,
    /// Dims every client.
    #[serde(default)]
    pub lights_out: bool,
    /// Presentation mode.
    #[serde(default)]
    pub scene_mode: SceneMode,
    /// Overall volume, 0.0 to 1.0.
    pub master_volume: f32,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// A new session with default ambiance.
    pub fn new(keeper: UserId, name: impl Into<String>, invite_code: String) -> Self {
        Self {
            id: SessionId::new(),
            keeper,
            name: name.into(),
            invite_code,
            ambient_audio: None,
            lights_out: false,
            scene_mode: SceneMode::Exploration,
            master_volume: 1.0,
            created_at: Utc::now(),
        }
    }
}

/// Clamp a volume into 0.0 to 1.0. NaN reads as silence.
pub fn clamp_volume(volume: f32) -> f32 {
    if volume.is_nan() {
        0.0
    } else {
        volume.clamp(0.0, 1.0)
    }
}

/// An investigator seated at a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionCharacter {
    /// Row id, derived from both keys so linking twice is harmless.
    pub id: String,
    /// The session.
    pub session_id: SessionId,
    /// The investigator.
    pub character_id: CharacterId,
}

impl SessionCharacter {
    /// Link `character_id` to `session_id`.
    pub fn new(session_id: SessionId, character_id: CharacterId) -> Self {
        Self {
            id: format!("{}:{}", session_id.key(), character_id.key()),
            session_id,
            character_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn invite_codes_avoid_ambiguous_characters() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let code = generate_invite_code(&mut rng);
            assert_eq!(code.len(), INVITE_LENGTH);
            assert!(!code.contains(['0', 'O', '1', 'I']), "{code}");
            assert_eq!(normalize_invite_code(&code), Some(code));
        }
    }

    #[test]
    fn normalizing_typed_codes() {
        assert_eq!(normalize_invite_code(" abc-def "), Some("ABCDEF".into()));
        assert_eq!(normalize_invite_code("ABCDE"), None);
        assert_eq!(normalize_invite_code("ABCDE0"), None);
    }

    #[test]
    fn volume_is_clamped() {
        assert_eq!(clamp_volume(1.5), 1.0);
        assert_eq!(clamp_volume(-0.2), 0.0);
        assert_eq!(clamp_volume(f32::NAN), 0.0);
        assert_eq!(clamp_volume(0.4), 0.4);
    }

    #[test]
    fn link_ids_are_stable() {
        let s = SessionId::new();
        let c = CharacterId::new();
        assert_eq!(SessionCharacter::new(s, c).id, SessionCharacter::new(s, c).id);
    }

    #[test]
    fn scene_mode_wire_format() {
        assert_eq!(
            serde_json::to_string(&SceneMode::Cinematic).unwrap(),
            "\"CINEMATIC\""
        );
    }
}
