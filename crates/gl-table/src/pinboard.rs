//! The shared pinboard.

use chrono::{DateTime, Utc};
use gl_core::{UserId, define_id};
use serde::{Deserialize, Serialize};

use crate::session::SessionId;

define_id!(
    /// Identifier of a pinboard item.
    PinId
);

/// What a pin shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PinKind {
    /// Free text.
    Note,
    /// An image URL.
    Image,
}

/// A note or image on the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PinboardItem {
    /// Row id.
    pub id: PinId,
    /// Owning session.
    pub session_id: SessionId,
    /// Note or image.
    pub kind: PinKind,
    /// Horizontal position.
    pub x: f32,
    /// Vertical position.
    pub y: f32,
    /// Stacking order; higher is on top.
    pub z: i32,
    /// Rotation in degrees.
    pub rotation: f32,
    /// Note text or image URL.
    pub content: String,
    /// Who pinned it.
    pub author: UserId,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl PinboardItem {
    /// A new pin at `(x, y)`, unrotated, at the bottom of the stack.
    pub fn new(
        session_id: SessionId,
        author: UserId,
        kind: PinKind,
        content: impl Into<String>,
        x: f32,
        y: f32,
    ) -> Self {
        Self {
            id: PinId::new(),
            session_id,
            kind,
            x,
            y,
            z: 0,
            rotation: 0.0,
            content: content.into(),
            author,
            created_at: Utc::now(),
        }
    }
}

/// The z-index that puts a pin above every pin in `items`.
pub fn top_z<'a>(items: impl IntoIterator<Item = &'a PinboardItem>) -> i32 {
    items.into_iter().map(|p| p.z).max().map_or(0, |z| z + 1)
}

/// Normalize a rotation into `[0, 360)`.
pub fn normalize_rotation(degrees: f32) -> f32 {
    if degrees.is_finite() {
        degrees.rem_euclid(360.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pin(z: i32) -> PinboardItem {
        let mut p = PinboardItem::new(SessionId::new(), UserId::new(), PinKind::Note, "clue", 0.0, 0.0);
        p.z = z;
        p
    }

    #[test]
    fn front_is_max_plus_one() {
        let pins = [pin(3), pin(-1), pin(7)];
        assert_eq!(top_z(&pins), 8);
        assert_eq!(top_z(&[]), 0);
    }

    #[test]
    fn rotation_wraps() {
        assert_eq!(normalize_rotation(370.0), 10.0);
        assert_eq!(normalize_rotation(-90.0), 270.0);
        assert_eq!(normalize_rotation(f32::INFINITY), 0.0);
    }
}
