//! Per-session event fan-out with replay.
//!
//! Every publish is stamped with a per-session sequence number and kept in
//! a bounded replay log. A subscriber that falls behind the live channel
//! is caught up from the log; if the gap is older than the log it gets a
//! [`SessionEvent::Resync`] and must refetch. Delivery is at-least-once
//! within the log window, so consumers dedupe by `seq` (see
//! [`crate::inbox::Inbox`]).

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use gl_core::{CharacterId, MadnessState};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{Mutex, RwLock, broadcast};

use crate::config::TableConfig;
use crate::roll_request::RollRequestId;
use crate::session::{SceneMode, SessionId};

/// Who should play a sound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "character_id", rename_all = "snake_case")]
pub enum Recipient {
    /// Every client.
    All,
    /// Only the player of this investigator.
    Character(CharacterId),
}

impl Recipient {
    /// Returns true if the client playing `character` should react.
    pub fn includes(&self, character: Option<CharacterId>) -> bool {
        match self {
            Self::All => true,
            Self::Character(id) => character == Some(*id),
        }
    }
}

/// Something that happened at the table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// Absolute status of one investigator.
    StatusUpdate {
        /// The investigator.
        character_id: CharacterId,
        /// Major wound flag.
        major_wound: bool,
        /// Mental state.
        madness: MadnessState,
    },
    /// Session membership or sheets changed; refetch.
    RefreshSession,
    /// Play a one-shot sound.
    PlaySound {
        /// Sound asset name.
        sound: String,
        /// Who hears it.
        target: Recipient,
    },
    /// Master volume changed.
    MasterVolumeChange {
        /// New volume, 0.0 to 1.0.
        volume: f32,
    },
    /// Lights, ambient audio or scene mode changed.
    AmbianceChange {
        /// Lights out.
        lights_out: bool,
        /// Looping track.
        ambient_audio: Option<String>,
        /// Presentation mode.
        scene_mode: SceneMode,
    },
    /// The Keeper asked for a roll.
    RollRequested {
        /// The request row.
        request_id: RollRequestId,
        /// Who must roll.
        character_id: CharacterId,
    },
    /// Events were lost; refetch everything.
    Resync,
}

/// An event as delivered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Session the event belongs to.
    pub session_id: SessionId,
    /// Per-session sequence number, starting at 1.
    pub seq: u64,
    /// Publish time.
    pub sent_at: DateTime<Utc>,
    /// The event.
    pub event: SessionEvent,
}

/// The sender lives only here, so removing a channel from the bus ends
/// every subscription to it.
#[derive(Debug)]
struct Channel {
    sender: broadcast::Sender<Envelope>,
    log: Arc<Mutex<ReplayLog>>,
}

#[derive(Debug)]
struct ReplayLog {
    last_seq: u64,
    capacity: usize,
    entries: VecDeque<Envelope>,
}

impl ReplayLog {
    fn push(&mut self, envelope: Envelope) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(envelope);
    }

    /// Entries after `seq`, or `None` if some of them have been dropped.
    fn since(&self, seq: u64) -> Option<Vec<Envelope>> {
        let oldest = self.entries.front().map_or(self.last_seq + 1, |e| e.seq);
        if seq + 1 < oldest {
            return None;
        }
        Some(self.entries.iter().filter(|e| e.seq > seq).cloned().collect())
    }
}

/// Session-scoped publish/subscribe hub. Share it as `Arc<SessionBus>`.
#[derive(Debug)]
pub struct SessionBus {
    channels: RwLock<HashMap<SessionId, Arc<Channel>>>,
    channel_capacity: usize,
    replay_capacity: usize,
}

impl Default for SessionBus {
    fn default() -> Self {
        Self::new(&TableConfig::default())
    }
}

impl SessionBus {
    /// A bus sized by `config`.
    pub fn new(config: &TableConfig) -> Self {
        Self {
            channels: RwLock::new(HashMap::new()),
            channel_capacity: config.channel_capacity.max(1),
            replay_capacity: config.replay_capacity.max(1),
        }
    }

    async fn channel(&self, session: SessionId) -> Arc<Channel> {
        if let Some(channel) = self.channels.read().await.get(&session) {
            return Arc::clone(channel);
        }
        let mut channels = self.channels.write().await;
        let channel = channels.entry(session).or_insert_with(|| {
            let (sender, _) = broadcast::channel(self.channel_capacity);
            Arc::new(Channel {
                sender,
                log: Arc::new(Mutex::new(ReplayLog {
                    last_seq: 0,
                    capacity: self.replay_capacity,
                    entries: VecDeque::new(),
                })),
            })
        });
        Arc::clone(channel)
    }

    /// Publish an event. Returns the stamped envelope.
    pub async fn publish(&self, session: SessionId, event: SessionEvent) -> Envelope {
        let channel = self.channel(session).await;
        let mut log = channel.log.lock().await;
        log.last_seq += 1;
        let envelope = Envelope {
            session_id: session,
            seq: log.last_seq,
            sent_at: Utc::now(),
            event,
        };
        log.push(envelope.clone());
        // No live subscribers is fine; the log still has it.
        let receivers = channel.sender.send(envelope.clone()).unwrap_or(0);
        tracing::debug!(session = %session, seq = envelope.seq, receivers, "published");
        envelope
    }

    /// Subscribe from now on.
    pub async fn subscribe(&self, session: SessionId) -> Subscription {
        let channel = self.channel(session).await;
        let log = channel.log.lock().await;
        let receiver = channel.sender.subscribe();
        Subscription {
            session,
            last_seq: log.last_seq,
            receiver,
            backlog: VecDeque::new(),
            log: Arc::clone(&channel.log),
        }
    }

    /// Subscribe and replay everything after `seq` first, e.g. after a
    /// reconnect.
    pub async fn subscribe_after(&self, session: SessionId, seq: u64) -> Subscription {
        let mut sub = self.subscribe(session).await;
        sub.catch_up(seq).await;
        sub
    }

    /// Drop the session's channel and replay log once it has ended. Open
    /// subscriptions drain what they already hold and then end. Returns
    /// false if the session had no channel.
    pub async fn close(&self, session: SessionId) -> bool {
        let closed = self.channels.write().await.remove(&session).is_some();
        if closed {
            tracing::debug!(session = %session, "channel closed");
        }
        closed
    }

    /// Number of sessions with an open channel.
    pub async fn open_channels(&self) -> usize {
        self.channels.read().await.len()
    }

    /// Sequence number of the latest publish on `session`.
    pub async fn last_seq(&self, session: SessionId) -> u64 {
        self.channel(session).await.log.lock().await.last_seq
    }
}

/// A live feed for one session.
#[derive(Debug)]
pub struct Subscription {
    session: SessionId,
    last_seq: u64,
    receiver: broadcast::Receiver<Envelope>,
    backlog: VecDeque<Envelope>,
    log: Arc<Mutex<ReplayLog>>,
}

impl Subscription {
    /// The session this feed belongs to.
    pub fn session(&self) -> SessionId {
        self.session
    }

    /// Highest sequence number handed out so far.
    pub fn last_seq(&self) -> u64 {
        self.last_seq
    }

    /// Next envelope. `None` once the bus is gone.
    pub async fn recv(&mut self) -> Option<Envelope> {
        loop {
            if let Some(envelope) = self.backlog.pop_front() {
                self.last_seq = self.last_seq.max(envelope.seq);
                return Some(envelope);
            }
            match self.receiver.recv().await {
                Ok(envelope) => {
                    self.last_seq = self.last_seq.max(envelope.seq);
                    return Some(envelope);
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(session = %self.session, skipped, "subscriber lagged, replaying");
                    self.catch_up(self.last_seq).await;
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    async fn catch_up(&mut self, after: u64) {
        let log = self.log.lock().await;
        match log.since(after) {
            Some(missed) => self.backlog.extend(missed),
            None => {
                tracing::warn!(session = %self.session, after, "replay window exceeded, resync");
                self.backlog.push_back(Envelope {
                    session_id: self.session,
                    seq: log.last_seq,
                    sent_at: Utc::now(),
                    event: SessionEvent::Resync,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_wire_shape() {
        let status = SessionEvent::StatusUpdate {
            character_id: CharacterId(gl_core::Uuid::nil()),
            major_wound: true,
            madness: MadnessState::BoutOfMadness,
        };
        insta::assert_json_snapshot!(status, @r#"
        {
          "type": "status_update",
          "character_id": "00000000-0000-0000-0000-000000000000",
          "major_wound": true,
          "madness": "bout_of_madness"
        }
        "#);

        let sound = SessionEvent::PlaySound {
            sound: "thunder".into(),
            target: Recipient::All,
        };
        insta::assert_json_snapshot!(sound, @r#"
        {
          "type": "play_sound",
          "sound": "thunder",
          "target": {
            "kind": "all"
          }
        }
        "#);
    }

    fn small(channel: usize, replay: usize) -> SessionBus {
        SessionBus::new(
            &TableConfig::default()
                .with_channel_capacity(channel)
                .with_replay_capacity(replay),
        )
    }

    fn sound(n: usize) -> SessionEvent {
        SessionEvent::PlaySound {
            sound: format!("thunder-{n}"),
            target: Recipient::All,
        }
    }

    #[tokio::test]
    async fn publish_and_receive() {
        let bus = SessionBus::default();
        let session = SessionId::new();
        let mut sub = bus.subscribe(session).await;
        let sent = bus.publish(session, SessionEvent::RefreshSession).await;
        let got = sub.recv().await.unwrap();
        assert_eq!(got, sent);
        assert_eq!(got.seq, 1);
    }

    #[tokio::test]
    async fn sessions_are_isolated() {
        let bus = SessionBus::default();
        let a = SessionId::new();
        let b = SessionId::new();
        let mut sub_a = bus.subscribe(a).await;
        bus.publish(b, SessionEvent::RefreshSession).await;
        bus.publish(a, sound(1)).await;
        assert_eq!(sub_a.recv().await.unwrap().event, sound(1));
        assert_eq!(bus.last_seq(b).await, 1);
    }

    #[tokio::test]
    async fn lagged_subscriber_replays_from_log() {
        let bus = small(2, 64);
        let session = SessionId::new();
        let mut sub = bus.subscribe(session).await;
        for n in 1..=10 {
            bus.publish(session, sound(n)).await;
        }
        let mut seqs = Vec::new();
        while seqs.last() != Some(&10) {
            seqs.push(sub.recv().await.unwrap().seq);
        }
        assert_eq!(seqs, (1..=10).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn gap_older_than_log_means_resync() {
        let bus = small(2, 3);
        let session = SessionId::new();
        let mut sub = bus.subscribe(session).await;
        for n in 1..=10 {
            bus.publish(session, sound(n)).await;
        }
        let first = sub.recv().await.unwrap();
        assert_eq!(first.event, SessionEvent::Resync);
        assert_eq!(first.seq, 10);
    }

    #[tokio::test]
    async fn reconnect_replays_after_seq() {
        let bus = SessionBus::default();
        let session = SessionId::new();
        for n in 1..=4 {
            bus.publish(session, sound(n)).await;
        }
        let mut sub = bus.subscribe_after(session, 2).await;
        assert_eq!(sub.recv().await.unwrap().seq, 3);
        assert_eq!(sub.recv().await.unwrap().seq, 4);
    }

    #[tokio::test]
    async fn closing_ends_subscriptions_and_frees_the_log() {
        let bus = SessionBus::default();
        let session = SessionId::new();
        let other = SessionId::new();
        let mut sub = bus.subscribe(session).await;
        bus.publish(other, SessionEvent::RefreshSession).await;
        bus.publish(session, sound(1)).await;
        assert_eq!(bus.open_channels().await, 2);

        assert!(bus.close(session).await);
        assert!(!bus.close(session).await);
        assert_eq!(bus.open_channels().await, 1);
        assert_eq!(sub.recv().await.unwrap().event, sound(1));
        assert_eq!(sub.recv().await, None);

        let reopened = bus.publish(session, sound(2)).await;
        assert_eq!(reopened.seq, 1);
    }

    #[test]
    fn recipients() {
        let c = CharacterId::new();
        assert!(Recipient::All.includes(None));
        assert!(Recipient::Character(c).includes(Some(c)));
        assert!(!Recipient::Character(c).includes(Some(CharacterId::new())));
        assert!(!Recipient::Character(c).includes(None));
    }

    #[test]
    fn event_wire_format() {
        let json = serde_json::to_value(SessionEvent::MasterVolumeChange { volume: 0.5 }).unwrap();
        assert_eq!(json["type"], "master_volume_change");
        assert_eq!(json["volume"], 0.5);
    }
}
