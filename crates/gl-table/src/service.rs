//! Keeper, investigator and pinboard operations.
//!
//! [`TableService`] writes through a [`RowStore`] and announces changes on
//! the [`SessionBus`]. Writes are last-write-wins; nothing here orders
//! edits from different clients.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use gl_core::{Character, CharacterId, CharacterStatus, EquipmentItem, InventoryItem};
use gl_mechanics::catalog::builtin_items;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::auth::{Profile, Role};
use crate::bus::{Recipient, SessionBus, SessionEvent};
use crate::cache::LocalCache;
use crate::config::TableConfig;
use crate::error::{TableError, TableResult};
use crate::pinboard::{PinId, PinKind, PinboardItem, normalize_rotation, top_z};
use crate::roll_request::{RollRequest, RollRequestId};
use crate::session::{
    SceneMode, Session, SessionCharacter, SessionId, clamp_volume, generate_invite_code,
    normalize_invite_code,
};
use crate::store::{Filter, Row, RowStore, Table, from_row, to_row};

const INVITE_ATTEMPTS: usize = 16;

/// A Keeper-authored item, scoped to one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomItem {
    /// Row id: session key and item id.
    pub id: String,
    /// Owning session.
    pub session_id: SessionId,
    /// The definition.
    pub item: EquipmentItem,
}

/// An investigator row: indexed columns plus the full sheet.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct InvestigatorRow {
    id: CharacterId,
    name: String,
    occupation: String,
    owner: Option<gl_core::UserId>,
    document: Value,
}

impl InvestigatorRow {
    fn from_character(character: &Character) -> TableResult<Self> {
        Ok(Self {
            id: character.id,
            name: character.name.clone(),
            occupation: character.occupation.clone(),
            owner: character.owner,
            document: character.to_document()?,
        })
    }

    fn into_character(self) -> TableResult<Character> {
        Ok(Character::from_document(self.document)?)
    }
}

/// Operations on a shared table.
pub struct TableService {
    store: Arc<dyn RowStore>,
    bus: Arc<SessionBus>,
    config: TableConfig,
}

impl TableService {
    /// A service over `store` publishing on `bus`.
    pub fn new(store: Arc<dyn RowStore>, bus: Arc<SessionBus>, config: TableConfig) -> Self {
        Self { store, bus, config }
    }

    /// The bus events are published on.
    pub fn bus(&self) -> &Arc<SessionBus> {
        &self.bus
    }

    /// Active configuration.
    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    // -- Lookups --

    async fn select_one<T: serde::de::DeserializeOwned>(
        &self,
        table: Table,
        column: &str,
        value: String,
    ) -> TableResult<Option<T>> {
        let rows = self.store.select(table, &Filter::eq(column, value)).await?;
        rows.into_iter().next().map(from_row).transpose()
    }

    /// Load a session.
    pub async fn session(&self, id: SessionId) -> TableResult<Session> {
        self.select_one(Table::Sessions, "id", id.key())
            .await?
            .ok_or_else(|| TableError::not_found("session", id))
    }

    /// Load an investigator.
    pub async fn character(&self, id: CharacterId) -> TableResult<Character> {
        let row: InvestigatorRow = self
            .select_one(Table::Investigators, "id", id.key())
            .await?
            .ok_or_else(|| TableError::not_found("investigator", id))?;
        row.into_character()
    }

    /// Investigators owned by `owner`.
    pub async fn characters_of(&self, owner: &Profile) -> TableResult<Vec<Character>> {
        let rows = self
            .store
            .select(Table::Investigators, &Filter::eq("owner", owner.id.key()))
            .await?;
        rows.into_iter()
            .map(|row| from_row::<InvestigatorRow>(row)?.into_character())
            .collect()
    }

    fn keeper_of(profile: &Profile, session: &Session) -> TableResult<()> {
        if profile.role != Role::Keeper || session.keeper != profile.id {
            return Err(TableError::Forbidden(format!(
                "{} does not run session {}",
                profile.username, session.id
            )));
        }
        Ok(())
    }

    async fn publish(&self, session: SessionId, event: SessionEvent) {
        self.bus.publish(session, event).await;
    }

    // -- Keeper --

    /// Open a new session with a fresh invite code.
    pub async fn create_session(
        &self,
        keeper: &Profile,
        name: &str,
        rng: &mut StdRng,
    ) -> TableResult<Session> {
        if keeper.role != Role::Keeper {
            return Err(TableError::Forbidden("only keepers can open sessions".into()));
        }
        let mut invite_code = None;
        for _ in 0..INVITE_ATTEMPTS {
            let code = generate_invite_code(rng);
            let taken = self
                .store
                .select(Table::Sessions, &Filter::eq("invite_code", code.as_str()))
                .await?;
            if taken.is_empty() {
                invite_code = Some(code);
                break;
            }
        }
        let invite_code = invite_code
            .ok_or_else(|| TableError::Store("could not find a free invite code".into()))?;
        let session = Session::new(keeper.id, name.trim(), invite_code);
        self.store.insert(Table::Sessions, to_row(&session)?).await?;
        tracing::info!(session = %session.id, code = %session.invite_code, "session created");
        Ok(session)
    }

    /// Seat an investigator at a session.
    pub async fn link_character(
        &self,
        keeper: &Profile,
        session: SessionId,
        character: CharacterId,
    ) -> TableResult<()> {
        Self::keeper_of(keeper, &self.session(session).await?)?;
        self.character(character).await?;
        self.link(session, character).await
    }

    async fn link(&self, session: SessionId, character: CharacterId) -> TableResult<()> {
        let link = SessionCharacter::new(session, character);
        self.store
            .upsert(Table::SessionCharacters, to_row(&link)?)
            .await?;
        tracing::info!(session = %session, character = %character, "character linked");
        self.publish(session, SessionEvent::RefreshSession).await;
        Ok(())
    }

    /// Remove an investigator from a session.
    pub async fn unlink_character(
        &self,
        keeper: &Profile,
        session: SessionId,
        character: CharacterId,
    ) -> TableResult<()> {
        Self::keeper_of(keeper, &self.session(session).await?)?;
        let link = SessionCharacter::new(session, character);
        self.store.delete(Table::SessionCharacters, &link.id).await?;
        tracing::info!(session = %session, character = %character, "character unlinked");
        self.publish(session, SessionEvent::RefreshSession).await;
        Ok(())
    }

    /// End the evening: release the session's bus channel. The session row
    /// and its links stay so the table can be reopened later.
    pub async fn close_session(&self, keeper: &Profile, session: SessionId) -> TableResult<bool> {
        Self::keeper_of(keeper, &self.session(session).await?)?;
        let closed = self.bus.close(session).await;
        tracing::info!(session = %session, closed, "session closed");
        Ok(closed)
    }

    /// Investigators seated at a session.
    pub async fn party(&self, session: SessionId) -> TableResult<Vec<Character>> {
        let links = self
            .store
            .select(
                Table::SessionCharacters,
                &Filter::eq("session_id", session.key()),
            )
            .await?;
        let mut party = Vec::with_capacity(links.len());
        for link in links {
            let link: SessionCharacter = from_row(link)?;
            match self.character(link.character_id).await {
                Ok(character) => party.push(character),
                Err(TableError::NotFound { .. }) => {
                    tracing::warn!(character = %link.character_id, "linked investigator is gone");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(party)
    }

    async fn update_session(
        &self,
        keeper: &Profile,
        id: SessionId,
        change: impl FnOnce(&mut Session),
    ) -> TableResult<Session> {
        let mut session = self.session(id).await?;
        Self::keeper_of(keeper, &session)?;
        change(&mut session);
        self.store.upsert(Table::Sessions, to_row(&session)?).await?;
        Ok(session)
    }

    async fn ambiance_changed(&self, session: &Session) {
        self.publish(
            session.id,
            SessionEvent::AmbianceChange {
                lights_out: session.lights_out,
                ambient_audio: session.ambient_audio.clone(),
                scene_mode: session.scene_mode,
            },
        )
        .await;
    }

    /// Turn the lights off (`true`) or back on.
    pub async fn set_lights(
        &self,
        keeper: &Profile,
        session: SessionId,
        lights_out: bool,
    ) -> TableResult<Session> {
        let session = self
            .update_session(keeper, session, |s| s.lights_out = lights_out)
            .await?;
        self.ambiance_changed(&session).await;
        Ok(session)
    }

    /// Start or stop the ambient track.
    pub async fn set_ambient_audio(
        &self,
        keeper: &Profile,
        session: SessionId,
        track: Option<String>,
    ) -> TableResult<Session> {
        let session = self
            .update_session(keeper, session, |s| s.ambient_audio = track)
            .await?;
        self.ambiance_changed(&session).await;
        Ok(session)
    }

    /// Switch between exploration and cinematic mode.
    pub async fn set_scene_mode(
        &self,
        keeper: &Profile,
        session: SessionId,
        mode: SceneMode,
    ) -> TableResult<Session> {
        let session = self
            .update_session(keeper, session, |s| s.scene_mode = mode)
            .await?;
        self.ambiance_changed(&session).await;
        Ok(session)
    }

    /// Set the master volume, clamped to 0.0 to 1.0.
    pub async fn set_master_volume(
        &self,
        keeper: &Profile,
        session: SessionId,
        volume: f32,
    ) -> TableResult<Session> {
        let volume = clamp_volume(volume);
        let session = self
            .update_session(keeper, session, |s| s.master_volume = volume)
            .await?;
        self.publish(session.id, SessionEvent::MasterVolumeChange { volume })
            .await;
        Ok(session)
    }

    /// Play a one-shot sound for everyone or one investigator.
    pub async fn play_sound(
        &self,
        keeper: &Profile,
        session: SessionId,
        sound: &str,
        target: Recipient,
    ) -> TableResult<()> {
        Self::keeper_of(keeper, &self.session(session).await?)?;
        self.publish(
            session,
            SessionEvent::PlaySound {
                sound: sound.to_string(),
                target,
            },
        )
        .await;
        Ok(())
    }

    /// Ask an investigator to roll.
    pub async fn request_roll(
        &self,
        keeper: &Profile,
        request: RollRequest,
    ) -> TableResult<RollRequest> {
        Self::keeper_of(keeper, &self.session(request.session_id).await?)?;
        self.store
            .insert(Table::RollRequests, to_row(&request)?)
            .await?;
        tracing::info!(
            request = %request.id,
            character = %request.character_id,
            skill = %request.skill_name,
            "roll requested"
        );
        self.publish(
            request.session_id,
            SessionEvent::RollRequested {
                request_id: request.id,
                character_id: request.character_id,
            },
        )
        .await;
        Ok(request)
    }

    /// Requests created within the visibility window, oldest first.
    pub async fn visible_roll_requests(
        &self,
        session: SessionId,
        now: DateTime<Utc>,
    ) -> TableResult<Vec<RollRequest>> {
        let rows = self
            .store
            .select(Table::RollRequests, &Filter::eq("session_id", session.key()))
            .await?;
        let mut requests = rows
            .into_iter()
            .map(from_row::<RollRequest>)
            .collect::<TableResult<Vec<_>>>()?;
        requests.retain(|r| r.is_visible(now, self.config.roll_request_ttl));
        requests.sort_by_key(|r| r.created_at);
        Ok(requests)
    }

    /// Overwrite an investigator's status flags and announce them.
    pub async fn set_status(
        &self,
        keeper: &Profile,
        session: SessionId,
        character: CharacterId,
        status: CharacterStatus,
    ) -> TableResult<()> {
        Self::keeper_of(keeper, &self.session(session).await?)?;
        let mut sheet = self.character(character).await?;
        if sheet.apply_status(status) {
            self.save_character(&sheet).await?;
        }
        self.publish(
            session,
            SessionEvent::StatusUpdate {
                character_id: character,
                major_wound: status.major_wound,
                madness: status.madness,
            },
        )
        .await;
        Ok(())
    }

    /// Hand a catalog item to an investigator.
    ///
    /// The sheet is refetched, the item added and the sheet written back.
    /// An edit the player saves between the fetch and the write is lost.
    pub async fn give_item(
        &self,
        keeper: &Profile,
        session: SessionId,
        character: CharacterId,
        item: EquipmentItem,
        now: DateTime<Utc>,
    ) -> TableResult<InventoryItem> {
        Self::keeper_of(keeper, &self.session(session).await?)?;
        let mut sheet = self.character(character).await?;
        let given = sheet.give(item, now).clone();
        self.save_character(&sheet).await?;
        tracing::info!(character = %character, item = %given.instance_id, "item given");
        self.publish(session, SessionEvent::RefreshSession).await;
        Ok(given)
    }

    /// Add a Keeper-authored item to the session's catalog.
    pub async fn add_custom_item(
        &self,
        keeper: &Profile,
        session: SessionId,
        item: EquipmentItem,
    ) -> TableResult<CustomItem> {
        Self::keeper_of(keeper, &self.session(session).await?)?;
        let custom = CustomItem {
            id: format!("{}:{}", session.key(), item.id),
            session_id: session,
            item,
        };
        self.store
            .upsert(Table::CustomItems, to_row(&custom)?)
            .await?;
        Ok(custom)
    }

    /// Keeper-authored items for a session.
    pub async fn custom_catalog(&self, session: SessionId) -> TableResult<Vec<EquipmentItem>> {
        let rows = self
            .store
            .select(Table::CustomItems, &Filter::eq("session_id", session.key()))
            .await?;
        rows.into_iter()
            .map(|row| Ok(from_row::<CustomItem>(row)?.item))
            .collect()
    }

    /// Built-in items followed by the session's own.
    pub async fn catalog(&self, session: SessionId) -> TableResult<Vec<EquipmentItem>> {
        let mut items = builtin_items();
        items.extend(self.custom_catalog(session).await?);
        Ok(items)
    }

    // -- Investigator --

    /// Join a session by invite code, seating `character`.
    ///
    /// Gives up after the configured join timeout.
    pub async fn join_session(
        &self,
        player: &Profile,
        invite_code: &str,
        character: CharacterId,
    ) -> TableResult<Session> {
        let limit = self.config.join_timeout;
        tokio::time::timeout(limit, self.join(player, invite_code, character))
            .await
            .map_err(|_| {
                tracing::warn!(code = invite_code, "join timed out");
                TableError::Timeout {
                    operation: "join_session",
                    seconds: limit.as_secs(),
                }
            })?
    }

    async fn join(
        &self,
        player: &Profile,
        invite_code: &str,
        character: CharacterId,
    ) -> TableResult<Session> {
        let invalid = || TableError::InvalidInviteCode(invite_code.trim().to_string());
        let code = normalize_invite_code(invite_code).ok_or_else(invalid)?;
        let session: Session = self
            .select_one(Table::Sessions, "invite_code", code)
            .await?
            .ok_or_else(invalid)?;
        let sheet = self.character(character).await?;
        if sheet.owner != Some(player.id) {
            return Err(TableError::Forbidden(format!(
                "{} does not own {}",
                player.username, sheet.name
            )));
        }
        self.link(session.id, character).await?;
        tracing::info!(session = %session.id, user = %player.id, "joined");
        Ok(session)
    }

    /// Roll a pending request aimed at one of the player's investigators.
    pub async fn resolve_roll_request(
        &self,
        player: &Profile,
        request: RollRequestId,
        rng: &mut StdRng,
    ) -> TableResult<RollRequest> {
        let mut req: RollRequest = self
            .select_one(Table::RollRequests, "id", request.key())
            .await?
            .ok_or_else(|| TableError::not_found("roll request", request))?;
        let sheet = self.character(req.character_id).await?;
        if sheet.owner != Some(player.id) {
            return Err(TableError::Forbidden(format!(
                "request {} is for {}",
                req.id, sheet.name
            )));
        }
        let result = req.resolve(rng, Utc::now())?;
        let still_pending = Filter::eq("status", "PENDING");
        self.store
            .update_where(Table::RollRequests, &req.id.key(), &still_pending, to_row(&req)?)
            .await?
            .ok_or_else(|| TableError::AlreadyRolled(req.id.key()))?;
        tracing::info!(request = %req.id, result, blind = req.blind, "roll resolved");
        Ok(req)
    }

    /// Write an investigator sheet.
    pub async fn save_character(&self, character: &Character) -> TableResult<()> {
        let row = to_row(&InvestigatorRow::from_character(character)?)?;
        self.store.upsert(Table::Investigators, row).await?;
        Ok(())
    }

    /// Write every due sheet edit in `cache`. Failed writes stay queued.
    /// Returns how many writes were confirmed.
    pub async fn flush_cache(
        &self,
        cache: &mut LocalCache<Character>,
        now: DateTime<Utc>,
    ) -> usize {
        let mut confirmed = 0;
        for write in cache.due(now) {
            match self.save_character(&write.value).await {
                Ok(()) => {
                    cache.confirm(write.write_id);
                    confirmed += 1;
                }
                Err(e) => {
                    tracing::warn!(key = %write.key, error = %e, "save failed, will retry");
                    cache.retry(write.write_id);
                }
            }
        }
        confirmed
    }

    // -- Pinboard --

    /// Pin a note or image on top of the board.
    pub async fn pin(
        &self,
        author: &Profile,
        session: SessionId,
        kind: PinKind,
        content: &str,
        x: f32,
        y: f32,
    ) -> TableResult<PinboardItem> {
        let mut item = PinboardItem::new(session, author.id, kind, content, x, y);
        item.z = top_z(&self.pins(session).await?);
        self.store
            .insert(Table::PinboardItems, to_row(&item)?)
            .await?;
        Ok(item)
    }

    async fn load_pin(&self, id: PinId) -> TableResult<PinboardItem> {
        self.select_one(Table::PinboardItems, "id", id.key())
            .await?
            .ok_or_else(|| TableError::not_found("pin", id))
    }

    async fn patch_pin(&self, id: PinId, patch: Row) -> TableResult<PinboardItem> {
        let row = self
            .store
            .update(Table::PinboardItems, &id.key(), patch)
            .await?;
        from_row(row)
    }

    /// Move and rotate a pin.
    pub async fn move_pin(
        &self,
        id: PinId,
        x: f32,
        y: f32,
        rotation: f32,
    ) -> TableResult<PinboardItem> {
        let mut patch = Row::new();
        patch.insert("x".into(), serde_json::json!(x));
        patch.insert("y".into(), serde_json::json!(y));
        patch.insert("rotation".into(), serde_json::json!(normalize_rotation(rotation)));
        self.patch_pin(id, patch).await
    }

    /// Put a pin above every other pin on its board.
    pub async fn bring_to_front(&self, id: PinId) -> TableResult<PinboardItem> {
        let pin = self.load_pin(id).await?;
        let others = self.pins(pin.session_id).await?;
        let z = top_z(others.iter().filter(|p| p.id != id));
        if pin.z >= z {
            return Ok(pin);
        }
        let mut patch = Row::new();
        patch.insert("z".into(), Value::from(z));
        self.patch_pin(id, patch).await
    }

    /// Take a pin off the board.
    pub async fn unpin(&self, id: PinId) -> TableResult<()> {
        self.store.delete(Table::PinboardItems, &id.key()).await
    }

    /// The board, bottom to top.
    pub async fn pins(&self, session: SessionId) -> TableResult<Vec<PinboardItem>> {
        let rows = self
            .store
            .select(Table::PinboardItems, &Filter::eq("session_id", session.key()))
            .await?;
        let mut pins = rows
            .into_iter()
            .map(from_row::<PinboardItem>)
            .collect::<TableResult<Vec<_>>>()?;
        pins.sort_by_key(|p| p.z);
        Ok(pins)
    }
}
