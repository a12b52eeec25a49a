//! The shared table a Keeper and their investigators play at.
//!
//! Sessions with invite codes, Keeper roll requests, the pinboard and the
//! party view, all persisted through the [`store::RowStore`] seam and kept
//! in step through the per-session [`bus::SessionBus`]. Sheet edits go
//! through an optimistic [`cache::LocalCache`]; sign-in goes through an
//! injected [`auth::AuthState`].

pub mod auth;
pub mod bus;
pub mod cache;
pub mod config;
pub mod error;
pub mod inbox;
pub mod memory;
pub mod party;
pub mod pinboard;
pub mod roll_request;
pub mod service;
pub mod session;
pub mod store;

pub use auth::{AuthState, IdentityProvider, MemoryIdentity, Profile, Role};
pub use bus::{Envelope, Recipient, SessionBus, SessionEvent, Subscription};
pub use cache::{LocalCache, PendingWrite};
pub use config::TableConfig;
pub use error::{TableError, TableResult};
pub use inbox::Inbox;
pub use memory::MemoryBackend;
pub use party::{PartyMember, PartyUpdate, PartyView};
pub use pinboard::{PinId, PinKind, PinboardItem};
pub use roll_request::{RollRequest, RollRequestId, RollStatus};
pub use service::{CustomItem, TableService};
pub use session::{SceneMode, Session, SessionCharacter, SessionId};
pub use store::{ChangeKind, ChangeStream, Filter, Row, RowChange, RowStore, Table};
