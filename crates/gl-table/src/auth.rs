//! Sign-up, sign-in and the current profile.
//!
//! Players pick a username; the identity provider wants an email, so one
//! is synthesised from the username and the configured domain.
//! [`AuthState`] is handed to whatever needs it rather than living in a
//! global.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use async_trait::async_trait;
use gl_core::UserId;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::config::TableConfig;
use crate::error::{TableError, TableResult};

/// Shortest password accepted at sign-up.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// What a profile may do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// A player.
    Investigator,
    /// The game master.
    Keeper,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Investigator => write!(f, "investigator"),
            Self::Keeper => write!(f, "keeper"),
        }
    }
}

/// A signed-up user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Profile id.
    pub id: UserId,
    /// Name as typed at sign-up.
    pub username: String,
    /// Synthesised sign-in email.
    pub email: String,
    /// Role.
    pub role: Role,
}

/// `"{lowercased alphanumeric username}@{domain}"`.
pub fn synthesize_email(username: &str, domain: &str) -> TableResult<String> {
    let local: String = username
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect();
    if local.is_empty() {
        return Err(TableError::Auth(format!(
            "username {username:?} has no letters or digits"
        )));
    }
    Ok(format!("{local}@{domain}"))
}

/// Hash a password with Argon2id and a random salt. Returns the PHC string.
pub fn hash_password(password: &str) -> TableResult<String> {
    let salt_bytes: [u8; 16] = rand::rng().random();
    let salt = SaltString::encode_b64(&salt_bytes).map_err(|e| TableError::Auth(e.to_string()))?;
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| TableError::Auth(e.to_string()))
}

/// Check a password against a stored PHC string.
pub fn verify_password(password: &str, hash: &str) -> TableResult<bool> {
    let parsed = PasswordHash::new(hash).map_err(|e| TableError::Auth(e.to_string()))?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(TableError::Auth(e.to_string())),
    }
}

/// The external identity service.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Create an account and its profile.
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        username: &str,
        role: Role,
    ) -> TableResult<Profile>;

    /// Check credentials and return the profile.
    async fn sign_in(&self, email: &str, password: &str) -> TableResult<Profile>;

    /// End the profile's session with the provider.
    async fn sign_out(&self, user: UserId) -> TableResult<()>;
}

struct Account {
    password_hash: String,
    profile: Profile,
}

/// Accounts held in memory, passwords hashed with Argon2.
#[derive(Default)]
pub struct MemoryIdentity {
    accounts: RwLock<HashMap<String, Account>>,
}

impl MemoryIdentity {
    /// No accounts.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl IdentityProvider for MemoryIdentity {
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        username: &str,
        role: Role,
    ) -> TableResult<Profile> {
        let mut accounts = self.accounts.write().await;
        if accounts.contains_key(email) {
            return Err(TableError::Auth(format!("{email} is already registered")));
        }
        let profile = Profile {
            id: UserId::new(),
            username: username.to_string(),
            email: email.to_string(),
            role,
        };
        let account = Account {
            password_hash: hash_password(password)?,
            profile: profile.clone(),
        };
        accounts.insert(email.to_string(), account);
        Ok(profile)
    }

    async fn sign_in(&self, email: &str, password: &str) -> TableResult<Profile> {
        let accounts = self.accounts.read().await;
        let invalid = || TableError::Auth("invalid username or password".into());
        let account = accounts.get(email).ok_or_else(invalid)?;
        if !verify_password(password, &account.password_hash)? {
            return Err(invalid());
        }
        Ok(account.profile.clone())
    }

    async fn sign_out(&self, _user: UserId) -> TableResult<()> {
        Ok(())
    }
}

/// The signed-in profile, if any, and the provider behind it.
pub struct AuthState {
    provider: Arc<dyn IdentityProvider>,
    email_domain: String,
    current: RwLock<Option<Profile>>,
}

impl AuthState {
    /// Nobody signed in.
    pub fn new(provider: Arc<dyn IdentityProvider>, config: &TableConfig) -> Self {
        Self {
            provider,
            email_domain: config.email_domain.clone(),
            current: RwLock::new(None),
        }
    }

    /// Create an account and sign in as it.
    pub async fn register(&self, username: &str, password: &str, role: Role) -> TableResult<Profile> {
        let username = username.trim();
        let email = synthesize_email(username, &self.email_domain)?;
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(TableError::Auth(format!(
                "password must be at least {MIN_PASSWORD_LENGTH} characters"
            )));
        }
        let profile = self.provider.sign_up(&email, password, username, role).await?;
        tracing::info!(user = %profile.id, role = %profile.role, "registered");
        *self.current.write().await = Some(profile.clone());
        Ok(profile)
    }

    /// Sign in with a username and password.
    pub async fn login(&self, username: &str, password: &str) -> TableResult<Profile> {
        let email = synthesize_email(username.trim(), &self.email_domain)?;
        let profile = self.provider.sign_in(&email, password).await?;
        tracing::info!(user = %profile.id, "signed in");
        *self.current.write().await = Some(profile.clone());
        Ok(profile)
    }

    /// Sign out. Signing out twice is not an error.
    pub async fn logout(&self) -> TableResult<()> {
        let Some(profile) = self.current.write().await.take() else {
            return Ok(());
        };
        self.provider.sign_out(profile.id).await?;
        tracing::info!(user = %profile.id, "signed out");
        Ok(())
    }

    /// The signed-in profile.
    pub async fn current(&self) -> Option<Profile> {
        self.current.read().await.clone()
    }

    /// The signed-in profile, or an error if nobody is.
    pub async fn require_user(&self) -> TableResult<Profile> {
        self.current()
            .await
            .ok_or_else(|| TableError::Auth("not signed in".into()))
    }

    /// The signed-in profile if it is a Keeper.
    pub async fn require_keeper(&self) -> TableResult<Profile> {
        let profile = self.require_user().await?;
        if profile.role != Role::Keeper {
            return Err(TableError::Forbidden(format!(
                "{} is not a keeper",
                profile.username
            )));
        }
        Ok(profile)
    }
}
