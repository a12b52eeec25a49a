//! Configuration for a table.
//!
//! Defaults suit a local game. [`TableConfig::from_env`] reads overrides
//! from `GASLIGHT_*` variables:
//!
//! | Env var                          | Default          |
//! |----------------------------------|------------------|
//! | `GASLIGHT_JOIN_TIMEOUT_SECS`     | `5`              |
//! | `GASLIGHT_ROLL_REQUEST_TTL_SECS` | `120`            |
//! | `GASLIGHT_SAVE_DEBOUNCE_MS`      | `1500`           |
//! | `GASLIGHT_CHANNEL_CAPACITY`      | `256`            |
//! | `GASLIGHT_REPLAY_CAPACITY`       | `512`            |
//! | `GASLIGHT_EMAIL_DOMAIN`          | `gaslight.local` |

use std::str::FromStr;
use std::time::Duration;

use crate::error::{TableError, TableResult};

/// Configuration for a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableConfig {
    /// How long `join_session` waits for the store.
    pub join_timeout: Duration,
    /// How long a roll request stays visible after creation.
    pub roll_request_ttl: Duration,
    /// Quiet period before a local sheet edit is written back.
    pub save_debounce: Duration,
    /// Live buffer per session channel.
    pub channel_capacity: usize,
    /// Envelopes kept per session for replay to lagged subscribers.
    pub replay_capacity: usize,
    /// Domain used to synthesise sign-in emails from usernames.
    pub email_domain: String,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            join_timeout: Duration::from_secs(5),
            roll_request_ttl: Duration::from_secs(120),
            save_debounce: Duration::from_millis(1500),
            channel_capacity: 256,
            replay_capacity: 512,
            email_domain: "gaslight.local".to_string(),
        }
    }
}

impl TableConfig {
    /// Read overrides from the process environment.
    pub fn from_env() -> TableResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read overrides through `lookup`; unset keys keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> TableResult<Self> {
        let mut config = Self::default();
        if let Some(secs) = parse(&lookup, "GASLIGHT_JOIN_TIMEOUT_SECS")? {
            config.join_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = parse(&lookup, "GASLIGHT_ROLL_REQUEST_TTL_SECS")? {
            config.roll_request_ttl = Duration::from_secs(secs);
        }
        if let Some(ms) = parse(&lookup, "GASLIGHT_SAVE_DEBOUNCE_MS")? {
            config.save_debounce = Duration::from_millis(ms);
        }
        if let Some(n) = parse(&lookup, "GASLIGHT_CHANNEL_CAPACITY")? {
            config = config.with_channel_capacity(n);
        }
        if let Some(n) = parse(&lookup, "GASLIGHT_REPLAY_CAPACITY")? {
            config = config.with_replay_capacity(n);
        }
        if let Some(domain) = lookup("GASLIGHT_EMAIL_DOMAIN") {
            config = config.with_email_domain(domain);
        }
        Ok(config)
    }

    /// Set the join timeout.
    pub fn with_join_timeout(mut self, timeout: Duration) -> Self {
        self.join_timeout = timeout;
        self
    }

    /// Set the roll request visibility window.
    pub fn with_roll_request_ttl(mut self, ttl: Duration) -> Self {
        self.roll_request_ttl = ttl;
        self
    }

    /// Set the save debounce.
    pub fn with_save_debounce(mut self, debounce: Duration) -> Self {
        self.save_debounce = debounce;
        self
    }

    /// Set the live channel buffer (at least 1).
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity.max(1);
        self
    }

    /// Set the replay log length (at least 1).
    pub fn with_replay_capacity(mut self, capacity: usize) -> Self {
        self.replay_capacity = capacity.max(1);
        self
    }

    /// Set the sign-in email domain.
    pub fn with_email_domain(mut self, domain: impl Into<String>) -> Self {
        self.email_domain = domain.into().trim().to_lowercase();
        self
    }
}

fn parse<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> TableResult<Option<T>> {
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| TableError::Config(format!("{key} has an invalid value: {raw:?}"))),
    }
}
