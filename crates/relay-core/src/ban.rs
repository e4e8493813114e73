//! Ban registry: the set of users whose messages are not relayed.
//!
//! Lookups fail open. A missing or broken store never blocks relay.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, warn};

use crate::{
    domain::UserId,
    store::{BannedUserRecord, SqliteBanStore},
    Result,
};

/// Storage port behind the registry.
#[async_trait]
pub trait BanStore: Send + Sync {
    async fn contains(&self, user: UserId) -> Result<bool>;

    /// Returns `true` when a new row was created.
    async fn insert(&self, user: UserId) -> Result<bool>;

    /// Returns `true` when a row was deleted.
    async fn remove(&self, user: UserId) -> Result<bool>;

    async fn list(&self) -> Result<Vec<BannedUserRecord>>;
}

#[derive(Debug, thiserror::Error)]
pub enum BanError {
    #[error("user {0} is already banned")]
    AlreadyBanned(UserId),

    #[error("user {0} is not banned")]
    NotBanned(UserId),

    #[error("ban store unavailable: {0}")]
    Store(String),
}

#[derive(Clone, Default)]
pub struct BanRegistry {
    store: Option<Arc<dyn BanStore>>,
}

impl BanRegistry {
    pub fn new(store: Arc<dyn BanStore>) -> Self {
        Self { store: Some(store) }
    }

    /// Registry without persistence: nobody is banned, ban/unban report a store error.
    pub fn disabled() -> Self {
        Self { store: None }
    }

    /// Open the SQLite store when a connection string is configured.
    ///
    /// Connection failures are logged and yield a disabled registry.
    pub async fn open(database_url: Option<&str>) -> Self {
        let Some(url) = database_url else {
            warn!("DATABASE_URL is not set; ban list disabled");
            return Self::disabled();
        };
        match SqliteBanStore::connect(url).await {
            Ok(store) => Self::new(Arc::new(store)),
            Err(e) => {
                error!(error = %e, "failed to open ban list database; ban list disabled");
                Self::disabled()
            }
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.store.is_some()
    }

    pub async fn is_banned(&self, user: UserId) -> bool {
        let Some(store) = &self.store else {
            return false;
        };
        match store.contains(user).await {
            Ok(banned) => banned,
            Err(e) => {
                warn!(user_id = user.0, error = %e, "ban lookup failed; allowing message");
                false
            }
        }
    }

    pub async fn ban(&self, user: UserId) -> std::result::Result<(), BanError> {
        let store = self.store()?;
        match store.insert(user).await {
            Ok(true) => Ok(()),
            Ok(false) => Err(BanError::AlreadyBanned(user)),
            Err(e) => Err(BanError::Store(e.to_string())),
        }
    }

    pub async fn unban(&self, user: UserId) -> std::result::Result<(), BanError> {
        let store = self.store()?;
        match store.remove(user).await {
            Ok(true) => Ok(()),
            Ok(false) => Err(BanError::NotBanned(user)),
            Err(e) => Err(BanError::Store(e.to_string())),
        }
    }

    pub async fn list(&self) -> std::result::Result<Vec<BannedUserRecord>, BanError> {
        self.store()?
            .list()
            .await
            .map_err(|e| BanError::Store(e.to_string()))
    }

    fn store(&self) -> std::result::Result<&Arc<dyn BanStore>, BanError> {
        self.store
            .as_ref()
            .ok_or_else(|| BanError::Store("ban list is not configured".to_string()))
    }
}
