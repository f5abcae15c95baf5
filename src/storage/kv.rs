//! # Key-Value Storage
//!
//! This module defines the persistence seam used by the cart and the menu cache,
//! plus an in-process implementation served by an actor.
//!
//! ## Key Types
//!
//! - [`KeyValueStore`]: The trait the cart and menu cache are written against.
//! - [`KvActor`]: An actor that owns a key-value map and serves requests sequentially.
//! - [`KvClient`]: The cloneable handle implementing [`KeyValueStore`] by message passing.
//! - [`StorageError`]: Errors raised by the storage layer.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

// =============================================================================
// 1. THE ABSTRACTION
// =============================================================================

/// Errors that can occur within the storage layer itself.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum StorageError {
    #[error("Storage actor closed")]
    ActorClosed,
    #[error("Storage actor dropped response channel")]
    ActorDropped,
    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Byte-oriented key-value store.
///
/// `get` distinguishes "absent" (`Ok(None)`) from failure. `delete` of an
/// absent key is not an error. `list_keys` returns keys in the backend's
/// iteration order, which callers must not rely on.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;

    async fn put(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError>;

    async fn delete(&self, key: &str) -> Result<(), StorageError>;

    async fn list_keys(&self) -> Result<Vec<String>, StorageError>;
}

// =============================================================================
// 2. THE MESSAGES
// =============================================================================

/// Type alias for the one-shot response channel used by the actor.
pub type Response<T> = oneshot::Sender<Result<T, StorageError>>;

/// Internal message type sent to the actor to request operations.
#[derive(Debug)]
pub enum KvRequest {
    Get {
        key: String,
        respond_to: Response<Option<Vec<u8>>>,
    },
    Put {
        key: String,
        value: Vec<u8>,
        respond_to: Response<()>,
    },
    Delete {
        key: String,
        respond_to: Response<()>,
    },
    ListKeys {
        respond_to: Response<Vec<String>>,
    },
}

// =============================================================================
// 3. THE ACTOR SERVER
// =============================================================================

/// Actor that owns the key-value map.
///
/// **Concurrency Model**:
/// Requests are processed one at a time in the order they arrive, so the map
/// needs no lock. Every handle writes through the same actor; the last `put`
/// for a key wins.
pub struct KvActor {
    receiver: mpsc::Receiver<KvRequest>,
    entries: HashMap<String, Vec<u8>>,
}

impl KvActor {
    pub fn new(buffer_size: usize) -> (Self, KvClient) {
        Self::with_entries(buffer_size, HashMap::new())
    }

    /// Creates an actor pre-loaded with `entries` (e.g. restored from disk by the host).
    pub fn with_entries(buffer_size: usize, entries: HashMap<String, Vec<u8>>) -> (Self, KvClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self { receiver, entries };
        let client = KvClient::new(sender);
        (actor, client)
    }

    /// Runs the actor's event loop until every [`KvClient`] has been dropped.
    ///
    /// Returns the final contents so the host can persist them.
    pub async fn run(mut self) -> HashMap<String, Vec<u8>> {
        info!(size = self.entries.len(), "Storage actor started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                KvRequest::Get { key, respond_to } => {
                    let value = self.entries.get(&key).cloned();
                    debug!(%key, found = value.is_some(), "Get");
                    let _ = respond_to.send(Ok(value));
                }
                KvRequest::Put {
                    key,
                    value,
                    respond_to,
                } => {
                    debug!(%key, bytes = value.len(), "Put");
                    self.entries.insert(key, value);
                    let _ = respond_to.send(Ok(()));
                }
                KvRequest::Delete { key, respond_to } => {
                    let existed = self.entries.remove(&key).is_some();
                    debug!(%key, existed, "Delete");
                    let _ = respond_to.send(Ok(()));
                }
                KvRequest::ListKeys { respond_to } => {
                    let keys: Vec<String> = self.entries.keys().cloned().collect();
                    debug!(count = keys.len(), "ListKeys");
                    let _ = respond_to.send(Ok(keys));
                }
            }
        }

        info!(size = self.entries.len(), "Storage actor shutdown");
        self.entries
    }
}

// =============================================================================
// 4. THE CLIENT
// =============================================================================

/// Cloneable handle to a running [`KvActor`].
#[derive(Clone)]
pub struct KvClient {
    sender: mpsc::Sender<KvRequest>,
}

impl KvClient {
    pub fn new(sender: mpsc::Sender<KvRequest>) -> Self {
        Self { sender }
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(Response<T>) -> KvRequest,
    ) -> Result<T, StorageError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| StorageError::ActorClosed)?;
        response.await.map_err(|_| StorageError::ActorDropped)?
    }
}

#[async_trait]
impl KeyValueStore for KvClient {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let key = key.to_string();
        self.request(|respond_to| KvRequest::Get { key, respond_to }).await
    }

    async fn put(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError> {
        let key = key.to_string();
        self.request(|respond_to| KvRequest::Put {
            key,
            value,
            respond_to,
        })
        .await
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        let key = key.to_string();
        self.request(|respond_to| KvRequest::Delete { key, respond_to })
            .await
    }

    async fn list_keys(&self) -> Result<Vec<String>, StorageError> {
        self.request(|respond_to| KvRequest::ListKeys { respond_to })
            .await
    }
}
