//! File-backed store for the user collection.
//!
//! Every operation is one read-modify-write cycle: open the file (creating it
//! if needed), decode the whole collection, apply a single change, and rewrite
//! the whole file in place. Nothing is cached between calls.

use std::path::PathBuf;

use fastrace::trace;
use thiserror::Error;
use tracing::{info, warn};
use ustore_config::{RemovePolicy, StoreConfig};
use ustore_types::{User, Users};

mod file;
mod lock;

use file::StoreFile;
use lock::LockMode;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Malformed store file: {0}")]
    MalformedFile(#[source] serde_json::Error),
    #[error("Malformed item: {0}")]
    MalformedItem(#[source] serde_json::Error),
    #[error("Item with id {0} already exists")]
    DuplicateId(String),
    #[error("Item with id {0} not found")]
    NotFound(String),
}

pub struct RecordStore {
    path: PathBuf,
    config: StoreConfig,
}

impl RecordStore {
    pub fn new(path: impl Into<PathBuf>, config: StoreConfig) -> Self {
        Self {
            path: path.into(),
            config,
        }
    }

    fn open(&self, mode: LockMode) -> Result<StoreFile, StoreError> {
        let lock = self.config.lock.then_some(mode);
        StoreFile::open(&self.path, lock)
    }

    /// All records in insertion order.
    #[trace]
    pub fn list(&self) -> Result<Users, StoreError> {
        self.open(LockMode::Shared)?.read_all()
    }

    /// Parses `item` and appends it, rejecting an id that is already present.
    /// The file is read before the item is parsed.
    #[trace]
    pub fn add(&self, item: &str) -> Result<User, StoreError> {
        let mut file = self.open(LockMode::Exclusive)?;
        let mut users = file.read_all()?;
        let user = User::from_json(item).map_err(StoreError::MalformedItem)?;

        if users.iter().any(|u| u.id == user.id) {
            return Err(StoreError::DuplicateId(user.id));
        }

        users.push(user.clone());
        file.write_all(&users, self.config.pretty)?;
        info!("Added user {} to {}", user.id, self.path.display());
        Ok(user)
    }

    /// Removes records with `id` according to the configured [`RemovePolicy`]
    /// and returns how many were removed.
    #[trace]
    pub fn remove(&self, id: &str) -> Result<usize, StoreError> {
        let mut file = self.open(LockMode::Exclusive)?;
        let mut users = file.read_all()?;
        let before = users.len();

        match self.config.remove {
            RemovePolicy::All => users.retain(|u| u.id != id),
            RemovePolicy::First => {
                if let Some(pos) = users.iter().position(|u| u.id == id) {
                    users.remove(pos);
                }
            }
        }

        let removed = before - users.len();
        if removed == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }
        if removed > 1 {
            warn!("Removed {} records sharing id {}", removed, id);
        }

        file.write_all(&users, self.config.pretty)?;
        info!("Removed user {} from {}", id, self.path.display());
        Ok(removed)
    }

    /// First record with `id`.
    #[trace]
    pub fn find_by_id(&self, id: &str) -> Result<User, StoreError> {
        self.open(LockMode::Shared)?
            .read_all()?
            .into_iter()
            .find(|u| u.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }
}
