//! Persistence boundary.
//!
//! The editor treats storage as best-effort: it hands whole [`State`]
//! documents to a [`StateStore`] and reads them back on open. Two backends:
//! [`LmdbStore`] keeps the document in an LMDB environment, [`MemoryStore`]
//! keeps it in process.

use std::path::Path;

use heed::types::{Str, U64};
use heed::{Database, Env, EnvOpenOptions};
use tracing::info;

use crate::config::EditorConfig;
use crate::constants::{META_DB, REVISION_KEY, STATE_DB};
use crate::error::{err, Error, Result};
use crate::interchange::{deserialize, serialize};
use crate::model::State;

// Table type aliases
pub type DbStr = Database<Str, Str>;
pub type DbU64 = Database<Str, U64<byteorder::BigEndian>>;

/// Where the editor saves and loads its state
pub trait StateStore {
    /// Load the saved document, `None` if nothing was ever saved
    fn load(&self) -> Result<Option<State>>;

    /// Replace the saved document
    fn save(&mut self, state: &State) -> Result<()>;

    /// Number of successful saves so far
    fn revision(&self) -> Result<u64>;
}

/// LMDB-backed store: one JSON document plus a save counter
pub struct LmdbStore {
    env: Env,
    state: DbStr,
    meta: DbU64,
    key: String,
}

impl LmdbStore {
    /// Open (or create) the environment at `path`
    pub fn open(path: impl AsRef<Path>, config: &EditorConfig) -> Result<Self> {
        let path = path.as_ref();
        std::fs::create_dir_all(path).map_err(err)?;
        // SAFETY: LMDB requires no other processes access this path concurrently during open.
        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(config.map_size)
                .max_dbs(2)
                .open(path)
                .map_err(err)?
        };
        let mut tx = env.write_txn().map_err(err)?;
        let state: DbStr = env.create_database(&mut tx, Some(STATE_DB)).map_err(err)?;
        let meta: DbU64 = env.create_database(&mut tx, Some(META_DB)).map_err(err)?;
        tx.commit().map_err(err)?;
        info!(path = %path.display(), "opened state store");
        Ok(LmdbStore { env, state, meta, key: config.storage_key.clone() })
    }

    /// Remove the saved document and reset the counter
    pub fn clear(&mut self) -> Result<()> {
        let mut tx = self.env.write_txn().map_err(err)?;
        self.state.clear(&mut tx).map_err(err)?;
        self.meta.clear(&mut tx).map_err(err)?;
        tx.commit().map_err(err)
    }
}

impl StateStore for LmdbStore {
    fn load(&self) -> Result<Option<State>> {
        let tx = self.env.read_txn().map_err(err)?;
        match self.state.get(&tx, &self.key).map_err(err)? {
            Some(text) => Ok(Some(deserialize(text)?)),
            None => Ok(None),
        }
    }

    fn save(&mut self, state: &State) -> Result<()> {
        let text = serialize(state)?;
        let mut tx = self.env.write_txn().map_err(err)?;
        let rev = self.meta.get(&tx, REVISION_KEY).map_err(err)?.unwrap_or(0);
        self.state.put(&mut tx, &self.key, &text).map_err(err)?;
        self.meta.put(&mut tx, REVISION_KEY, &(rev + 1)).map_err(err)?;
        tx.commit().map_err(err)
    }

    fn revision(&self) -> Result<u64> {
        let tx = self.env.read_txn().map_err(err)?;
        Ok(self.meta.get(&tx, REVISION_KEY).map_err(err)?.unwrap_or(0))
    }
}

/// In-process store. Holds the serialized text so loads go through the
/// same import path as the on-disk backend.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    text: Option<String>,
    revision: u64,
    unavailable: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with raw document text
    pub fn with_text(text: impl Into<String>) -> Self {
        MemoryStore { text: Some(text.into()), ..Self::default() }
    }

    /// Store whose every operation fails, like disabled browser storage
    pub fn unavailable() -> Self {
        MemoryStore { unavailable: true, ..Self::default() }
    }

    /// Raw saved text
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    fn check(&self) -> Result<()> {
        if self.unavailable {
            return Err(Error::PersistenceUnavailable("storage disabled".into()));
        }
        Ok(())
    }
}

impl StateStore for MemoryStore {
    fn load(&self) -> Result<Option<State>> {
        self.check()?;
        self.text.as_deref().map(deserialize).transpose()
    }

    fn save(&mut self, state: &State) -> Result<()> {
        self.check()?;
        self.text = Some(serialize(state)?);
        self.revision += 1;
        Ok(())
    }

    fn revision(&self) -> Result<u64> {
        self.check()?;
        Ok(self.revision)
    }
}
