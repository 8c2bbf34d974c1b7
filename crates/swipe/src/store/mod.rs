//! Relational entity store.
//!
//! Every table lives in [`Tables`]; callers go through [`EntityStore::read`] and
//! [`EntityStore::write`]. A write transaction runs against a working copy and only
//! replaces the committed tables when the closure returns `Ok`, so a rejected request
//! leaves no partial effect behind. An opened store keeps one SQLite row per entity and
//! picks up commits made by other processes at the start of every transaction.

mod database;
mod ids;
mod tables;

use std::path::PathBuf;
use std::sync::Mutex;

use database::Database;

pub use ids::{
    AdvertisingId, AnnouncementId, AnnouncementImageId, ApartmentId, ComplaintId, ComplexId,
    ComplexImageId, ContactId, DocumentId, FilterId, MessageId, NewsId, NotaryId,
    SubscriptionId, UserId,
};
pub use tables::Tables;

/// Error enumeration for store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store lock poisoned")]
    Poisoned,
    #[error("database {path} could not be opened: {source}")]
    Open {
        path: PathBuf,
        source: rusqlite::Error,
    },
    #[error("data directory {path} could not be created: {source}")]
    Directory {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("row in {table} is malformed: {source}")]
    RowFormat {
        table: &'static str,
        source: serde_json::Error,
    },
    #[error("entity id sequence overflowed")]
    SequenceOverflow,
}

/// Transactional access to the tables so services can be exercised against any backend.
pub trait EntityStore: Send + Sync {
    fn read<T>(&self, query: impl FnOnce(&Tables) -> T) -> Result<T, StoreError>;

    fn write<T, E>(&self, command: impl FnOnce(&mut Tables) -> Result<T, E>) -> Result<T, E>
    where
        E: From<StoreError>;
}

#[derive(Debug, Default)]
struct State {
    tables: Tables,
    database: Option<Database>,
}

/// Mutex-guarded tables, optionally backed by a SQLite database on disk.
#[derive(Debug, Default)]
pub struct TableStore {
    state: Mutex<State>,
}

impl TableStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tables(tables: Tables) -> Self {
        Self {
            state: Mutex::new(State {
                tables,
                database: None,
            }),
        }
    }

    /// Open a store backed by the SQLite file at `path`, creating the schema on first use.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let database = Database::open(&path)?;
        tracing::debug!(path = %path.display(), "entity store opened");
        Ok(Self {
            state: Mutex::new(State {
                tables: Tables::default(),
                database: Some(database),
            }),
        })
    }

    pub fn database_path(&self) -> Result<Option<PathBuf>, StoreError> {
        let guard = self.state.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(guard.database.as_ref().map(|database| database.path().clone()))
    }
}

impl EntityStore for TableStore {
    fn read<T>(&self, query: impl FnOnce(&Tables) -> T) -> Result<T, StoreError> {
        let mut guard = self.state.lock().map_err(|_| StoreError::Poisoned)?;
        let State { tables, database } = &mut *guard;
        match database {
            Some(database) => database.read(tables, query),
            None => Ok(query(tables)),
        }
    }

    fn write<T, E>(&self, command: impl FnOnce(&mut Tables) -> Result<T, E>) -> Result<T, E>
    where
        E: From<StoreError>,
    {
        let mut guard = self.state.lock().map_err(|_| StoreError::Poisoned)?;
        let State { tables, database } = &mut *guard;
        match database {
            Some(database) => database.write(tables, command),
            None => {
                let mut working = tables.clone();
                let outcome = command(&mut working)?;
                *tables = working;
                Ok(outcome)
            }
        }
    }
}
