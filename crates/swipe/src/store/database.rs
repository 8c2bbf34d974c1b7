use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::time::Duration;

use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{StoreError, Tables};

/// How long a transaction waits for another process holding the write lock.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// A relational table stored as `key -> JSON row` in SQLite.
trait Rows: Sized {
    fn load(conn: &Connection, table: &'static str) -> Result<Self, StoreError>;

    /// Write the difference between two versions of the table.
    fn sync(
        conn: &Connection,
        table: &'static str,
        before: &Self,
        after: &Self,
    ) -> Result<(), StoreError>;
}

fn encode<T: Serialize>(table: &'static str, value: &T) -> Result<String, StoreError> {
    serde_json::to_string(value).map_err(|source| StoreError::RowFormat { table, source })
}

fn decode<T: DeserializeOwned>(table: &'static str, raw: &str) -> Result<T, StoreError> {
    serde_json::from_str(raw).map_err(|source| StoreError::RowFormat { table, source })
}

fn select(conn: &Connection, table: &'static str) -> Result<Vec<(String, String)>, StoreError> {
    let mut statement = conn.prepare(&format!("SELECT key, body FROM {table}"))?;
    let rows = statement
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

fn upsert(conn: &Connection, table: &'static str, key: &str, body: &str) -> Result<(), StoreError> {
    conn.execute(
        &format!(
            "INSERT INTO {table} (key, body) VALUES (?1, ?2) \
             ON CONFLICT(key) DO UPDATE SET body = excluded.body"
        ),
        params![key, body],
    )?;
    Ok(())
}

fn delete(conn: &Connection, table: &'static str, key: &str) -> Result<(), StoreError> {
    conn.execute(&format!("DELETE FROM {table} WHERE key = ?1"), params![key])?;
    Ok(())
}

impl<K, V> Rows for BTreeMap<K, V>
where
    K: Ord + Serialize + DeserializeOwned,
    V: PartialEq + Serialize + DeserializeOwned,
{
    fn load(conn: &Connection, table: &'static str) -> Result<Self, StoreError> {
        let mut rows = BTreeMap::new();
        for (key, body) in select(conn, table)? {
            rows.insert(decode(table, &key)?, decode(table, &body)?);
        }
        Ok(rows)
    }

    fn sync(
        conn: &Connection,
        table: &'static str,
        before: &Self,
        after: &Self,
    ) -> Result<(), StoreError> {
        for key in before.keys().filter(|key| !after.contains_key(*key)) {
            delete(conn, table, &encode(table, key)?)?;
        }
        for (key, row) in after {
            if before.get(key) != Some(row) {
                upsert(conn, table, &encode(table, key)?, &encode(table, row)?)?;
            }
        }
        Ok(())
    }
}

/// Link tables (favorites) carry everything in the key.
impl<T> Rows for BTreeSet<T>
where
    T: Ord + Serialize + DeserializeOwned,
{
    fn load(conn: &Connection, table: &'static str) -> Result<Self, StoreError> {
        select(conn, table)?
            .into_iter()
            .map(|(key, _)| decode(table, &key))
            .collect()
    }

    fn sync(
        conn: &Connection,
        table: &'static str,
        before: &Self,
        after: &Self,
    ) -> Result<(), StoreError> {
        for link in before.difference(after) {
            delete(conn, table, &encode(table, link)?)?;
        }
        for link in after.difference(before) {
            upsert(conn, table, &encode(table, link)?, "null")?;
        }
        Ok(())
    }
}

fn read_sequence(conn: &Connection) -> Result<u64, StoreError> {
    let value: Option<i64> = conn
        .query_row("SELECT value FROM sequence WHERE name = 'entity'", [], |row| {
            row.get(0)
        })
        .optional()?;
    Ok(value.and_then(|value| u64::try_from(value).ok()).unwrap_or_default())
}

fn write_sequence(conn: &Connection, value: u64) -> Result<(), StoreError> {
    let value = i64::try_from(value).map_err(|_| StoreError::SequenceOverflow)?;
    conn.execute(
        "INSERT INTO sequence (name, value) VALUES ('entity', ?1) \
         ON CONFLICT(name) DO UPDATE SET value = excluded.value",
        params![value],
    )?;
    Ok(())
}

macro_rules! relational_tables {
    ($($table:ident),+ $(,)?) => {
        fn create_schema(conn: &Connection) -> Result<(), StoreError> {
            conn.execute_batch(
                "CREATE TABLE IF NOT EXISTS sequence (name TEXT PRIMARY KEY, value INTEGER NOT NULL)",
            )?;
            $(
                conn.execute_batch(&format!(
                    "CREATE TABLE IF NOT EXISTS {} (key TEXT PRIMARY KEY, body TEXT NOT NULL)",
                    stringify!($table)
                ))?;
            )+
            Ok(())
        }

        fn load_tables(conn: &Connection) -> Result<Tables, StoreError> {
            let mut tables = Tables::default();
            tables.next_id = read_sequence(conn)?;
            $(tables.$table = Rows::load(conn, stringify!($table))?;)+
            Ok(tables)
        }

        fn sync_tables(conn: &Connection, before: &Tables, after: &Tables) -> Result<(), StoreError> {
            if before.next_id != after.next_id {
                write_sequence(conn, after.next_id)?;
            }
            $(Rows::sync(conn, stringify!($table), &before.$table, &after.$table)?;)+
            Ok(())
        }
    };
}

relational_tables!(
    users,
    contacts,
    subscriptions,
    notaries,
    messages,
    filters,
    complexes,
    benefits,
    registrations,
    complex_images,
    news,
    documents,
    announcements,
    announcement_images,
    advertising,
    apartments,
    complaints,
    favorite_announcements,
    favorite_complexes,
);

/// Reload `tables` when another connection committed since this one last looked.
fn refresh(conn: &Connection, seen: &mut Option<i64>, tables: &mut Tables) -> Result<(), StoreError> {
    let version: i64 = conn.query_row("PRAGMA data_version", [], |row| row.get(0))?;
    if *seen != Some(version) {
        *tables = load_tables(conn)?;
        *seen = Some(version);
    }
    Ok(())
}

/// SQLite connection shared by every process pointed at the same file.
#[derive(Debug)]
pub(super) struct Database {
    path: PathBuf,
    conn: Connection,
    seen: Option<i64>,
}

impl Database {
    pub(super) fn open(path: &Path) -> Result<Self, StoreError> {
        let open_error = |source| StoreError::Open {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| StoreError::Directory {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let conn = Connection::open(path).map_err(open_error)?;
        conn.busy_timeout(BUSY_TIMEOUT).map_err(open_error)?;
        create_schema(&conn)?;
        Ok(Self {
            path: path.to_path_buf(),
            conn,
            seen: None,
        })
    }

    pub(super) fn path(&self) -> &PathBuf {
        &self.path
    }

    pub(super) fn read<T>(
        &mut self,
        tables: &mut Tables,
        query: impl FnOnce(&Tables) -> T,
    ) -> Result<T, StoreError> {
        let tx = self.conn.transaction()?;
        refresh(&tx, &mut self.seen, tables)?;
        let outcome = query(tables);
        tx.commit()?;
        Ok(outcome)
    }

    /// The immediate transaction holds the database write lock from the first refresh to
    /// commit, so a concurrent process can never interleave with the working copy.
    pub(super) fn write<T, E>(
        &mut self,
        tables: &mut Tables,
        command: impl FnOnce(&mut Tables) -> Result<T, E>,
    ) -> Result<T, E>
    where
        E: From<StoreError>,
    {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(StoreError::from)?;
        refresh(&tx, &mut self.seen, tables)?;

        let mut working = tables.clone();
        let outcome = command(&mut working)?;
        sync_tables(&tx, tables, &working)?;
        tx.commit().map_err(StoreError::from)?;

        *tables = working;
        Ok(outcome)
    }
}
