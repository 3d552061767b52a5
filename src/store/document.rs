//! # Document Store
//!
//! Circuits kept as JSON documents in SQLite, keyed by an opaque UUID.
//! Insertion order is preserved by the autoincrement `seq` column.
//!
//! The connection sits behind a mutex and every operation runs on Tokio's
//! blocking pool, so a slow statement only holds up its own request.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;
use uuid::Uuid;

use super::errors::{StoreError, StoreResult};
use super::CircuitStore;
use crate::circuit::{Circuit, CircuitFields, CircuitId};

const MEMORY_URL: &str = "sqlite::memory:";
const FILE_URL_PREFIX: &str = "sqlite://";

const SCHEMA: &str = r"
    CREATE TABLE IF NOT EXISTS circuits (
        seq      INTEGER PRIMARY KEY AUTOINCREMENT,
        id       TEXT NOT NULL UNIQUE,
        document TEXT NOT NULL
    );
";

/// Where a document store lives, parsed from a connection string
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentLocation {
    /// `sqlite::memory:`
    Memory,
    /// `sqlite://<path>`
    File(PathBuf),
}

impl DocumentLocation {
    /// Parse a connection string; `None` for unsupported schemes
    pub fn parse(url: &str) -> Option<Self> {
        let url = url.trim();
        if url == MEMORY_URL {
            return Some(Self::Memory);
        }
        url.strip_prefix(FILE_URL_PREFIX)
            .filter(|path| !path.is_empty())
            .map(|path| Self::File(PathBuf::from(path)))
    }

    fn describe(&self) -> String {
        match self {
            Self::Memory => MEMORY_URL.to_string(),
            Self::File(path) => path.display().to_string(),
        }
    }
}

/// SQLite-backed document store
#[derive(Debug, Clone)]
pub struct DocumentStore {
    conn: Arc<Mutex<Connection>>,
    location: String,
}

impl DocumentStore {
    /// Open the store named by a connection string
    pub fn connect(url: &str) -> StoreResult<Self> {
        match DocumentLocation::parse(url) {
            Some(DocumentLocation::Memory) => Self::open_in_memory(),
            Some(DocumentLocation::File(path)) => Self::open(path),
            None => Err(StoreError::Open {
                location: url.to_string(),
                source: rusqlite::Error::InvalidPath(PathBuf::from(url)),
            }),
        }
    }

    /// Open or create a store file, creating parent directories as needed
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let location = DocumentLocation::File(path.to_path_buf()).describe();
        let conn = Connection::open(path).map_err(|source| StoreError::Open {
            location: location.clone(),
            source,
        })?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;

        Self::init(conn, location)
    }

    /// Private store that disappears with the process
    pub fn open_in_memory() -> StoreResult<Self> {
        let location = DocumentLocation::Memory.describe();
        let conn = Connection::open_in_memory().map_err(|source| StoreError::Open {
            location: location.clone(),
            source,
        })?;
        Self::init(conn, location)
    }

    fn init(conn: Connection, location: String) -> StoreResult<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            location,
        })
    }

    /// Where this store keeps its data
    pub fn location(&self) -> &str {
        &self.location
    }

    async fn run<T, F>(&self, op: F) -> StoreResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> StoreResult<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let conn = conn.lock().unwrap_or_else(PoisonError::into_inner);
            op(&conn)
        })
        .await
        .map_err(|e| StoreError::Task(e.to_string()))?
    }
}

fn load(conn: &Connection, id: &str) -> StoreResult<Option<Circuit>> {
    let document: Option<String> = conn
        .query_row(
            "SELECT document FROM circuits WHERE id = ?1",
            [id],
            |row| row.get(0),
        )
        .optional()?;

    document
        .map(|doc| serde_json::from_str(&doc).map_err(StoreError::from))
        .transpose()
}

fn save(conn: &Connection, circuit: &Circuit) -> StoreResult<()> {
    let document = serde_json::to_string(circuit)?;
    conn.execute(
        "UPDATE circuits SET document = ?1 WHERE id = ?2",
        params![document, circuit.id.to_string()],
    )?;
    Ok(())
}

#[async_trait]
impl CircuitStore for DocumentStore {
    fn backend(&self) -> &'static str {
        "document"
    }

    async fn list_all(&self) -> StoreResult<Vec<Circuit>> {
        self.run(|conn| {
            let mut stmt = conn.prepare("SELECT document FROM circuits ORDER BY seq")?;
            let documents = stmt
                .query_map([], |row| row.get::<_, String>(0))?
                .collect::<Result<Vec<_>, _>>()?;

            documents
                .iter()
                .map(|doc| serde_json::from_str(doc).map_err(StoreError::from))
                .collect()
        })
        .await
    }

    async fn find_by_id(&self, id: &str) -> StoreResult<Option<Circuit>> {
        let id = id.to_string();
        self.run(move |conn| load(conn, &id)).await
    }

    async fn insert(
        &self,
        fields: CircuitFields,
        image_path: Option<String>,
    ) -> StoreResult<Circuit> {
        self.run(move |conn| {
            let key = Uuid::new_v4().simple().to_string();
            let circuit = Circuit::create(CircuitId::Key(key.clone()), fields, image_path);
            let document = serde_json::to_string(&circuit)?;

            conn.execute(
                "INSERT INTO circuits (id, document) VALUES (?1, ?2)",
                params![key, document],
            )?;

            debug!(id = %key, slug = %circuit.slug, "inserted circuit document");
            Ok(circuit)
        })
        .await
    }

    async fn update(
        &self,
        id: &str,
        fields: CircuitFields,
        image_path: Option<String>,
    ) -> StoreResult<Circuit> {
        let id = id.to_string();
        self.run(move |conn| {
            let mut circuit = load(conn, &id)?.ok_or_else(|| StoreError::NotFound(id.clone()))?;
            circuit.apply(fields, image_path);
            save(conn, &circuit)?;

            debug!(id = %id, slug = %circuit.slug, "updated circuit document");
            Ok(circuit)
        })
        .await
    }

    async fn delete(&self, id: &str) -> StoreResult<Circuit> {
        let id = id.to_string();
        self.run(move |conn| {
            let circuit = load(conn, &id)?.ok_or_else(|| StoreError::NotFound(id.clone()))?;
            conn.execute("DELETE FROM circuits WHERE id = ?1", [&id])?;

            debug!(id = %id, "deleted circuit document");
            Ok(circuit)
        })
        .await
    }
}
