//! Persistent maps backing the issuer registry.
//!
//! The registry keeps three independent namespaces. A key in one map never
//! refers to a record in another.

use parking_lot::RwLock;
use sled::transaction::{ConflictableTransactionResult, TransactionError};
use sled::{Db, Transactional, Tree};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

/// Storage errors
#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sled::Error),
    #[error("Write batch aborted")]
    Aborted,
}

pub type Result<T> = std::result::Result<T, StorageError>;

/// The logical maps of the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MapId {
    /// schema name -> definition string
    SchemaDefinitions,
    /// schema name -> revocable flag
    RevocableSchemas,
    /// claim id -> encoded status
    Claims,
}

impl MapId {
    pub const ALL: [MapId; 3] = [
        MapId::SchemaDefinitions,
        MapId::RevocableSchemas,
        MapId::Claims,
    ];

    pub fn tree_name(self) -> &'static str {
        match self {
            MapId::SchemaDefinitions => "schema_definitions",
            MapId::RevocableSchemas => "revocable_schemas",
            MapId::Claims => "claims",
        }
    }
}

impl fmt::Display for MapId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tree_name())
    }
}

/// One record write inside [`RegistryStore::put_all`].
#[derive(Debug, Clone, Copy)]
pub struct Write<'a> {
    pub map: MapId,
    pub key: &'a [u8],
    pub value: &'a [u8],
}

impl<'a> Write<'a> {
    pub fn new(map: MapId, key: &'a [u8], value: &'a [u8]) -> Self {
        Self { map, key, value }
    }
}

/// Abstract storage trait
///
/// A missing key reads as `None`. Callers treat an empty value the same way.
pub trait RegistryStore {
    fn get(&self, map: MapId, key: &[u8]) -> Result<Option<Vec<u8>>>;
    fn put(&self, map: MapId, key: &[u8], value: &[u8]) -> Result<()>;
    /// Apply every write or none of them.
    fn put_all(&self, writes: &[Write<'_>]) -> Result<()>;
    fn flush(&self) -> Result<()>;
}

/// Sled-backed implementation
pub struct SledStorage {
    db: Db,
    schema_definitions: Tree,
    revocable_schemas: Tree,
    claims: Tree,
}

impl SledStorage {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let db = sled::open(path)?;
        let schema_definitions = db.open_tree(MapId::SchemaDefinitions.tree_name())?;
        let revocable_schemas = db.open_tree(MapId::RevocableSchemas.tree_name())?;
        let claims = db.open_tree(MapId::Claims.tree_name())?;

        tracing::debug!(
            schemas = schema_definitions.len(),
            claims = claims.len(),
            "opened registry store"
        );

        Ok(Self {
            db,
            schema_definitions,
            revocable_schemas,
            claims,
        })
    }

    fn tree(&self, map: MapId) -> &Tree {
        match map {
            MapId::SchemaDefinitions => &self.schema_definitions,
            MapId::RevocableSchemas => &self.revocable_schemas,
            MapId::Claims => &self.claims,
        }
    }

    pub fn len(&self, map: MapId) -> usize {
        self.tree(map).len()
    }

    pub fn is_empty(&self, map: MapId) -> bool {
        self.tree(map).is_empty()
    }
}

impl RegistryStore for SledStorage {
    fn get(&self, map: MapId, key: &[u8]) -> Result<Option<Vec<u8>>> {
        Ok(self.tree(map).get(key)?.map(|v| v.to_vec()))
    }

    fn put(&self, map: MapId, key: &[u8], value: &[u8]) -> Result<()> {
        self.tree(map).insert(key, value)?;
        Ok(())
    }

    fn put_all(&self, writes: &[Write<'_>]) -> Result<()> {
        let trees = (&self.schema_definitions, &self.revocable_schemas, &self.claims);
        trees
            .transaction(
                |(defs, revocable, claims)| -> ConflictableTransactionResult<(), ()> {
                    for write in writes {
                        let tree = match write.map {
                            MapId::SchemaDefinitions => defs,
                            MapId::RevocableSchemas => revocable,
                            MapId::Claims => claims,
                        };
                        tree.insert(write.key, write.value)?;
                    }
                    Ok(())
                },
            )
            .map_err(|err| match err {
                TransactionError::Storage(e) => StorageError::Database(e),
                TransactionError::Abort(()) => StorageError::Aborted,
            })
    }

    fn flush(&self) -> Result<()> {
        self.db.flush()?;
        Ok(())
    }
}

/// In-memory testing backend
///
/// Counts every write so callers can check that an operation left the store
/// untouched.
#[derive(Default)]
pub struct MemoryStorage {
    maps: RwLock<HashMap<MapId, HashMap<Vec<u8>, Vec<u8>>>>,
    writes: AtomicU64,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write_count(&self) -> u64 {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn len(&self, map: MapId) -> usize {
        self.maps.read().get(&map).map(HashMap::len).unwrap_or(0)
    }

    pub fn is_empty(&self, map: MapId) -> bool {
        self.len(map) == 0
    }
}

impl RegistryStore for MemoryStorage {
    fn get(&self, map: MapId, key: &[u8]) -> Result<Option<Vec<u8>>> {
        Ok(self
            .maps
            .read()
            .get(&map)
            .and_then(|entries| entries.get(key))
            .cloned())
    }

    fn put(&self, map: MapId, key: &[u8], value: &[u8]) -> Result<()> {
        self.maps
            .write()
            .entry(map)
            .or_default()
            .insert(key.to_vec(), value.to_vec());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn put_all(&self, writes: &[Write<'_>]) -> Result<()> {
        let mut maps = self.maps.write();
        for write in writes {
            maps.entry(write.map)
                .or_default()
                .insert(write.key.to_vec(), write.value.to_vec());
        }
        self.writes.fetch_add(writes.len() as u64, Ordering::SeqCst);
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage_keeps_maps_apart() {
        let storage = MemoryStorage::new();
        storage.put(MapId::SchemaDefinitions, b"degree", b"def").unwrap();

        assert_eq!(
            storage.get(MapId::SchemaDefinitions, b"degree").unwrap(),
            Some(b"def".to_vec())
        );
        assert_eq!(
            storage.get(MapId::RevocableSchemas, b"degree").unwrap(),
            None
        );
        assert_eq!(storage.get(MapId::Claims, b"degree").unwrap(), None);
    }

    #[test]
    fn test_memory_storage_counts_writes() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.write_count(), 0);

        storage.put(MapId::Claims, b"c1", &[0x01]).unwrap();
        storage.put(MapId::Claims, b"c1", &[0x02]).unwrap();
        storage.get(MapId::Claims, b"c1").unwrap();

        assert_eq!(storage.write_count(), 2);
        assert_eq!(storage.len(MapId::Claims), 1);
    }

    #[test]
    fn test_memory_storage_put_all_spans_maps() {
        let storage = MemoryStorage::new();
        storage
            .put_all(&[
                Write::new(MapId::SchemaDefinitions, b"diploma", b"degree:string"),
                Write::new(MapId::RevocableSchemas, b"diploma", &[0x01]),
            ])
            .unwrap();

        assert_eq!(storage.write_count(), 2);
        assert_eq!(
            storage.get(MapId::RevocableSchemas, b"diploma").unwrap(),
            Some(vec![0x01])
        );
    }

    #[test]
    fn test_tree_names_are_distinct() {
        let names: std::collections::HashSet<_> =
            MapId::ALL.iter().map(|m| m.tree_name()).collect();
        assert_eq!(names.len(), MapId::ALL.len());
    }
}
