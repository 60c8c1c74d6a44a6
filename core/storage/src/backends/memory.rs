//! In-memory storage backend for testing.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::any::Any;
use std::collections::HashMap;
use tokio::sync::RwLock;

use depot_common::{Content, Error, ReadMode, Result, WriteMode};

use crate::backend::{Arguments, Backend, Parameter};
use crate::storage::Storage;

/// In-memory storage entry.
#[derive(Debug, Clone)]
struct Entry {
    data: Vec<u8>,
    created: DateTime<Utc>,
    modified: DateTime<Utc>,
    accessed: DateTime<Utc>,
}

impl Entry {
    fn new(data: Vec<u8>) -> Self {
        let now = Utc::now();
        Self {
            data,
            created: now,
            modified: now,
            accessed: now,
        }
    }
}

/// In-memory storage backend.
///
/// Takes no configuration. All data is stored in memory and lost on drop.
pub struct MemoryStorage {
    objects: RwLock<HashMap<String, Entry>>,
}

impl MemoryStorage {
    /// Create a new empty memory backend.
    pub fn new() -> Self {
        Self {
            objects: RwLock::new(HashMap::new()),
        }
    }

    async fn entry(&self, name: &str) -> Result<Entry> {
        self.objects
            .read()
            .await
            .get(name)
            .cloned()
            .ok_or_else(|| not_found(name))
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

fn not_found(name: &str) -> Error {
    Error::NotFound(format!("Object not found: {}", name))
}

impl Backend for MemoryStorage {
    const MODULE: &'static str = "depot.backends.memory";
    const TYPE_NAME: &'static str = "MemoryStorage";
    const PARAMETERS: &'static [Parameter] = &[];

    fn from_arguments(_arguments: Arguments) -> Result<Self> {
        Ok(Self::new())
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    fn name(&self) -> &str {
        "memory"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    async fn read(&self, name: &str, mode: ReadMode) -> Result<Content> {
        let data = {
            let mut objects = self.objects.write().await;
            let entry = objects.get_mut(name).ok_or_else(|| not_found(name))?;
            entry.accessed = Utc::now();
            entry.data.clone()
        };
        Content::from_bytes(data, mode)
    }

    async fn write(&self, name: &str, content: Content, mode: WriteMode) -> Result<()> {
        let mut objects = self.objects.write().await;
        match objects.get_mut(name) {
            Some(entry) => match mode {
                WriteMode::CreateNew => {
                    return Err(Error::AlreadyExists(format!(
                        "Object already exists: {}",
                        name
                    )));
                }
                WriteMode::Append => {
                    entry.data.extend_from_slice(content.as_bytes());
                    entry.modified = Utc::now();
                }
                WriteMode::Overwrite => {
                    entry.data = content.into_bytes();
                    entry.modified = Utc::now();
                }
            },
            None => {
                objects.insert(name.to_string(), Entry::new(content.into_bytes()));
            }
        }
        Ok(())
    }

    async fn delete(&self, name: &str) -> Result<()> {
        self.objects
            .write()
            .await
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| not_found(name))
    }

    async fn exists(&self, name: &str) -> Result<bool> {
        Ok(self.objects.read().await.contains_key(name))
    }

    async fn size(&self, name: &str) -> Result<u64> {
        Ok(self.entry(name).await?.data.len() as u64)
    }

    async fn get_created_time(&self, name: &str) -> Result<DateTime<Utc>> {
        Ok(self.entry(name).await?.created)
    }

    async fn get_modified_time(&self, name: &str) -> Result<DateTime<Utc>> {
        Ok(self.entry(name).await?.modified)
    }

    async fn get_access_time(&self, name: &str) -> Result<DateTime<Utc>> {
        Ok(self.entry(name).await?.accessed)
    }
}
