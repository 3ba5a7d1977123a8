use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;

use business::domain::cache::{Cache, CacheError};

#[derive(Debug, Clone)]
struct CachedEntry {
    data: Vec<u8>,
    expires_at: Instant,
}

impl CachedEntry {
    fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

/// In-process cache for single-instance deployments and local runs.
#[derive(Debug, Default)]
pub struct LocalCache {
    entries: DashMap<String, CachedEntry>,
}

impl LocalCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl Cache for LocalCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        let hit = self.entries.get(key).map(|entry| {
            if entry.is_expired() {
                None
            } else {
                Some(entry.data.clone())
            }
        });

        match hit {
            Some(Some(data)) => Ok(Some(data)),
            Some(None) => {
                self.entries.remove_if(key, |_, entry| entry.is_expired());
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Duration) -> Result<(), CacheError> {
        self.entries.insert(
            key.to_string(),
            CachedEntry {
                data: value.to_vec(),
                expires_at: Instant::now() + ttl,
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.entries.remove(key);
        Ok(())
    }
}
