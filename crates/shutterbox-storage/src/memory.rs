//! In-process storage backend
//!
//! Objects live in a key-ordered map, so listings page through keys the same
//! way a bucket does. Every write stamps a strictly increasing last-modified
//! time, which keeps "newest first" ordering deterministic in tests.

use crate::traits::{ObjectPage, Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use shutterbox_core::{PhotoObject, TagSet};
use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::RwLock;

const DEFAULT_PAGE_SIZE: usize = 1000;

#[derive(Debug, Clone)]
struct StoredObject {
    data: Vec<u8>,
    content_type: String,
    tags: TagSet,
    last_modified: DateTime<Utc>,
}

#[derive(Default)]
struct Bucket {
    objects: BTreeMap<String, StoredObject>,
    last_stamp: Option<DateTime<Utc>>,
}

impl Bucket {
    fn next_stamp(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let stamp = match self.last_stamp {
            Some(prev) if now <= prev => prev + ChronoDuration::milliseconds(1),
            _ => now,
        };
        self.last_stamp = Some(stamp);
        stamp
    }
}

/// Storage backend that keeps every object in memory.
pub struct MemoryStorage {
    bucket: RwLock<Bucket>,
    page_size: usize,
    read_only: AtomicBool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::with_page_size(DEFAULT_PAGE_SIZE)
    }

    /// Small page sizes force callers through the continuation cursor path.
    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            bucket: RwLock::new(Bucket::default()),
            page_size: page_size.max(1),
            read_only: AtomicBool::new(false),
        }
    }

    /// When set, every mutating call fails with a backend error.
    pub fn set_read_only(&self, read_only: bool) {
        self.read_only.store(read_only, Ordering::SeqCst);
    }

    /// Number of objects currently stored.
    pub async fn len(&self) -> usize {
        self.bucket.read().await.objects.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Content type recorded for an object.
    pub async fn content_type(&self, storage_key: &str) -> Option<String> {
        self.bucket
            .read()
            .await
            .objects
            .get(storage_key)
            .map(|o| o.content_type.clone())
    }

    fn check_writable(&self, op: &str) -> StorageResult<()> {
        if self.read_only.load(Ordering::SeqCst) {
            return Err(StorageError::BackendError(format!(
                "{} rejected: storage is read-only",
                op
            )));
        }
        Ok(())
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn list_page(
        &self,
        prefix: &str,
        continuation_token: Option<String>,
    ) -> StorageResult<ObjectPage> {
        let bucket = self.bucket.read().await;

        let lower = match continuation_token {
            Some(token) => Bound::Excluded(token),
            None => Bound::Included(prefix.to_string()),
        };

        let mut objects = Vec::new();
        let mut next_token = None;
        for (key, obj) in bucket
            .objects
            .range((lower, Bound::Unbounded))
            .take_while(|(key, _)| key.starts_with(prefix))
        {
            if objects.len() == self.page_size {
                next_token = objects.last().map(|o: &PhotoObject| o.key.clone());
                break;
            }
            objects.push(PhotoObject::new(key, obj.last_modified));
        }

        Ok(ObjectPage {
            objects,
            next_token,
        })
    }

    async fn get_tags(&self, storage_key: &str) -> StorageResult<TagSet> {
        self.bucket
            .read()
            .await
            .objects
            .get(storage_key)
            .map(|o| o.tags.clone())
            .ok_or_else(|| StorageError::NotFound(storage_key.to_string()))
    }

    async fn put_tags(&self, storage_key: &str, tags: &TagSet) -> StorageResult<()> {
        self.check_writable("put_tags")?;
        let mut bucket = self.bucket.write().await;
        let obj = bucket
            .objects
            .get_mut(storage_key)
            .ok_or_else(|| StorageError::NotFound(storage_key.to_string()))?;
        obj.tags = tags.clone();
        Ok(())
    }

    async fn upload_with_key(
        &self,
        storage_key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> StorageResult<()> {
        self.check_writable("upload")?;
        if storage_key.is_empty() {
            return Err(StorageError::InvalidKey("empty key".to_string()));
        }

        let mut bucket = self.bucket.write().await;
        let last_modified = bucket.next_stamp();
        bucket.objects.insert(
            storage_key.to_string(),
            StoredObject {
                data,
                content_type: content_type.to_string(),
                tags: TagSet::new(),
                last_modified,
            },
        );
        tracing::debug!(key = %storage_key, "Memory upload successful");
        Ok(())
    }

    async fn download(&self, storage_key: &str) -> StorageResult<Vec<u8>> {
        self.bucket
            .read()
            .await
            .objects
            .get(storage_key)
            .map(|o| o.data.clone())
            .ok_or_else(|| StorageError::NotFound(storage_key.to_string()))
    }

    async fn head(&self, storage_key: &str) -> StorageResult<PhotoObject> {
        self.bucket
            .read()
            .await
            .objects
            .get(storage_key)
            .map(|o| PhotoObject::new(storage_key, o.last_modified))
            .ok_or_else(|| StorageError::NotFound(storage_key.to_string()))
    }

    async fn get_presigned_url(
        &self,
        storage_key: &str,
        expires_in: Duration,
    ) -> StorageResult<String> {
        Ok(format!(
            "memory://{}?expires_in={}",
            urlencoding::encode(storage_key),
            expires_in.as_secs()
        ))
    }

    async fn copy(&self, from_key: &str, to_key: &str) -> StorageResult<()> {
        self.check_writable("copy")?;
        let mut bucket = self.bucket.write().await;
        let source = bucket
            .objects
            .get(from_key)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(from_key.to_string()))?;
        let last_modified = bucket.next_stamp();
        // A copy starts with a fresh tag set, like a provider-side copy with replaced metadata.
        bucket.objects.insert(
            to_key.to_string(),
            StoredObject {
                tags: TagSet::new(),
                last_modified,
                ..source
            },
        );
        Ok(())
    }

    async fn delete(&self, storage_key: &str) -> StorageResult<()> {
        self.check_writable("delete")?;
        self.bucket.write().await.objects.remove(storage_key);
        Ok(())
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Memory
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_list_pages_follow_cursor() {
        let storage = MemoryStorage::with_page_size(2);
        for name in ["a", "b", "c", "d", "e"] {
            storage
                .upload_with_key(&format!("upload/{}", name), vec![1], "image/jpeg")
                .await
                .unwrap();
        }
        storage
            .upload_with_key("other/z", vec![1], "image/jpeg")
            .await
            .unwrap();

        let mut keys = Vec::new();
        let mut token = None;
        let mut pages = 0;
        loop {
            let page = storage.list_page("upload/", token).await.unwrap();
            pages += 1;
            keys.extend(page.objects.into_iter().map(|o| o.key));
            token = page.next_token;
            if token.is_none() {
                break;
            }
        }

        assert_eq!(pages, 3);
        assert_eq!(
            keys,
            vec!["upload/a", "upload/b", "upload/c", "upload/d", "upload/e"]
        );
    }

    #[tokio::test]
    async fn test_timestamps_strictly_increase() {
        let storage = MemoryStorage::new();
        storage.upload_with_key("k1", vec![1], "image/jpeg").await.unwrap();
        storage.upload_with_key("k2", vec![2], "image/jpeg").await.unwrap();

        let first = storage.head("k1").await.unwrap();
        let second = storage.head("k2").await.unwrap();
        assert!(second.last_modified > first.last_modified);
    }

    #[tokio::test]
    async fn test_copy_keeps_content_and_resets_tags() {
        let storage = MemoryStorage::new();
        storage.upload_with_key("src", vec![7, 8], "image/jpeg").await.unwrap();
        let mut tags = TagSet::new();
        tags.insert("approved".to_string(), "true".to_string());
        storage.put_tags("src", &tags).await.unwrap();

        storage.copy("src", "dst").await.unwrap();

        assert_eq!(storage.download("dst").await.unwrap(), vec![7, 8]);
        assert!(storage.get_tags("dst").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_object_not_found() {
        let storage = MemoryStorage::new();
        assert!(storage.head("nope").await.unwrap_err().is_not_found());
        assert!(storage.get_tags("nope").await.unwrap_err().is_not_found());
        assert!(storage.copy("nope", "x").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_read_only_rejects_writes() {
        let storage = MemoryStorage::new();
        storage.set_read_only(true);
        assert!(storage
            .upload_with_key("k", vec![1], "image/jpeg")
            .await
            .is_err());
        assert!(storage.is_empty().await);
    }
}
