//! Photo bucket operations
//!
//! [`PhotoBucket`] composes the single-call [`Storage`] primitives into the
//! operations the web handlers need: newest-first listings across every page,
//! tag-filtered views, and presigned reads that degrade to `None`.

use crate::traits::{Storage, StorageResult};
use futures::stream::{self, StreamExt};
use shutterbox_core::{LastModified, PhotoObject, TagSet};
use std::sync::Arc;
use std::time::Duration;

/// Concurrent tag lookups during a filtered listing.
const TAG_LOOKUP_CONCURRENCY: usize = 8;

/// Required tag for a filtered listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagFilter {
    pub key: String,
    pub value: String,
}

impl TagFilter {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    fn matches(&self, tags: &TagSet) -> bool {
        tags.get(&self.key) == Some(&self.value)
    }
}

/// Parameters of a newest-first listing.
#[derive(Debug, Clone)]
pub struct ListQuery {
    pub prefix: String,
    pub tag_filter: Option<TagFilter>,
    pub limit: usize,
    /// Key left out of the result, e.g. the well-known latest key.
    pub exclude_key: Option<String>,
}

impl ListQuery {
    pub fn new(prefix: impl Into<String>, limit: usize) -> Self {
        Self {
            prefix: prefix.into(),
            tag_filter: None,
            limit,
            exclude_key: None,
        }
    }

    pub fn with_tag(mut self, filter: TagFilter) -> Self {
        self.tag_filter = Some(filter);
        self
    }

    pub fn excluding(mut self, key: impl Into<String>) -> Self {
        self.exclude_key = Some(key.into());
        self
    }
}

#[derive(Clone)]
pub struct PhotoBucket {
    storage: Arc<dyn Storage>,
    presign_expiry: Duration,
}

impl PhotoBucket {
    pub fn new(storage: Arc<dyn Storage>, presign_expiry: Duration) -> Self {
        Self {
            storage,
            presign_expiry,
        }
    }

    pub fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }

    pub fn presign_expiry(&self) -> Duration {
        self.presign_expiry
    }

    /// Newest objects under `query.prefix`, most recent first.
    ///
    /// The whole listing is collected before sorting since pages arrive in
    /// key order. With a tag filter, objects whose tag lookup fails are left
    /// out rather than failing the listing.
    pub async fn list_newest(&self, query: &ListQuery) -> StorageResult<Vec<PhotoObject>> {
        let mut objects = Vec::new();
        let mut token = None;
        let mut pages = 0usize;
        loop {
            let page = self.storage.list_page(&query.prefix, token).await?;
            pages += 1;
            objects.extend(page.objects);
            token = page.next_token;
            if token.is_none() {
                break;
            }
        }

        if let Some(ref exclude) = query.exclude_key {
            objects.retain(|o| &o.key != exclude);
        }

        let listed = objects.len();

        if let Some(ref filter) = query.tag_filter {
            objects = stream::iter(objects)
                .map(|obj| async move {
                    match self.storage.get_tags(&obj.key).await {
                        Ok(tags) => filter.matches(&tags).then_some(obj),
                        Err(e) => {
                            tracing::debug!(
                                key = %obj.key,
                                error = %e,
                                "Tag lookup failed, excluding object"
                            );
                            None
                        }
                    }
                })
                .buffered(TAG_LOOKUP_CONCURRENCY)
                .filter_map(|obj| async move { obj })
                .collect()
                .await;
        }

        objects.sort_by(|a, b| {
            b.last_modified
                .cmp(&a.last_modified)
                .then_with(|| a.key.cmp(&b.key))
        });
        objects.truncate(query.limit);

        tracing::debug!(
            prefix = %query.prefix,
            pages,
            listed,
            returned = objects.len(),
            filtered = query.tag_filter.is_some(),
            "Listed newest objects"
        );

        Ok(objects)
    }

    /// Time-limited read URL, or `None` when the object is missing or the
    /// provider call fails.
    pub async fn presign_get(&self, key: &str) -> Option<String> {
        match self.storage.head(key).await {
            Ok(_) => {}
            Err(e) if e.is_not_found() => {
                tracing::debug!(key = %key, "Presign skipped, object does not exist");
                return None;
            }
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Presign skipped, head failed");
                return None;
            }
        }

        match self
            .storage
            .get_presigned_url(key, self.presign_expiry)
            .await
        {
            Ok(url) => Some(url),
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Failed to presign URL");
                None
            }
        }
    }

    /// Add or overwrite one tag, keeping the rest of the object's tag set.
    pub async fn put_tag(&self, key: &str, tag_key: &str, tag_value: &str) -> StorageResult<()> {
        let mut tags = self.storage.get_tags(key).await?;
        tags.insert(tag_key.to_string(), tag_value.to_string());
        self.storage.put_tags(key, &tags).await?;
        tracing::info!(key = %key, tag_key = %tag_key, tag_value = %tag_value, "Object tagged");
        Ok(())
    }

    pub async fn upload(&self, key: &str, content: Vec<u8>, content_type: &str) -> StorageResult<()> {
        self.storage.upload_with_key(key, content, content_type).await
    }

    pub async fn download(&self, key: &str) -> StorageResult<Vec<u8>> {
        self.storage.download(key).await
    }

    pub async fn last_modified(&self, key: &str) -> LastModified {
        match self.storage.head(key).await {
            Ok(obj) => LastModified::At(obj.last_modified),
            Err(e) => {
                tracing::debug!(key = %key, error = %e, "Last-modified unavailable");
                LastModified::Unknown
            }
        }
    }

    /// Copy `src_key` onto `dst_key`, then delete the source.
    ///
    /// Not atomic: when the delete fails both objects remain and the error
    /// is returned.
    pub async fn copy_then_delete(&self, src_key: &str, dst_key: &str) -> StorageResult<()> {
        self.storage.copy(src_key, dst_key).await?;
        if let Err(e) = self.storage.delete(src_key).await {
            tracing::warn!(
                src_key = %src_key,
                dst_key = %dst_key,
                error = %e,
                "Copied but failed to delete source; both objects remain"
            );
            return Err(e);
        }
        tracing::info!(src_key = %src_key, dst_key = %dst_key, "Object moved");
        Ok(())
    }
}
