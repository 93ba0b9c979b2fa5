//! Approval strategies
//!
//! Two ways of publishing an approved photo exist:
//! - tag mode marks the object `approved=true` and the gallery lists tagged objects;
//! - rename mode copies the object onto the well-known latest key, deletes the
//!   source, and the gallery shows that single key.

use async_trait::async_trait;
use shutterbox_core::{AppError, ApprovalMode, Config, PhotoObject};
use shutterbox_storage::{ListQuery, PhotoBucket, StorageResult, TagFilter};
use std::sync::Arc;

#[async_trait]
pub trait ApprovalStrategy: Send + Sync {
    fn mode(&self) -> ApprovalMode;

    /// Photos shown on the public gallery, newest first.
    async fn gallery(&self, bucket: &PhotoBucket) -> StorageResult<Vec<PhotoObject>>;

    /// Photos awaiting review, newest first. Index positions in this list
    /// are what the review form submits.
    async fn review_queue(&self, bucket: &PhotoBucket) -> StorageResult<Vec<PhotoObject>>;

    /// Publish the object at `key`.
    async fn approve(&self, bucket: &PhotoBucket, key: &str) -> StorageResult<()>;

    /// Where a successful upload redirects to.
    fn upload_redirect(&self) -> &'static str;
}

/// Review listing shared by both strategies: every recent upload except the
/// latest key.
fn review_query(config: &Config) -> ListQuery {
    ListQuery::new(config.key_prefix.clone(), config.review_limit).excluding(config.latest_key.clone())
}

pub struct TagApprovalStrategy {
    gallery_query: ListQuery,
    review_query: ListQuery,
    tag: TagFilter,
}

impl TagApprovalStrategy {
    pub fn new(config: &Config) -> Self {
        let tag = TagFilter::new(
            config.approved_tag_key.clone(),
            config.approved_tag_value.clone(),
        );
        Self {
            gallery_query: ListQuery::new(config.key_prefix.clone(), config.gallery_limit)
                .excluding(config.latest_key.clone())
                .with_tag(tag.clone()),
            review_query: review_query(config),
            tag,
        }
    }
}

#[async_trait]
impl ApprovalStrategy for TagApprovalStrategy {
    fn mode(&self) -> ApprovalMode {
        ApprovalMode::Tag
    }

    async fn gallery(&self, bucket: &PhotoBucket) -> StorageResult<Vec<PhotoObject>> {
        bucket.list_newest(&self.gallery_query).await
    }

    async fn review_queue(&self, bucket: &PhotoBucket) -> StorageResult<Vec<PhotoObject>> {
        bucket.list_newest(&self.review_query).await
    }

    async fn approve(&self, bucket: &PhotoBucket, key: &str) -> StorageResult<()> {
        bucket.put_tag(key, &self.tag.key, &self.tag.value).await
    }

    fn upload_redirect(&self) -> &'static str {
        "/upload-success"
    }
}

pub struct RenameApprovalStrategy {
    latest_key: String,
    review_query: ListQuery,
}

impl RenameApprovalStrategy {
    pub fn new(config: &Config) -> Self {
        Self {
            latest_key: config.latest_key.clone(),
            review_query: review_query(config),
        }
    }
}

#[async_trait]
impl ApprovalStrategy for RenameApprovalStrategy {
    fn mode(&self) -> ApprovalMode {
        ApprovalMode::Rename
    }

    async fn gallery(&self, bucket: &PhotoBucket) -> StorageResult<Vec<PhotoObject>> {
        match bucket.storage().head(&self.latest_key).await {
            Ok(obj) => Ok(vec![obj]),
            Err(e) if e.is_not_found() => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }

    async fn review_queue(&self, bucket: &PhotoBucket) -> StorageResult<Vec<PhotoObject>> {
        bucket.list_newest(&self.review_query).await
    }

    async fn approve(&self, bucket: &PhotoBucket, key: &str) -> StorageResult<()> {
        bucket.copy_then_delete(key, &self.latest_key).await
    }

    fn upload_redirect(&self) -> &'static str {
        "/?uploaded=1"
    }
}

pub fn strategy_for(config: &Config) -> Arc<dyn ApprovalStrategy> {
    match config.approval_mode {
        ApprovalMode::Tag => Arc::new(TagApprovalStrategy::new(config)),
        ApprovalMode::Rename => Arc::new(RenameApprovalStrategy::new(config)),
    }
}

/// Result of an approve-by-index request that passed the guards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Approval {
    pub key: String,
    /// `false` when the storage call failed; the failure has been logged.
    pub applied: bool,
}

/// Resolve `index` against a fresh review listing and approve that object.
///
/// The listing is re-run here, so uploads that arrived since the review page
/// was rendered can shift positions. When the page supplied `expected_key`,
/// a shifted entry is refused with a conflict instead of approving the wrong
/// photo. Neither guard mutates anything.
pub async fn approve_by_index(
    strategy: &dyn ApprovalStrategy,
    bucket: &PhotoBucket,
    index: usize,
    expected_key: Option<&str>,
) -> Result<Approval, AppError> {
    let queue = match strategy.review_queue(bucket).await {
        Ok(queue) => queue,
        Err(e) => {
            tracing::warn!(error = %e, "Review listing failed while approving");
            Vec::new()
        }
    };

    let target = queue.get(index).ok_or_else(|| {
        AppError::BadRequest(format!(
            "Index {} is out of range for {} pending photos",
            index,
            queue.len()
        ))
    })?;

    if let Some(expected) = expected_key {
        if expected != target.key {
            tracing::warn!(
                index,
                expected_key = %expected,
                actual_key = %target.key,
                "Review listing changed since the page was rendered"
            );
            return Err(AppError::Conflict(
                "The review list changed; reload the page and try again".to_string(),
            ));
        }
    }

    let applied = match strategy.approve(bucket, &target.key).await {
        Ok(()) => {
            tracing::info!(key = %target.key, mode = %strategy.mode(), "Photo approved");
            true
        }
        Err(e) => {
            tracing::error!(key = %target.key, mode = %strategy.mode(), error = %e, "Approval failed");
            false
        }
    };

    Ok(Approval {
        key: target.key.clone(),
        applied,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use shutterbox_storage::{MemoryStorage, Storage};
    use std::time::Duration;

    fn config(mode: &str) -> Config {
        Config::from_json(&format!(
            r#"{{ "ADMIN_PASS": "x", "STORAGE_BACKEND": "memory", "APPROVAL_MODE": "{}" }}"#,
            mode
        ))
        .unwrap()
    }

    async fn bucket_with(keys: &[&str]) -> (Arc<MemoryStorage>, PhotoBucket) {
        let storage = Arc::new(MemoryStorage::new());
        for key in keys {
            storage
                .upload_with_key(key, vec![1, 2, 3], "image/jpeg")
                .await
                .unwrap();
        }
        let bucket = PhotoBucket::new(storage.clone(), Duration::from_secs(60));
        (storage, bucket)
    }

    #[tokio::test]
    async fn test_tag_mode_approves_by_index() {
        let config = config("tag");
        let strategy = strategy_for(&config);
        let (storage, bucket) = bucket_with(&["upload/a.jpg", "upload/b.jpg", "upload/c.jpg"]).await;

        // Newest first: c, b, a
        let approval = approve_by_index(strategy.as_ref(), &bucket, 1, None).await.unwrap();
        assert_eq!(approval.key, "upload/b.jpg");
        assert!(approval.applied);

        let tags = storage.get_tags("upload/b.jpg").await.unwrap();
        assert_eq!(tags.get("approved").map(String::as_str), Some("true"));
        assert!(storage.get_tags("upload/a.jpg").await.unwrap().is_empty());
        assert!(storage.get_tags("upload/c.jpg").await.unwrap().is_empty());

        let gallery = strategy.gallery(&bucket).await.unwrap();
        assert_eq!(gallery.len(), 1);
        assert_eq!(gallery[0].key, "upload/b.jpg");
    }

    #[tokio::test]
    async fn test_out_of_range_index_changes_nothing() {
        let config = config("tag");
        let strategy = strategy_for(&config);
        let (storage, bucket) = bucket_with(&["upload/a.jpg", "upload/b.jpg"]).await;

        let err = approve_by_index(strategy.as_ref(), &bucket, 2, None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
        for key in ["upload/a.jpg", "upload/b.jpg"] {
            assert!(storage.get_tags(key).await.unwrap().is_empty());
        }
    }

    #[tokio::test]
    async fn test_key_mismatch_is_conflict() {
        let config = config("tag");
        let strategy = strategy_for(&config);
        let (storage, bucket) = bucket_with(&["upload/a.jpg", "upload/b.jpg"]).await;

        let err = approve_by_index(strategy.as_ref(), &bucket, 0, Some("upload/a.jpg"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert!(storage.get_tags("upload/b.jpg").await.unwrap().is_empty());

        let ok = approve_by_index(strategy.as_ref(), &bucket, 0, Some("upload/b.jpg"))
            .await
            .unwrap();
        assert_eq!(ok.key, "upload/b.jpg");
    }

    #[tokio::test]
    async fn test_rename_mode_moves_to_latest() {
        let config = config("rename");
        let strategy = strategy_for(&config);
        assert_eq!(strategy.upload_redirect(), "/?uploaded=1");
        let (storage, bucket) = bucket_with(&["upload/a.jpg", "upload/b.jpg"]).await;

        assert!(strategy.gallery(&bucket).await.unwrap().is_empty());

        let approval = approve_by_index(strategy.as_ref(), &bucket, 1, None).await.unwrap();
        assert_eq!(approval.key, "upload/a.jpg");
        assert!(storage.head("upload/a.jpg").await.is_err());
        assert!(storage.head("latest").await.is_ok());

        let gallery = strategy.gallery(&bucket).await.unwrap();
        assert_eq!(gallery[0].key, "latest");

        let queue = strategy.review_queue(&bucket).await.unwrap();
        let keys: Vec<_> = queue.iter().map(|o| o.key.as_str()).collect();
        assert_eq!(keys, vec!["upload/b.jpg"]);
    }

    #[tokio::test]
    async fn test_failed_approval_is_reported_not_raised() {
        let config = config("tag");
        let strategy = strategy_for(&config);
        let (storage, bucket) = bucket_with(&["upload/a.jpg"]).await;
        storage.set_read_only(true);

        let approval = approve_by_index(strategy.as_ref(), &bucket, 0, None).await.unwrap();
        assert!(!approval.applied);
    }
}
