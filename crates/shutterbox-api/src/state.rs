//! Application state shared by every handler.
//!
//! Built once at startup and handed to the router as `Arc<AppState>`; nothing
//! in it is mutated while serving.

use crate::auth::AdminCredential;
use crate::services::approval::ApprovalStrategy;
use shutterbox_core::Config;
use shutterbox_processing::{ImageNormalizer, UploadValidator};
use shutterbox_storage::PhotoBucket;
use std::sync::Arc;

pub struct AppState {
    pub config: Arc<Config>,
    pub bucket: PhotoBucket,
    pub approval: Arc<dyn ApprovalStrategy>,
    pub validator: UploadValidator,
    pub normalizer: ImageNormalizer,
    pub templates: Arc<tera::Tera>,
    pub credential: AdminCredential,
}
