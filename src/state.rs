use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::services::generator::MediaGenerator;
use crate::services::storage::BlobStore;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub blobs: Arc<dyn BlobStore>,
    pub generator: Arc<dyn MediaGenerator>,
}

impl AppState {
    pub fn new(
        db: DatabaseConnection,
        blobs: Arc<dyn BlobStore>,
        generator: Arc<dyn MediaGenerator>,
    ) -> Self {
        Self { db, blobs, generator }
    }
}
