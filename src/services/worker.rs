use std::sync::Arc;
use std::time::Duration;

use sea_orm::sea_query::{LockBehavior, LockType};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DbBackend, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, TransactionTrait,
};
use serde::Serialize;
use tokio::time::sleep;
use uuid::Uuid;

use crate::entities::activity;
use crate::entities::asset::{self, AssetKind, AssetStatus};
use crate::entities::daily_module;
use crate::error::AppError;
use crate::services::assets;
use crate::services::generator::{GeneratedMedia, MediaGenerator};
use crate::services::storage::BlobStore;

const POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Result of driving one asset to `ready`.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct AssetOutcome {
    pub asset_id: Uuid,
    pub kind: AssetKind,
    pub storage_path: String,
    pub download_url: String,
}

/// Drives one asset at a time from `pending` to a terminal state: validate
/// the activity payload, call the generator, upload the bytes, mark ready,
/// and roll the owning activity's asset status up. At most one generation
/// call and one upload per invocation; failures are recorded on the asset
/// and never retried automatically.
pub struct AssetWorker {
    db: DatabaseConnection,
    blobs: Arc<dyn BlobStore>,
    generator: Arc<dyn MediaGenerator>,
}

impl AssetWorker {
    pub fn new(
        db: DatabaseConnection,
        blobs: Arc<dyn BlobStore>,
        generator: Arc<dyn MediaGenerator>,
    ) -> Self {
        Self { db, blobs, generator }
    }

    /// Batch driver: recover assets a crashed run left `generating`, then
    /// poll the pending queue. Per-asset failures are logged and isolated;
    /// the loop keeps going.
    pub async fn run(&self) {
        tracing::info!("asset worker started");

        match assets::release_stale_generating(&self.db).await {
            Ok(0) => {}
            Ok(n) => tracing::info!("released {n} stale generating assets back to pending"),
            Err(e) => tracing::error!("stale asset recovery failed: {e}"),
        }

        loop {
            match self.next_pending().await {
                Ok(Some(asset_id)) => {
                    if let Err(e) = self.process_asset(asset_id).await {
                        tracing::warn!("asset {asset_id} did not complete: {e}");
                    }
                }
                Ok(None) => sleep(POLL_INTERVAL).await,
                Err(e) => {
                    tracing::error!("worker queue poll failed: {e}");
                    sleep(POLL_INTERVAL).await;
                }
            }
        }
    }

    /// Pick the oldest pending asset. On Postgres the row is leased with
    /// FOR UPDATE SKIP LOCKED so concurrent pollers pick distinct rows;
    /// the actual mutual exclusion is the claim inside `process_asset`.
    async fn next_pending(&self) -> Result<Option<Uuid>, AppError> {
        let txn = self.db.begin().await?;

        let mut query = asset::Entity::find()
            .filter(asset::Column::Status.eq(AssetStatus::Pending))
            .order_by_asc(asset::Column::CreatedAt)
            .limit(1);
        if self.db.get_database_backend() == DbBackend::Postgres {
            query = query.lock_with_behavior(LockType::Update, LockBehavior::SkipLocked);
        }

        let picked = query.one(&txn).await?;
        txn.commit().await?;

        Ok(picked.map(|a| a.id))
    }

    /// Drive one asset to a terminal outcome. Calling this on an asset that
    /// is already `ready` is a no-op returning the stored URL; an asset
    /// currently `generating` is a conflict and is left untouched.
    pub async fn process_asset(&self, asset_id: Uuid) -> Result<AssetOutcome, AppError> {
        let asset = assets::get(&self.db, asset_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Asset {asset_id} not found")))?;

        match asset.status {
            AssetStatus::Ready => {
                let (storage_path, download_url) = match (&asset.storage_path, &asset.download_url) {
                    (Some(p), Some(u)) => (p.clone(), u.clone()),
                    _ => {
                        return Err(AppError::Internal(format!(
                            "Asset {asset_id} is ready but has no stored location"
                        )))
                    }
                };
                return Ok(AssetOutcome {
                    asset_id,
                    kind: asset.kind,
                    storage_path,
                    download_url,
                });
            }
            AssetStatus::Generating => {
                return Err(AppError::Conflict(format!(
                    "Asset {asset_id} is already being generated"
                )));
            }
            AssetStatus::Pending | AssetStatus::Failed => {}
        }

        let module = daily_module::Entity::find_by_id(asset.module_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Module {} not found", asset.module_id)))?;

        let act = activity::Entity::find_by_id(asset.activity_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Activity {} not found", asset.activity_id))
            })?;

        if !assets::claim_for_generation(&self.db, asset_id).await? {
            return Err(AppError::Conflict(format!(
                "Asset {asset_id} is already being generated"
            )));
        }

        tracing::info!(
            "generating {:?} asset {asset_id} for plan {} day {}",
            asset.kind,
            asset.plan_id,
            module.day_number
        );

        let media = match self.synthesize(&asset, &act).await {
            Ok(media) => media,
            Err(err) => return self.fail_asset(&asset, err).await,
        };

        let storage_path = storage_key(&asset, &media.extension);
        if let Err(err) = self
            .blobs
            .put_object(&storage_path, media.bytes, &media.mime_type)
            .await
        {
            return self.fail_asset(&asset, err).await;
        }
        let download_url = self.blobs.public_url(&storage_path);

        // Ready transition and activity rollup land together or not at all.
        let txn = self.db.begin().await?;
        assets::mark_ready(&txn, asset_id, &storage_path, &download_url).await?;
        assets::rollup_activity_assets(&txn, asset.activity_id).await?;
        txn.commit().await?;

        tracing::info!("asset {asset_id} ready at {storage_path}");
        Ok(AssetOutcome {
            asset_id,
            kind: asset.kind,
            storage_path,
            download_url,
        })
    }

    /// Validate the activity payload for the asset's kind and call the
    /// matching generator.
    async fn synthesize(
        &self,
        asset: &asset::Model,
        act: &activity::Model,
    ) -> Result<GeneratedMedia, AppError> {
        match asset.kind {
            AssetKind::Video => {
                let segments = act.payload.segments();
                if segments.is_empty() {
                    return Err(AppError::Validation(format!(
                        "Activity {} has no video_segments",
                        act.id
                    )));
                }
                self.generator.synthesize_video(&act.title, segments).await
            }
            AssetKind::Image => {
                let description = act
                    .payload
                    .image_description
                    .as_deref()
                    .filter(|d| !d.is_empty())
                    .ok_or_else(|| {
                        AppError::Validation(format!(
                            "Activity {} has no image_description",
                            act.id
                        ))
                    })?;
                self.generator.synthesize_image(&act.title, description).await
            }
        }
    }

    /// Record a terminal failure on the asset and its activity rollup, then
    /// surface the original error.
    async fn fail_asset(
        &self,
        asset: &asset::Model,
        err: AppError,
    ) -> Result<AssetOutcome, AppError> {
        let message = err.to_string();
        tracing::warn!("asset {} failed: {message}", asset.id);

        let txn = self.db.begin().await?;
        assets::mark_failed(&txn, asset.id, &message).await?;
        assets::rollup_activity_assets(&txn, asset.activity_id).await?;
        txn.commit().await?;

        Err(err)
    }
}

/// Deterministic object key: regeneration of the same asset overwrites the
/// previous object instead of leaking a new one.
fn storage_key(asset: &asset::Model, extension: &str) -> String {
    format!(
        "{}/plans/{}/assets/{}.{}",
        asset.owner_id, asset.plan_id, asset.id, extension
    )
}
