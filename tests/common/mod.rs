#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::Utc;
use migration::MigratorTrait;
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, Set};
use uuid::Uuid;

use studyplan_kit::entities::activity::{self, ActivityKind, AssetRollup};
use studyplan_kit::entities::asset::{self, AssetKind, AssetStatus};
use studyplan_kit::entities::daily_module;
use studyplan_kit::entities::plan::{self, PlanStatus};
use studyplan_kit::error::AppError;
use studyplan_kit::models::payload::{ActivityPayload, VideoSegment};
use studyplan_kit::services::generator::{GeneratedMedia, MediaGenerator};
use studyplan_kit::services::storage::MemoryBlobStore;
use studyplan_kit::state::AppState;

pub async fn setup_test_db() -> DatabaseConnection {
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1);
    let db = Database::connect(opt)
        .await
        .expect("Failed to connect to test database");

    migration::Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

pub fn test_state(db: DatabaseConnection, generator: Arc<dyn MediaGenerator>) -> AppState {
    AppState::new(db, Arc::new(MemoryBlobStore::new()), generator)
}

/// Generator that hands back a tiny payload and counts invocations.
#[derive(Default)]
pub struct FakeGenerator {
    pub video_calls: AtomicUsize,
    pub image_calls: AtomicUsize,
}

#[async_trait::async_trait]
impl MediaGenerator for FakeGenerator {
    async fn synthesize_video(
        &self,
        _title: &str,
        _segments: &[VideoSegment],
    ) -> Result<GeneratedMedia, AppError> {
        self.video_calls.fetch_add(1, Ordering::SeqCst);
        Ok(GeneratedMedia {
            bytes: b"fake-video".to_vec(),
            mime_type: "video/mp4".to_string(),
            extension: "mp4".to_string(),
        })
    }

    async fn synthesize_image(
        &self,
        _title: &str,
        _description: &str,
    ) -> Result<GeneratedMedia, AppError> {
        self.image_calls.fetch_add(1, Ordering::SeqCst);
        Ok(GeneratedMedia {
            bytes: b"fake-image".to_vec(),
            mime_type: "image/png".to_string(),
            extension: "png".to_string(),
        })
    }
}

/// Generator that always fails with the given message.
pub struct FailingGenerator(pub &'static str);

#[async_trait::async_trait]
impl MediaGenerator for FailingGenerator {
    async fn synthesize_video(
        &self,
        _title: &str,
        _segments: &[VideoSegment],
    ) -> Result<GeneratedMedia, AppError> {
        Err(AppError::Generation(self.0.to_string()))
    }

    async fn synthesize_image(
        &self,
        _title: &str,
        _description: &str,
    ) -> Result<GeneratedMedia, AppError> {
        Err(AppError::Generation(self.0.to_string()))
    }
}

pub async fn insert_plan(
    db: &DatabaseConnection,
    owner_id: Uuid,
    title: &str,
    total_days: i32,
) -> plan::Model {
    let now = Utc::now().naive_utc();
    plan::ActiveModel {
        id: Set(Uuid::new_v4()),
        owner_id: Set(owner_id),
        title: Set(title.to_string()),
        total_days: Set(total_days),
        hours_per_day: Set(2),
        current_day: Set(1),
        progress: Set(0),
        status: Set(PlanStatus::Active),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .expect("insert plan")
}

pub async fn insert_module(
    db: &DatabaseConnection,
    plan_id: Uuid,
    day_number: i32,
    title: &str,
) -> daily_module::Model {
    let now = Utc::now().naive_utc();
    daily_module::ActiveModel {
        id: Set(Uuid::new_v4()),
        plan_id: Set(plan_id),
        day_number: Set(day_number),
        title: Set(title.to_string()),
        is_completed: Set(false),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .expect("insert module")
}

pub async fn insert_activity(
    db: &DatabaseConnection,
    module_id: Uuid,
    position: i32,
    kind: ActivityKind,
    payload: ActivityPayload,
) -> activity::Model {
    let now = Utc::now().naive_utc();
    let asset_status = kind.carries_media().then_some(AssetRollup::Pending);
    activity::ActiveModel {
        id: Set(Uuid::new_v4()),
        module_id: Set(module_id),
        position: Set(position),
        kind: Set(kind),
        title: Set(format!("activity {position}")),
        estimated_minutes: Set(15),
        payload: Set(payload),
        is_completed: Set(false),
        asset_status: Set(asset_status),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .expect("insert activity")
}

pub async fn insert_asset(
    db: &DatabaseConnection,
    plan: &plan::Model,
    act: &activity::Model,
    kind: AssetKind,
    segment_index: Option<i32>,
    status: AssetStatus,
) -> asset::Model {
    let now = Utc::now().naive_utc();
    asset::ActiveModel {
        id: Set(Uuid::new_v4()),
        owner_id: Set(plan.owner_id),
        plan_id: Set(plan.id),
        module_id: Set(act.module_id),
        activity_id: Set(act.id),
        position: Set(act.position),
        segment_index: Set(segment_index),
        kind: Set(kind),
        status: Set(status),
        storage_path: Set(None),
        download_url: Set(None),
        error_message: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .expect("insert asset")
}

pub fn video_payload(segments: usize) -> ActivityPayload {
    ActivityPayload {
        script: Some("narration".to_string()),
        video_segments: Some(
            (0..segments)
                .map(|i| VideoSegment {
                    heading: format!("segment {i}"),
                    narration: "walkthrough of the concept".to_string(),
                    visual_prompt: None,
                })
                .collect(),
        ),
        ..Default::default()
    }
}

pub fn image_payload(description: &str) -> ActivityPayload {
    ActivityPayload {
        image_description: Some(description.to_string()),
        ..Default::default()
    }
}

pub fn quiz_payload() -> ActivityPayload {
    ActivityPayload {
        questions: Some(vec![studyplan_kit::models::payload::QuizQuestion {
            question: "What does the worker do with a ready asset?".to_string(),
            options: vec!["regenerates it".to_string(), "returns it unchanged".to_string()],
            answer_index: 1,
            explanation: None,
        }]),
        ..Default::default()
    }
}

pub fn text_payload() -> ActivityPayload {
    ActivityPayload {
        content: Some("reading material".to_string()),
        ..Default::default()
    }
}
