use crate::error::AppError;
use crate::models::payload::VideoSegment;

/// Raw output of a media synthesis backend.
#[derive(Debug, Clone)]
pub struct GeneratedMedia {
    pub bytes: Vec<u8>,
    pub mime_type: String,
    pub extension: String,
}

/// Media synthesis backend injected into the asset worker. The concrete
/// video/image pipelines live outside this service; the worker only needs
/// bytes, a MIME type, and a file extension back.
#[async_trait::async_trait]
pub trait MediaGenerator: Send + Sync {
    async fn synthesize_video(
        &self,
        title: &str,
        segments: &[VideoSegment],
    ) -> Result<GeneratedMedia, AppError>;

    async fn synthesize_image(
        &self,
        title: &str,
        description: &str,
    ) -> Result<GeneratedMedia, AppError>;
}

/// Placeholder backend: every call fails with a generation error, which the
/// worker records on the asset like any other synthesis failure.
pub struct UnconfiguredGenerator;

#[async_trait::async_trait]
impl MediaGenerator for UnconfiguredGenerator {
    async fn synthesize_video(
        &self,
        _title: &str,
        _segments: &[VideoSegment],
    ) -> Result<GeneratedMedia, AppError> {
        Err(AppError::Generation(
            "video synthesis backend is not configured".to_string(),
        ))
    }

    async fn synthesize_image(
        &self,
        _title: &str,
        _description: &str,
    ) -> Result<GeneratedMedia, AppError> {
        Err(AppError::Generation(
            "image synthesis backend is not configured".to_string(),
        ))
    }
}
