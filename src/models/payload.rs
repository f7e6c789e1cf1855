use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Type-specific content of an activity, stored as a JSON column. Which
/// fields are populated depends on the activity kind: video activities
/// carry `script` + `video_segments`, text activities `content`, quizzes
/// `questions`, image activities `image_description`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult, ToSchema)]
pub struct ActivityPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub script: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_segments: Option<Vec<VideoSegment>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub questions: Option<Vec<QuizQuestion>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_description: Option<String>,
}

impl ActivityPayload {
    pub fn segments(&self) -> &[VideoSegment] {
        self.video_segments.as_deref().unwrap_or_default()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct VideoSegment {
    pub heading: String,
    pub narration: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visual_prompt: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub answer_index: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}
