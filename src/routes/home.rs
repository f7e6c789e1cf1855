use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
pub struct RootResponse {
    pub name: String,
    pub version: String,
    pub docs: String,
}

#[utoipa::path(
    get,
    path = "/",
    tag = "General",
    responses(
        (status = 200, description = "Service information", body = RootResponse)
    )
)]
pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        name: "StudyPlanKit API".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        docs: "/swagger-ui".to_string(),
    })
}
