pub mod assets;
pub mod home;
pub mod modules;
pub mod plans;

use axum::{
    routing::{get, patch, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(
        // General endpoints
        home::root,
        // Plan endpoints
        plans::create_plan,
        plans::get_plan,
        // Asset endpoints
        assets::generate_asset,
        assets::list_pending_assets,
        assets::list_plan_assets,
        // Progress endpoints
        modules::set_activity_completion,
        modules::set_activities_completion,
        modules::complete_module,
    ),
    components(
        schemas(
            home::RootResponse,
            plans::CreatePlanRequest,
            plans::CreateModuleRequest,
            plans::CreateActivityRequest,
            plans::CreatePlanResponse,
            plans::PlanDetailResponse,
            plans::ModuleResponse,
            plans::ActivityResponse,
            plans::AssetResponse,
            modules::CompletionRequest,
            modules::BulkCompletionRequest,
            crate::entities::plan::PlanStatus,
            crate::entities::activity::ActivityKind,
            crate::entities::activity::AssetRollup,
            crate::entities::asset::AssetKind,
            crate::entities::asset::AssetStatus,
            crate::models::payload::ActivityPayload,
            crate::models::payload::VideoSegment,
            crate::models::payload::QuizQuestion,
            crate::services::progress::ProgressSummary,
            crate::services::worker::AssetOutcome,
        )
    ),
    tags(
        (name = "General", description = "General API information"),
        (name = "Plans", description = "Study plan creation and inspection"),
        (name = "Assets", description = "Media asset records and generation"),
        (name = "Progress", description = "Activity completion and plan progress")
    ),
    info(
        title = "StudyPlanKit API",
        version = "0.1.0",
        description = "Asset generation workflow and progress aggregation for AI study plans",
    )
)]
struct ApiDoc;

pub fn create_routes(state: AppState) -> Router {
    // Swagger UI (stateless)
    let swagger_router: Router = SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .into();

    let app_routes = Router::new()
        .route("/", get(home::root))
        .route("/plans", post(plans::create_plan))
        .route("/plans/{id}", get(plans::get_plan))
        .route("/plans/{id}/assets", get(assets::list_plan_assets))
        .route("/assets/pending", get(assets::list_pending_assets))
        .route("/assets/{id}/generate", post(assets::generate_asset))
        .route(
            "/modules/{id}/activities/{activity_id}/completion",
            patch(modules::set_activity_completion),
        )
        .route("/modules/{id}/completion", patch(modules::set_activities_completion))
        .route("/modules/{id}/complete", post(modules::complete_module))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    Router::new().merge(swagger_router).merge(app_routes)
}
