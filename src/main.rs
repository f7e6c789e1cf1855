use std::sync::Arc;

use clap::{Parser, Subcommand};
use migration::MigratorTrait;
use sea_orm::Database;
use tracing_subscriber::EnvFilter;

use studyplan_kit::config::get_config;
use studyplan_kit::routes::create_routes;
use studyplan_kit::services::generator::UnconfiguredGenerator;
use studyplan_kit::services::storage::S3BlobStore;
use studyplan_kit::services::worker::AssetWorker;
use studyplan_kit::state::AppState;

#[derive(Parser)]
#[command(name = "studyplan-kit", about = "Study plan asset and progress service")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP API together with the background asset worker (default)
    Serve {
        #[arg(long, default_value_t = 3000)]
        port: u16,
    },
    /// Run only the background asset worker
    Worker,
    /// Apply pending database migrations and exit
    Migrate,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();
    let config = get_config();

    let db = Database::connect(&config.database_url)
        .await
        .expect("Failed to connect to the database");

    migration::Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    match cli.command.unwrap_or(Command::Serve { port: 3000 }) {
        Command::Migrate => {
            tracing::info!("migrations applied");
        }
        Command::Worker => {
            let blobs = Arc::new(S3BlobStore::new().await);
            if let Err(e) = blobs.ensure_bucket_exists().await {
                tracing::error!("bucket check failed: {e}");
            }
            let worker = AssetWorker::new(db, blobs, Arc::new(UnconfiguredGenerator));
            worker.run().await;
        }
        Command::Serve { port } => {
            let blobs = Arc::new(S3BlobStore::new().await);
            if let Err(e) = blobs.ensure_bucket_exists().await {
                tracing::error!("bucket check failed: {e}");
            }
            let state = AppState::new(db.clone(), blobs.clone(), Arc::new(UnconfiguredGenerator));

            let worker = AssetWorker::new(db, blobs, Arc::new(UnconfiguredGenerator));
            tokio::spawn(async move { worker.run().await });

            let app = create_routes(state);
            let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
                .await
                .expect("Failed to bind listener");
            tracing::info!("listening on {}", listener.local_addr().expect("local addr"));
            axum::serve(listener, app).await.expect("server error");
        }
    }
}
