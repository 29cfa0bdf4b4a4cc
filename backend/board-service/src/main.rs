use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use board_service::clients::{
    AvatarCatalog, HttpAvatarCatalog, HttpObjectStorage, ObjectStorage, S3ObjectStorage,
};
use board_service::config::{Config, StorageBackend, StorageConfig};
use board_service::db::{self, PgCommentRepository, PgIdentityRepository, PgPostRepository};
use board_service::handlers::{self, health::HealthState, AppState};
use board_service::jobs::start_archiver;
use board_service::services::{
    ArchivalEngine, AttachmentPipeline, CommentService, IdentityResolver, ThreadService,
};
use s3_utils::S3Client;
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,actix_web=info,sqlx=warn".into());
    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn build_storage(
    cfg: &StorageConfig,
    timeout: Duration,
) -> Result<Arc<dyn ObjectStorage>, String> {
    let storage: Arc<dyn ObjectStorage> = match cfg.backend {
        StorageBackend::Http => Arc::new(
            HttpObjectStorage::new(&cfg.endpoint, &cfg.public_url, timeout)
                .map_err(|e| e.to_string())?,
        ),
        StorageBackend::S3 => {
            let client = S3Client::new().await.map_err(|e| e.to_string())?;
            Arc::new(S3ObjectStorage::new(client.operations()))
        }
    };

    for bucket in [&cfg.posts_bucket, &cfg.comments_bucket] {
        storage
            .ensure_bucket(bucket)
            .await
            .map_err(|e| format!("bucket '{}': {}", bucket, e))?;
    }
    Ok(storage)
}

fn fatal(context: &str, err: impl std::fmt::Display) -> ! {
    tracing::error!("{}: {:#}", context, err);
    eprintln!("ERROR: {}: {}", context, err);
    std::process::exit(1);
}

/// Board Service
///
/// Anonymous imageboard backend.
///
/// # Routes
///
/// - `/session/*` - Current identity and display-name override
/// - `/threads/*` - Threads and their comments
/// - `/archive/sweep` - Explicit archive sweep
/// - `/api/v1/health`, `/api/v1/health/live` - Probes
#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => fatal("Failed to load configuration", e),
    };

    tracing::info!("Starting board-service v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {}", config.app.env);

    let db_pool = match db::create_pool(&config.database).await {
        Ok(pool) => pool,
        Err(e) => fatal("Failed to create database pool", e),
    };
    if let Err(e) = db::run_migrations(&db_pool).await {
        fatal("Failed to run migrations", e);
    }

    let remote_timeout = config.limits.remote_timeout();
    let storage = match build_storage(&config.storage, remote_timeout).await {
        Ok(storage) => storage,
        Err(e) => fatal("Failed to initialise object storage", e),
    };
    let catalog: Arc<dyn AvatarCatalog> =
        match HttpAvatarCatalog::new(&config.catalog.base_url, remote_timeout) {
            Ok(catalog) => Arc::new(catalog),
            Err(e) => fatal("Failed to create avatar catalog client", e),
        };

    let posts = Arc::new(PgPostRepository::new(db_pool.clone()));
    let identities = Arc::new(IdentityResolver::new(
        Arc::new(PgIdentityRepository::new(db_pool.clone())),
        catalog,
        config.catalog.size,
        remote_timeout,
    ));
    let attachments =
        AttachmentPipeline::new(storage, config.limits.image_max_bytes, remote_timeout);
    let archival = ArchivalEngine::new(posts.clone(), config.archive.window());

    let state = web::Data::new(AppState {
        threads: ThreadService::new(
            posts,
            identities.clone(),
            attachments.clone(),
            config.storage.posts_bucket.clone(),
        ),
        comments: CommentService::new(
            Arc::new(PgCommentRepository::new(db_pool.clone())),
            identities.clone(),
            attachments,
            config.storage.comments_bucket.clone(),
        ),
        identities,
        archival: archival.clone(),
        request_max_bytes: config.limits.request_max_bytes,
    });
    let health_state = web::Data::new(HealthState::new(db_pool));

    let archiver = tokio::spawn(start_archiver(archival, config.archive.sweep_interval()));

    let bind_address = format!("{}:{}", config.app.host, config.app.port);
    tracing::info!("Starting HTTP server at {}", bind_address);

    let cors_origins = config.cors.origins();
    let result = HttpServer::new(move || {
        let mut cors = Cors::default().supports_credentials();
        for origin in &cors_origins {
            if origin == "*" {
                cors = cors.allow_any_origin();
            } else {
                cors = cors.allowed_origin(origin);
            }
        }
        cors = cors.allow_any_method().allow_any_header().max_age(3600);

        App::new()
            .app_data(state.clone())
            .app_data(health_state.clone())
            .wrap(cors)
            .wrap(tracing_actix_web::TracingLogger::default())
            .configure(handlers::health::configure)
            .configure(handlers::configure)
    })
    .bind(&bind_address)?
    .run()
    .await;

    archiver.abort();
    tracing::info!("board-service stopped");
    result
}
