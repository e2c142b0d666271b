use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use anyhow::Context;
use tracing::info;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use feed_service::config::StorageBackend;
use feed_service::db::{
    create_pool, ContentStore, ContentWriter, InteractionSink, MemoryStore, PgContentRepository,
    PgGraphRepository, PgInteractionRepository, SocialGraph,
};
use feed_service::{configure, AppState, Config};

type Stores = (
    Arc<dyn SocialGraph>,
    Arc<dyn ContentStore>,
    Arc<dyn ContentWriter>,
    Arc<dyn InteractionSink>,
);

async fn build_stores(config: &Config) -> anyhow::Result<Stores> {
    match config.storage {
        StorageBackend::Postgres => {
            let pool = create_pool(&config.database)
                .await
                .context("failed to connect to PostgreSQL")?;
            info!(
                max_connections = config.database.max_connections,
                "PostgreSQL pool ready"
            );
            let graph: Arc<dyn SocialGraph> = Arc::new(PgGraphRepository::new(pool.clone()));
            let repo = Arc::new(PgContentRepository::new(pool.clone()));
            let content: Arc<dyn ContentStore> = repo.clone();
            let writer: Arc<dyn ContentWriter> = repo;
            let sink: Arc<dyn InteractionSink> = Arc::new(PgInteractionRepository::new(pool));
            Ok((graph, content, writer, sink))
        }
        StorageBackend::Memory => {
            info!("using in-memory store; data is lost on restart");
            let store = Arc::new(MemoryStore::new());
            let graph: Arc<dyn SocialGraph> = store.clone();
            let content: Arc<dyn ContentStore> = store.clone();
            let writer: Arc<dyn ContentWriter> = store.clone();
            let sink: Arc<dyn InteractionSink> = store;
            Ok((graph, content, writer, sink))
        }
    }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=info,sqlx=warn".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(true)
                .with_line_number(true)
                .with_target(true),
        )
        .init();

    let config = Config::from_env().context("failed to load configuration")?;

    info!("Starting feed-service v{}", env!("CARGO_PKG_VERSION"));
    info!("Environment: {}", config.app.env);

    feed_service::metrics::register_collectors();
    let (graph, content, writer, sink) = build_stores(&config).await?;
    let state = web::Data::new(AppState::new(graph, content, writer, sink, &config));

    let bind_addr = (config.app.host.clone(), config.app.port);
    info!("HTTP server listening on {}:{}", bind_addr.0, bind_addr.1);

    HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind(bind_addr.clone())
    .with_context(|| format!("failed to bind {}:{}", bind_addr.0, bind_addr.1))?
    .run()
    .await
    .context("HTTP server terminated with an error")?;

    Ok(())
}
