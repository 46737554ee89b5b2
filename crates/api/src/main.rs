//! Seller Rank API Server

use axum::{
    routing::{get, post, put},
    Router,
};
use engine::{ScheduleConfig, ScheduleService};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

mod error;
mod routes;
mod signature;
mod state;

use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("seller_rank=debug".parse()?)
                .add_directive("api=debug".parse()?)
                .add_directive("engine=debug".parse()?),
        )
        .init();

    info!("🏅 Starting Seller Rank API");

    // Load configuration
    let config = common::Config::from_env();

    // Connect to database
    let pool = db::create_pool(&config.database_url).await?;

    // Run migrations
    db::run_migrations(&pool).await?;

    // Start background scheduler (if enabled)
    if config.scheduler_enabled {
        let schedule_config = ScheduleConfig {
            tz_offset_hours: config.tz_offset_hours,
            batch_concurrency: config.batch_concurrency,
            rolling_window_months: config.rolling_window_months,
        };
        let service = ScheduleService::new(pool.clone(), schedule_config);
        tokio::spawn(async move {
            service.run().await;
        });
        info!(
            "📅 Period scheduler enabled (local midnight, UTC{:+}h)",
            config.tz_offset_hours
        );
    } else {
        info!("📅 Period scheduler disabled (SCHEDULER_ENABLED=false)");
    }

    // Create app state
    let state = Arc::new(AppState::new(config.clone(), pool));

    // Build API router with state
    let app = Router::new()
        .route("/health", get(routes::health::health))
        .route("/api/rankings", get(routes::rankings::latest))
        .route(
            "/api/organizations/:id/ranking",
            get(routes::rankings::my_ranking),
        )
        .route(
            "/api/participation/:owner_id",
            get(routes::participation::get).put(routes::participation::update),
        )
        .route("/api/events", post(routes::events::ingest))
        .route(
            "/api/admin/organizations/:id/tier",
            put(routes::admin::set_tier).delete(routes::admin::remove_tier),
        )
        .route(
            "/api/admin/score-settings",
            get(routes::admin::get_score_settings).put(routes::admin::put_score_settings),
        )
        .route(
            "/api/admin/tier-criteria",
            get(routes::admin::get_tier_criteria).put(routes::admin::put_tier_criteria),
        )
        .route(
            "/api/admin/batch/monthly",
            post(routes::admin::run_monthly_batch),
        )
        .route(
            "/api/admin/snapshots",
            post(routes::admin::build_snapshot),
        )
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = format!("{}:{}", config.host, config.port);
    info!("🚀 Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
