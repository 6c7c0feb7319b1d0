use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use showroom::api::SupabaseStorage;
use showroom::config::Config;
use showroom::db::{self, ShowroomStorage};
use showroom::router::{ShowroomState, showroom_router};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Fail before anything else if required settings are missing.
    let cfg = Config::load()?;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cfg.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_level(true)
                .with_target(false),
        )
        .init();

    info!(
        database_url = %cfg.database_url,
        supabase_url = %cfg.supabase_url,
        bucket = %cfg.storage_bucket,
        loglevel = %cfg.loglevel,
        insecure_cookie = cfg.insecure_cookie
    );

    let pool = db::connect(&cfg.database_url).await?;
    let storage = ShowroomStorage::new(pool);
    storage.init_schema().await?;
    storage
        .ensure_admin(&cfg.admin_username, &cfg.admin_password)
        .await?;

    let objects = SupabaseStorage::new(
        &cfg.supabase_url,
        cfg.supabase_key.clone(),
        cfg.storage_bucket.clone(),
    )?;
    let state = ShowroomState::new(
        storage,
        objects,
        cfg.cookie_key()?,
        cfg.insecure_cookie,
        cfg.max_upload_bytes,
    );
    showroom::views::init();
    let app = showroom_router(state);

    let listener = TcpListener::bind(&cfg.listen_addr).await?;
    info!("HTTP server listening on {}", cfg.listen_addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
