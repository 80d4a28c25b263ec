use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use disease_map::{api, Config, Pages, RestStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "disease_map=info,map_server=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false).compact())
        .init();

    let config = Config::load().context("failed to load settings")?;
    let pages = Pages::new(config.zoom).context("failed to compile page templates")?;
    let store = RestStore::new(&config.store_url);

    info!("marker store at {}", store.base_url());
    let app = api::create_router(api::AppState::new(store, pages));

    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    info!("listening on http://{}", config.bind_addr);
    info!("pages: GET /  GET /map  POST /map/markers");
    info!("api:   GET /api/markers  GET|POST /api/submissions");

    axum::serve(listener, app).await?;
    Ok(())
}
