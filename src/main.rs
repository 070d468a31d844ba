use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use movie_recommender::{
    api::{create_router, AppState},
    config::Config,
    loader,
    services::Recommender,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("movie_recommender=info,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    // Load the whole dataset before accepting requests
    let data_dir = config.data_dir.clone();
    let max_records = config.max_records;
    let dataset = tokio::task::spawn_blocking(move || loader::load_dataset(&data_dir, max_records))
        .await?
        .with_context(|| format!("Failed to load dataset from {}", config.data_dir.display()))?;

    let recommender = Recommender::new(dataset.into(), config.engine_settings());
    let state = AppState::new(recommender);
    let app = create_router(state);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;

    tracing::info!(
        address = %address,
        num_threads = config.num_threads,
        top_k = config.top_k,
        "Recommender listening"
    );
    axum::serve(listener, app).await?;

    Ok(())
}
