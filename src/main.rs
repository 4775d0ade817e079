use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mathshare_client::models::ExerciseQuery;
use mathshare_client::{Config, ExerciseService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mathshare_client=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting MathShare client");

    // A missing or malformed base URL must abort startup, never degrade into
    // broken request URLs at call time.
    let config = Config::load().context("Failed to load configuration")?;
    tracing::info!(base_url = %config.api_base_url, "Configuration loaded");

    let service = ExerciseService::new(&config);

    let stats = service
        .stats()
        .await
        .context("Failed to fetch exercise stats")?;
    tracing::info!(total = stats.total_exercises, "Fetched exercise stats");
    for (category, count) in &stats.category_distribution {
        tracing::info!(%category, count, "category");
    }

    let query = ExerciseQuery {
        size: Some(10),
        ..Default::default()
    };
    let list = service
        .list(&query)
        .await
        .context("Failed to list exercises")?;
    tracing::info!(total = list.total, page = list.page, "Fetched first page");
    for exercise in &list.exercises {
        tracing::info!(id = %exercise.id, title = %exercise.title, "exercise");
    }

    Ok(())
}
