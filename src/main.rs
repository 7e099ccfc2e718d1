use tracing_subscriber::EnvFilter;

use show_suggest::{
    cli::{AppState, Session},
    config::Config,
    db::load_catalog,
    services::{embeddings::EmbeddingStore, fictional_shows::FictionalShowStudio},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("show_suggest=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env()?;

    let catalog = load_catalog(&config.catalog_path)?;

    let report = EmbeddingStore::from_config(&config)
        .load_or_build(&catalog)
        .await?;
    if !report.failures.is_empty() {
        let titles: Vec<&str> = report.failures.iter().map(|f| f.title.as_str()).collect();
        tracing::warn!(
            failed = report.failures.len(),
            embedded = report.embeddings.len(),
            titles = ?titles,
            "Some shows could not be embedded and will never be recommended"
        );
    }

    let studio = match FictionalShowStudio::from_config(&config) {
        Ok(studio) => Some(studio),
        Err(e) => {
            tracing::info!(error = %e, "Fictional shows disabled");
            None
        }
    };

    let state = AppState::new(&catalog, report.embeddings, config.recommendation_count, studio);
    let input = tokio::io::BufReader::new(tokio::io::stdin());

    Session::new(state, input, tokio::io::stdout()).run().await?;

    Ok(())
}
