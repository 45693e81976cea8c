use std::sync::Arc;

use chrono::Local;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use transfer_scrap::{
    build_client,
    config::Settings,
    country::CountryTable,
    history::HttpHistorySource,
    info_time,
    layout::Layout,
    scrape::TransfermarktScraper,
    server::{router, AppState},
    Result,
};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,transfer_scrap=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();

    let start_time = Local::now();
    let settings = Settings::from_env()?;

    let countries = Arc::new(CountryTable::load(&settings.countries_csv)?);
    let client = build_client(&settings.user_agent)?;
    let state = AppState {
        countries: countries.clone(),
        layout: Arc::new(Layout::new(&settings.data_dir)),
        scraper: Arc::new(TransfermarktScraper::new(
            client.clone(),
            countries,
            &settings.site_base_url,
            settings.max_pages,
        )),
        history: Arc::new(HttpHistorySource::new(client, &settings.history_base_url)),
    };

    let listener = tokio::net::TcpListener::bind(settings.bind_addr).await?;
    info_time!("Server running at http://{}", settings.bind_addr);
    axum::serve(listener, router(state)).await?;

    info_time!(start_time, "Full program time:");
    Ok(())
}
