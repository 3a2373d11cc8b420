use binance_market_data::{
    history::{HistoryConfig, fetch_history},
    rest::client::BinanceRestClient,
};
use chrono::{TimeDelta, Utc};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialise INFO Tracing log subscriber
    init_logging();

    let client = BinanceRestClient::new()?;
    client.ping().await?;

    let server_time = client.time().await?;
    info!(server_time = ?server_time.time(), "connected to Binance");

    // Fetch 60 days of hourly klines, which requires two pages, keyed by Beijing time
    let end = Utc::now();
    let start = end - TimeDelta::days(60);
    let config = HistoryConfig {
        hour_offset: 8,
        ..HistoryConfig::default()
    };

    let series = fetch_history(&client, "BTCUSDT", "1h", start, end, &config).await?;

    if let (Some(first), Some(last)) = (series.first(), series.last()) {
        info!(
            rows = series.len(),
            first = %first.time,
            last = %last.time,
            last_close = last.kline.close,
            "fetched BTCUSDT hourly history"
        );
    }

    Ok(())
}

// Initialise an INFO `Subscriber` for `Tracing` logs and install it as the global default.
fn init_logging() {
    tracing_subscriber::fmt()
        // Filter messages based on the INFO
        .with_env_filter(
            tracing_subscriber::filter::EnvFilter::builder()
                .with_default_directive(tracing_subscriber::filter::LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        // Disable colours on release builds
        .with_ansi(cfg!(debug_assertions))
        .init()
}
