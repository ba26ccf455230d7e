use anyhow::Context;
use bfx_rest::api::{from_record, HistoryQuery, TradingTicker};
use bfx_rest::{ClientBuilder, ClientOptions};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    // BFX_API_KEY / BFX_API_SECRET enable the authenticated calls below
    #[cfg(feature = "env-file")]
    let options = ClientOptions::from_env_file("BFX", ".env")?;
    #[cfg(not(feature = "env-file"))]
    let options = ClientOptions::from_env("BFX")?;

    let rest = ClientBuilder::new(options.with_transform(true))
        .build_v2()
        .context("failed to build client")?;

    let status = rest.status().await.context("platform status")?;
    info!("Platform status: {}", status);

    let ticker: TradingTicker = from_record(rest.ticker("tBTCUSD").await?)?;
    info!(
        "{} last {} (bid {} / ask {})",
        ticker.symbol, ticker.last_price, ticker.bid, ticker.ask
    );

    let candles = rest
        .candles("1m", "tBTCUSD", "hist", &HistoryQuery::new().with_limit(5))
        .await?;
    info!("Last candles: {}", candles);

    if rest.config().has_credentials() {
        match rest.wallets().await {
            Ok(wallets) => info!("Wallets: {}", wallets),
            Err(e) if e.is_nonce_too_small() => warn!("Stale nonce: {}", e),
            Err(e) => warn!("Failed to fetch wallets: {}", e),
        }
    } else {
        info!("No credentials configured, skipping authenticated calls");
    }

    Ok(())
}
