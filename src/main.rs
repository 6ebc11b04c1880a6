use alerthub_backend::providers::{PrometheusProvider, ProviderConfig};
use anyhow::Context;
use tracing::info;

/// Smoke-test binary: point it at a Prometheus server and it runs a sample
/// query plus one active-alert pull. Environment variables live here only;
/// the hosting framework hands the library a constructed config.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let url = std::env::var("PROMETHEUS_URL").context("PROMETHEUS_URL is required")?;
    let mut config = ProviderConfig::new(url);
    if let (Ok(user), Ok(pass)) = (
        std::env::var("PROMETHEUS_USER"),
        std::env::var("PROMETHEUS_PASSWORD"),
    ) {
        config = config.with_basic_auth(user, pass);
    }

    let provider = PrometheusProvider::new(config)?;
    info!("🔌 Connected provider: prometheus");

    let results = provider
        .query("sum by (job) (rate(prometheus_http_requests_total[5m]))")
        .await?;
    info!("Query results:\n{}", serde_json::to_string_pretty(&results)?);

    let alerts = provider.get_alerts().await?;
    info!("Pulled {} active alerts", alerts.len());
    for alert in &alerts {
        info!(
            "  {} [{}] {} env={}",
            alert.name.as_deref().unwrap_or("<unnamed>"),
            alert.severity.as_str(),
            alert.status.as_str(),
            alert.environment
        );
    }

    Ok(())
}
