//! Sweep the company register and keep the production companies.

use anyhow::Result;
use codalscraper::{
    fetch::{
        self,
        reports::{fetch_all_companies, filter_production, DEFAULT_SWEEP_PAGE_LIMIT},
    },
    output,
};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();

    let limit_pages = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_SWEEP_PAGE_LIMIT);

    let client = fetch::client()?;
    let companies = fetch_all_companies(&client, limit_pages).await?;
    info!(count = companies.len(), "companies fetched");

    let production = filter_production(companies);
    info!(count = production.len(), "production companies");

    let out = PathBuf::from("symbols.csv");
    output::write_companies(&out, &production)?;
    info!(path = %out.display(), "saved");
    Ok(())
}
