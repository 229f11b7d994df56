//! Scrape the legacy CompanyList.aspx grid page by page.

use anyhow::Result;
use codalscraper::{
    fetch::{self, companies::fetch_company_list},
    output,
};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();

    let pages = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(2);

    let client = fetch::client()?;
    let companies = fetch_company_list(&client, pages).await?;
    info!(count = companies.len(), "companies scraped");

    let out = PathBuf::from("company_list.csv");
    output::write_listed_companies(&out, &companies)?;
    info!(path = %out.display(), "saved");
    Ok(())
}
