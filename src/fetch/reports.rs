//! Paginated search over the disclosure portal's JSON API.
//!
//! One endpoint serves both uses: a symbol-scoped report search and the
//! full company sweep. Page 1 announces the page count; the remaining
//! pages are fetched strictly sequentially.

use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;
use tracing::info;
use url::Url;

const SEARCH_BASE: &str = "https://search.codal.ir/api/search/v2/q?\
Category=-1&Childs=true&CompanyState=-1&CompanyType=-1&Consolidatable=true\
&Length=-1&LetterType=-1&Mains=true&NotAudited=true&NotConsolidatable=true&search=true";

const COMPANY_SWEEP_BASE: &str = "https://search.codal.ir/api/search/v2/q?\
PageSize=100&Childs=true&Mains=true&CompanyState=-1&Audited=true&NotAudited=true";

/// Page cap for the unscoped company sweep.
pub const DEFAULT_SWEEP_PAGE_LIMIT: u32 = 200;

/// One filing as the search API lists it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Letter {
    pub symbol: String,
    pub company_name: String,
    pub title: String,
    pub tracing_no: i64,
    #[serde(default)]
    pub excel_url: Option<String>,
    #[serde(default)]
    pub publish_date_time: Option<String>,
    #[serde(default)]
    pub industry_group: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct SearchPage {
    #[serde(default)]
    letters: Vec<Letter>,
    /// Total page count, announced on every page.
    #[serde(default)]
    page: u32,
    #[serde(default)]
    total: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Company {
    pub symbol: String,
    pub name: String,
    pub industry: String,
}

async fn fetch_search_page(
    client: &Client,
    base: &str,
    symbol: Option<&str>,
    page: u32,
) -> Result<SearchPage> {
    let mut url = Url::parse(base).context("search base URL")?;
    {
        let mut pairs = url.query_pairs_mut();
        if let Some(symbol) = symbol {
            pairs.append_pair("Symbol", symbol);
        }
        pairs.append_pair("PageNumber", &page.to_string());
    }
    let resp = client
        .get(url)
        .header(reqwest::header::ACCEPT, "application/json, text/plain, */*")
        .send()
        .await
        .with_context(|| format!("requesting search page {page}"))?
        .error_for_status()
        .with_context(|| format!("search page {page}"))?;
    resp.json::<SearchPage>()
        .await
        .with_context(|| format!("decoding search page {page}"))
}

/// Every filing listed for `symbol`, across all result pages.
pub async fn fetch_symbol_reports(client: &Client, symbol: &str) -> Result<Vec<Letter>> {
    let first = fetch_search_page(client, SEARCH_BASE, Some(symbol), 1).await?;
    let total_pages = first.page.max(1);
    info!(symbol, total = first.total, pages = total_pages, "report index fetched");

    let mut letters = first.letters;
    for page in 2..=total_pages {
        let next = fetch_search_page(client, SEARCH_BASE, Some(symbol), page).await?;
        letters.extend(next.letters);
    }
    Ok(letters)
}

/// Sweep the whole company register, capped at `limit_pages`, deduplicated
/// by symbol in first-seen order.
pub async fn fetch_all_companies(client: &Client, limit_pages: u32) -> Result<Vec<Company>> {
    let first = fetch_search_page(client, COMPANY_SWEEP_BASE, None, 1).await?;
    let total_pages = first.page.max(1).min(limit_pages);
    info!(total = first.total, pages = total_pages, "company sweep started");

    let mut letters = first.letters;
    for page in 2..=total_pages {
        info!(page, "fetching company page");
        let next = fetch_search_page(client, COMPANY_SWEEP_BASE, None, page).await?;
        letters.extend(next.letters);
    }

    let mut seen = std::collections::HashSet::new();
    let companies = letters
        .into_iter()
        .filter(|l| seen.insert(l.symbol.clone()))
        .map(|l| Company {
            symbol: l.symbol,
            name: l.company_name,
            industry: l.industry_group.unwrap_or_default(),
        })
        .collect();
    Ok(companies)
}

/// Production companies carry "تولید" in their industry group.
pub fn filter_production(companies: Vec<Company>) -> Vec<Company> {
    companies
        .into_iter()
        .filter(|c| c.industry.contains("تولید"))
        .collect()
}
