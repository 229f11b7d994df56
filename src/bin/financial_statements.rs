//! Capital/total extraction from a symbol's financial-statement filings,
//! split into annual and interim tables.

use anyhow::Result;
use codalscraper::{
    extract::{
        sheet::load_workbook,
        statements::{extract_statement_rows, extract_statement_rows_html, StatementRow},
        title::{is_annual, is_financial_statements, is_interim},
    },
    fetch::{
        self,
        excel::{attachment_url, download_attachment, Attachment},
        reports::{fetch_symbol_reports, Letter},
    },
    output,
};
use reqwest::Client;
use std::{
    fs,
    io::{self, BufRead, Write},
    path::PathBuf,
};
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();

    let symbol = match std::env::args().nth(1) {
        Some(symbol) => symbol,
        None => prompt_symbol()?,
    };
    if symbol.is_empty() {
        warn!("no symbol given; exit");
        return Ok(());
    }

    let client = fetch::client()?;
    let reports = fetch_symbol_reports(&client, &symbol).await?;
    let financials: Vec<Letter> = reports
        .into_iter()
        .filter(|l| is_financial_statements(&l.title))
        .collect();
    info!(%symbol, count = financials.len(), "financial statement reports");

    let mut annual: Vec<StatementRow> = Vec::new();
    let mut interim: Vec<StatementRow> = Vec::new();

    for letter in financials {
        let rows = match process_report(&client, &letter).await {
            Ok(rows) => rows,
            Err(err) => {
                error!(tracing_no = letter.tracing_no, "report failed: {err:#}");
                continue;
            }
        };
        if is_annual(&letter.title) {
            annual.extend(rows);
        } else if is_interim(&letter.title) {
            interim.extend(rows);
        }
    }

    let out_dir = PathBuf::from("out");
    fs::create_dir_all(&out_dir)?;
    if !annual.is_empty() {
        let path = out_dir.join(format!("{symbol}-annual.csv"));
        output::write_statement_rows(&path, &annual)?;
        info!(path = %path.display(), rows = annual.len(), "annual table saved");
    }
    if !interim.is_empty() {
        let path = out_dir.join(format!("{symbol}-interim.csv"));
        output::write_statement_rows(&path, &interim)?;
        info!(path = %path.display(), rows = interim.len(), "interim table saved");
    }
    Ok(())
}

/// Spreadsheet attachments go through the workbook extractor; anything that
/// fails to decode, or was never a spreadsheet, falls back to the HTML path.
async fn process_report(client: &Client, letter: &Letter) -> Result<Vec<StatementRow>> {
    let url = attachment_url(letter);
    info!(title = %letter.title, %url, "downloading");
    let attachment = download_attachment(client, &url).await?;

    if attachment.is_spreadsheet() {
        match load_workbook(&attachment.bytes) {
            Ok(workbook) => return Ok(extract_statement_rows(&workbook, &letter.title)),
            Err(err) => warn!(%url, "workbook parse failed, trying HTML: {err:#}"),
        }
    }
    Ok(extract_html(&attachment, &letter.title))
}

fn extract_html(attachment: &Attachment, title: &str) -> Vec<StatementRow> {
    match attachment.html_body() {
        Some(html) => extract_statement_rows_html(&html, title),
        None => {
            warn!(title, "unknown attachment format");
            Vec::new()
        }
    }
}

fn prompt_symbol() -> Result<String> {
    print!("نماد بورسی را با فرمت کدال وارد کنید: ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}
