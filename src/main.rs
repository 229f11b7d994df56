use anyhow::Result;
use codalscraper::{
    extract::{
        sales::{extract_report_fact, Fact},
        sheet::load_workbook,
        title::{is_monthly_activity, title_date},
    },
    fetch::{
        self,
        excel::{attachment_url, download_attachment},
        reports::{fetch_symbol_reports, Letter},
    },
    history::History,
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
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();
    info!("startup");

    // ─── 2) configure dirs ───────────────────────────────────────────
    let out_dir = PathBuf::from("out");
    let history_dir = PathBuf::from("history");
    fs::create_dir_all(&out_dir)?;

    // ─── 3) symbols from args, else one prompt line ──────────────────
    let mut symbols: Vec<String> = std::env::args().skip(1).collect();
    if symbols.is_empty() {
        symbols = prompt_symbols()?;
    }
    if symbols.is_empty() {
        warn!("no symbols given; exit");
        return Ok(());
    }

    let client = fetch::client()?;
    let history = History::new(&history_dir)?;
    let processed = history.load_event_names("processed")?;
    info!("{} reports already done", processed.len());

    // ─── 4) walk each symbol's monthly reports sequentially ──────────
    let mut facts: Vec<Fact> = Vec::new();
    for symbol in &symbols {
        let reports = match fetch_symbol_reports(&client, symbol).await {
            Ok(reports) => reports,
            Err(err) => {
                error!(%symbol, "report index failed: {err:#}");
                continue;
            }
        };
        let monthly: Vec<Letter> = reports
            .into_iter()
            .filter(|l| is_monthly_activity(&l.title))
            .collect();
        info!(%symbol, count = monthly.len(), "monthly activity reports");

        for letter in monthly {
            let tracing_no = letter.tracing_no.to_string();
            if processed.contains(&tracing_no) {
                continue;
            }
            match process_report(&client, symbol, &letter).await {
                Ok(Some(fact)) => {
                    info!(%symbol, period = %fact.period, amount = %fact.sales_amount, "fact extracted");
                    facts.push(fact);
                    history.record_event(&tracing_no, "processed")?;
                }
                Ok(None) => {
                    info!(%symbol, title = %letter.title, "no fact in report");
                    history.record_event(&tracing_no, "processed")?;
                }
                // per-report failures never abort the remaining reports
                Err(err) => {
                    error!(%symbol, %tracing_no, "report failed: {err:#}");
                }
            }
        }
    }

    // ─── 5) emit the collected table ─────────────────────────────────
    let out_path = out_dir.join("facts.csv");
    output::write_facts(&out_path, &facts)?;
    info!(count = facts.len(), path = %out_path.display(), "all done");
    Ok(())
}

/// Download one report's attachment and run the extractor over it.
/// A title without a period date excludes the report outright.
async fn process_report(client: &Client, symbol: &str, letter: &Letter) -> Result<Option<Fact>> {
    let Some(target_date) = title_date(&letter.title) else {
        return Ok(None);
    };
    let url = attachment_url(letter);
    let attachment = download_attachment(client, &url).await?;
    if !attachment.is_spreadsheet() {
        warn!(symbol, %url, "attachment is not a spreadsheet");
        return Ok(None);
    }
    let workbook = load_workbook(&attachment.bytes)?;
    Ok(extract_report_fact(
        &workbook,
        symbol,
        &letter.title,
        &target_date,
    ))
}

fn prompt_symbols() -> Result<Vec<String>> {
    print!("نماد بورسی را با فرمت کدال وارد کنید: ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.split_whitespace().map(|s| s.to_string()).collect())
}
