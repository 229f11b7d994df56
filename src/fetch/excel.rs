//! Attachment download for a single filing.

use anyhow::{Context, Result};
use reqwest::Client;

use crate::fetch::reports::Letter;

const EXCEL_SERVICE_BASE: &str = "https://excel.codal.ir/service/Excel/GetAll";

/// Raw bytes of a filing attachment plus enough metadata to sniff the format.
#[derive(Debug)]
pub struct Attachment {
    pub url: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl Attachment {
    /// Spreadsheet detection: the server's content type, falling back to
    /// the URL extension. Everything else goes down the HTML path.
    pub fn is_spreadsheet(&self) -> bool {
        let ct = self.content_type.to_lowercase();
        ct.contains("spreadsheet")
            || ct.contains("excel")
            || self.url.ends_with(".xls")
            || self.url.ends_with(".xlsx")
    }

    /// The HTML fallback only applies when the body actually has a table.
    pub fn html_body(&self) -> Option<String> {
        let text = String::from_utf8_lossy(&self.bytes);
        text.contains("<table").then(|| text.into_owned())
    }
}

/// The listed Excel URL when present, else the tracing-number service path.
pub fn attachment_url(letter: &Letter) -> String {
    match &letter.excel_url {
        Some(url) if !url.is_empty() => url.clone(),
        _ => format!("{}/{}/0", EXCEL_SERVICE_BASE, letter.tracing_no),
    }
}

pub async fn download_attachment(client: &Client, url: &str) -> Result<Attachment> {
    let resp = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("requesting attachment {url}"))?
        .error_for_status()
        .with_context(|| format!("attachment {url}"))?;
    let content_type = resp
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let bytes = resp
        .bytes()
        .await
        .with_context(|| format!("reading attachment body {url}"))?;
    Ok(Attachment {
        url: url.to_string(),
        content_type,
        bytes: bytes.to_vec(),
    })
}
