//! Legacy company-list scrape (`CompanyList.aspx`).
//!
//! The page is a classic WebForms grid: the first GET hands out session
//! cookies plus `__VIEWSTATE`/`__EVENTVALIDATION`, and every further page is
//! a form POST replaying the pager's hidden fields.

use anyhow::{anyhow, Context, Result};
use reqwest::header;
use reqwest::Client;
use scraper::{Html, Selector};
use tracing::info;

const COMPANY_LIST_URL: &str = "https://www.codal.ir/CompanyList.aspx";
const GRID_SELECTOR: &str = "#ctl00_ContentPlaceHolder1_gvList tr";

/// One row of the company grid.
#[derive(Debug, Clone, PartialEq)]
pub struct ListedCompany {
    pub symbol: String,
    pub name: String,
    pub isic: String,
}

struct FormState {
    cookies: String,
    view_state: String,
    event_validation: String,
}

fn input_value(doc: &Html, id: &str) -> Option<String> {
    let selector = Selector::parse(&format!("#{id}")).ok()?;
    doc.select(&selector)
        .next()
        .and_then(|e| e.value().attr("value"))
        .map(|v| v.to_string())
}

fn form_state(html: &str, cookies: String) -> Result<FormState> {
    let doc = Html::parse_document(html);
    let view_state =
        input_value(&doc, "__VIEWSTATE").ok_or_else(|| anyhow!("__VIEWSTATE missing"))?;
    let event_validation =
        input_value(&doc, "__EVENTVALIDATION").ok_or_else(|| anyhow!("__EVENTVALIDATION missing"))?;
    Ok(FormState {
        cookies,
        view_state,
        event_validation,
    })
}

/// Pull the grid rows out of one page of markup. Header row is skipped;
/// rows need at least symbol, name, and ISIC cells.
pub fn parse_companies(html: &str) -> Vec<ListedCompany> {
    let doc = Html::parse_document(html);
    let row_sel = Selector::parse(GRID_SELECTOR).expect("grid selector is valid");
    let td_sel = Selector::parse("td").expect("td selector is valid");

    doc.select(&row_sel)
        .skip(1)
        .filter_map(|row| {
            let cells: Vec<String> = row
                .select(&td_sel)
                .map(|c| c.text().collect::<String>().trim().to_string())
                .collect();
            (cells.len() >= 3).then(|| ListedCompany {
                symbol: cells[0].clone(),
                name: cells[1].clone(),
                isic: cells[2].clone(),
            })
        })
        .collect()
}

async fn fetch_grid_page(client: &Client, state: &FormState, page: u32) -> Result<String> {
    let page_str = page.to_string();
    let form: Vec<(&str, &str)> = vec![
        (
            "ctl00$ScriptManager1",
            "ctl00$ContentPlaceHolder1$UpdatePanel1|ctl00$ContentPlaceHolder1$ucPager1$btnPage2",
        ),
        ("ctl00$ContentPlaceHolder1$txbValue", ""),
        ("ctl00$ContentPlaceHolder1$ucPager1$hdfFromRowIndex", "0"),
        ("ctl00$ContentPlaceHolder1$ucPager1$hdfCurrentGroup", "1"),
        ("ctl00$ContentPlaceHolder1$ucPager1$hdfNavigatorIndex", "1"),
        ("ctl00$ContentPlaceHolder1$ucPager1$hdfActivePage", &page_str),
        ("ctl00$ContentPlaceHolder1$ucPager1$hdfSerial", "-1"),
        ("ctl00$ContentPlaceHolder1$ucPager1$hdfThumbPrint", ""),
        ("__EVENTTARGET", ""),
        ("__EVENTARGUMENT", ""),
        ("__VIEWSTATE", &state.view_state),
        ("__VIEWSTATEGENERATOR", "B825C6E2"),
        ("__VIEWSTATEENCRYPTED", ""),
        ("__EVENTVALIDATION", &state.event_validation),
        ("__ASYNCPOST", "true"),
        ("ctl00$ContentPlaceHolder1$ucPager1$btnPage2", &page_str),
    ];

    let resp = client
        .post(COMPANY_LIST_URL)
        .header("X-Requested-With", "XMLHttpRequest")
        .header("X-MicrosoftAjax", "Delta=true")
        .header(header::REFERER, COMPANY_LIST_URL)
        .header(header::ORIGIN, "https://www.codal.ir")
        .header(header::COOKIE, &state.cookies)
        .form(&form)
        .send()
        .await
        .with_context(|| format!("posting company-list page {page}"))?
        .error_for_status()
        .with_context(|| format!("company-list page {page}"))?;
    resp.text()
        .await
        .with_context(|| format!("reading company-list page {page}"))
}

/// Scrape the first `pages` pages of the company list, sequentially.
pub async fn fetch_company_list(client: &Client, pages: u32) -> Result<Vec<ListedCompany>> {
    let init = client
        .get(COMPANY_LIST_URL)
        .send()
        .await
        .context("opening CompanyList.aspx")?
        .error_for_status()
        .context("CompanyList.aspx")?;
    let cookies = init
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter_map(|c| c.split(';').next())
        .collect::<Vec<_>>()
        .join("; ");
    let html = init.text().await.context("reading CompanyList.aspx")?;
    let state = form_state(&html, cookies)?;

    let mut all = Vec::new();
    for page in 1..=pages {
        info!(page, "fetching company-list page");
        let body = fetch_grid_page(client, &state, page).await?;
        let companies = parse_companies(&body);
        info!(page, count = companies.len(), "company-list page parsed");
        all.extend(companies);
    }
    Ok(all)
}
