// src/output/mod.rs
//
// CSV emission of the collected tables. One file per table; each writer
// sets its own header row.

use anyhow::{Context, Result};
use std::path::Path;

use crate::extract::sales::Fact;
use crate::extract::statements::{clean_table, StatementRow};
use crate::fetch::companies::ListedCompany;
use crate::fetch::reports::Company;

pub fn write_facts(path: impl AsRef<Path>, facts: &[Fact]) -> Result<()> {
    let path = path.as_ref();
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating output file {}", path.display()))?;
    writer.write_record(["Symbol", "Period", "SalesAmount"])?;
    for fact in facts {
        writer.write_record([&fact.symbol, &fact.period, &fact.sales_amount])?;
    }
    writer.flush().context("flushing facts table")?;
    Ok(())
}

pub fn write_companies(path: impl AsRef<Path>, companies: &[Company]) -> Result<()> {
    let path = path.as_ref();
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating output file {}", path.display()))?;
    writer.write_record(["Symbol", "CompanyName", "IndustryGroup"])?;
    for company in companies {
        writer.write_record([&company.symbol, &company.name, &company.industry])?;
    }
    writer.flush().context("flushing company table")?;
    Ok(())
}

pub fn write_listed_companies(path: impl AsRef<Path>, companies: &[ListedCompany]) -> Result<()> {
    let path = path.as_ref();
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating output file {}", path.display()))?;
    writer.write_record(["Symbol", "CompanyName", "ISIC"])?;
    for company in companies {
        writer.write_record([&company.symbol, &company.name, &company.isic])?;
    }
    writer.flush().context("flushing company table")?;
    Ok(())
}

/// Statement rows go through the table cleaner before hitting disk, so
/// stray numeric rows are dropped and date cells read as month names.
pub fn write_statement_rows(path: impl AsRef<Path>, rows: &[StatementRow]) -> Result<()> {
    let path = path.as_ref();
    let table: Vec<Vec<String>> = rows
        .iter()
        .map(|r| {
            vec![
                r.title.clone(),
                r.label.clone(),
                format!("{}", r.value),
            ]
        })
        .collect();
    let cleaned = clean_table(table);

    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating output file {}", path.display()))?;
    writer.write_record(["Title", "Label", "Value"])?;
    for row in cleaned {
        writer.write_record(&row)?;
    }
    writer.flush().context("flushing statement table")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn facts_table_round_trips() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("facts.csv");
        let facts = vec![Fact {
            symbol: "غکورش".into(),
            period: "دوره ۱ ماهه منتهی به 1404/05/31".into(),
            sales_amount: "۱٬۰۰۰".into(),
        }];
        write_facts(&path, &facts)?;

        let body = std::fs::read_to_string(&path)?;
        let mut lines = body.lines();
        assert_eq!(lines.next(), Some("Symbol,Period,SalesAmount"));
        let row = lines.next().unwrap();
        assert!(row.contains("غکورش"));
        assert!(row.contains("۱٬۰۰۰"));
        Ok(())
    }

    #[test]
    fn statement_rows_are_cleaned_on_write() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("annual.csv");
        let rows = vec![StatementRow {
            title: "صورت‌های مالی سال مالی منتهی به 1403/12/29".into(),
            label: "جمع".into(),
            value: 100.0,
        }];
        write_statement_rows(&path, &rows)?;
        let body = std::fs::read_to_string(&path)?;
        assert!(body.contains("جمع"));
        assert!(body.contains("100"));
        Ok(())
    }
}
