//! In-memory grid model for one downloaded attachment.
//!
//! Calamine's cell enum is collapsed into the three shapes the extractors
//! care about: absent, text, or a number. Column meaning is discovered
//! positionally at run time, so no schema is kept.

use anyhow::{Context, Result};
use calamine::{open_workbook_auto_from_rs, Data, Reader};
use std::io::Cursor;

use crate::extract::number::normalize_number;
use crate::extract::text::normalize_loose;

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
}

impl Cell {
    /// Loose-normalized text of the cell, for marker matching.
    /// Numbers render digit-only; empty cells have no text.
    pub fn loose(&self) -> Option<String> {
        match self {
            Cell::Empty => None,
            Cell::Text(s) => Some(normalize_loose(s)),
            Cell::Number(n) => Some(render_number(*n)),
        }
    }

    /// Numeric value of the cell, parsing text through `normalize_number`.
    pub fn number(&self) -> Option<f64> {
        match self {
            Cell::Empty => None,
            Cell::Text(s) => normalize_number(s),
            Cell::Number(n) => Some(*n),
        }
    }
}

fn render_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

impl From<&Data> for Cell {
    fn from(data: &Data) -> Self {
        match data {
            Data::Empty | Data::Error(_) => Cell::Empty,
            Data::String(s) => Cell::Text(s.clone()),
            Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
            Data::Bool(b) => Cell::Text(b.to_string()),
            Data::Int(i) => Cell::Number(*i as f64),
            Data::Float(f) => Cell::Number(*f),
            Data::DateTime(dt) => Cell::Number(dt.as_f64()),
        }
    }
}

pub type Row = Vec<Cell>;

#[derive(Debug, Clone)]
pub struct Sheet {
    pub name: String,
    pub rows: Vec<Row>,
}

impl Sheet {
    pub fn new(name: impl Into<String>, rows: Vec<Row>) -> Self {
        Sheet {
            name: name.into(),
            rows,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

/// Decode a downloaded attachment into sheets, in file order.
pub fn load_workbook(bytes: &[u8]) -> Result<Workbook> {
    let cursor = Cursor::new(bytes.to_vec());
    let mut book =
        open_workbook_auto_from_rs(cursor).context("attachment is not a readable workbook")?;

    let names = book.sheet_names().to_owned();
    let mut sheets = Vec::with_capacity(names.len());
    for name in names {
        let range = book
            .worksheet_range(&name)
            .with_context(|| format!("reading sheet {name}"))?;
        let rows = range
            .rows()
            .map(|r| r.iter().map(Cell::from).collect())
            .collect();
        sheets.push(Sheet::new(name, rows));
    }
    Ok(Workbook { sheets })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_cells_yield_values_directly() {
        assert_eq!(Cell::Number(1000.0).number(), Some(1000.0));
        assert_eq!(Cell::Text("1,000".into()).number(), Some(1000.0));
        assert_eq!(Cell::Text("جمع".into()).number(), None);
        assert_eq!(Cell::Empty.number(), None);
    }

    #[test]
    fn loose_text_renders_integers_without_fraction() {
        assert_eq!(Cell::Number(1404.0).loose().as_deref(), Some("1404"));
        assert_eq!(Cell::Number(0.5).loose().as_deref(), Some("0.5"));
        assert_eq!(Cell::Empty.loose(), None);
    }

    #[test]
    fn calamine_data_collapses_to_three_shapes() {
        assert_eq!(Cell::from(&Data::Empty), Cell::Empty);
        assert_eq!(Cell::from(&Data::Int(7)), Cell::Number(7.0));
        assert_eq!(
            Cell::from(&Data::String("جمع".into())),
            Cell::Text("جمع".into())
        );
    }
}
