use calamine::{Data, Reader, Xlsx};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Cursor;

use super::ExtractionError;

/// Number of data rows shown per sheet in the text summary
const SAMPLE_ROWS: usize = 5;

/// A single spreadsheet cell, serialized as a plain JSON scalar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Empty,
}

impl CellValue {
    fn is_blank(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{}", b),
            Self::Int(i) => write!(f, "{}", i),
            Self::Float(x) => write!(f, "{}", x),
            Self::Text(s) => f.write_str(s),
            Self::Empty => Ok(()),
        }
    }
}

impl From<&Data> for CellValue {
    fn from(cell: &Data) -> Self {
        match cell {
            Data::Empty => Self::Empty,
            Data::String(s) => Self::Text(s.clone()),
            Data::Int(i) => Self::Int(*i),
            // Whole numbers are stored as floats by Excel
            Data::Float(x) if x.fract() == 0.0 && x.abs() < i64::MAX as f64 => Self::Int(*x as i64),
            Data::Float(x) => Self::Float(*x),
            Data::Bool(b) => Self::Bool(*b),
            Data::DateTime(dt) => match dt.as_datetime() {
                Some(datetime) => Self::Text(datetime.format("%Y-%m-%dT%H:%M:%S").to_string()),
                None => Self::Float(dt.as_f64()),
            },
            Data::DateTimeIso(s) | Data::DurationIso(s) => Self::Text(s.clone()),
            Data::Error(e) => Self::Text(e.to_string()),
        }
    }
}

/// One worksheet: column names plus data rows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetData {
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl SheetData {
    fn from_rows(name: String, mut rows: Vec<Vec<CellValue>>) -> Self {
        let has_header = rows
            .first()
            .is_some_and(|first| first.iter().any(|cell| !cell.is_blank()));

        let columns = if has_header {
            rows.remove(0)
                .iter()
                .map(|cell| cell.to_string().trim().to_string())
                .collect()
        } else {
            let width = rows.iter().map(Vec::len).max().unwrap_or(0);
            (0..width).map(column_letter).collect()
        };

        Self {
            name,
            columns,
            rows,
        }
    }

    /// Text rendering fed to the LLM as document context
    fn summary(&self) -> String {
        let mut lines = vec![
            format!("Sheet: {}", self.name),
            format!("Kolom: {}", self.columns.join(", ")),
            format!("Jumlah baris: {}", self.rows.len()),
        ];

        if !self.rows.is_empty() {
            lines.push("Contoh data:".to_string());
            for row in self.rows.iter().take(SAMPLE_ROWS) {
                let cells: Vec<String> = row
                    .iter()
                    .enumerate()
                    .map(|(idx, cell)| {
                        let column = self
                            .columns
                            .get(idx)
                            .cloned()
                            .unwrap_or_else(|| column_letter(idx));
                        format!("{}: {}", column, cell)
                    })
                    .collect();
                lines.push(format!("- {}", cells.join(" | ")));
            }
        }

        lines.join("\n")
    }
}

/// Spreadsheet extraction output
#[derive(Debug)]
pub struct Workbook {
    pub summary: String,
    pub sheets: Vec<SheetData>,
}

/// Read every sheet of an XLSX workbook
///
/// Sheets without any rows are left out. A workbook where no sheet has rows
/// is an error.
pub fn extract_spreadsheet(data: &[u8]) -> Result<Workbook, ExtractionError> {
    let mut workbook: Xlsx<_> =
        Xlsx::new(Cursor::new(data)).map_err(|e| ExtractionError::unreadable("XLSX", e))?;

    let mut sheets = Vec::new();
    for name in workbook.sheet_names() {
        let range = match workbook.worksheet_range(&name) {
            Ok(range) => range,
            Err(e) => {
                tracing::warn!("Skipping unreadable sheet '{}': {}", name, e);
                continue;
            }
        };

        let rows: Vec<Vec<CellValue>> = range
            .rows()
            .map(|row| row.iter().map(CellValue::from).collect())
            .collect();

        if rows.is_empty() {
            continue;
        }

        sheets.push(SheetData::from_rows(name, rows));
    }

    if sheets.is_empty() {
        return Err(ExtractionError::EmptySpreadsheet);
    }

    let summary = sheets
        .iter()
        .map(SheetData::summary)
        .collect::<Vec<_>>()
        .join("\n\n");

    Ok(Workbook { summary, sheets })
}

/// Spreadsheet-style column name: A..Z, AA, AB, ...
fn column_letter(index: usize) -> String {
    let mut n = index + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(char::from(b'A' + rem as u8));
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}
