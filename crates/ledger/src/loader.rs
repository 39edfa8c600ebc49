// In crates/ledger/src/loader.rs

use crate::error::{Error, Result};
use crate::types::LedgerSettings;
use calamine::{Data, DataType, Range, Reader, open_workbook_auto};
use core_types::{AnalysisError, TradeEvent, parse_timestamp};
use csv::{ReaderBuilder, StringRecord};
use rust_decimal::Decimal;
use serde::Serialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

/// Reads an exported trade list into typed trade events.
///
/// `.xlsx` (and `.xlsm`/`.xls`) workbooks are read from the configured sheet;
/// anything else is parsed as delimited text.
#[derive(Debug, Clone, Default)]
pub struct LedgerLoader {
    settings: LedgerSettings,
}

/// What `inspect` found in a ledger file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LedgerInspection {
    pub headers: Vec<String>,
    pub rows: usize,
    /// `None` when the type column is missing.
    pub exit_rows: Option<usize>,
    pub missing_columns: Vec<String>,
}

/// Column positions resolved from the header row.
struct Columns {
    kind: usize,
    timestamp: usize,
    pnl_value: usize,
    pnl_pct: usize,
}

/// A data row with its 1-based position in the source file.
type NumberedRecord = (usize, StringRecord);

/// Whether `path` names a spreadsheet workbook rather than delimited text.
pub fn is_workbook(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ["xlsx", "xlsm", "xls"].iter().any(|w| ext.eq_ignore_ascii_case(w)))
}

impl LedgerLoader {
    pub fn new(settings: LedgerSettings) -> Self {
        Self { settings }
    }

    pub fn load_path(&self, path: &Path) -> Result<Vec<TradeEvent>> {
        let events = if is_workbook(path) {
            let (headers, records) = self.read_workbook(path)?;
            self.parse_records(&headers, records.into_iter().map(Ok))?
        } else {
            self.load_reader(File::open(path)?)?
        };
        tracing::debug!(path = %path.display(), events = events.len(), "Loaded ledger.");
        Ok(events)
    }

    pub fn load_reader<R: Read>(&self, reader: R) -> Result<Vec<TradeEvent>> {
        self.check_decimal_separator()?;
        let mut csv = self.reader_builder()?.from_reader(reader);
        let headers = clean_headers(csv.headers()?.iter());
        self.parse_records(&headers, numbered(csv.records()))
    }

    /// Reports the headers, row counts and mapping status of a ledger
    /// without failing on a bad mapping.
    pub fn inspect(&self, path: &Path) -> Result<LedgerInspection> {
        if is_workbook(path) {
            let (headers, records) = self.read_workbook(path)?;
            return self.inspect_records(headers, records.into_iter().map(Ok));
        }

        let mut csv = self.reader_builder()?.from_reader(File::open(path)?);
        let headers = clean_headers(csv.headers()?.iter());
        self.inspect_records(headers, numbered(csv.records()))
    }

    fn inspect_records<I>(&self, headers: Vec<String>, records: I) -> Result<LedgerInspection>
    where
        I: Iterator<Item = Result<NumberedRecord>>,
    {
        let missing_columns = self
            .settings
            .required_columns()
            .into_iter()
            .filter(|name| !headers.iter().any(|h| h == name))
            .map(|name| name.to_string())
            .collect();
        let type_index = headers.iter().position(|h| *h == self.settings.type_column);

        let mut rows = 0;
        let mut exit_rows = 0;
        for record in records {
            let (_, record) = record?;
            rows += 1;
            if let Some(kind) = type_index.and_then(|i| record.get(i)) {
                if kind.contains("Exit") {
                    exit_rows += 1;
                }
            }
        }

        Ok(LedgerInspection {
            headers,
            rows,
            exit_rows: type_index.map(|_| exit_rows),
            missing_columns,
        })
    }

    fn reader_builder(&self) -> Result<ReaderBuilder> {
        let delimiter = self.settings.delimiter;
        let byte = u8::try_from(delimiter)
            .ok()
            .filter(u8::is_ascii)
            .ok_or(Error::InvalidDelimiter(delimiter))?;

        let mut builder = ReaderBuilder::new();
        builder.delimiter(byte).flexible(true).trim(csv::Trim::All);
        Ok(builder)
    }

    fn check_decimal_separator(&self) -> Result<()> {
        match self.settings.decimal_separator {
            '.' | ',' => Ok(()),
            other => Err(Error::InvalidDecimalSeparator(other)),
        }
    }

    /// Reads the configured sheet; its first non-empty row is the header.
    fn read_workbook(&self, path: &Path) -> Result<(Vec<String>, Vec<NumberedRecord>)> {
        self.check_decimal_separator()?;
        let mut workbook = open_workbook_auto(path)?;
        let sheet = &self.settings.sheet_name;
        if !workbook.sheet_names().iter().any(|name| name == sheet) {
            return Err(Error::MissingSheet(sheet.clone()));
        }
        let range = workbook.worksheet_range(sheet)?;
        Ok(sheet_records(&range, self.settings.decimal_separator))
    }

    fn resolve(&self, headers: &[String]) -> Result<Columns> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| AnalysisError::MissingColumn(name.to_string()))
        };

        Ok(Columns {
            kind: find(&self.settings.type_column)?,
            timestamp: find(&self.settings.timestamp_column)?,
            pnl_value: find(&self.settings.pnl_value_column)?,
            pnl_pct: find(&self.settings.pnl_pct_column)?,
        })
    }

    fn parse_records<I>(&self, headers: &[String], records: I) -> Result<Vec<TradeEvent>>
    where
        I: Iterator<Item = Result<NumberedRecord>>,
    {
        let columns = self.resolve(headers)?;
        records
            .map(|record| {
                let (row, record) = record?;
                self.parse_record(&record, &columns, row)
            })
            .collect()
    }

    fn parse_record(&self, record: &StringRecord, columns: &Columns, row: usize) -> Result<TradeEvent> {
        let cell = |index: usize| record.get(index).unwrap_or("");
        let number = |index: usize, column: &str| {
            parse_number(cell(index), self.settings.decimal_separator).ok_or_else(|| {
                Error::InvalidNumber {
                    row,
                    column: column.to_string(),
                    value: cell(index).to_string(),
                }
            })
        };

        let raw_timestamp = cell(columns.timestamp);
        let timestamp =
            parse_timestamp(raw_timestamp).ok_or_else(|| AnalysisError::InvalidTimestamp {
                row,
                value: raw_timestamp.to_string(),
            })?;

        Ok(TradeEvent {
            row,
            kind: cell(columns.kind).to_string(),
            timestamp,
            net_pnl_value: number(columns.pnl_value, &self.settings.pnl_value_column)?,
            net_pnl_pct: number(columns.pnl_pct, &self.settings.pnl_pct_column)?,
        })
    }
}

/// Numbers CSV records by file row. Row 1 is the header.
fn numbered<I>(records: I) -> impl Iterator<Item = Result<NumberedRecord>>
where
    I: Iterator<Item = csv::Result<StringRecord>>,
{
    records
        .enumerate()
        .map(|(index, record)| -> Result<NumberedRecord> { Ok((index + 2, record?)) })
}

fn clean_headers<S: AsRef<str>>(headers: impl IntoIterator<Item = S>) -> Vec<String> {
    headers
        .into_iter()
        .map(|h| h.as_ref().trim_start_matches('\u{feff}').trim().to_string())
        .collect()
}

/// Flattens a worksheet into text records so both formats share one parser.
fn sheet_records(range: &Range<Data>, decimal_separator: char) -> (Vec<String>, Vec<NumberedRecord>) {
    // Worksheet rows are 1-based; `start` is the first used cell.
    let first_row = range.start().map_or(0, |(row, _)| row as usize) + 1;
    let mut rows = range
        .rows()
        .enumerate()
        .skip_while(|(_, cells)| cells.iter().all(|c| c.is_empty()));

    let Some((_, header_cells)) = rows.next() else {
        return (Vec::new(), Vec::new());
    };
    let headers = clean_headers(header_cells.iter().map(|c| cell_text(c, decimal_separator)));

    let records = rows
        .filter(|(_, cells)| !cells.iter().all(|c| c.is_empty()))
        .map(|(offset, cells)| {
            let record: StringRecord = cells
                .iter()
                .map(|c| cell_text(c, decimal_separator))
                .collect();
            (first_row + offset, record)
        })
        .collect();

    (headers, records)
}

fn cell_text(cell: &Data, decimal_separator: char) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::String(text) | Data::DateTimeIso(text) | Data::DurationIso(text) => text.clone(),
        Data::Int(value) => value.to_string(),
        // Written with the configured separator so `parse_number` reads it back unchanged.
        Data::Float(value) => value.to_string().replace('.', &decimal_separator.to_string()),
        Data::Bool(value) => value.to_string(),
        Data::DateTime(value) => value
            .as_datetime()
            .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| value.as_f64().to_string()),
    }
}

/// Parses a numeric cell as exported by spreadsheet tools.
///
/// The non-decimal one of `.`/`,` is a thousands separator and must group
/// exactly three digits. Spaces, a trailing `%` and the Unicode minus sign are
/// accepted. `Some(None)` is an empty cell, `None` an unreadable one.
fn parse_number(raw: &str, decimal_separator: char) -> Option<Option<Decimal>> {
    let thousands = if decimal_separator == ',' { '.' } else { ',' };
    let cleaned: String = raw
        .trim()
        .trim_end_matches('%')
        .chars()
        .filter(|c| !matches!(c, ' ' | '\u{a0}'))
        .map(|c| if c == '\u{2212}' { '-' } else { c })
        .collect();
    if cleaned.is_empty() {
        return Some(None);
    }

    let (integer, fraction) = match cleaned.split_once(decimal_separator) {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (cleaned.as_str(), None),
    };
    let mut groups = integer.split(thousands);
    let mut normalized = groups.next().unwrap_or_default().to_string();
    for group in groups {
        if group.len() != 3 || !group.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        normalized.push_str(group);
    }
    if let Some(fraction) = fraction {
        normalized.push('.');
        normalized.push_str(fraction);
    }

    Decimal::from_str(&normalized)
        .or_else(|_| Decimal::from_scientific(&normalized))
        .ok()
        .map(Some)
}
