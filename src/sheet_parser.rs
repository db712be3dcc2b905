//! Workbook parsing for CSV and Excel (.xlsx/.xlsm/.xlsb) uploads.
//!
//! Everything is parsed up front into string cells; typing happens later at
//! dataset ingestion. Date cells arrive as Excel serial numbers and are
//! rendered as ISO strings here so the rest of the pipeline never sees them.

use anyhow::{Context, Result};
use calamine::{open_workbook_from_rs, Data, Reader, Xlsb, Xlsx};
use std::io::Cursor;

/// One worksheet as raw string cells. First row of the source is the header row.
#[derive(Debug, Clone)]
pub struct RawSheet {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// A parsed upload: every non-empty worksheet of the file.
#[derive(Debug, Clone)]
pub struct Workbook {
    pub source_file: String,
    pub sheets: Vec<RawSheet>,
}

impl Workbook {
    /// Sheet names in workbook order.
    pub fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|s| s.name.clone()).collect()
    }

    /// Look up a sheet by its exact name.
    pub fn sheet(&self, name: &str) -> Option<&RawSheet> {
        self.sheets.iter().find(|s| s.name == name)
    }
}

/// Dispatch parsing by file extension.
pub fn parse_upload(filename: &str, data: &[u8]) -> Result<Workbook> {
    let ext = filename.rsplit('.').next().unwrap_or("").to_lowercase();

    let sheets = match ext.as_str() {
        "csv" => parse_csv(filename, data)?,
        "xlsx" | "xlsm" => parse_xlsx(data)?,
        "xlsb" => parse_xlsb(data)?,
        _ => anyhow::bail!(
            "Unsupported file type: .{}. Supported: .csv, .xlsx, .xlsm, .xlsb",
            ext
        ),
    };

    Ok(Workbook {
        source_file: filename.to_string(),
        sheets,
    })
}

/// A CSV upload becomes a single sheet named after the file.
fn parse_csv(filename: &str, data: &[u8]) -> Result<Vec<RawSheet>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(true)
        .from_reader(data);

    let headers: Vec<String> = reader
        .headers()
        .context("Failed to read CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
        anyhow::bail!("CSV file has no headers");
    }

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.context("Failed to read CSV record")?;
        let row: Vec<String> = record.iter().map(|f| f.to_string()).collect();
        if row.iter().all(|v| v.is_empty()) {
            continue;
        }
        rows.push(row);
    }

    let name = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename)
        .trim_end_matches(".csv")
        .to_string();

    Ok(vec![RawSheet { name, headers, rows }])
}

fn parse_xlsx(data: &[u8]) -> Result<Vec<RawSheet>> {
    let cursor = Cursor::new(data);
    let mut workbook: Xlsx<_> =
        open_workbook_from_rs(cursor).context("Failed to open Excel workbook")?;

    let names: Vec<String> = workbook.sheet_names().to_vec();
    let mut sheets = Vec::new();
    for name in &names {
        match workbook.worksheet_range(name) {
            Ok(range) => {
                if let Some(sheet) = sheet_from_range(name, &range) {
                    sheets.push(sheet);
                }
            }
            Err(e) => tracing::warn!("Skipping sheet '{}': {}", name, e),
        }
    }

    if sheets.is_empty() {
        anyhow::bail!("No sheets with data found in workbook");
    }
    Ok(sheets)
}

fn parse_xlsb(data: &[u8]) -> Result<Vec<RawSheet>> {
    let cursor = Cursor::new(data);
    let mut workbook: Xlsb<_> =
        open_workbook_from_rs(cursor).context("Failed to open Excel workbook")?;

    let names: Vec<String> = workbook.sheet_names().to_vec();
    let mut sheets = Vec::new();
    for name in &names {
        match workbook.worksheet_range(name) {
            Ok(range) => {
                if let Some(sheet) = sheet_from_range(name, &range) {
                    sheets.push(sheet);
                }
            }
            Err(e) => tracing::warn!("Skipping sheet '{}': {}", name, e),
        }
    }

    if sheets.is_empty() {
        anyhow::bail!("No sheets with data found in workbook");
    }
    Ok(sheets)
}

/// First row = headers. Returns None for sheets that are empty, headerless,
/// or header-only; those are not offered for selection.
fn sheet_from_range(name: &str, range: &calamine::Range<Data>) -> Option<RawSheet> {
    let mut row_iter = range.rows();

    let header_row = row_iter.next()?;
    let headers: Vec<String> = header_row.iter().map(cell_to_string).collect();
    if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
        return None;
    }

    let mut rows = Vec::new();
    for row in row_iter {
        let values: Vec<String> = row.iter().map(cell_to_string).collect();
        if values.iter().all(|v| v.is_empty()) {
            continue;
        }
        rows.push(values);
    }

    if rows.is_empty() {
        return None;
    }

    Some(RawSheet {
        name: name.to_string(),
        headers,
        rows,
    })
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            // Avoid trailing ".0" on whole numbers (contractor counts etc.)
            if *f == (*f as i64) as f64 && f.abs() < i64::MAX as f64 {
                format!("{}", *f as i64)
            } else {
                format!("{}", f)
            }
        }
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => excel_serial_to_string(dt.as_f64()),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
        Data::Error(e) => format!("#ERR:{:?}", e),
    }
}

/// Render an Excel serial date number as `YYYY-MM-DD[ HH:MM:SS]`.
/// Epoch 1899-12-30 already absorbs the 1900 leap year bug (serial 60 is the
/// nonexistent 1900-02-29), so only pre-bug serials shift up by one day.
fn excel_serial_to_string(serial: f64) -> String {
    let days = serial as i64;
    let frac = serial - days as f64;

    let adjusted_days = if days > 59 { days } else { days + 1 };

    // 25569 days from 1899-12-30 to the Unix epoch
    let unix_days = adjusted_days - 25569;
    let total_secs = unix_days * 86400 + (frac * 86400.0) as i64;

    let days_since_epoch = total_secs / 86400;
    let time_of_day = (total_secs % 86400 + 86400) % 86400;

    let (year, month, day) = civil_from_days(days_since_epoch as i32);
    let hours = time_of_day / 3600;
    let minutes = (time_of_day % 3600) / 60;
    let seconds = time_of_day % 60;

    if hours == 0 && minutes == 0 && seconds == 0 {
        format!("{:04}-{:02}-{:02}", year, month, day)
    } else {
        format!(
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
            year, month, day, hours, minutes, seconds
        )
    }
}

/// Days since 1970-01-01 to (year, month, day).
fn civil_from_days(days: i32) -> (i32, u32, u32) {
    let mut year = 1970i32;
    let mut remaining = days;

    if remaining >= 0 {
        loop {
            let diy = if is_leap(year) { 366 } else { 365 };
            if remaining < diy {
                break;
            }
            remaining -= diy;
            year += 1;
        }
    } else {
        loop {
            year -= 1;
            let diy = if is_leap(year) { 366 } else { 365 };
            remaining += diy;
            if remaining >= 0 {
                break;
            }
        }
    }

    let dim: [i32; 12] = if is_leap(year) {
        [31, 29, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31]
    } else {
        [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31]
    };

    let mut month = 1u32;
    for d in dim {
        if remaining < d {
            break;
        }
        remaining -= d;
        month += 1;
    }
    (year, month, remaining as u32 + 1)
}

fn is_leap(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}
