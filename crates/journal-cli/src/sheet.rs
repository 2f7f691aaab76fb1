//! Loading journal spreadsheets into a [`Table`].
//!
//! Workbooks (`.xls`, `.xlsx`, `.xlsm`, `.ods`) are read with calamine, CSV
//! files with the csv crate. Only the first worksheet is used. Every cell is
//! turned into text; the lesson-number column of data rows is normalised so
//! `12.0` reads as `12`.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use journal_core::types::LESSON_COLUMN;
use journal_core::{Row, Table};
use thiserror::Error;

/// Errors raised while accepting or reading a journal file.
#[derive(Error, Debug)]
pub enum SheetError {
    #[error("File is empty or could not be read")]
    EmptyOrUnreadable,

    #[error("File has no extension: {0}")]
    MissingExtension(String),

    #[error("Files of type .{extension} are not accepted (allowed: {allowed})")]
    DisallowedExtension { extension: String, allowed: String },

    #[error("File is {size} bytes, the limit is {limit} bytes")]
    TooLarge { size: u64, limit: u64 },

    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to open spreadsheet: {0}")]
    Spreadsheet(#[from] calamine::Error),

    #[error("Failed to read CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// What files the loader accepts.
///
/// Passed explicitly to every load so callers can tighten it per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPolicy {
    /// Lowercase extensions without the dot
    pub allowed_extensions: Vec<String>,

    /// Largest accepted file size
    pub max_bytes: u64,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            allowed_extensions: ["xls", "xlsx", "xlsm", "ods", "csv"]
                .iter()
                .map(|e| e.to_string())
                .collect(),
            max_bytes: 16 * 1024 * 1024,
        }
    }
}

impl UploadPolicy {
    /// Policy with a different size limit.
    pub fn with_max_bytes(mut self, max_bytes: u64) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    /// Check the file name against the allowed extensions.
    ///
    /// Returns the lowercase extension on success.
    pub fn check_name(&self, path: &Path) -> Result<String, SheetError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .ok_or_else(|| SheetError::MissingExtension(path.display().to_string()))?;

        if !self.allowed_extensions.iter().any(|e| *e == extension) {
            return Err(SheetError::DisallowedExtension {
                extension,
                allowed: self.allowed_extensions.join(", "),
            });
        }

        Ok(extension)
    }

    /// Check a file size against the limit.
    pub fn check_size(&self, size: u64) -> Result<(), SheetError> {
        if size > self.max_bytes {
            return Err(SheetError::TooLarge {
                size,
                limit: self.max_bytes,
            });
        }
        Ok(())
    }

    /// Check name and size of a file on disk.
    pub fn check(&self, path: &Path) -> Result<String, SheetError> {
        let extension = self.check_name(path)?;
        self.check_size(std::fs::metadata(path)?.len())?;
        Ok(extension)
    }
}

/// Load a journal file accepted by `policy`.
pub fn load_table(path: &Path, policy: &UploadPolicy) -> Result<Table, SheetError> {
    let extension = policy.check(path)?;
    tracing::debug!(path = %path.display(), %extension, "loading journal");

    let rows = if extension == "csv" {
        read_csv(File::open(path)?)?
    } else {
        read_workbook(path)?
    };

    into_table(rows)
}

/// Read the first worksheet of a workbook as text rows.
///
/// The grid is anchored at A1 even when the used range starts lower, so
/// coordinates match what the user sees in the spreadsheet.
fn read_workbook(path: &Path) -> Result<Vec<Row>, SheetError> {
    let mut workbook = open_workbook_auto(path)?;
    let range = match workbook.worksheet_range_at(0) {
        Some(range) => range?,
        None => return Err(SheetError::EmptyOrUnreadable),
    };

    let Some((start_row, start_col)) = range.start() else {
        return Ok(Vec::new());
    };
    let (start_row, start_col) = (start_row as usize, start_col as usize);
    let width = start_col + range.width();

    let mut rows: Vec<Row> = vec![vec![String::new(); width]; start_row];
    for cells in range.rows() {
        let mut row = vec![String::new(); start_col];
        row.extend(cells.iter().map(cell_text));
        rows.push(row);
    }

    tracing::debug!(rows = rows.len(), width, "worksheet read");
    Ok(rows)
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        other => other.to_string(),
    }
}

/// Read CSV text as rows. No header handling: row 0 is kept as is.
pub fn read_csv<R: Read>(reader: R) -> Result<Vec<Row>, SheetError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(rows)
}

/// Reject empty input and normalise lesson numbers of data rows.
pub fn into_table(mut rows: Vec<Row>) -> Result<Table, SheetError> {
    for row in rows.iter_mut().skip(1) {
        if let Some(cell) = row.get_mut(LESSON_COLUMN) {
            *cell = coerce_lesson_number(cell);
        }
    }

    let table = Table::new(rows);
    if !table.has_content() {
        return Err(SheetError::EmptyOrUnreadable);
    }
    Ok(table)
}

/// Whole numbers become integer text (`"12.0"` → `"12"`), other numbers keep
/// their decimal form, anything else is returned unchanged.
pub fn coerce_lesson_number(text: &str) -> String {
    match text.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 => {
            format!("{}", value as i64)
        }
        Ok(value) if value.is_finite() => value.to_string(),
        _ => text.to_string(),
    }
}
