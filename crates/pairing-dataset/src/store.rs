//! Append-only CSV dataset
//!
//! Provides file-based persistence for submissions with:
//! - A header row defining the column order of every subsequent row
//! - Append-only writes; rows are never rewritten or removed
//! - Lenient reads: empty cells, `NaN` markers and float-formatted integers
//!   never fail a read
//! - Single-writer appends guarded by an in-process lock

use pairing_core::{Error, Result, Submission, COLUMNS};
use parking_lot::RwLock;
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Cell values treated as "unknown" when reading
const MISSING_MARKERS: [&str; 12] = [
    "", "NaN", "nan", "-NaN", "-nan", "NA", "N/A", "n/a", "<NA>", "null", "NULL", "None",
];

/// The persisted submission table.
///
/// Reads take a shared lock and appends an exclusive one, so a reader sees
/// the table either before or after a concurrent append, never half a row.
pub struct DatasetStore {
    path: PathBuf,
    lock: RwLock<()>,
}

impl DatasetStore {
    /// Create a store over the CSV file at `path`. The file need not exist yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        info!("Dataset store at {:?}", path);
        Self {
            path,
            lock: RwLock::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every row in file order. A missing file is an empty dataset.
    pub fn read_all(&self) -> Result<Vec<Submission>> {
        let _guard = self.lock.read();
        self.read_rows().map_err(|e| self.dataset_error(e))
    }

    /// Number of rows currently persisted
    pub fn len(&self) -> Result<usize> {
        Ok(self.read_all()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Append one row in the column order of the existing header.
    ///
    /// Columns the record does not carry are written empty. A missing or
    /// empty file is created with the canonical header first.
    pub fn append(&self, record: &Submission) -> Result<()> {
        let _guard = self.lock.write();
        self.write_row(record).map_err(|e| self.dataset_error(e))
    }

    fn read_rows(&self) -> Result<Vec<Submission>> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("Dataset {:?} does not exist yet", self.path);
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(file);
        let headers = decode_record(reader.byte_headers()?);

        let mut rows = Vec::new();
        for result in reader.byte_records() {
            let record = decode_record(&result?);
            rows.push(parse_row(&headers, &record));
        }

        debug!("Read {} rows from {:?}", rows.len(), self.path);
        Ok(rows)
    }

    fn write_row(&self, record: &Submission) -> Result<()> {
        let existing = self.read_header()?;
        let columns: Vec<String> = match &existing {
            Some(header) => header.clone(),
            None => COLUMNS.iter().map(|c| c.to_string()).collect(),
        };

        let needs_newline = existing.is_some() && !ends_with_newline(&self.path)?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        if needs_newline {
            file.write_all(b"\n")?;
        }

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(&mut file);

        if existing.is_none() {
            info!("Initializing dataset {:?} with canonical header", self.path);
            writer.write_record(&columns)?;
        }

        let dropped: Vec<&str> = COLUMNS
            .iter()
            .copied()
            .filter(|c| !columns.iter().any(|h| h == c))
            .collect();
        if !dropped.is_empty() {
            debug!("Dataset header lacks columns {:?}; not written", dropped);
        }

        writer.write_record(columns.iter().map(|c| record.cell(c).unwrap_or_default()))?;
        writer.flush()?;
        drop(writer);
        file.sync_data()?;

        debug!("Appended row to {:?}", self.path);
        Ok(())
    }

    /// Header of the existing file, or `None` if the file is missing or empty
    fn read_header(&self) -> Result<Option<Vec<String>>> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(file);
        let headers = decode_record(reader.byte_headers()?);
        if headers.is_empty() {
            return Ok(None);
        }
        Ok(Some(headers))
    }

    fn dataset_error(&self, err: Error) -> Error {
        Error::dataset(format!("{}: {}", self.path.display(), err))
    }
}

/// Cells as text; bytes that are not UTF-8 become U+FFFD instead of failing the read
fn decode_record(record: &csv::ByteRecord) -> Vec<String> {
    record
        .iter()
        .map(|cell| String::from_utf8_lossy(cell).into_owned())
        .collect()
}

fn ends_with_newline(path: &Path) -> Result<bool> {
    let mut file = File::open(path)?;
    let len = file.metadata()?.len();
    if len == 0 {
        return Ok(true);
    }
    file.seek(SeekFrom::End(-1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}

fn is_missing(cell: &str) -> bool {
    MISSING_MARKERS.contains(&cell)
}

/// Integer cell; float-formatted integers (`4.0`) are accepted
fn parse_int(cell: &str) -> Option<i64> {
    if let Ok(v) = cell.parse::<i64>() {
        return Some(v);
    }
    match cell.parse::<f64>() {
        // Out-of-range values would saturate on the cast
        Ok(v) if v.is_finite() && v.fract() == 0.0 && v.abs() < i64::MAX as f64 => Some(v as i64),
        _ => None,
    }
}

/// Untyped cell for extra columns: integer, then float, then text
fn parse_value(cell: &str) -> serde_json::Value {
    if let Ok(v) = cell.parse::<i64>() {
        return serde_json::Value::from(v);
    }
    if let Ok(v) = cell.parse::<f64>() {
        if let Some(number) = serde_json::Number::from_f64(v) {
            return serde_json::Value::Number(number);
        }
    }
    serde_json::Value::String(cell.to_string())
}

fn parse_row(headers: &[String], record: &[String]) -> Submission {
    let mut row = Submission::default();

    for (i, column) in headers.iter().enumerate() {
        let cell = record.get(i).map(|c| c.trim()).filter(|c| !is_missing(c));

        match column.as_str() {
            "timestamp" => row.timestamp = cell.map(str::to_string),
            "introversion_extraversion" => row.introversion_extraversion = cell.and_then(parse_int),
            "risk_taking" => row.risk_taking = cell.and_then(parse_int),
            "club_top1" => row.club_top1 = cell.map(str::to_string),
            "weekly_hobby_hours" => row.weekly_hobby_hours = cell.and_then(parse_int),
            "teamwork_preference" => row.teamwork_preference = cell.and_then(parse_int),
            other => {
                let value = cell.map(parse_value).unwrap_or(serde_json::Value::Null);
                row.extra.insert(other.to_string(), value);
            }
        }
    }

    row
}
