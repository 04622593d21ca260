//! Delimited table reading and writing.
//!
//! Readers infer gzip from a `.gz` extension. Writers pick the delimiter from
//! the output extension (`.csv` → comma, anything else → tab) and write
//! through a temp file in the destination directory, so a failed write never
//! leaves a partial table behind.

use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::Path;

use cernet_common::{CernetError, Result};
use flate2::read::MultiGzDecoder;
use tracing::debug;

use crate::table::{is_missing, RecordSet};

/// A parsed delimited file before any interpretation of its columns.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

fn is_gzip(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("gz"))
}

/// Open a file for reading, decompressing `.gz` transparently.
pub fn open_reader(path: &Path) -> Result<Box<dyn Read>> {
    if !path.exists() {
        return Err(CernetError::MissingFile(path.to_path_buf()));
    }
    let file = File::open(path)?;
    if is_gzip(path) {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Read a headed, delimited table without checking row widths.
/// Missing-value tokens become `None`.
pub fn read_raw(path: &Path, delimiter: u8) -> Result<RawTable> {
    let reader = open_reader(path)?;
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()
        .map_err(|e| CernetError::parse(path, format!("reading header: {e}")))?
        .iter()
        .map(str::to_string)
        .collect();

    if headers.is_empty() || headers.iter().all(String::is_empty) {
        return Err(CernetError::parse(path, "no header row"));
    }

    let mut rows = Vec::new();
    for (row_no, result) in csv_reader.records().enumerate() {
        let record = result.map_err(|e| CernetError::parse(path, format!("row {row_no}: {e}")))?;
        rows.push(
            record
                .iter()
                .map(|v| if is_missing(v) { None } else { Some(v.to_string()) })
                .collect(),
        );
    }
    Ok(RawTable { headers, rows })
}

/// Pad rows shorter than `width` with nulls; a longer row is an error.
pub fn fit_rows(path: &Path, rows: &mut [Vec<Option<String>>], width: usize) -> Result<()> {
    for (row_no, row) in rows.iter_mut().enumerate() {
        if row.len() > width {
            return Err(CernetError::parse(
                path,
                format!("row {row_no}: expected {width} fields, saw {}", row.len()),
            ));
        }
        row.resize(width, None);
    }
    Ok(())
}

/// Read a headed, delimited table. Missing-value tokens become `None`;
/// rows shorter than the header are padded, longer rows are an error.
pub fn read_table(path: &Path, delimiter: u8) -> Result<RawTable> {
    let mut table = read_raw(path, delimiter)?;
    let width = table.headers.len();
    fit_rows(path, &mut table.rows, width)?;
    debug!(path = %path.display(), n_rows = table.rows.len(), n_cols = width, "Parsed delimited table");
    Ok(table)
}

/// Delimiter implied by an output path.
pub fn delimiter_for(path: &Path) -> u8 {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    if ext == "csv" { b',' } else { b'\t' }
}

/// Write rows atomically: stage in a temp file next to `path`, then rename.
pub fn write_atomic<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut dyn Write) -> Result<()>,
{
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => std::env::current_dir()?,
    };
    std::fs::create_dir_all(&parent)?;

    let mut staged = tempfile::NamedTempFile::new_in(&parent)?;
    write(staged.as_file_mut())?;
    staged.as_file_mut().flush()?;
    staged.persist(path).map_err(|e| CernetError::Io(e.error))?;
    Ok(())
}

/// Write an interaction table with header `source`, `target`, extras.
pub fn write_records(path: &Path, set: &RecordSet) -> Result<()> {
    let delimiter = delimiter_for(path);
    write_atomic(path, |out| {
        let mut writer = csv::WriterBuilder::new().delimiter(delimiter).from_writer(out);
        writer.write_record(set.header())?;
        for record in set.records() {
            let mut row: Vec<&str> = Vec::with_capacity(2 + record.fields.len());
            row.push(&record.source);
            row.push(&record.target);
            row.extend(record.fields.iter().map(|f| f.as_deref().unwrap_or("")));
            writer.write_record(&row)?;
        }
        writer.flush()?;
        Ok(())
    })?;
    debug!(path = %path.display(), n_rows = set.len(), "Wrote interaction table");
    Ok(())
}
