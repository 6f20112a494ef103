//! CSV input and output.
//!
//! Input is any CSV file whose header row has an `email` column. Output is
//! the pair of report files: `domain,error` rows and unique `domain` rows.

use crate::error::DomainVerifyError;
use crate::types::{InvalidDomainRecord, UniqueInvalidDomainRecord};
use csv::{ReaderBuilder, Trim, WriterBuilder};
use serde::Serialize;
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

/// Name of the required input column.
pub const EMAIL_COLUMN: &str = "email";

/// Read the `email` column of a CSV file.
///
/// Rows where the field is missing or empty are skipped. A file with no
/// header row at all yields no emails.
pub fn read_emails<P: AsRef<Path>>(path: P) -> Result<Vec<String>, DomainVerifyError> {
    let path = path.as_ref();
    let source = path.to_string_lossy();
    let file = File::open(path).map_err(|e| {
        DomainVerifyError::input_parse(source.as_ref(), format!("cannot open file: {}", e))
    })?;
    read_emails_from_reader(file, &source)
}

/// Read the `email` column from any reader. `source` names the input in
/// error messages.
pub fn read_emails_from_reader<R: Read>(
    reader: R,
    source: &str,
) -> Result<Vec<String>, DomainVerifyError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| DomainVerifyError::input_parse(source, e.to_string()))?
        .clone();

    if headers.is_empty() {
        debug!(source, "input has no header row");
        return Ok(Vec::new());
    }

    let column = headers
        .iter()
        .position(|name| name.trim_start_matches('\u{feff}') == EMAIL_COLUMN)
        .ok_or_else(|| {
            DomainVerifyError::input_parse(
                source,
                format!("missing required column '{}'", EMAIL_COLUMN),
            )
        })?;

    let mut emails = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record.map_err(|e| {
            DomainVerifyError::input_parse(source, format!("row {}: {}", row + 2, e))
        })?;
        match record.get(column) {
            Some(email) if !email.is_empty() => emails.push(email.to_string()),
            _ => debug!(source, row = row + 2, "skipping row without email"),
        }
    }

    debug!(source, emails = emails.len(), "input read");
    Ok(emails)
}

const INVALID_HEADERS: &[&str] = &["domain", "error"];
const UNIQUE_HEADERS: &[&str] = &["domain"];

/// Write the `domain,error` report.
pub fn write_invalid_domains<P: AsRef<Path>>(
    path: P,
    records: &[InvalidDomainRecord],
) -> Result<(), DomainVerifyError> {
    StagedReport::write(path.as_ref(), INVALID_HEADERS, records)?.commit()
}

/// Write the unique `domain` report.
pub fn write_unique_invalid_domains<P: AsRef<Path>>(
    path: P,
    records: &[UniqueInvalidDomainRecord],
) -> Result<(), DomainVerifyError> {
    StagedReport::write(path.as_ref(), UNIQUE_HEADERS, records)?.commit()
}

/// Write both reports, or neither.
///
/// Each report is first written in full to a temporary file next to its
/// destination. Only when both succeeded are they renamed into place, so a
/// failed write leaves the output paths untouched.
pub fn write_reports(
    invalid_path: &Path,
    invalid: &[InvalidDomainRecord],
    unique_path: &Path,
    unique: &[UniqueInvalidDomainRecord],
) -> Result<(), DomainVerifyError> {
    let invalid = StagedReport::write(invalid_path, INVALID_HEADERS, invalid)?;
    let unique = StagedReport::write(unique_path, UNIQUE_HEADERS, unique)?;
    invalid.commit()?;
    unique.commit()
}

/// Serialize `records` to CSV on any writer, header row first.
pub fn write_records_to<W: Write, T: Serialize>(
    writer: W,
    headers: &[&str],
    records: &[T],
) -> Result<(), DomainVerifyError> {
    // Headers are written explicitly so an empty report still has them.
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(writer);
    writer.write_record(headers)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

/// A fully written report waiting in a temporary file for its final name.
///
/// Dropping it without [`commit`](Self::commit) removes the temporary file.
struct StagedReport {
    file: NamedTempFile,
    path: PathBuf,
    rows: usize,
}

impl StagedReport {
    fn write<T: Serialize>(
        path: &Path,
        headers: &[&str],
        records: &[T],
    ) -> Result<Self, DomainVerifyError> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut file = tempfile::Builder::new()
            .prefix(".domain-verify-")
            .suffix(".tmp")
            .tempfile_in(dir)
            .map_err(|e| {
                DomainVerifyError::file_error(
                    path.to_string_lossy(),
                    format!("cannot create file: {}", e),
                )
            })?;
        write_records_to(file.as_file_mut(), headers, records).map_err(|e| match e {
            DomainVerifyError::Io(io) => {
                DomainVerifyError::file_error(path.to_string_lossy(), io.to_string())
            }
            other => other,
        })?;

        Ok(Self {
            file,
            path: path.to_path_buf(),
            rows: records.len(),
        })
    }

    fn commit(self) -> Result<(), DomainVerifyError> {
        self.file.persist(&self.path).map_err(|e| {
            DomainVerifyError::file_error(self.path.to_string_lossy(), e.error.to_string())
        })?;
        debug!(path = %self.path.display(), rows = self.rows, "report written");
        Ok(())
    }
}
