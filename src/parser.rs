use csv::{Reader, ReaderBuilder, StringRecord, Trim};
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::roster::{Roster, Student, YearLabel};

/// Column positions of one year inside the roster sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct YearColumns {
    enrollment: usize,
    name: Option<usize>,
}

/// Splits a header into upper-cased alphanumeric tokens.
/// "Enrollment No. (II Year)" -> ["ENROLLMENT", "NO", "II", "YEAR"]
fn header_tokens(header: &str) -> Vec<String> {
    header
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_ascii_uppercase)
        .collect()
}

/// Year a header refers to, by roman numeral or digit token
fn header_year(tokens: &[String]) -> Option<YearLabel> {
    tokens.iter().find_map(|token| {
        YearLabel::ALL
            .into_iter()
            .find(|year| token == year.numeral() || token == year.digit())
    })
}

fn is_name_header(tokens: &[String]) -> bool {
    tokens.iter().any(|t| t.contains("NAME"))
}

fn is_enrollment_header(tokens: &[String]) -> bool {
    tokens.iter().any(|t| t.contains("ENROL") || t == "NO")
}

/// Finds the enrollment and name columns for every year present in the headers.
///
/// Sheets either carry explicit "Enrollment No. (II Year)" / "Student Name (II Year)"
/// pairs, or a single column per year ("II Yr") holding enrollments only.
fn locate_year_columns(headers: &StringRecord) -> Vec<(YearLabel, YearColumns)> {
    let tokenized: Vec<Vec<String>> = headers.iter().map(header_tokens).collect();
    let mut located = Vec::new();

    for year in YearLabel::ALL {
        let matching: Vec<usize> = tokenized
            .iter()
            .enumerate()
            .filter(|(_, tokens)| header_year(tokens) == Some(year))
            .map(|(idx, _)| idx)
            .collect();

        let mut enrollment = None;
        let mut name = None;
        for &idx in &matching {
            let tokens = &tokenized[idx];
            if is_name_header(tokens) {
                name = name.or(Some(idx));
            } else if is_enrollment_header(tokens) {
                enrollment = enrollment.or(Some(idx));
            }
        }

        // Single-column format: the first column mentioning the year holds enrollments
        if enrollment.is_none() && name.is_none() {
            enrollment = matching.first().copied();
        }

        match enrollment {
            Some(enrollment) => {
                debug!(year = %year, enrollment, ?name, "located roster columns");
                located.push((year, YearColumns { enrollment, name }));
            }
            None if name.is_some() => {
                warn!(year = %year, "roster has a name column but no enrollment column, year skipped");
            }
            None => {}
        }
    }

    located
}

/// Reads a cell, treating blanks and spreadsheet "nan" placeholders as missing
fn cell(record: &StringRecord, idx: usize) -> Option<&str> {
    let value = record.get(idx)?.trim();
    if value.is_empty() || value.eq_ignore_ascii_case("nan") {
        None
    } else {
        Some(value)
    }
}

fn read_records<R: Read>(mut reader: Reader<R>) -> Result<Roster> {
    let headers = reader.headers()?.clone();
    let columns = locate_year_columns(&headers);
    if columns.is_empty() {
        warn!("no year columns found in roster headers");
    }

    let mut roster = Roster::new();
    let mut skipped = 0usize;

    for (line, result) in reader.records().enumerate() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                // Unreadable rows are dropped, never fatal
                warn!(row = line + 1, error = %e, "skipping unreadable roster row");
                skipped += 1;
                continue;
            }
        };

        for (year, cols) in &columns {
            let Some(enrollment) = cell(&record, cols.enrollment) else {
                continue;
            };
            let name = cols.name.and_then(|idx| cell(&record, idx)).unwrap_or("");

            if !roster.push(*year, Student::new(enrollment, name)) {
                warn!(row = line + 1, year = %year, enrollment, "skipping duplicate enrollment");
                skipped += 1;
            }
        }
    }

    info!(students = roster.len(), skipped, "roster loaded");
    Ok(roster)
}

fn reader_builder() -> ReaderBuilder {
    let mut builder = ReaderBuilder::new();
    builder.flexible(true).trim(Trim::All);
    builder
}

/// Loads the master roster from a CSV file
pub fn load_roster<P: AsRef<Path>>(csv_path: P) -> Result<Roster> {
    let reader = reader_builder().from_path(csv_path)?;
    read_records(reader)
}

/// Loads the master roster from any CSV source (uploaded bytes, stdin, ...)
pub fn read_roster<R: Read>(source: R) -> Result<Roster> {
    read_records(reader_builder().from_reader(source))
}
