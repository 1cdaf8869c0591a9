use chrono_tz::Tz;
use csv::{ReaderBuilder, StringRecord, Terminator};
use tracing::debug;

use crate::columns::{ColumnRole, HeaderLayout};
use crate::errors::{RowError, SkippedRow};
use crate::model::{MatchRecord, Mode};
use crate::timestamp::derive_timestamp;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParseOptions {
    /// Zone the `Date` and `Start (ET)` columns are written in.
    pub timezone: Tz,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            timezone: chrono_tz::America::New_York,
        }
    }
}

#[derive(Debug, Default)]
pub struct ParseReport {
    pub records: Vec<MatchRecord>,
    /// Rows dropped entirely, plus rows kept with an unreadable points value.
    pub skipped: Vec<SkippedRow>,
}

impl ParseReport {
    pub fn dropped_rows(&self) -> usize {
        self.skipped
            .iter()
            .filter(|skipped| skipped.reason.drops_row())
            .count()
    }
}

/// Parses raw CSV text with default options, silently dropping rows whose
/// date/time does not parse.
pub fn parse(content: &str) -> Vec<MatchRecord> {
    parse_with_options(content, &ParseOptions::default())
}

pub fn parse_with_options(content: &str, options: &ParseOptions) -> Vec<MatchRecord> {
    parse_with_report(content, options).records
}

/// Lines split on `\n`, fields on `,`, with no quoting. The first line is
/// the header; every later line is matched to it by position.
pub fn parse_with_report(content: &str, options: &ParseOptions) -> ParseReport {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .terminator(Terminator::Any(b'\n'))
        .from_reader(content.as_bytes());

    let mut report = ParseReport::default();
    let mut rows = reader.records();

    let layout = match rows.next() {
        Some(Ok(header)) => HeaderLayout::from_header(&header),
        Some(Err(err)) => {
            debug!(error = %err, "header row unreadable");
            return report;
        }
        None => return report,
    };
    log_missing_columns(&layout);

    for row in rows {
        let row = match row {
            Ok(row) => row,
            Err(err) => {
                let line = err.position().map(|pos| pos.line()).unwrap_or_default();
                debug!(line, error = %err, "skipping unreadable row");
                report.skipped.push(SkippedRow::new(line, RowError::from(err)));
                continue;
            }
        };
        let line = row_line(&row);

        let (mut record, problems) = layout.build_record(&row);
        for problem in problems {
            debug!(line, error = %problem, "points column not numeric");
            report.skipped.push(SkippedRow::new(line, problem));
        }

        match derive_timestamp(
            record.date.as_deref(),
            record.time.as_deref(),
            options.timezone,
        ) {
            Ok(timestamp) => {
                record.timestamp = timestamp;
                report.records.push(record);
            }
            Err(err) => {
                debug!(line, error = %err, "dropping row without a usable timestamp");
                report.skipped.push(SkippedRow::new(line, err));
            }
        }
    }

    report
}

fn row_line(row: &StringRecord) -> u64 {
    row.position().map(|pos| pos.line()).unwrap_or_default()
}

fn log_missing_columns(layout: &HeaderLayout) {
    let expected = [
        ColumnRole::Team(Mode::Home),
        ColumnRole::Team(Mode::Visitor),
        ColumnRole::Points(Mode::Home),
        ColumnRole::Points(Mode::Visitor),
        ColumnRole::Date,
        ColumnRole::Time,
    ];
    for role in expected.iter().filter(|role| !layout.has_role(role)) {
        debug!(?role, columns = %layout, "recognized column absent from header");
    }
}
