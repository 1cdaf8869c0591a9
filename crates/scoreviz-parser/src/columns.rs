use csv::StringRecord;

use crate::errors::RowError;
use crate::model::{MatchRecord, Mode};

pub const HOME_HEADER: &str = "Home/Neutral";
pub const VISITOR_HEADER: &str = "Visitor/Neutral";
pub const POINTS_HEADER: &str = "PTS";
pub const DATE_HEADER: &str = "Date";
pub const TIME_HEADER: &str = "Start (ET)";

/// Where the value of one column lands in a [`MatchRecord`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnRole {
    Team(Mode),
    Points(Mode),
    Date,
    Time,
    Passthrough(String),
}

impl ColumnRole {
    fn canonical_name(&self) -> &str {
        match self {
            ColumnRole::Team(Mode::Home) => "home",
            ColumnRole::Team(Mode::Visitor) => "visitor",
            ColumnRole::Points(mode) => points_column(*mode),
            ColumnRole::Date => "date",
            ColumnRole::Time => "time",
            ColumnRole::Passthrough(name) => name,
        }
    }
}

/// Column dispatch table built once from the header row.
#[derive(Debug, Clone, Default)]
pub struct HeaderLayout {
    roles: Vec<ColumnRole>,
}

impl HeaderLayout {
    /// The first `PTS` column carries the visitor score; every later one
    /// carries the home score.
    pub fn from_header(header: &StringRecord) -> Self {
        let mut seen_points = false;
        let roles = header
            .iter()
            .map(|column| {
                if column == POINTS_HEADER {
                    let mode = if seen_points { Mode::Home } else { Mode::Visitor };
                    seen_points = true;
                    return ColumnRole::Points(mode);
                }
                classify_column(column)
            })
            .collect();
        Self { roles }
    }

    pub fn roles(&self) -> &[ColumnRole] {
        &self.roles
    }

    pub fn has_role(&self, role: &ColumnRole) -> bool {
        self.roles.contains(role)
    }

    /// Fills a record positionally. Missing trailing fields stay empty (`None`
    /// for `date`/`time`) and fields past the last header are ignored. Non-numeric points are
    /// returned alongside the record rather than rejecting it.
    pub fn build_record(&self, row: &StringRecord) -> (MatchRecord, Vec<RowError>) {
        let mut record = MatchRecord::default();
        let mut problems = Vec::new();

        for (role, value) in self.roles.iter().zip(row.iter()) {
            match role {
                ColumnRole::Team(Mode::Home) => record.home = value.to_string(),
                ColumnRole::Team(Mode::Visitor) => record.visitor = value.to_string(),
                ColumnRole::Date => record.date = Some(value.to_string()),
                ColumnRole::Time => record.time = Some(value.to_string()),
                ColumnRole::Points(mode) => {
                    let parsed = parse_points(*mode, value).unwrap_or_else(|err| {
                        problems.push(err);
                        None
                    });
                    match mode {
                        Mode::Home => record.points_home = parsed,
                        Mode::Visitor => record.points_visitor = parsed,
                    }
                }
                ColumnRole::Passthrough(name) => {
                    record.extra.insert(name.clone(), value.to_string());
                }
            }
        }

        (record, problems)
    }
}

fn classify_column(column: &str) -> ColumnRole {
    match column {
        HOME_HEADER => ColumnRole::Team(Mode::Home),
        VISITOR_HEADER => ColumnRole::Team(Mode::Visitor),
        DATE_HEADER => ColumnRole::Date,
        TIME_HEADER => ColumnRole::Time,
        other => ColumnRole::Passthrough(other.to_string()),
    }
}

fn points_column(mode: Mode) -> &'static str {
    match mode {
        Mode::Home => "pointsHome",
        Mode::Visitor => "pointsVisitor",
    }
}

fn parse_points(mode: Mode, value: &str) -> Result<Option<u32>, RowError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<u32>()
        .map(Some)
        .map_err(|_| RowError::Points {
            column: points_column(mode),
            value: value.to_string(),
        })
}

impl std::fmt::Display for HeaderLayout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.roles.iter().map(ColumnRole::canonical_name).collect();
        f.write_str(&names.join(","))
    }
}
