use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Which side a team played on in a given match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Home,
    Visitor,
}

impl Mode {
    pub const ALL: [Mode; 2] = [Mode::Home, Mode::Visitor];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Home => "home",
            Mode::Visitor => "visitor",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One game row. `timestamp` is derived from `date` and `time` in epoch
/// milliseconds; every other field is copied from its column. `date` and
/// `time` are `None` when the header lacks the column or the row ends
/// before reaching it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRecord {
    pub timestamp: i64,
    pub home: String,
    pub visitor: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    pub points_home: Option<u32>,
    pub points_visitor: Option<u32>,
    /// Columns with no canonical field, keyed by their header text.
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

impl MatchRecord {
    pub fn team(&self, mode: Mode) -> &str {
        match mode {
            Mode::Home => &self.home,
            Mode::Visitor => &self.visitor,
        }
    }

    pub fn points(&self, mode: Mode) -> Option<u32> {
        match mode {
            Mode::Home => self.points_home,
            Mode::Visitor => self.points_visitor,
        }
    }

    /// Both team names are present, so the row can feed team-scoped views.
    pub fn has_both_teams(&self) -> bool {
        !self.home.is_empty() && !self.visitor.is_empty()
    }
}
