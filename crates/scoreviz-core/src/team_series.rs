use std::collections::BTreeMap;

use scoreviz_parser::{MatchRecord, Mode};
use serde::{Deserialize, Serialize};

use crate::filters::FilterState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub time: i64,
    pub mode: Mode,
    pub points: Option<u32>,
}

/// Team name -> that team's entries in source record order.
pub type TeamSeries = BTreeMap<String, Vec<SeriesPoint>>;

/// Builds per-team series. Every team of a record with both names gets a key
/// whether or not the filters let any of its entries through; each side of
/// a record is filtered on its own.
pub fn build_team_series(records: &[MatchRecord], filters: &FilterState) -> TeamSeries {
    let mut series = TeamSeries::new();

    for record in records.iter().filter(|record| record.has_both_teams()) {
        for mode in Mode::ALL {
            let team = record.team(mode);
            let entries = series.entry(team.to_string()).or_default();
            if filters.allows_side(team, mode) {
                entries.push(SeriesPoint {
                    time: record.timestamp,
                    mode,
                    points: record.points(mode),
                });
            }
        }
    }

    series
}
