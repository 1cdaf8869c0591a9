use std::collections::BTreeMap;
use std::str::FromStr;

use scoreviz_parser::{MatchRecord, Mode};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamScore {
    pub mode: Mode,
    pub points: Option<u32>,
}

/// Scores of every team that played at `timestamp`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEntry {
    pub timestamp: i64,
    pub per_team_snapshot: BTreeMap<String, TeamScore>,
}

/// Which sides of a game are written into its timeline snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimelinePolicy {
    /// Home team only; visitor scores never reach a snapshot.
    HomeOnly,
    #[default]
    BothSides,
}

impl TimelinePolicy {
    fn modes(&self) -> &'static [Mode] {
        match self {
            TimelinePolicy::HomeOnly => &[Mode::Home],
            TimelinePolicy::BothSides => &Mode::ALL,
        }
    }
}

impl FromStr for TimelinePolicy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "home-only" | "home" => Ok(TimelinePolicy::HomeOnly),
            "both-sides" | "both" => Ok(TimelinePolicy::BothSides),
            other => Err(format!("unknown timeline policy '{other}'")),
        }
    }
}

/// Groups records by timestamp into one snapshot per instant, ascending.
/// Within a group a later record overwrites an earlier one for the same team.
/// Empty team names are left out of the snapshot, not out of the timeline.
pub fn build_timeline(records: &[MatchRecord], policy: TimelinePolicy) -> Vec<TimelineEntry> {
    let mut grouped: BTreeMap<i64, BTreeMap<String, TeamScore>> = BTreeMap::new();

    for record in records {
        let snapshot = grouped.entry(record.timestamp).or_default();
        for &mode in policy.modes() {
            let team = record.team(mode);
            if team.is_empty() {
                continue;
            }
            snapshot.insert(
                team.to_string(),
                TeamScore {
                    mode,
                    points: record.points(mode),
                },
            );
        }
    }

    grouped
        .into_iter()
        .map(|(timestamp, per_team_snapshot)| TimelineEntry {
            timestamp,
            per_team_snapshot,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game(timestamp: i64, home: &str, visitor: &str, home_pts: u32, visitor_pts: u32) -> MatchRecord {
        MatchRecord {
            timestamp,
            home: home.to_string(),
            visitor: visitor.to_string(),
            points_home: Some(home_pts),
            points_visitor: Some(visitor_pts),
            ..MatchRecord::default()
        }
    }

    #[test]
    fn sorts_and_groups_by_timestamp() {
        let records = [
            game(300, "Heat", "Bulls", 90, 88),
            game(100, "Lakers", "Celtics", 98, 100),
            game(300, "Knicks", "Nets", 101, 99),
        ];
        let timeline = build_timeline(&records, TimelinePolicy::BothSides);

        let stamps: Vec<i64> = timeline.iter().map(|entry| entry.timestamp).collect();
        assert_eq!(stamps, [100, 300]);
        assert_eq!(timeline[1].per_team_snapshot.len(), 4);
        assert_eq!(
            timeline[0].per_team_snapshot["Celtics"],
            TeamScore { mode: Mode::Visitor, points: Some(100) }
        );
    }

    #[test]
    fn home_only_omits_visitors() {
        let records = [game(100, "Lakers", "Celtics", 98, 100)];
        let timeline = build_timeline(&records, TimelinePolicy::HomeOnly);

        let snapshot = &timeline[0].per_team_snapshot;
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot["Lakers"], TeamScore { mode: Mode::Home, points: Some(98) });
    }

    #[test]
    fn later_record_wins_for_same_team_and_instant() {
        let records = [
            game(100, "Lakers", "Celtics", 98, 100),
            game(100, "Lakers", "Heat", 110, 95),
        ];
        let timeline = build_timeline(&records, TimelinePolicy::HomeOnly);

        assert_eq!(timeline.len(), 1);
        assert_eq!(timeline[0].per_team_snapshot["Lakers"].points, Some(110));
    }

    #[test]
    fn parses_policy_names() {
        assert_eq!("home-only".parse(), Ok(TimelinePolicy::HomeOnly));
        assert_eq!("Both-Sides".parse(), Ok(TimelinePolicy::BothSides));
        assert!("sideways".parse::<TimelinePolicy>().is_err());
    }
}
