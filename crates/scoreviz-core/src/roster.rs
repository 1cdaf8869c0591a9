use std::collections::HashSet;

use scoreviz_parser::MatchRecord;

/// Every non-empty team name in first-seen order, home before visitor
/// within a record.
pub fn extract_teams(records: &[MatchRecord]) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut teams = Vec::new();

    for record in records {
        for name in [record.home.as_str(), record.visitor.as_str()] {
            if !name.is_empty() && seen.insert(name) {
                teams.push(name.to_string());
            }
        }
    }

    teams
}
