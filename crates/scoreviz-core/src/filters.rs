use std::collections::{BTreeMap, BTreeSet};

use scoreviz_parser::Mode;
use serde::{Deserialize, Serialize};

pub const TEAMS_FILTER: &str = "teams";
pub const MODE_FILTER: &str = "mode";

/// Selected options per filter category. A category that is absent or has no
/// selections places no restriction on its values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterState {
    categories: BTreeMap<String, BTreeSet<String>>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the selection for `category`.
    pub fn with<I, S>(mut self, category: &str, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories.insert(
            category.to_string(),
            options.into_iter().map(Into::into).collect(),
        );
        self
    }

    pub fn teams<I, S>(self, teams: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.with(TEAMS_FILTER, teams)
    }

    pub fn modes<I>(self, modes: I) -> Self
    where
        I: IntoIterator<Item = Mode>,
    {
        self.with(MODE_FILTER, modes.into_iter().map(|mode| mode.as_str()))
    }

    pub fn selected(&self, category: &str) -> Option<&BTreeSet<String>> {
        self.categories.get(category)
    }

    /// `value` passes when the category has no selection or selects it.
    pub fn allows(&self, category: &str, value: &str) -> bool {
        match self.categories.get(category) {
            Some(selected) if !selected.is_empty() => selected.contains(value),
            _ => true,
        }
    }

    /// Whether `team` playing as `mode` passes both the team and mode filters.
    pub fn allows_side(&self, team: &str, mode: Mode) -> bool {
        self.allows(TEAMS_FILTER, team) && self.allows(MODE_FILTER, mode.as_str())
    }

    pub fn is_unrestricted(&self) -> bool {
        self.categories.values().all(BTreeSet::is_empty)
    }
}
