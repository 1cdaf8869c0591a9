//! One invocation: raw text + filters -> roster, match list, timeline, team series.

use std::borrow::Cow;

use scoreviz_parser::{parse_with_report, MatchRecord, ParseOptions};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::filters::FilterState;
use crate::roster::extract_teams;
use crate::team_series::{build_team_series, TeamSeries};
use crate::timeline::{build_timeline, TimelineEntry, TimelinePolicy};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PipelineOptions {
    pub parse: ParseOptions,
    pub timeline: TimelinePolicy,
}

/// Uploaded data as it arrives from the host: text, raw bytes, or nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawInput {
    Text(String),
    Bytes(Vec<u8>),
    #[default]
    Missing,
}

impl RawInput {
    /// Bytes are read as UTF-8, replacing invalid sequences.
    pub fn decode(&self) -> Cow<'_, str> {
        match self {
            RawInput::Text(text) => Cow::Borrowed(text.as_str()),
            RawInput::Bytes(bytes) => String::from_utf8_lossy(bytes),
            RawInput::Missing => Cow::Borrowed(""),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            RawInput::Text(text) => text.is_empty(),
            RawInput::Bytes(bytes) => bytes.is_empty(),
            RawInput::Missing => true,
        }
    }
}

impl From<String> for RawInput {
    fn from(text: String) -> Self {
        RawInput::Text(text)
    }
}

impl From<&str> for RawInput {
    fn from(text: &str) -> Self {
        RawInput::Text(text.to_string())
    }
}

impl From<Vec<u8>> for RawInput {
    fn from(bytes: Vec<u8>) -> Self {
        RawInput::Bytes(bytes)
    }
}

/// Inbound message: `{ raw, filters }`. Either field may be omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineRequest {
    #[serde(default)]
    pub raw: RawInput,
    #[serde(default)]
    pub filters: FilterState,
}

impl PipelineRequest {
    pub fn new(raw: impl Into<RawInput>, filters: FilterState) -> Self {
        Self {
            raw: raw.into(),
            filters,
        }
    }
}

/// Outbound message, recomputed from scratch on every run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineResult {
    pub teams: Vec<String>,
    pub match_list: Vec<MatchRecord>,
    pub timeline: Vec<TimelineEntry>,
    pub team_series: TeamSeries,
}

impl PipelineResult {
    pub fn is_empty(&self) -> bool {
        self.match_list.is_empty()
    }
}

/// Runs the whole pipeline. Never fails: unusable rows are dropped and a
/// missing or header-only input produces an empty result.
pub fn run(raw: &RawInput, filters: &FilterState, options: &PipelineOptions) -> PipelineResult {
    let text = raw.decode();
    let report = parse_with_report(&text, &options.parse);
    let skipped = report.skipped.len();
    let dropped = report.dropped_rows();
    let match_list = report.records;

    let result = PipelineResult {
        teams: extract_teams(&match_list),
        timeline: build_timeline(&match_list, options.timeline),
        team_series: build_team_series(&match_list, filters),
        match_list,
    };

    info!(
        records = result.match_list.len(),
        teams = result.teams.len(),
        timeline = result.timeline.len(),
        dropped,
        skipped,
        "pipeline run complete"
    );

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_raw_yields_empty_result() {
        let result = run(&RawInput::Missing, &FilterState::new(), &PipelineOptions::default());
        assert_eq!(result, PipelineResult::default());
    }

    #[test]
    fn bytes_are_decoded_lossily() {
        let raw = RawInput::from(b"Home/Neutral,Visitor/Neutral\n\xffA,B\n".to_vec());
        assert!(raw.decode().starts_with("Home/Neutral"));
        assert!(raw.decode().contains('\u{fffd}'));
    }

    #[test]
    fn request_fields_default_when_absent() {
        let request: PipelineRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(request.raw, RawInput::Missing);
        assert!(request.filters.is_unrestricted());

        let request: PipelineRequest =
            serde_json::from_str(r#"{"raw": null, "filters": {"teams": ["Lakers"]}}"#).unwrap();
        assert_eq!(request.raw, RawInput::Missing);
        assert!(!request.filters.is_unrestricted());

        let request: PipelineRequest = serde_json::from_str(r#"{"raw": [72, 105]}"#).unwrap();
        assert_eq!(request.raw.decode(), "Hi");
    }
}
