//! Score history views: raw CSV -> match records -> roster, timeline and
//! per-team series, behind a request/response worker.

pub mod error;
pub mod filters;
pub mod pipeline;
pub mod roster;
pub mod session;
pub mod team_series;
pub mod timeline;
pub mod worker;

pub use error::WorkerError;
pub use filters::FilterState;
pub use pipeline::{run, PipelineOptions, PipelineRequest, PipelineResult, RawInput};
pub use roster::extract_teams;
pub use scoreviz_parser::{MatchRecord, Mode, ParseOptions};
pub use session::MatchDataSession;
pub use team_series::{build_team_series, SeriesPoint, TeamSeries};
pub use timeline::{build_timeline, TeamScore, TimelineEntry, TimelinePolicy};
pub use worker::{PipelineResponse, PipelineWorker, RequestId};
