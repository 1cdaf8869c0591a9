pub mod columns;
pub mod errors;
pub mod model;
mod reader;
pub mod timestamp;

pub use errors::{RowError, SkippedRow};
pub use model::{MatchRecord, Mode};
pub use reader::{parse, parse_with_options, parse_with_report, ParseOptions, ParseReport};
