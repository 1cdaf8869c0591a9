// crates/scoreviz-core/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum WorkerError {
    #[error("pipeline worker has been stopped")]
    Stopped,

    #[error("pipeline worker is no longer accepting requests")]
    Closed,

    #[error("pipeline task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, WorkerError>;
