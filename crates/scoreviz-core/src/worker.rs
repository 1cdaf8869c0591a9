//! Background worker that owns pipeline execution for a host.
//!
//! One inbound [`PipelineRequest`] produces exactly one [`PipelineResponse`],
//! handed to the handler injected at [`PipelineWorker::start`]. Requests are
//! processed one at a time in arrival order; each response carries the id its
//! request was tagged with so the host can discard stale results.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::error::{Result, WorkerError};
use crate::pipeline::{self, PipelineOptions, PipelineRequest, PipelineResult};

pub type RequestId = u64;

#[derive(Debug)]
pub struct PipelineResponse {
    pub id: RequestId,
    pub result: Result<PipelineResult>,
}

struct Envelope {
    id: RequestId,
    request: PipelineRequest,
}

pub struct PipelineWorker {
    sender: Mutex<Option<mpsc::Sender<Envelope>>>,
    task: Mutex<Option<JoinHandle<()>>>,
    next_id: AtomicU64,
}

impl PipelineWorker {
    /// Spawns the worker task on the current tokio runtime. `capacity` bounds
    /// the number of queued requests; posting blocks once it is reached.
    pub fn start<H>(options: PipelineOptions, capacity: usize, mut handler: H) -> Self
    where
        H: FnMut(PipelineResponse) + Send + 'static,
    {
        let (sender, mut receiver) = mpsc::channel::<Envelope>(capacity.max(1));

        let task = tokio::spawn(async move {
            while let Some(Envelope { id, request }) = receiver.recv().await {
                debug!(id, "pipeline request received");
                let result = tokio::task::spawn_blocking(move || {
                    pipeline::run(&request.raw, &request.filters, &options)
                })
                .await
                .map_err(WorkerError::from);

                if let Err(err) = &result {
                    warn!(id, error = %err, "pipeline request failed");
                }
                handler(PipelineResponse { id, result });
            }
            debug!("pipeline worker drained");
        });

        Self {
            sender: Mutex::new(Some(sender)),
            task: Mutex::new(Some(task)),
            next_id: AtomicU64::new(1),
        }
    }

    /// Allocates the tag for a request that will be passed to [`Self::send`].
    pub fn next_id(&self) -> RequestId {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Queues a request under an id obtained from [`Self::next_id`].
    pub async fn send(&self, id: RequestId, request: PipelineRequest) -> Result<()> {
        let sender = self
            .sender
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or(WorkerError::Stopped)?;

        sender
            .send(Envelope { id, request })
            .await
            .map_err(|_| WorkerError::Closed)
    }

    /// Tags and queues a request, returning its id.
    pub async fn post(&self, request: PipelineRequest) -> Result<RequestId> {
        let id = self.next_id();
        self.send(id, request).await?;
        Ok(id)
    }

    pub fn is_running(&self) -> bool {
        self.sender
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Stops accepting requests, lets queued ones finish, and waits for the
    /// task to exit. Calling it again is a no-op.
    pub async fn stop(&self) -> Result<()> {
        self.sender
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        let task = self
            .task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        if let Some(task) = task {
            task.await?;
        }
        Ok(())
    }
}
