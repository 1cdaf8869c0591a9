use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use scoreviz_core::{
    PipelineOptions, PipelineRequest, PipelineResponse, PipelineResult, PipelineWorker, RequestId,
    WorkerError,
};
use tokio::sync::oneshot;
use tracing::warn;

type Reply = oneshot::Sender<Result<PipelineResult, WorkerError>>;

/// Callers waiting on a worker response, keyed by request id.
#[derive(Clone, Default)]
struct PendingReplies(Arc<Mutex<HashMap<RequestId, Reply>>>);

impl PendingReplies {
    fn register(&self, id: RequestId) -> oneshot::Receiver<Result<PipelineResult, WorkerError>> {
        let (tx, rx) = oneshot::channel();
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, tx);
        rx
    }

    fn cancel(&self, id: RequestId) {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id);
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    fn deliver(&self, response: PipelineResponse) {
        let waiter = self
            .0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&response.id);

        match waiter {
            Some(reply) => {
                if reply.send(response.result).is_err() {
                    warn!(id = response.id, "caller went away before the result was ready");
                }
            }
            None => warn!(id = response.id, "no caller registered for pipeline response"),
        }
    }
}

/// Drops the waiter for `id` when the caller stops waiting, however the
/// `run` future ends. A delivered response has already removed it.
struct PendingGuard<'a> {
    pending: &'a PendingReplies,
    id: RequestId,
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        self.pending.cancel(self.id);
    }
}

pub struct PipelineState {
    worker: PipelineWorker,
    pending: PendingReplies,
}

impl PipelineState {
    /// Starts the worker; its responses are routed back to whichever
    /// request tagged them.
    pub fn start(options: PipelineOptions, queue_depth: usize) -> Arc<Self> {
        let pending = PendingReplies::default();
        let router = pending.clone();
        let worker = PipelineWorker::start(options, queue_depth, move |response| {
            router.deliver(response)
        });

        Arc::new(Self { worker, pending })
    }

    pub async fn run(&self, request: PipelineRequest) -> Result<PipelineResult, WorkerError> {
        let id = self.worker.next_id();
        let reply = self.pending.register(id);
        let _guard = PendingGuard {
            pending: &self.pending,
            id,
        };

        self.worker.send(id, request).await?;
        reply.await.map_err(|_| WorkerError::Closed)?
    }

    pub async fn shutdown(&self) -> Result<(), WorkerError> {
        self.worker.stop().await
    }
}

#[cfg(test)]
mod tests {
    use scoreviz_core::FilterState;

    use super::*;

    const SINGLE_GAME: &str =
        "Home/Neutral,Visitor/Neutral,PTS,PTS,Date,Start (ET)\nLakers,Celtics,100,98,Dec 1 2023,9:00 pm\n";

    fn request() -> PipelineRequest {
        PipelineRequest::new(SINGLE_GAME, FilterState::default())
    }

    #[tokio::test]
    async fn completed_run_leaves_no_waiter() {
        let state = PipelineState::start(PipelineOptions::default(), 4);

        let result = state.run(request()).await.unwrap();
        assert_eq!(result.teams, ["Lakers", "Celtics"]);
        assert_eq!(state.pending.len(), 0);

        state.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn abandoned_run_leaves_no_waiter() {
        let state = PipelineState::start(PipelineOptions::default(), 1);

        // The caller gives up after the first poll, as when an HTTP client
        // disconnects mid-request.
        tokio::select! {
            biased;
            _ = state.run(request()) => panic!("run finished on its first poll"),
            _ = std::future::ready(()) => {}
        }
        assert_eq!(state.pending.len(), 0);

        state.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn run_after_shutdown_leaves_no_waiter() {
        let state = PipelineState::start(PipelineOptions::default(), 4);
        state.shutdown().await.unwrap();

        let err = state.run(request()).await.unwrap_err();
        assert!(matches!(err, WorkerError::Stopped));
        assert_eq!(state.pending.len(), 0);
    }
}
