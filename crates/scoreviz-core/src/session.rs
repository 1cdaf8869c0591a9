use tracing::{debug, warn};

use crate::error::Result;
use crate::filters::FilterState;
use crate::pipeline::{PipelineRequest, PipelineResult, RawInput};
use crate::worker::{PipelineResponse, PipelineWorker, RequestId};

/// Host-side view of the current data: the uploaded input, the active
/// filters, and the newest result. Responses to anything but the most
/// recently posted request are discarded.
#[derive(Debug, Default)]
pub struct MatchDataSession {
    raw: RawInput,
    filters: FilterState,
    latest: Option<RequestId>,
    data: Option<PipelineResult>,
    initialised: bool,
    loading: bool,
}

impl MatchDataSession {
    pub fn new(filters: FilterState) -> Self {
        Self {
            filters,
            ..Self::default()
        }
    }

    /// Stores new input and requests a run with the current filters.
    pub async fn initialise(
        &mut self,
        worker: &PipelineWorker,
        raw: impl Into<RawInput>,
    ) -> Result<RequestId> {
        self.raw = raw.into();
        self.submit(worker).await
    }

    /// Replaces the filters and re-runs if input has been supplied.
    pub async fn set_filters(
        &mut self,
        worker: &PipelineWorker,
        filters: FilterState,
    ) -> Result<Option<RequestId>> {
        self.filters = filters;
        if self.raw.is_empty() {
            debug!("filters changed before any data was loaded");
            return Ok(None);
        }
        self.submit(worker).await.map(Some)
    }

    async fn submit(&mut self, worker: &PipelineWorker) -> Result<RequestId> {
        let request = PipelineRequest::new(self.raw.clone(), self.filters.clone());
        let id = worker.post(request).await?;
        self.latest = Some(id);
        self.loading = true;
        Ok(id)
    }

    /// Applies a worker response. Returns `false` when it was stale.
    pub fn accept(&mut self, response: PipelineResponse) -> bool {
        if self.latest != Some(response.id) {
            warn!(
                id = response.id,
                latest = ?self.latest,
                "discarding stale pipeline response"
            );
            return false;
        }

        self.loading = false;
        match response.result {
            Ok(result) => {
                self.data = Some(result);
                self.initialised = true;
            }
            Err(err) => warn!(id = response.id, error = %err, "pipeline run failed"),
        }
        true
    }

    pub fn data(&self) -> Option<&PipelineResult> {
        self.data.as_ref()
    }

    pub fn raw(&self) -> &RawInput {
        &self.raw
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_initialised(&self) -> bool {
        self.initialised
    }
}
