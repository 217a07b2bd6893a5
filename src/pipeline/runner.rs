/*!
 * Task-per-request pipeline execution.
 *
 * Each submitted request runs as its own tokio task, decoupled from the
 * caller's event loop; completed runs are delivered over a channel.
 * Concurrent runs are independent and unordered relative to each other.
 * If the receiving side goes away, late results are discarded.
 */

use std::sync::Arc;

use log::warn;
use tokio::sync::mpsc;
use uuid::Uuid;

use super::orchestrator::{PipelineError, PipelineOrchestrator, PipelineOutcome, PipelineRequest};

/// A completed run, delivered back to the requesting side
#[derive(Debug)]
pub struct PipelineEvent {
    /// Id returned from the submit call that started the run
    pub run_id: Uuid,
    /// The run's outcome or stage-tagged failure
    pub result: Result<PipelineOutcome, PipelineError>,
}

/// Submits pipeline runs and delivers their results over a channel
pub struct PipelineRunner {
    orchestrator: Arc<PipelineOrchestrator>,
    events: mpsc::Sender<PipelineEvent>,
}

impl PipelineRunner {
    /// Create a runner and the receiving end for its events
    pub fn new(
        orchestrator: Arc<PipelineOrchestrator>,
        capacity: usize,
    ) -> (Self, mpsc::Receiver<PipelineEvent>) {
        let (events, receiver) = mpsc::channel(capacity);
        (
            Self {
                orchestrator,
                events,
            },
            receiver,
        )
    }

    /// Submit a run; returns its id immediately.
    ///
    /// The run executes to completion or failure on its own task; there is
    /// no cancellation API. The matching event arrives on the receiver
    /// unless the receiver was dropped in the meantime.
    pub fn submit(&self, request: PipelineRequest) -> Uuid {
        let run_id = Uuid::new_v4();
        let orchestrator = self.orchestrator.clone();
        let events = self.events.clone();

        tokio::spawn(async move {
            let result = orchestrator.execute(run_id, request, None).await;
            if events.send(PipelineEvent { run_id, result }).await.is_err() {
                warn!(
                    "Pipeline run {} finished after its receiver was dropped; result discarded",
                    run_id
                );
            }
        });

        run_id
    }
}
