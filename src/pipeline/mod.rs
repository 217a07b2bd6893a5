/*!
 * Capture-and-translate pipeline.
 *
 * One pipeline run takes a capture source through preprocessing,
 * recognition, and translation, strictly in that order. Runs are
 * independent of each other and own no state across requests.
 *
 * - `orchestrator`: sequential stage execution with stage-tagged failures
 * - `runner`: task-per-request submission with channel delivery
 */

pub use self::orchestrator::{
    PipelineError, PipelineOrchestrator, PipelineOutcome, PipelineRequest, PipelineStage,
};
pub use self::runner::{PipelineEvent, PipelineRunner};

pub mod orchestrator;
pub mod runner;
