//! Trial sequencing and session aggregation for the free-viewing experiment.
//!
//! The sequencer walks an immutable trial plan, opening and closing the
//! telemetry window per trial and emitting typed transition events for the
//! rendering/input collaborator. The aggregator collects sealed trial
//! records, in plan order, into one frozen session result.

pub mod collaborators;
pub mod config;
pub mod error;
pub mod plan;
pub mod session;
pub mod state;

pub use collaborators::{dispatch_events, PersistenceGateway, PlanProvider, Renderer, Sensor};
pub use config::{ExperimentConfig, TimingSettings};
pub use error::{PersistError, SequenceError, SessionError};
pub use plan::ConfigPlanProvider;
pub use session::{summarize, SessionAggregator, SessionSummary, TrialQuadrants};
pub use state::{SequencerEvent, TrialSequencer};
