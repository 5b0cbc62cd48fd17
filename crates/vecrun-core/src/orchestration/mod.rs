pub mod aggregator;
pub mod cleanup;
pub mod decisions;
pub mod driver;

pub use aggregator::ResultAggregator;
pub use cleanup::CleanupCoordinator;
pub use decisions::{DecisionSource, FixedDecision};
pub use driver::{DriverConfig, OrchestrationDriver, RunOutcome};
