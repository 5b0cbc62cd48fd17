use std::path::PathBuf;
use std::sync::Arc;

use crate::deps::DependencyInstaller;
use crate::execution::{ProcessExecutor, TaskRunner};
use crate::lifecycle::{ServiceConfig, ServiceLifecycleManager};
use crate::models::{
    Component, CoreError, CoreErrorKind, ExecutionResult, RunReport, ServiceEndpoint,
    ServiceHandle, Task,
};
use crate::orchestration::{CleanupCoordinator, DecisionSource, ResultAggregator};
use crate::probe::AvailabilityProbe;

/// Everything the driver needs for one invocation, resolved up front.
/// The auto-managed predicate is evaluated by the caller exactly once;
/// the driver never re-queries the environment mid-run.
#[derive(Clone, Debug)]
pub struct DriverConfig {
    pub endpoint: ServiceEndpoint,
    pub service: ServiceConfig,
    /// Fixed engine binary; `None` discovers `docker` on PATH.
    pub engine: Option<PathBuf>,
    pub interpreter: PathBuf,
    pub manifest: PathBuf,
    pub deps_auto_managed: bool,
    pub tasks: Vec<Task>,
    pub test_suite: Option<Task>,
}

/// What one invocation produced. A startup abort carries the error and an
/// empty report; a completed batch carries the report alone, however many
/// tasks failed inside it.
#[derive(Clone, Debug)]
pub struct RunOutcome {
    pub report: RunReport,
    pub abort: Option<CoreError>,
}

impl RunOutcome {
    pub fn succeeded(&self) -> bool {
        self.abort.is_none() && self.report.overall_success
    }

    fn aborted(error: CoreError) -> Self {
        Self {
            report: RunReport::empty(),
            abort: Some(error),
        }
    }
}

pub struct OrchestrationDriver {
    config: DriverConfig,
    executor: Arc<dyn ProcessExecutor>,
    probe: Box<dyn AvailabilityProbe>,
    start_decision: Box<dyn DecisionSource>,
    teardown_decision: Box<dyn DecisionSource>,
}

impl OrchestrationDriver {
    pub fn new(
        config: DriverConfig,
        executor: Arc<dyn ProcessExecutor>,
        probe: Box<dyn AvailabilityProbe>,
        start_decision: Box<dyn DecisionSource>,
        teardown_decision: Box<dyn DecisionSource>,
    ) -> Self {
        Self {
            config,
            executor,
            probe,
            start_decision,
            teardown_decision,
        }
    }

    pub async fn run(&self) -> RunOutcome {
        let mut lifecycle = ServiceLifecycleManager::new(self.executor.clone());
        if let Some(engine) = &self.config.engine {
            lifecycle = lifecycle.with_engine(engine);
        }
        let mut cleanup = CleanupCoordinator::new();
        let mut handle: Option<ServiceHandle> = None;

        if self.probe.is_reachable(&self.config.endpoint) {
            tracing::info!(url = %self.config.endpoint.health_url(), "backing service reachable");
        } else {
            tracing::warn!(
                url = %self.config.endpoint.health_url(),
                "backing service not reachable"
            );

            if !self.start_decision.decide() {
                return RunOutcome::aborted(CoreError::new(
                    Component::Driver,
                    CoreErrorKind::ServiceUnavailable,
                    "service unreachable and start declined",
                ));
            }

            match lifecycle.start(&self.config.service).await {
                Ok(started) => handle = Some(started),
                // EngineNotFound / StartFailed: fatal, nothing to clean up.
                Err(error) => return RunOutcome::aborted(error),
            }
        }

        if !self.config.deps_auto_managed {
            let installer =
                DependencyInstaller::new(self.executor.clone(), &self.config.interpreter);
            if let Err(error) = installer.ensure(&self.config.manifest).await {
                if let Some(handle) = &handle {
                    cleanup
                        .cleanup(&lifecycle, handle, self.teardown_decision.as_ref())
                        .await;
                }
                return RunOutcome::aborted(error);
            }
        }

        let runner = TaskRunner::new(self.executor.clone());
        let mut aggregator = ResultAggregator::new();

        // Best-effort batch: every task is attempted regardless of how the
        // previous one ended.
        for task in &self.config.tasks {
            aggregator.record(self.run_one(&runner, task).await);
        }

        if let Some(test_suite) = &self.config.test_suite {
            aggregator.record(self.run_one(&runner, test_suite).await);
        }

        if let Some(handle) = &handle {
            cleanup
                .cleanup(&lifecycle, handle, self.teardown_decision.as_ref())
                .await;
        }

        RunOutcome {
            report: aggregator.report(),
            abort: None,
        }
    }

    async fn run_one(&self, runner: &TaskRunner, task: &Task) -> ExecutionResult {
        tracing::info!(task = %task.name, "running task");
        let result = runner.run(task).await;
        tracing::info!(
            task = %result.task_name,
            status = ?result.status,
            exit_code = ?result.exit_code,
            duration_ms = result.duration.as_millis() as u64,
            "task finished"
        );
        result
    }
}
