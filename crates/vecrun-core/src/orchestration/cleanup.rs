use crate::lifecycle::ServiceLifecycleManager;
use crate::models::ServiceHandle;
use crate::orchestration::DecisionSource;

/// Best-effort teardown. Runs at most once per driver invocation and never
/// propagates an error past this boundary; a failed stop is logged and
/// swallowed.
pub struct CleanupCoordinator {
    done: bool,
}

impl CleanupCoordinator {
    pub fn new() -> Self {
        Self { done: false }
    }

    pub async fn cleanup(
        &mut self,
        lifecycle: &ServiceLifecycleManager,
        handle: &ServiceHandle,
        decision: &dyn DecisionSource,
    ) {
        if self.done {
            return;
        }
        self.done = true;

        if !decision.decide() {
            tracing::info!(
                container = %handle.container_name,
                "teardown declined, leaving service running"
            );
            return;
        }

        match lifecycle.stop(handle).await {
            Ok(()) => {
                tracing::info!(container = %handle.container_name, "service stopped and removed");
            }
            Err(error) => {
                tracing::warn!(container = %handle.container_name, %error, "teardown failed");
            }
        }
    }
}

impl Default for CleanupCoordinator {
    fn default() -> Self {
        Self::new()
    }
}
