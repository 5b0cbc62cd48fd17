pub mod docker;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::detect::find_executable;
use crate::execution::{ProcessExecutor, run_to_completion};
use crate::models::{Component, CoreError, CoreErrorKind, ServiceHandle};

/// Identity of the managed backing-service instance: container name, image
/// and the host-side bindings.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ServiceConfig {
    pub name: String,
    pub image: String,
    pub rest_port: u16,
    pub grpc_port: u16,
    pub storage_path: PathBuf,
}

impl ServiceConfig {
    pub fn quickstart(storage_root: &Path) -> Self {
        Self {
            name: docker::DEFAULT_CONTAINER_NAME.to_string(),
            image: docker::DEFAULT_IMAGE.to_string(),
            rest_port: 6333,
            grpc_port: 6334,
            storage_path: storage_root.join(docker::DEFAULT_STORAGE_DIR),
        }
    }
}

/// Starts and stops the backing service through the container engine.
/// Start is stop-then-start, so a stale same-named instance never survives
/// into a new run.
pub struct ServiceLifecycleManager {
    executor: Arc<dyn ProcessExecutor>,
    engine: Option<PathBuf>,
}

impl ServiceLifecycleManager {
    pub fn new(executor: Arc<dyn ProcessExecutor>) -> Self {
        Self {
            executor,
            engine: None,
        }
    }

    /// Use a fixed engine binary instead of discovering `docker` on PATH
    /// (podman works the same way for the subcommands used here).
    pub fn with_engine(mut self, engine: impl Into<PathBuf>) -> Self {
        self.engine = Some(engine.into());
        self
    }

    pub async fn start(&self, config: &ServiceConfig) -> Result<ServiceHandle, CoreError> {
        let engine = self.engine()?;

        // Best-effort stop of any prior instance with the same name.
        if let Err(error) = self.stop_named(&engine, &config.name).await {
            tracing::debug!(name = %config.name, %error, "pre-start stop skipped");
        }

        tracing::info!(name = %config.name, image = %config.image, "starting backing service");
        run_to_completion(self.executor.as_ref(), docker::run_request(&engine, config))
            .await
            .map_err(|error| {
                CoreError::new(
                    Component::Lifecycle,
                    CoreErrorKind::StartFailed,
                    format!("failed to start {}: {}", config.name, error.message),
                )
            })?;

        Ok(ServiceHandle {
            container_name: config.name.clone(),
            rest_port: config.rest_port,
            grpc_port: config.grpc_port,
            storage_path: config.storage_path.clone(),
        })
    }

    /// Idempotent: stopping an instance that is already gone succeeds
    /// silently.
    pub async fn stop(&self, handle: &ServiceHandle) -> Result<(), CoreError> {
        let Ok(engine) = self.engine() else {
            // No engine means nothing we started can still be running.
            return Ok(());
        };

        self.stop_named(&engine, &handle.container_name).await
    }

    fn engine(&self) -> Result<PathBuf, CoreError> {
        if let Some(engine) = &self.engine {
            return Ok(engine.clone());
        }

        find_executable(Path::new(docker::ENGINE_BINARY)).ok_or_else(|| {
            CoreError::new(
                Component::Lifecycle,
                CoreErrorKind::EngineNotFound,
                format!("{} not found on PATH", docker::ENGINE_BINARY),
            )
        })
    }

    async fn stop_named(&self, engine: &Path, name: &str) -> Result<(), CoreError> {
        for request in [
            docker::stop_request(engine, name),
            docker::rm_request(engine, name),
        ] {
            if let Err(error) = run_to_completion(self.executor.as_ref(), request).await {
                if docker::is_missing_container(&error.message) {
                    continue;
                }
                return Err(CoreError::new(
                    Component::Lifecycle,
                    CoreErrorKind::StopFailed,
                    format!("failed to stop {name}: {}", error.message),
                ));
            }
        }

        Ok(())
    }
}
