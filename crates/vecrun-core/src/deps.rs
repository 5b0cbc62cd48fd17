use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::execution::{CommandSpec, ProcessExecutor, ProcessSpawnRequest, run_to_completion};
use crate::models::{Component, CoreError, CoreErrorKind};

pub const DEFAULT_MANIFEST: &str = "requirements.txt";
pub const DEFAULT_INTERPRETER: &str = "python3";

/// Environment variable whose presence marks the runtime as already
/// dependency-managed, skipping the install step.
pub const MANAGED_ENV_MARKER: &str = "VIRTUAL_ENV";

const INSTALL_TIMEOUT: Duration = Duration::from_secs(300);

/// Pure predicate: does the environment manage dependencies on its own?
/// Evaluated once at driver start and passed down as configuration; never
/// re-queried mid-run.
pub fn auto_managed(interpreter: &Path, marker_value: Option<&str>) -> bool {
    if marker_value.is_some_and(|value| !value.is_empty()) {
        return true;
    }

    interpreter.components().any(|component| {
        let name = component.as_os_str().to_string_lossy();
        name == ".venv" || name == "virtualenvs"
    })
}

/// Ensures the task runtime is present by running one bounded install
/// command against the manifest.
pub struct DependencyInstaller {
    executor: Arc<dyn ProcessExecutor>,
    interpreter: PathBuf,
}

impl DependencyInstaller {
    pub fn new(executor: Arc<dyn ProcessExecutor>, interpreter: impl Into<PathBuf>) -> Self {
        Self {
            executor,
            interpreter: interpreter.into(),
        }
    }

    pub async fn ensure(&self, manifest: &Path) -> Result<(), CoreError> {
        tracing::info!(manifest = %manifest.display(), "installing dependencies");

        let command = CommandSpec::new(&self.interpreter)
            .args(["-m", "pip", "install", "-r"])
            .arg(manifest.to_string_lossy());
        let request = ProcessSpawnRequest::new(command).timeout(INSTALL_TIMEOUT);

        run_to_completion(self.executor.as_ref(), request)
            .await
            .map_err(|error| {
                CoreError::new(
                    Component::Installer,
                    CoreErrorKind::DependencyInstallFailed,
                    format!(
                        "dependency install from {} failed: {}",
                        manifest.display(),
                        error.message
                    ),
                )
            })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_marker_wins_over_path() {
        assert!(auto_managed(Path::new("/usr/bin/python3"), Some("/work/.venv")));
        assert!(!auto_managed(Path::new("/usr/bin/python3"), Some("")));
        assert!(!auto_managed(Path::new("/usr/bin/python3"), None));
    }

    #[test]
    fn venv_interpreter_path_is_auto_managed() {
        assert!(auto_managed(Path::new("/work/.venv/bin/python3"), None));
        assert!(auto_managed(
            Path::new("/home/u/.cache/virtualenvs/app/bin/python"),
            None
        ));
    }
}
