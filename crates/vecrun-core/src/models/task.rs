use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;

/// One external workload: an example script or the test-suite entry point.
/// Immutable once constructed; the driver runs tasks in the order it holds
/// them.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Task {
    pub name: String,
    pub program: PathBuf,
    pub args: Vec<String>,
    pub working_dir: Option<PathBuf>,
    /// Path that must exist for the task to make sense (a script file, a
    /// tests directory). Absence is a NotFound outcome, not an error.
    pub required_path: Option<PathBuf>,
    pub timeout: Duration,
}

impl Task {
    pub fn new(name: impl Into<String>, program: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            name: name.into(),
            program: program.into(),
            args: Vec::new(),
            working_dir: None,
            required_path: None,
            timeout,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn working_dir(mut self, working_dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(working_dir.into());
        self
    }

    pub fn required_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.required_path = Some(path.into());
        self
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize)]
pub enum TaskStatus {
    Completed,
    TimedOut,
    Failed,
    NotFound,
}

/// Terminal outcome of one task. Created exactly once per task by the
/// runner; all failure modes are encoded here rather than raised.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ExecutionResult {
    pub task_name: String,
    pub status: TaskStatus,
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    pub duration: Duration,
}

impl ExecutionResult {
    pub fn succeeded(&self) -> bool {
        self.status == TaskStatus::Completed && self.exit_code == Some(0)
    }
}
