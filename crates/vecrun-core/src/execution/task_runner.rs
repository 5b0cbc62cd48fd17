use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::detect::find_executable;
use crate::execution::{
    CommandSpec, ProcessExecutor, ProcessExitStatus, ProcessSpawnRequest, spawn_validated,
};
use crate::models::{CoreErrorKind, ExecutionResult, Task, TaskStatus};

/// Runs one task under its wall-clock ceiling. Every failure mode comes
/// back inside the `ExecutionResult`; `run` itself never errors.
pub struct TaskRunner {
    executor: Arc<dyn ProcessExecutor>,
}

impl TaskRunner {
    pub fn new(executor: Arc<dyn ProcessExecutor>) -> Self {
        Self { executor }
    }

    pub async fn run(&self, task: &Task) -> ExecutionResult {
        let started = Instant::now();

        if let Some(required) = &task.required_path {
            if !required.exists() {
                return not_found(task, format!("{} not found", required.display()));
            }
        }

        let Some(program) = find_executable(&task.program) else {
            return not_found(task, format!("{} not found", task.program.display()));
        };

        let mut command = CommandSpec::new(program).args(task.args.iter().cloned());
        if let Some(dir) = &task.working_dir {
            command = command.working_dir(dir);
        }
        let request = ProcessSpawnRequest::new(command).timeout(task.timeout);

        let process = match spawn_validated(self.executor.as_ref(), request) {
            Ok(process) => process,
            Err(error) => {
                return ExecutionResult {
                    task_name: task.name.clone(),
                    status: TaskStatus::Failed,
                    exit_code: None,
                    stdout: String::new(),
                    stderr: error.message,
                    duration: started.elapsed(),
                };
            }
        };

        match process.wait().await {
            Ok(output) => {
                let (status, exit_code) = match output.status {
                    ProcessExitStatus::ExitCode(0) => (TaskStatus::Completed, Some(0)),
                    ProcessExitStatus::ExitCode(code) => (TaskStatus::Failed, Some(code)),
                    ProcessExitStatus::Terminated => (TaskStatus::Failed, None),
                };
                ExecutionResult {
                    task_name: task.name.clone(),
                    status,
                    exit_code,
                    stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                    stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                    duration: started.elapsed(),
                }
            }
            Err(error) if error.kind == CoreErrorKind::Timeout => ExecutionResult {
                task_name: task.name.clone(),
                status: TaskStatus::TimedOut,
                exit_code: None,
                stdout: String::new(),
                stderr: error.message,
                duration: started.elapsed(),
            },
            Err(error) => ExecutionResult {
                task_name: task.name.clone(),
                status: TaskStatus::Failed,
                exit_code: None,
                stdout: String::new(),
                stderr: error.message,
                duration: started.elapsed(),
            },
        }
    }
}

fn not_found(task: &Task, message: String) -> ExecutionResult {
    ExecutionResult {
        task_name: task.name.clone(),
        status: TaskStatus::NotFound,
        exit_code: None,
        stdout: String::new(),
        stderr: message,
        duration: Duration::ZERO,
    }
}
