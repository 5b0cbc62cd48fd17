use std::time::{Duration, SystemTime};

use tokio::io::AsyncReadExt;

use crate::execution::{
    ExecResult, ProcessExecutor, ProcessExitStatus, ProcessOutput, ProcessSpawnRequest,
    ProcessWaitFuture, RunningProcess,
};
use crate::models::{Component, CoreError, CoreErrorKind};

pub struct TokioProcessExecutor;

impl ProcessExecutor for TokioProcessExecutor {
    fn spawn(&self, request: ProcessSpawnRequest) -> ExecResult<Box<dyn RunningProcess>> {
        let mut cmd = tokio::process::Command::new(&request.command.program);
        cmd.args(&request.command.args);

        for (key, value) in &request.command.env {
            cmd.env(key, value);
        }

        if let Some(dir) = &request.command.working_dir {
            cmd.current_dir(dir);
        }

        cmd.stdin(std::process::Stdio::null());
        cmd.stdout(std::process::Stdio::piped());
        cmd.stderr(std::process::Stdio::piped());
        #[cfg(unix)]
        cmd.process_group(0);

        let child = cmd.spawn().map_err(|error| {
            process_failure(format!(
                "failed to spawn {}: {error}",
                request.command.program.display()
            ))
        })?;

        let pid = child.id();

        Ok(Box::new(TokioRunningProcess {
            child: Some(child),
            pid,
            started_at: SystemTime::now(),
            timeout: request.timeout,
        }))
    }
}

struct TokioRunningProcess {
    child: Option<tokio::process::Child>,
    pid: Option<u32>,
    started_at: SystemTime,
    timeout: Option<Duration>,
}

/// Kill the whole process group so descendants holding the pipes die with
/// the child.
fn kill_group(pid: Option<u32>, child: &mut tokio::process::Child) {
    #[cfg(unix)]
    if let Some(pid) = pid {
        let pgid = -(pid as libc::pid_t);
        unsafe {
            libc::kill(pgid, libc::SIGKILL);
        }
        return;
    }

    let _ = pid;
    let _ = child.start_kill();
}

impl RunningProcess for TokioRunningProcess {
    fn pid(&self) -> Option<u32> {
        self.pid
    }

    fn wait(mut self: Box<Self>) -> ProcessWaitFuture {
        let child = self.child.take();
        let timeout = self.timeout;
        let started_at = self.started_at;
        let pid = self.pid;

        Box::pin(async move {
            let mut child =
                child.ok_or_else(|| process_failure("child process already consumed".into()))?;

            let stdout_reader = {
                let mut stdout = child.stdout.take();
                tokio::spawn(async move {
                    let mut buffer = Vec::new();
                    if let Some(mut handle) = stdout.take() {
                        let _ = handle.read_to_end(&mut buffer).await;
                    }
                    buffer
                })
            };
            let stderr_reader = {
                let mut stderr = child.stderr.take();
                tokio::spawn(async move {
                    let mut buffer = Vec::new();
                    if let Some(mut handle) = stderr.take() {
                        let _ = handle.read_to_end(&mut buffer).await;
                    }
                    buffer
                })
            };

            let wait_err =
                |error: std::io::Error| process_failure(format!("failed to wait: {error}"));

            // Wait for exit first, then collect output with a short bounded
            // read window, so an inherited descriptor cannot hang the wait.
            let status = if let Some(timeout_duration) = timeout {
                match tokio::time::timeout(timeout_duration, child.wait()).await {
                    Ok(result) => result.map_err(wait_err)?,
                    Err(_) => {
                        kill_group(pid, &mut child);
                        let _ = tokio::time::timeout(Duration::from_secs(1), child.wait()).await;
                        stdout_reader.abort();
                        stderr_reader.abort();
                        return Err(CoreError::new(
                            Component::Executor,
                            CoreErrorKind::Timeout,
                            format!("process timed out after {}ms", timeout_duration.as_millis()),
                        ));
                    }
                }
            } else {
                child.wait().await.map_err(wait_err)?
            };

            let read_deadline = Duration::from_millis(250);
            let stdout = match tokio::time::timeout(read_deadline, stdout_reader).await {
                Ok(Ok(buffer)) => buffer,
                _ => Vec::new(),
            };
            let stderr = match tokio::time::timeout(read_deadline, stderr_reader).await {
                Ok(Ok(buffer)) => buffer,
                _ => Vec::new(),
            };

            let status = match status.code() {
                Some(code) => ProcessExitStatus::ExitCode(code),
                None => ProcessExitStatus::Terminated,
            };

            Ok(ProcessOutput {
                status,
                stdout,
                stderr,
                started_at,
                finished_at: SystemTime::now(),
            })
        })
    }
}

fn process_failure(message: String) -> CoreError {
    CoreError {
        component: Some(Component::Executor),
        kind: CoreErrorKind::ProcessFailure,
        message,
    }
}
