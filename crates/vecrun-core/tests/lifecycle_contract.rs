use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::SystemTime;

use vecrun_core::execution::{
    ExecResult, ProcessExecutor, ProcessExitStatus, ProcessOutput, ProcessSpawnRequest,
    ProcessWaitFuture, RunningProcess,
};
use vecrun_core::lifecycle::{ServiceConfig, ServiceLifecycleManager};
use vecrun_core::models::CoreErrorKind;
use vecrun_core::orchestration::{CleanupCoordinator, FixedDecision};

struct CannedProcess(ExecResult<ProcessOutput>);

impl RunningProcess for CannedProcess {
    fn pid(&self) -> Option<u32> {
        Some(4242)
    }

    fn wait(self: Box<Self>) -> ProcessWaitFuture {
        let CannedProcess(result) = *self;
        Box::pin(async move { result })
    }
}

#[derive(Default)]
struct ScriptedExecutor {
    requests: Mutex<Vec<ProcessSpawnRequest>>,
    outputs: Mutex<VecDeque<ExecResult<ProcessOutput>>>,
}

impl ScriptedExecutor {
    fn with_outputs(outputs: impl IntoIterator<Item = ExecResult<ProcessOutput>>) -> Arc<Self> {
        Arc::new(Self {
            requests: Mutex::new(Vec::new()),
            outputs: Mutex::new(outputs.into_iter().collect()),
        })
    }

    fn push_outputs(&self, outputs: impl IntoIterator<Item = ExecResult<ProcessOutput>>) {
        self.outputs.lock().unwrap().extend(outputs);
    }

    fn calls(&self) -> Vec<Vec<String>> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|request| {
                let mut rendered = vec![request.command.program.to_string_lossy().into_owned()];
                rendered.extend(request.command.args.iter().cloned());
                rendered
            })
            .collect()
    }
}

impl ProcessExecutor for ScriptedExecutor {
    fn spawn(&self, request: ProcessSpawnRequest) -> ExecResult<Box<dyn RunningProcess>> {
        self.requests.lock().unwrap().push(request);
        let next = self
            .outputs
            .lock()
            .unwrap()
            .pop_front()
            .expect("unexpected spawn");
        Ok(Box::new(CannedProcess(next)))
    }
}

fn exit(code: i32, stdout: &str, stderr: &str) -> ExecResult<ProcessOutput> {
    Ok(ProcessOutput {
        status: ProcessExitStatus::ExitCode(code),
        stdout: stdout.as_bytes().to_vec(),
        stderr: stderr.as_bytes().to_vec(),
        started_at: SystemTime::now(),
        finished_at: SystemTime::now(),
    })
}

fn missing_container() -> ExecResult<ProcessOutput> {
    exit(
        1,
        "",
        "Error response from daemon: No such container: qdrant-quickstart",
    )
}

fn config() -> ServiceConfig {
    ServiceConfig {
        name: "qdrant-quickstart".to_string(),
        image: "qdrant/qdrant".to_string(),
        rest_port: 6333,
        grpc_port: 6334,
        storage_path: PathBuf::from("/tmp/qdrant_storage"),
    }
}

fn manager(executor: Arc<ScriptedExecutor>) -> ServiceLifecycleManager {
    ServiceLifecycleManager::new(executor).with_engine("docker")
}

#[tokio::test]
async fn start_is_stop_then_start() {
    let executor = ScriptedExecutor::with_outputs([
        missing_container(),
        missing_container(),
        exit(0, "3f1c2a\n", ""),
    ]);

    let handle = manager(executor.clone())
        .start(&config())
        .await
        .expect("start should succeed");

    assert_eq!(handle.container_name, "qdrant-quickstart");
    assert_eq!(handle.rest_port, 6333);

    let calls = executor.calls();
    assert_eq!(calls.len(), 3);
    assert_eq!(calls[0][1], "stop");
    assert_eq!(calls[1][1], "rm");
    assert_eq!(&calls[2][1..3], ["run", "-d"]);
}

#[tokio::test]
async fn second_start_replaces_the_prior_instance() {
    let executor = ScriptedExecutor::with_outputs([
        missing_container(),
        missing_container(),
        exit(0, "aaa\n", ""),
    ]);
    let lifecycle = manager(executor.clone());

    lifecycle.start(&config()).await.expect("first start");

    // The second start finds the first instance and removes it for real.
    executor.push_outputs([exit(0, "", ""), exit(0, "", ""), exit(0, "bbb\n", "")]);
    lifecycle.start(&config()).await.expect("second start");

    let calls = executor.calls();
    assert_eq!(calls.len(), 6);
    assert_eq!(calls[3][1], "stop");
    assert_eq!(calls[4][1], "rm");
    assert_eq!(&calls[5][1..3], ["run", "-d"]);
}

#[tokio::test]
async fn stop_of_an_already_stopped_instance_succeeds() {
    let executor = ScriptedExecutor::with_outputs([
        missing_container(),
        missing_container(),
        exit(0, "ccc\n", ""),
    ]);
    let lifecycle = manager(executor.clone());
    let handle = lifecycle.start(&config()).await.expect("start");

    executor.push_outputs([missing_container(), missing_container()]);
    lifecycle
        .stop(&handle)
        .await
        .expect("stopping a stopped instance should succeed silently");
}

#[tokio::test]
async fn stop_failure_is_reported_as_stop_failed() {
    let executor = ScriptedExecutor::with_outputs([
        missing_container(),
        missing_container(),
        exit(0, "ddd\n", ""),
    ]);
    let lifecycle = manager(executor.clone());
    let handle = lifecycle.start(&config()).await.expect("start");

    executor.push_outputs([exit(1, "", "permission denied")]);
    let error = lifecycle.stop(&handle).await.expect_err("should fail");

    assert_eq!(error.kind, CoreErrorKind::StopFailed);
    assert!(error.message.contains("permission denied"));
}

#[tokio::test]
async fn launch_failure_is_reported_as_start_failed() {
    let executor = ScriptedExecutor::with_outputs([
        missing_container(),
        missing_container(),
        exit(125, "", "driver failed programming external connectivity: port is already allocated"),
    ]);

    let error = manager(executor)
        .start(&config())
        .await
        .expect_err("start should fail");

    assert_eq!(error.kind, CoreErrorKind::StartFailed);
    assert!(error.message.contains("port is already allocated"));
}

#[tokio::test]
async fn cleanup_runs_at_most_once_and_swallows_stop_failures() {
    let executor = ScriptedExecutor::with_outputs([
        missing_container(),
        missing_container(),
        exit(0, "eee\n", ""),
    ]);
    let lifecycle = manager(executor.clone());
    let handle = lifecycle.start(&config()).await.expect("start");

    // First cleanup hits a failing engine; it must not propagate.
    executor.push_outputs([exit(1, "", "cannot connect to the docker daemon")]);
    let mut cleanup = CleanupCoordinator::new();
    cleanup
        .cleanup(&lifecycle, &handle, &FixedDecision(true))
        .await;

    // Second invocation spawns nothing further.
    let calls_after_first = executor.calls().len();
    cleanup
        .cleanup(&lifecycle, &handle, &FixedDecision(true))
        .await;
    assert_eq!(executor.calls().len(), calls_after_first);
}

#[tokio::test]
async fn cleanup_respects_a_declined_teardown() {
    let executor = ScriptedExecutor::with_outputs([
        missing_container(),
        missing_container(),
        exit(0, "fff\n", ""),
    ]);
    let lifecycle = manager(executor.clone());
    let handle = lifecycle.start(&config()).await.expect("start");

    let mut cleanup = CleanupCoordinator::new();
    cleanup
        .cleanup(&lifecycle, &handle, &FixedDecision(false))
        .await;

    // Only the three start-phase spawns happened.
    assert_eq!(executor.calls().len(), 3);
}
