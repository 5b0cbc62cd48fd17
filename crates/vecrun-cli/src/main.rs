mod prompt;

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use vecrun_core::deps::{DEFAULT_INTERPRETER, DEFAULT_MANIFEST, MANAGED_ENV_MARKER, auto_managed};
use vecrun_core::execution::TokioProcessExecutor;
use vecrun_core::lifecycle::ServiceConfig;
use vecrun_core::models::{CoreErrorKind, ServiceEndpoint, Task};
use vecrun_core::orchestration::{
    DecisionSource, DriverConfig, FixedDecision, OrchestrationDriver, RunOutcome,
};
use vecrun_core::probe::HttpProbe;

use crate::prompt::PromptDecision;

const EXAMPLE_SCRIPTS: &[(&str, &str)] = &[
    ("basic-example", "examples/basic_example.py"),
    ("document-search", "examples/document_search.py"),
    ("advanced-features", "examples/advanced_features.py"),
];

/// Runs the vector-database quickstart: brings the service up if needed,
/// installs dependencies, runs the example scripts and the test suite, and
/// tears the service down again.
#[derive(Parser)]
#[command(name = "vecrun", version)]
struct Cli {
    /// Quickstart root holding examples/, tests/ and the manifest
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Service host for the health probe
    #[arg(long, default_value = "localhost")]
    host: String,

    /// REST port (health probe and container binding)
    #[arg(long, default_value_t = 6333)]
    port: u16,

    /// gRPC port (container binding only)
    #[arg(long, default_value_t = 6334)]
    grpc_port: u16,

    /// Health-check path on the service
    #[arg(long, default_value = "/collections")]
    health_path: String,

    /// Interpreter used for examples, tests and dependency install
    #[arg(long, default_value = DEFAULT_INTERPRETER)]
    interpreter: String,

    /// Container engine binary (docker or podman); discovered on PATH when
    /// not given
    #[arg(long)]
    engine: Option<PathBuf>,

    /// Start the service without asking when it is unreachable
    #[arg(long)]
    start: Option<bool>,

    /// Tear the service down without asking at the end of the run
    #[arg(long)]
    teardown: Option<bool>,

    /// Answer yes to both decisions (non-interactive runs)
    #[arg(short, long)]
    yes: bool,

    /// Health probe timeout in seconds
    #[arg(long, default_value_t = 5)]
    probe_timeout: u64,

    /// Per-example timeout in seconds
    #[arg(long, default_value_t = 60)]
    task_timeout: u64,

    /// Test-suite timeout in seconds
    #[arg(long, default_value_t = 120)]
    test_timeout: u64,

    /// Emit the run report as JSON instead of the plain summary
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn decision(&self, flag: Option<bool>, question: &str) -> Box<dyn DecisionSource> {
        if self.yes {
            return Box::new(FixedDecision(true));
        }
        match flag {
            Some(value) => Box::new(FixedDecision(value)),
            None => Box::new(PromptDecision::new(question)),
        }
    }
}

fn build_tasks(cli: &Cli) -> (Vec<Task>, Task) {
    let task_timeout = Duration::from_secs(cli.task_timeout);

    let tasks = EXAMPLE_SCRIPTS
        .iter()
        .map(|(name, script)| {
            let script_path = cli.root.join(script);
            Task::new(*name, &cli.interpreter, task_timeout)
                .arg(script_path.to_string_lossy())
                .required_path(script_path)
                .working_dir(&cli.root)
        })
        .collect();

    let test_suite = Task::new(
        "test-suite",
        &cli.interpreter,
        Duration::from_secs(cli.test_timeout),
    )
    .args(["-m", "pytest", "tests/", "-v"])
    .required_path(cli.root.join("tests"))
    .working_dir(&cli.root);

    (tasks, test_suite)
}

fn emit(outcome: &RunOutcome, json: bool, endpoint: &ServiceEndpoint) {
    if json {
        match serde_json::to_string_pretty(&outcome.report) {
            Ok(rendered) => println!("{rendered}"),
            Err(error) => eprintln!("failed to render report: {error}"),
        }
    } else if !outcome.report.is_empty() {
        println!("{}", outcome.report);
    }

    if let Some(abort) = &outcome.abort {
        eprintln!("aborted: {abort}");
        if abort.kind == CoreErrorKind::ServiceUnavailable {
            eprintln!(
                "start the service manually and retry: docker run -p {0}:{0} -p 6334:6334 qdrant/qdrant",
                endpoint.port
            );
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();

    let endpoint = ServiceEndpoint::new(cli.host.clone(), cli.port, cli.health_path.clone());
    let mut service = ServiceConfig::quickstart(&cli.root);
    service.rest_port = cli.port;
    service.grpc_port = cli.grpc_port;

    let (tasks, test_suite) = build_tasks(&cli);

    let marker = std::env::var(MANAGED_ENV_MARKER).ok();
    let deps_auto_managed = auto_managed(Path::new(&cli.interpreter), marker.as_deref());

    let config = DriverConfig {
        endpoint: endpoint.clone(),
        service,
        engine: cli.engine.clone(),
        interpreter: PathBuf::from(&cli.interpreter),
        manifest: cli.root.join(DEFAULT_MANIFEST),
        deps_auto_managed,
        tasks,
        test_suite: Some(test_suite),
    };

    let start_decision = cli.decision(cli.start, "Service is not running. Start it with Docker?");
    let teardown_decision = cli.decision(cli.teardown, "Stop the service container?");

    let driver = OrchestrationDriver::new(
        config,
        Arc::new(TokioProcessExecutor),
        Box::new(HttpProbe::new(Duration::from_secs(cli.probe_timeout))),
        start_decision,
        teardown_decision,
    );

    let outcome = driver.run().await;
    emit(&outcome, cli.json, &endpoint);

    if outcome.succeeded() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
