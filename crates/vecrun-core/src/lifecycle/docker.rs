use std::path::Path;
use std::time::Duration;

use crate::execution::{CommandSpec, ProcessSpawnRequest};
use crate::lifecycle::ServiceConfig;

pub const ENGINE_BINARY: &str = "docker";
pub const DEFAULT_IMAGE: &str = "qdrant/qdrant";
pub const DEFAULT_CONTAINER_NAME: &str = "qdrant-quickstart";
pub const DEFAULT_STORAGE_DIR: &str = "qdrant_storage";
pub const CONTAINER_STORAGE_MOUNT: &str = "/qdrant/storage";

const START_TIMEOUT: Duration = Duration::from_secs(120);
const STOP_TIMEOUT: Duration = Duration::from_secs(60);

pub(crate) fn run_request(engine: &Path, config: &ServiceConfig) -> ProcessSpawnRequest {
    let command = CommandSpec::new(engine)
        .args(["run", "-d", "--name"])
        .arg(&config.name)
        .arg("-p")
        .arg(format!("{0}:{0}", config.rest_port))
        .arg("-p")
        .arg(format!("{0}:{0}", config.grpc_port))
        .arg("-v")
        .arg(volume_binding(&config.storage_path))
        .arg(&config.image);

    ProcessSpawnRequest::new(command).timeout(START_TIMEOUT)
}

pub(crate) fn stop_request(engine: &Path, name: &str) -> ProcessSpawnRequest {
    ProcessSpawnRequest::new(CommandSpec::new(engine).arg("stop").arg(name)).timeout(STOP_TIMEOUT)
}

pub(crate) fn rm_request(engine: &Path, name: &str) -> ProcessSpawnRequest {
    ProcessSpawnRequest::new(CommandSpec::new(engine).arg("rm").arg(name)).timeout(STOP_TIMEOUT)
}

fn volume_binding(storage_path: &Path) -> String {
    format!("{}:{CONTAINER_STORAGE_MOUNT}:z", storage_path.display())
}

/// The engine reports stopping or removing a container that no longer
/// exists as an error; for an idempotent stop that is success.
pub(crate) fn is_missing_container(message: &str) -> bool {
    let lowered = message.to_ascii_lowercase();
    lowered.contains("no such container") || lowered.contains("is not running")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn config() -> ServiceConfig {
        ServiceConfig {
            name: DEFAULT_CONTAINER_NAME.to_string(),
            image: DEFAULT_IMAGE.to_string(),
            rest_port: 6333,
            grpc_port: 6334,
            storage_path: PathBuf::from("/work/qdrant_storage"),
        }
    }

    #[test]
    fn run_request_binds_ports_and_storage() {
        let request = run_request(Path::new("/usr/bin/docker"), &config());
        let args = request.command.args;

        assert_eq!(args[0], "run");
        assert_eq!(args[1], "-d");
        assert!(args.windows(2).any(|w| w == ["--name", "qdrant-quickstart"]));
        assert!(args.windows(2).any(|w| w == ["-p", "6333:6333"]));
        assert!(args.windows(2).any(|w| w == ["-p", "6334:6334"]));
        assert!(
            args.windows(2)
                .any(|w| w == ["-v", "/work/qdrant_storage:/qdrant/storage:z"])
        );
        assert_eq!(args.last().map(String::as_str), Some("qdrant/qdrant"));
    }

    #[test]
    fn stop_and_rm_requests_name_the_container() {
        let stop = stop_request(Path::new("docker"), "qdrant-quickstart");
        assert_eq!(stop.command.args, vec!["stop", "qdrant-quickstart"]);

        let rm = rm_request(Path::new("docker"), "qdrant-quickstart");
        assert_eq!(rm.command.args, vec!["rm", "qdrant-quickstart"]);
    }

    #[test]
    fn missing_container_messages_are_recognized() {
        assert!(is_missing_container(
            "process exited with code 1: Error response from daemon: No such container: qdrant-quickstart"
        ));
        assert!(!is_missing_container("permission denied"));
    }
}
