use std::path::PathBuf;

/// Where the backing service answers health checks. Read-only configuration;
/// only the probe dereferences it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ServiceEndpoint {
    pub host: String,
    pub port: u16,
    pub health_path: String,
}

impl ServiceEndpoint {
    pub fn new(host: impl Into<String>, port: u16, health_path: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port,
            health_path: health_path.into(),
        }
    }

    pub fn health_url(&self) -> String {
        let path = self.health_path.trim_start_matches('/');
        format!("http://{}:{}/{path}", self.host, self.port)
    }
}

/// Live-instance reference returned by a successful service start. Required
/// to stop the instance later; at most one live handle exists per managed
/// name at any time.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ServiceHandle {
    pub container_name: String,
    pub rest_port: u16,
    pub grpc_port: u16,
    pub storage_path: PathBuf,
}
