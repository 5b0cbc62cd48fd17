use thiserror::Error;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Component {
    Lifecycle,
    Installer,
    Executor,
    Driver,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum CoreErrorKind {
    ServiceUnavailable,
    EngineNotFound,
    StartFailed,
    StopFailed,
    DependencyInstallFailed,
    InvalidInput,
    Timeout,
    ProcessFailure,
    Internal,
}

#[derive(Clone, Debug, Eq, PartialEq, Error)]
#[error("{kind:?}: {message}")]
pub struct CoreError {
    pub component: Option<Component>,
    pub kind: CoreErrorKind,
    pub message: String,
}

impl CoreError {
    pub fn new(component: Component, kind: CoreErrorKind, message: impl Into<String>) -> Self {
        Self {
            component: Some(component),
            kind,
            message: message.into(),
        }
    }
}
