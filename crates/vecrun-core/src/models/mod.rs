pub mod endpoint;
pub mod error;
pub mod report;
pub mod task;

pub use endpoint::{ServiceEndpoint, ServiceHandle};
pub use error::{Component, CoreError, CoreErrorKind};
pub use report::RunReport;
pub use task::{ExecutionResult, Task, TaskStatus};
