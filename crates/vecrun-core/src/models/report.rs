use std::fmt::{Display, Formatter};

use serde::Serialize;

use crate::models::{ExecutionResult, TaskStatus};

/// Order-preserving record of every task outcome for one driver invocation.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct RunReport {
    pub results: Vec<ExecutionResult>,
    pub overall_success: bool,
}

impl RunReport {
    pub fn empty() -> Self {
        Self {
            results: Vec::new(),
            overall_success: false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

impl Display for RunReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for result in &self.results {
            let detail = match (result.status, result.exit_code) {
                (TaskStatus::Completed, Some(0)) => "ok".to_string(),
                (_, Some(code)) => format!("exit {code}"),
                (TaskStatus::TimedOut, None) => {
                    format!("timed out after {}s", result.duration.as_secs())
                }
                (TaskStatus::NotFound, None) => "not found".to_string(),
                (_, None) => "no exit code".to_string(),
            };
            let status = format!("{:?}", result.status);
            writeln!(f, "{:<24} {status:<9}  ({detail})", result.task_name)?;
        }
        write!(
            f,
            "overall: {}",
            if self.overall_success { "PASS" } else { "FAIL" }
        )
    }
}
