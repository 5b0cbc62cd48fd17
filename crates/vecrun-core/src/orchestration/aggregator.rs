use crate::models::{ExecutionResult, RunReport};

/// Pure bookkeeping: results in, report out, insertion order preserved.
#[derive(Default)]
pub struct ResultAggregator {
    results: Vec<ExecutionResult>,
}

impl ResultAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, result: ExecutionResult) {
        self.results.push(result);
    }

    pub fn report(&self) -> RunReport {
        RunReport {
            overall_success: self.results.iter().all(ExecutionResult::succeeded),
            results: self.results.clone(),
        }
    }
}
