/// Boolean-producing injection point for the two run-level choices: start
/// the service when unreachable, and tear it down at the end. Interactive
/// prompts and configuration flags both fit behind this.
pub trait DecisionSource: Send + Sync {
    fn decide(&self) -> bool;
}

pub struct FixedDecision(pub bool);

impl DecisionSource for FixedDecision {
    fn decide(&self) -> bool {
        self.0
    }
}
