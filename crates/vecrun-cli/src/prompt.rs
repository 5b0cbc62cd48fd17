use std::io::{BufRead, Write};

use vecrun_core::orchestration::DecisionSource;

/// Blocking y/n prompt on the terminal. Anything other than an explicit
/// yes counts as no.
pub struct PromptDecision {
    question: String,
}

impl PromptDecision {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
        }
    }
}

impl DecisionSource for PromptDecision {
    fn decide(&self) -> bool {
        print!("{} (y/n): ", self.question);
        let _ = std::io::stdout().flush();

        let mut answer = String::new();
        if std::io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }

        matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
    }
}
