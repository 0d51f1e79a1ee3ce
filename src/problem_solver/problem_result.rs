use serde::{Deserialize, Serialize};

pub const COMPLEXITY_ANSWER: &str = "This requires algorithmic analysis, not symbolic math";
pub const COMPLEXITY_EXPLANATION: &str = "This is an algorithmic complexity question that requires understanding of data structures and algorithms, not symbolic mathematics. The answer should be determined through algorithm analysis.";
pub const UNSOLVED_ANSWER: &str = "Unable to solve symbolically";
pub const UNSOLVED_EXPLANATION: &str = "The problem could not be automatically solved by the symbolic engine. This might require human reasoning or AI assistance.";
pub const NO_PROBLEM_ANSWER: &str = "No problem provided";
pub const NO_PROBLEM_EXPLANATION: &str = "Please provide a math problem as an argument";

/// Outcome of one solving attempt, printed as a single JSON line.
/// Field order is the output key order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemResult {
    pub success: bool,
    pub answer: String,
    pub explanation: String,
}

impl ProblemResult {
    pub fn solved(answer: impl Into<String>, explanation: impl Into<String>) -> Self {
        ProblemResult {
            success: true,
            answer: answer.into(),
            explanation: explanation.into(),
        }
    }

    pub fn failed(answer: impl Into<String>, explanation: impl Into<String>) -> Self {
        ProblemResult {
            success: false,
            answer: answer.into(),
            explanation: explanation.into(),
        }
    }

    pub fn complexity() -> Self {
        ProblemResult::solved(COMPLEXITY_ANSWER, COMPLEXITY_EXPLANATION)
    }

    pub fn unsolved() -> Self {
        ProblemResult::failed(UNSOLVED_ANSWER, UNSOLVED_EXPLANATION)
    }

    pub fn no_problem() -> Self {
        ProblemResult::failed(NO_PROBLEM_ANSWER, NO_PROBLEM_EXPLANATION)
    }

    /// Record for an error that escaped every category.
    pub fn error(message: &str) -> Self {
        ProblemResult::failed(
            format!("Error: {}", message),
            format!(
                "The symbolic engine encountered an error while trying to solve the problem: {}",
                message
            ),
        )
    }

    /// Compact single-line JSON, keys in field order.
    pub fn to_json_line(&self) -> String {
        // serializing three plain fields cannot fail
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(
                "{{\"success\":{},\"answer\":{:?},\"explanation\":{:?}}}",
                self.success, self.answer, self.explanation
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_problem_json_is_exact() {
        assert_eq!(
            ProblemResult::no_problem().to_json_line(),
            r#"{"success":false,"answer":"No problem provided","explanation":"Please provide a math problem as an argument"}"#
        );
    }

    #[test]
    fn test_json_escapes_newlines_and_unicode() {
        let result = ProblemResult::solved("x**3/3", "∫ x**2 dx = x**3/3\n\nok");
        let line = result.to_json_line();
        assert!(!line.contains('\n'));
        assert!(line.contains("\\n\\n"));
        let back: ProblemResult = serde_json::from_str(&line).unwrap();
        assert_eq!(back, result);
    }

    #[test]
    fn test_error_record() {
        let result = ProblemResult::error("boom");
        assert!(!result.success);
        assert_eq!(result.answer, "Error: boom");
        assert!(result.explanation.ends_with("problem: boom"));
    }
}
