use crate::problem_solver::normalizer::{
    expression_candidates, strip_calculus_fillers, strip_solve_prefix,
};
use regex::Regex;
use std::sync::LazyLock;
use strum_macros::{Display, EnumIter};

static INTEGRATE_CAPTURE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:integrate|integral)\s+([^,]+)").unwrap());
static DIFFERENTIATE_CAPTURE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:differentiate|derivative)\s+([^,]+)").unwrap());
static EQUATION_CAPTURE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([^=]+)=([^=]+)").unwrap());

/// tokens that make a problem worth a numeric evaluation attempt
pub const EXPRESSION_TRIGGERS: [&str; 13] = [
    "+", "-", "*", "/", "^", "**", "sqrt", "sin", "cos", "tan", "log", "ln", "exp",
];
pub const COMPLEXITY_KEYWORDS: [&str; 6] = [
    "time complexity",
    "space complexity",
    "big o",
    "algorithm",
    "worst-case",
    "best-case",
];

/// Problem categories. Declaration order is the order in which the dispatcher
/// tries them, the first successful one wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
pub enum ProblemCategory {
    Integrate,
    Differentiate,
    Equation,
    Expression,
    Complexity,
}

/// What a category pulled out of the problem text.
#[derive(Debug, Clone, PartialEq)]
pub enum Extracted {
    /// calculus operand, fillers removed but notation untouched
    Operand(String),
    Equation { left: String, right: String },
    /// cleaned expression candidates, first to last
    Candidates(Vec<String>),
    /// the category needs nothing beyond the keyword
    Keyword,
}

impl ProblemCategory {
    /// Cheap keyword test deciding whether the category is attempted at all.
    pub fn matches(&self, problem: &str) -> bool {
        let lower = problem.to_lowercase();
        match self {
            ProblemCategory::Integrate => lower.contains("integrate") || lower.contains("integral"),
            ProblemCategory::Differentiate => {
                lower.contains("differentiate") || lower.contains("derivative")
            }
            ProblemCategory::Equation => problem.contains('='),
            // an integral, derivative or equation has no value of its own
            ProblemCategory::Expression => {
                !ProblemCategory::Integrate.matches(problem)
                    && !ProblemCategory::Differentiate.matches(problem)
                    && !ProblemCategory::Equation.matches(problem)
                    && EXPRESSION_TRIGGERS.iter().any(|t| problem.contains(t))
            }
            ProblemCategory::Complexity => COMPLEXITY_KEYWORDS.iter().any(|k| lower.contains(k)),
        }
    }

    pub fn extract(&self, problem: &str) -> Option<Extracted> {
        let lower = problem.to_lowercase();
        match self {
            ProblemCategory::Integrate => operand(&INTEGRATE_CAPTURE, &lower),
            ProblemCategory::Differentiate => operand(&DIFFERENTIATE_CAPTURE, &lower),
            ProblemCategory::Equation => {
                let captures = EQUATION_CAPTURE.captures(problem)?;
                let left = strip_solve_prefix(captures.get(1)?.as_str().trim());
                let right = captures.get(2)?.as_str().trim().to_string();
                Some(Extracted::Equation { left, right })
            }
            ProblemCategory::Expression => {
                let candidates = expression_candidates(problem);
                if candidates.is_empty() {
                    None
                } else {
                    Some(Extracted::Candidates(candidates))
                }
            }
            ProblemCategory::Complexity => Some(Extracted::Keyword),
        }
    }
}

fn operand(capture: &Regex, lower: &str) -> Option<Extracted> {
    let captured = capture.captures(lower)?.get(1)?.as_str().trim();
    let cleaned = strip_calculus_fillers(captured);
    if cleaned.is_empty() {
        None
    } else {
        Some(Extracted::Operand(cleaned))
    }
}
