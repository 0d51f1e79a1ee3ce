//! Pure string helpers shared by the problem categories.
//!
//! Nothing here knows whether an expression is valid; malformed text is left
//! for the parser to reject.
use regex::Regex;
use std::sync::LazyLock;

/// `5x` -> `5*x`
static IMPLICIT_PRODUCT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d)([a-z])").unwrap());
static SOLVE_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(?:solve|find|compute|calculate|evaluate)\b(?:\s+for\s+[a-z]\b)?\s*[:,]?\s*")
        .unwrap()
});
static LEADING_FILLER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(?:(?:of|the)\s+)+").unwrap());
static TRAILING_DIFFERENTIAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:\s+d[a-z]|\s+with\s+respect\s+to\s+[a-z])?\s*[?!.]*\s*$").unwrap()
});
/// everything the expression category may pick out of the text
static EXPRESSION_CANDIDATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"([\d+\-*/().\sx^]+|sqrt\([^)]+\)|sin\([^)]+\)|cos\([^)]+\)|tan\([^)]+\)|log\([^)]+\)|ln\([^)]+\)|exp\([^)]+\))",
    )
    .unwrap()
});
static PLAIN_ARITHMETIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\d+\-*/().x]+$").unwrap());

pub const FUNCTION_NAMES: [&str; 7] = ["sqrt", "sin", "cos", "tan", "log", "ln", "exp"];

/// Inserts `*` between a digit and a following lowercase letter, turns `^`
/// into `**` and removes all whitespace.
pub fn normalize(text: &str) -> String {
    let text = IMPLICIT_PRODUCT.replace_all(text, "${1}*${2}");
    text.replace('^', "**")
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect()
}

/// Drops a leading command word such as `solve` or `solve for x:`.
pub fn strip_solve_prefix(text: &str) -> String {
    SOLVE_PREFIX.replace(text, "").trim().to_string()
}

/// Drops the words around a calculus operand: a leading `of`/`the`, a
/// trailing `dx` or `with respect to x` and closing punctuation.
pub fn strip_calculus_fillers(text: &str) -> String {
    let text = LEADING_FILLER.replace(text, "");
    TRAILING_DIFFERENTIAL.replace(&text, "").trim().to_string()
}

/// Candidate substrings for numeric evaluation, cleaned (`^` -> `**`, no
/// whitespace, no command word) and in order of appearance. Only those that
/// look like arithmetic on numbers or contain a known function survive.
pub fn expression_candidates(text: &str) -> Vec<String> {
    EXPRESSION_CANDIDATE
        .find_iter(text)
        .map(|m| {
            strip_solve_prefix(m.as_str().trim())
                .replace('^', "**")
                .chars()
                .filter(|c| !c.is_whitespace())
                .collect::<String>()
        })
        .filter(|candidate| is_evaluable_candidate(candidate))
        .collect()
}

fn is_evaluable_candidate(candidate: &str) -> bool {
    let arithmetic =
        PLAIN_ARITHMETIC.is_match(candidate) && candidate.chars().any(|c| c.is_ascii_digit());
    arithmetic || contains_function_name(candidate)
}

pub fn contains_function_name(text: &str) -> bool {
    FUNCTION_NAMES.iter().any(|name| text.contains(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("5x + 3"), "5*x+3");
        assert_eq!(normalize("x^2 - 2x"), "x**2-2*x");
        assert_eq!(normalize("3sin(x)"), "3*sin(x)");
        assert_eq!(normalize("  "), "");
    }

    #[test]
    fn test_normalize_leaves_uppercase_alone() {
        assert_eq!(normalize("2X"), "2X");
    }

    #[test]
    fn test_strip_solve_prefix() {
        assert_eq!(strip_solve_prefix("solve 5x + 3"), "5x + 3");
        assert_eq!(strip_solve_prefix("Solve for x: 2x + 1"), "2x + 1");
        assert_eq!(strip_solve_prefix("5x + 3"), "5x + 3");
        assert_eq!(strip_solve_prefix("solver"), "solver");
    }

    #[test]
    fn test_strip_calculus_fillers() {
        assert_eq!(strip_calculus_fillers("of x^2"), "x^2");
        assert_eq!(strip_calculus_fillers("of the x^2 dx"), "x^2");
        assert_eq!(strip_calculus_fillers("sin(x) with respect to x"), "sin(x)");
        assert_eq!(strip_calculus_fillers("x^3?"), "x^3");
        assert_eq!(strip_calculus_fillers("theta"), "theta");
    }

    #[test]
    fn test_expression_candidates() {
        assert_eq!(expression_candidates("What is 2 + 3?"), vec!["2+3"]);
        assert_eq!(expression_candidates("compute sqrt(16)"), vec!["sqrt(16)"]);
        assert_eq!(expression_candidates("2^10"), vec!["2**10"]);
    }

    #[test]
    fn test_letters_alone_are_not_candidates() {
        assert!(expression_candidates("worst-case time complexity").is_empty());
    }
}
