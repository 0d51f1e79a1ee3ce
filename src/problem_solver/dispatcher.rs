//! Category dispatcher: tries every [`ProblemCategory`] in declaration order
//! and returns the first successful [`ProblemResult`].
//!
//! A category that does not match, extracts nothing or whose computation fails
//! hands over to the next one. Engine errors never leave this module; only the
//! input guard can turn the whole run into an error record.
use crate::Utils::solver_config::SolverConfig;
use crate::problem_solver::category::{Extracted, ProblemCategory};
use crate::problem_solver::normalizer::normalize;
use crate::problem_solver::problem_result::ProblemResult;
use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::symbolic_error::SymbolicError;
use crate::symbolic::symbolic_printing::{format_equation, format_solution_set};
use log::{debug, info};
use strum::IntoEnumIterator;

/// the variable every category solves, integrates or differentiates for
pub const VARIABLE: &str = "x";

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SolveError {
    #[error(transparent)]
    Symbolic(#[from] SymbolicError),
    #[error("nothing to compute for category {0}")]
    NothingExtracted(ProblemCategory),
    #[error("problem is {len} characters long, the limit is {max}")]
    ProblemTooLong { len: usize, max: usize },
}

/// Solves `problem` with the default [`SolverConfig`].
pub fn solve_math_problem(problem: &str) -> ProblemResult {
    solve_with_config(problem, &SolverConfig::default())
}

pub fn solve_with_config(problem: &str, config: &SolverConfig) -> ProblemResult {
    match dispatch(problem, config) {
        Ok(result) => result,
        Err(e) => {
            info!("problem rejected: {}", e);
            ProblemResult::error(&e.to_string())
        }
    }
}

fn dispatch(problem: &str, config: &SolverConfig) -> Result<ProblemResult, SolveError> {
    let len = problem.chars().count();
    if len > config.max_problem_length {
        return Err(SolveError::ProblemTooLong {
            len,
            max: config.max_problem_length,
        });
    }
    for category in ProblemCategory::iter() {
        if !category.matches(problem) {
            continue;
        }
        match attempt(category, problem, config) {
            Ok(result) => {
                info!("solved as {}", category);
                return Ok(result);
            }
            Err(e) => debug!("category {} failed: {}", category, e),
        }
    }
    Ok(ProblemResult::unsolved())
}

fn attempt(
    category: ProblemCategory,
    problem: &str,
    config: &SolverConfig,
) -> Result<ProblemResult, SolveError> {
    let extracted = category
        .extract(problem)
        .ok_or(SolveError::NothingExtracted(category))?;
    match (category, extracted) {
        (ProblemCategory::Integrate, Extracted::Operand(text)) => integrate(&text),
        (ProblemCategory::Differentiate, Extracted::Operand(text)) => differentiate(&text),
        (ProblemCategory::Equation, Extracted::Equation { left, right }) => {
            solve_equation(&left, &right)
        }
        (ProblemCategory::Expression, Extracted::Candidates(candidates)) => {
            evaluate_first(&candidates, config)
        }
        (ProblemCategory::Complexity, _) => Ok(ProblemResult::complexity()),
        _ => Err(SolveError::NothingExtracted(category)),
    }
}

fn integrate(text: &str) -> Result<ProblemResult, SolveError> {
    let cleaned = normalize(text);
    let expr = Expr::parse_expression(&cleaned)?.try_simplify()?;
    let result = expr.integrate(VARIABLE)?.to_cas_string();
    let explanation = format!(
        "Integrating {} with respect to x:\n\n∫ {} dx = {}\n\nThis is the antiderivative of the expression.",
        cleaned, expr, result
    );
    Ok(ProblemResult::solved(result, explanation))
}

fn differentiate(text: &str) -> Result<ProblemResult, SolveError> {
    let cleaned = normalize(text);
    let expr = Expr::parse_expression(&cleaned)?.try_simplify()?;
    let result = expr.derivative(VARIABLE)?.to_cas_string();
    let explanation = format!(
        "Differentiating {} with respect to x:\n\nd/dx ({}) = {}\n\nThis is the derivative of the expression.",
        cleaned, expr, result
    );
    Ok(ProblemResult::solved(result, explanation))
}

fn solve_equation(left: &str, right: &str) -> Result<ProblemResult, SolveError> {
    let lhs = Expr::parse_expression(&normalize(left))?.try_simplify()?;
    let rhs = Expr::parse_expression(&normalize(right))?.try_simplify()?;
    let solutions = format_solution_set(&Expr::solve_for(&lhs, &rhs, VARIABLE)?);
    let explanation = format!(
        "Solving the equation {} = {}:\n\nWe rearrange to get: {}\n\nSolution: x = {}\n\nThis means the value(s) of x that satisfy the equation.",
        left,
        right,
        format_equation(&lhs, &rhs),
        solutions
    );
    Ok(ProblemResult::solved(solutions, explanation))
}

/// The first candidate that parses and has a finite value wins.
fn evaluate_first(candidates: &[String], config: &SolverConfig) -> Result<ProblemResult, SolveError> {
    let mut last_error = SolveError::NothingExtracted(ProblemCategory::Expression);
    for candidate in candidates {
        match evaluate(candidate, config) {
            Ok(result) => return Ok(result),
            Err(e) => {
                debug!("candidate {} rejected: {}", candidate, e);
                last_error = e;
            }
        }
    }
    Err(last_error)
}

fn evaluate(cleaned: &str, config: &SolverConfig) -> Result<ProblemResult, SolveError> {
    let expr = Expr::parse_expression(cleaned)?.try_simplify()?;
    let value = expr.evalf()?;
    if value.contains_imaginary_unit() {
        return Err(SymbolicError::Undefined(value.to_string()).into());
    }
    let result = value.to_float_string(config.float_digits);
    let explanation = format!(
        "Evaluating the expression: {}\n\nUsing the symbolic engine to compute: {}\n\nResult: {}\n\nThis is the numerical value of the expression.",
        cleaned, expr, result
    );
    Ok(ProblemResult::solved(result, explanation))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem_solver::problem_result::{
        COMPLEXITY_ANSWER, UNSOLVED_ANSWER, UNSOLVED_EXPLANATION,
    };

    fn answer(problem: &str) -> String {
        let result = solve_math_problem(problem);
        assert!(result.success, "{} -> {:?}", problem, result);
        result.answer
    }

    #[test]
    fn test_integrate() {
        assert_eq!(answer("integrate x^2"), "x**3/3");
        assert_eq!(answer("integrate sin(x)"), "-cos(x)");
        assert_eq!(answer("Find the integral of 2x dx"), "x**2");
    }

    #[test]
    fn test_integrate_explanation() {
        let result = solve_math_problem("integrate x^2");
        assert_eq!(
            result.explanation,
            "Integrating x**2 with respect to x:\n\n∫ x**2 dx = x**3/3\n\nThis is the antiderivative of the expression."
        );
    }

    #[test]
    fn test_differentiate() {
        assert_eq!(answer("derivative of x^2"), "2*x");
        assert_eq!(answer("differentiate sin(x)*x"), "x*cos(x) + sin(x)");
        let result = solve_math_problem("derivative of x^2");
        assert!(result.explanation.starts_with("Differentiating x**2 with respect to x:"));
        assert!(result.explanation.contains("d/dx (x**2) = 2*x"));
    }

    #[test]
    fn test_integration_beats_differentiation() {
        // both keywords present, integration is tried first
        assert_eq!(answer("integrate x, not the derivative"), "x**2/2");
    }

    #[test]
    fn test_equation() {
        assert_eq!(answer("5x + 3 = 13"), "[2]");
        assert_eq!(answer("x^2 = 4"), "[-2, 2]");
        assert_eq!(answer("solve 2x = 2x"), "[]");
        let result = solve_math_problem("solve 5x + 3 = 13");
        assert_eq!(
            result.explanation,
            "Solving the equation 5x + 3 = 13:\n\nWe rearrange to get: Eq(5*x + 3, 13)\n\nSolution: x = [2]\n\nThis means the value(s) of x that satisfy the equation."
        );
    }

    #[test]
    fn test_expression() {
        assert_eq!(answer("2 + 3"), "5.00000000000000");
        assert_eq!(answer("What is 2 + 3?"), "5.00000000000000");
        let result = solve_math_problem("2 + 3");
        assert!(result.explanation.starts_with("Evaluating the expression: 2+3\n\n"));
        assert!(result.explanation.contains("Result: 5.00000000000000"));
    }

    #[test]
    fn test_expression_without_finite_value_fails() {
        let result = solve_math_problem("1/0");
        assert!(!result.success);
        assert_eq!(result.answer, UNSOLVED_ANSWER);
    }

    #[test]
    fn test_complexity() {
        let result = solve_math_problem("what is the time complexity of merge sort");
        assert!(result.success);
        assert_eq!(result.answer, COMPLEXITY_ANSWER);
    }

    #[test]
    fn test_unsolvable() {
        let result = solve_math_problem("hello world");
        assert_eq!(result, ProblemResult::failed(UNSOLVED_ANSWER, UNSOLVED_EXPLANATION));
    }

    #[test]
    fn test_failed_integral_falls_through() {
        // unparsable operand, no other category matches
        let result = solve_math_problem("integrate )(");
        assert!(!result.success);
        assert_eq!(result.answer, UNSOLVED_ANSWER);
    }

    #[test]
    fn test_integrate_textbook_forms() {
        assert_eq!(answer("integrate sin(x)^2"), "x/2 - sin(2*x)/4");
        assert_eq!(answer("integrate cos(x)^2"), "x/2 + sin(2*x)/4");
        assert_eq!(answer("integrate sin(x)*cos(x)"), "sin(x)**2/2");
        assert_eq!(
            answer("integrate exp(x)*sin(x)"),
            "-cos(x)*exp(x)/2 + exp(x)*sin(x)/2"
        );
        assert_eq!(answer("integrate 1/(1+x^2)"), "atan(x)");
        assert_eq!(answer("integrate 1/sqrt(1-x^2)"), "asin(x)");
    }

    #[test]
    fn test_non_polynomial_equations() {
        assert_eq!(answer("1/x = 2"), "[1/2]");
        assert_eq!(answer("sqrt(x) = 2"), "[4]");
        assert_eq!(
            answer("x^3 = 2"),
            "[2**(1/3), -2**(1/3)/2 - 2**(1/3)*sqrt(3)*I/2, -2**(1/3)/2 + 2**(1/3)*sqrt(3)*I/2]"
        );
    }

    #[test]
    fn test_engine_failures_end_unsolved() {
        // none of these may come back as an evaluated operand
        for problem in [
            "integrate exp(x^2)",
            "derivative of |x|",
            "sin(x) = 0",
            "(2x)^4294967297 = 0",
            "(x^3037000500)^3037000500",
        ] {
            let result = solve_math_problem(problem);
            assert!(!result.success, "{} -> {:?}", problem, result);
            assert_eq!(result.answer, UNSOLVED_ANSWER);
        }
    }

    #[test]
    fn test_idempotent() {
        for problem in ["integrate x^2", "x^2 = 4", "2 + 3", "hello world"] {
            assert_eq!(
                solve_math_problem(problem).to_json_line(),
                solve_math_problem(problem).to_json_line()
            );
        }
    }

    #[test]
    fn test_problem_too_long() {
        let config = SolverConfig {
            max_problem_length: 8,
            ..SolverConfig::default()
        };
        let result = solve_with_config("integrate x^2", &config);
        assert!(!result.success);
        assert_eq!(
            result.answer,
            "Error: problem is 13 characters long, the limit is 8"
        );
    }
}
