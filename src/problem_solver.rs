//! Turns a free-text math problem into a `ProblemResult`.
///______________________________________________________________________________________________________________________________________________
/// # Problem solver
/// 1) normalizes the notation of the problem text (`5x` -> `5*x`, `^` -> `**`)
/// 2) recognizes the problem category by keywords and regular expressions
/// 3) hands the extracted expression to the symbolic engine
/// 4) packs answer and explanation into a JSON-serializable record
///# Example#
/// ```
/// use RustedMathSolver::problem_solver::dispatcher::solve_math_problem;
/// let result = solve_math_problem("integrate x^2");
/// assert!(result.success);
/// assert_eq!(result.answer, "x**3/3");
/// ```
/// ________________________________________________________________________________________________________________________________________________
pub mod dispatcher;
/// problem categories in the order they are tried
pub mod category;
/// pure string helpers: notation cleanup and expression extraction
pub mod normalizer;
/// the `{success, answer, explanation}` record
pub mod problem_result;
