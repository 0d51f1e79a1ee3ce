#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
/// a module turns a String expression into a symbolic expression
///
///# Example
/// ```
/// use RustedMathSolver::symbolic::symbolic_engine::Expr;
/// let parsed_expression = Expr::parse_expression("x^2 + 3*x").unwrap();
/// assert_eq!(parsed_expression.to_string(), "x**2 + 3*x");
///  ```
/// ________________________________________________________________________________________________________________________________
pub mod parse_expr;
///____________________________________________________________________________________________________________________________
/// # Symbolic engine
/// a module
/// 1) defines the expression tree `Expr`
/// 2) substitutes, inspects and walks expressions
///# Example#
/// ```
/// use RustedMathSolver::symbolic::symbolic_engine::Expr;
/// let f = Expr::parse_expression("sin(x)*x").unwrap();
/// // differentiate with respect to x, the result is simplified
/// let df_dx = f.derivative("x").unwrap();
/// assert_eq!(df_dx.to_string(), "x*cos(x) + sin(x)");
/// // integrate, the constant of integration is omitted
/// let F = Expr::parse_expression("x^2").unwrap().integrate("x").unwrap();
/// assert_eq!(F.to_string(), "x**3/3");
/// ```
/// ________________________________________________________________________________________________________________________________________________
pub mod symbolic_engine;
pub mod symbolic_engine_derivatives;
pub mod symbolic_error;
pub mod symbolic_integration;
///______________________________________________________________________________________________________________________________________________
/// printing in the usual computer algebra notation: `**`, `sqrt`, exact fractions
pub mod symbolic_printing;
/// canonical sum-of-terms form, like terms collection, constant folding
pub mod symbolic_simplify;
///______________________________________________________________________________________________________________________________________________
/// polynomial equations in one unknown
/// Example#
/// ```
/// use RustedMathSolver::symbolic::symbolic_engine::Expr;
/// let lhs = Expr::parse_expression("x^2").unwrap();
/// let rhs = Expr::parse_expression("4").unwrap();
/// let roots = Expr::solve_for(&lhs, &rhs, "x").unwrap();
/// assert_eq!(roots, vec![Expr::Const(-2.0), Expr::Const(2.0)]);
/// ```
pub mod symbolic_solve;
///______________________________________________________________________________________________________________________________________________
/// the collection of numeric helpers: fraction recovery, float formatting, integer factoring
/// _____________________________________________________________________________________________________________________________________________
pub mod utils;
#[cfg(test)]
mod symbolic_engine_tests;
