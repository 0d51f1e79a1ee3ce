//! # Symbolic Engine Derivatives Module
//!
//! Differentiation and numeric evaluation of symbolic expressions.
//!
//! ## Key Methods
//!
//! ### Differentiation
//! - `diff(var: &str)` - raw analytical derivative, a tree built from the
//!   calculus rules without any cleanup
//! - `derivative(var: &str)` - `diff` followed by canonical simplification,
//!   this is what answers are printed from
//!
//! ### Evaluation
//! - `eval_expression()` - f64 value for given variable values
//! - `evalf()` - numeric simplification, every constant subtree becomes a float
//!   while free variables stay symbolic
//!
//! ## Differentiation rules
//!
//! 1. Sum, product and quotient rules
//! 2. Power rule for constant exponents, the general rule
//!    `d(u^v) = u^v * (v' * ln(u) + v * u'/u)` otherwise
//! 3. Chain rule for every elementary function

use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::symbolic_error::SymbolicError;
use std::f64::consts::{E, PI};

impl Expr {
    /// DIFFERENTIATION

    /// Computes the analytical derivative of the expression with respect to a variable.
    ///
    /// Implements all standard differentiation rules from calculus:
    /// - Power rule: d/dx(x^n) = n*x^(n-1)
    /// - Product rule: d/dx(f*g) = f'*g + f*g'
    /// - Quotient rule: d/dx(f/g) = (f'*g - f*g')/g^2
    /// - Chain rule: d/dx(f(g(x))) = f'(g(x))*g'(x)
    ///
    /// The result is not simplified, see [`Expr::derivative`].
    ///
    /// # Examples
    /// ```rust, ignore
    /// let x = Expr::Var("x".to_string());
    /// let f = x.clone().pow(Expr::Const(2.0)); // x^2
    /// let df_dx = f.diff("x"); // 2*x^(2-1)*1
    /// ```
    pub fn diff(&self, var: &str) -> Expr {
        match self {
            Expr::Var(name) => {
                if name == var {
                    Expr::Const(1.0)
                } else {
                    Expr::Const(0.0)
                }
            }
            Expr::Const(_) => Expr::Const(0.0),
            Expr::Add(lhs, rhs) => Expr::Add(Box::new(lhs.diff(var)), Box::new(rhs.diff(var))),
            Expr::Sub(lhs, rhs) => Expr::Sub(Box::new(lhs.diff(var)), Box::new(rhs.diff(var))),
            Expr::Mul(lhs, rhs) => Expr::Add(
                Box::new(Expr::Mul(Box::new(lhs.diff(var)), rhs.clone())),
                Box::new(Expr::Mul(lhs.clone(), Box::new(rhs.diff(var)))),
            ),
            Expr::Div(lhs, rhs) => Expr::Div(
                Box::new(Expr::Sub(
                    Box::new(Expr::Mul(Box::new(lhs.diff(var)), rhs.clone())),
                    Box::new(Expr::Mul(Box::new(rhs.diff(var)), lhs.clone())),
                )),
                Box::new(Expr::Pow(rhs.clone(), Box::new(Expr::Const(2.0)))),
            ),
            Expr::Pow(base, exp) if !exp.contains_variable(var) => Expr::Mul(
                Box::new(Expr::Mul(
                    exp.clone(),
                    Box::new(Expr::Pow(
                        base.clone(),
                        Box::new(Expr::Sub(exp.clone(), Box::new(Expr::Const(1.0)))),
                    )),
                )),
                Box::new(base.diff(var)),
            ),
            Expr::Pow(base, exp) => {
                // u^v * (v' * ln(u) + v * u' / u)
                let log_part = Expr::Mul(Box::new(exp.diff(var)), Box::new(Expr::Ln(base.clone())));
                let base_part = Expr::Div(
                    Box::new(Expr::Mul(exp.clone(), Box::new(base.diff(var)))),
                    base.clone(),
                );
                Expr::Mul(
                    Box::new(self.clone()),
                    Box::new(Expr::Add(Box::new(log_part), Box::new(base_part))),
                )
            }
            Expr::Exp(expr) => {
                Expr::Mul(Box::new(Expr::Exp(expr.clone())), Box::new(expr.diff(var)))
            }
            Expr::Ln(expr) => Expr::Div(Box::new(expr.diff(var)), expr.clone()),
            Expr::sin(expr) => {
                Expr::Mul(Box::new(Expr::cos(expr.clone())), Box::new(expr.diff(var)))
            }
            Expr::cos(expr) => Expr::Mul(
                Box::new(Expr::Mul(
                    Box::new(Expr::Const(-1.0)),
                    Box::new(Expr::sin(expr.clone())),
                )),
                Box::new(expr.diff(var)),
            ),
            // d tan(u) = (1 + tan(u)^2) u'
            Expr::tg(expr) => Expr::Mul(
                Box::new(Expr::Add(
                    Box::new(Expr::Const(1.0)),
                    Box::new(Expr::Pow(
                        Box::new(Expr::tg(expr.clone())),
                        Box::new(Expr::Const(2.0)),
                    )),
                )),
                Box::new(expr.diff(var)),
            ),
            Expr::ctg(expr) => Expr::Mul(
                Box::new(Expr::Sub(
                    Box::new(Expr::Const(-1.0)),
                    Box::new(Expr::Pow(
                        Box::new(Expr::ctg(expr.clone())),
                        Box::new(Expr::Const(2.0)),
                    )),
                )),
                Box::new(expr.diff(var)),
            ),
            Expr::arcsin(expr) => Expr::Div(
                Box::new(expr.diff(var)),
                Box::new(Expr::Pow(
                    Box::new(Expr::Sub(
                        Box::new(Expr::Const(1.0)),
                        Box::new(Expr::Pow(expr.clone(), Box::new(Expr::Const(2.0)))),
                    )),
                    Box::new(Expr::Const(0.5)),
                )),
            ),
            Expr::arccos(expr) => Expr::Div(
                Box::new(Expr::Mul(
                    Box::new(Expr::Const(-1.0)),
                    Box::new(expr.diff(var)),
                )),
                Box::new(Expr::Pow(
                    Box::new(Expr::Sub(
                        Box::new(Expr::Const(1.0)),
                        Box::new(Expr::Pow(expr.clone(), Box::new(Expr::Const(2.0)))),
                    )),
                    Box::new(Expr::Const(0.5)),
                )),
            ),
            Expr::arctg(expr) => Expr::Div(
                Box::new(expr.diff(var)),
                Box::new(Expr::Add(
                    Box::new(Expr::Const(1.0)),
                    Box::new(Expr::Pow(expr.clone(), Box::new(Expr::Const(2.0)))),
                )),
            ),
            Expr::arcctg(expr) => Expr::Div(
                Box::new(Expr::Mul(
                    Box::new(Expr::Const(-1.0)),
                    Box::new(expr.diff(var)),
                )),
                Box::new(Expr::Add(
                    Box::new(Expr::Const(1.0)),
                    Box::new(Expr::Pow(expr.clone(), Box::new(Expr::Const(2.0)))),
                )),
            ),
        }
    } // end of diff

    /// Derivative in canonical form, e.g. `x**2` -> `2*x`,
    /// `sin(x)*x` -> `x*cos(x) + sin(x)`.
    pub fn derivative(&self, var: &str) -> Result<Expr, SymbolicError> {
        self.diff(var).try_simplify()
    }

    /// DIRECT EXPRESSION EVALUATION

    /// Value of a one-argument function node at `value`; NaN for other nodes.
    pub fn eval_unary(&self, value: f64) -> f64 {
        match self {
            Expr::Exp(_) => value.exp(),
            Expr::Ln(_) => value.ln(),
            Expr::sin(_) => value.sin(),
            Expr::cos(_) => value.cos(),
            Expr::tg(_) => value.tan(),
            Expr::ctg(_) => 1.0 / value.tan(),
            Expr::arcsin(_) => value.asin(),
            Expr::arccos(_) => value.acos(),
            Expr::arctg(_) => value.atan(),
            Expr::arcctg(_) => PI / 2.0 - value.atan(),
            _ => f64::NAN,
        }
    }

    /// Evaluates symbolic expression directly.
    ///
    /// # Arguments
    /// * `vars` - Variable names in order matching values array
    /// * `values` - Numerical values for each variable
    ///
    /// `pi` and `E` evaluate to their constants; any other variable missing
    /// from `vars` is an error.
    pub fn eval_expression(&self, vars: &[&str], values: &[f64]) -> Result<f64, SymbolicError> {
        let value = match self {
            Expr::Var(name) => match vars.iter().position(|v| *v == name.as_str()) {
                Some(index) => values
                    .get(index)
                    .copied()
                    .ok_or_else(|| SymbolicError::Undefined(name.clone()))?,
                None if name == "pi" => PI,
                None if name == "E" => E,
                None => return Err(SymbolicError::Undefined(name.clone())),
            },
            Expr::Const(val) => *val,
            Expr::Add(lhs, rhs) => {
                lhs.eval_expression(vars, values)? + rhs.eval_expression(vars, values)?
            }
            Expr::Sub(lhs, rhs) => {
                lhs.eval_expression(vars, values)? - rhs.eval_expression(vars, values)?
            }
            Expr::Mul(lhs, rhs) => {
                lhs.eval_expression(vars, values)? * rhs.eval_expression(vars, values)?
            }
            Expr::Div(lhs, rhs) => {
                lhs.eval_expression(vars, values)? / rhs.eval_expression(vars, values)?
            }
            Expr::Pow(base, exp) => base
                .eval_expression(vars, values)?
                .powf(exp.eval_expression(vars, values)?),
            func => match func.unary_arg() {
                Some(arg) => func.eval_unary(arg.eval_expression(vars, values)?),
                None => f64::NAN,
            },
        };
        Ok(value)
    }

    /// Numeric evaluation: every constant subtree is folded into a float,
    /// `2 + 3` -> `5`, `x + sqrt(4)` -> `x + 2`. Fails when a constant has no
    /// finite real value (`1/0`, `log(-1)`, `sqrt(-4)`).
    pub fn evalf(&self) -> Result<Expr, SymbolicError> {
        self.simplify_numeric()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn parse(s: &str) -> Expr {
        Expr::parse_expression(s).unwrap()
    }

    #[test]
    fn test_diff_power() {
        let df = parse("x**2").derivative("x").unwrap();
        assert_eq!(df.to_string(), "2*x");
        let df = parse("x**3 + 2*x").derivative("x").unwrap();
        assert_eq!(df.to_string(), "3*x**2 + 2");
    }

    #[test]
    fn test_diff_product() {
        let df = parse("sin(x)*x").derivative("x").unwrap();
        assert_eq!(df.to_string(), "x*cos(x) + sin(x)");
    }

    #[test]
    fn test_diff_chain_rule() {
        assert_eq!(parse("exp(2*x)").derivative("x").unwrap().to_string(), "2*exp(2*x)");
        assert_eq!(parse("cos(x)").derivative("x").unwrap().to_string(), "-sin(x)");
        assert_eq!(parse("log(x)").derivative("x").unwrap().to_string(), "1/x");
    }

    #[test]
    fn test_diff_constant_and_other_variable() {
        assert_eq!(parse("5").derivative("x").unwrap().to_string(), "0");
        assert_eq!(parse("y*x").derivative("x").unwrap().to_string(), "y");
    }

    #[test]
    fn test_raw_diff_matches_numeric_slope() {
        let f = parse("x**2*sin(x) + exp(x)/x");
        let df = f.diff("x");
        let x0 = 1.3;
        let h = 1e-6;
        let numeric = (f.eval_expression(&["x"], &[x0 + h]).unwrap()
            - f.eval_expression(&["x"], &[x0 - h]).unwrap())
            / (2.0 * h);
        assert_relative_eq!(df.eval_expression(&["x"], &[x0]).unwrap(), numeric, epsilon = 1e-5);
    }

    #[test]
    fn test_variable_exponent() {
        let f = parse("2**x");
        let df = f.diff("x");
        let value = df.eval_expression(&["x"], &[1.0]).unwrap();
        assert_relative_eq!(value, 2.0 * 2f64.ln(), epsilon = 1e-12);
    }

    #[test]
    fn test_repeated_derivative() {
        let f = parse("x**3");
        let second = f.derivative("x").unwrap().derivative("x").unwrap();
        assert_eq!(second.to_string(), "6*x");
    }

    #[test]
    fn test_eval_expression() {
        let f = parse("pi*x + E");
        let value = f.eval_expression(&["x"], &[2.0]).unwrap();
        assert_relative_eq!(value, 2.0 * PI + E, epsilon = 1e-12);
        assert!(parse("y").eval_expression(&["x"], &[1.0]).is_err());
    }

    #[test]
    fn test_evalf() {
        assert_eq!(parse("2+3").evalf().unwrap(), Expr::Const(5.0));
        let root = parse("sqrt(2)").evalf().unwrap();
        assert_eq!(root.to_float_string(15), "1.41421356237310");
        assert_eq!(parse("x + sqrt(4)").evalf().unwrap().to_float_string(15), "x + 2.0");
        assert!(parse("1/0").evalf().is_err());
        assert!(parse("log(-1)").evalf().is_err());
    }
}
