//! # Symbolic Engine Module
//!
//! Core expression type of the solver. Expressions are owned trees built from
//! variables, numeric constants, the five arithmetic operations and a small set
//! of elementary functions. Everything else in `symbolic` is an `impl Expr`
//! block extending this type:
//!
//! - `parse_expr` turns a cleaned string into an `Expr`
//! - `symbolic_simplify` brings an `Expr` into canonical sum-of-terms form
//! - `symbolic_engine_derivatives` differentiates and evaluates
//! - `symbolic_integration` computes antiderivatives
//! - `symbolic_solve` solves `lhs = rhs` for one variable
//! - `symbolic_printing` renders the CAS-style strings shown to the user
//!
//! ## Interesting Code Features
//!
//! 1. **Recursive Expression Tree**: `Box<Expr>` children, so expressions nest
//!    arbitrarily and are cheap to pattern match.
//! 2. **Operator Overloading**: `std::ops` traits give `x.clone() * x + c`
//!    syntax when rules build new expressions.
//! 3. **Named constants**: the variable names `pi`, `E` and `I` stand for π,
//!    Euler's number and the imaginary unit. They never count as unknowns.
//! 4. **Non-standard Function Names**: variants keep the mathematical notation
//!    (`tg`, `ctg`, `arctg`) while the printer emits `tan`, `cot`, `atan`.

#![allow(non_camel_case_types)]

use std::fmt;

/// Name of the imaginary unit inside expression trees.
pub const IMAGINARY_UNIT: &str = "I";

/// Core symbolic expression enum representing mathematical expressions as an abstract syntax tree.
///
/// # Examples
/// ```rust, ignore
/// use RustedMathSolver::symbolic::symbolic_engine::Expr;
/// let x = Expr::Var("x".to_string());
/// let expr = Expr::Add(Box::new(x), Box::new(Expr::Const(2.0)));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    /// Symbolic variable with a name (e.g., "x", "y")
    Var(String),
    /// Numerical constant value
    Const(f64),
    /// Addition operation: left + right
    Add(Box<Expr>, Box<Expr>),
    /// Subtraction operation: left - right
    Sub(Box<Expr>, Box<Expr>),
    /// Multiplication operation: left * right
    Mul(Box<Expr>, Box<Expr>),
    /// Division operation: left / right
    Div(Box<Expr>, Box<Expr>),
    /// Power operation: base ^ exponent
    Pow(Box<Expr>, Box<Expr>),
    /// Exponential function: e^x
    Exp(Box<Expr>),
    /// Natural logarithm, printed as log(x)
    Ln(Box<Expr>),
    /// Sine function: sin(x)
    sin(Box<Expr>),
    /// Cosine function: cos(x)
    cos(Box<Expr>),
    /// Tangent function, printed as tan(x)
    tg(Box<Expr>),
    /// Cotangent function, printed as cot(x)
    ctg(Box<Expr>),
    /// Arcsine function, printed as asin(x)
    arcsin(Box<Expr>),
    /// Arccosine function, printed as acos(x)
    arccos(Box<Expr>),
    /// Arctangent function, printed as atan(x)
    arctg(Box<Expr>),
    /// Arccotangent function, printed as acot(x)
    arcctg(Box<Expr>),
}

/// Display renders the CAS-style string used in answers (`x**3/3`, `2*x`).
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_cas_string())
    }
}

impl std::ops::Add for Expr {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Expr::Add(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Sub for Expr {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Expr::Sub(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Mul for Expr {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Expr::Mul(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Div for Expr {
    type Output = Self;

    fn div(self, rhs: Self) -> Self::Output {
        Expr::Div(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Neg for Expr {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Expr::Mul(Box::new(Expr::Const(-1.0)), Box::new(self))
    }
}

impl Expr {
    /// BASIC FEATURES

    /// Shorthand for `Expr::Var(name.to_string())`.
    pub fn var(name: &str) -> Expr {
        Expr::Var(name.to_string())
    }

    /// True for the reserved names `pi`, `E` and `I`.
    pub fn is_named_constant(name: &str) -> bool {
        matches!(name, "pi" | "E" | IMAGINARY_UNIT)
    }

    /// Convenience method to wrap expression in Box for recursive structures.
    pub fn boxed(self) -> Box<Self> {
        Box::new(self)
    }

    /// Creates exponential function e^(self).
    pub fn exp(self) -> Expr {
        Expr::Exp(self.boxed())
    }

    /// Creates natural logarithm ln(self).
    pub fn ln(self) -> Expr {
        Expr::Ln(self.boxed())
    }

    /// Creates power expression self^rhs.
    pub fn pow(self, rhs: Expr) -> Expr {
        Expr::Pow(self.boxed(), rhs.boxed())
    }

    /// Creates self^(1/2).
    pub fn sqrt(self) -> Expr {
        self.pow(Expr::Const(0.5))
    }

    /// Checks if expression is exactly zero (constant 0.0).
    pub fn is_zero(&self) -> bool {
        matches!(self, Expr::Const(val) if *val == 0.0)
    }

    /// Argument of a one-argument function node, `None` for variables,
    /// constants and binary operations.
    pub fn unary_arg(&self) -> Option<&Expr> {
        match self {
            Expr::Exp(arg)
            | Expr::Ln(arg)
            | Expr::sin(arg)
            | Expr::cos(arg)
            | Expr::tg(arg)
            | Expr::ctg(arg)
            | Expr::arcsin(arg)
            | Expr::arccos(arg)
            | Expr::arctg(arg)
            | Expr::arcctg(arg) => Some(arg),
            _ => None,
        }
    }

    /// Rebuilds the same one-argument function around a new argument.
    /// Non-function nodes are returned unchanged.
    pub fn with_unary_arg(&self, arg: Expr) -> Expr {
        let arg = Box::new(arg);
        match self {
            Expr::Exp(_) => Expr::Exp(arg),
            Expr::Ln(_) => Expr::Ln(arg),
            Expr::sin(_) => Expr::sin(arg),
            Expr::cos(_) => Expr::cos(arg),
            Expr::tg(_) => Expr::tg(arg),
            Expr::ctg(_) => Expr::ctg(arg),
            Expr::arcsin(_) => Expr::arcsin(arg),
            Expr::arccos(_) => Expr::arccos(arg),
            Expr::arctg(_) => Expr::arctg(arg),
            Expr::arcctg(_) => Expr::arcctg(arg),
            _ => self.clone(),
        }
    }

    /// Operands of a binary node.
    pub fn binary_args(&self) -> Option<(&Expr, &Expr)> {
        match self {
            Expr::Add(lhs, rhs)
            | Expr::Sub(lhs, rhs)
            | Expr::Mul(lhs, rhs)
            | Expr::Div(lhs, rhs)
            | Expr::Pow(lhs, rhs) => Some((lhs, rhs)),
            _ => None,
        }
    }

    /// check if the expression contains a variable
    pub fn contains_variable(&self, var_name: &str) -> bool {
        match self {
            Expr::Var(name) => name == var_name,
            Expr::Const(_) => false,
            other => match other.binary_args() {
                Some((lhs, rhs)) => {
                    lhs.contains_variable(var_name) || rhs.contains_variable(var_name)
                }
                None => other
                    .unary_arg()
                    .is_some_and(|arg| arg.contains_variable(var_name)),
            },
        }
    }

    /// True if the expression mentions the imaginary unit.
    pub fn contains_imaginary_unit(&self) -> bool {
        self.contains_variable(IMAGINARY_UNIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_variable_inside_functions() {
        let x = Expr::var("x");
        let expr = Expr::sin(Box::new(x.clone())) + Expr::var("y") * Expr::Const(2.0);
        assert!(expr.contains_variable("x"));
        assert!(expr.contains_variable("y"));
        assert!(!expr.contains_variable("z"));
        assert!(!expr.contains_imaginary_unit());
    }

    #[test]
    fn test_with_unary_arg_keeps_function() {
        let f = Expr::cos(Box::new(Expr::var("x")));
        assert_eq!(
            f.with_unary_arg(Expr::Const(0.0)),
            Expr::cos(Box::new(Expr::Const(0.0)))
        );
    }
}
