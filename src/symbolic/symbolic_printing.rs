//! Text rendering of expressions in the usual computer-algebra notation:
//! `**` for powers, `sqrt(...)` for square roots, `log` for the natural
//! logarithm and exact fractions for rational constants (`x**3/3`, `-x/2`,
//! `1/(2*x)`).
//!
//! Two modes exist. Exact mode is what `Display` uses. Float mode renders the
//! outcome of numeric evaluation: a bare number keeps all significant digits
//! (`5.00000000000000`), numbers nested inside a larger expression are printed
//! short (`x + 1.0`), exponents stay exact.
use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::utils::{as_rational, format_float, is_integer};

const PREC_ADD: u8 = 1;
const PREC_MUL: u8 = 2;
const PREC_POW: u8 = 3;
const PREC_ATOM: u8 = 4;

#[derive(Clone, Copy)]
struct Printer {
    /// None in exact mode, significant digits in float mode
    float_digits: Option<usize>,
}

/// Coefficient and factors of a product, with negative powers moved below
/// the fraction bar.
struct Product {
    coeff: f64,
    numerator: Vec<Expr>,
    denominator: Vec<Expr>,
}

impl Product {
    fn collect(expr: &Expr) -> Product {
        let mut product = Product {
            coeff: 1.0,
            numerator: Vec::new(),
            denominator: Vec::new(),
        };
        product.push(expr, false);
        product
    }

    fn push(&mut self, expr: &Expr, inverted: bool) {
        match expr {
            Expr::Mul(lhs, rhs) => {
                self.push(lhs, inverted);
                self.push(rhs, inverted);
            }
            Expr::Div(lhs, rhs) => {
                self.push(lhs, inverted);
                self.push(rhs, !inverted);
            }
            Expr::Const(c) if !(inverted && *c == 0.0) => {
                if inverted {
                    self.coeff /= c;
                } else {
                    self.coeff *= c;
                }
            }
            Expr::Pow(base, exponent) => match exponent.as_ref() {
                Expr::Const(e) if *e < 0.0 => {
                    let flipped = if *e == -1.0 {
                        base.as_ref().clone()
                    } else {
                        base.as_ref().clone().pow(Expr::Const(-e))
                    };
                    self.push_factor(flipped, !inverted);
                }
                _ => self.push_factor(expr.clone(), inverted),
            },
            _ => self.push_factor(expr.clone(), inverted),
        }
    }

    fn push_factor(&mut self, factor: Expr, inverted: bool) {
        if inverted {
            self.denominator.push(factor);
        } else {
            self.numerator.push(factor);
        }
    }
}

fn precedence(expr: &Expr) -> u8 {
    match expr {
        Expr::Add(_, _) | Expr::Sub(_, _) => PREC_ADD,
        Expr::Mul(_, _) | Expr::Div(_, _) => PREC_MUL,
        Expr::Const(c) if *c < 0.0 => PREC_ADD,
        Expr::Const(c) if !is_integer(*c) => PREC_MUL,
        Expr::Pow(_, exponent) => match exponent.as_ref() {
            Expr::Const(e) if *e < 0.0 => PREC_MUL,
            Expr::Const(e) if *e == 0.5 => PREC_ATOM,
            _ => PREC_POW,
        },
        _ => PREC_ATOM,
    }
}

/// Splits a leading minus sign off an additive term.
fn split_sign(term: &Expr) -> (bool, Expr) {
    match term {
        Expr::Const(c) if *c < 0.0 => (true, Expr::Const(-c)),
        Expr::Mul(_, _) | Expr::Div(_, _) => {
            let product = Product::collect(term);
            if product.coeff < 0.0 {
                let positive = product
                    .numerator
                    .into_iter()
                    .fold(Expr::Const(-product.coeff), |acc, f| acc * f);
                let positive = product
                    .denominator
                    .into_iter()
                    .fold(positive, |acc, f| acc / f);
                (true, positive)
            } else {
                (false, term.clone())
            }
        }
        _ => (false, term.clone()),
    }
}

fn flatten_sum(expr: &Expr, negated: bool, terms: &mut Vec<(bool, Expr)>) {
    match expr {
        Expr::Add(lhs, rhs) => {
            flatten_sum(lhs, negated, terms);
            flatten_sum(rhs, negated, terms);
        }
        Expr::Sub(lhs, rhs) => {
            flatten_sum(lhs, negated, terms);
            flatten_sum(rhs, !negated, terms);
        }
        _ => {
            let (negative, magnitude) = split_sign(expr);
            terms.push((negative != negated, magnitude));
        }
    }
}

fn function_name(expr: &Expr) -> &'static str {
    match expr {
        Expr::Exp(_) => "exp",
        Expr::Ln(_) => "log",
        Expr::sin(_) => "sin",
        Expr::cos(_) => "cos",
        Expr::tg(_) => "tan",
        Expr::ctg(_) => "cot",
        Expr::arcsin(_) => "asin",
        Expr::arccos(_) => "acos",
        Expr::arctg(_) => "atan",
        Expr::arcctg(_) => "acot",
        _ => "",
    }
}

impl Printer {
    fn exact(&self) -> Printer {
        Printer { float_digits: None }
    }

    fn number(&self, value: f64) -> String {
        match self.float_digits {
            Some(digits) => format_float(value, digits, true),
            None => {
                if is_integer(value) {
                    format!("{}", value as i64)
                } else if let Some(r) = as_rational(value) {
                    format!("{}/{}", r.numer(), r.denom())
                } else {
                    format_float(value, 15, true)
                }
            }
        }
    }

    fn wrapped(&self, expr: &Expr, min_prec: u8) -> String {
        let text = self.print(expr);
        if precedence(expr) < min_prec {
            format!("({})", text)
        } else {
            text
        }
    }

    fn print(&self, expr: &Expr) -> String {
        match expr {
            Expr::Var(name) => name.clone(),
            Expr::Const(c) => self.number(*c),
            Expr::Add(_, _) | Expr::Sub(_, _) => self.print_sum(expr),
            Expr::Mul(_, _) | Expr::Div(_, _) => self.print_product(expr),
            Expr::Pow(base, exponent) => match exponent.as_ref() {
                Expr::Const(e) if *e < 0.0 => self.print_product(expr),
                _ => self.print_power(base, exponent),
            },
            func => match func.unary_arg() {
                Some(arg) => format!("{}({})", function_name(func), self.print(arg)),
                None => String::new(),
            },
        }
    }

    fn print_sum(&self, expr: &Expr) -> String {
        let mut terms = Vec::new();
        flatten_sum(expr, false, &mut terms);
        let mut out = String::new();
        for (i, (negative, term)) in terms.iter().enumerate() {
            let text = self.wrapped(term, PREC_MUL);
            match (i, negative) {
                (0, true) => out.push_str(&format!("-{}", text)),
                (0, false) => out.push_str(&text),
                (_, true) => out.push_str(&format!(" - {}", text)),
                (_, false) => out.push_str(&format!(" + {}", text)),
            }
        }
        out
    }

    fn print_product(&self, expr: &Expr) -> String {
        let product = Product::collect(expr);
        let negative = product.coeff < 0.0;
        let magnitude = product.coeff.abs();
        let factors =
            |list: &[Expr]| -> Vec<String> { list.iter().map(|f| self.wrapped(f, PREC_MUL)).collect() };

        let (mut numerator, mut denominator) = (Vec::new(), Vec::new());
        match (self.float_digits, as_rational(magnitude)) {
            (None, Some(r)) => {
                if *r.numer() != 1 || product.numerator.is_empty() {
                    numerator.push(r.numer().to_string());
                }
                if *r.denom() != 1 {
                    denominator.push(r.denom().to_string());
                }
            }
            _ => {
                if magnitude != 1.0 || product.numerator.is_empty() {
                    numerator.push(self.number(magnitude));
                }
            }
        }
        numerator.extend(factors(&product.numerator));
        denominator.extend(factors(&product.denominator));

        let sign = if negative { "-" } else { "" };
        let top = numerator.join("*");
        match denominator.len() {
            0 => format!("{}{}", sign, top),
            1 => format!("{}{}/{}", sign, top, denominator[0]),
            _ => format!("{}{}/({})", sign, top, denominator.join("*")),
        }
    }

    fn print_power(&self, base: &Expr, exponent: &Expr) -> String {
        if let Expr::Const(e) = exponent {
            if *e == 0.5 {
                return format!("sqrt({})", self.print(base));
            }
        }
        let base_text = match base {
            Expr::Const(c) if *c < 0.0 || !is_integer(*c) => format!("({})", self.print(base)),
            _ => self.wrapped(base, PREC_ATOM),
        };
        let exponent_text = match exponent {
            Expr::Const(e) if is_integer(*e) => self.exact().number(*e),
            Expr::Const(e) => format!("({})", self.exact().number(*e)),
            _ => self.wrapped(exponent, PREC_ATOM),
        };
        format!("{}**{}", base_text, exponent_text)
    }
}

impl Expr {
    /// Exact notation, e.g. `x**3/3`, `2*x`, `sqrt(2)*I`.
    pub fn to_cas_string(&self) -> String {
        Printer { float_digits: None }.print(self)
    }

    /// Notation for numerically evaluated results. A bare number keeps
    /// `digits` significant digits, nested numbers are shortened.
    pub fn to_float_string(&self, digits: usize) -> String {
        match self {
            Expr::Const(c) => format_float(*c, digits, false),
            _ => Printer {
                float_digits: Some(digits),
            }
            .print(self),
        }
    }
}

/// `[a, b, c]`
pub fn format_solution_set(solutions: &[Expr]) -> String {
    let items: Vec<String> = solutions.iter().map(|s| s.to_cas_string()).collect();
    format!("[{}]", items.join(", "))
}

/// `Eq(lhs, rhs)`
pub fn format_equation(lhs: &Expr, rhs: &Expr) -> String {
    format!("Eq({}, {})", lhs.to_cas_string(), rhs.to_cas_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> Expr {
        Expr::parse_expression(s).unwrap()
    }

    #[test]
    fn test_print_polynomial() {
        assert_eq!(parse("5*x**2+sin(x)").to_cas_string(), "5*x**2 + sin(x)");
        assert_eq!(parse("x**2-4").to_cas_string(), "x**2 - 4");
        assert_eq!(parse("-x+1").to_cas_string(), "-x + 1");
    }

    #[test]
    fn test_print_fractions() {
        let x = Expr::var("x");
        assert_eq!((x.clone().pow(Expr::Const(3.0)) / Expr::Const(3.0)).to_cas_string(), "x**3/3");
        assert_eq!(
            (Expr::Const(2.0 / 3.0) * x.clone().pow(Expr::Const(3.0))).to_cas_string(),
            "2*x**3/3"
        );
        assert_eq!((Expr::Const(-0.5) * x.clone()).to_cas_string(), "-x/2");
        assert_eq!((Expr::Const(0.5) * x.clone().pow(Expr::Const(-1.0))).to_cas_string(), "1/(2*x)");
        assert_eq!(Expr::Const(2.5).to_cas_string(), "5/2");
    }

    #[test]
    fn test_print_powers() {
        let x = Expr::var("x");
        assert_eq!(x.clone().sqrt().to_cas_string(), "sqrt(x)");
        assert_eq!(x.clone().pow(Expr::Const(1.5)).to_cas_string(), "x**(3/2)");
        assert_eq!((x.clone() + Expr::Const(1.0)).pow(Expr::Const(2.0)).to_cas_string(), "(x + 1)**2");
        assert_eq!(Expr::Const(2.0).pow(x.clone()).to_cas_string(), "2**x");
        assert_eq!(x.clone().pow(Expr::Const(-2.0)).to_cas_string(), "1/x**2");
    }

    #[test]
    fn test_print_functions() {
        assert_eq!(parse("ln(x)+tg(x)+arctg(x)").to_cas_string(), "log(x) + tan(x) + atan(x)");
        assert_eq!((-Expr::cos(Box::new(Expr::var("x")))).to_cas_string(), "-cos(x)");
    }

    #[test]
    fn test_float_mode() {
        assert_eq!(Expr::Const(5.0).to_float_string(15), "5.00000000000000");
        let expr = Expr::var("x") + Expr::Const(1.0);
        assert_eq!(expr.to_float_string(15), "x + 1.0");
        let scaled = Expr::Const(2.0) * Expr::var("x");
        assert_eq!(scaled.to_float_string(15), "2.0*x");
    }

    #[test]
    fn test_solution_set_and_equation() {
        let roots = vec![Expr::Const(-2.0), Expr::Const(2.0)];
        assert_eq!(format_solution_set(&roots), "[-2, 2]");
        assert_eq!(format_solution_set(&[]), "[]");
        let eq = format_equation(&(Expr::Const(5.0) * Expr::var("x") + Expr::Const(3.0)), &Expr::Const(13.0));
        assert_eq!(eq, "Eq(5*x + 3, 13)");
    }
}
