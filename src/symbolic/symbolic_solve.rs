//! Equation solving in one variable.
//!
//! `lhs = rhs` is rewritten as `lhs - rhs = 0` and brought into canonical form.
//! Denominators that contain the unknown are multiplied out first, and a
//! single square root of the unknown is removed by squaring. What remains is
//! split into coefficients of the powers of the unknown.
//!
//! - degree 0: no solutions (`[]`), both for contradictions and identities
//! - degree 1: `-c0/c1`, coefficients may be symbolic
//! - degree 2: quadratic formula. Integer discriminants give exact roots with
//!   the square factor pulled out of the radical (`1 + sqrt(2)`, `-I`), other
//!   numeric coefficients fall back to floats, symbolic ones keep `sqrt(...)`
//! - `x**n = c`: all n roots `c**(1/n)` times the n-th roots of unity
//! - higher degree: rational roots are split off (rational root theorem) until
//!   a quadratic remains
//!
//! Roots that zero a cleared denominator are dropped, and so are roots of a
//! squared equation that do not satisfy the original one. Real roots come
//! first in ascending order, complex roots after them.
use crate::symbolic::symbolic_engine::{Expr, IMAGINARY_UNIT};
use crate::symbolic::symbolic_error::SymbolicError;
use crate::symbolic::symbolic_simplify::{AtomKey, CanonicalSum, FoldMode};
use crate::symbolic::utils::{ZERO_TOLERANCE, as_rational, divisors, split_square_factor};
use num::Integer;
use num::rational::Rational64;
use num_traits::{CheckedAdd, CheckedMul, Signed, ToPrimitive, Zero};
use std::collections::BTreeMap;
use std::f64::consts::{FRAC_1_SQRT_2, PI};

/// Highest degree attempted with rational root deflation.
pub const MAX_POLYNOMIAL_DEGREE: i64 = 12;

/// Residual below which a candidate root counts as a solution.
const ROOT_TOLERANCE: f64 = 1e-9;

struct Root {
    expr: Expr,
    re: f64,
    im: f64,
}

impl Root {
    fn real(expr: Expr, value: f64) -> Root {
        Root {
            expr,
            re: value,
            im: 0.0,
        }
    }

    fn symbolic(expr: Expr) -> Root {
        Root {
            expr,
            re: f64::NAN,
            im: 0.0,
        }
    }

    fn is_checkable(&self) -> bool {
        self.im == 0.0 && self.re.is_finite()
    }
}

impl Expr {
    /// Solutions of `lhs = rhs` for `var`.
    pub fn solve_for(lhs: &Expr, rhs: &Expr, var: &str) -> Result<Vec<Expr>, SymbolicError> {
        let difference = (lhs.clone() - rhs.clone()).canonical(FoldMode::Exact)?;
        let (cleared, denominators) = clear_denominators(&difference, var)?;
        let mut roots = match find_radical(&cleared, var) {
            Some(radical) => solve_radical(&cleared, &radical, var)?,
            None => solve_polynomial(&cleared, var)?,
        };
        roots.retain(|root| {
            !denominators
                .iter()
                .any(|denominator| vanishes_at(denominator, var, root))
        });

        sort_roots(&mut roots);
        let mut seen = Vec::new();
        let mut solutions = Vec::new();
        for root in roots {
            let text = root.expr.to_string();
            if !seen.contains(&text) {
                seen.push(text);
                solutions.push(root.expr);
            }
        }
        Ok(solutions)
    }
}

/// true when `expr` is zero at a real root; unknown values count as non-zero
fn vanishes_at(expr: &Expr, var: &str, root: &Root) -> bool {
    root.is_checkable()
        && expr
            .eval_expression(&[var], &[root.re])
            .is_ok_and(|value| value.abs() < ROOT_TOLERANCE)
}

/// Multiplies the sum by every atom that holds `var` and appears with a
/// negative exponent. Returns the product, expanded, and those atoms.
fn clear_denominators(
    sum: &CanonicalSum,
    var: &str,
) -> Result<(CanonicalSum, Vec<Expr>), SymbolicError> {
    let mut powers: BTreeMap<AtomKey, Rational64> = BTreeMap::new();
    for (key, _) in sum.terms() {
        for (atom, exponent) in &key.0 {
            let depends = sum
                .atom_expr(atom)
                .is_some_and(|expr| expr.contains_variable(var));
            if depends && exponent.is_negative() {
                let power = powers.entry(atom.clone()).or_insert_with(Rational64::zero);
                if -*exponent > *power {
                    *power = -*exponent;
                }
            }
        }
    }
    if powers.is_empty() {
        return Ok((sum.clone(), Vec::new()));
    }
    let mut multiplier = CanonicalSum::constant(1.0);
    let mut denominators = Vec::new();
    for (atom, power) in powers {
        if let Some(base) = sum.atom_expr(&atom) {
            multiplier = multiplier.mul(&CanonicalSum::atom_power(base.clone(), power)?)?;
            denominators.push(base.clone());
        }
    }
    // positive powers of sums left in other terms get multiplied out here
    let cleared = sum.mul(&multiplier)?.to_expr().canonical(FoldMode::Exact)?;
    Ok((cleared, denominators))
}

/// First atom holding `var` under a square root.
fn find_radical(sum: &CanonicalSum, var: &str) -> Option<AtomKey> {
    sum.terms()
        .flat_map(|(key, _)| key.0.iter())
        .find(|(atom, exponent)| {
            *exponent.denom() == 2
                && sum
                    .atom_expr(atom)
                    .is_some_and(|expr| expr.contains_variable(var))
        })
        .map(|(atom, _)| atom.clone())
}

/// rest + factor*sqrt(u) = 0 is squared into rest**2 - factor**2*u = 0; only
/// real roots that satisfy the unsquared equation are kept.
fn solve_radical(
    sum: &CanonicalSum,
    radical: &AtomKey,
    var: &str,
) -> Result<Vec<Root>, SymbolicError> {
    let unsupported = || SymbolicError::EquationNotSupported(sum.to_expr().to_string());
    let radicand = sum
        .atom_expr(radical)
        .ok_or_else(unsupported)?
        .canonical(FoldMode::Exact)?;
    let (rest, factor) = sum.split_radical(radical)?.ok_or_else(unsupported)?;
    let mut squared = rest.mul(&rest)?;
    squared.add(&factor.mul(&factor)?.mul(&radicand)?.scale(-1.0)?)?;
    let squared = squared.to_expr().canonical(FoldMode::Exact)?;
    if find_radical(&squared, var).is_some() {
        return Err(unsupported());
    }

    let original = sum.to_expr();
    let candidates = solve_polynomial(&squared, var)?;
    Ok(candidates
        .into_iter()
        .filter(|root| vanishes_at(&original, var, root))
        .collect())
}

fn solve_polynomial(sum: &CanonicalSum, var: &str) -> Result<Vec<Root>, SymbolicError> {
    let coefficients = sum.coefficients_in(var)?;
    let degree = coefficients.keys().max().copied().unwrap_or(0);
    let unsupported = || SymbolicError::EquationNotSupported(sum.to_expr().to_string());

    Ok(match degree {
        0 => Vec::new(),
        1 => vec![solve_linear(&coefficients)?],
        2 => solve_quadratic(
            &coefficient(&coefficients, 2),
            &coefficient(&coefficients, 1),
            &coefficient(&coefficients, 0),
        )?,
        d if d <= MAX_POLYNOMIAL_DEGREE => match binomial_value(&coefficients, d) {
            Some(value) => binomial_roots(value, d)?,
            None => {
                let numeric = rational_coefficients(&coefficients, d).ok_or_else(unsupported)?;
                solve_by_deflation(numeric).ok_or_else(unsupported)?
            }
        },
        _ => return Err(unsupported()),
    })
}

fn coefficient(coefficients: &BTreeMap<i64, CanonicalSum>, power: i64) -> CanonicalSum {
    coefficients.get(&power).cloned().unwrap_or_default()
}

fn solve_linear(coefficients: &BTreeMap<i64, CanonicalSum>) -> Result<Root, SymbolicError> {
    let c1 = coefficient(coefficients, 1).to_expr();
    let c0 = coefficient(coefficients, 0).to_expr();
    let root = (Expr::Const(-1.0) * c0 / c1).try_simplify()?;
    Ok(match root.constant_value() {
        Some(value) => Root::real(root, value),
        None => Root::symbolic(root),
    })
}

/// Roots of a*x^2 + b*x + c.
fn solve_quadratic(
    a: &CanonicalSum,
    b: &CanonicalSum,
    c: &CanonicalSum,
) -> Result<Vec<Root>, SymbolicError> {
    match (a.as_constant(), b.as_constant(), c.as_constant()) {
        (Some(a), Some(b), Some(c)) => match (as_rational(a), as_rational(b), as_rational(c)) {
            (Some(a), Some(b), Some(c)) => exact_quadratic(a, b, c),
            _ => Ok(float_quadratic(a, b, c)),
        },
        _ => symbolic_quadratic(a, b, c),
    }
}

fn exact_quadratic(
    a: Rational64,
    b: Rational64,
    c: Rational64,
) -> Result<Vec<Root>, SymbolicError> {
    let (fa, fb, fc) = (
        a.to_f64().unwrap_or(f64::NAN),
        b.to_f64().unwrap_or(f64::NAN),
        c.to_f64().unwrap_or(f64::NAN),
    );
    // clear denominators so the discriminant is an integer
    let Some((a, b, discriminant)) = integer_discriminant(a, b, c) else {
        return Ok(float_quadratic(fa, fb, fc));
    };
    let Ok(magnitude) = i64::try_from(discriminant.abs()) else {
        return Ok(float_quadratic(fa, fb, fc));
    };

    let two_a = (2 * a) as f64;
    let center = -(b as f64) / two_a;
    let (outside, inside) = split_square_factor(magnitude);
    let offset = outside as f64 / two_a.abs();

    let mut radical = if inside == 1 {
        Expr::Const(1.0)
    } else {
        Expr::Const(inside as f64).sqrt()
    };
    if discriminant < 0 {
        radical = radical * Expr::var(IMAGINARY_UNIT);
    }
    let spread = offset * (inside as f64).sqrt();

    let mut roots = Vec::new();
    for sign in [-1.0, 1.0] {
        let expr = (Expr::Const(center) + Expr::Const(sign * offset) * radical.clone())
            .try_simplify()?;
        roots.push(if discriminant < 0 {
            Root {
                expr,
                re: center,
                im: sign * spread,
            }
        } else {
            Root::real(expr, center + sign * spread)
        });
    }
    Ok(roots)
}

/// a and b scaled by the common denominator of a, b, c and the scaled
/// b^2 - 4ac. `None` when a value leaves the integer range.
fn integer_discriminant(
    a: Rational64,
    b: Rational64,
    c: Rational64,
) -> Option<(i128, i128, i128)> {
    let scale = checked_lcm(checked_lcm(*a.denom(), *b.denom())?, *c.denom())?;
    let scale = Rational64::from_integer(scale);
    let a = a.checked_mul(&scale)?.to_integer() as i128;
    let b = b.checked_mul(&scale)?.to_integer() as i128;
    let c = c.checked_mul(&scale)?.to_integer() as i128;
    let four_ac = a.checked_mul(c)?.checked_mul(4)?;
    let discriminant = b.checked_mul(b)?.checked_sub(four_ac)?;
    Some((a, b, discriminant))
}

fn checked_lcm(a: i64, b: i64) -> Option<i64> {
    (a / a.gcd(&b)).checked_mul(b)
}

fn float_quadratic(a: f64, b: f64, c: f64) -> Vec<Root> {
    let discriminant = b * b - 4.0 * a * c;
    let center = -b / (2.0 * a);
    let spread = discriminant.abs().sqrt() / (2.0 * a).abs();
    [-1.0, 1.0]
        .into_iter()
        .map(|sign| {
            if discriminant >= 0.0 {
                let value = center + sign * spread;
                Root::real(Expr::Const(value), value)
            } else {
                let expr = Expr::Const(center)
                    + Expr::Const(sign * spread) * Expr::var(IMAGINARY_UNIT);
                Root {
                    expr: expr.simplify(),
                    re: center,
                    im: sign * spread,
                }
            }
        })
        .collect()
}

fn symbolic_quadratic(
    a: &CanonicalSum,
    b: &CanonicalSum,
    c: &CanonicalSum,
) -> Result<Vec<Root>, SymbolicError> {
    let (a, b, c) = (a.to_expr(), b.to_expr(), c.to_expr());
    let discriminant = b.clone() * b.clone() - Expr::Const(4.0) * a.clone() * c;
    let root_of_discriminant = discriminant.try_simplify()?.sqrt();
    let two_a = Expr::Const(2.0) * a;
    let minus_b = Expr::Const(-1.0) * b;
    let first = ((minus_b.clone() - root_of_discriminant.clone()) / two_a.clone()).try_simplify()?;
    let second = ((minus_b + root_of_discriminant) / two_a).try_simplify()?;
    Ok(vec![Root::symbolic(first), Root::symbolic(second)])
}

/// Exact coefficients c[0..=degree] when all are rational numbers.
fn rational_coefficients(
    coefficients: &BTreeMap<i64, CanonicalSum>,
    degree: i64,
) -> Option<Vec<Rational64>> {
    (0..=degree)
        .map(|power| as_rational(coefficient(coefficients, power).as_constant()?))
        .collect()
}

fn evaluate(coefficients: &[Rational64], x: f64) -> f64 {
    coefficients
        .iter()
        .rev()
        .fold(0.0, |acc, c| acc * x + c.to_f64().unwrap_or(f64::NAN))
}

/// Synthetic division by (x - root); coefficients are lowest power first.
fn deflate(coefficients: &[Rational64], root: Rational64) -> Option<Vec<Rational64>> {
    let degree = coefficients.len() - 1;
    let mut quotient = vec![Rational64::zero(); degree];
    let mut carry = Rational64::zero();
    for power in (1..=degree).rev() {
        carry = carry.checked_mul(&root)?.checked_add(&coefficients[power])?;
        quotient[power - 1] = carry;
    }
    Some(quotient)
}

/// Splits off rational roots until a quadratic (or lower) remains.
fn solve_by_deflation(mut coefficients: Vec<Rational64>) -> Option<Vec<Root>> {
    let mut roots = Vec::new();
    while coefficients.len() > 3 {
        if coefficients[0].is_zero() {
            roots.push(Root::real(Expr::Const(0.0), 0.0));
            coefficients.remove(0);
            continue;
        }
        let scale = coefficients
            .iter()
            .try_fold(1i64, |acc, c| checked_lcm(acc, *c.denom()))?;
        let scale = Rational64::from_integer(scale);
        let leading = coefficients[coefficients.len() - 1]
            .checked_mul(&scale)?
            .to_integer();
        let constant = coefficients[0].checked_mul(&scale)?.to_integer();
        let size = coefficients
            .iter()
            .map(|c| c.to_f64().unwrap_or(0.0).abs())
            .fold(1.0, f64::max);

        let mut found = None;
        'search: for p in divisors(constant) {
            for q in divisors(leading) {
                for sign in [-1, 1] {
                    let candidate = Rational64::new(sign * p, q);
                    let value = evaluate(&coefficients, candidate.to_f64().unwrap_or(f64::NAN));
                    if value.abs() <= ZERO_TOLERANCE * size * 1.0e3 {
                        found = Some(candidate);
                        break 'search;
                    }
                }
            }
        }
        let root = found?;
        roots.push(Root::real(
            Expr::Const(root.to_f64().unwrap_or(f64::NAN)),
            root.to_f64().unwrap_or(f64::NAN),
        ));
        coefficients = deflate(&coefficients, root)?;
    }
    let remaining = match coefficients.len() {
        3 => exact_quadratic(coefficients[2], coefficients[1], coefficients[0]).ok()?,
        2 => {
            let value = -(coefficients[0] / coefficients[1]);
            let value = value.to_f64().unwrap_or(f64::NAN);
            vec![Root::real(Expr::Const(value), value)]
        }
        _ => Vec::new(),
    };
    roots.extend(remaining);
    Some(roots)
}

/// c in `x**n = c` when the polynomial has only a numeric `x**n` and a
/// non-zero numeric constant term.
fn binomial_value(coefficients: &BTreeMap<i64, CanonicalSum>, degree: i64) -> Option<f64> {
    if coefficients.len() != 2 || !coefficients.contains_key(&0) {
        return None;
    }
    let leading = coefficient(coefficients, degree).as_constant()?;
    let constant = coefficient(coefficients, 0).as_constant()?;
    Some(-constant / leading)
}

/// The n roots of `x**n = value`: `|value|**(1/n)` times the unit roots at
/// angles `(phase + 2*pi*k)/n`.
fn binomial_roots(value: f64, n: i64) -> Result<Vec<Root>, SymbolicError> {
    let magnitude = Expr::Const(value.abs()).pow(Expr::Const(1.0 / n as f64));
    let radius = value.abs().powf(1.0 / n as f64);
    let phase = if value < 0.0 { PI } else { 0.0 };
    let mut roots = Vec::new();
    for k in 0..n {
        let angle = (phase + 2.0 * PI * k as f64) / n as f64;
        let (sin, cos) = angle.sin_cos();
        let (cos_expr, cos) = exact_unit_value(cos);
        let (sin_expr, sin) = exact_unit_value(sin);
        let unit = cos_expr + sin_expr * Expr::var(IMAGINARY_UNIT);
        let expr = (magnitude.clone() * unit).try_simplify()?;
        roots.push(Root {
            expr,
            re: radius * cos,
            im: radius * sin,
        });
    }
    Ok(roots)
}

/// Exact form of a sine or cosine value at a multiple of pi/4 or pi/6,
/// together with the snapped float. Other values stay floats.
fn exact_unit_value(value: f64) -> (Expr, f64) {
    let sign = if value < 0.0 { -1.0 } else { 1.0 };
    let close = |target: f64| (value.abs() - target).abs() < ZERO_TOLERANCE;
    let half_root = |n: f64| Expr::Const(sign * 0.5) * Expr::Const(n).sqrt();
    if close(0.0) {
        (Expr::Const(0.0), 0.0)
    } else if close(0.5) {
        (Expr::Const(sign * 0.5), sign * 0.5)
    } else if close(1.0) {
        (Expr::Const(sign), sign)
    } else if close(FRAC_1_SQRT_2) {
        (half_root(2.0), sign * FRAC_1_SQRT_2)
    } else if close(3f64.sqrt() / 2.0) {
        (half_root(3.0), sign * 3f64.sqrt() / 2.0)
    } else {
        (Expr::Const(value), value)
    }
}

fn sort_roots(roots: &mut [Root]) {
    roots.sort_by(|a, b| {
        let a_complex = a.im != 0.0;
        let b_complex = b.im != 0.0;
        a_complex
            .cmp(&b_complex)
            .then_with(|| a.re.total_cmp(&b.re))
            .then_with(|| a.im.total_cmp(&b.im))
    });
}
