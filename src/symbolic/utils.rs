// the collection of numeric helpers shared by the simplifier, the solver and the printer
use num::rational::Rational64;
use num_traits::ToPrimitive;

/// Largest denominator tried when recovering a fraction from an f64.
pub const MAX_DENOMINATOR: i64 = 1000;
/// Magnitude above which constants are never treated as exact fractions.
const EXACT_LIMIT: f64 = 1.0e12;
/// Terms whose coefficient falls below this are dropped as cancellation noise.
pub const ZERO_TOLERANCE: f64 = 1.0e-12;

/// true if `value` is a whole number that fits an i64 comfortably
pub fn is_integer(value: f64) -> bool {
    value.is_finite() && value.fract() == 0.0 && value.abs() < 9.0e15
}

/// Recovers p/q with q <= MAX_DENOMINATOR from a float, if one reproduces it.
///
/// 0.5 -> 1/2, 0.3333333333333333 -> 1/3, 0.1 -> 1/10, sqrt(2) -> None
pub fn as_rational(value: f64) -> Option<Rational64> {
    if !value.is_finite() || value.abs() > EXACT_LIMIT {
        return None;
    }
    if is_integer(value) {
        return Some(Rational64::from_integer(value as i64));
    }
    let tolerance = 1.0e-12 * value.abs().max(1.0);
    for q in 2..=MAX_DENOMINATOR {
        let p = (value * q as f64).round();
        if (p / q as f64 - value).abs() <= tolerance {
            return Some(Rational64::new(p as i64, q));
        }
    }
    None
}

pub fn rational_to_f64(r: &Rational64) -> f64 {
    r.to_f64().unwrap_or(f64::NAN)
}

/// Floating point rendering with `digits` significant digits.
///
/// Fixed notation while the decimal exponent lies in [-5, digits), scientific
/// (`1.00000000000000e+20`) outside of it. With `strip` trailing zeros are
/// removed but one digit after the point is kept (`1.0`, `2.5`).
pub fn format_float(value: f64, digits: usize, strip: bool) -> String {
    if value == 0.0 {
        return if strip { "0.0".to_string() } else { "0".to_string() };
    }
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "oo".to_string() } else { "-oo".to_string() };
    }
    let digits = digits.max(1);
    // rounding first fixes the exponent of values like 9.9999999999999999
    let scientific = format!("{:.*e}", digits - 1, value);
    let (mantissa, exponent) = match scientific.split_once('e') {
        Some((m, e)) => (m.to_string(), e.parse::<i32>().unwrap_or(0)),
        None => (scientific.clone(), 0),
    };
    if exponent >= -5 && exponent < digits as i32 {
        let decimals = (digits as i32 - 1 - exponent).max(1) as usize;
        let fixed = format!("{:.*}", decimals, value);
        if strip { strip_zeros(&fixed) } else { fixed }
    } else {
        let mantissa = if strip { strip_zeros(&mantissa) } else { mantissa };
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{}{}", mantissa, sign, exponent.abs())
    }
}

fn strip_zeros(number: &str) -> String {
    if !number.contains('.') {
        return number.to_string();
    }
    let trimmed = number.trim_end_matches('0');
    if trimmed.ends_with('.') {
        format!("{}0", trimmed)
    } else {
        trimmed.to_string()
    }
}

/// Largest integer that is factored by trial division.
pub const MAX_TRIAL_DIVISION: i64 = 1_000_000_000_000;

/// Splits a positive integer into k^2 * m with m square-free. Inputs above
/// [`MAX_TRIAL_DIVISION`] come back unsplit.
pub fn split_square_factor(n: i64) -> (i64, i64) {
    let mut outside = 1;
    let mut inside = n;
    if n > MAX_TRIAL_DIVISION {
        return (outside, inside);
    }
    let mut d = 2;
    while d <= inside / d {
        while inside % (d * d) == 0 {
            inside /= d * d;
            outside *= d;
        }
        d += 1;
    }
    (outside, inside)
}

/// Positive divisors of |n|, ascending. Empty for 0 and for |n| above
/// [`MAX_TRIAL_DIVISION`].
pub fn divisors(n: i64) -> Vec<i64> {
    let mut small = Vec::new();
    let mut large = Vec::new();
    let Some(n) = n.checked_abs().filter(|n| *n <= MAX_TRIAL_DIVISION) else {
        return small;
    };
    let mut d = 1;
    while d <= n / d {
        if n % d == 0 {
            small.push(d);
            if d != n / d {
                large.push(n / d);
            }
        }
        d += 1;
    }
    large.reverse();
    small.extend(large);
    small
}
