//! # Symbolic Expression Simplification Module
//!
//! Brings expressions into a canonical **sum of terms** form. Every answer the
//! solver prints goes through here, so `2*x*x/2 + 0` and `x**2` print alike.
//!
//! ## Simplification Strategy
//!
//! 1. **Constant Folding**: arithmetic on numeric constants is evaluated
//! 2. **Atoms**: anything that is not `+ - * / ^` on constants is an *atom*:
//!    variables, function calls (with simplified arguments), sums that cannot be
//!    expanded and constant bases of irrational powers such as `sqrt(2)`
//! 3. **Monomials**: a term is `coefficient * Π atom^exponent`, exponents are
//!    exact fractions (`num::rational::Rational64`)
//! 4. **Like Term Collection**: terms with identical monomials merge (3x + 2x = 5x)
//! 5. **Expansion**: products of sums and small positive integer powers of sums
//!    are multiplied out, so polynomials always come out expanded
//!
//! ## Term order
//!
//! Generators (non-numeric atoms) are ordered variables first, then everything
//! else by printed form. Terms are sorted by their exponent vectors in
//! descending lexicographic order, so `x**2 + 3*x + 1` and `x*log(x) - x`.
//! Numeric atoms (`sqrt(2)`, `pi`, `I`) do not count as degree.
//!
//! ## Fold modes
//!
//! `FoldMode::Exact` keeps irrational constants symbolic; `FoldMode::Numeric`
//! evaluates every constant subtree in f64 (used by `evalf`).

use crate::symbolic::symbolic_engine::{Expr, IMAGINARY_UNIT};
use crate::symbolic::symbolic_error::SymbolicError;
use crate::symbolic::utils::{
    ZERO_TOLERANCE, as_rational, is_integer, rational_to_f64, split_square_factor,
};
use num::rational::Rational64;
use num_traits::{CheckedAdd, CheckedMul, One, Signed, Zero};
use std::collections::{BTreeMap, BTreeSet};

/// Highest integer power of a sum that is multiplied out.
pub const MAX_EXPANSION_POWER: i64 = 16;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FoldMode {
    Exact,
    Numeric,
}

/// Identity of an atom: its printed form plus a rank that orders
/// variables (0) before compound atoms (1) before the imaginary unit (2).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AtomKey {
    pub rank: u8,
    pub name: String,
}

impl AtomKey {
    fn of(expr: &Expr) -> AtomKey {
        let rank = match expr {
            Expr::Var(name) if name == IMAGINARY_UNIT => 2,
            Expr::Var(_) | Expr::Const(_) => 0,
            _ => 1,
        };
        AtomKey {
            rank,
            name: expr.to_cas_string(),
        }
    }
}

/// true for atoms that behave like numbers: constant bases, pi, E and I
fn is_numeric_atom(expr: &Expr) -> bool {
    match expr {
        Expr::Const(_) => true,
        Expr::Var(name) => Expr::is_named_constant(name),
        _ => false,
    }
}

/// Represents the variable part of a term (monomial).
///
/// For example the term `3*x**2*sin(x)` has monomial key
/// `{x: 2, sin(x): 1}` and coefficient `3`. `BTreeMap` keeps the key
/// canonical, so `x*y` and `y*x` compare equal.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MonomialKey(pub BTreeMap<AtomKey, Rational64>);

/// Canonical sum of terms: monomial -> coefficient, plus the atom expressions
/// the monomial keys refer to.
#[derive(Clone, Debug, Default)]
pub struct CanonicalSum {
    terms: BTreeMap<MonomialKey, f64>,
    atoms: BTreeMap<AtomKey, Expr>,
}

impl CanonicalSum {
    pub fn zero() -> Self {
        CanonicalSum::default()
    }

    pub fn constant(value: f64) -> Self {
        let mut sum = CanonicalSum::zero();
        if value.abs() >= ZERO_TOLERANCE {
            sum.terms.insert(MonomialKey::default(), value);
        }
        sum
    }

    pub fn atom(expr: Expr) -> Result<Self, SymbolicError> {
        CanonicalSum::atom_power(expr, Rational64::one())
    }

    /// `base^exponent` with `base` kept as an opaque atom.
    pub fn atom_power(base: Expr, exponent: Rational64) -> Result<Self, SymbolicError> {
        let key = AtomKey::of(&base);
        let mut sum = CanonicalSum::zero();
        sum.atoms.insert(key.clone(), base);
        let mut monomial = MonomialKey::default();
        monomial.0.insert(key, exponent);
        sum.add_term(monomial, 1.0)?;
        Ok(sum)
    }

    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn terms(&self) -> impl Iterator<Item = (&MonomialKey, f64)> {
        self.terms.iter().map(|(key, coeff)| (key, *coeff))
    }

    pub fn atom_expr(&self, key: &AtomKey) -> Option<&Expr> {
        self.atoms.get(key)
    }

    /// Value of a sum without atoms.
    pub fn as_constant(&self) -> Option<f64> {
        match self.terms.len() {
            0 => Some(0.0),
            1 => self
                .terms
                .iter()
                .next()
                .filter(|(key, _)| key.0.is_empty())
                .map(|(_, coeff)| *coeff),
            _ => None,
        }
    }

    pub fn single_term(&self) -> Option<(&MonomialKey, f64)> {
        if self.terms.len() == 1 {
            self.terms.iter().next().map(|(key, coeff)| (key, *coeff))
        } else {
            None
        }
    }

    fn merge_atoms(&mut self, other: &CanonicalSum) {
        for (key, expr) in &other.atoms {
            self.atoms.entry(key.clone()).or_insert_with(|| expr.clone());
        }
    }

    /// Adds `coeff * monomial`, folding numeric atoms first.
    fn add_term(&mut self, monomial: MonomialKey, coeff: f64) -> Result<(), SymbolicError> {
        let (monomial, coeff) = self.normalize_term(monomial, coeff)?;
        if !coeff.is_finite() {
            return Err(SymbolicError::ExponentOverflow(self.describe(&monomial)));
        }
        let entry = self.terms.entry(monomial.clone()).or_insert(0.0);
        *entry += coeff;
        if entry.abs() < ZERO_TOLERANCE {
            self.terms.remove(&monomial);
        }
        Ok(())
    }

    fn describe(&self, monomial: &MonomialKey) -> String {
        monomial
            .0
            .keys()
            .map(|atom| atom.name.as_str())
            .collect::<Vec<_>>()
            .join("*")
    }

    /// Folds integer powers of constant atoms into the coefficient, reduces
    /// powers of I and evaluates perfect powers such as sqrt(4).
    fn normalize_term(
        &mut self,
        monomial: MonomialKey,
        mut coeff: f64,
    ) -> Result<(MonomialKey, f64), SymbolicError> {
        let overflow = |atom: &AtomKey| SymbolicError::ExponentOverflow(atom.name.clone());
        let mut out: BTreeMap<AtomKey, Rational64> = BTreeMap::new();
        let mut refold = false;
        for (key, mut exponent) in monomial.0 {
            if exponent.is_zero() {
                continue;
            }
            match self.atoms.get(&key).cloned() {
                Some(Expr::Const(base)) => {
                    let whole = exponent.floor();
                    if !whole.is_zero() {
                        let power = i32::try_from(whole.to_integer()).map_err(|_| overflow(&key))?;
                        coeff *= base.powi(power);
                        exponent -= whole;
                    }
                    if exponent.is_zero() {
                        continue;
                    }
                    if base > 0.0 {
                        let value = base.powf(rational_to_f64(&exponent));
                        if as_rational(value).is_some() {
                            coeff *= value;
                            continue;
                        }
                        if is_integer(base) && *exponent.denom() == 2 {
                            // sqrt(k^2*m)**n = k**n * sqrt(m)**n
                            let (outside, inside) = split_square_factor(base as i64);
                            if outside > 1 {
                                let power =
                                    i32::try_from(*exponent.numer()).map_err(|_| overflow(&key))?;
                                coeff *= (outside as f64).powi(power);
                                let reduced = Expr::Const(inside as f64);
                                let reduced_key = AtomKey::of(&reduced);
                                self.atoms.insert(reduced_key.clone(), reduced);
                                add_exponent(&mut out, reduced_key, exponent)?;
                                refold = true;
                                continue;
                            }
                        }
                    } else if *exponent.denom() == 2 {
                        // (-c)**(k/2) = c**(k/2) * I**k
                        let positive = Expr::Const(-base);
                        let positive_key = AtomKey::of(&positive);
                        self.atoms.insert(positive_key.clone(), positive);
                        let imaginary = Expr::var(IMAGINARY_UNIT);
                        let imaginary_key = AtomKey::of(&imaginary);
                        self.atoms.insert(imaginary_key.clone(), imaginary);
                        add_exponent(&mut out, positive_key, exponent)?;
                        add_exponent(
                            &mut out,
                            imaginary_key,
                            Rational64::from_integer(*exponent.numer()),
                        )?;
                        refold = true;
                        continue;
                    }
                    add_exponent(&mut out, key, exponent)?;
                }
                _ => add_exponent(&mut out, key, exponent)?,
            }
        }
        out.retain(|_, exponent| !exponent.is_zero());
        if refold {
            return self.normalize_term(MonomialKey(out), coeff);
        }
        // I**k reduces mod 4
        let imaginary: Vec<AtomKey> = out.keys().filter(|key| key.rank == 2).cloned().collect();
        for key in imaginary {
            let Some(exponent) = out.get(&key).copied() else {
                continue;
            };
            if !exponent.is_integer() {
                continue;
            }
            let power = exponent.to_integer().rem_euclid(4);
            if power >= 2 {
                coeff = -coeff;
            }
            if power % 2 == 1 {
                out.insert(key, Rational64::one());
            } else {
                out.remove(&key);
            }
        }
        Ok((MonomialKey(out), coeff))
    }

    pub fn add(&mut self, other: &CanonicalSum) -> Result<(), SymbolicError> {
        self.merge_atoms(other);
        for (key, coeff) in &other.terms {
            self.add_term(key.clone(), *coeff)?;
        }
        Ok(())
    }

    pub fn scale(&self, factor: f64) -> Result<CanonicalSum, SymbolicError> {
        let mut out = CanonicalSum::zero();
        if factor == 0.0 {
            return Ok(out);
        }
        out.atoms = self.atoms.clone();
        for (key, coeff) in &self.terms {
            out.add_term(key.clone(), coeff * factor)?;
        }
        Ok(out)
    }

    /// Distributes the product over both sums.
    pub fn mul(&self, other: &CanonicalSum) -> Result<CanonicalSum, SymbolicError> {
        let mut out = CanonicalSum::zero();
        out.merge_atoms(self);
        out.merge_atoms(other);
        for (lhs_key, lhs_coeff) in &self.terms {
            for (rhs_key, rhs_coeff) in &other.terms {
                let mut monomial = lhs_key.0.clone();
                for (atom, exponent) in &rhs_key.0 {
                    add_exponent(&mut monomial, atom.clone(), *exponent)?;
                }
                monomial.retain(|_, exponent| !exponent.is_zero());
                out.add_term(MonomialKey(monomial), lhs_coeff * rhs_coeff)?;
            }
        }
        Ok(out)
    }

    pub fn reciprocal(&self) -> Result<CanonicalSum, SymbolicError> {
        if self.is_zero() {
            return Err(SymbolicError::DivisionByZero);
        }
        match self.single_term() {
            Some((key, coeff)) => {
                let mut out = CanonicalSum::zero();
                out.atoms = self.atoms.clone();
                let inverted = MonomialKey(
                    key.0
                        .iter()
                        .map(|(atom, exponent)| (atom.clone(), -*exponent))
                        .collect(),
                );
                out.add_term(inverted, 1.0 / coeff)?;
                Ok(out)
            }
            None => CanonicalSum::atom_power(self.to_expr(), -Rational64::one()),
        }
    }

    /// `self^exponent` for an exact fractional exponent.
    pub fn pow_rational(
        &self,
        exponent: Rational64,
        mode: FoldMode,
    ) -> Result<CanonicalSum, SymbolicError> {
        if exponent.is_zero() {
            return Ok(CanonicalSum::constant(1.0));
        }
        if self.is_zero() {
            return if exponent.is_positive() {
                Ok(CanonicalSum::zero())
            } else {
                Err(SymbolicError::DivisionByZero)
            };
        }
        if let Some((key, coeff)) = self.single_term() {
            if key.0.is_empty() && (mode == FoldMode::Numeric || exponent.is_integer()) {
                let value = coeff.powf(rational_to_f64(&exponent));
                return finite_constant(value, || format!("{}**{}", coeff, exponent));
            }
            let mut out = CanonicalSum::zero();
            out.atoms = self.atoms.clone();
            let mut monomial = BTreeMap::new();
            for (atom, e) in &key.0 {
                let scaled = e
                    .checked_mul(&exponent)
                    .ok_or_else(|| SymbolicError::ExponentOverflow(atom.name.clone()))?;
                monomial.insert(atom.clone(), scaled);
            }
            let mut new_coeff = 1.0;
            if exponent.is_integer() {
                new_coeff = integer_power(coeff, exponent.to_integer())?;
            } else if mode == FoldMode::Numeric && coeff > 0.0 {
                new_coeff = coeff.powf(rational_to_f64(&exponent));
            } else if coeff != 1.0 {
                let base = Expr::Const(coeff);
                let base_key = AtomKey::of(&base);
                out.atoms.insert(base_key.clone(), base);
                add_exponent(&mut monomial, base_key, exponent)?;
            }
            out.add_term(MonomialKey(monomial), new_coeff)?;
            return Ok(out);
        }
        if exponent.is_integer()
            && exponent.is_positive()
            && exponent.to_integer() <= MAX_EXPANSION_POWER
        {
            let mut out = CanonicalSum::constant(1.0);
            for _ in 0..exponent.to_integer() {
                out = out.mul(self)?;
            }
            return Ok(out);
        }
        CanonicalSum::atom_power(self.to_expr(), exponent)
    }

    fn power(&self, exponent: &CanonicalSum, mode: FoldMode) -> Result<CanonicalSum, SymbolicError> {
        if let Some(value) = exponent.as_constant() {
            return match as_rational(value) {
                Some(exact) => self.pow_rational(exact, mode),
                None => match self.as_constant() {
                    Some(base) => {
                        finite_constant(base.powf(value), || format!("{}**{}", base, value))
                    }
                    None => CanonicalSum::atom(self.to_expr().pow(Expr::Const(value))),
                },
            };
        }
        if self.is_euler_number() {
            return apply_function(&Expr::Const(0.0).exp(), exponent, mode);
        }
        CanonicalSum::atom(self.to_expr().pow(exponent.to_expr()))
    }

    fn is_euler_number(&self) -> bool {
        match self.single_term() {
            Some((key, coeff)) if coeff == 1.0 && key.0.len() == 1 => key
                .0
                .iter()
                .all(|(atom, e)| atom.name == "E" && e.is_one()),
            _ => false,
        }
    }

    /// Builds a canonical sum from any expression tree.
    pub fn from_expr(expr: &Expr, mode: FoldMode) -> Result<CanonicalSum, SymbolicError> {
        match expr {
            Expr::Const(value) => finite_constant(*value, || value.to_string()),
            Expr::Var(name) => match (mode, name.as_str()) {
                (FoldMode::Numeric, "pi") => Ok(CanonicalSum::constant(std::f64::consts::PI)),
                (FoldMode::Numeric, "E") => Ok(CanonicalSum::constant(std::f64::consts::E)),
                _ => CanonicalSum::atom(expr.clone()),
            },
            Expr::Add(lhs, rhs) => {
                let mut sum = CanonicalSum::from_expr(lhs, mode)?;
                sum.add(&CanonicalSum::from_expr(rhs, mode)?)?;
                Ok(sum)
            }
            Expr::Sub(lhs, rhs) => {
                let mut sum = CanonicalSum::from_expr(lhs, mode)?;
                sum.add(&CanonicalSum::from_expr(rhs, mode)?.scale(-1.0)?)?;
                Ok(sum)
            }
            Expr::Mul(lhs, rhs) => {
                let lhs = CanonicalSum::from_expr(lhs, mode)?;
                let rhs = CanonicalSum::from_expr(rhs, mode)?;
                lhs.mul(&rhs)
            }
            Expr::Div(lhs, rhs) => {
                // a/b**n stays a/b**n instead of a/(expanded b**n)
                let denominator = match rhs.as_ref() {
                    Expr::Pow(base, exponent) => {
                        let base = CanonicalSum::from_expr(base, mode)?;
                        let exponent = CanonicalSum::from_expr(exponent, mode)?;
                        base.power(&exponent.scale(-1.0)?, mode)?
                    }
                    _ => CanonicalSum::from_expr(rhs, mode)?.reciprocal()?,
                };
                CanonicalSum::from_expr(lhs, mode)?.mul(&denominator)
            }
            Expr::Pow(base, exponent) => {
                let base = CanonicalSum::from_expr(base, mode)?;
                let exponent = CanonicalSum::from_expr(exponent, mode)?;
                base.power(&exponent, mode)
            }
            func => match func.unary_arg() {
                Some(arg) => apply_function(func, &CanonicalSum::from_expr(arg, mode)?, mode),
                None => CanonicalSum::atom(func.clone()),
            },
        }
    }

    /// Generators: the non-numeric atoms that carry degree.
    fn generators(&self) -> BTreeSet<AtomKey> {
        self.terms
            .keys()
            .flat_map(|key| key.0.keys())
            .filter(|key| self.atoms.get(*key).is_none_or(|atom| !is_numeric_atom(atom)))
            .cloned()
            .collect()
    }

    fn numeric_atom_count(&self, key: &MonomialKey) -> usize {
        key.0
            .keys()
            .filter(|atom| self.atoms.get(*atom).is_some_and(is_numeric_atom))
            .count()
    }

    /// Terms in printing order.
    pub fn ordered_terms(&self) -> Vec<(&MonomialKey, f64)> {
        let generators = self.generators();
        let degree_vector = |key: &MonomialKey| -> Vec<Rational64> {
            generators
                .iter()
                .map(|g| key.0.get(g).copied().unwrap_or_else(Rational64::zero))
                .collect()
        };
        let mut ordered: Vec<(&MonomialKey, f64)> = self.terms().collect();
        ordered.sort_by(|(a, _), (b, _)| {
            degree_vector(b)
                .cmp(&degree_vector(a))
                .then_with(|| self.numeric_atom_count(a).cmp(&self.numeric_atom_count(b)))
                .then_with(|| a.cmp(b))
        });
        ordered
    }

    fn term_to_expr(&self, key: &MonomialKey, coeff: f64) -> Expr {
        let factors: Vec<Expr> = key
            .0
            .iter()
            .filter_map(|(atom, exponent)| {
                let base = self.atoms.get(atom)?.clone();
                Some(if exponent.is_one() {
                    base
                } else {
                    base.pow(Expr::Const(rational_to_f64(exponent)))
                })
            })
            .collect();
        let product = factors.into_iter().reduce(|acc, f| acc * f);
        match product {
            None => Expr::Const(coeff),
            Some(product) if coeff == 1.0 => product,
            Some(product) => Expr::Const(coeff) * product,
        }
    }

    /// Rebuilds an expression tree in canonical order.
    pub fn to_expr(&self) -> Expr {
        self.ordered_terms()
            .into_iter()
            .map(|(key, coeff)| self.term_to_expr(key, coeff))
            .reduce(|acc, term| acc + term)
            .unwrap_or(Expr::Const(0.0))
    }

    /// Splits the sum into coefficients of `var^k`. Fails when `var` appears
    /// with a non-integer or negative exponent or inside another atom.
    pub fn coefficients_in(
        &self,
        var: &str,
    ) -> Result<BTreeMap<i64, CanonicalSum>, SymbolicError> {
        let var_key = AtomKey::of(&Expr::var(var));
        let mut out: BTreeMap<i64, CanonicalSum> = BTreeMap::new();
        for (key, coeff) in self.terms() {
            let mut rest = key.clone();
            let degree = match rest.0.remove(&var_key) {
                Some(e) if e.is_integer() && !e.is_negative() => e.to_integer(),
                Some(_) => {
                    return Err(SymbolicError::EquationNotSupported(self.to_expr().to_string()));
                }
                None => 0,
            };
            if rest
                .0
                .keys()
                .any(|atom| self.atoms.get(atom).is_some_and(|a| a.contains_variable(var)))
            {
                return Err(SymbolicError::EquationNotSupported(self.to_expr().to_string()));
            }
            let entry = out.entry(degree).or_default();
            entry.merge_atoms(self);
            entry.add_term(rest, coeff)?;
        }
        out.retain(|_, c| !c.is_zero());
        Ok(out)
    }

    /// Splits the sum as `rest + factor * sqrt(atom)` where neither part holds a
    /// half-integer power of the atom. `None` when the atom also appears with
    /// another fractional exponent.
    pub fn split_radical(
        &self,
        atom: &AtomKey,
    ) -> Result<Option<(CanonicalSum, CanonicalSum)>, SymbolicError> {
        let half = Rational64::new(1, 2);
        let mut rest = CanonicalSum::zero();
        let mut factor = CanonicalSum::zero();
        rest.merge_atoms(self);
        factor.merge_atoms(self);
        for (key, coeff) in self.terms() {
            match key.0.get(atom).copied() {
                Some(e) if *e.denom() == 2 => {
                    let mut reduced = key.clone();
                    reduced.0.insert(atom.clone(), e - half);
                    factor.add_term(reduced, coeff)?;
                }
                Some(e) if !e.is_integer() => return Ok(None),
                _ => rest.add_term(key.clone(), coeff)?,
            }
        }
        Ok(Some((rest, factor)))
    }
}

/// `base^n` without truncating `n` to `i32`.
fn integer_power(base: f64, n: i64) -> Result<f64, SymbolicError> {
    if base == 1.0 {
        return Ok(1.0);
    }
    if base == -1.0 {
        return Ok(if n % 2 == 0 { 1.0 } else { -1.0 });
    }
    let power = i32::try_from(n)
        .map_err(|_| SymbolicError::ExponentOverflow(format!("{}**{}", base, n)))?;
    Ok(base.powi(power))
}

fn add_exponent(
    monomial: &mut BTreeMap<AtomKey, Rational64>,
    atom: AtomKey,
    exponent: Rational64,
) -> Result<(), SymbolicError> {
    let current = monomial.get(&atom).copied().unwrap_or_else(Rational64::zero);
    let total = current.checked_add(&exponent).ok_or_else(|| {
        SymbolicError::ExponentOverflow(format!("{}**({} + {})", atom.name, current, exponent))
    })?;
    monomial.insert(atom, total);
    Ok(())
}

fn finite_constant(
    value: f64,
    describe: impl Fn() -> String,
) -> Result<CanonicalSum, SymbolicError> {
    if value.is_finite() {
        Ok(CanonicalSum::constant(value))
    } else {
        Err(SymbolicError::Undefined(describe()))
    }
}

/// Exact values of functions at the few arguments where they are rational.
fn exact_function_value(func: &Expr, arg: f64) -> Option<f64> {
    match (func, arg) {
        (Expr::Exp(_), a) if a == 0.0 => Some(1.0),
        (Expr::Ln(_), a) if a == 1.0 => Some(0.0),
        (Expr::sin(_), a) | (Expr::tg(_), a) | (Expr::arcsin(_), a) | (Expr::arctg(_), a)
            if a == 0.0 =>
        {
            Some(0.0)
        }
        (Expr::cos(_), a) if a == 0.0 => Some(1.0),
        (Expr::arccos(_), a) if a == 1.0 => Some(0.0),
        _ => None,
    }
}

fn apply_function(
    func: &Expr,
    arg: &CanonicalSum,
    mode: FoldMode,
) -> Result<CanonicalSum, SymbolicError> {
    if let Some(value) = arg.as_constant() {
        if mode == FoldMode::Numeric {
            let result = func.eval_unary(value);
            return finite_constant(result, || {
                func.with_unary_arg(Expr::Const(value)).to_cas_string()
            });
        }
        if let Some(exact) = exact_function_value(func, value) {
            return Ok(CanonicalSum::constant(exact));
        }
        if matches!(func, Expr::Ln(_)) && value == 0.0 {
            return Err(SymbolicError::Undefined("log(0)".to_string()));
        }
    }
    let inner = arg.to_expr();
    match (func, &inner) {
        // exp(log(u)) = u
        (Expr::Exp(_), Expr::Ln(u)) => CanonicalSum::from_expr(u, mode),
        (Expr::Ln(_), Expr::Var(name)) if name == "E" => Ok(CanonicalSum::constant(1.0)),
        _ => CanonicalSum::atom(func.with_unary_arg(inner)),
    }
}

impl Expr {
    //___________________________________SIMPLIFICATION____________________________________

    /// Canonical form of the expression.
    pub fn canonical(&self, mode: FoldMode) -> Result<CanonicalSum, SymbolicError> {
        CanonicalSum::from_expr(self, mode)
    }

    /// Simplifies into canonical order; errors on division by zero or
    /// constants without a finite value.
    pub fn try_simplify(&self) -> Result<Expr, SymbolicError> {
        Ok(self.canonical(FoldMode::Exact)?.to_expr())
    }

    /// Public interface for expression simplification.
    ///
    /// Returns the expression unchanged when it cannot be brought into canonical
    /// form (e.g. it divides by zero).
    pub fn simplify(&self) -> Expr {
        self.try_simplify().unwrap_or_else(|_| self.clone())
    }

    /// Numeric simplification: every constant subtree evaluated in f64.
    pub fn simplify_numeric(&self) -> Result<Expr, SymbolicError> {
        Ok(self.canonical(FoldMode::Numeric)?.to_expr())
    }

    /// Value of the expression if it is free of atoms after simplification.
    pub fn constant_value(&self) -> Option<f64> {
        self.canonical(FoldMode::Exact).ok()?.as_constant()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canonical(s: &str) -> CanonicalSum {
        Expr::parse_expression(s)
            .unwrap()
            .canonical(FoldMode::Exact)
            .unwrap()
    }

    #[test]
    fn test_monomial_keys_are_order_independent() {
        let a = canonical("x*y*sin(x)");
        let b = canonical("sin(x)*y*x");
        let ka: Vec<&MonomialKey> = a.terms().map(|(k, _)| k).collect();
        let kb: Vec<&MonomialKey> = b.terms().map(|(k, _)| k).collect();
        assert_eq!(ka, kb);
    }

    #[test]
    fn test_as_constant() {
        assert_eq!(canonical("2*3 - 1").as_constant(), Some(5.0));
        assert_eq!(canonical("x - x").as_constant(), Some(0.0));
        assert_eq!(canonical("x + 1").as_constant(), None);
        assert_eq!(canonical("sqrt(2)").as_constant(), None);
    }

    #[test]
    fn test_coefficients_in() {
        let sum = canonical("3*x**2 + a*x - x + 7");
        let coefficients = sum.coefficients_in("x").unwrap();
        assert_eq!(coefficients.len(), 3);
        assert_eq!(coefficients[&2].as_constant(), Some(3.0));
        assert_eq!(coefficients[&1].to_expr().to_string(), "a - 1");
        assert_eq!(coefficients[&0].as_constant(), Some(7.0));
        assert!(canonical("x + exp(x)").coefficients_in("x").is_err());
        assert!(canonical("sqrt(x)").coefficients_in("x").is_err());
    }

    #[test]
    fn test_numeric_mode_folds_everything_constant() {
        let expr = Expr::parse_expression("sqrt(2)*x + pi").unwrap();
        let numeric = expr.canonical(FoldMode::Numeric).unwrap();
        let terms: Vec<(String, f64)> = numeric
            .terms()
            .map(|(k, c)| (format!("{:?}", k.0.keys().map(|a| &a.name).collect::<Vec<_>>()), c))
            .collect();
        assert_eq!(terms.len(), 2);
        assert!(terms.iter().any(|(k, c)| k == "[\"x\"]" && (c - 2f64.sqrt()).abs() < 1e-15));
        assert!(terms.iter().any(|(k, c)| k == "[]" && (c - std::f64::consts::PI).abs() < 1e-15));
    }

    #[test]
    fn test_undefined_constants() {
        let expr = Expr::parse_expression("log(0)").unwrap();
        assert!(matches!(expr.try_simplify(), Err(SymbolicError::Undefined(_))));
        let expr = Expr::parse_expression("asin(2)").unwrap();
        assert!(expr.canonical(FoldMode::Numeric).is_err());
    }

    #[test]
    fn test_exponent_overflow_is_an_error() {
        let expr = Expr::parse_expression("(x**3037000500)**3037000500").unwrap();
        assert!(matches!(
            expr.try_simplify(),
            Err(SymbolicError::ExponentOverflow(_))
        ));
        let expr = Expr::parse_expression("(2*x)**4294967297").unwrap();
        assert!(matches!(
            expr.try_simplify(),
            Err(SymbolicError::ExponentOverflow(_))
        ));
    }

    #[test]
    fn test_large_exponents_inside_range() {
        let expr = Expr::parse_expression("(x**3037000)**3037").unwrap();
        assert!(expr.try_simplify().is_ok());
        let expr = Expr::parse_expression("(-x)**3037000501").unwrap();
        assert!(expr.try_simplify().is_ok());
    }

    #[test]
    fn test_split_radical() {
        let sum = canonical("x + 3*sqrt(x) - 2");
        let x = AtomKey::of(&Expr::var("x"));
        let (rest, factor) = sum.split_radical(&x).unwrap().unwrap();
        assert_eq!(rest.to_expr().to_string(), "x - 2");
        assert_eq!(factor.as_constant(), Some(3.0));
        let mixed = canonical("sqrt(x) + x**(1/3)");
        assert!(mixed.split_radical(&x).unwrap().is_none());
    }
}
