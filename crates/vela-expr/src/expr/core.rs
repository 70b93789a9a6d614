//! Core expression type: terms by degree + constant.
//!
//! Stores terms in separate Vecs per degree:
//! - linear:    (VarId, f64)
//! - quadratic: (VarId, VarId, f64), read as `coeff * a * b`
//!
//! User-facing API is degree-agnostic. Degree partitioning is an
//! internal detail only exposed at the backend boundary.

use crate::expr::constraint::{ConstraintExpr, ConstraintFunction};
use crate::expr::error::ExprError;
use crate::expr::sets::ConstraintSet;
use crate::ids::VariableId;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Expr {
    constant: f64,
    linear: Vec<(VariableId, f64)>,
    quadratic: Vec<(VariableId, VariableId, f64)>,
}

impl Expr {
    // ── Constructors ────────────────────────────────────────

    /// Empty expression (all zeros).
    pub fn new_empty() -> Self {
        Self::default()
    }

    /// Expression from linear terms and constant.
    pub fn new(linear: Vec<(VariableId, f64)>, constant: f64) -> Self {
        Self {
            constant,
            linear,
            ..Default::default()
        }
    }

    /// Expression from linear terms, quadratic terms and constant.
    pub fn new_quadratic(
        linear: Vec<(VariableId, f64)>,
        quadratic: Vec<(VariableId, VariableId, f64)>,
        constant: f64,
    ) -> Self {
        Self {
            constant,
            linear,
            quadratic,
        }
    }

    /// Just a constant, no variable terms.
    pub fn from_constant(constant: f64) -> Self {
        Self {
            constant,
            ..Default::default()
        }
    }

    /// Single linear term: coeff * var.
    pub fn term(var_id: VariableId, coeff: f64) -> Self {
        if coeff == 0.0 {
            return Self::default();
        }
        Self {
            linear: vec![(var_id, coeff)],
            ..Default::default()
        }
    }

    /// Single quadratic term: coeff * a * b.
    pub fn quad_term(a: VariableId, b: VariableId, coeff: f64) -> Self {
        if coeff == 0.0 {
            return Self::default();
        }
        Self {
            quadratic: vec![(a, b, coeff)],
            ..Default::default()
        }
    }

    /// Single variable with coefficient 1.0.
    pub fn var(var_id: VariableId) -> Self {
        Self {
            linear: vec![(var_id, 1.0)],
            ..Default::default()
        }
    }

    /// From raw linear terms, no constant.
    pub fn from_linear(linear: Vec<(VariableId, f64)>) -> Self {
        Self {
            linear,
            ..Default::default()
        }
    }

    // ── Accessors ───────────────────────────────────────────

    pub fn constant(&self) -> f64 {
        self.constant
    }

    pub fn linear_terms(&self) -> &[(VariableId, f64)] {
        &self.linear
    }

    pub fn quadratic_terms(&self) -> &[(VariableId, VariableId, f64)] {
        &self.quadratic
    }

    /// Consume and return linear terms.
    pub fn into_linear_terms(self) -> Vec<(VariableId, f64)> {
        self.linear
    }

    /// Max degree of any term (0 = constant only).
    pub fn degree(&self) -> usize {
        if !self.quadratic.is_empty() {
            2
        } else {
            usize::from(!self.linear.is_empty())
        }
    }

    /// Every variable referenced by a term, in term order, duplicates included.
    pub fn variables(&self) -> impl Iterator<Item = VariableId> + '_ {
        self.linear
            .iter()
            .map(|(v, _)| *v)
            .chain(self.quadratic.iter().flat_map(|(a, b, _)| [*a, *b]))
    }

    /// True if any term references `var_id`.
    pub fn references(&self, var_id: VariableId) -> bool {
        self.variables().any(|v| v == var_id)
    }

    /// Check that the constant and every coefficient are finite.
    pub fn check_finite(&self) -> Result<(), ExprError> {
        let coefficients = std::iter::once(self.constant)
            .chain(self.linear.iter().map(|(_, c)| *c))
            .chain(self.quadratic.iter().map(|(_, _, c)| *c));
        for coefficient in coefficients {
            if !coefficient.is_finite() {
                return Err(ExprError::NonFiniteCoefficient { coefficient });
            }
        }
        Ok(())
    }

    // ── Operations (degree-agnostic) ────────────────────────

    /// Scale all terms and constant by a factor.
    pub fn scale(&self, by: f64) -> Self {
        Self {
            constant: self.constant * by,
            linear: self
                .linear
                .iter()
                .map(|(v, c)| (*v, *c * by))
                .filter(|(_, c)| *c != 0.0)
                .collect(),
            quadratic: self
                .quadratic
                .iter()
                .map(|(a, b, c)| (*a, *b, *c * by))
                .filter(|(_, _, c)| *c != 0.0)
                .collect(),
        }
    }

    /// Add another expression (merges all degree terms + constants).
    pub fn add(&self, other: &Expr) -> Self {
        let mut linear = Vec::with_capacity(self.linear.len() + other.linear.len());
        linear.extend_from_slice(&self.linear);
        linear.extend_from_slice(&other.linear);

        let mut quadratic = Vec::with_capacity(self.quadratic.len() + other.quadratic.len());
        quadratic.extend_from_slice(&self.quadratic);
        quadratic.extend_from_slice(&other.quadratic);

        Self {
            constant: self.constant + other.constant,
            linear,
            quadratic,
        }
    }

    /// Product of two expressions. Fails if the result would exceed degree 2.
    pub fn product(&self, other: &Expr) -> Result<Self, ExprError> {
        let degree = self.degree() + other.degree();
        if degree > 2 {
            return Err(ExprError::DegreeOverflow { degree });
        }

        let mut out = self.scale(other.constant).add(&other.scale(self.constant));
        out.constant = self.constant * other.constant;
        for (a, ca) in &self.linear {
            for (b, cb) in &other.linear {
                out.quadratic.push((*a, *b, ca * cb));
            }
        }
        Ok(out)
    }

    /// Add a constant offset.
    pub fn add_constant(&self, value: f64) -> Self {
        Self {
            constant: self.constant + value,
            linear: self.linear.clone(),
            quadratic: self.quadratic.clone(),
        }
    }

    /// Copy with constant set to zero.
    pub fn without_constant(&self) -> Self {
        Self {
            constant: 0.0,
            linear: self.linear.clone(),
            quadratic: self.quadratic.clone(),
        }
    }

    /// Copy with every term mentioning `var_id` dropped.
    pub fn without_variable(&self, var_id: VariableId) -> Self {
        Self {
            constant: self.constant,
            linear: self
                .linear
                .iter()
                .filter(|(v, _)| *v != var_id)
                .copied()
                .collect(),
            quadratic: self
                .quadratic
                .iter()
                .filter(|(a, b, _)| *a != var_id && *b != var_id)
                .copied()
                .collect(),
        }
    }

    /// Merged linear terms with duplicates combined.
    pub fn normalized_terms(&self) -> Vec<(VariableId, f64)> {
        let mut merged: BTreeMap<VariableId, f64> = BTreeMap::new();
        for (var_id, coeff) in &self.linear {
            if *coeff == 0.0 {
                continue;
            }
            *merged.entry(*var_id).or_insert(0.0) += *coeff;
        }
        merged.into_iter().filter(|(_, c)| *c != 0.0).collect()
    }

    /// Canonical form: duplicates merged, zeros dropped, linear terms ordered
    /// by variable, quadratic pairs stored as `(min, max)` and ordered.
    pub fn normalized(&self) -> Self {
        let mut quadratic: BTreeMap<(VariableId, VariableId), f64> = BTreeMap::new();
        for (a, b, coeff) in &self.quadratic {
            if *coeff == 0.0 {
                continue;
            }
            let key = if a <= b { (*a, *b) } else { (*b, *a) };
            *quadratic.entry(key).or_insert(0.0) += *coeff;
        }
        Self {
            constant: self.constant,
            linear: self.normalized_terms(),
            quadratic: quadratic
                .into_iter()
                .filter(|(_, c)| *c != 0.0)
                .map(|((a, b), c)| (a, b, c))
                .collect(),
        }
    }

    /// Evaluate with a per-variable value source.
    ///
    /// Returns `None` as soon as a referenced variable has no value.
    pub fn evaluate<F>(&self, mut value: F) -> Option<f64>
    where
        F: FnMut(VariableId) -> Option<f64>,
    {
        let mut total = self.constant;
        for (var_id, coeff) in &self.linear {
            total += coeff * value(*var_id)?;
        }
        for (a, b, coeff) in &self.quadratic {
            total += coeff * value(*a)? * value(*b)?;
        }
        Some(total)
    }

    // ── Comparison methods (produce ConstraintExpr) ─────────

    fn compare_scalar(&self, set: ConstraintSet) -> ConstraintExpr {
        let shifted = set.shifted(-self.constant);
        ConstraintExpr::from_parts(ConstraintFunction::Scalar(self.without_constant()), shifted)
    }

    pub fn le_scalar(&self, rhs: f64) -> ConstraintExpr {
        self.compare_scalar(ConstraintSet::LessThan(rhs))
    }

    pub fn ge_scalar(&self, rhs: f64) -> ConstraintExpr {
        self.compare_scalar(ConstraintSet::GreaterThan(rhs))
    }

    pub fn eq_scalar(&self, rhs: f64) -> ConstraintExpr {
        self.compare_scalar(ConstraintSet::EqualTo(rhs))
    }

    pub fn le_expr(&self, rhs: &Expr) -> ConstraintExpr {
        self.add(&rhs.scale(-1.0)).le_scalar(0.0)
    }

    pub fn ge_expr(&self, rhs: &Expr) -> ConstraintExpr {
        self.add(&rhs.scale(-1.0)).ge_scalar(0.0)
    }

    pub fn eq_expr(&self, rhs: &Expr) -> ConstraintExpr {
        self.add(&rhs.scale(-1.0)).eq_scalar(0.0)
    }
}

// ── Operator overloads ──────────────────────────────────────

impl std::ops::Add for Expr {
    type Output = Expr;

    fn add(self, rhs: Expr) -> Self::Output {
        Expr::add(&self, &rhs)
    }
}

impl std::ops::Sub for Expr {
    type Output = Expr;

    fn sub(self, rhs: Expr) -> Self::Output {
        Expr::add(&self, &rhs.scale(-1.0))
    }
}

impl std::ops::Mul<f64> for Expr {
    type Output = Expr;

    fn mul(self, rhs: f64) -> Self::Output {
        self.scale(rhs)
    }
}

impl std::ops::Neg for Expr {
    type Output = Expr;

    fn neg(self) -> Self::Output {
        self.scale(-1.0)
    }
}

impl From<VariableId> for Expr {
    fn from(var_id: VariableId) -> Self {
        Expr::var(var_id)
    }
}
