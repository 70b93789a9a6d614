//! Constraint expressions: a function paired with a validated set.

use crate::expr::core::Expr;
use crate::expr::error::SetError;
use crate::expr::sets::ConstraintSet;
use crate::ids::VariableId;

/// Function side of a constraint.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstraintFunction {
    Scalar(Expr),
    Vector(Vec<Expr>),
}

impl ConstraintFunction {
    pub fn scalar(&self) -> Option<&Expr> {
        match self {
            ConstraintFunction::Scalar(expr) => Some(expr),
            ConstraintFunction::Vector(_) => None,
        }
    }

    /// Components in order; a scalar function has exactly one.
    pub fn components(&self) -> &[Expr] {
        match self {
            ConstraintFunction::Scalar(expr) => std::slice::from_ref(expr),
            ConstraintFunction::Vector(exprs) => exprs,
        }
    }

    pub fn dimension(&self) -> usize {
        self.components().len()
    }

    pub fn degree(&self) -> usize {
        self.components().iter().map(Expr::degree).max().unwrap_or(0)
    }

    pub fn variables(&self) -> impl Iterator<Item = VariableId> + '_ {
        self.components().iter().flat_map(Expr::variables)
    }

    pub fn references(&self, var_id: VariableId) -> bool {
        self.components().iter().any(|e| e.references(var_id))
    }

    pub(crate) fn map(&self, f: impl Fn(&Expr) -> Expr) -> Self {
        match self {
            ConstraintFunction::Scalar(expr) => ConstraintFunction::Scalar(f(expr)),
            ConstraintFunction::Vector(exprs) => {
                ConstraintFunction::Vector(exprs.iter().map(f).collect())
            }
        }
    }
}

/// A function/set pair accepted by the model cache.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintExpr {
    function: ConstraintFunction,
    set: ConstraintSet,
}

impl ConstraintExpr {
    /// Validating constructor: checks the set tag, the function's shape against
    /// the set's dimension, and degree compatibility.
    pub fn new(function: ConstraintFunction, set: ConstraintSet) -> Result<Self, SetError> {
        set.validate()?;
        for component in function.components() {
            component.check_finite()?;
        }

        match (&function, set.is_scalar()) {
            (ConstraintFunction::Vector(_), true) => {
                return Err(SetError::ScalarExpected { set: set.name() })
            }
            (ConstraintFunction::Scalar(_), false) => {
                return Err(SetError::VectorExpected { set: set.name() })
            }
            (ConstraintFunction::Vector(exprs), false) if exprs.len() != set.dimension() => {
                return Err(SetError::DimensionMismatch {
                    set: set.name(),
                    expected: set.dimension(),
                    actual: exprs.len(),
                })
            }
            _ => {}
        }

        let degree = function.degree();
        let max_degree = match set {
            ConstraintSet::Integer | ConstraintSet::ZeroOne => 1,
            s if s.is_scalar() => 2,
            _ => 1,
        };
        if degree > max_degree {
            return Err(SetError::DegreeUnsupported {
                set: set.name(),
                degree,
            });
        }

        Ok(Self { function, set })
    }

    /// Scalar shorthand for `new(ConstraintFunction::Scalar(expr), set)`.
    pub fn scalar(expr: Expr, set: ConstraintSet) -> Result<Self, SetError> {
        Self::new(ConstraintFunction::Scalar(expr), set)
    }

    /// Vector shorthand for `new(ConstraintFunction::Vector(exprs), set)`.
    pub fn vector(exprs: Vec<Expr>, set: ConstraintSet) -> Result<Self, SetError> {
        Self::new(ConstraintFunction::Vector(exprs), set)
    }

    /// Pair built by the comparison helpers on `Expr`; validated again on insertion.
    pub(crate) fn from_parts(function: ConstraintFunction, set: ConstraintSet) -> Self {
        Self { function, set }
    }

    pub fn function(&self) -> &ConstraintFunction {
        &self.function
    }

    pub fn set(&self) -> &ConstraintSet {
        &self.set
    }

    pub fn into_parts(self) -> (ConstraintFunction, ConstraintSet) {
        (self.function, self.set)
    }

    /// Canonical copy with every component normalized.
    pub fn normalized(&self) -> Self {
        Self {
            function: self.function.map(Expr::normalized),
            set: self.set,
        }
    }

    /// Copy with every term mentioning `var_id` dropped; dimension is preserved.
    pub fn without_variable(&self, var_id: VariableId) -> Self {
        Self {
            function: self.function.map(|e| e.without_variable(var_id)),
            set: self.set,
        }
    }

    /// Re-run the constructor checks on an already built pair.
    pub fn revalidate(self) -> Result<Self, SetError> {
        Self::new(self.function, self.set)
    }
}
