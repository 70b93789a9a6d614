//! Closed enumeration of constraint sets and cones.

use serde::{Deserialize, Serialize};

use crate::expr::error::SetError;

/// Set a constraint function is required to lie in.
///
/// Scalar sets take a single expression. Vector sets take one expression per
/// component; their dimension is fixed by the tag.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ConstraintSet {
    LessThan(f64),
    GreaterThan(f64),
    EqualTo(f64),
    Interval(f64, f64),
    Integer,
    ZeroOne,
    Zeros(usize),
    Nonnegatives(usize),
    Nonpositives(usize),
    /// `(t, x)` with `t >= ||x||`.
    SecondOrderCone(usize),
    /// `(t, u, x)` with `2tu >= ||x||^2`, `t, u >= 0`.
    RotatedSecondOrderCone(usize),
    /// Side dimension `n`; components are the upper triangle, column by column.
    PositiveSemidefiniteConeTriangle(usize),
    /// Side dimension `n`; components are all `n * n` entries.
    PositiveSemidefiniteConeSquare(usize),
}

/// Shape a set's values (function values, duals) decode into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetShape {
    Scalar,
    Vector(usize),
    SymmetricTriangle(usize),
    Square(usize),
}

impl ConstraintSet {
    /// Name used by the text form and by backend diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            ConstraintSet::LessThan(_) => "LessThan",
            ConstraintSet::GreaterThan(_) => "GreaterThan",
            ConstraintSet::EqualTo(_) => "EqualTo",
            ConstraintSet::Interval(..) => "Interval",
            ConstraintSet::Integer => "Integer",
            ConstraintSet::ZeroOne => "ZeroOne",
            ConstraintSet::Zeros(_) => "Zeros",
            ConstraintSet::Nonnegatives(_) => "Nonnegatives",
            ConstraintSet::Nonpositives(_) => "Nonpositives",
            ConstraintSet::SecondOrderCone(_) => "SecondOrderCone",
            ConstraintSet::RotatedSecondOrderCone(_) => "RotatedSecondOrderCone",
            ConstraintSet::PositiveSemidefiniteConeTriangle(_) => {
                "PositiveSemidefiniteConeTriangle"
            }
            ConstraintSet::PositiveSemidefiniteConeSquare(_) => "PositiveSemidefiniteConeSquare",
        }
    }

    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            ConstraintSet::LessThan(_)
                | ConstraintSet::GreaterThan(_)
                | ConstraintSet::EqualTo(_)
                | ConstraintSet::Interval(..)
                | ConstraintSet::Integer
                | ConstraintSet::ZeroOne
        )
    }

    /// Number of function components the set expects.
    pub fn dimension(&self) -> usize {
        match *self {
            ConstraintSet::Zeros(d)
            | ConstraintSet::Nonnegatives(d)
            | ConstraintSet::Nonpositives(d)
            | ConstraintSet::SecondOrderCone(d)
            | ConstraintSet::RotatedSecondOrderCone(d) => d,
            ConstraintSet::PositiveSemidefiniteConeTriangle(n) => triangular_number(n),
            ConstraintSet::PositiveSemidefiniteConeSquare(n) => n * n,
            _ => 1,
        }
    }

    pub fn shape(&self) -> SetShape {
        match *self {
            ConstraintSet::PositiveSemidefiniteConeTriangle(n) => SetShape::SymmetricTriangle(n),
            ConstraintSet::PositiveSemidefiniteConeSquare(n) => SetShape::Square(n),
            set if set.is_scalar() => SetShape::Scalar,
            set => SetShape::Vector(set.dimension()),
        }
    }

    /// Check internal consistency of the tag itself.
    pub fn validate(&self) -> Result<(), SetError> {
        match *self {
            ConstraintSet::LessThan(c) | ConstraintSet::GreaterThan(c) | ConstraintSet::EqualTo(c)
                if !c.is_finite() =>
            {
                Err(SetError::NonFiniteBound { value: c })
            }
            ConstraintSet::Interval(lower, upper) => {
                if lower.is_nan() || upper.is_nan() || lower > upper {
                    Err(SetError::InvalidInterval { lower, upper })
                } else {
                    Ok(())
                }
            }
            ConstraintSet::SecondOrderCone(d) if d < 1 => Err(SetError::ConeTooSmall {
                set: self.name(),
                dimension: d,
                minimum: 1,
            }),
            ConstraintSet::RotatedSecondOrderCone(d) if d < 2 => Err(SetError::ConeTooSmall {
                set: self.name(),
                dimension: d,
                minimum: 2,
            }),
            ConstraintSet::Zeros(0)
            | ConstraintSet::Nonnegatives(0)
            | ConstraintSet::Nonpositives(0)
            | ConstraintSet::PositiveSemidefiniteConeTriangle(0)
            | ConstraintSet::PositiveSemidefiniteConeSquare(0) => Err(SetError::ConeTooSmall {
                set: self.name(),
                dimension: 0,
                minimum: 1,
            }),
            _ => Ok(()),
        }
    }

    /// Scalar sets with a right-hand side moved by `delta`; other sets unchanged.
    pub fn shifted(&self, delta: f64) -> Self {
        match *self {
            ConstraintSet::LessThan(c) => ConstraintSet::LessThan(c + delta),
            ConstraintSet::GreaterThan(c) => ConstraintSet::GreaterThan(c + delta),
            ConstraintSet::EqualTo(c) => ConstraintSet::EqualTo(c + delta),
            ConstraintSet::Interval(l, u) => ConstraintSet::Interval(l + delta, u + delta),
            other => other,
        }
    }
}

impl std::fmt::Display for ConstraintSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            ConstraintSet::LessThan(c) => write!(f, "LessThan({c:?})"),
            ConstraintSet::GreaterThan(c) => write!(f, "GreaterThan({c:?})"),
            ConstraintSet::EqualTo(c) => write!(f, "EqualTo({c:?})"),
            ConstraintSet::Interval(l, u) => write!(f, "Interval({l:?}, {u:?})"),
            ConstraintSet::Integer | ConstraintSet::ZeroOne => write!(f, "{}()", self.name()),
            ConstraintSet::PositiveSemidefiniteConeTriangle(n)
            | ConstraintSet::PositiveSemidefiniteConeSquare(n) => {
                write!(f, "{}({n})", self.name())
            }
            _ => write!(f, "{}({})", self.name(), self.dimension()),
        }
    }
}

/// Number of entries in the upper triangle of an `n x n` matrix.
pub fn triangular_number(n: usize) -> usize {
    (n * (n + 1)) >> 1
}
