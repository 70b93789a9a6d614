use serde::{Deserialize, Serialize};
use vela_expr::{ConstraintExpr, ConstraintFunction, Expr};

/// Optimization sense
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sense {
    Minimize,
    Maximize,
}

impl Sense {
    pub fn as_str(self) -> &'static str {
        match self {
            Sense::Minimize => "min",
            Sense::Maximize => "max",
        }
    }
}

/// Bound set for a variable. `None` means unbounded on that side.
///
/// A fixed variable carries only `fixed`; mixing a fixed value with lower or
/// upper bounds is a conflict.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds {
    pub lower: Option<f64>,
    pub upper: Option<f64>,
    pub fixed: Option<f64>,
}

impl Bounds {
    pub fn new(lower: f64, upper: f64) -> Self {
        Self {
            lower: Some(lower),
            upper: Some(upper),
            fixed: None,
        }
    }

    pub fn free() -> Self {
        Self::default()
    }

    pub fn lower(lower: f64) -> Self {
        Self {
            lower: Some(lower),
            ..Self::default()
        }
    }

    pub fn upper(upper: f64) -> Self {
        Self {
            upper: Some(upper),
            ..Self::default()
        }
    }

    pub fn fixed(value: f64) -> Self {
        Self {
            fixed: Some(value),
            ..Self::default()
        }
    }

    pub fn non_negative() -> Self {
        Self::lower(0.0)
    }

    pub fn is_fixed(&self) -> bool {
        self.fixed.is_some()
    }

    pub fn is_free(&self) -> bool {
        self.lower.is_none() && self.upper.is_none() && self.fixed.is_none()
    }
}

/// Integrality category of a variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum VariableCategory {
    #[default]
    Continuous,
    Integer,
    Binary,
}

impl VariableCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            VariableCategory::Continuous => "continuous",
            VariableCategory::Integer => "integer",
            VariableCategory::Binary => "binary",
        }
    }
}

/// A decision variable with bounds and a category.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Variable {
    pub bounds: Bounds,
    pub category: VariableCategory,
}

impl Variable {
    /// Create a binary variable with no explicit bounds.
    pub fn binary() -> Self {
        Self {
            bounds: Bounds::free(),
            category: VariableCategory::Binary,
        }
    }

    /// Create a continuous variable with specified bounds.
    pub fn continuous(bounds: Bounds) -> Self {
        Self {
            bounds,
            category: VariableCategory::Continuous,
        }
    }

    /// Create an integer variable with specified bounds.
    pub fn integer(bounds: Bounds) -> Self {
        Self {
            bounds,
            category: VariableCategory::Integer,
        }
    }
}

/// Objective function with a sense and one scalar expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Objective {
    pub sense: Sense,
    pub expr: Expr,
}

/// Coarse function classification used for constraint counting and backend
/// support checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FunctionKind {
    Affine,
    Quadratic,
    VectorAffine,
}

impl FunctionKind {
    pub fn of(function: &ConstraintFunction) -> Self {
        match function {
            ConstraintFunction::Scalar(expr) if expr.degree() == 2 => FunctionKind::Quadratic,
            ConstraintFunction::Scalar(_) => FunctionKind::Affine,
            ConstraintFunction::Vector(_) => FunctionKind::VectorAffine,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FunctionKind::Affine => "affine",
            FunctionKind::Quadratic => "quadratic",
            FunctionKind::VectorAffine => "vector_affine",
        }
    }
}

/// Function kind paired with a set name, e.g. `(VectorAffine, "SecondOrderCone")`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConstraintKind {
    pub function: FunctionKind,
    pub set: &'static str,
}

impl ConstraintKind {
    pub fn of(constraint: &ConstraintExpr) -> Self {
        Self {
            function: FunctionKind::of(constraint.function()),
            set: constraint.set().name(),
        }
    }
}

impl std::fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-in-{}", self.function.as_str(), self.set)
    }
}
