//! Line-oriented text form of a model.
//!
//! ```text
//! variables: x, y, _v2
//! minobjective: 1.0*x + 2.0*y
//! x >= 0.0
//! _v2 in ZeroOne()
//! cap: 1.0*x + 1.0*y <= 4.0
//! [1.0*_v2, 1.0*x, 1.0*y] in SecondOrderCone(3)
//! ```
//!
//! Bound lines use a bare variable on the left; constraint lines always write
//! coefficients, so `1.0*x <= 4.0` is a constraint and `x <= 4.0` a bound.

use vela_expr::ids::VariableId;
use vela_expr::{ConstraintFunction, ConstraintSet, Expr};

use crate::model::ModelCache;
use crate::types::{Sense, VariableCategory};

/// Prefix for variables that carry no name.
pub(crate) const UNNAMED_PREFIX: &str = "_v";

impl ModelCache {
    /// Label a variable is written under: its name, or `_v<id>`.
    pub fn variable_label(&self, id: VariableId) -> String {
        match self.variable_names.get(id) {
            Some(name) => name.to_string(),
            None => format!("{UNNAMED_PREFIX}{}", id.inner()),
        }
    }

    /// Render the model in the line-oriented text form.
    ///
    /// Floats use the shortest representation that parses back to the same
    /// value, so [`ModelCache::from_text`] recovers an equal model.
    pub fn to_text(&self) -> String {
        let mut lines = Vec::new();

        let labels: Vec<String> = self
            .variables
            .keys()
            .map(|&id| self.variable_label(id))
            .collect();
        lines.push(format!("variables: {}", labels.join(", ")));

        if let Some(objective) = &self.objective {
            let keyword = match objective.sense {
                Sense::Minimize => "minobjective",
                Sense::Maximize => "maxobjective",
            };
            lines.push(format!("{keyword}: {}", self.format_expr(&objective.expr)));
        }

        for (&id, variable) in &self.variables {
            let label = self.variable_label(id);
            let bounds = variable.bounds;
            if let Some(value) = bounds.fixed {
                lines.push(format!("{label} == {value:?}"));
            }
            if let Some(lower) = bounds.lower {
                lines.push(format!("{label} >= {lower:?}"));
            }
            if let Some(upper) = bounds.upper {
                lines.push(format!("{label} <= {upper:?}"));
            }
            match variable.category {
                VariableCategory::Continuous => {}
                VariableCategory::Integer => lines.push(format!("{label} in Integer()")),
                VariableCategory::Binary => lines.push(format!("{label} in ZeroOne()")),
            }
        }

        for (&id, constraint) in &self.constraints {
            let prefix = self
                .constraint_names
                .get(id)
                .map(|name| format!("{name}: "))
                .unwrap_or_default();
            let body = match (constraint.function(), constraint.set()) {
                (ConstraintFunction::Scalar(expr), set) => {
                    let lhs = self.format_expr(expr);
                    match *set {
                        ConstraintSet::LessThan(c) => format!("{lhs} <= {c:?}"),
                        ConstraintSet::GreaterThan(c) => format!("{lhs} >= {c:?}"),
                        ConstraintSet::EqualTo(c) => format!("{lhs} == {c:?}"),
                        set => format!("{lhs} in {set}"),
                    }
                }
                (ConstraintFunction::Vector(exprs), set) => {
                    let components: Vec<String> =
                        exprs.iter().map(|e| self.format_expr(e)).collect();
                    format!("[{}] in {set}", components.join(", "))
                }
            };
            lines.push(format!("{prefix}{body}"));
        }

        let mut text = lines.join("\n");
        text.push('\n');
        text
    }

    fn format_expr(&self, expr: &Expr) -> String {
        let mut terms: Vec<(f64, String)> = expr
            .linear_terms()
            .iter()
            .map(|&(id, coeff)| (coeff, self.variable_label(id)))
            .collect();
        terms.extend(expr.quadratic_terms().iter().map(|&(a, b, coeff)| {
            (
                coeff,
                format!("{}*{}", self.variable_label(a), self.variable_label(b)),
            )
        }));

        let mut out = String::new();
        for (coeff, body) in &terms {
            push_signed(&mut out, *coeff, Some(body));
        }
        if expr.constant() != 0.0 || out.is_empty() {
            push_signed(&mut out, expr.constant(), None);
        }
        out
    }
}

fn push_signed(out: &mut String, value: f64, body: Option<&str>) {
    let magnitude = if out.is_empty() {
        out.push_str(&format!("{value:?}"));
        None
    } else if value.is_sign_negative() {
        Some((" - ", -value))
    } else {
        Some((" + ", value))
    };
    if let Some((op, value)) = magnitude {
        out.push_str(op);
        out.push_str(&format!("{value:?}"));
    }
    if let Some(body) = body {
        out.push('*');
        out.push_str(body);
    }
}
