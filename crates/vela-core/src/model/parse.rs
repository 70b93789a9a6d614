//! Parser for the line-oriented text form emitted by [`ModelCache::to_text`].

use std::collections::HashMap;

use thiserror::Error;
use vela_expr::ids::{EntityRef, VariableId};
use vela_expr::{ConstraintExpr, ConstraintSet, Expr};

use crate::model::error::ModelError;
use crate::model::text::UNNAMED_PREFIX;
use crate::model::ModelCache;
use crate::types::{Bounds, Sense, VariableCategory};

/// Errors raised while reading the text form. Line numbers are 1-based.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("[PARSE_SYNTAX] line {line}: {message}")]
    Syntax { line: usize, message: String },
    #[error("[PARSE_UNKNOWN_VARIABLE] line {line}: unknown variable '{label}'")]
    UnknownVariable { line: usize, label: String },
    #[error("[PARSE_DUPLICATE_VARIABLE] line {line}: variable '{label}' declared twice")]
    DuplicateVariable { line: usize, label: String },
    #[error("[PARSE_MODEL] line {line}: {source}")]
    Model {
        line: usize,
        #[source]
        source: ModelError,
    },
}

impl ParseError {
    /// Returns a semantic error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            ParseError::Syntax { .. } => "PARSE_SYNTAX",
            ParseError::UnknownVariable { .. } => "PARSE_UNKNOWN_VARIABLE",
            ParseError::DuplicateVariable { .. } => "PARSE_DUPLICATE_VARIABLE",
            ParseError::Model { .. } => "PARSE_MODEL",
        }
    }

    /// Line the error was raised on.
    pub fn line(&self) -> usize {
        match self {
            ParseError::Syntax { line, .. }
            | ParseError::UnknownVariable { line, .. }
            | ParseError::DuplicateVariable { line, .. }
            | ParseError::Model { line, .. } => *line,
        }
    }
}

fn syntax(line: usize, message: impl Into<String>) -> ParseError {
    ParseError::Syntax {
        line,
        message: message.into(),
    }
}

impl ModelCache {
    /// Build a model from its text form.
    ///
    /// `_v<n>` labels declare unnamed variables. Variables receive fresh ids
    /// in declaration order.
    pub fn from_text(text: &str) -> Result<Self, ParseError> {
        let mut parser = Parser::default();
        for (index, raw) in text.lines().enumerate() {
            let content = raw.split('#').next().unwrap_or_default().trim();
            if content.is_empty() {
                continue;
            }
            parser.statement(index + 1, content)?;
        }
        tracing::debug!(
            component = "model",
            operation = "from_text",
            status = "success",
            variables = parser.model.num_variables(),
            constraints = parser.model.num_constraints(),
            "Parsed model text"
        );
        Ok(parser.model)
    }
}

#[derive(Default)]
struct Parser {
    model: ModelCache,
    labels: HashMap<String, VariableId>,
}

impl Parser {
    fn statement(&mut self, line: usize, content: &str) -> Result<(), ParseError> {
        if let Some(rest) = content.strip_prefix("variables:") {
            return self.declare(line, rest);
        }
        if let Some(rest) = content.strip_prefix("minobjective:") {
            return self.objective(line, Sense::Minimize, rest);
        }
        if let Some(rest) = content.strip_prefix("maxobjective:") {
            return self.objective(line, Sense::Maximize, rest);
        }

        let (name, body) = match content.split_once(':') {
            Some((name, body)) => (Some(name.trim()), body.trim()),
            None => (None, content),
        };

        let (lhs, set) = if let Some((lhs, set)) = body.split_once(" in ") {
            (lhs.trim(), parse_set(line, set.trim())?)
        } else if let Some((lhs, op, rhs)) = split_comparison(body) {
            let rhs = parse_number(line, rhs)?;
            let set = match op {
                "<=" => ConstraintSet::LessThan(rhs),
                ">=" => ConstraintSet::GreaterThan(rhs),
                _ => ConstraintSet::EqualTo(rhs),
            };
            (lhs, set)
        } else {
            return Err(syntax(line, format!("expected a comparison or 'in', found '{body}'")));
        };

        if name.is_none() {
            if let Some(&var) = self.labels.get(lhs) {
                return self.bound(line, var, set);
            }
        }
        self.constraint(line, name, lhs, set)
    }

    fn declare(&mut self, line: usize, rest: &str) -> Result<(), ParseError> {
        let at = |source: ModelError| ParseError::Model { line, source };
        for label in rest.split(',').map(str::trim).filter(|l| !l.is_empty()) {
            if self.labels.contains_key(label) {
                return Err(ParseError::DuplicateVariable {
                    line,
                    label: label.to_string(),
                });
            }
            let var = self
                .model
                .add_variable(Bounds::free(), VariableCategory::Continuous)
                .map_err(at)?;
            if !is_unnamed_label(label) {
                self.model
                    .set_name(EntityRef::Variable(var), label)
                    .map_err(at)?;
            }
            self.labels.insert(label.to_string(), var);
        }
        Ok(())
    }

    fn objective(&mut self, line: usize, sense: Sense, rest: &str) -> Result<(), ParseError> {
        let expr = self.expr(line, rest.trim())?;
        self.model
            .set_objective(sense, expr)
            .map_err(|source| ParseError::Model { line, source })
    }

    fn bound(&mut self, line: usize, var: VariableId, set: ConstraintSet) -> Result<(), ParseError> {
        let result = match set {
            ConstraintSet::LessThan(upper) => self.model.set_upper_bound(var, upper),
            ConstraintSet::GreaterThan(lower) => self.model.set_lower_bound(var, lower),
            ConstraintSet::EqualTo(value) => self.model.fix(var, value, false),
            ConstraintSet::Interval(lower, upper) => self
                .model
                .set_lower_bound(var, lower)
                .and_then(|()| self.model.set_upper_bound(var, upper)),
            ConstraintSet::Integer => self.model.set_category(var, VariableCategory::Integer),
            ConstraintSet::ZeroOne => self.model.set_category(var, VariableCategory::Binary),
            other => {
                return Err(syntax(
                    line,
                    format!("{} cannot constrain a bare variable", other.name()),
                ))
            }
        };
        result.map_err(|source| ParseError::Model { line, source })
    }

    fn constraint(
        &mut self,
        line: usize,
        name: Option<&str>,
        lhs: &str,
        set: ConstraintSet,
    ) -> Result<(), ParseError> {
        let at = |source: ModelError| ParseError::Model { line, source };
        let constraint = match lhs.strip_prefix('[') {
            Some(inner) => {
                let inner = inner
                    .strip_suffix(']')
                    .ok_or_else(|| syntax(line, "unterminated '[' in vector function"))?;
                let exprs = inner
                    .split(',')
                    .map(|component| self.expr(line, component.trim()))
                    .collect::<Result<Vec<_>, _>>()?;
                ConstraintExpr::vector(exprs, set)
            }
            None => ConstraintExpr::scalar(self.expr(line, lhs)?, set),
        }
        .map_err(|err| at(err.into()))?;

        let id = self.model.add_constraint(constraint).map_err(at)?;
        if let Some(name) = name {
            self.model
                .set_name(EntityRef::Constraint(id), name)
                .map_err(at)?;
        }
        Ok(())
    }

    fn expr(&self, line: usize, text: &str) -> Result<Expr, ParseError> {
        let mut linear = Vec::new();
        let mut quadratic = Vec::new();
        let mut constant = 0.0;

        let mut sign = 1.0;
        let mut expect_term = true;
        for token in text.split_whitespace() {
            if !expect_term {
                sign = match token {
                    "+" => 1.0,
                    "-" => -1.0,
                    other => {
                        return Err(syntax(line, format!("expected '+' or '-', found '{other}'")))
                    }
                };
                expect_term = true;
                continue;
            }

            let parts: Vec<&str> = token.split('*').collect();
            match parts.as_slice() {
                [single] => match self.labels.get(*single) {
                    Some(&var) => linear.push((var, sign)),
                    None => constant += sign * parse_number(line, single)?,
                },
                [coeff, var] => {
                    let coeff = sign * parse_number(line, coeff)?;
                    linear.push((self.variable(line, var)?, coeff));
                }
                [coeff, a, b] => {
                    let coeff = sign * parse_number(line, coeff)?;
                    quadratic.push((self.variable(line, a)?, self.variable(line, b)?, coeff));
                }
                _ => return Err(syntax(line, format!("term '{token}' has too many factors"))),
            }
            expect_term = false;
        }
        if expect_term {
            return Err(syntax(line, format!("incomplete expression '{text}'")));
        }
        Ok(Expr::new_quadratic(linear, quadratic, constant))
    }

    fn variable(&self, line: usize, label: &str) -> Result<VariableId, ParseError> {
        self.labels
            .get(label)
            .copied()
            .ok_or_else(|| ParseError::UnknownVariable {
                line,
                label: label.to_string(),
            })
    }
}

fn is_unnamed_label(label: &str) -> bool {
    label
        .strip_prefix(UNNAMED_PREFIX)
        .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
}

fn split_comparison(body: &str) -> Option<(&str, &'static str, &str)> {
    ["<=", ">=", "=="].into_iter().find_map(|op| {
        body.split_once(op)
            .map(|(lhs, rhs)| (lhs.trim(), op, rhs.trim()))
    })
}

fn parse_number(line: usize, text: &str) -> Result<f64, ParseError> {
    text.parse::<f64>()
        .map_err(|_| syntax(line, format!("expected a number, found '{text}'")))
}

fn parse_dimension(line: usize, text: &str) -> Result<usize, ParseError> {
    text.parse::<usize>()
        .map_err(|_| syntax(line, format!("expected a dimension, found '{text}'")))
}

fn parse_set(line: usize, text: &str) -> Result<ConstraintSet, ParseError> {
    let (name, args) = text
        .strip_suffix(')')
        .and_then(|t| t.split_once('('))
        .ok_or_else(|| syntax(line, format!("expected a set like Name(...), found '{text}'")))?;
    let args: Vec<&str> = args
        .split(',')
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .collect();

    let set = match (name.trim(), args.as_slice()) {
        ("Integer", []) => ConstraintSet::Integer,
        ("ZeroOne", []) => ConstraintSet::ZeroOne,
        ("LessThan", [c]) => ConstraintSet::LessThan(parse_number(line, c)?),
        ("GreaterThan", [c]) => ConstraintSet::GreaterThan(parse_number(line, c)?),
        ("EqualTo", [c]) => ConstraintSet::EqualTo(parse_number(line, c)?),
        ("Interval", [l, u]) => {
            ConstraintSet::Interval(parse_number(line, l)?, parse_number(line, u)?)
        }
        ("Zeros", [d]) => ConstraintSet::Zeros(parse_dimension(line, d)?),
        ("Nonnegatives", [d]) => ConstraintSet::Nonnegatives(parse_dimension(line, d)?),
        ("Nonpositives", [d]) => ConstraintSet::Nonpositives(parse_dimension(line, d)?),
        ("SecondOrderCone", [d]) => ConstraintSet::SecondOrderCone(parse_dimension(line, d)?),
        ("RotatedSecondOrderCone", [d]) => {
            ConstraintSet::RotatedSecondOrderCone(parse_dimension(line, d)?)
        }
        ("PositiveSemidefiniteConeTriangle", [n]) => {
            ConstraintSet::PositiveSemidefiniteConeTriangle(parse_dimension(line, n)?)
        }
        ("PositiveSemidefiniteConeSquare", [n]) => {
            ConstraintSet::PositiveSemidefiniteConeSquare(parse_dimension(line, n)?)
        }
        (other, _) => return Err(syntax(line, format!("unknown set '{other}'"))),
    };
    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_set_forms() {
        assert_eq!(
            parse_set(1, "Interval(1.0, 2.5)").unwrap(),
            ConstraintSet::Interval(1.0, 2.5)
        );
        assert_eq!(parse_set(1, "ZeroOne()").unwrap(), ConstraintSet::ZeroOne);
        assert_eq!(
            parse_set(1, "PositiveSemidefiniteConeTriangle(2)").unwrap(),
            ConstraintSet::PositiveSemidefiniteConeTriangle(2)
        );
        assert_eq!(parse_set(3, "Blob(2)").unwrap_err().line(), 3);
    }

    #[test]
    fn unnamed_labels() {
        assert!(is_unnamed_label("_v0"));
        assert!(is_unnamed_label("_v12"));
        assert!(!is_unnamed_label("_v"));
        assert!(!is_unnamed_label("_vx"));
    }

    #[test]
    fn unknown_variable_reports_line() {
        let err = ModelCache::from_text("variables: x\n\nc: 1.0*y <= 1.0\n").unwrap_err();
        assert_eq!(
            err,
            ParseError::UnknownVariable {
                line: 3,
                label: "y".to_string()
            }
        );
        assert_eq!(err.code(), "PARSE_UNKNOWN_VARIABLE");
    }

    #[test]
    fn dangling_operator_is_syntax_error() {
        let err = ModelCache::from_text("variables: x\nminobjective: 1.0*x +\n").unwrap_err();
        assert!(matches!(err, ParseError::Syntax { line: 2, .. }));
    }
}
