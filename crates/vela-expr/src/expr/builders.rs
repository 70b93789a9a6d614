//! Builder functions for constructing expressions.

use crate::expr::core::Expr;
use crate::expr::error::ExprError;
use crate::ids::VariableId;

/// Build an Expr from flexible inputs.
///
/// Accepts either:
/// - `terms`: pre-paired (VariableId, f64) tuples
/// - `variables` + `coefficients`: separate vecs zipped together
///
/// Returns an error if both styles are mixed or if lengths mismatch.
pub fn linear_terms(
    terms: Option<Vec<(VariableId, f64)>>,
    variables: Option<Vec<VariableId>>,
    coefficients: Option<Vec<f64>>,
) -> Result<Expr, ExprError> {
    match (terms, variables, coefficients) {
        (Some(t), None, None) => {
            let filtered: Vec<_> = t.into_iter().filter(|(_, c)| *c != 0.0).collect();
            Ok(Expr::from_linear(filtered))
        }
        (None, Some(vars), Some(coeffs)) => {
            if vars.len() != coeffs.len() {
                return Err(ExprError::MismatchedLengths);
            }
            let filtered: Vec<_> = vars
                .into_iter()
                .zip(coeffs)
                .filter(|(_, c)| *c != 0.0)
                .collect();
            Ok(Expr::from_linear(filtered))
        }
        (None, _, _) => Err(ExprError::MissingInputs),
        (Some(_), _, _) => Err(ExprError::MixedInputs),
    }
}

/// Sum of expressions, all degrees and constants included.
///
/// Duplicate variable terms are NOT merged; the model cache normalizes on insertion.
pub fn linear_sum(exprs: Vec<Expr>) -> Expr {
    exprs
        .iter()
        .fold(Expr::new_empty(), |acc, expr| acc.add(expr))
}

/// One scalar component per variable, in order; handy for cone constraints.
pub fn vector_of(vars: &[VariableId]) -> Vec<Expr> {
    vars.iter().copied().map(Expr::var).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_terms_filters_zero_coefficients() {
        let expr = linear_terms(
            Some(vec![(VariableId::new(1), 0.0), (VariableId::new(2), 3.5)]),
            None,
            None,
        )
        .expect("linear_terms should succeed");

        let terms = expr
            .linear_terms()
            .iter()
            .map(|(id, coeff)| (id.inner(), *coeff))
            .collect::<Vec<_>>();
        assert_eq!(terms, vec![(2, 3.5)]);
    }

    #[test]
    fn vector_of_builds_unit_components() {
        let comps = vector_of(&[VariableId::new(0), VariableId::new(3)]);
        assert_eq!(comps.len(), 2);
        assert_eq!(comps[1].linear_terms(), &[(VariableId::new(3), 1.0)]);
    }
}
