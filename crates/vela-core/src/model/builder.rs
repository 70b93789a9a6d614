//! Model builder methods for adding, changing, and removing entities.

use crate::types::{Bounds, ConstraintKind, Objective, Sense, Variable, VariableCategory};
use vela_expr::ids::{ConstraintId, EntityRef, VariableId};
use vela_expr::{ConstraintExpr, Expr};

use crate::model::error::ModelError;
use crate::model::ModelCache;

fn check_bounds(variable: VariableId, bounds: &Bounds) -> Result<(), ModelError> {
    let values = [bounds.lower, bounds.upper, bounds.fixed];
    if values.iter().flatten().any(|v| v.is_nan()) {
        return Err(ModelError::InvalidVariableBounds {
            lower: bounds.lower.unwrap_or(f64::NAN),
            upper: bounds.upper.unwrap_or(f64::NAN),
        });
    }
    if bounds.fixed.is_some() && (bounds.lower.is_some() || bounds.upper.is_some()) {
        return Err(ModelError::BoundConflict {
            variable,
            reason: "a fixed variable cannot also carry lower or upper bounds",
        });
    }
    if let (Some(lower), Some(upper)) = (bounds.lower, bounds.upper) {
        if lower > upper {
            return Err(ModelError::InvalidVariableBounds { lower, upper });
        }
    }
    Ok(())
}

impl ModelCache {
    /// Add a variable to the model.
    pub fn add_variable(
        &mut self,
        bounds: Bounds,
        category: VariableCategory,
    ) -> Result<VariableId, ModelError> {
        let id = VariableId::new(self.next_variable_id);
        check_bounds(id, &bounds)?;

        self.next_variable_id += 1;
        self.variables.insert(id, Variable { bounds, category });
        self.touch();
        Ok(id)
    }

    /// Add a constraint to the model.
    ///
    /// The pair is validated again and normalized before it is stored; every
    /// referenced variable must exist.
    pub fn add_constraint(
        &mut self,
        constraint: ConstraintExpr,
    ) -> Result<ConstraintId, ModelError> {
        let constraint = constraint.revalidate()?;
        for component in constraint.function().components() {
            self.ensure_expr_variables(component)?;
        }

        let id = ConstraintId::new(self.next_constraint_id);
        self.next_constraint_id += 1;
        let normalized = constraint.normalized();
        tracing::debug!(
            component = "model",
            operation = "add_constraint",
            status = "success",
            constraint = id.inner(),
            kind = %ConstraintKind::of(&normalized),
            "Added constraint"
        );
        self.constraints.insert(id, normalized);
        self.touch();
        Ok(id)
    }

    /// Set (or replace) the objective function.
    pub fn set_objective(&mut self, sense: Sense, expr: Expr) -> Result<(), ModelError> {
        expr.check_finite()?;
        self.ensure_expr_variables(&expr)?;

        let expr = expr.normalized();
        tracing::debug!(
            component = "model",
            operation = "set_objective",
            status = "success",
            sense = sense.as_str(),
            terms = expr.linear_terms().len() + expr.quadratic_terms().len(),
            "Set objective function"
        );
        self.objective = Some(Objective { sense, expr });
        self.touch();
        Ok(())
    }

    /// Drop the objective. A no-op (and not a mutation) if none is set.
    pub fn clear_objective(&mut self) {
        if self.objective.take().is_some() {
            self.touch();
        }
    }

    /// Remove a variable or constraint.
    ///
    /// Removing a variable drops its terms from the objective and from every
    /// constraint; vector constraints keep their dimension.
    pub fn remove(&mut self, entity: EntityRef) -> Result<(), ModelError> {
        match entity {
            EntityRef::Variable(id) => {
                self.ensure_variable_exists(id)?;
                self.variables.remove(&id);
                self.variable_names.remove(id);
                if let Some(meta) = self.variable_metadata.as_mut() {
                    meta.remove(&id);
                }
                if let Some(objective) = self.objective.as_mut() {
                    objective.expr = objective.expr.without_variable(id);
                }
                for constraint in self.constraints.values_mut() {
                    if constraint.function().references(id) {
                        *constraint = constraint.without_variable(id);
                    }
                }
            }
            EntityRef::Constraint(id) => {
                self.ensure_constraint_exists(id)?;
                self.constraints.remove(&id);
                self.constraint_names.remove(id);
                if let Some(meta) = self.constraint_metadata.as_mut() {
                    meta.remove(&id);
                }
            }
        }
        tracing::debug!(
            component = "model",
            operation = "remove",
            status = "success",
            entity = %entity,
            "Removed entity"
        );
        self.touch();
        Ok(())
    }

    fn update_bounds(
        &mut self,
        id: VariableId,
        update: impl FnOnce(Bounds) -> Result<Bounds, ModelError>,
    ) -> Result<(), ModelError> {
        let current = self.get_variable(id)?.bounds;
        let bounds = update(current)?;
        check_bounds(id, &bounds)?;
        if let Some(variable) = self.variables.get_mut(&id) {
            variable.bounds = bounds;
        }
        self.touch();
        Ok(())
    }

    /// Set or replace the lower bound. Fails on a fixed variable.
    pub fn set_lower_bound(&mut self, id: VariableId, lower: f64) -> Result<(), ModelError> {
        self.update_bounds(id, |bounds| {
            if bounds.is_fixed() {
                return Err(ModelError::BoundConflict {
                    variable: id,
                    reason: "cannot add a lower bound to a fixed variable; unfix it first",
                });
            }
            Ok(Bounds {
                lower: Some(lower),
                ..bounds
            })
        })
    }

    /// Set or replace the upper bound. Fails on a fixed variable.
    pub fn set_upper_bound(&mut self, id: VariableId, upper: f64) -> Result<(), ModelError> {
        self.update_bounds(id, |bounds| {
            if bounds.is_fixed() {
                return Err(ModelError::BoundConflict {
                    variable: id,
                    reason: "cannot add an upper bound to a fixed variable; unfix it first",
                });
            }
            Ok(Bounds {
                upper: Some(upper),
                ..bounds
            })
        })
    }

    pub fn delete_lower_bound(&mut self, id: VariableId) -> Result<(), ModelError> {
        self.update_bounds(id, |bounds| {
            Ok(Bounds {
                lower: None,
                ..bounds
            })
        })
    }

    pub fn delete_upper_bound(&mut self, id: VariableId) -> Result<(), ModelError> {
        self.update_bounds(id, |bounds| {
            Ok(Bounds {
                upper: None,
                ..bounds
            })
        })
    }

    /// Fix a variable to `value`.
    ///
    /// A variable that already has lower or upper bounds is only fixed when
    /// `force` is set, in which case those bounds are dropped.
    pub fn fix(&mut self, id: VariableId, value: f64, force: bool) -> Result<(), ModelError> {
        self.update_bounds(id, |bounds| {
            if !force && (bounds.lower.is_some() || bounds.upper.is_some()) {
                return Err(ModelError::BoundConflict {
                    variable: id,
                    reason: "variable has bounds; pass force to replace them with a fixed value",
                });
            }
            Ok(Bounds::fixed(value))
        })
    }

    /// Remove the fixed value, leaving the variable free.
    pub fn unfix(&mut self, id: VariableId) -> Result<(), ModelError> {
        self.update_bounds(id, |bounds| {
            if !bounds.is_fixed() {
                return Err(ModelError::BoundConflict {
                    variable: id,
                    reason: "variable is not fixed",
                });
            }
            Ok(Bounds::free())
        })
    }

    /// Change the integrality category of a variable.
    pub fn set_category(
        &mut self,
        id: VariableId,
        category: VariableCategory,
    ) -> Result<(), ModelError> {
        self.ensure_variable_exists(id)?;
        if let Some(variable) = self.variables.get_mut(&id) {
            variable.category = category;
        }
        self.touch();
        Ok(())
    }
}
