//! Solver status types.

use serde::{Deserialize, Serialize};

/// Why the backend stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerminationStatus {
    /// `optimize` has not run since the last copy.
    OptimizeNotCalled,
    /// Optimal solution found.
    Optimal,
    /// Locally optimal solution found (nonconvex solvers).
    LocallySolved,
    /// Optimal within relaxed tolerances.
    AlmostOptimal,
    /// Problem is infeasible.
    Infeasible,
    /// Dual is infeasible; usually the primal is unbounded.
    DualInfeasible,
    /// Solver proved infeasibility or unboundedness without telling which.
    InfeasibleOrUnbounded,
    /// Solver reached time limit (may have feasible solution).
    TimeLimit,
    /// Solver reached iteration limit (may have feasible solution).
    IterationLimit,
    /// Branch-and-bound node limit.
    NodeLimit,
    /// Stopped after finding the requested number of solutions.
    SolutionLimit,
    /// Objective crossed a user-supplied limit.
    ObjectiveLimit,
    /// Interrupted by the user or a callback.
    Interrupted,
    /// Numerical trouble.
    NumericalError,
    /// Backend rejected the model as malformed.
    InvalidModel,
    /// Any other failure.
    OtherError,
}

impl TerminationStatus {
    /// Check if the status indicates a (locally) optimal solution.
    pub fn is_success(self) -> bool {
        matches!(
            self,
            TerminationStatus::Optimal
                | TerminationStatus::LocallySolved
                | TerminationStatus::AlmostOptimal
        )
    }

    /// Check if the solver stopped on a work or time limit.
    pub fn is_limit(self) -> bool {
        matches!(
            self,
            TerminationStatus::TimeLimit
                | TerminationStatus::IterationLimit
                | TerminationStatus::NodeLimit
                | TerminationStatus::SolutionLimit
                | TerminationStatus::ObjectiveLimit
        )
    }

    /// Check if the status indicates infeasibility or unboundedness.
    pub fn is_infeasible(self) -> bool {
        matches!(
            self,
            TerminationStatus::Infeasible
                | TerminationStatus::DualInfeasible
                | TerminationStatus::InfeasibleOrUnbounded
        )
    }

    /// Get a human-readable string representation.
    pub fn as_str(self) -> &'static str {
        match self {
            TerminationStatus::OptimizeNotCalled => "optimize_not_called",
            TerminationStatus::Optimal => "optimal",
            TerminationStatus::LocallySolved => "locally_solved",
            TerminationStatus::AlmostOptimal => "almost_optimal",
            TerminationStatus::Infeasible => "infeasible",
            TerminationStatus::DualInfeasible => "dual_infeasible",
            TerminationStatus::InfeasibleOrUnbounded => "infeasible_or_unbounded",
            TerminationStatus::TimeLimit => "time_limit",
            TerminationStatus::IterationLimit => "iteration_limit",
            TerminationStatus::NodeLimit => "node_limit",
            TerminationStatus::SolutionLimit => "solution_limit",
            TerminationStatus::ObjectiveLimit => "objective_limit",
            TerminationStatus::Interrupted => "interrupted",
            TerminationStatus::NumericalError => "numerical_error",
            TerminationStatus::InvalidModel => "invalid_model",
            TerminationStatus::OtherError => "other_error",
        }
    }
}

impl std::fmt::Display for TerminationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What a primal or dual result vector represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResultStatus {
    /// No values are available.
    NoSolution,
    /// Values form a feasible point.
    FeasiblePoint,
    /// Values are feasible within relaxed tolerances.
    NearlyFeasiblePoint,
    /// Values are available but infeasible.
    InfeasiblePoint,
    /// Values are a certificate of infeasibility (primal ray or Farkas dual).
    InfeasibilityCertificate,
    /// Values are available with unknown meaning.
    UnknownResultStatus,
}

impl ResultStatus {
    /// Check if values can be read for this result.
    pub fn has_values(self) -> bool {
        !matches!(self, ResultStatus::NoSolution)
    }

    /// Check if the values form a (nearly) feasible point.
    pub fn is_feasible(self) -> bool {
        matches!(
            self,
            ResultStatus::FeasiblePoint | ResultStatus::NearlyFeasiblePoint
        )
    }

    /// Get a human-readable string representation.
    pub fn as_str(self) -> &'static str {
        match self {
            ResultStatus::NoSolution => "no_solution",
            ResultStatus::FeasiblePoint => "feasible_point",
            ResultStatus::NearlyFeasiblePoint => "nearly_feasible_point",
            ResultStatus::InfeasiblePoint => "infeasible_point",
            ResultStatus::InfeasibilityCertificate => "infeasibility_certificate",
            ResultStatus::UnknownResultStatus => "unknown",
        }
    }
}

impl std::fmt::Display for ResultStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
