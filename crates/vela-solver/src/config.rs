//! Solver configuration types.

use crate::attributes::{Attribute, AttributeValue};

/// Configuration options applied to every freshly created backend.
///
/// Each option becomes one `Backend::set` call; `None` leaves the backend's
/// own default in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SolverConfig {
    /// Time limit in seconds. `None` means no limit.
    pub time_limit: Option<f64>,
    /// Suppress solver output. `None` uses solver default.
    pub silent: Option<bool>,
    /// Number of threads to use. `None` uses solver default.
    pub threads: Option<usize>,
    /// Feasibility tolerance. `None` uses solver default.
    pub tolerance: Option<f64>,
    /// Relative MIP gap tolerance. `None` uses solver default.
    pub mip_gap: Option<f64>,
}

impl SolverConfig {
    /// Create a new configuration with all defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the time limit in seconds.
    pub fn with_time_limit(mut self, seconds: f64) -> Self {
        self.time_limit = Some(seconds);
        self
    }

    /// Enable or disable solver output.
    pub fn with_silent(mut self, silent: bool) -> Self {
        self.silent = Some(silent);
        self
    }

    /// Set the number of threads.
    pub fn with_threads(mut self, count: usize) -> Self {
        self.threads = Some(count);
        self
    }

    /// Set the feasibility tolerance.
    pub fn with_tolerance(mut self, tol: f64) -> Self {
        self.tolerance = Some(tol);
        self
    }

    /// Set the relative MIP gap tolerance.
    pub fn with_mip_gap(mut self, gap: f64) -> Self {
        self.mip_gap = Some(gap);
        self
    }

    /// Check if this configuration is completely empty (all defaults).
    pub fn is_empty(&self) -> bool {
        self.time_limit.is_none()
            && self.silent.is_none()
            && self.threads.is_none()
            && self.tolerance.is_none()
            && self.mip_gap.is_none()
    }

    /// The `set` calls this configuration turns into, in a fixed order.
    pub fn attribute_values(&self) -> Vec<(Attribute, AttributeValue)> {
        let mut values = Vec::new();
        if let Some(seconds) = self.time_limit {
            values.push((Attribute::TimeLimitSec, AttributeValue::Float(seconds)));
        }
        if let Some(silent) = self.silent {
            values.push((Attribute::Silent, AttributeValue::Bool(silent)));
        }
        if let Some(threads) = self.threads {
            values.push((Attribute::Threads, AttributeValue::Count(threads)));
        }
        if let Some(tol) = self.tolerance {
            values.push((
                Attribute::RawParameter("tolerance".to_string()),
                AttributeValue::Float(tol),
            ));
        }
        if let Some(gap) = self.mip_gap {
            values.push((
                Attribute::RawParameter("mip_gap".to_string()),
                AttributeValue::Float(gap),
            ));
        }
        values
    }
}
