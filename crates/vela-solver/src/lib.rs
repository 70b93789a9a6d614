//! Backend adapter interface for vela.
//!
//! This crate defines what a solver backend must provide to be driven by the
//! synchronization layer in `vela-sync`.
//!
//! # Overview
//!
//! - [`Backend`]: Trait every solver adapter implements
//! - [`BackendFactory`]: Explicit constructor value for backends
//! - [`Attribute`] / [`AttributeValue`]: Typed `get`/`set` protocol
//! - [`TerminationStatus`] / [`ResultStatus`]: Common status values
//! - [`SolverConfig`]: Configuration applied to new backends
//! - [`SolverError`] / [`CopyError`]: Error types for backend operations

mod attributes;
mod config;
mod error;
mod index;
mod status;
mod traits;

pub use attributes::{Attribute, AttributeValue};
pub use config::SolverConfig;
pub use error::{CopyError, SolverError};
pub use index::{BackendIndex, ConstraintIndex, CopyReceipt, VariableIndex};
pub use status::{ResultStatus, TerminationStatus};
pub use traits::{Backend, BackendFactory};
