//! Keeps a model cache and a solver backend in step.
//!
//! [`Model`] is the entry point. It owns a [`vela_core::ModelCache`], a
//! [`SynchronizationController`] that attaches, copies into, and closes a
//! backend, and the [`ResultRecord`] of the last solve. Results are keyed by
//! stable ids and decoded into the shape of each constraint's set.

pub mod config;
pub mod controller;
pub mod error;
pub mod handle;
pub mod index_map;
pub mod logging;
pub mod model;
pub mod results;

pub use config::{Mode, ModelConfig};
pub use controller::{SyncState, SynchronizationController};
pub use error::{Error, ErrorKind};
pub use handle::BackendHandle;
pub use index_map::IndexMap;
pub use logging::enable_logging;
pub use model::Model;
pub use results::{decode, DenseMatrix, ResultRecord, ResultSummary, ResultValue};
