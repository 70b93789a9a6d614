//! Result collection, storage, and decoding.

mod decode;
pub(crate) mod query;
mod record;

pub use decode::{decode, DenseMatrix, ResultValue};
pub use record::{ResultRecord, ResultSummary};
