pub mod cache;
pub mod client;
pub mod loader;
pub mod query;

pub use crate::domain::model::{
    CombinedError, FailureKind, LoadFailure, OperationResult, PageData, ReportRecord,
};
pub use crate::domain::ports::{fetch_fn, Fetch, FetchRequest, FetchResponse, LoadContext};
pub use crate::utils::error::Result;
