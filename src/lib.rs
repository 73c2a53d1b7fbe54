pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, LoadSettings};

pub use adapters::http::ReqwestFetch;
pub use crate::core::client::{create_client, create_client_with, Client, ClientOptions, RequestPolicy};
pub use crate::core::loader::{load, ClientScope, PageLoader};
pub use crate::core::query::{ReportPeriod, REPORT_PERIOD_QUERY, REPORT_QUERY};
pub use domain::model::{FailureKind, LoadFailure, PageData, ReportRecord, LOAD_FAILED_MESSAGE};
pub use domain::ports::{fetch_fn, Fetch, FetchRequest, FetchResponse, LoadContext};
pub use utils::error::{LoaderError, Result};
