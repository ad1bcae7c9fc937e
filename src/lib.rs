pub mod apod;
pub mod core;
pub mod eval;
pub mod fetch;
pub mod gallery;
pub mod query;
pub mod repl;
pub mod search;
pub mod utils;

// Re-exports
pub use crate::apod::{ApodClient, ApodRecord, FetchError, MediaType};
pub use crate::core::config::ApodConfig;
pub use crate::core::types::ApodBackend;
pub use fetch::{QueryCache, SearchOutcome, SearchSession};
pub use query::QueryParameters;
pub use search::{build, DatePicker, SearchFields, SearchFormState, SearchMode, ValidationError};
