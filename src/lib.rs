pub mod cli;
pub mod config;
pub mod error;
pub mod report;
pub mod roots;
pub mod services;
pub mod types;

// 公開API
pub use config::{BackendSettings, Settings};
pub use error::{Result, SearchError};
pub use roots::SearchRoots;
pub use services::backend::{is_available, BackendAdapter, BackendId, BackendRegistry, Invocation};
pub use services::SearchOrchestrator;
pub use types::{CaseSensitivity, Match, Query, ResultSet, SearchOptions};
