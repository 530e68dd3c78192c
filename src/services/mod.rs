//! Services module
//!
//! 外部検索ツールのアダプター（backend）と、検索を一回分実行する
//! オーケストレーター（orchestrator）を含みます。

pub mod backend;
pub mod orchestrator;
mod process;

// Re-exports for convenience
pub use backend::{BackendAdapter, BackendId, BackendRegistry, Invocation, ParsedLine};
pub use orchestrator::SearchOrchestrator;
