//! 検索オーケストレーター
//!
//! Drives one search end to end: validate, pick the adapter, build the
//! command, run the process and collect matches in arrival order.
//!
//! At most one search runs per orchestrator. Starting a new run cancels the
//! one in flight (it returns `Cancelled`), and the new process is launched
//! only after the old one has been reaped.

use crate::error::{Result, SearchError};
use crate::roots::SearchRoots;
use crate::services::backend::{BackendId, BackendRegistry};
use crate::services::process;
use crate::types::{Match, Query, ResultSet, SearchOptions};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use tokio_util::sync::CancellationToken;

struct ActiveRun {
    id: u64,
    token: CancellationToken,
}

pub struct SearchOrchestrator {
    registry: BackendRegistry,
    /// 現在実行中の検索
    current: Mutex<Option<ActiveRun>>,
    /// Held for the whole lifetime of a child process
    process_slot: tokio::sync::Mutex<()>,
    next_run_id: AtomicU64,
}

impl Default for SearchOrchestrator {
    fn default() -> Self {
        Self::new(BackendRegistry::new())
    }
}

impl SearchOrchestrator {
    pub fn new(registry: BackendRegistry) -> Self {
        Self {
            registry,
            current: Mutex::new(None),
            process_slot: tokio::sync::Mutex::new(()),
            next_run_id: AtomicU64::new(0),
        }
    }

    pub fn registry(&self) -> &BackendRegistry {
        &self.registry
    }

    /// Whether the backend is registered and its executable can be found
    pub fn is_available(&self, backend: BackendId) -> bool {
        self.registry
            .get(backend)
            .map(|adapter| adapter.is_available())
            .unwrap_or(false)
    }

    /// Runs one search and returns every match in the order the tool
    /// produced them.
    pub async fn run<I, P>(
        &self,
        query: &Query,
        roots: I,
        backend: BackendId,
        options: &SearchOptions,
    ) -> Result<ResultSet>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut results = ResultSet::new();
        self.run_with(query, roots, backend, options, |m| results.push(m))
            .await?;
        Ok(results)
    }

    /// Like `run`, but hands each match to `on_match` as soon as it is
    /// parsed. Returns the number of matches delivered.
    ///
    /// On error, matches already delivered are not retracted; the caller
    /// should discard them.
    pub async fn run_with<I, P, F>(
        &self,
        query: &Query,
        roots: I,
        backend: BackendId,
        options: &SearchOptions,
        on_match: F,
    ) -> Result<usize>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
        F: FnMut(Match),
    {
        validate_query(query)?;
        let roots = SearchRoots::new(roots)?;
        let adapter = self.registry.get(backend)?;
        let invocation = adapter.build_command(query, &roots, options)?;

        let (run_id, token) = self.begin_run();

        let _slot = tokio::select! {
            slot = self.process_slot.lock() => slot,
            _ = token.cancelled() => {
                self.finish_run(run_id);
                return Err(SearchError::Cancelled);
            }
        };

        log::info!(
            "Starting {} search for {:?} in {} root(s)",
            backend,
            query.text(),
            roots.len()
        );

        let result = process::execute(
            adapter,
            &invocation,
            roots.as_slice(),
            options,
            &token,
            on_match,
        )
        .await;

        self.finish_run(run_id);
        result
    }

    /// Cancels the search in flight, if any. Returns whether there was one.
    pub fn cancel(&self) -> bool {
        let current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        match current.as_ref() {
            Some(run) => {
                run.token.cancel();
                true
            }
            None => false,
        }
    }

    /// Whether a search is currently in flight
    pub fn is_running(&self) -> bool {
        self.current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    fn begin_run(&self) -> (u64, CancellationToken) {
        let id = self.next_run_id.fetch_add(1, Ordering::Relaxed);
        let token = CancellationToken::new();

        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = current.replace(ActiveRun {
            id,
            token: token.clone(),
        }) {
            log::info!("Replacing in-flight search");
            previous.token.cancel();
        }
        (id, token)
    }

    fn finish_run(&self, id: u64) {
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        if current.as_ref().map(|run| run.id) == Some(id) {
            *current = None;
        }
    }
}

fn validate_query(query: &Query) -> Result<()> {
    let text = query.text();
    if text.trim().is_empty() {
        return Err(SearchError::InvalidQuery("query is empty".to_string()));
    }
    if text.contains(['\n', '\r', '\0']) {
        return Err(SearchError::InvalidQuery(
            "query must be a single line".to_string(),
        ));
    }
    Ok(())
}
