//! Search settings.
//!
//! The host owns where settings come from (editor settings, a JSON file, CLI
//! flags); this module only defines their shape and defaults.

use crate::services::backend::BackendId;
use crate::types::{SearchOptions, DEFAULT_MAX_TEXT_LEN};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Per-backend overrides
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendSettings {
    /// Executable to run instead of the default program name
    pub executable: Option<PathBuf>,
    /// Extra arguments passed before the query
    pub extra_args: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Backend to use; `None` picks the best available one
    pub backend: Option<BackendId>,
    pub backends: BTreeMap<BackendId, BackendSettings>,
    pub max_text_len: Option<usize>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            backend: None,
            backends: BTreeMap::new(),
            max_text_len: Some(DEFAULT_MAX_TEXT_LEN),
        }
    }
}

impl Settings {
    /// Options for a run, with `whole_word` supplied by the caller
    pub fn search_options(&self, whole_word: bool) -> SearchOptions {
        SearchOptions {
            whole_word,
            max_text_len: self.max_text_len,
        }
    }

    pub fn backend_settings_mut(&mut self, id: BackendId) -> &mut BackendSettings {
        self.backends.entry(id).or_default()
    }
}
