//! 検索バックエンドモジュール
//!
//! 外部検索ツール（grep、ack、ag、pt、ripgrep、git grep、findstr）を
//! 統一インターフェースで扱うためのアダプターとレジストリを提供します。
//! Each tool is a row in a table (`spec.rs` plus one file per tool); the
//! adapter dispatches on the row instead of on a trait object.

use crate::config::Settings;
use crate::error::{Result, SearchError};
use crate::roots::SearchRoots;
use crate::types::{Query, SearchOptions};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

mod ack;
mod ag;
mod findstr;
mod git_grep;
mod grep;
pub mod parser;
mod pt;
mod ripgrep;
pub mod spec;

pub use parser::{ParseContext, ParsedLine};
pub use spec::{BackendSpec, Invocation};

/// 検索バックエンドの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendId {
    Grep,
    Ack,
    #[serde(alias = "the_silver_searcher")]
    Ag,
    Pt,
    #[serde(rename = "rg", alias = "ripgrep")]
    Ripgrep,
    #[serde(alias = "git-grep")]
    GitGrep,
    Findstr,
}

impl BackendId {
    /// 優先順位順（自動選択で使用）
    pub const ALL: [BackendId; 7] = [
        BackendId::Ripgrep,
        BackendId::Ag,
        BackendId::Pt,
        BackendId::Ack,
        BackendId::GitGrep,
        BackendId::Grep,
        BackendId::Findstr,
    ];

    /// バックエンドの名前を取得
    pub fn name(&self) -> &'static str {
        match self {
            BackendId::Grep => "grep",
            BackendId::Ack => "ack",
            BackendId::Ag => "ag",
            BackendId::Pt => "pt",
            BackendId::Ripgrep => "rg",
            BackendId::GitGrep => "git_grep",
            BackendId::Findstr => "findstr",
        }
    }

    /// バックエンドの説明を取得
    pub fn description(&self) -> &'static str {
        match self {
            BackendId::Grep => "grep - POSIX line search, recursive",
            BackendId::Ack => "ack - A grep-like tool for programmers",
            BackendId::Ag => "the_silver_searcher - A code searching tool similar to ack",
            BackendId::Pt => "the_platinum_searcher - A code search tool similar to ag",
            BackendId::Ripgrep => "ripgrep - Fast line-oriented search tool",
            BackendId::GitGrep => "git grep - Search tracked files of a git work tree",
            BackendId::Findstr => "findstr - Windows built-in string search",
        }
    }

    pub(crate) fn spec(self) -> &'static BackendSpec {
        match self {
            BackendId::Grep => &grep::SPEC,
            BackendId::Ack => &ack::SPEC,
            BackendId::Ag => &ag::SPEC,
            BackendId::Pt => &pt::SPEC,
            BackendId::Ripgrep => &ripgrep::SPEC,
            BackendId::GitGrep => &git_grep::SPEC,
            BackendId::Findstr => &findstr::SPEC,
        }
    }
}

impl fmt::Display for BackendId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BackendId {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "grep" => Ok(BackendId::Grep),
            "ack" => Ok(BackendId::Ack),
            "ag" | "the_silver_searcher" => Ok(BackendId::Ag),
            "pt" => Ok(BackendId::Pt),
            "rg" | "ripgrep" => Ok(BackendId::Ripgrep),
            "git_grep" | "git-grep" => Ok(BackendId::GitGrep),
            "findstr" => Ok(BackendId::Findstr),
            _ => Err(SearchError::UnknownBackend(s.to_string())),
        }
    }
}

/// Whether the backend's executable can be located, without running a search.
///
/// `executable` overrides the default program name; it may be a bare name
/// (looked up on `PATH`) or a path.
pub fn is_available(id: BackendId, executable: Option<&Path>) -> bool {
    let program = executable
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(id.spec().program));

    match which::which(&program) {
        Ok(found) => {
            log::debug!("{} executable found at {}", id, found.display());
            true
        }
        Err(e) => {
            log::debug!("{} executable '{}' not found: {}", id, program.display(), e);
            false
        }
    }
}

/// One backend: its table row plus per-installation overrides
#[derive(Debug, Clone)]
pub struct BackendAdapter {
    spec: &'static BackendSpec,
    /// バイナリのパス（Noneの場合はPATHから検索）
    binary_path: Option<PathBuf>,
    extra_args: Vec<String>,
}

impl BackendAdapter {
    pub fn new(id: BackendId) -> Self {
        Self {
            spec: id.spec(),
            binary_path: None,
            extra_args: Vec::new(),
        }
    }

    /// カスタムバイナリパスを指定
    pub fn with_binary_path(mut self, binary_path: impl Into<PathBuf>) -> Self {
        self.binary_path = Some(binary_path.into());
        self
    }

    /// Arguments inserted after the built-in flags, before the query
    pub fn with_extra_args(mut self, extra_args: Vec<String>) -> Self {
        self.extra_args = extra_args;
        self
    }

    pub fn id(&self) -> BackendId {
        self.spec.id
    }

    pub fn spec(&self) -> &'static BackendSpec {
        self.spec
    }

    pub fn program(&self) -> PathBuf {
        self.binary_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(self.spec.program))
    }

    /// Builds the command line for one search. Pure: nothing is spawned.
    pub fn build_command(
        &self,
        query: &Query,
        roots: &SearchRoots,
        options: &SearchOptions,
    ) -> Result<Invocation> {
        self.spec
            .build(&self.program(), &self.extra_args, query, roots, options)
    }

    pub fn parse_line(&self, raw: &str, ctx: &ParseContext<'_>) -> ParsedLine {
        parser::parse_line(self.spec.output, self.spec.path_style, raw, ctx)
    }

    pub fn is_available(&self) -> bool {
        is_available(self.id(), self.binary_path.as_deref())
    }

    /// Maps the tool's exit code to success (possibly with no matches) or
    /// `BackendError`. `None` means the process died from a signal.
    pub fn check_exit(&self, code: Option<i32>, stderr: &str) -> Result<()> {
        let stderr = stderr.trim();
        match code {
            Some(0) => Ok(()),
            Some(code)
                if code == self.spec.no_match_exit
                    && !(self.spec.stderr_means_error && !stderr.is_empty()) =>
            {
                log::debug!("{} found no matches", self.id());
                Ok(())
            }
            code => Err(SearchError::BackendError {
                backend: self.id(),
                code,
                stderr: stderr.to_string(),
            }),
        }
    }
}

/// 利用可能なバックエンドの登録簿（優先順位順）
#[derive(Debug, Clone)]
pub struct BackendRegistry {
    adapters: Vec<BackendAdapter>,
}

impl Default for BackendRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl BackendRegistry {
    /// Every known backend with default settings
    pub fn new() -> Self {
        Self {
            adapters: BackendId::ALL.iter().copied().map(BackendAdapter::new).collect(),
        }
    }

    pub fn empty() -> Self {
        Self {
            adapters: Vec::new(),
        }
    }

    /// Every known backend, with executable overrides and extra arguments
    /// taken from `settings`
    pub fn from_settings(settings: &Settings) -> Self {
        let mut registry = Self::new();
        for (id, backend) in &settings.backends {
            let mut adapter = BackendAdapter::new(*id).with_extra_args(backend.extra_args.clone());
            if let Some(executable) = &backend.executable {
                adapter = adapter.with_binary_path(executable.clone());
            }
            registry.register(adapter);
        }
        registry
    }

    /// Adds an adapter, replacing any adapter with the same id
    pub fn register(&mut self, adapter: BackendAdapter) {
        match self.adapters.iter_mut().find(|a| a.id() == adapter.id()) {
            Some(existing) => *existing = adapter,
            None => self.adapters.push(adapter),
        }
    }

    pub fn get(&self, id: BackendId) -> Result<&BackendAdapter> {
        self.adapters
            .iter()
            .find(|a| a.id() == id)
            .ok_or_else(|| SearchError::UnknownBackend(id.to_string()))
    }

    pub fn ids(&self) -> impl Iterator<Item = BackendId> + '_ {
        self.adapters.iter().map(BackendAdapter::id)
    }

    /// 利用可能なバックエンドの一覧を取得
    pub fn availability(&self) -> Vec<(BackendId, bool)> {
        self.adapters
            .iter()
            .map(|a| (a.id(), a.is_available()))
            .collect()
    }

    /// 利用可能な最適なバックエンドを自動選択
    pub fn detect_best(&self) -> Option<BackendId> {
        let mut ordered: Vec<&BackendAdapter> = self.adapters.iter().collect();
        ordered.sort_by_key(|a| BackendId::ALL.iter().position(|id| *id == a.id()));
        let best = ordered.into_iter().find(|a| a.is_available()).map(BackendAdapter::id);
        match best {
            Some(id) => log::info!("Selected search backend: {}", id),
            None => log::warn!("No external search tools available"),
        }
        best
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    pub const ROOT: &str = "/proj";

    pub fn roots() -> SearchRoots {
        SearchRoots::new([ROOT]).unwrap()
    }

    pub fn parse(id: BackendId, raw: &str) -> ParsedLine {
        let roots = vec![PathBuf::from(ROOT)];
        let ctx = ParseContext {
            roots: &roots,
            cwd: Path::new(ROOT),
        };
        BackendAdapter::new(id).parse_line(raw, &ctx)
    }

    pub fn args(invocation: &Invocation) -> Vec<String> {
        invocation
            .args
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    pub fn build(id: BackendId, query: &Query, options: &SearchOptions) -> Result<Vec<String>> {
        BackendAdapter::new(id)
            .build_command(query, &roots(), options)
            .map(|inv| args(&inv))
    }
}
