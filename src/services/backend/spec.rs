//! バックエンド定義テーブルとコマンドライン構築
//!
//! Each backend is one `BackendSpec` row. Building an invocation is driven
//! entirely by the row, so adding a backend means adding a row.

use super::BackendId;
use crate::error::{Result, SearchError};
use crate::roots::SearchRoots;
use crate::types::{CaseSensitivity, Query, SearchOptions};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// How a backend expresses one search option
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flag {
    /// The tool behaves this way without any flag
    Default,
    /// The tool needs this flag
    Native(&'static str),
    /// The tool cannot do this
    Unsupported,
}

impl Flag {
    fn push_to(
        self,
        args: &mut Vec<OsString>,
        backend: BackendId,
        option: &'static str,
    ) -> Result<()> {
        match self {
            Flag::Default => Ok(()),
            Flag::Native(flag) => {
                args.push(flag.into());
                Ok(())
            }
            Flag::Unsupported => Err(SearchError::CapabilityUnsupported { backend, option }),
        }
    }
}

/// Where the query goes on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryPlacement {
    /// `FLAG QUERY -- ROOTS...`
    Option(&'static str),
    /// `-- QUERY ROOTS...`
    AfterSeparator,
    /// `PREFIXQUERY ROOTS...` (findstr's `/C:`)
    Prefixed(&'static str),
}

/// How each root is passed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootStyle {
    Plain,
    /// `ROOT\*`, for tools that take file patterns instead of directories
    Wildcard,
}

/// Shape of one output line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// `path\0line[:col]:text`; the location separators may also be NUL
    NulPath { column: bool },
    /// `path:line[:col]:text`
    Delimited { column: bool },
}

/// Path syntax the tool prints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathStyle {
    Posix,
    Windows,
}

impl PathStyle {
    pub fn is_separator(self, c: char) -> bool {
        match self {
            PathStyle::Posix => c == '/',
            PathStyle::Windows => c == '\\' || c == '/',
        }
    }

    pub fn is_absolute(self, path: &str) -> bool {
        match self {
            PathStyle::Posix => path.starts_with('/'),
            PathStyle::Windows => {
                let bytes = path.as_bytes();
                path.starts_with("\\\\")
                    || (bytes.len() >= 3
                        && bytes[0].is_ascii_alphabetic()
                        && bytes[1] == b':'
                        && (bytes[2] == b'\\' || bytes[2] == b'/'))
            }
        }
    }
}

/// One row of the backend table
#[derive(Debug)]
pub struct BackendSpec {
    pub id: BackendId,
    /// Executable looked up on the search path when no override is set
    pub program: &'static str,
    /// Flags for recursion and machine-readable output, always present
    pub fixed_args: &'static [&'static str],
    pub ignore_case: Flag,
    pub case_sensitive: Flag,
    pub smart_case: Flag,
    pub regex: Flag,
    pub literal: Flag,
    pub whole_word: Flag,
    pub query: QueryPlacement,
    pub roots: RootStyle,
    pub output: OutputFormat,
    pub path_style: PathStyle,
    /// Exit code meaning "ran fine, found nothing"
    pub no_match_exit: i32,
    /// Treat the no-match exit code as an error when stderr is not empty
    pub stderr_means_error: bool,
}

/// A fully built command line, ready to spawn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<OsString>,
    /// Working directory; relative paths in the output resolve against it
    pub cwd: PathBuf,
}

impl Invocation {
    /// Whether `arg` appears verbatim in the argument list
    pub fn has_arg(&self, arg: &str) -> bool {
        self.args.iter().any(|a| a == arg)
    }
}

impl BackendSpec {
    pub(crate) fn build(
        &self,
        program: &Path,
        extra_args: &[String],
        query: &Query,
        roots: &SearchRoots,
        options: &SearchOptions,
    ) -> Result<Invocation> {
        let mut args: Vec<OsString> = self.fixed_args.iter().map(OsString::from).collect();

        let (case_flag, case_option) = match query.case() {
            CaseSensitivity::Sensitive => (self.case_sensitive, "case-sensitive matching"),
            CaseSensitivity::Insensitive => (self.ignore_case, "case-insensitive matching"),
            CaseSensitivity::Smart => (self.smart_case, "smart-case matching"),
        };
        case_flag.push_to(&mut args, self.id, case_option)?;

        if query.is_regex() {
            self.regex.push_to(&mut args, self.id, "regular expressions")?;
        } else {
            self.literal.push_to(&mut args, self.id, "literal matching")?;
        }

        if options.whole_word {
            self.whole_word.push_to(&mut args, self.id, "whole-word matching")?;
        }

        args.extend(extra_args.iter().map(OsString::from));

        match self.query {
            QueryPlacement::Option(flag) => {
                args.push(flag.into());
                args.push(query.text().into());
                args.push("--".into());
            }
            QueryPlacement::AfterSeparator => {
                args.push("--".into());
                args.push(query.text().into());
            }
            QueryPlacement::Prefixed(prefix) => {
                args.push(format!("{}{}", prefix, query.text()).into());
            }
        }

        for root in roots {
            let mut arg = root.as_os_str().to_owned();
            if self.roots == RootStyle::Wildcard {
                let lossy = root.to_string_lossy();
                if lossy.ends_with(|c| self.path_style.is_separator(c)) {
                    arg.push("*");
                } else {
                    arg.push("\\*");
                }
            }
            args.push(arg);
        }

        Ok(Invocation {
            program: program.to_path_buf(),
            args,
            cwd: roots.common_dir(),
        })
    }
}
