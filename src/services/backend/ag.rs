//! the_silver_searcher (ag) バックエンド
//!
//! ag --vimgrep形式: file:line:column:content
//! ag cannot put a NUL after the name in this mode, so the colon parser with
//! root stripping is used.

use super::spec::{BackendSpec, Flag, OutputFormat, PathStyle, QueryPlacement, RootStyle};
use super::BackendId;

pub(super) const SPEC: BackendSpec = BackendSpec {
    id: BackendId::Ag,
    program: "ag",
    fixed_args: &["--vimgrep", "--nocolor"],
    ignore_case: Flag::Native("-i"),
    case_sensitive: Flag::Native("-s"),
    smart_case: Flag::Native("-S"),
    regex: Flag::Default,
    literal: Flag::Native("-Q"),
    whole_word: Flag::Native("-w"),
    query: QueryPlacement::AfterSeparator,
    roots: RootStyle::Plain,
    output: OutputFormat::Delimited { column: true },
    path_style: PathStyle::Posix,
    // agは結果が見つからない場合にexit code 1を返す
    no_match_exit: 1,
    stderr_means_error: false,
};
