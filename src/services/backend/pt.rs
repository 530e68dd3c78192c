//! the_platinum_searcher (pt) バックエンド
//!
//! pt searches literally unless `-e` is given.

use super::spec::{BackendSpec, Flag, OutputFormat, PathStyle, QueryPlacement, RootStyle};
use super::BackendId;

pub(super) const SPEC: BackendSpec = BackendSpec {
    id: BackendId::Pt,
    program: "pt",
    fixed_args: &["--nocolor", "--nogroup", "--column"],
    ignore_case: Flag::Native("-i"),
    case_sensitive: Flag::Default,
    smart_case: Flag::Native("-S"),
    regex: Flag::Native("-e"),
    literal: Flag::Default,
    whole_word: Flag::Native("-w"),
    query: QueryPlacement::AfterSeparator,
    roots: RootStyle::Plain,
    output: OutputFormat::Delimited { column: true },
    path_style: PathStyle::Posix,
    no_match_exit: 1,
    stderr_means_error: false,
};
