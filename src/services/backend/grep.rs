//! grep バックエンド
//!
//! `-Z` puts a NUL after the file name, so paths containing `:` parse
//! unambiguously.

use super::spec::{BackendSpec, Flag, OutputFormat, PathStyle, QueryPlacement, RootStyle};
use super::BackendId;

pub(super) const SPEC: BackendSpec = BackendSpec {
    id: BackendId::Grep,
    program: "grep",
    fixed_args: &["-r", "-n", "-H", "-I", "-Z", "--color=never"],
    ignore_case: Flag::Native("-i"),
    case_sensitive: Flag::Default,
    smart_case: Flag::Unsupported,
    regex: Flag::Native("-E"),
    literal: Flag::Native("-F"),
    whole_word: Flag::Native("-w"),
    query: QueryPlacement::Option("-e"),
    roots: RootStyle::Plain,
    output: OutputFormat::NulPath { column: false },
    path_style: PathStyle::Posix,
    no_match_exit: 1,
    stderr_means_error: false,
};
