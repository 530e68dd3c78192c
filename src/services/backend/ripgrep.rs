//! ripgrep バックエンド
//!
//! ripgrepは最も高速なテキスト検索ツールの一つで、最優先の選択肢です。
//! フォーマット: filename\0line_number:column:content

use super::spec::{BackendSpec, Flag, OutputFormat, PathStyle, QueryPlacement, RootStyle};
use super::BackendId;

pub(super) const SPEC: BackendSpec = BackendSpec {
    id: BackendId::Ripgrep,
    program: "rg",
    fixed_args: &[
        "--no-heading",
        "--with-filename",
        "--line-number",
        "--column",
        "--color",
        "never",
        "--null",
    ],
    ignore_case: Flag::Native("-i"),
    // explicit, so a user's ripgrep config cannot turn on smart case
    case_sensitive: Flag::Native("-s"),
    smart_case: Flag::Native("-S"),
    regex: Flag::Default,
    literal: Flag::Native("-F"),
    whole_word: Flag::Native("-w"),
    query: QueryPlacement::Option("-e"),
    roots: RootStyle::Plain,
    output: OutputFormat::NulPath { column: true },
    path_style: PathStyle::Posix,
    no_match_exit: 1,
    stderr_means_error: false,
};
