//! ack バックエンド

use super::spec::{BackendSpec, Flag, OutputFormat, PathStyle, QueryPlacement, RootStyle};
use super::BackendId;

pub(super) const SPEC: BackendSpec = BackendSpec {
    id: BackendId::Ack,
    program: "ack",
    fixed_args: &[
        "--nocolor",
        "--nogroup",
        "--with-filename",
        "--column",
        "--nopager",
    ],
    ignore_case: Flag::Native("-i"),
    case_sensitive: Flag::Native("-I"),
    smart_case: Flag::Native("--smart-case"),
    regex: Flag::Default,
    literal: Flag::Native("-Q"),
    whole_word: Flag::Native("-w"),
    query: QueryPlacement::AfterSeparator,
    roots: RootStyle::Plain,
    output: OutputFormat::Delimited { column: true },
    path_style: PathStyle::Posix,
    no_match_exit: 1,
    stderr_means_error: false,
};
