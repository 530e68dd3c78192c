//! findstr バックエンド（Windows）
//!
//! findstr takes file patterns, so each root is passed as `ROOT\*` with `/S`.
//! It exits with 1 both for "no matches" and for unreadable files; only an
//! empty stderr means "no matches".

use super::spec::{BackendSpec, Flag, OutputFormat, PathStyle, QueryPlacement, RootStyle};
use super::BackendId;

pub(super) const SPEC: BackendSpec = BackendSpec {
    id: BackendId::Findstr,
    program: "findstr",
    fixed_args: &["/S", "/N", "/P"],
    ignore_case: Flag::Native("/I"),
    case_sensitive: Flag::Default,
    smart_case: Flag::Unsupported,
    regex: Flag::Native("/R"),
    literal: Flag::Native("/L"),
    whole_word: Flag::Unsupported,
    query: QueryPlacement::Prefixed("/C:"),
    roots: RootStyle::Wildcard,
    output: OutputFormat::Delimited { column: false },
    path_style: PathStyle::Windows,
    no_match_exit: 1,
    stderr_means_error: true,
};
