//! git grep バックエンド
//!
//! Paths are printed relative to the working directory, which is the common
//! directory of the roots. With `-z` both the name and the line number are
//! followed by NUL.

use super::spec::{BackendSpec, Flag, OutputFormat, PathStyle, QueryPlacement, RootStyle};
use super::BackendId;

pub(super) const SPEC: BackendSpec = BackendSpec {
    id: BackendId::GitGrep,
    program: "git",
    fixed_args: &["grep", "-n", "-I", "-z", "--no-color"],
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

#[cfg(test)]
mod tests {
    use super::super::test_support::{build, parse, roots};
    use super::super::{BackendAdapter, BackendId, ParsedLine};
    use crate::types::{Query, SearchOptions};
    use std::path::PathBuf;

    #[test]
    fn test_parse_relative_path() {
        let ParsedLine::Match(m) = parse(BackendId::GitGrep, "src/main.rs\u{0}12\u{0}fn main() {")
        else {
            panic!("expected a match");
        };
        assert_eq!(m.path, PathBuf::from("/proj/src/main.rs"));
        assert_eq!(m.line, 12);
        assert_eq!(m.column, None);
        assert_eq!(m.text, "fn main() {");
    }

    #[test]
    fn test_parse_colon_separated_line_number() {
        let m = parse(BackendId::GitGrep, "README.md\u{0}1:# Title")
            .into_match()
            .unwrap();
        assert_eq!(m.line, 1);
        assert_eq!(m.text, "# Title");
    }

    #[test]
    fn test_parse_noise() {
        assert_eq!(parse(BackendId::GitGrep, ""), ParsedLine::Skip);
        assert_eq!(
            parse(BackendId::GitGrep, "fatal: not a git repository"),
            ParsedLine::Skip
        );
    }

    #[test]
    fn test_build_runs_grep_subcommand_in_root() {
        let inv = BackendAdapter::new(BackendId::GitGrep)
            .build_command(&Query::new("TODO"), &roots(), &SearchOptions::default())
            .unwrap();
        assert_eq!(inv.program, PathBuf::from("git"));
        assert_eq!(inv.cwd, PathBuf::from("/proj"));
        assert_eq!(inv.args[0], "grep");
        assert!(inv.has_arg("-z"));
        assert!(inv.has_arg("-F"));
    }

    #[test]
    fn test_build_regex_flag() {
        let args = build(
            BackendId::GitGrep,
            &Query::new("a|b").with_regex(true),
            &SearchOptions::default(),
        )
        .unwrap();
        let tail: Vec<&str> = args.iter().rev().take(4).rev().map(String::as_str).collect();
        assert_eq!(tail, vec!["-e", "a|b", "--", "/proj"]);
        assert!(args.contains(&"-E".to_string()));
    }
}
