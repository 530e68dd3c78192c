//! 検索ツール出力の行パーサー
//!
//! Turns one raw output line into a `Match`. Anything that does not look
//! like a match line (banners, summaries, blank lines, paths outside the
//! search roots) is skipped rather than reported.

use super::spec::{OutputFormat, PathStyle};
use crate::types::Match;
use std::path::{Component, Path, PathBuf};

/// What the parser needs besides the line itself
#[derive(Debug, Clone, Copy)]
pub struct ParseContext<'a> {
    pub roots: &'a [PathBuf],
    /// Directory the tool ran in
    pub cwd: &'a Path,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedLine {
    Match(Match),
    Skip,
}

impl ParsedLine {
    pub fn into_match(self) -> Option<Match> {
        match self {
            ParsedLine::Match(m) => Some(m),
            ParsedLine::Skip => None,
        }
    }
}

/// Numeric location fields found after the path
struct Location<'a> {
    line: u32,
    column: Option<u32>,
    text: &'a str,
}

pub(crate) fn parse_line(
    format: OutputFormat,
    style: PathStyle,
    raw: &str,
    ctx: &ParseContext<'_>,
) -> ParsedLine {
    let line = raw.trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() {
        return ParsedLine::Skip;
    }

    let parsed = match format {
        OutputFormat::NulPath { column } => parse_nul_path(line, column, style, ctx),
        OutputFormat::Delimited { column } => parse_delimited(line, column, style, ctx),
    };

    match parsed {
        Some(m) => ParsedLine::Match(m),
        None => {
            log::debug!("Skipping unparsable output line: {:?}", line);
            ParsedLine::Skip
        }
    }
}

fn parse_nul_path(
    line: &str,
    column: bool,
    style: PathStyle,
    ctx: &ParseContext<'_>,
) -> Option<Match> {
    let (path, rest) = line.split_once('\0')?;
    let location = parse_location(rest, column, &[':', '\0'])?;
    build_match(path, location, style, ctx)
}

fn parse_delimited(
    line: &str,
    column: bool,
    style: PathStyle,
    ctx: &ParseContext<'_>,
) -> Option<Match> {
    // Skip past a known root first so that colons inside it (drive letters,
    // odd directory names) are never taken as the delimiter.
    let mut starts: Vec<usize> = ctx
        .roots
        .iter()
        .filter_map(|root| root_prefix_len(line, &root.to_string_lossy(), style))
        .collect();
    starts.sort_unstable_by(|a, b| b.cmp(a));
    starts.push(0);

    starts.into_iter().find_map(|start| {
        line[start..]
            .match_indices(':')
            .map(|(idx, _)| start + idx)
            .find_map(|colon| {
                let location = parse_location(&line[colon + 1..], column, &[':'])?;
                build_match(&line[..colon], location, style, ctx)
            })
    })
}

/// Byte length of `root` plus its separator when `line` starts with it
fn root_prefix_len(line: &str, root: &str, style: PathStyle) -> Option<usize> {
    let root = root.trim_end_matches(|c| style.is_separator(c));
    let rest = line.strip_prefix(root)?;
    let sep = rest.chars().next().filter(|c| style.is_separator(*c))?;
    Some(root.len() + sep.len_utf8())
}

/// Parses `line<sep>[col<sep>]text`
fn parse_location<'a>(input: &'a str, column: bool, separators: &[char]) -> Option<Location<'a>> {
    let (line, rest) = take_number(input, separators)?;
    let (column, text) = if column {
        let (col, text) = take_number(rest, &[':'])?;
        (Some(col), text)
    } else {
        (None, rest)
    };

    if line == 0 || column == Some(0) {
        return None;
    }
    Some(Location { line, column, text })
}

fn take_number<'a>(input: &'a str, separators: &[char]) -> Option<(u32, &'a str)> {
    let digits = input.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let sep = input[digits..].chars().next()?;
    if !separators.contains(&sep) {
        return None;
    }
    let value = input[..digits].parse().ok()?;
    Some((value, &input[digits + sep.len_utf8()..]))
}

fn build_match(
    path: &str,
    location: Location<'_>,
    style: PathStyle,
    ctx: &ParseContext<'_>,
) -> Option<Match> {
    if path.is_empty() {
        return None;
    }

    let resolved: PathBuf = if style.is_absolute(path) {
        PathBuf::from(path)
    } else {
        ctx.cwd.join(path)
    };
    let resolved: PathBuf = resolved.components().collect();
    if resolved.components().any(|c| c == Component::ParentDir) {
        log::debug!("Dropping match with unresolved `..`: {}", resolved.display());
        return None;
    }

    if !is_under_roots(&resolved.to_string_lossy(), ctx.roots, style) {
        // A root that is itself a file lands here for every one of its matches
        log::debug!(
            "Dropping match not strictly below a search root: {}",
            resolved.display()
        );
        return None;
    }

    Some(Match {
        path: resolved,
        line: location.line,
        column: location.column,
        text: location.text.to_string(),
    })
}

/// Whether `path` lies strictly below one of `roots`.
///
/// Roots are directories; a path equal to a root is not below it.
pub(crate) fn is_under_roots(path: &str, roots: &[PathBuf], style: PathStyle) -> bool {
    roots.iter().any(|root| {
        root_prefix_len(path, &root.to_string_lossy(), style)
            .map(|len| !path[len..].trim_start_matches(|c| style.is_separator(c)).is_empty())
            .unwrap_or(false)
    })
}
