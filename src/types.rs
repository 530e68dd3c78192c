use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

/// Default cap on the number of characters kept from a match's line text.
/// Front ends hang on very long lines (minified JavaScript and the like).
pub const DEFAULT_MAX_TEXT_LEN: usize = 1000;

/// How letter case is treated by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseSensitivity {
    #[default]
    Sensitive,
    Insensitive,
    /// Insensitive unless the query contains an uppercase letter
    Smart,
}

/// 検索クエリ（送信後は不変）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    text: String,
    case: CaseSensitivity,
    regex: bool,
}

impl Query {
    /// Literal, case-sensitive query
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            case: CaseSensitivity::Sensitive,
            regex: false,
        }
    }

    pub fn with_case(mut self, case: CaseSensitivity) -> Self {
        self.case = case;
        self
    }

    pub fn with_regex(mut self, regex: bool) -> Self {
        self.regex = regex;
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn case(&self) -> CaseSensitivity {
        self.case
    }

    pub fn is_regex(&self) -> bool {
        self.regex
    }
}

/// Per-run options that are not part of the query itself
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchOptions {
    pub whole_word: bool,
    /// Characters kept from each match's text; `None` keeps everything
    pub max_text_len: Option<usize>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            whole_word: false,
            max_text_len: Some(DEFAULT_MAX_TEXT_LEN),
        }
    }
}

/// One normalized search hit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    /// Absolute path of the file
    pub path: PathBuf,
    /// 1-based line number
    pub line: u32,
    /// 1-based column, when the backend reports one
    pub column: Option<u32>,
    /// Text of the matched line
    pub text: String,
}

impl Match {
    /// `line` or `line:column`, the location form used in reports
    pub fn location(&self) -> String {
        match self.column {
            Some(column) => format!("{}:{}", self.line, column),
            None => self.line.to_string(),
        }
    }

    pub(crate) fn truncate_text(&mut self, max_chars: usize) {
        if let Some((idx, _)) = self.text.char_indices().nth(max_chars) {
            self.text.truncate(idx);
        }
    }
}

/// 一回の検索で得られた結果（受信順を保持）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ResultSet {
    matches: Vec<Match>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, m: Match) {
        self.matches.push(m);
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Match> {
        self.matches.iter()
    }

    pub fn as_slice(&self) -> &[Match] {
        &self.matches
    }

    pub fn into_vec(self) -> Vec<Match> {
        self.matches
    }

    /// Number of distinct files with at least one match
    pub fn file_count(&self) -> usize {
        self.matches
            .iter()
            .map(|m| m.path.as_path())
            .collect::<HashSet<_>>()
            .len()
    }

    /// Matches grouped per file, files in order of their first match
    pub fn group_by_file(&self) -> Vec<(&Path, Vec<&Match>)> {
        let mut groups: Vec<(&Path, Vec<&Match>)> = Vec::new();
        let mut index: HashMap<&Path, usize> = HashMap::new();
        for m in &self.matches {
            let path = m.path.as_path();
            match index.get(path) {
                Some(&i) => groups[i].1.push(m),
                None => {
                    index.insert(path, groups.len());
                    groups.push((path, vec![m]));
                }
            }
        }
        groups
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a Match;
    type IntoIter = std::slice::Iter<'a, Match>;

    fn into_iter(self) -> Self::IntoIter {
        self.matches.iter()
    }
}

impl From<Vec<Match>> for ResultSet {
    fn from(matches: Vec<Match>) -> Self {
        Self { matches }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(path: &str, line: u32) -> Match {
        Match {
            path: PathBuf::from(path),
            line,
            column: None,
            text: format!("line {}", line),
        }
    }

    #[test]
    fn test_query_builder() {
        let query = Query::new("TODO")
            .with_case(CaseSensitivity::Insensitive)
            .with_regex(true);
        assert_eq!(query.text(), "TODO");
        assert_eq!(query.case(), CaseSensitivity::Insensitive);
        assert!(query.is_regex());

        let plain = Query::new("fixme");
        assert_eq!(plain.case(), CaseSensitivity::Sensitive);
        assert!(!plain.is_regex());
    }

    #[test]
    fn test_default_options_cap_text() {
        let options = SearchOptions::default();
        assert!(!options.whole_word);
        assert_eq!(options.max_text_len, Some(DEFAULT_MAX_TEXT_LEN));
    }

    #[test]
    fn test_match_location() {
        let mut m = hit("/proj/a.txt", 3);
        assert_eq!(m.location(), "3");
        m.column = Some(7);
        assert_eq!(m.location(), "3:7");
    }

    #[test]
    fn test_truncate_text_respects_char_boundaries() {
        let mut m = hit("/proj/a.txt", 1);
        m.text = "日本語のテキスト".to_string();
        m.truncate_text(3);
        assert_eq!(m.text, "日本語");

        let mut short = hit("/proj/a.txt", 1);
        short.text = "abc".to_string();
        short.truncate_text(10);
        assert_eq!(short.text, "abc");
    }

    #[test]
    fn test_group_by_file_keeps_first_appearance_order() {
        let set = ResultSet::from(vec![
            hit("/proj/b.rs", 1),
            hit("/proj/a.rs", 4),
            hit("/proj/b.rs", 9),
        ]);

        let groups = set.group_by_file();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, Path::new("/proj/b.rs"));
        assert_eq!(groups[0].1.len(), 2);
        assert_eq!(groups[1].0, Path::new("/proj/a.rs"));
        assert_eq!(set.file_count(), 2);
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_group_by_file_many_files() {
        let n = 200_000u32;
        let mut matches: Vec<Match> = (0..n)
            .map(|i| hit(&format!("/proj/f{}.rs", i), 1))
            .collect();
        matches.push(hit("/proj/f0.rs", 2));
        let set = ResultSet::from(matches);

        let start = std::time::Instant::now();
        let groups = set.group_by_file();
        assert_eq!(groups.len(), n as usize);
        assert_eq!(groups[0].1.len(), 2);
        assert_eq!(groups[1].0, Path::new("/proj/f1.rs"));
        assert_eq!(set.file_count(), n as usize);
        assert!(start.elapsed() < std::time::Duration::from_secs(10));
    }

    #[test]
    fn test_result_set_serializes_as_list() {
        let set = ResultSet::from(vec![hit("/proj/a.txt", 3)]);
        let json = serde_json::to_value(&set).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["line"], 3);
        assert!(json[0]["column"].is_null());
    }
}
