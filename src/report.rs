//! Plain-text results view, grouped by file.

use crate::types::ResultSet;
use std::fmt::Write;

/// Renders `results` as a "find results" style listing:
///
/// ```text
/// Results for "TODO" (2 lines in 1 files):
///
/// /proj/a.txt:
///   3: TODO: fix
///   7:5: TODO later
/// ```
pub fn render(query: &str, results: &ResultSet) -> String {
    let groups = results.group_by_file();
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Results for \"{}\" ({} lines in {} files):",
        query,
        results.len(),
        groups.len()
    );

    for (path, matches) in groups {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}:", path.display());
        for m in matches {
            let _ = writeln!(out, "  {}: {}", m.location(), m.text);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Match;
    use std::path::PathBuf;

    fn hit(path: &str, line: u32, column: Option<u32>, text: &str) -> Match {
        Match {
            path: PathBuf::from(path),
            line,
            column,
            text: text.to_string(),
        }
    }

    #[test]
    fn test_render_groups_by_file() {
        let results = ResultSet::from(vec![
            hit("/proj/a.txt", 3, None, "TODO: fix"),
            hit("/proj/b.txt", 1, Some(4), "// TODO"),
            hit("/proj/a.txt", 7, Some(5), "TODO later"),
        ]);

        let text = render("TODO", &results);
        assert_eq!(
            text,
            "Results for \"TODO\" (3 lines in 2 files):\n\
             \n\
             /proj/a.txt:\n\
             \x20 3: TODO: fix\n\
             \x20 7:5: TODO later\n\
             \n\
             /proj/b.txt:\n\
             \x20 1:4: // TODO\n"
        );
    }

    #[test]
    fn test_render_one_match_per_file_at_scale() {
        let results = ResultSet::from(
            (0..50_000)
                .map(|i| hit(&format!("/proj/f{}.rs", i), 1, None, "TODO"))
                .collect::<Vec<_>>(),
        );

        let start = std::time::Instant::now();
        let text = render("TODO", &results);
        assert!(start.elapsed() < std::time::Duration::from_secs(10));
        assert!(text.starts_with("Results for \"TODO\" (50000 lines in 50000 files):\n"));
        assert!(text.ends_with("/proj/f49999.rs:\n  1: TODO\n"));
    }

    #[test]
    fn test_render_empty() {
        let text = render("nothing", &ResultSet::new());
        assert_eq!(text, "Results for \"nothing\" (0 lines in 0 files):\n");
    }
}
