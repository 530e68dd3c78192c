use std::fs;
use std::process::Command;
use std::str;
use tempfile::TempDir;

/// CLIの回帰テスト - 実際の sip プロセスを起動して動作を検証
#[cfg(test)]
mod cli_tests {
    use super::*;

    fn sip() -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_sip"));
        cmd.env_remove("RUST_LOG");
        cmd
    }

    fn grep_available() -> bool {
        if which::which("grep").is_err() {
            eprintln!("grep not found, skipping");
            return false;
        }
        true
    }

    fn create_test_project() -> Result<TempDir, Box<dyn std::error::Error>> {
        let temp_dir = TempDir::new()?;
        let root = temp_dir.path();

        fs::write(root.join("a.txt"), "alpha\nbeta\nTODO: fix\n")?;
        fs::create_dir(root.join("src"))?;
        fs::write(root.join("src/lib.rs"), "// TODO later\npub fn f() {}\n")?;

        Ok(temp_dir)
    }

    #[test]
    fn test_list_backends() -> Result<(), Box<dyn std::error::Error>> {
        let output = sip().arg("--backends").output()?;
        assert!(output.status.success());

        let stdout = str::from_utf8(&output.stdout)?;
        for name in ["rg", "ag", "pt", "ack", "git_grep", "grep", "findstr"] {
            assert!(
                stdout.lines().any(|line| line.starts_with(name)),
                "{} missing from:\n{}",
                name,
                stdout
            );
        }
        Ok(())
    }

    #[test]
    fn test_grep_search_report() -> Result<(), Box<dyn std::error::Error>> {
        if !grep_available() {
            return Ok(());
        }
        let project = create_test_project()?;
        let root = project.path().canonicalize()?;

        let output = sip()
            .args(["-b", "grep", "TODO"])
            .arg(&root)
            .output()?;
        assert_eq!(output.status.code(), Some(0), "{:?}", output);

        let stdout = str::from_utf8(&output.stdout)?;
        assert!(stdout.starts_with("Results for \"TODO\" (2 lines in 2 files):"));
        assert!(stdout.contains(&format!("{}:\n  3: TODO: fix\n", root.join("a.txt").display())));
        assert!(stdout.contains(&format!(
            "{}:\n  1: // TODO later\n",
            root.join("src/lib.rs").display()
        )));
        Ok(())
    }

    #[test]
    fn test_grep_search_json() -> Result<(), Box<dyn std::error::Error>> {
        if !grep_available() {
            return Ok(());
        }
        let project = create_test_project()?;
        let root = project.path().canonicalize()?;

        let output = sip()
            .args(["-b", "grep", "--json", "fix"])
            .arg(&root)
            .output()?;
        assert!(output.status.success(), "{:?}", output);

        let json: serde_json::Value = serde_json::from_slice(&output.stdout)?;
        let matches = json.as_array().ok_or("expected a JSON array")?;
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0]["line"], 3);
        assert_eq!(matches[0]["column"], serde_json::Value::Null);
        assert_eq!(matches[0]["text"], "TODO: fix");
        assert_eq!(
            matches[0]["path"].as_str(),
            root.join("a.txt").to_str()
        );
        Ok(())
    }

    #[test]
    fn test_no_match_exits_one() -> Result<(), Box<dyn std::error::Error>> {
        if !grep_available() {
            return Ok(());
        }
        let project = create_test_project()?;

        let output = sip()
            .args(["-b", "grep", "nothing-here"])
            .arg(project.path())
            .output()?;
        assert_eq!(output.status.code(), Some(1));

        let stdout = str::from_utf8(&output.stdout)?;
        assert!(stdout.contains("(0 lines in 0 files)"));
        Ok(())
    }

    #[test]
    fn test_unknown_backend_exits_two() -> Result<(), Box<dyn std::error::Error>> {
        let output = sip().args(["-b", "fzf", "TODO"]).output()?;
        assert_eq!(output.status.code(), Some(2));

        let stderr = str::from_utf8(&output.stderr)?;
        assert!(stderr.contains("fzf"), "{}", stderr);
        Ok(())
    }

    #[test]
    fn test_missing_root_exits_two() -> Result<(), Box<dyn std::error::Error>> {
        let project = TempDir::new()?;
        let missing = project.path().join("does-not-exist");

        let output = sip().args(["-b", "grep", "TODO"]).arg(&missing).output()?;
        assert_eq!(output.status.code(), Some(2));

        let stderr = str::from_utf8(&output.stderr)?;
        assert!(stderr.contains("does-not-exist"), "{}", stderr);
        Ok(())
    }

    #[test]
    fn test_unsupported_option_exits_two() -> Result<(), Box<dyn std::error::Error>> {
        let project = create_test_project()?;

        let output = sip()
            .args(["-b", "grep", "-S", "TODO"])
            .arg(project.path())
            .output()?;
        assert_eq!(output.status.code(), Some(2));

        let stderr = str::from_utf8(&output.stderr)?;
        assert!(stderr.contains("does not support"), "{}", stderr);
        Ok(())
    }
}
