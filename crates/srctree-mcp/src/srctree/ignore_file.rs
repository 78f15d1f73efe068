//! Loading of the `.gitignore` file at the scan root.

use std::fs;
use std::path::Path;

use super::pattern::PatternSet;

/// Read the `.gitignore` directly inside `base` and compile it. Returns
/// `None` when the file is absent or unreadable, which means nothing is
/// excluded by pattern matching. Blank lines and `#` comments are dropped
/// before compilation; line order is preserved because later patterns
/// override earlier ones.
pub fn load_gitignore(base: &Path) -> Option<PatternSet> {
    let gitignore_path = base.join(".gitignore");
    let content = match fs::read_to_string(&gitignore_path) {
        Ok(content) => content,
        Err(_) => return None,
    };

    let lines = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'));
    let patterns = PatternSet::from_lines(lines);

    tracing::debug!(
        path = %gitignore_path.display(),
        patterns = patterns.len(),
        "loaded ignore file"
    );
    Some(patterns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_missing_file_means_no_filter() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_gitignore(dir.path()).is_none());
    }

    #[test]
    fn test_blank_and_comment_lines_are_dropped() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(".gitignore"),
            "# build artifacts\n\n*.log\n   \n!keep.log\n# trailing comment\n",
        )
        .unwrap();

        let patterns = load_gitignore(dir.path()).unwrap();
        assert_eq!(patterns.len(), 2);
        assert!(patterns.matches("a.log", false));
        assert!(!patterns.matches("keep.log", false));
    }

    #[test]
    fn test_lines_are_trimmed_before_compilation() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(".gitignore"), "  build/  \n").unwrap();

        let patterns = load_gitignore(dir.path()).unwrap();
        assert!(patterns.matches("build/", true));
        assert!(!patterns.matches("build", false));
    }
}
