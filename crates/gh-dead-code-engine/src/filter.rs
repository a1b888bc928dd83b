//! Which snapshot files are read, and which may report dead code
//!
//! Tests, generated output and oversized files are read for references but
//! never report their own definitions.

use crate::language::{LanguageFamily, SourceLanguage};

const TEST_PATTERNS: &[&str] = &[
    ".test.", ".spec.", "__tests__", "test/", "tests/", "spec/", "e2e/",
];

const IGNORE_PATTERNS: &[&str] = &[
    "node_modules/",
    ".next/",
    ".git/",
    "dist/",
    "build/",
    "coverage/",
    ".d.ts",
    ".min.js",
    ".bundle.js",
    "venv/",
    ".venv/",
    "__pycache__/",
];

/// Path and size based file selection
#[derive(Debug, Clone)]
pub struct FileFilter {
    pub max_file_size: u64,
    pub skip_tests: bool,
    pub extra_ignore_patterns: Vec<String>,
    pub language: Option<LanguageFamily>,
}

impl Default for FileFilter {
    fn default() -> Self {
        Self {
            max_file_size: 1_000_000,
            skip_tests: true,
            extra_ignore_patterns: Vec::new(),
            language: None,
        }
    }
}

impl FileFilter {
    /// Whether `path` is read at all
    ///
    /// Every file in scope contributes name references, whether or not its
    /// own definitions may be reported.
    pub fn in_scope(&self, path: &str) -> bool {
        let Some(language) = SourceLanguage::from_path(path) else {
            return false;
        };
        self.language.is_none_or(|family| family == language.family())
    }

    /// Whether definitions in a file of `size` bytes at `path` may be reported
    pub fn accepts(&self, path: &str, size: u64) -> bool {
        if size > self.max_file_size || !self.in_scope(path) {
            return false;
        }

        if self.skip_tests && is_test_file(path) {
            return false;
        }

        !IGNORE_PATTERNS.iter().any(|p| matches_pattern(path, p))
            && !self
                .extra_ignore_patterns
                .iter()
                .any(|p| !p.is_empty() && matches_pattern(path, p))
    }
}

/// Check if a file is a test file
pub fn is_test_file(path: &str) -> bool {
    TEST_PATTERNS.iter().any(|p| matches_pattern(path, p))
}

/// Match a path against an ignore pattern
///
/// Patterns ending in `/` name whole directories and only match at segment
/// boundaries (`test/` matches `test/a.py` and `src/test/a.py`, never
/// `latest/a.py`). Other patterns match anywhere.
fn matches_pattern(path: &str, pattern: &str) -> bool {
    if pattern.ends_with('/') {
        let rooted = format!("/{}", path);
        let pattern = format!("/{}", pattern.trim_start_matches('/'));
        rooted.contains(&pattern)
    } else {
        path.contains(pattern)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_test_file() {
        assert!(is_test_file("src/util.test.js"));
        assert!(is_test_file("src/util.spec.ts"));
        assert!(is_test_file("src/__tests__/util.js"));
        assert!(is_test_file("tests/test_api.py"));
        assert!(is_test_file("app/e2e/login.ts"));
        assert!(!is_test_file("src/util.js"));
        assert!(!is_test_file("src/contest.js"));
        assert!(!is_test_file("app/latest/view.py"));
        assert!(!is_test_file("docs/inspec/x.js"));
    }

    #[test]
    fn test_directory_patterns_match_whole_segments() {
        let filter = FileFilter::default();
        assert!(filter.accepts("tools/rebuild/run.py", 10));
        assert!(filter.accepts("src/redist/index.js", 10));
        assert!(!filter.accepts("packages/web/build/index.js", 10));
        assert!(!filter.accepts("build/index.js", 10));
    }

    #[test]
    fn test_scope_is_wider_than_candidates() {
        let filter = FileFilter {
            max_file_size: 100,
            ..FileFilter::default()
        };
        assert!(filter.in_scope("tests/test_api.py"));
        assert!(filter.in_scope("dist/bundle.js"));
        assert!(!filter.accepts("tests/test_api.py", 10));
        assert!(!filter.accepts("src/huge.js", 1_000));
        assert!(filter.in_scope("src/huge.js"));
        assert!(!filter.in_scope("README.md"));
    }

    #[test]
    fn test_accepts_source_files() {
        let filter = FileFilter::default();
        assert!(filter.accepts("src/util.js", 120));
        assert!(filter.accepts("app/models.py", 120));
    }

    #[test]
    fn test_rejects_ignored_and_generated_files() {
        let filter = FileFilter::default();
        assert!(!filter.accepts("node_modules/lodash/index.js", 10));
        assert!(!filter.accepts("dist/bundle.js", 10));
        assert!(!filter.accepts("types/index.d.ts", 10));
        assert!(!filter.accepts("static/app.min.js", 10));
        assert!(!filter.accepts("venv/lib/site.py", 10));
        assert!(!filter.accepts("README.md", 10));
    }

    #[test]
    fn test_rejects_large_files() {
        let filter = FileFilter {
            max_file_size: 100,
            ..FileFilter::default()
        };
        assert!(filter.accepts("src/a.js", 100));
        assert!(!filter.accepts("src/a.js", 101));
    }

    #[test]
    fn test_language_restriction() {
        let filter = FileFilter {
            language: Some(LanguageFamily::Python),
            ..FileFilter::default()
        };
        assert!(filter.accepts("app/main.py", 10));
        assert!(!filter.accepts("src/main.ts", 10));
        assert!(!filter.in_scope("src/main.ts"));
    }

    #[test]
    fn test_tests_kept_when_not_skipped() {
        let filter = FileFilter {
            skip_tests: false,
            ..FileFilter::default()
        };
        assert!(filter.accepts("tests/test_api.py", 10));
    }

    #[test]
    fn test_extra_ignore_patterns() {
        let filter = FileFilter {
            extra_ignore_patterns: vec!["generated/".to_string(), String::new()],
            ..FileFilter::default()
        };
        assert!(!filter.accepts("src/generated/api.ts", 10));
        assert!(filter.accepts("src/api.ts", 10));
    }
}
