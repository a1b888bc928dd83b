//! Dead symbol detection across a whole snapshot

use crate::error::EngineError;
use crate::language::SourceLanguage;
use crate::symbols::{outline_file, Definition};
use crate::types::{SourceFile, SymbolRecord};
use log::{debug, warn};
use std::collections::HashMap;

/// Report every definition whose name is never referenced
///
/// A name counts as referenced when it occurs more often, across all
/// files, than the number of candidate definitions carrying it. Non-candidate
/// files and files that fail to parse cleanly still contribute references
/// but report nothing, so they can only hide dead code, never invent it.
///
/// Output follows file order, then source order within a file.
pub fn find_dead_symbols(files: &[SourceFile]) -> Result<Vec<SymbolRecord>, EngineError> {
    let mut name_counts: HashMap<String, usize> = HashMap::new();
    let mut candidates: Vec<(&str, Vec<Definition>)> = Vec::new();

    for file in files {
        let Some(language) = SourceLanguage::from_path(&file.path) else {
            continue;
        };
        let outline = outline_file(&file.path, &file.content, language)?;

        for (name, count) in outline.name_counts {
            *name_counts.entry(name).or_insert(0) += count;
        }

        if !file.candidate {
            continue;
        }
        if outline.has_errors {
            warn!(
                "{} has syntax errors, its definitions are not reported",
                file.path
            );
            continue;
        }
        candidates.push((file.path.as_str(), outline.definitions));
    }

    let mut definitions_per_name: HashMap<&str, usize> = HashMap::new();
    for (_, definitions) in &candidates {
        for def in definitions {
            *definitions_per_name.entry(def.name.as_str()).or_insert(0) += 1;
        }
    }

    let mut dead = Vec::new();
    for (path, definitions) in &candidates {
        for def in definitions {
            let occurrences = name_counts.get(&def.name).copied().unwrap_or(0);
            let defined = definitions_per_name.get(def.name.as_str()).copied().unwrap_or(0);
            if occurrences > defined {
                continue;
            }
            dead.push(SymbolRecord {
                file_path: path.to_string(),
                name: def.name.clone(),
                kind: def.kind,
                line: Some(def.line),
                source: Some(def.source.clone()),
            });
        }
    }

    debug!(
        "Found {} dead symbols in {} files",
        dead.len(),
        files.len()
    );
    Ok(dead)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SymbolKind;

    fn file(path: &str, content: &str) -> SourceFile {
        SourceFile {
            path: path.to_string(),
            content: content.to_string(),
            candidate: true,
        }
    }

    fn reference_only(path: &str, content: &str) -> SourceFile {
        SourceFile {
            candidate: false,
            ..file(path, content)
        }
    }

    #[test]
    fn test_unused_function_reported_with_location() {
        let files = vec![file(
            "src/util.js",
            "// helpers\n\n\n\n\n\n\n\n\nfunction helper() {\n  return 1;\n}\n",
        )];

        let dead = find_dead_symbols(&files).unwrap();
        assert_eq!(dead.len(), 1);
        assert_eq!(dead[0].file_path, "src/util.js");
        assert_eq!(dead[0].name, "helper");
        assert_eq!(dead[0].kind, SymbolKind::Function);
        assert_eq!(dead[0].line, Some(10));
        assert_eq!(
            dead[0].source.as_deref(),
            Some("function helper() {\n  return 1;\n}")
        );
    }

    #[test]
    fn test_cross_file_reference_keeps_symbol_alive() {
        let files = vec![
            file("src/a.js", "function used() {}\nfunction unused() {}\n"),
            file("src/b.js", "import { used } from './a';\nused();\n"),
        ];

        let dead = find_dead_symbols(&files).unwrap();
        let names: Vec<&str> = dead.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["unused"]);
    }

    #[test]
    fn test_exported_symbols_are_never_dead() {
        let files = vec![file(
            "src/api.ts",
            "export function api() {}\nexport class Client {}\n",
        )];
        assert!(find_dead_symbols(&files).unwrap().is_empty());
    }

    #[test]
    fn test_duplicate_unused_definitions_both_reported() {
        let files = vec![
            file("src/a.js", "function dup() {}\n"),
            file("src/b.js", "function dup() {}\n"),
        ];
        let dead = find_dead_symbols(&files).unwrap();
        assert_eq!(dead.len(), 2);
        assert_eq!(dead[0].file_path, "src/a.js");
        assert_eq!(dead[1].file_path, "src/b.js");
    }

    #[test]
    fn test_broken_file_reports_nothing() {
        let files = vec![
            file("src/a.js", "function kept() {}\nkept();\n"),
            file("src/broken.js", "call(;\nfunction orphan() {}\n"),
        ];
        let dead = find_dead_symbols(&files).unwrap();
        assert!(dead.iter().all(|d| d.name != "orphan"));
        assert!(dead.iter().all(|d| d.name != "kept"));
    }

    #[test]
    fn test_python_and_classes() {
        let files = vec![file(
            "app/models.py",
            "class Used:\n    pass\n\n\nclass Unused:\n    pass\n\n\nx = Used()\n",
        )];
        let dead = find_dead_symbols(&files).unwrap();
        assert_eq!(dead.len(), 1);
        assert_eq!(dead[0].name, "Unused");
        assert_eq!(dead[0].kind, SymbolKind::Class);
        assert_eq!(dead[0].line, Some(5));
    }

    #[test]
    fn test_deterministic_order() {
        let files = vec![file(
            "src/util.js",
            "function b() {}\nclass A {}\nfunction c() {}\n",
        )];
        let first = find_dead_symbols(&files).unwrap();
        let second = find_dead_symbols(&files).unwrap();
        assert_eq!(first, second);
        let names: Vec<&str> = first.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["b", "A", "c"]);
    }

    #[test]
    fn test_reference_only_files_count_but_never_report() {
        let files = vec![
            file("app/util.py", "def helper():\n    pass\n\n\ndef unused():\n    pass\n"),
            reference_only(
                "tests/test_util.py",
                "from app.util import helper\n\n\ndef test_helper():\n    helper()\n",
            ),
        ];

        let dead = find_dead_symbols(&files).unwrap();
        let names: Vec<&str> = dead.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["unused"]);
    }
}
