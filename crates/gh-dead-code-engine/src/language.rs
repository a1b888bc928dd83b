//! Supported languages and their tree-sitter grammars

use serde::{Deserialize, Serialize};
use tree_sitter::Language as TsLanguage;

/// Language of a single source file, decided by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceLanguage {
    JavaScript,
    TypeScript,
    Tsx,
    Python,
}

/// Group of languages that can reference each other's symbols
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageFamily {
    /// TypeScript, TSX and JavaScript
    TypeScript,
    Python,
}

impl SourceLanguage {
    /// Determine the language from a file path
    pub fn from_path(path: &str) -> Option<Self> {
        let file_name = path.rsplit('/').next().unwrap_or(path);
        let (_, ext) = file_name.rsplit_once('.')?;
        match ext.to_ascii_lowercase().as_str() {
            "js" | "jsx" | "mjs" | "cjs" => Some(SourceLanguage::JavaScript),
            "ts" | "mts" | "cts" => Some(SourceLanguage::TypeScript),
            "tsx" => Some(SourceLanguage::Tsx),
            "py" => Some(SourceLanguage::Python),
            _ => None,
        }
    }

    pub fn family(self) -> LanguageFamily {
        match self {
            SourceLanguage::JavaScript | SourceLanguage::TypeScript | SourceLanguage::Tsx => {
                LanguageFamily::TypeScript
            }
            SourceLanguage::Python => LanguageFamily::Python,
        }
    }

    /// Get the tree-sitter grammar for this language
    pub fn grammar(self) -> TsLanguage {
        match self {
            SourceLanguage::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
            SourceLanguage::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            SourceLanguage::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
            SourceLanguage::Python => tree_sitter_python::LANGUAGE.into(),
        }
    }

    /// Info string for a markdown code fence
    pub fn fence_name(self) -> &'static str {
        match self {
            SourceLanguage::JavaScript => "javascript",
            SourceLanguage::TypeScript | SourceLanguage::Tsx => "typescript",
            SourceLanguage::Python => "python",
        }
    }
}
