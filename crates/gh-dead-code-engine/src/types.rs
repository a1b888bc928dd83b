//! Engine input and output records

use crate::language::LanguageFamily;
use gh_client::BranchHead;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A text file taken from a repository snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Path relative to the repository root, `/` separated
    pub path: String,
    pub content: String,
    /// Definitions in this file may be reported; otherwise the file only
    /// contributes references
    pub candidate: bool,
}

/// Per-request analysis options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnalysisOptions {
    /// Only analyze files of this language family (None = all supported)
    pub language: Option<LanguageFamily>,
}

/// A repository opened for analysis
#[derive(Debug, Clone)]
pub struct RepositorySnapshot {
    pub owner: String,
    pub repo: String,

    /// Commit the files were read from
    pub head: BranchHead,

    /// Files in scope, sorted by path
    pub files: Vec<SourceFile>,
}

impl RepositorySnapshot {
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}

/// Kind of a reported definition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolKind {
    Function,
    Class,
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SymbolKind::Function => write!(f, "function"),
            SymbolKind::Class => write!(f, "class"),
        }
    }
}

/// One unused definition as reported by the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolRecord {
    pub file_path: String,
    pub name: String,
    pub kind: SymbolKind,

    /// 1-based first line of the definition, if known
    pub line: Option<u32>,

    /// Full source text of the definition, if known
    pub source: Option<String>,
}
