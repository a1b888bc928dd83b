//! Shapes crossing the HTTP boundary
//!
//! Requests are statically typed and reject unknown fields; responses
//! serialize exactly the documented fields.

use crate::error::ServiceError;
use gh_dead_code_engine::{LanguageFamily, SymbolKind, SymbolRecord};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;
use url::Url;

static NAME_SEGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9._-]+$").expect("valid name pattern"));

/// Owner and name of a hosted repository
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositoryReference {
    pub owner: String,
    pub repo: String,
}

impl RepositoryReference {
    /// Parse a repository URL or `owner/repo` shorthand for `host`
    ///
    /// Accepts `https://host/owner/repo` (also `http`, `www.`, trailing
    /// slash, `.git` suffix), `host/owner/repo` and `owner/repo`. Anything
    /// that does not resolve to exactly an owner and a name is rejected.
    pub fn parse(input: &str, host: &str) -> Result<Self, ServiceError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ServiceError::Validation(
                "repo_url must not be empty".to_string(),
            ));
        }

        let path = if input.contains("://") {
            url_path(input, host)?
        } else {
            strip_host(input, host).unwrap_or(input).to_string()
        };

        let segments: Vec<&str> = path.trim_matches('/').split('/').collect();
        let (owner, repo) = match segments.as_slice() {
            [owner, repo] => (*owner, *repo),
            _ => {
                return Err(invalid(
                    input,
                    "expected exactly an owner and a repository name",
                ))
            }
        };
        let repo = repo.strip_suffix(".git").unwrap_or(repo);

        for segment in [owner, repo] {
            if !NAME_SEGMENT.is_match(segment) || segment == "." || segment == ".." {
                return Err(invalid(input, "owner or repository name is malformed"));
            }
        }

        Ok(Self {
            owner: owner.to_string(),
            repo: repo.to_string(),
        })
    }

    /// `owner/repo`
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}

impl fmt::Display for RepositoryReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

fn invalid(input: &str, reason: &str) -> ServiceError {
    ServiceError::Validation(format!("Invalid repository URL '{}': {}", input, reason))
}

fn host_matches(candidate: &str, host: &str) -> bool {
    let candidate = candidate.to_ascii_lowercase();
    let host = host.to_ascii_lowercase();
    candidate == host || candidate == format!("www.{}", host)
}

fn url_path(input: &str, host: &str) -> Result<String, ServiceError> {
    let url = Url::parse(input).map_err(|e| invalid(input, &e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(input, "only http and https URLs are supported"));
    }
    if !url.username().is_empty() || url.password().is_some() {
        return Err(invalid(input, "credentials in the URL are not allowed"));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(invalid(input, "query strings and fragments are not allowed"));
    }
    if !url.host_str().is_some_and(|h| host_matches(h, host)) {
        return Err(invalid(input, &format!("repository must be hosted on {}", host)));
    }

    Ok(url.path().to_string())
}

fn strip_host<'a>(input: &'a str, host: &str) -> Option<&'a str> {
    let (first, rest) = input.split_once('/')?;
    host_matches(first, host).then_some(rest)
}

/// Language restriction accepted in requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    TypeScript,
    JavaScript,
    Python,
}

impl Language {
    pub fn family(self) -> LanguageFamily {
        match self {
            Language::TypeScript | Language::JavaScript => LanguageFamily::TypeScript,
            Language::Python => LanguageFamily::Python,
        }
    }
}

/// Body of `POST /analyze` and `POST /create-pr`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnalyzeRequest {
    pub repo_url: String,
    #[serde(default)]
    pub language: Option<Language>,
}

/// Kind of a dead symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolType {
    Function,
    Class,
}

impl fmt::Display for SymbolType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SymbolType::Function => write!(f, "function"),
            SymbolType::Class => write!(f, "class"),
        }
    }
}

impl From<SymbolKind> for SymbolType {
    fn from(kind: SymbolKind) -> Self {
        match kind {
            SymbolKind::Function => SymbolType::Function,
            SymbolKind::Class => SymbolType::Class,
        }
    }
}

/// An unused function or class
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeadSymbol {
    pub file_path: String,
    pub symbol_name: String,
    pub symbol_type: SymbolType,
    /// 1-based line of the definition, 0 when unknown
    pub line_number: u32,
    /// Definition source, used for removal and PR descriptions only
    #[serde(skip)]
    pub source_text: Option<String>,
}

impl DeadSymbol {
    /// `"<kind> <name> in <file_path>"`
    pub fn describe(&self) -> String {
        format!(
            "{} {} in {}",
            self.symbol_type, self.symbol_name, self.file_path
        )
    }
}

impl From<SymbolRecord> for DeadSymbol {
    fn from(record: SymbolRecord) -> Self {
        Self {
            file_path: record.file_path,
            symbol_name: record.name,
            symbol_type: record.kind.into(),
            line_number: record.line.unwrap_or(0),
            source_text: record.source,
        }
    }
}

/// Outcome of a successful create-PR flow
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PullRequestResult {
    pub pr_url: String,
    pub branch_name: String,
    pub removed_items: Vec<String>,
}

/// Response of `POST /create-pr`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum CreatePrResponse {
    Created(PullRequestResult),
    NothingToRemove {
        message: String,
        removed_items: Vec<String>,
    },
}

impl CreatePrResponse {
    pub fn nothing_to_remove() -> Self {
        CreatePrResponse::NothingToRemove {
            message: "No dead code found; nothing to remove".to_string(),
            removed_items: Vec::new(),
        }
    }
}

/// One entry of the `GET /` endpoint listing
#[derive(Debug, Clone, Serialize)]
pub struct EndpointInfo {
    pub method: &'static str,
    pub path: &'static str,
    pub description: &'static str,
}

/// Response of `GET /`
#[derive(Debug, Clone, Serialize)]
pub struct ApiInfo {
    pub message: String,
    pub version: String,
    pub endpoints: Vec<EndpointInfo>,
}

impl ApiInfo {
    pub fn current() -> Self {
        Self {
            message: "Dead Code Analyzer API".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            endpoints: vec![
                EndpointInfo {
                    method: "GET",
                    path: "/",
                    description: "API information",
                },
                EndpointInfo {
                    method: "POST",
                    path: "/analyze",
                    description: "List unused functions and classes of a repository",
                },
                EndpointInfo {
                    method: "POST",
                    path: "/create-pr",
                    description: "Open a pull request removing unused functions and classes",
                },
            ],
        }
    }
}

/// Error response body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}
