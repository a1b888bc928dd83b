//! Tree-sitter extraction of top-level definitions and name references
//!
//! Only definitions that sit directly at module level are candidates.
//! Every identifier-like token in the file is counted, definitions
//! included, so the detector can tell "only defined" from "also used".

use crate::error::EngineError;
use crate::language::SourceLanguage;
use crate::types::SymbolKind;
use std::collections::HashMap;
use tree_sitter::{Node, Parser};

/// Leaf node kinds that name something
const NAME_KINDS: &[&str] = &[
    "identifier",
    "property_identifier",
    "shorthand_property_identifier",
    "shorthand_property_identifier_pattern",
    "type_identifier",
];

/// JS/TS initializer kinds that make a `const x = ...` binding a function
const FUNCTION_VALUE_KINDS: &[&str] = &[
    "arrow_function",
    "function",
    "function_expression",
    "generator_function",
];

/// A top-level definition that may turn out to be dead
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Definition {
    pub name: String,
    pub kind: SymbolKind,
    /// 1-based first line of the whole definition
    pub line: u32,
    pub source: String,
}

/// What one file contributes to the analysis
#[derive(Debug, Default)]
pub struct FileOutline {
    /// Non-exported top-level definitions, in source order
    pub definitions: Vec<Definition>,
    /// Occurrences of every name in the file
    pub name_counts: HashMap<String, usize>,
    /// The parse tree contains error nodes
    pub has_errors: bool,
}

/// Parse `content` and collect its outline
pub fn outline_file(
    path: &str,
    content: &str,
    language: SourceLanguage,
) -> Result<FileOutline, EngineError> {
    let mut parser = Parser::new();
    parser
        .set_language(&language.grammar())
        .map_err(|e| EngineError::Parser {
            path: path.to_string(),
            message: e.to_string(),
        })?;

    let tree = parser
        .parse(content, None)
        .ok_or_else(|| EngineError::Parser {
            path: path.to_string(),
            message: "parser produced no tree".to_string(),
        })?;
    let root = tree.root_node();
    let source = content.as_bytes();

    let mut outline = FileOutline {
        has_errors: root.has_error(),
        ..FileOutline::default()
    };

    let mut cursor = root.walk();
    for child in root.named_children(&mut cursor) {
        let definition = match language {
            SourceLanguage::Python => python_definition(child, source),
            _ => script_definition(child, source),
        };
        if let Some(definition) = definition {
            outline.definitions.push(definition);
        }
    }

    count_names(root, source, language, &mut outline.name_counts);
    Ok(outline)
}

fn text<'a>(node: Node, source: &'a [u8]) -> &'a str {
    node.utf8_text(source).unwrap_or_default()
}

fn definition(node: Node, name: Node, kind: SymbolKind, source: &[u8]) -> Option<Definition> {
    let name = text(name, source);
    if name.is_empty() {
        return None;
    }
    Some(Definition {
        name: name.to_string(),
        kind,
        line: node.start_position().row as u32 + 1,
        source: text(node, source).to_string(),
    })
}

/// JavaScript / TypeScript module-level definitions
///
/// `export_statement` children are exported and therefore skipped.
fn script_definition(node: Node, source: &[u8]) -> Option<Definition> {
    match node.kind() {
        "function_declaration" | "generator_function_declaration" => {
            definition(node, node.child_by_field_name("name")?, SymbolKind::Function, source)
        }
        "class_declaration" | "abstract_class_declaration" => {
            definition(node, node.child_by_field_name("name")?, SymbolKind::Class, source)
        }
        "lexical_declaration" | "variable_declaration" => {
            let mut cursor = node.walk();
            let declarators: Vec<Node> = node
                .named_children(&mut cursor)
                .filter(|c| c.kind() == "variable_declarator")
                .collect();
            let [declarator] = declarators.as_slice() else {
                return None;
            };

            let name = declarator.child_by_field_name("name")?;
            if name.kind() != "identifier" {
                return None;
            }
            let value = declarator.child_by_field_name("value")?;
            let kind = if FUNCTION_VALUE_KINDS.contains(&value.kind()) {
                SymbolKind::Function
            } else if value.kind() == "class" {
                SymbolKind::Class
            } else {
                return None;
            };
            definition(node, name, kind, source)
        }
        _ => None,
    }
}

/// Python module-level definitions, decorators included in the span
fn python_definition(node: Node, source: &[u8]) -> Option<Definition> {
    let inner = match node.kind() {
        "decorated_definition" => node.child_by_field_name("definition")?,
        "function_definition" | "class_definition" => node,
        _ => return None,
    };
    let kind = match inner.kind() {
        "function_definition" => SymbolKind::Function,
        "class_definition" => SymbolKind::Class,
        _ => return None,
    };

    let def = definition(node, inner.child_by_field_name("name")?, kind, source)?;
    // Module-level dunders (__getattr__, __dir__) are called by the runtime.
    if def.name.starts_with("__") && def.name.ends_with("__") {
        return None;
    }
    Some(def)
}

/// Count every name-like token under `root`
///
/// Python string literals holding a bare identifier count as well, which
/// covers `__all__` lists and `getattr(module, "name")`.
fn count_names(
    root: Node,
    source: &[u8],
    language: SourceLanguage,
    counts: &mut HashMap<String, usize>,
) {
    let mut cursor = root.walk();
    loop {
        let node = cursor.node();
        let counted = NAME_KINDS.contains(&node.kind())
            || (language == SourceLanguage::Python
                && node.kind() == "string_content"
                && is_identifier(text(node, source)));
        if counted {
            let name = text(node, source);
            if !name.is_empty() {
                *counts.entry(name.to_string()).or_insert(0) += 1;
            }
        }

        if cursor.goto_first_child() {
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return;
            }
        }
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c == '_' || c == '$' || c.is_alphabetic())
        && chars.all(|c| c == '_' || c == '$' || c.is_alphanumeric())
}
