//! Source file → tree-sitter AST ingestion.
//!
//! This module picks the grammar for a file, parses it, and collects the
//! identifier nodes the resolver works with.

pub mod detect;

use crate::error::{RefsError, Result};
use detect::{detect_language, Language};
use std::path::Path;

/// A parsed source file.
pub struct ParsedSource {
    /// Detected language.
    pub language: Language,
    /// Raw file contents.
    pub source: Vec<u8>,
    /// Tree-sitter syntax tree over `source`.
    pub tree: tree_sitter::Tree,
}

impl ParsedSource {
    /// Read and parse `path`, detecting its language from the extension.
    pub fn read(path: &Path) -> Result<Self> {
        let language = detect_language(path).ok_or_else(|| RefsError::UnsupportedLanguage {
            path: path.to_path_buf(),
        })?;
        let source = std::fs::read(path).map_err(|e| RefsError::not_readable(path, e))?;
        let tree = parse_source(path, language, &source)?;

        Ok(Self {
            language,
            source,
            tree,
        })
    }

    /// All identifier nodes in the file, in source order.
    ///
    /// With `name`, only identifiers whose text equals it are returned.
    pub fn identifiers(&self, name: Option<&str>) -> Vec<tree_sitter::Node<'_>> {
        let mut found = Vec::new();
        collect_identifiers(
            self.tree.root_node(),
            &self.source,
            identifier_kinds(self.language),
            name,
            &mut found,
        );
        found
    }

    /// Start of the first syntax error in the tree, when there is one.
    ///
    /// Tree-sitter recovers from bad input, so the tree is still usable.
    pub fn first_syntax_error(&self) -> Option<tree_sitter::Point> {
        let mut node = self.tree.root_node();
        if !node.has_error() {
            return None;
        }
        loop {
            if node.is_error() || node.is_missing() {
                return Some(node.start_position());
            }
            let mut cursor = node.walk();
            let next = node.children(&mut cursor).find(|child| child.has_error());
            match next {
                Some(child) => node = child,
                None => return Some(node.start_position()),
            }
        }
    }

    /// Source text of `node`.
    pub fn text(&self, node: tree_sitter::Node<'_>) -> Result<&str> {
        Ok(node.utf8_text(&self.source)?)
    }
}

/// Tree-sitter grammar for `language`.
///
/// TypeScript has two grammars; `.tsx` files get the TSX one.
pub fn grammar(path: &Path, language: Language) -> tree_sitter::Language {
    match language {
        Language::Rust => tree_sitter_rust::language(),
        Language::Python => tree_sitter_python::language(),
        Language::C => tree_sitter_c::language(),
        Language::Cpp => tree_sitter_cpp::language(),
        Language::Java => tree_sitter_java::language(),
        Language::JavaScript => tree_sitter_javascript::language(),
        Language::TypeScript => {
            if path.extension().and_then(|e| e.to_str()) == Some("tsx") {
                tree_sitter_typescript::language_tsx()
            } else {
                tree_sitter_typescript::language_typescript()
            }
        }
        Language::Go => tree_sitter_go::language(),
    }
}

/// Parse `source` with the grammar for `language`.
pub fn parse_source(path: &Path, language: Language, source: &[u8]) -> Result<tree_sitter::Tree> {
    let mut parser = tree_sitter::Parser::new();
    parser
        .set_language(&grammar(path, language))
        .map_err(|e| RefsError::Parse {
            file: path.to_path_buf(),
            message: format!("Failed to set {} language: {:?}", language.as_str(), e),
        })?;

    parser
        .parse(source, None)
        .ok_or_else(|| RefsError::Parse {
            file: path.to_path_buf(),
            message: "Parse failed - no tree returned".to_string(),
        })
}

/// Node kinds that name something in `language`.
pub fn identifier_kinds(language: Language) -> &'static [&'static str] {
    match language {
        Language::Rust => &[
            "identifier",
            "field_identifier",
            "type_identifier",
            "shorthand_field_identifier",
        ],
        Language::Python => &["identifier"],
        Language::C => &["identifier", "field_identifier", "type_identifier"],
        Language::Cpp => &[
            "identifier",
            "field_identifier",
            "type_identifier",
            "namespace_identifier",
        ],
        Language::Java => &["identifier", "type_identifier"],
        Language::JavaScript => &[
            "identifier",
            "property_identifier",
            "shorthand_property_identifier",
        ],
        Language::TypeScript => &[
            "identifier",
            "property_identifier",
            "shorthand_property_identifier",
            "type_identifier",
        ],
        Language::Go => &[
            "identifier",
            "field_identifier",
            "type_identifier",
            "package_identifier",
        ],
    }
}

fn collect_identifiers<'tree>(
    node: tree_sitter::Node<'tree>,
    source: &[u8],
    kinds: &[&str],
    name: Option<&str>,
    found: &mut Vec<tree_sitter::Node<'tree>>,
) {
    if kinds.contains(&node.kind()) {
        let matches = match name {
            Some(name) => node.utf8_text(source).map(|t| t == name).unwrap_or(false),
            None => true,
        };
        if matches {
            found.push(node);
        }
        return;
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_identifiers(child, source, kinds, name, found);
    }
}
