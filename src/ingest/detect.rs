//! Source language detection from file extensions.
//!
//! One table maps extensions to languages. Lookups are case-sensitive and
//! never look at file contents, so a search only parses files it can name.

use std::path::Path;

/// Languages the lexical resolver has a grammar for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    /// Rust
    Rust,
    /// Python
    Python,
    /// C
    C,
    /// C++
    Cpp,
    /// Java
    Java,
    /// JavaScript
    JavaScript,
    /// TypeScript, TSX included
    TypeScript,
    /// Go
    Go,
}

const EXTENSIONS: &[(&str, Language)] = &[
    ("rs", Language::Rust),
    ("py", Language::Python),
    ("c", Language::C),
    ("h", Language::C),
    ("cpp", Language::Cpp),
    ("hpp", Language::Cpp),
    ("cc", Language::Cpp),
    ("cxx", Language::Cpp),
    ("java", Language::Java),
    ("js", Language::JavaScript),
    ("mjs", Language::JavaScript),
    ("cjs", Language::JavaScript),
    ("ts", Language::TypeScript),
    ("tsx", Language::TypeScript),
    ("go", Language::Go),
];

impl Language {
    /// Lowercase name used in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Rust => "rust",
            Language::Python => "python",
            Language::C => "c",
            Language::Cpp => "cpp",
            Language::Java => "java",
            Language::JavaScript => "javascript",
            Language::TypeScript => "typescript",
            Language::Go => "go",
        }
    }

    /// File extensions searched for this language, without the dot.
    pub fn extensions(self) -> impl Iterator<Item = &'static str> {
        EXTENSIONS
            .iter()
            .filter(move |(_, language)| *language == self)
            .map(|(ext, _)| *ext)
    }

    /// Whether `path` is a source file of this language.
    pub fn matches(self, path: &Path) -> bool {
        detect_language(path) == Some(self)
    }
}

/// Detect the language of `path` from its extension.
///
/// # Examples
///
/// ```
/// # use identrefs::ingest::detect::{detect_language, Language};
/// # use std::path::Path;
/// assert_eq!(detect_language(Path::new("main.go")), Some(Language::Go));
/// assert_eq!(detect_language(Path::new("script.py")), Some(Language::Python));
/// assert_eq!(detect_language(Path::new("file.txt")), None);
/// ```
pub fn detect_language(path: &Path) -> Option<Language> {
    let extension = path.extension()?.to_str()?;
    EXTENSIONS
        .iter()
        .find(|(ext, _)| *ext == extension)
        .map(|(_, language)| *language)
}
