use std::path::Path;
use std::sync::Arc;

use crate::error::{AnalysisError, Result};
use crate::languages::{LanguageGrammar, LanguageRegistry};

pub struct Parser {
    registry: LanguageRegistry,
}

impl Parser {
    pub fn new(registry: LanguageRegistry) -> Self {
        Self { registry }
    }

    pub fn parse_file(&self, path: &Path) -> Result<ParsedFile> {
        let grammar = self.grammar_for(path)?;
        let source = read_lossy(path)?;
        self.parse_source(&source, grammar)
    }

    pub fn parse_source(&self, source: &str, grammar: Arc<dyn LanguageGrammar>) -> Result<ParsedFile> {
        let mut parser = tree_sitter::Parser::new();
        parser
            .set_language(&grammar.language())
            .map_err(|e| AnalysisError::Parse(e.to_string()))?;

        let tree = parser
            .parse(source, None)
            .ok_or_else(|| AnalysisError::Parse("Failed to parse source".to_string()))?;

        Ok(ParsedFile {
            tree,
            source: source.to_string(),
            language: grammar.name().to_string(),
            grammar,
        })
    }

    pub fn grammar_for(&self, path: &Path) -> Result<Arc<dyn LanguageGrammar>> {
        self.registry
            .get_for_file(path)
            .ok_or_else(|| AnalysisError::UnsupportedLanguage(path.display().to_string()))
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new(LanguageRegistry::new())
    }
}

/// Read a file as text, replacing invalid UTF-8 instead of failing.
pub fn read_lossy(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(AnalysisError::FileNotFound(path.display().to_string()));
    }
    let bytes = std::fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

pub struct ParsedFile {
    pub tree: tree_sitter::Tree,
    pub source: String,
    pub language: String,
    pub grammar: Arc<dyn LanguageGrammar>,
}

impl ParsedFile {
    pub fn root_node(&self) -> tree_sitter::Node<'_> {
        self.tree.root_node()
    }

    pub fn source_bytes(&self) -> &[u8] {
        self.source.as_bytes()
    }

    pub fn node_text(&self, node: &tree_sitter::Node) -> &str {
        node.utf8_text(self.source_bytes()).unwrap_or("")
    }

    /// The grammar recovered from at least one syntax error.
    pub fn has_syntax_errors(&self) -> bool {
        self.root_node().has_error()
    }
}
