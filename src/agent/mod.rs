//! Tool interface of the code-analysis agent the passes talk to.
//!
//! The passes only depend on [`AnalysisAgent`]; [`LocalAgent`] answers every
//! call from the project directory itself, so a run needs no external process.

pub mod local;
pub mod provision;

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::indexer::{SymbolKind, SymbolRecord};

pub use local::LocalAgent;
pub use provision::provision_project;

/// One line matched by a pattern search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternMatch {
    pub file: String,
    /// 1-based
    pub line: u32,
    pub text: String,
}

impl fmt::Display for PatternMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.file, self.line, self.text)
    }
}

/// A symbol found by name, with the file that defines it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolMatch {
    pub file: String,
    pub symbol: SymbolRecord,
}

/// A use of some symbol, attributed to the definition enclosing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolReference {
    /// Enclosing function or class; the file's base name at module level
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<SymbolKind>,
    pub file: String,
    pub line: u32,
}

pub trait AnalysisAgent {
    /// Entries below `path`, relative to it; directories end with `/`.
    fn list_dir(&self, path: &Path, recursive: bool) -> Result<Vec<String>>;

    fn read_file(&self, path: &Path) -> Result<String>;

    /// Regex search over every non-ignored file of the project.
    fn search_pattern(&self, pattern: &str) -> Result<Vec<PatternMatch>>;

    /// Functions and classes defined in one file.
    fn symbols_overview(&self, path: &Path) -> Result<Vec<SymbolRecord>>;

    /// Symbols whose name contains `pattern`, in `path` or the whole project.
    fn find_symbol(&self, pattern: &str, path: Option<&Path>) -> Result<Vec<SymbolMatch>>;

    /// Places that use the symbol `name` defined in `path`.
    fn find_referencing_symbols(&self, name: &str, path: &Path) -> Result<Vec<SymbolReference>>;

    /// Persist a memory document and return where it was written.
    fn write_memory(&self, name: &str, content: &str) -> Result<PathBuf>;
}

/// Plain-text overview, one symbol per line.
pub fn render_overview(symbols: &[SymbolRecord]) -> String {
    symbols
        .iter()
        .map(|s| match s.line {
            Some(line) => format!("{} {} (line {})", s.kind.as_str(), s.name, line),
            None => format!("{} {}", s.kind.as_str(), s.name),
        })
        .collect::<Vec<_>>()
        .join("\n")
}
