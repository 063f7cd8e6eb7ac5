use serde::{Deserialize, Serialize};

use crate::facts::Fact;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolKind {
    Function,
    Class,
    Variable,
    Import,
}

impl SymbolKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SymbolKind::Function => "function",
            SymbolKind::Class => "class",
            SymbolKind::Variable => "variable",
            SymbolKind::Import => "import",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "function" | "method" | "def" => Some(SymbolKind::Function),
            "class" => Some(SymbolKind::Class),
            "variable" | "var" | "constant" => Some(SymbolKind::Variable),
            "import" | "module" => Some(SymbolKind::Import),
            _ => None,
        }
    }
}

/// A symbol seen while walking one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolRecord {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: SymbolKind,
    /// 1-based; absent for regex-derived symbols
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    /// Last line of the definition body, 1-based
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_line: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bases: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub methods: Vec<String>,
}

impl SymbolRecord {
    pub fn new(name: impl Into<String>, kind: SymbolKind) -> Self {
        Self {
            name: name.into(),
            kind,
            line: None,
            end_line: None,
            params: Vec::new(),
            bases: Vec::new(),
            methods: Vec::new(),
        }
    }

    pub fn at_line(mut self, line: u32) -> Self {
        self.line = Some(line);
        self
    }

    pub fn ending_at(mut self, line: u32) -> Self {
        self.end_line = Some(line);
        self
    }

    /// Whether `line` falls inside this definition. Always false for
    /// symbols without a known span.
    pub fn spans(&self, line: u32) -> bool {
        match (self.line, self.end_line) {
            (Some(start), Some(end)) => start <= line && line <= end,
            _ => false,
        }
    }

    pub fn with_params(mut self, params: Vec<String>) -> Self {
        self.params = params;
        self
    }

    pub fn with_bases(mut self, bases: Vec<String>) -> Self {
        self.bases = bases;
        self
    }

    pub fn with_methods(mut self, methods: Vec<String>) -> Self {
        self.methods = methods;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportKind {
    Import,
    ImportFrom,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportRecord {
    pub module: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(rename = "type")]
    pub kind: ImportKind,
}

/// Everything one file walk produced.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Extraction {
    pub facts: Vec<Fact>,
    pub symbols: Vec<SymbolRecord>,
    pub imports: Vec<ImportRecord>,
    /// Set when the result came from the regex fallback
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl Extraction {
    pub fn symbols_of(&self, kind: SymbolKind) -> impl Iterator<Item = &SymbolRecord> {
        self.symbols.iter().filter(move |s| s.kind == kind)
    }

    pub fn is_fallback(&self) -> bool {
        self.note.is_some()
    }
}
