//! Regex scan for sources the grammar cannot parse cleanly (minified or
//! obfuscated files). Yields a reduced fact set: definitions and imports only.

use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::facts::{graph, Fact, Predicate};

use super::records::{Extraction, ImportKind, ImportRecord, SymbolKind, SymbolRecord};

pub const FALLBACK_NOTE: &str = "Regex-based analysis (file may be obfuscated)";

static IMPORT_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^(?:from\s+(\S+)\s+)?import\s+(\S+)").expect("valid import regex"));
static FUNCTION_DEF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"def\s+(\w+)\s*\(").expect("valid def regex"));
static CLASS_DEF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"class\s+(\w+)").expect("valid class regex"));

/// Modules named by line-leading import statements. For `from X import Y`
/// this is `X`, otherwise the first imported name.
pub fn import_modules(source: &str) -> Vec<String> {
    IMPORT_LINE
        .captures_iter(source)
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)))
        .map(|m| m.as_str().trim_end_matches(',').to_string())
        .collect()
}

pub fn scan(source: &str, file_path: &Path) -> Extraction {
    let context = file_path.to_string_lossy().to_string();
    let base_name = super::base_name(file_path);
    let mut extraction = Extraction {
        note: Some(FALLBACK_NOTE.to_string()),
        ..Extraction::default()
    };

    for module in import_modules(source) {
        extraction.facts.push(
            Fact::new(&base_name, Predicate::Imports, &module)
                .with_context(&context)
                .in_graph(graph::DEPENDENCIES),
        );
        extraction.imports.push(ImportRecord {
            module,
            alias: None,
            kind: ImportKind::Import,
        });
    }

    for caps in FUNCTION_DEF.captures_iter(source) {
        let name = &caps[1];
        extraction.facts.push(
            Fact::new(name, Predicate::IsA, "function")
                .with_context(&context)
                .in_graph(graph::CODE_STRUCTURE),
        );
        extraction.symbols.push(SymbolRecord::new(name, SymbolKind::Function));
    }

    for caps in CLASS_DEF.captures_iter(source) {
        let name = &caps[1];
        extraction.facts.push(
            Fact::new(name, Predicate::IsA, "class")
                .with_context(&context)
                .in_graph(graph::CODE_STRUCTURE),
        );
        extraction.symbols.push(SymbolRecord::new(name, SymbolKind::Class));
    }

    extraction
}
