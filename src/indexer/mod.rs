pub mod extractor;
pub mod fallback;
pub mod parser;
pub mod records;
pub mod walker;

use std::path::Path;

pub use extractor::FactExtractor;
pub use parser::{ParsedFile, Parser};
pub use records::{Extraction, ImportKind, ImportRecord, SymbolKind, SymbolRecord};
pub use walker::FileWalker;

/// File name without directories, used as the subject of file-level facts.
pub fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string())
}
