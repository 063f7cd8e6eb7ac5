use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;

use crate::config::AnalysisConfig;
use crate::error::{AnalysisError, Result};
use crate::indexer::parser::read_lossy;
use crate::indexer::walker::{walk_entries, walk_entries_to};
use crate::indexer::{FactExtractor, FileWalker, SymbolKind, SymbolRecord};

use super::{AnalysisAgent, PatternMatch, SymbolMatch, SymbolReference};

/// Agent backed by the project directory: the walker, the fact extractor and
/// plain regex scans.
pub struct LocalAgent {
    root: PathBuf,
    memories_dir: PathBuf,
    walker: FileWalker,
    extractor: FactExtractor,
}

impl LocalAgent {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            root: config.project_path.clone(),
            memories_dir: config.memories_path(),
            walker: FileWalker::default(),
            extractor: FactExtractor::new(config.extraction.clone()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    fn display_path(&self, path: &Path) -> String {
        path.strip_prefix(&self.root)
            .unwrap_or(path)
            .to_string_lossy()
            .to_string()
    }

    fn definitions(&self, path: &Path, source: &str) -> Vec<SymbolRecord> {
        match self.extractor.extract_source(source, path) {
            Ok(extraction) => extraction
                .symbols
                .into_iter()
                .filter(|s| matches!(s.kind, SymbolKind::Function | SymbolKind::Class))
                .collect(),
            Err(e) => {
                tracing::debug!("No symbols for {}: {}", path.display(), e);
                Vec::new()
            }
        }
    }
}

impl AnalysisAgent for LocalAgent {
    fn list_dir(&self, path: &Path, recursive: bool) -> Result<Vec<String>> {
        let dir = self.resolve(path);
        if !dir.is_dir() {
            return Err(AnalysisError::FileNotFound(dir.display().to_string()));
        }

        let entries = if recursive {
            walk_entries(&dir)
        } else {
            walk_entries_to(&dir, Some(1))
        };

        Ok(entries
            .iter()
            .map(|entry| {
                let rel = entry.strip_prefix(&dir).unwrap_or(entry).to_string_lossy().to_string();
                if entry.is_dir() {
                    format!("{}/", rel)
                } else {
                    rel
                }
            })
            .collect())
    }

    fn read_file(&self, path: &Path) -> Result<String> {
        read_lossy(&self.resolve(path))
    }

    fn search_pattern(&self, pattern: &str) -> Result<Vec<PatternMatch>> {
        let re = Regex::new(pattern)?;
        let mut matches = Vec::new();

        for path in walk_entries(&self.root).into_iter().filter(|p| p.is_file()) {
            let content = match read_lossy(&path) {
                Ok(content) => content,
                Err(e) => {
                    tracing::debug!("Skipping {}: {}", path.display(), e);
                    continue;
                }
            };
            let file = self.display_path(&path);
            for (idx, line) in content.lines().enumerate() {
                if re.is_match(line) {
                    matches.push(PatternMatch {
                        file: file.clone(),
                        line: idx as u32 + 1,
                        text: line.trim().to_string(),
                    });
                }
            }
        }

        Ok(matches)
    }

    fn symbols_overview(&self, path: &Path) -> Result<Vec<SymbolRecord>> {
        let extraction = self.extractor.extract_file(&self.resolve(path))?;
        Ok(extraction
            .symbols
            .into_iter()
            .filter(|s| matches!(s.kind, SymbolKind::Function | SymbolKind::Class))
            .collect())
    }

    fn find_symbol(&self, pattern: &str, path: Option<&Path>) -> Result<Vec<SymbolMatch>> {
        let files = match path {
            Some(p) => vec![self.resolve(p)],
            None => self.walker.walk(&self.root)?,
        };
        let needle = pattern.trim().to_lowercase();

        let mut found = Vec::new();
        for file in files {
            let extraction = self.extractor.extract_file(&file)?;
            let display = self.display_path(&file);
            found.extend(
                extraction
                    .symbols
                    .into_iter()
                    .filter(|s| s.name.to_lowercase().contains(&needle))
                    .map(|symbol| SymbolMatch {
                        file: display.clone(),
                        symbol,
                    }),
            );
        }
        Ok(found)
    }

    /// Each use is attributed to the innermost function or class whose body
    /// contains it, or to the file's base name at module level.
    fn find_referencing_symbols(&self, name: &str, path: &Path) -> Result<Vec<SymbolReference>> {
        let word = Regex::new(&format!(r"\b{}\b", regex::escape(name)))?;
        let origin = self.resolve(path);
        let mut references = Vec::new();

        for file in self.walker.walk(&self.root)? {
            let source = read_lossy(&file)?;
            let mut defs = self.definitions(&file, &source);
            defs.sort_by_key(|d| d.line.unwrap_or(0));
            let base = crate::indexer::base_name(&file);
            let display = self.display_path(&file);

            for (idx, line) in source.lines().enumerate() {
                if !word.is_match(line) {
                    continue;
                }
                let lineno = idx as u32 + 1;
                let is_definition = file == origin
                    && defs.iter().any(|d| d.name == name && d.line == Some(lineno));
                if is_definition {
                    continue;
                }

                // sorted by start line, so the last span hit is the innermost
                let enclosing = defs.iter().filter(|d| d.spans(lineno)).last();
                references.push(SymbolReference {
                    name: enclosing.map(|d| d.name.clone()).unwrap_or_else(|| base.clone()),
                    kind: enclosing.map(|d| d.kind),
                    file: display.clone(),
                    line: lineno,
                });
            }
        }

        Ok(references)
    }

    fn write_memory(&self, name: &str, content: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.memories_dir)?;
        let path = self.memories_dir.join(name);
        fs::write(&path, content)?;
        tracing::debug!("Wrote memory {}", path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn project() -> (TempDir, LocalAgent) {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("app.py"),
            "import os\n\ndef helper(x):\n    return x\n\ndef main():\n    helper(1)\n\nhelper(2)\n",
        )
        .unwrap();
        fs::create_dir_all(dir.path().join("pkg")).unwrap();
        fs::write(dir.path().join("pkg/util.py"), "class Tool:\n    pass\n").unwrap();
        fs::write(dir.path().join("README.md"), "# Demo\n").unwrap();

        let agent = LocalAgent::new(&AnalysisConfig::for_project(dir.path()));
        (dir, agent)
    }

    #[test]
    fn test_list_dir_recursive_and_flat() {
        let (_dir, agent) = project();

        let all = agent.list_dir(Path::new("."), true).unwrap();
        assert!(all.contains(&"pkg/".to_string()));
        assert!(all.iter().any(|e| e.ends_with("util.py")));

        let top = agent.list_dir(Path::new("."), false).unwrap();
        assert!(top.contains(&"app.py".to_string()));
        assert!(!top.iter().any(|e| e.ends_with("util.py")));
    }

    #[test]
    fn test_list_dir_missing() {
        let (_dir, agent) = project();
        assert!(agent.list_dir(Path::new("nope"), true).is_err());
    }

    #[test]
    fn test_read_file() {
        let (_dir, agent) = project();
        assert_eq!(agent.read_file(Path::new("README.md")).unwrap(), "# Demo\n");
        let err = agent.read_file(Path::new("missing.txt")).unwrap_err();
        assert!(matches!(err, AnalysisError::FileNotFound(_)));
    }

    #[test]
    fn test_search_pattern() {
        let (_dir, agent) = project();
        let matches = agent.search_pattern("def ").unwrap();
        assert_eq!(matches.len(), 2);
        assert!(matches.iter().all(|m| m.file == "app.py"));
        assert_eq!(matches[0].line, 3);
    }

    #[test]
    fn test_search_pattern_invalid_regex() {
        let (_dir, agent) = project();
        let err = agent.search_pattern("(unclosed").unwrap_err();
        assert!(matches!(err, AnalysisError::Regex(_)));
    }

    #[test]
    fn test_symbols_overview_excludes_variables() {
        let (_dir, agent) = project();
        let symbols = agent.symbols_overview(Path::new("app.py")).unwrap();
        let names: Vec<_> = symbols.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["helper", "main"]);
    }

    #[test]
    fn test_find_symbol_project_wide() {
        let (_dir, agent) = project();
        let found = agent.find_symbol("tool", None).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].symbol.name, "Tool");
        assert!(found[0].file.ends_with("util.py"));
    }

    #[test]
    fn test_find_referencing_symbols() {
        let (_dir, agent) = project();
        let refs = agent
            .find_referencing_symbols("helper", Path::new("app.py"))
            .unwrap();

        assert_eq!(refs.len(), 2);
        assert_eq!(refs[0].name, "main");
        assert_eq!(refs[0].kind, Some(SymbolKind::Function));
        assert_eq!(refs[0].line, 7);
        // module-level call below main() belongs to the file, not to main
        assert_eq!(refs[1].name, "app.py");
        assert_eq!(refs[1].kind, None);
        assert_eq!(refs[1].line, 9);
    }

    #[test]
    fn test_find_referencing_symbols_innermost_definition() {
        let (dir, agent) = project();
        fs::write(
            dir.path().join("voice.py"),
            "from app import helper\n\nclass Voice:\n    def speak(self):\n        return helper(3)\n\n    size = helper(4)\n",
        )
        .unwrap();

        let refs: Vec<_> = agent
            .find_referencing_symbols("helper", Path::new("app.py"))
            .unwrap()
            .into_iter()
            .filter(|r| r.file == "voice.py")
            .collect();
        let names: Vec<_> = refs.iter().map(|r| (r.name.as_str(), r.line)).collect();
        assert_eq!(names, vec![("voice.py", 1), ("speak", 5), ("Voice", 7)]);
    }

    #[test]
    fn test_write_memory_creates_directory() {
        let (dir, agent) = project();
        let path = agent.write_memory("notes.md", "# Notes").unwrap();
        assert_eq!(path, dir.path().join(".serena/memories/notes.md"));
        assert_eq!(fs::read_to_string(path).unwrap(), "# Notes");
    }
}
