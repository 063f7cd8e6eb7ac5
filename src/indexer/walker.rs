use std::path::{Path, PathBuf};

use ignore::WalkBuilder;

use crate::error::Result;
use crate::languages::LanguageRegistry;

pub struct FileWalker {
    registry: LanguageRegistry,
}

impl FileWalker {
    pub fn new(registry: LanguageRegistry) -> Self {
        Self { registry }
    }

    /// Every supported source file under `root`, sorted for stable output.
    pub fn walk(&self, root: &Path) -> Result<Vec<PathBuf>> {
        let mut files: Vec<PathBuf> = walk_entries(root)
            .into_iter()
            .filter(|path| path.is_file() && self.is_supported(path))
            .collect();
        files.sort();
        Ok(files)
    }

    /// Resolve the files to analyse: the explicit targets when given (kept even
    /// if missing, so the caller can report them), otherwise a full walk.
    pub fn resolve_targets(&self, root: &Path, targets: &[String]) -> Result<Vec<PathBuf>> {
        if targets.is_empty() {
            return self.walk(root);
        }
        Ok(targets.iter().map(|t| root.join(t)).collect())
    }

    pub fn is_supported(&self, path: &Path) -> bool {
        self.registry.get_for_file(path).is_some()
    }
}

impl Default for FileWalker {
    fn default() -> Self {
        Self::new(LanguageRegistry::new())
    }
}

/// All non-ignored entries below `root` (files and directories, root excluded).
pub fn walk_entries(root: &Path) -> Vec<PathBuf> {
    walk_entries_to(root, None)
}

/// Like [`walk_entries`], stopping `max_depth` levels below `root`.
pub fn walk_entries_to(root: &Path, max_depth: Option<usize>) -> Vec<PathBuf> {
    let walker = WalkBuilder::new(root)
        .hidden(true)
        .git_ignore(true)
        .git_global(true)
        .git_exclude(true)
        .ignore(true)
        .max_depth(max_depth)
        .sort_by_file_name(|a, b| a.cmp(b))
        .build();

    walker
        .flatten()
        .filter(|entry| entry.depth() > 0)
        .map(|entry| entry.into_path())
        .collect()
}
