//! JSON artifacts written by the passes. Each one deserialises from its own
//! output, so later passes can load what earlier passes wrote; every field is
//! defaulted so a missing or older file still loads.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::categorize::Category;
use crate::facts::{Fact, Quad};
use crate::indexer::{ImportRecord, SymbolKind, SymbolRecord};

use super::StepFailure;

/// Per-file line of `knowledge_extraction.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileSummary {
    pub file: String,
    pub triple_count: usize,
    pub quad_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// `extract` pass output.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionArtifact {
    pub triples: Vec<Fact>,
    pub quads: Vec<Quad>,
    pub files_analyzed: Vec<FileSummary>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<StepFailure>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ComprehensiveSummary {
    pub total_triples: usize,
    pub total_quads: usize,
    pub files_analyzed: Vec<String>,
    pub graphs: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileInfo {
    pub size: usize,
    pub lines: usize,
}

/// `enrich` pass output: extraction facts plus supplementary facts, grouped.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ComprehensiveArtifact {
    pub summary: ComprehensiveSummary,
    pub triples: Vec<Fact>,
    pub quads: Vec<Quad>,
    /// Keyed by graph label, in order of first appearance
    pub triples_by_graph: IndexMap<String, Vec<Fact>>,
    pub quads_by_graph: IndexMap<String, Vec<Quad>>,
    /// Keyed by file base name
    pub files_info: IndexMap<String, FileInfo>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<StepFailure>,
}

/// A categorised symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureItem {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: SymbolKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
}

impl From<&SymbolRecord> for FeatureItem {
    fn from(symbol: &SymbolRecord) -> Self {
        Self {
            name: symbol.name.clone(),
            kind: symbol.kind,
            line: symbol.line,
        }
    }
}

/// Per-file entry of `sensai_feature_analysis.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileFeatures {
    pub file: String,
    pub functions: Vec<SymbolRecord>,
    pub classes: Vec<SymbolRecord>,
    pub imports: Vec<ImportRecord>,
    pub variables: Vec<SymbolRecord>,
    pub features_by_category: BTreeMap<Category, Vec<FeatureItem>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureSummary {
    pub total_functions: usize,
    pub total_classes: usize,
    pub total_imports: usize,
    pub features_by_category: BTreeMap<Category, usize>,
}

/// `features` pass output.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureArtifact {
    pub repository: String,
    pub files: Vec<FileFeatures>,
    pub summary: FeatureSummary,
    /// Functions and classes of every file, by category
    pub categories: BTreeMap<Category, Vec<FeatureItem>>,
    pub dependencies: Vec<String>,
    pub dependencies_by_category: BTreeMap<Category, Vec<String>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<StepFailure>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InferredFeature {
    pub module: String,
    pub inference: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyFeature {
    pub dependency: String,
    pub capability: String,
}

/// `infer` pass output.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EnhancedArtifact {
    pub repository: String,
    pub analysis_method: String,
    pub files_analyzed: Vec<FileFeatures>,
    /// Display names from every source, by category
    pub feature_categories: BTreeMap<Category, Vec<String>>,
    pub inferred_features: BTreeMap<Category, Vec<InferredFeature>>,
    pub dependency_features: BTreeMap<Category, Vec<DependencyFeature>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<StepFailure>,
}

/// Returned by the `onboard` pass; printed, not written.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OnboardingSummary {
    pub memories_created: Vec<String>,
    pub triples: usize,
    pub quads: usize,
    pub output_files: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyFile {
    pub path: String,
    pub content_preview: String,
}

/// `survey` pass output.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SurveyArtifact {
    pub project_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory_structure: Option<String>,
    pub files: Vec<KeyFile>,
    pub triples: Vec<Fact>,
    pub quads: Vec<Quad>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<StepFailure>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolFileSummary {
    pub file: String,
    pub symbols: usize,
    pub references: usize,
    /// Symbol names found by each configured name search
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub pattern_matches: IndexMap<String, Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// `symbols` pass output.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SymbolsArtifact {
    pub project_path: String,
    pub files: Vec<SymbolFileSummary>,
    pub triples: Vec<Fact>,
    pub quads: Vec<Quad>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<StepFailure>,
}
