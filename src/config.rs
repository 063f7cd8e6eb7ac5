//! Analysis configuration.
//!
//! Every field has a default, so an absent or partial `code-knowledge.toml`
//! is valid. The CLI overrides individual values after loading.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, Result};

pub const CONFIG_FILENAME: &str = "code-knowledge.toml";

/// What a step failure does to the rest of the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Log, record in the run report, continue with partial results.
    #[default]
    BestEffort,
    /// Abort the run on the first failure.
    FailFast,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Root of the analysed project
    pub project_path: PathBuf,
    /// Display name; defaults to the project directory name
    pub project_name: Option<String>,
    /// Source files to analyse, relative to the project root. Empty means
    /// every Python file the walker finds.
    pub target_files: Vec<String>,
    /// Files read through the agent during the survey pass
    pub key_files: Vec<String>,
    /// Concepts looked up in README.md
    pub readme_concepts: Vec<String>,
    /// Patterns searched through the agent during the survey pass
    pub search_patterns: Vec<String>,
    /// Symbol-name searches run per target file during the symbols pass
    pub symbol_patterns: Vec<String>,
    pub extraction: ExtractionConfig,
    pub output: OutputConfig,
    pub provision: ProvisionConfig,
    pub policy: FailurePolicy,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            project_path: PathBuf::from("."),
            project_name: None,
            target_files: Vec::new(),
            key_files: vec![
                "README.md".to_string(),
                "install.py".to_string(),
                "requirements.txt".to_string(),
            ],
            readme_concepts: ["Python", "Termux", "Linux", "installation", "voice", "ALSA"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            search_patterns: ["import", "def ", "class ", "API", "GPT", "openai"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            symbol_patterns: ["def ", "class ", "import "]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            extraction: ExtractionConfig::default(),
            output: OutputConfig::default(),
            provision: ProvisionConfig::default(),
            policy: FailurePolicy::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Emit `calls` facts for `obj.method()` as well as bare-name calls
    pub attribute_calls: bool,
    /// Variables with names this short or shorter are not categorised
    pub min_variable_len: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            attribute_calls: false,
            min_variable_len: 3,
        }
    }
}

/// Output locations, relative to the project root.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub memories_dir: PathBuf,
    pub extraction_json: PathBuf,
    pub comprehensive_json: PathBuf,
    pub features_json: PathBuf,
    pub enhanced_json: PathBuf,
    pub symbols_json: PathBuf,
    pub survey_json: PathBuf,
    pub triples_nt: PathBuf,
    pub quads_nq: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            memories_dir: PathBuf::from(".serena/memories"),
            extraction_json: PathBuf::from("knowledge_extraction.json"),
            comprehensive_json: PathBuf::from("serena_comprehensive_analysis.json"),
            features_json: PathBuf::from("sensai_feature_analysis.json"),
            enhanced_json: PathBuf::from("enhanced_sensai_analysis.json"),
            symbols_json: PathBuf::from("serena_analysis.json"),
            survey_json: PathBuf::from(".serena/analysis_output.json"),
            triples_nt: PathBuf::from("knowledge_triples.nt"),
            quads_nq: PathBuf::from("knowledge_quads.nq"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvisionConfig {
    pub enabled: bool,
    /// Package-runner command; `{project}` is replaced by the project name
    pub command: Vec<String>,
}

impl Default for ProvisionConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            command: [
                "uvx",
                "--from",
                "git+https://github.com/oraios/serena",
                "serena",
                "project",
                "create",
                "--language",
                "python",
                "--name",
                "{project}",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

impl AnalysisConfig {
    pub fn for_project(project_path: impl Into<PathBuf>) -> Self {
        Self {
            project_path: project_path.into(),
            ..Self::default()
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| AnalysisError::Config(e.to_string()))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Load `code-knowledge.toml` from the project root when present,
    /// otherwise fall back to defaults for that project.
    pub fn discover(project_path: &Path) -> Result<Self> {
        let candidate = project_path.join(CONFIG_FILENAME);
        let mut config = if candidate.is_file() {
            tracing::debug!("Loading configuration from {}", candidate.display());
            Self::from_file(&candidate)?
        } else {
            Self::default()
        };
        config.project_path = project_path.to_path_buf();
        Ok(config)
    }

    pub fn project_name(&self) -> String {
        if let Some(name) = &self.project_name {
            return name.clone();
        }
        let path = self
            .project_path
            .canonicalize()
            .unwrap_or_else(|_| self.project_path.clone());
        path.file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "project".to_string())
    }

    /// Resolve an output path against the project root.
    pub fn output_path(&self, relative: &Path) -> PathBuf {
        self.project_path.join(relative)
    }

    pub fn memories_path(&self) -> PathBuf {
        self.output_path(&self.output.memories_dir)
    }
}
