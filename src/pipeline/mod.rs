//! Analysis passes. Each pass reads the project (directly or through the
//! agent), writes its artifacts and returns them; `all` runs them in
//! dependency order.

mod extract;
mod features;
mod onboard;
mod survey;

use std::fmt;
use std::path::{Path, PathBuf};

use crate::agent::{provision_project, AnalysisAgent, LocalAgent};
use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::indexer::parser::read_lossy;
use crate::indexer::{FactExtractor, FileWalker};
use crate::report::RunReport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    Extract,
    Enrich,
    Features,
    Infer,
    Onboard,
    Survey,
    Symbols,
    All,
}

impl Pass {
    /// Order used by [`Pass::All`]; every pass comes after the ones whose
    /// output it loads.
    pub const SEQUENCE: [Pass; 7] = [
        Pass::Extract,
        Pass::Enrich,
        Pass::Onboard,
        Pass::Features,
        Pass::Infer,
        Pass::Survey,
        Pass::Symbols,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Pass::Extract => "extract",
            Pass::Enrich => "enrich",
            Pass::Features => "features",
            Pass::Infer => "infer",
            Pass::Onboard => "onboard",
            Pass::Survey => "survey",
            Pass::Symbols => "symbols",
            Pass::All => "all",
        }
    }
}

impl fmt::Display for Pass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub struct Pipeline<A: AnalysisAgent = LocalAgent> {
    config: AnalysisConfig,
    agent: A,
    extractor: FactExtractor,
    walker: FileWalker,
    report: RunReport,
}

impl Pipeline<LocalAgent> {
    pub fn local(config: AnalysisConfig) -> Self {
        let agent = LocalAgent::new(&config);
        Self::new(config, agent)
    }
}

impl<A: AnalysisAgent> Pipeline<A> {
    pub fn new(config: AnalysisConfig, agent: A) -> Self {
        Self {
            extractor: FactExtractor::new(config.extraction.clone()),
            walker: FileWalker::default(),
            report: RunReport::new(config.policy),
            config,
            agent,
        }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn report(&self) -> &RunReport {
        &self.report
    }

    pub fn into_report(self) -> RunReport {
        self.report
    }

    /// Register the project with the external agent when enabled. Never
    /// fatal: a failure is logged and the run goes on without it.
    pub fn provision(&mut self) {
        if !self.config.provision.enabled {
            return;
        }
        let name = self.config.project_name();
        match provision_project(&self.config.provision, &name, &self.config.project_path) {
            Ok(out) => tracing::info!("Project '{}' provisioned {}", name, out),
            Err(e) => tracing::warn!("Provisioning skipped: {}", e),
        }
    }

    pub fn run(&mut self, pass: Pass) -> Result<()> {
        tracing::info!("Running {} pass", pass);
        match pass {
            Pass::Extract => self.extract().map(drop),
            Pass::Enrich => self.enrich().map(drop),
            Pass::Features => self.features().map(drop),
            Pass::Infer => self.infer().map(drop),
            Pass::Onboard => self.onboard().map(drop),
            Pass::Survey => self.survey().map(drop),
            Pass::Symbols => self.symbols().map(drop),
            Pass::All => {
                for pass in Pass::SEQUENCE {
                    self.run(pass)?;
                }
                Ok(())
            }
        }
    }

    fn targets(&self) -> Result<Vec<PathBuf>> {
        self.walker
            .resolve_targets(&self.config.project_path, &self.config.target_files)
    }

    fn output(&self, relative: &Path) -> PathBuf {
        self.config.output_path(relative)
    }

    /// `path` relative to the project root, for display.
    fn relative(&self, path: &Path) -> String {
        path.strip_prefix(&self.config.project_path)
            .unwrap_or(path)
            .to_string_lossy()
            .to_string()
    }
}

/// Non-comment lines of `requirements.txt`; empty when the file is absent.
pub fn read_requirements(project_path: &Path) -> Result<Vec<String>> {
    let path = project_path.join("requirements.txt");
    if !path.is_file() {
        return Ok(Vec::new());
    }
    Ok(read_lossy(&path)?
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(String::from)
        .collect())
}
