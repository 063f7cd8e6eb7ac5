use indexmap::IndexMap;

use crate::agent::AnalysisAgent;
use crate::error::Result;
use crate::facts::{graph, group_by_graph, to_quads, Fact, Predicate};
use crate::indexer::parser::read_lossy;
use crate::indexer::{base_name, fallback};
use crate::report::{
    load_json_or_default, write_json, ComprehensiveArtifact, ComprehensiveSummary, ExtractionArtifact,
    FileInfo, FileSummary,
};

use super::Pipeline;

impl<A: AnalysisAgent> Pipeline<A> {
    /// Facts and quads for every target file. A file that cannot be read
    /// gets an `error` entry and the remaining files are still processed.
    pub fn extract(&mut self) -> Result<ExtractionArtifact> {
        let mark = self.report.len();
        let mut artifact = ExtractionArtifact::default();

        for path in self.targets()? {
            let file = path.to_string_lossy().to_string();
            match self.extractor.extract_file(&path) {
                Ok(extraction) => {
                    let quads = to_quads(&extraction.facts);
                    tracing::debug!("{}: {} facts", file, extraction.facts.len());
                    artifact.files_analyzed.push(FileSummary {
                        file,
                        triple_count: extraction.facts.len(),
                        quad_count: quads.len(),
                        error: None,
                        note: extraction.note,
                    });
                    artifact.triples.extend(extraction.facts);
                    artifact.quads.extend(quads);
                }
                Err(e) => {
                    artifact.files_analyzed.push(FileSummary {
                        file: file.clone(),
                        error: Some(e.to_string()),
                        ..FileSummary::default()
                    });
                    self.report.record("extract", &file, e)?;
                }
            }
        }

        artifact.failures = self.report.failures_since(mark);
        write_json(&self.output(&self.config.output.extraction_json), &artifact)?;
        tracing::info!(
            "Extracted {} triples and {} quads from {} files",
            artifact.triples.len(),
            artifact.quads.len(),
            artifact.files_analyzed.len()
        );
        Ok(artifact)
    }

    /// Extraction output plus dependency, project-structure and concept
    /// facts, grouped by graph.
    pub fn enrich(&mut self) -> Result<ComprehensiveArtifact> {
        let mark = self.report.len();
        let existing: ExtractionArtifact =
            load_json_or_default(&self.output(&self.config.output.extraction_json))?;
        let project = self.config.project_name();

        let mut triples = existing.triples;
        let mut quads = existing.quads;
        let mut supplementary = Vec::new();
        let mut files_info = IndexMap::new();

        for path in self.targets()? {
            if !path.is_file() {
                tracing::debug!("Skipping missing {}", path.display());
                continue;
            }
            let Some(content) = self.report.step("enrich", path.display(), read_lossy(&path))? else {
                continue;
            };
            let name = base_name(&path);
            files_info.insert(
                name.clone(),
                FileInfo {
                    size: content.len(),
                    lines: content.split('\n').count(),
                },
            );

            let context = path.to_string_lossy().to_string();
            for module in fallback::import_modules(&content) {
                supplementary.push(
                    Fact::new(&name, Predicate::DependsOn, module)
                        .with_context(&context)
                        .in_graph(graph::DEPENDENCY_GRAPH),
                );
            }
        }

        for name in files_info.keys() {
            supplementary.push(
                Fact::new(name, Predicate::PartOf, &project)
                    .with_context(graph::PROJECT_STRUCTURE)
                    .in_graph(graph::PROJECT_STRUCTURE),
            );
        }

        let readme = self.config.project_path.join("README.md");
        if readme.is_file() {
            if let Some(content) = self.report.step("enrich", readme.display(), read_lossy(&readme))? {
                let lowered = content.to_lowercase();
                for concept in &self.config.readme_concepts {
                    if lowered.contains(&concept.to_lowercase()) {
                        supplementary.push(
                            Fact::new(&project, Predicate::RelatedTo, concept)
                                .with_context("README.md")
                                .in_graph(graph::CONCEPT_GRAPH),
                        );
                    }
                }
            }
        }

        quads.extend(to_quads(&supplementary));
        triples.extend(supplementary);

        let triples_by_graph = group_by_graph(&triples);
        let quads_by_graph = group_by_graph(&quads);
        let artifact = ComprehensiveArtifact {
            summary: ComprehensiveSummary {
                total_triples: triples.len(),
                total_quads: quads.len(),
                files_analyzed: files_info.keys().map(String::from).collect(),
                graphs: triples_by_graph.keys().map(String::from).collect(),
            },
            triples,
            quads,
            triples_by_graph,
            quads_by_graph,
            files_info,
            failures: self.report.failures_since(mark),
        };

        write_json(&self.output(&self.config.output.comprehensive_json), &artifact)?;
        for (graph, facts) in artifact.triples_by_graph.iter() {
            tracing::info!("  {}: {} triples", graph, facts.len());
        }
        tracing::info!(
            "Comprehensive analysis: {} triples, {} quads",
            artifact.summary.total_triples,
            artifact.summary.total_quads
        );
        Ok(artifact)
    }
}
