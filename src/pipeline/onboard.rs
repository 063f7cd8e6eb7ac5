use crate::agent::AnalysisAgent;
use crate::error::Result;
use crate::facts::rdf::{to_nquads, to_ntriples};
use crate::memory::{self, render_extracted_graph, render_onboarding};
use crate::report::{load_json_or_default, write_text, ComprehensiveArtifact, OnboardingSummary};

use super::{read_requirements, Pipeline};

impl<A: AnalysisAgent> Pipeline<A> {
    /// Onboarding memories and the RDF export of the comprehensive analysis.
    pub fn onboard(&mut self) -> Result<OnboardingSummary> {
        let comprehensive_path = self.output(&self.config.output.comprehensive_json);
        let analysis: ComprehensiveArtifact = load_json_or_default(&comprehensive_path)?;
        let project = self.config.project_name();
        let dependencies = read_requirements(&self.config.project_path)?;

        let mut summary = OnboardingSummary {
            triples: analysis.triples.len(),
            quads: analysis.quads.len(),
            ..OnboardingSummary::default()
        };

        let documents = [
            (memory::PROJECT_ONBOARDING, render_onboarding(&project, &analysis, &dependencies)),
            (memory::EXTRACTED_GRAPH, render_extracted_graph(&analysis)),
        ];
        for (name, content) in documents {
            if let Some(path) = self.report.step("onboard", name, self.agent.write_memory(name, &content))? {
                summary.memories_created.push(path.to_string_lossy().to_string());
            }
        }

        let nt_path = self.output(&self.config.output.triples_nt);
        write_text(&nt_path, &to_ntriples(&analysis.triples))?;
        let nq_path = self.output(&self.config.output.quads_nq);
        write_text(&nq_path, &to_nquads(&analysis.quads))?;

        summary.output_files = vec![
            nt_path.to_string_lossy().to_string(),
            nq_path.to_string_lossy().to_string(),
            comprehensive_path.to_string_lossy().to_string(),
        ];

        tracing::info!(
            "Onboarding complete: {} triples, {} quads exported",
            summary.triples,
            summary.quads
        );
        Ok(summary)
    }
}
