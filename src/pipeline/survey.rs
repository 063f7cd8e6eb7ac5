use std::path::Path;

use crate::agent::{render_overview, AnalysisAgent};
use crate::error::Result;
use crate::facts::{graph, to_quads, Fact, Predicate, Quad};
use crate::memory::{self, render_knowledge_graph, render_project_overview};
use crate::report::{
    truncate_chars, write_json, KeyFile, SurveyArtifact, SymbolFileSummary, SymbolsArtifact,
};

use super::Pipeline;

const DIRECTORY_LIMIT: usize = 1000;
const PREVIEW_LIMIT: usize = 500;
const CONTENT_LIMIT: usize = 200;
const PATTERN_LIMIT: usize = 300;
const OVERVIEW_LIMIT: usize = 500;

fn analysis_date() -> String {
    chrono::Utc::now().format("%a %b %e %H:%M:%S UTC %Y").to_string()
}

impl<A: AnalysisAgent> Pipeline<A> {
    /// Project survey through the agent: layout, key files, pattern hits and
    /// per-file symbol overviews.
    pub fn survey(&mut self) -> Result<SurveyArtifact> {
        let mark = self.report.len();
        let project = self.config.project_name();
        let root = self.config.project_path.clone();
        let subject = root.to_string_lossy().to_string();
        let mut artifact = SurveyArtifact {
            project_path: subject.clone(),
            ..SurveyArtifact::default()
        };

        if let Some(entries) = self.report.step("survey", "list_dir", self.agent.list_dir(&root, true))? {
            let listing = entries.join("\n");
            artifact.triples.push(Fact::new(
                &subject,
                Predicate::custom("hasDirectoryStructure"),
                truncate_chars(&listing, DIRECTORY_LIMIT),
            ));
            artifact.directory_structure = Some(listing);
        }

        for key in &self.config.key_files {
            if !root.join(key).is_file() {
                tracing::debug!("Key file {} not present", key);
                continue;
            }
            let Some(content) = self.report.step("survey", key, self.agent.read_file(Path::new(key)))? else {
                continue;
            };
            artifact.files.push(KeyFile {
                path: key.clone(),
                content_preview: truncate_chars(&content, PREVIEW_LIMIT),
            });
            artifact
                .triples
                .push(Fact::new(&subject, Predicate::custom("containsFile"), key));
            artifact.quads.push(
                Quad::new(key, Predicate::custom("hasContent"), truncate_chars(&content, CONTENT_LIMIT), "")
                    .with_context(format!("{}_project_analysis", project)),
            );
        }

        for pattern in &self.config.search_patterns {
            let Some(matches) = self.report.step("survey", pattern, self.agent.search_pattern(pattern))? else {
                continue;
            };
            if matches.is_empty() {
                continue;
            }
            let text = matches.iter().map(ToString::to_string).collect::<Vec<_>>().join("\n");
            artifact.triples.push(Fact::new(
                &project,
                Predicate::custom(format!("containsPattern_{}", pattern.replace(' ', "_"))),
                truncate_chars(&text, PATTERN_LIMIT),
            ));
        }

        for path in self.targets()? {
            let file = self.relative(&path);
            match self.agent.symbols_overview(&path) {
                Ok(symbols) if symbols.is_empty() => {}
                Ok(symbols) => artifact.triples.push(Fact::new(
                    &file,
                    Predicate::custom("hasSymbolsOverview"),
                    truncate_chars(&render_overview(&symbols), OVERVIEW_LIMIT),
                )),
                Err(e) => {
                    artifact
                        .triples
                        .push(Fact::new(&file, Predicate::custom("analysisError"), e.to_string()));
                    self.report.record("survey", &file, e)?;
                }
            }
        }

        let overview = render_project_overview(&project, &artifact, &analysis_date())?;
        let knowledge = render_knowledge_graph(&artifact)?;
        for (name, content) in [(memory::PROJECT_OVERVIEW, overview), (memory::KNOWLEDGE_GRAPH, knowledge)] {
            self.report.step("survey", name, self.agent.write_memory(name, &content))?;
        }

        artifact.failures = self.report.failures_since(mark);
        write_json(&self.output(&self.config.output.survey_json), &artifact)?;
        tracing::info!(
            "Survey: {} triples, {} quads from {} key files",
            artifact.triples.len(),
            artifact.quads.len(),
            artifact.files.len()
        );
        Ok(artifact)
    }

    /// Symbol facts from the agent's overview of each target file, and
    /// reference quads between each symbol and the definitions that use it.
    pub fn symbols(&mut self) -> Result<SymbolsArtifact> {
        let mark = self.report.len();
        let mut artifact = SymbolsArtifact {
            project_path: self.config.project_path.to_string_lossy().to_string(),
            ..SymbolsArtifact::default()
        };
        let mut reference_quads = Vec::new();

        for path in self.targets()? {
            let file = self.relative(&path);
            let mut summary = SymbolFileSummary {
                file: file.clone(),
                ..SymbolFileSummary::default()
            };

            let symbols = match self.agent.symbols_overview(&path) {
                Ok(symbols) => symbols,
                Err(e) => {
                    summary.error = Some(e.to_string());
                    artifact.files.push(summary);
                    self.report.record("symbols", &file, e)?;
                    continue;
                }
            };
            summary.symbols = symbols.len();

            for pattern in &self.config.symbol_patterns {
                let target = format!("'{}' in {}", pattern, file);
                let found = self.agent.find_symbol(pattern, Some(path.as_path()));
                if let Some(matches) = self.report.step("symbols", target, found)? {
                    tracing::debug!("{}: {} symbols match '{}'", file, matches.len(), pattern);
                    summary
                        .pattern_matches
                        .insert(pattern.clone(), matches.into_iter().map(|m| m.symbol.name).collect());
                }
            }

            for symbol in &symbols {
                artifact.triples.push(
                    Fact::new(&symbol.name, Predicate::IsA, symbol.kind.as_str())
                        .with_context(&file)
                        .in_graph(graph::CODE_STRUCTURE),
                );
                artifact.triples.push(
                    Fact::new(&symbol.name, Predicate::DefinedIn, &file)
                        .with_context(&file)
                        .in_graph(graph::CODE_STRUCTURE),
                );
                if let Some(line) = symbol.line {
                    artifact.triples.push(
                        Fact::new(&symbol.name, Predicate::LocatedAt, format!("{}:{}", file, line))
                            .with_context(&file)
                            .in_graph(graph::CODE_STRUCTURE),
                    );
                }

                let target = format!("{} in {}", symbol.name, file);
                let found = self.agent.find_referencing_symbols(&symbol.name, &path);
                let Some(references) = self.report.step("symbols", target, found)? else {
                    continue;
                };
                for reference in references {
                    reference_quads.push(
                        Quad::new(
                            &symbol.name,
                            Predicate::References,
                            &reference.name,
                            format!("{}->{}", file, reference.file),
                        )
                        .with_context(graph::SYMBOL_REFERENCES),
                    );
                    reference_quads.push(
                        Quad::new(
                            &reference.name,
                            Predicate::ReferencedBy,
                            &symbol.name,
                            format!("{}->{}", reference.file, file),
                        )
                        .with_context(graph::SYMBOL_REFERENCES),
                    );
                    summary.references += 1;
                }
            }
            artifact.files.push(summary);
        }

        artifact.quads = to_quads(&artifact.triples);
        artifact.quads.extend(reference_quads);
        artifact.failures = self.report.failures_since(mark);

        write_json(&self.output(&self.config.output.symbols_json), &artifact)?;
        tracing::info!(
            "Symbols: {} triples, {} quads",
            artifact.triples.len(),
            artifact.quads.len()
        );
        Ok(artifact)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AnalysisConfig, FailurePolicy};
    use std::fs;
    use tempfile::TempDir;

    fn project() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("install.py"),
            "import os\n\ndef check():\n    return os.name\n\ndef main():\n    check()\n",
        )
        .unwrap();
        fs::write(dir.path().join("README.md"), "# Demo\nInstall with pip.\n").unwrap();
        dir
    }

    fn pipeline(dir: &TempDir) -> Pipeline {
        let mut config = AnalysisConfig::for_project(dir.path());
        config.project_name = Some("demo".into());
        config.search_patterns = vec!["def ".into(), "openai".into()];
        Pipeline::local(config)
    }

    #[test]
    fn test_survey_facts() {
        let dir = project();
        let mut pipeline = pipeline(&dir);
        let artifact = pipeline.survey().unwrap();

        let predicates: Vec<_> = artifact.triples.iter().map(|t| t.predicate.as_str()).collect();
        assert!(predicates.contains(&"hasDirectoryStructure"));
        assert!(predicates.contains(&"containsFile"));
        assert!(predicates.contains(&"containsPattern_def_"));
        assert!(!predicates.contains(&"containsPattern_openai"));
        assert!(predicates.contains(&"hasSymbolsOverview"));

        // README.md and install.py; requirements.txt is absent
        assert_eq!(artifact.files.len(), 2);
        assert_eq!(artifact.quads.len(), 2);
        assert_eq!(artifact.quads[0].context, "demo_project_analysis");
        assert_eq!(artifact.quads[0].graph, "default");
        assert!(artifact.failures.is_empty());

        assert!(dir.path().join(".serena/analysis_output.json").exists());
        assert!(dir.path().join(".serena/memories/project_overview.md").exists());
        assert!(dir.path().join(".serena/memories/knowledge_graph.md").exists());
    }

    #[test]
    fn test_survey_truncates_directory_listing() {
        let dir = project();
        for i in 0..200 {
            fs::write(dir.path().join(format!("module_with_long_name_{:03}.txt", i)), "").unwrap();
        }
        let mut pipeline = pipeline(&dir);
        let artifact = pipeline.survey().unwrap();
        let listing = artifact
            .triples
            .iter()
            .find(|t| t.predicate.as_str() == "hasDirectoryStructure")
            .unwrap();
        assert_eq!(listing.object.chars().count(), DIRECTORY_LIMIT);
        assert!(artifact.directory_structure.unwrap().len() > DIRECTORY_LIMIT);
    }

    #[test]
    fn test_survey_missing_target_recorded() {
        let dir = project();
        let mut config = AnalysisConfig::for_project(dir.path());
        config.target_files = vec!["missing.py".into(), "install.py".into()];
        let mut pipeline = Pipeline::local(config);
        let artifact = pipeline.survey().unwrap();

        assert!(artifact
            .triples
            .iter()
            .any(|t| t.subject == "missing.py" && t.predicate.as_str() == "analysisError"));
        assert_eq!(artifact.failures.len(), 1);
        assert_eq!(artifact.failures[0].step, "survey");
        assert_eq!(pipeline.report().len(), 1);
    }

    #[test]
    fn test_survey_missing_target_fail_fast() {
        let dir = project();
        let mut config = AnalysisConfig::for_project(dir.path());
        config.target_files = vec!["missing.py".into()];
        config.policy = FailurePolicy::FailFast;
        let mut pipeline = Pipeline::local(config);

        assert!(pipeline.survey().is_err());
        assert!(!dir.path().join(".serena/analysis_output.json").exists());
    }

    #[test]
    fn test_symbols_facts_and_reference_quads() {
        let dir = project();
        let mut pipeline = pipeline(&dir);
        let artifact = pipeline.symbols().unwrap();

        assert_eq!(artifact.files.len(), 1);
        assert_eq!(artifact.files[0].symbols, 2);
        assert!(artifact
            .triples
            .iter()
            .any(|t| t.subject == "check" && t.predicate == Predicate::LocatedAt && t.object == "install.py:3"));
        assert!(artifact
            .triples
            .iter()
            .any(|t| t.subject == "main" && t.predicate == Predicate::DefinedIn && t.object == "install.py"));

        let refs: Vec<_> = artifact
            .quads
            .iter()
            .filter(|q| q.predicate == Predicate::References)
            .collect();
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].subject, "check");
        assert_eq!(refs[0].object, "main");
        assert_eq!(refs[0].graph, "install.py->install.py");
        assert!(artifact
            .quads
            .iter()
            .any(|q| q.predicate == Predicate::ReferencedBy && q.subject == "main" && q.object == "check"));
    }

    #[test]
    fn test_symbols_name_searches_per_file() {
        let dir = project();
        let mut pipeline = pipeline(&dir);
        pipeline.config.symbol_patterns = vec!["CHECK ".into(), "class ".into()];
        let artifact = pipeline.symbols().unwrap();

        let matches = &artifact.files[0].pattern_matches;
        let patterns: Vec<_> = matches.keys().map(String::as_str).collect();
        assert_eq!(patterns, vec!["CHECK ", "class "]);
        assert_eq!(matches["CHECK "], vec!["check".to_string()]);
        assert!(matches["class "].is_empty());
        assert!(pipeline.report().is_empty());
    }

    #[test]
    fn test_symbols_missing_target_recorded() {
        let dir = project();
        let mut config = AnalysisConfig::for_project(dir.path());
        config.target_files = vec!["gone.py".into(), "install.py".into()];
        let mut pipeline = Pipeline::local(config);
        let artifact = pipeline.symbols().unwrap();
        assert!(artifact.files[0].error.is_some());
        assert_eq!(artifact.files[1].symbols, 2);
        assert_eq!(artifact.failures.len(), 1);
    }
}
