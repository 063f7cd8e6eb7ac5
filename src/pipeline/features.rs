use crate::agent::AnalysisAgent;
use crate::categorize::{categorize_dependency, infer_from_import, Categorizer, Category};
use crate::error::Result;
use crate::indexer::{Extraction, SymbolKind};
use crate::memory::{self, render_enhanced_analysis, render_feature_analysis};
use crate::report::{
    load_json_or_default, write_json, DependencyFeature, EnhancedArtifact, FeatureArtifact, FeatureItem,
    FileFeatures, InferredFeature,
};

use super::{read_requirements, Pipeline};

impl<A: AnalysisAgent> Pipeline<A> {
    /// Categorise every function, class and long-named variable of the
    /// target files, plus the declared dependencies.
    pub fn features(&mut self) -> Result<FeatureArtifact> {
        let mark = self.report.len();
        let categorizer = Categorizer::symbols();
        let mut artifact = FeatureArtifact {
            repository: self.config.project_path.to_string_lossy().to_string(),
            ..FeatureArtifact::default()
        };

        for path in self.targets()? {
            let mut file = FileFeatures {
                file: path.to_string_lossy().to_string(),
                ..FileFeatures::default()
            };
            match self.extractor.extract_file(&path) {
                Ok(extraction) => self.categorize_file(&categorizer, extraction, &mut file, &mut artifact),
                Err(e) => {
                    file.error = Some(e.to_string());
                    self.report.record("features", &file.file, e)?;
                }
            }
            artifact.summary.total_functions += file.functions.len();
            artifact.summary.total_classes += file.classes.len();
            artifact.summary.total_imports += file.imports.len();
            artifact.files.push(file);
        }

        artifact.summary.features_by_category = artifact
            .categories
            .iter()
            .map(|(category, items)| (*category, items.len()))
            .collect();

        artifact.dependencies = read_requirements(&self.config.project_path)?;
        for dep in &artifact.dependencies {
            let category = categorize_dependency(dep).category;
            artifact
                .dependencies_by_category
                .entry(category)
                .or_default()
                .push(dep.clone());
        }

        let document = render_feature_analysis(&self.config.project_name(), &artifact);
        self.report.step(
            "features",
            memory::FEATURE_ANALYSIS,
            self.agent.write_memory(memory::FEATURE_ANALYSIS, &document),
        )?;

        artifact.failures = self.report.failures_since(mark);
        write_json(&self.output(&self.config.output.features_json), &artifact)?;

        tracing::info!(
            "Features: {} functions, {} classes, {} categories",
            artifact.summary.total_functions,
            artifact.summary.total_classes,
            artifact.categories.len()
        );
        Ok(artifact)
    }

    fn categorize_file(
        &self,
        categorizer: &Categorizer,
        extraction: Extraction,
        file: &mut FileFeatures,
        artifact: &mut FeatureArtifact,
    ) {
        file.note = extraction.note;
        file.imports = extraction.imports;

        for symbol in extraction.symbols {
            match symbol.kind {
                SymbolKind::Function | SymbolKind::Class => {
                    let category = categorizer.categorize(&symbol.name);
                    let item = FeatureItem::from(&symbol);
                    file.features_by_category.entry(category).or_default().push(item.clone());
                    artifact.categories.entry(category).or_default().push(item);
                    if symbol.kind == SymbolKind::Function {
                        file.functions.push(symbol);
                    } else {
                        file.classes.push(symbol);
                    }
                }
                SymbolKind::Variable => {
                    // short names are too noisy; utilities is the no-match bucket
                    if symbol.name.chars().count() > self.config.extraction.min_variable_len {
                        let category = categorizer.categorize(&symbol.name);
                        if category != Category::Utilities {
                            file.features_by_category
                                .entry(category)
                                .or_default()
                                .push(FeatureItem::from(&symbol));
                        }
                    }
                    file.variables.push(symbol);
                }
                SymbolKind::Import => {}
            }
        }
    }

    /// Extend the feature analysis with import-based inference and
    /// dependency capabilities.
    pub fn infer(&mut self) -> Result<EnhancedArtifact> {
        let mark = self.report.len();
        let existing: FeatureArtifact = load_json_or_default(&self.output(&self.config.output.features_json))?;
        let repository = if existing.repository.is_empty() {
            self.config.project_path.to_string_lossy().to_string()
        } else {
            existing.repository.clone()
        };

        let mut enhanced = EnhancedArtifact {
            repository,
            analysis_method: "keyword-based feature categorisation".to_string(),
            files_analyzed: existing.files.clone(),
            ..EnhancedArtifact::default()
        };

        // Regex-analysed files say the least about themselves, so their
        // imports are what inference is for; otherwise use every file.
        let fallback_files: Vec<&FileFeatures> = existing.files.iter().filter(|f| f.note.is_some()).collect();
        let sources: Vec<&FileFeatures> = if fallback_files.is_empty() {
            existing.files.iter().collect()
        } else {
            fallback_files
        };
        for file in sources {
            for import in &file.imports {
                for found in infer_from_import(&import.module) {
                    enhanced
                        .inferred_features
                        .entry(found.category)
                        .or_default()
                        .push(InferredFeature {
                            module: import.module.clone(),
                            inference: found.description.to_string(),
                        });
                }
            }
        }

        for dep in &existing.dependencies {
            let found = categorize_dependency(dep);
            enhanced
                .dependency_features
                .entry(found.category)
                .or_default()
                .push(DependencyFeature {
                    dependency: dep.clone(),
                    capability: found.description.to_string(),
                });
        }

        for (category, items) in &existing.categories {
            enhanced
                .feature_categories
                .entry(*category)
                .or_default()
                .extend(items.iter().map(|i| i.name.clone()));
        }
        for (category, items) in &enhanced.inferred_features {
            enhanced
                .feature_categories
                .entry(*category)
                .or_default()
                .extend(items.iter().map(|i| i.module.clone()));
        }
        for (category, items) in &enhanced.dependency_features {
            enhanced
                .feature_categories
                .entry(*category)
                .or_default()
                .extend(items.iter().map(|i| i.dependency.clone()));
        }
        enhanced.feature_categories.retain(|_, items| !items.is_empty());

        let document = render_enhanced_analysis(&self.config.project_name(), &enhanced);
        self.report.step(
            "infer",
            memory::ENHANCED_ANALYSIS,
            self.agent.write_memory(memory::ENHANCED_ANALYSIS, &document),
        )?;

        enhanced.failures = self.report.failures_since(mark);
        write_json(&self.output(&self.config.output.enhanced_json), &enhanced)?;

        for (category, items) in &enhanced.feature_categories {
            tracing::info!("  {}: {} items", category, items.len());
        }
        Ok(enhanced)
    }
}
