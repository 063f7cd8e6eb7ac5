use std::path::Path;

use crate::categorize::Category;
use crate::report::{EnhancedArtifact, FeatureArtifact, FeatureItem};

use super::push_limited;

/// Categories ordered by descending size; ties keep category order.
fn by_size_desc<V>(map: &std::collections::BTreeMap<Category, Vec<V>>) -> Vec<(&Category, &Vec<V>)> {
    let mut entries: Vec<_> = map.iter().filter(|(_, items)| !items.is_empty()).collect();
    entries.sort_by(|a, b| b.1.len().cmp(&a.1.len()));
    entries
}

fn feature_line(item: &FeatureItem) -> String {
    let mut line = format!("**{}** ({})", item.name, item.kind.as_str());
    if let Some(n) = item.line {
        line.push_str(&format!(" - Line {}", n));
    }
    line
}

pub fn render_feature_analysis(project: &str, analysis: &FeatureArtifact) -> String {
    let summary = &analysis.summary;
    let mut out = format!("# {} Feature Analysis\n\n", project);
    out.push_str("## Executive Summary\n\n");
    out.push_str(&format!(
        "Keyword-based categorisation of the functions, classes, variables and dependencies of {}.\n\n",
        project
    ));
    out.push_str("### Repository Statistics\n");
    out.push_str(&format!("- Total Functions Identified: {}\n", summary.total_functions));
    out.push_str(&format!("- Total Classes Identified: {}\n", summary.total_classes));
    out.push_str(&format!("- Total Imports: {}\n", summary.total_imports));
    out.push_str(&format!("- Files Analyzed: {}\n\n", analysis.files.len()));

    out.push_str("## Feature Categories\n\n");
    for (category, items) in by_size_desc(&analysis.categories) {
        out.push_str(&format!("### {} ({} features)\n\n", category.title(), items.len()));
        push_limited(&mut out, items, 10, feature_line);
        out.push('\n');
    }

    if !analysis.dependencies_by_category.is_empty() {
        out.push_str("\n## Dependencies by Category\n\n");
        for (category, deps) in &analysis.dependencies_by_category {
            out.push_str(&format!("### {}\n", category.title()));
            for dep in deps {
                out.push_str(&format!("- {}\n", dep));
            }
            out.push('\n');
        }
    }

    out.push_str("\n## File-Level Feature Analysis\n\n");
    for file in &analysis.files {
        let name = Path::new(&file.file)
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| file.file.clone());
        out.push_str(&format!("### {}\n\n", name));
        if let Some(error) = &file.error {
            out.push_str(&format!("- Error: {}\n\n", error));
            continue;
        }
        out.push_str(&format!("- Functions: {}\n", file.functions.len()));
        out.push_str(&format!("- Classes: {}\n", file.classes.len()));
        out.push_str(&format!("- Imports: {}\n", file.imports.len()));
        if let Some(note) = &file.note {
            out.push_str(&format!("- Note: {}\n", note));
        }
        out.push('\n');

        if !file.features_by_category.is_empty() {
            out.push_str("**Feature Categories:**\n");
            for (category, items) in by_size_desc(&file.features_by_category).into_iter().take(5) {
                out.push_str(&format!("- {}: {} features\n", category.title(), items.len()));
            }
        }
        out.push('\n');
    }

    out
}

pub fn render_enhanced_analysis(project: &str, analysis: &EnhancedArtifact) -> String {
    let mut out = format!("# Enhanced Feature Categorization - {}\n\n", project);
    out.push_str("## Analysis Overview\n");
    out.push_str(
        "Feature taxonomy combining syntax-tree analysis, import inference and dependency analysis.\n\n",
    );

    out.push_str("## Feature Categories Summary\n\n");
    for (category, items) in by_size_desc(&analysis.feature_categories) {
        out.push_str(&format!("### {} ({} items)\n\n", category.title(), items.len()));
        push_limited(&mut out, items, 5, |name| name.clone());
        out.push('\n');
    }

    out.push_str("\n## Dependency-Based Feature Inference\n\n");
    for (category, deps) in &analysis.dependency_features {
        out.push_str(&format!("### {}\n\n", category.title()));
        for dep in deps {
            out.push_str(&format!("- **{}**: {}\n", dep.dependency, dep.capability));
        }
        out.push('\n');
    }

    if !analysis.inferred_features.is_empty() {
        out.push_str("\n## Inferred Features from Imports\n\n");
        let obfuscated: Vec<_> = analysis
            .files_analyzed
            .iter()
            .filter(|f| f.note.is_some())
            .map(|f| f.file.as_str())
            .collect();
        if !obfuscated.is_empty() {
            out.push_str(&format!(
                "Regex-analysed files (possibly obfuscated): {}. The following features were inferred from their import statements:\n\n",
                obfuscated.join(", ")
            ));
        }
        for (category, items) in &analysis.inferred_features {
            out.push_str(&format!("### {}\n\n", category.title()));
            for item in items {
                out.push_str(&format!("- **{}**: {}\n", item.module, item.inference));
            }
            out.push('\n');
        }
    }

    out
}
