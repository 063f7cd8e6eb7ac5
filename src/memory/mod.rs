//! Markdown memory documents assembled from pass artifacts.
//!
//! Sections list only the first few items and end with `- ... and K more`
//! when truncated; the JSON artifacts carry the complete data.

pub mod features;
pub mod knowledge;
pub mod overview;

pub use features::{render_enhanced_analysis, render_feature_analysis};
pub use knowledge::{render_extracted_graph, render_onboarding};
pub use overview::{render_knowledge_graph, render_project_overview};

pub const FEATURE_ANALYSIS: &str = "sensai_feature_analysis.md";
pub const ENHANCED_ANALYSIS: &str = "enhanced_sensai_feature_analysis.md";
pub const PROJECT_ONBOARDING: &str = "project_onboarding.md";
pub const EXTRACTED_GRAPH: &str = "extracted_knowledge_graph.md";
pub const PROJECT_OVERVIEW: &str = "project_overview.md";
pub const KNOWLEDGE_GRAPH: &str = "knowledge_graph.md";

/// Append one `- item` line per item, at most `limit`, then the overflow line.
pub(crate) fn push_limited<I, T, F>(out: &mut String, items: I, limit: usize, render: F)
where
    I: IntoIterator<Item = T>,
    F: Fn(T) -> String,
{
    let mut total = 0;
    for item in items {
        if total < limit {
            out.push_str(&format!("- {}\n", render(item)));
        }
        total += 1;
    }
    if total > limit {
        out.push_str(&format!("- ... and {} more\n", total - limit));
    }
}
