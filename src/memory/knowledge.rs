use crate::categorize::title_case;
use crate::facts::Fact;
use crate::report::ComprehensiveArtifact;

use super::push_limited;

fn relation(fact: &Fact) -> String {
    format!("{} --{}--> {}", fact.subject, fact.predicate, fact.object)
}

/// Onboarding notes: what was analysed, what it depends on, which
/// relationship graphs exist.
pub fn render_onboarding(project: &str, analysis: &ComprehensiveArtifact, dependencies: &[String]) -> String {
    let mut out = format!("# {} Project Onboarding\n\n", project);

    out.push_str("## Project Overview\n");
    out.push_str(&format!(
        "{} source files analysed, {} relationships extracted.\n\n",
        analysis.summary.files_analyzed.len(),
        analysis.summary.total_triples
    ));
    for (file, info) in analysis.files_info.iter() {
        out.push_str(&format!("- `{}`: {} lines, {} bytes\n", file, info.lines, info.size));
    }
    out.push('\n');

    out.push_str("## Dependencies\n");
    if dependencies.is_empty() {
        out.push_str("No requirements.txt entries found.\n");
    } else {
        out.push_str("The project requires:\n");
        for dep in dependencies {
            out.push_str(&format!("- {}\n", dep));
        }
    }
    out.push('\n');

    out.push_str("## Semantic Relationships Extracted\n");
    for (graph, facts) in analysis.triples_by_graph.iter() {
        out.push_str(&format!("- {}: {} facts\n", title_case(graph), facts.len()));
    }

    out
}

pub fn render_extracted_graph(analysis: &ComprehensiveArtifact) -> String {
    let summary = &analysis.summary;
    let mut out = String::from("# Extracted Knowledge Graph Structures\n\n## Summary\n");
    out.push_str(&format!("- Total Triples Extracted: {}\n", summary.total_triples));
    out.push_str(&format!("- Total Quads Extracted: {}\n", summary.total_quads));
    out.push_str(&format!("- Files Analyzed: {}\n", summary.files_analyzed.join(", ")));
    out.push_str(&format!("- Knowledge Graphs: {}\n", summary.graphs.join(", ")));

    out.push_str("\n## Graph Breakdown\n");
    for (graph, facts) in analysis.triples_by_graph.iter() {
        let quads = analysis.quads_by_graph.get(graph).map_or(0, Vec::len);
        out.push_str(&format!("\n### {}\n- {} triples, {} quads\n", graph, facts.len(), quads));
    }

    out.push_str("\n## Key Relationships Extracted\n");
    for (graph, facts) in analysis.triples_by_graph.iter() {
        out.push_str(&format!("\n### {}\n", title_case(graph)));
        push_limited(&mut out, facts, 5, relation);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facts::{graph, group_by_graph, to_quads, Predicate};
    use crate::report::FileInfo;
    use indexmap::IndexMap;

    fn analysis() -> ComprehensiveArtifact {
        let mut triples = vec![Fact::new("install.py", Predicate::PartOf, "demo").in_graph(graph::PROJECT_STRUCTURE)];
        for i in 0..7 {
            triples.push(Fact::new("install.py", Predicate::Calls, format!("f{}", i)).in_graph(graph::CALL_GRAPH));
        }
        let quads = to_quads(&triples);

        let mut files_info = IndexMap::new();
        files_info.insert("install.py".to_string(), FileInfo { size: 120, lines: 8 });

        ComprehensiveArtifact {
            summary: crate::report::ComprehensiveSummary {
                total_triples: triples.len(),
                total_quads: quads.len(),
                files_analyzed: vec!["install.py".into()],
                graphs: vec!["project_structure".into(), "call_graph".into()],
            },
            triples_by_graph: group_by_graph(&triples),
            quads_by_graph: group_by_graph(&quads),
            triples,
            quads,
            files_info,
            failures: Vec::new(),
        }
    }

    #[test]
    fn test_extracted_graph_summary_and_breakdown() {
        let doc = render_extracted_graph(&analysis());
        assert!(doc.contains("- Total Triples Extracted: 8"));
        assert!(doc.contains("- Knowledge Graphs: project_structure, call_graph"));
        assert!(doc.contains("### call_graph\n- 7 triples, 7 quads"));
        assert!(doc.contains("### Call Graph"));
        assert!(doc.contains("- install.py --calls--> f0"));
        assert!(doc.contains("- ... and 2 more"));
    }

    #[test]
    fn test_onboarding_lists_files_and_dependencies() {
        let doc = render_onboarding("demo", &analysis(), &["requests".to_string()]);
        assert!(doc.starts_with("# demo Project Onboarding"));
        assert!(doc.contains("- `install.py`: 8 lines, 120 bytes"));
        assert!(doc.contains("- requests"));
        assert!(doc.contains("- Call Graph: 7 facts"));
    }

    #[test]
    fn test_onboarding_without_dependencies() {
        let doc = render_onboarding("demo", &ComprehensiveArtifact::default(), &[]);
        assert!(doc.contains("No requirements.txt entries found."));
    }
}
