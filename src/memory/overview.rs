use crate::error::Result;
use crate::report::{truncate_chars, SurveyArtifact};

pub fn render_project_overview(project: &str, survey: &SurveyArtifact, analysed_at: &str) -> Result<String> {
    let key_files: Vec<&str> = survey.files.iter().map(|f| f.path.as_str()).collect();
    let triples = &survey.triples[..survey.triples.len().min(20)];
    let quads = &survey.quads[..survey.quads.len().min(10)];
    let structure = survey
        .directory_structure
        .as_deref()
        .map(|s| truncate_chars(s, 2000))
        .unwrap_or_else(|| "Not available".to_string());

    Ok(format!(
        "# {project} Project Overview\n\n\
         ## Project Analysis Date\n{analysed_at}\n\n\
         ## Directory Structure\n{structure}\n\n\
         ## Key Files Analyzed\n{files}\n\n\
         ## Knowledge Triples Extracted\n{triples}\n\n\
         ## Knowledge Quads Extracted (with context)\n{quads}\n",
        files = serde_json::to_string_pretty(&key_files)?,
        triples = serde_json::to_string_pretty(triples)?,
        quads = serde_json::to_string_pretty(quads)?,
    ))
}

pub fn render_knowledge_graph(survey: &SurveyArtifact) -> Result<String> {
    Ok(format!(
        "# Knowledge Graph Data\n\n\
         ## Triples (Subject-Predicate-Object)\n```json\n{}\n```\n\n\
         ## Quads (Subject-Predicate-Object-Context)\n```json\n{}\n```\n",
        serde_json::to_string_pretty(&survey.triples)?,
        serde_json::to_string_pretty(&survey.quads)?,
    ))
}
