//! Registers the project with the external agent through its package runner.

use std::path::Path;
use std::process::Command;

use crate::config::ProvisionConfig;
use crate::error::{AnalysisError, Result};

/// The configured command with `{project}` substituted.
pub fn command_line(config: &ProvisionConfig, project_name: &str) -> Vec<String> {
    config
        .command
        .iter()
        .map(|arg| arg.replace("{project}", project_name))
        .collect()
}

/// Run the provisioning command in `project_path`. A non-zero exit is an
/// error; callers decide whether that matters.
pub fn provision_project(config: &ProvisionConfig, project_name: &str, project_path: &Path) -> Result<String> {
    let args = command_line(config, project_name);
    let Some((program, rest)) = args.split_first() else {
        return Err(AnalysisError::Provision("empty provisioning command".to_string()));
    };

    tracing::info!("Provisioning project '{}' with {}", project_name, program);
    let output = Command::new(program)
        .args(rest)
        .current_dir(project_path)
        .output()
        .map_err(|e| AnalysisError::Provision(format!("failed to run {}: {}", program, e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(AnalysisError::Provision(format!(
            "{} exited with {}: {}",
            program,
            output.status,
            stderr.trim()
        )));
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}
