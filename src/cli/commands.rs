use std::path::PathBuf;

use clap::{Parser, Subcommand};

use code_knowledge::config::{AnalysisConfig, FailurePolicy};
use code_knowledge::error::Result;
use code_knowledge::pipeline::{Pass, Pipeline};
use code_knowledge::report::RunReport;

#[derive(Parser)]
#[command(name = "code-knowledge")]
#[command(about = "Extract code knowledge graphs and feature reports from a Python project")]
#[command(version)]
#[command(after_long_help = r#"
EXAMPLES:
    # Run every pass on the current directory
    code-knowledge all

    # Facts for selected files only
    code-knowledge --project ../kawaii extract --target install.py --target kawai.py

    # Stop at the first failing step
    code-knowledge --fail-fast features

    # Register the project with the external agent before the survey
    code-knowledge --provision survey
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Root of the project to analyse
    #[arg(long, global = true, default_value = ".")]
    pub project: PathBuf,

    /// Configuration file (defaults to code-knowledge.toml in the project)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Source files to analyse, relative to the project root
    #[arg(long = "target", global = true)]
    pub targets: Vec<String>,

    /// Abort on the first failing step instead of continuing
    #[arg(long, global = true)]
    pub fail_fast: bool,

    /// Provision the project with the external agent first
    #[arg(long, global = true)]
    pub provision: bool,
}

#[derive(Subcommand, Clone, Copy)]
pub enum Commands {
    /// Extract facts and quads from the target files
    Extract,
    /// Add dependency, structure and concept graphs to the extraction
    Enrich,
    /// Categorise functions, classes, variables and dependencies
    Features,
    /// Infer capabilities from imports and dependencies
    Infer,
    /// Write onboarding memories and the RDF export
    Onboard,
    /// Survey the project through the agent
    Survey,
    /// Symbol facts and reference quads through the agent
    Symbols,
    /// Run every pass in order
    All,
}

impl From<Commands> for Pass {
    fn from(command: Commands) -> Self {
        match command {
            Commands::Extract => Pass::Extract,
            Commands::Enrich => Pass::Enrich,
            Commands::Features => Pass::Features,
            Commands::Infer => Pass::Infer,
            Commands::Onboard => Pass::Onboard,
            Commands::Survey => Pass::Survey,
            Commands::Symbols => Pass::Symbols,
            Commands::All => Pass::All,
        }
    }
}

/// Configuration for this invocation: the explicit file, or discovery in the
/// project root, with command-line overrides applied on top.
pub fn load_config(cli: &Cli) -> Result<AnalysisConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let mut config = AnalysisConfig::from_file(path)?;
            config.project_path = cli.project.clone();
            config
        }
        None => AnalysisConfig::discover(&cli.project)?,
    };

    if !cli.targets.is_empty() {
        config.target_files = cli.targets.clone();
    }
    if cli.fail_fast {
        config.policy = FailurePolicy::FailFast;
    }
    if cli.provision {
        config.provision.enabled = true;
    }
    Ok(config)
}

pub fn run(cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;
    println!(
        "Analysing {} ({})",
        config.project_name(),
        config.project_path.display()
    );

    let pass = Pass::from(cli.command);
    let mut pipeline = Pipeline::local(config);
    pipeline.provision();
    pipeline.run(pass)?;

    println!("Finished {} pass", pass);
    print_report(pipeline.report());
    Ok(())
}

fn print_report(report: &RunReport) {
    if report.is_empty() {
        println!("Completed without failures");
        return;
    }
    println!("Completed with {} failures:", report.len());
    for failure in report.failures() {
        println!("  {}", failure);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "code-knowledge",
            "extract",
            "--project",
            "/tmp/demo",
            "--target",
            "a.py",
            "--target",
            "b.py",
            "--fail-fast",
        ])
        .unwrap();
        assert!(matches!(cli.command, Commands::Extract));
        assert_eq!(cli.project, PathBuf::from("/tmp/demo"));
        assert_eq!(cli.targets, vec!["a.py".to_string(), "b.py".to_string()]);
        assert!(cli.fail_fast);
        assert!(!cli.provision);
    }

    #[test]
    fn test_load_config_applies_overrides() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("code-knowledge.toml"),
            "target_files = [\"kawai.py\"]\n",
        )
        .unwrap();
        let project = dir.path().to_string_lossy().to_string();

        let cli = Cli::try_parse_from(["code-knowledge", "--project", &project, "all"]).unwrap();
        let config = load_config(&cli).unwrap();
        assert_eq!(config.target_files, vec!["kawai.py".to_string()]);
        assert_eq!(config.policy, FailurePolicy::BestEffort);

        let cli = Cli::try_parse_from([
            "code-knowledge",
            "--project",
            &project,
            "--target",
            "install.py",
            "--fail-fast",
            "--provision",
            "all",
        ])
        .unwrap();
        let config = load_config(&cli).unwrap();
        assert_eq!(config.target_files, vec!["install.py".to_string()]);
        assert_eq!(config.policy, FailurePolicy::FailFast);
        assert!(config.provision.enabled);
    }

    #[test]
    fn test_commands_map_to_passes() {
        assert_eq!(Pass::from(Commands::Infer), Pass::Infer);
        assert_eq!(Pass::from(Commands::All), Pass::All);
    }

    #[test]
    fn test_run_dispatches_selected_pass() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("app.py"), "def main():\n    pass\n").unwrap();
        let project = dir.path().to_string_lossy().to_string();

        let cli = Cli::try_parse_from(["code-knowledge", "--project", &project, "extract"]).unwrap();
        run(&cli).unwrap();
        assert!(dir.path().join("knowledge_extraction.json").is_file());
        assert!(!dir.path().join("serena_comprehensive_analysis.json").exists());

        let cli = Cli::try_parse_from(["code-knowledge", "--project", &project, "enrich"]).unwrap();
        run(&cli).unwrap();
        assert!(dir.path().join("serena_comprehensive_analysis.json").is_file());
    }
}
