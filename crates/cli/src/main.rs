//! gitdist command-line tool.
//!
//! Regenerates the changelog and authors files from git history, wraps the
//! project's source-distribution command, drives the optional documentation
//! commands, and generates / validates configuration files.

mod style;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use gitdist_core::config::{DEFAULT_CONFIG_FILE, DEFAULT_CONFIG_TOML};
use gitdist_core::generate::GenerateOutcome;
use gitdist_core::{CommandSet, DistConfig};

// ---------------------------------------------------------------------------
// CLI argument definitions
// ---------------------------------------------------------------------------

/// Build-time changelog/authors generation and sdist wrapping for git projects.
#[derive(Parser, Debug)]
#[command(
    name = "gitdist",
    version,
    about = "Generate ChangeLog and AUTHORS from git history and wrap sdist"
)]
struct Cli {
    /// Project root (the directory holding `.git`).
    #[arg(short, long, global = true, default_value = ".")]
    root: PathBuf,

    /// Path to the TOML configuration file, relative to the project root.
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Increase log verbosity (-v info, -vv debug).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Regenerate the changelog from git history.
    Changelog,

    /// Regenerate the authors file from git history.
    Authors,

    /// Regenerate both artifacts, then run the base sdist command.
    Sdist,

    /// Build the documentation (requires sphinx-build).
    BuildDocs,

    /// Upload built HTML documentation (requires a configured uploader).
    UploadDocs,

    /// List the commands registered for this project.
    Commands,

    /// Generate a default configuration file.
    Init {
        /// Output path for the generated config file.
        #[arg(short, long, default_value = "./gitdist.toml")]
        output: PathBuf,
    },

    /// Validate the configuration file.
    Validate,
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_log_level(cli.verbose)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", style::error(&format!("Error: {:#}", e)));
            ExitCode::FAILURE
        }
    }
}

fn default_log_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config_path = config_path(&cli.root, &cli.config);
    debug!(root = %cli.root.display(), config = %config_path.display(), "resolved paths");
    match cli.command {
        Commands::Init { output } => cmd_init(&output),
        Commands::Validate => cmd_validate(&config_path),
        command => {
            let config =
                DistConfig::load_and_validate(&config_path).context("failed to load configuration")?;
            let set = CommandSet::probe(&config, &cli.root);

            match command {
                Commands::Changelog => cmd_changelog(&set).await,
                Commands::Authors => cmd_authors(&set).await,
                Commands::Sdist => cmd_sdist(&set).await,
                Commands::BuildDocs => cmd_build_docs(&set).await,
                Commands::UploadDocs => cmd_upload_docs(&set).await,
                Commands::Commands => cmd_commands(&set),
                Commands::Init { .. } | Commands::Validate => unreachable!(),
            }
        }
    }
}

/// Relative config paths are resolved against the project root.
fn config_path(root: &Path, config: &Path) -> PathBuf {
    if config.is_absolute() {
        config.to_path_buf()
    } else {
        root.join(config)
    }
}

// ---------------------------------------------------------------------------
// Artifact commands
// ---------------------------------------------------------------------------

fn report_outcome(what: &str, outcome: &GenerateOutcome) {
    println!("{}", style::outcome(what, outcome));
}

async fn cmd_changelog(set: &CommandSet) -> Result<()> {
    let outcome = set.changelog().await.context("failed to generate changelog")?;
    report_outcome("ChangeLog", &outcome);
    Ok(())
}

async fn cmd_authors(set: &CommandSet) -> Result<()> {
    let outcome = set.authors().await.context("failed to generate authors")?;
    report_outcome("AUTHORS", &outcome);
    Ok(())
}

async fn cmd_sdist(set: &CommandSet) -> Result<()> {
    let report = set.sdist().await.context("sdist failed")?;

    report_outcome("ChangeLog", &report.changelog);
    report_outcome("AUTHORS", &report.authors);
    if report.readme.is_none() {
        println!("{}", style::warn("no README found in the project root"));
    }
    if report.template_synthesized {
        println!(
            "{}",
            style::dim(&format!(
                "used a default {} (removed after the build)",
                set.context().template.display()
            ))
        );
    }
    println!("{}", style::success("sdist complete"));
    Ok(())
}

// ---------------------------------------------------------------------------
// Documentation commands
// ---------------------------------------------------------------------------

async fn cmd_build_docs(set: &CommandSet) -> Result<()> {
    let report = set.build_docs().await.context("documentation build failed")?;
    if let Some(count) = report.autoindexed {
        println!("{}", style::success(&format!("API index generated for {} modules", count)));
    }
    for builder in &report.builders {
        println!("{}", style::success(&format!("built {} documentation", builder)));
    }
    Ok(())
}

async fn cmd_upload_docs(set: &CommandSet) -> Result<()> {
    let html_dir = set
        .upload_docs()
        .await
        .context("documentation upload failed")?;
    println!(
        "{}",
        style::success(&format!("uploaded {}", html_dir.display()))
    );
    Ok(())
}

fn cmd_commands(set: &CommandSet) -> Result<()> {
    println!("{}", style::header("Registered commands"));
    for name in set.names() {
        println!("  {}", name);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Config commands
// ---------------------------------------------------------------------------

fn cmd_init(output: &Path) -> Result<()> {
    if output.exists() {
        anyhow::bail!(
            "file already exists: {}. Use a different path or remove the existing file.",
            output.display()
        );
    }

    std::fs::write(output, DEFAULT_CONFIG_TOML).context("failed to write config file")?;

    println!("Default configuration written to {}", output.display());
    println!();
    println!("Next steps:");
    println!("  1. Set [project] name, version and packages");
    println!("  2. Point [sdist] command at your packaging tool");
    println!(
        "  3. Validate with: gitdist validate --config {}",
        output.display()
    );

    Ok(())
}

fn cmd_validate(config_path: &Path) -> Result<()> {
    println!("Validating configuration: {}", config_path.display());
    println!();

    let config =
        DistConfig::load_from_file(config_path).context("failed to parse configuration")?;
    println!("  [OK] TOML structure is valid");

    match config.validate() {
        Ok(()) => println!("  [OK] All fields are valid"),
        Err(e) => {
            println!("  [FAIL] Validation error: {}", e);
            anyhow::bail!("configuration validation failed");
        }
    }

    println!();
    println!("Configuration summary:");
    println!(
        "  Project       : {} {}",
        if config.project.name.is_empty() {
            "(unnamed)"
        } else {
            config.project.name.as_str()
        },
        config.project.version
    );
    println!("  sdist command : {}", config.sdist.command.join(" "));
    println!("  Alias file    : {}", config.files.mailmap.display());
    println!("  Excluded email: {}", config.history.excluded_email);
    println!(
        "  Docs uploader : {}",
        match &config.upload_docs.command {
            Some(command) => command.join(" "),
            None => "not set".into(),
        }
    );
    println!();
    println!("Configuration is valid.");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_global_flags() {
        let cli = Cli::try_parse_from(["gitdist", "sdist", "--root", "/src/widget", "-vv"]).unwrap();
        assert_eq!(cli.root, PathBuf::from("/src/widget"));
        assert_eq!(cli.config, PathBuf::from("gitdist.toml"));
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Commands::Sdist));
    }

    #[test]
    fn test_parse_kebab_case_subcommands() {
        let cli = Cli::try_parse_from(["gitdist", "build-docs"]).unwrap();
        assert!(matches!(cli.command, Commands::BuildDocs));
        let cli = Cli::try_parse_from(["gitdist", "upload-docs"]).unwrap();
        assert!(matches!(cli.command, Commands::UploadDocs));
    }

    #[test]
    fn test_config_path_resolution() {
        let root = Path::new("/src/widget");
        assert_eq!(
            config_path(root, Path::new("gitdist.toml")),
            PathBuf::from("/src/widget/gitdist.toml")
        );
        assert_eq!(
            config_path(root, Path::new("/etc/gitdist.toml")),
            PathBuf::from("/etc/gitdist.toml")
        );
    }

    #[test]
    fn test_log_levels() {
        assert_eq!(default_log_level(0), "warn");
        assert_eq!(default_log_level(1), "info");
        assert_eq!(default_log_level(5), "debug");
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("gitdist.toml");

        cmd_init(&output).unwrap();
        let written = std::fs::read_to_string(&output).unwrap();
        assert_eq!(written, DEFAULT_CONFIG_TOML);

        assert!(cmd_init(&output).is_err());
        cmd_validate(&output).unwrap();
    }

    #[test]
    fn test_validate_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(cmd_validate(&dir.path().join("absent.toml")).is_err());
    }
}
