use crate::config::{CONFIG_FILE_NAMES, Config};
use crate::models::options::{OutputFormat, RenderOptions};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

/// Command-line interface for the fencesplit tool
#[derive(Parser, Debug)]
#[command(
    name = "fencesplit",
    version,
    about = "Split text responses into prose and fenced code blocks and render them."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Response files, directories or glob patterns ("-" or nothing reads stdin)
    pub paths: Vec<String>,

    /// Output format
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Highlighting hint for code blocks without a language tag
    #[arg(short = 'l', long)]
    pub fallback_language: Option<String>,

    /// Print the unsegmented response before the rendered one
    #[arg(long, default_value_t = false)]
    pub show_raw: bool,

    /// Write each rendered response into this directory instead of stdout
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Show what would be written without writing files
    #[arg(short = 'n', long, default_value_t = false)]
    pub dry_run: bool,

    /// Print per-file progress and a summary
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Configuration file to use instead of the discovered one
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a template configuration file
    Init {
        /// Where to write the configuration
        #[arg(short, long, default_value = CONFIG_FILE_NAMES[0])]
        output: PathBuf,

        /// Overwrite an existing file
        #[arg(long, default_value_t = false)]
        force: bool,
    },
}

impl Cli {
    /// Whether input should be read from stdin
    pub fn reads_stdin(&self) -> bool {
        self.paths.is_empty() || (self.paths.len() == 1 && self.paths[0] == "-")
    }

    /// Load the configuration for this run
    pub fn load_config(&self) -> Result<Config> {
        match &self.config {
            Some(path) => Config::from_file(path),
            None => {
                let cwd = std::env::current_dir().context("Failed to get current directory")?;
                Ok(Config::discover(cwd))
            }
        }
    }

    /// Render options from `config`, with command-line flags taking precedence
    pub fn render_options(&self, config: &Config) -> Result<RenderOptions> {
        let mut options = config.render_options();

        if let Some(format) = self.format {
            options.format = format;
        }

        if let Some(language) = &self.fallback_language {
            let mut overridden = config.clone();
            overridden.render.fallback_language = Some(language.clone());
            overridden
                .validate()
                .context("Invalid --fallback-language")?;
            options.fallback_language = (!language.is_empty()).then(|| language.clone());
        }

        if self.show_raw {
            options.show_raw = true;
        }

        Ok(options)
    }

    /// Write the template configuration to `output_path`
    pub fn handle_init_command(output_path: &Path, force: bool) -> Result<()> {
        if output_path.exists() && !force {
            return Err(anyhow::anyhow!(
                "Configuration file already exists: {}. Use --force to overwrite.",
                output_path.display()
            ));
        }

        std::fs::write(output_path, Config::template()).with_context(|| {
            format!("Failed to write configuration file: {}", output_path.display())
        })?;

        println!("Created configuration file: {}", output_path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from(["fencesplit", "reply.txt", "--format", "html", "--show-raw"]);
        assert_eq!(cli.paths, vec!["reply.txt"]);
        assert_eq!(cli.format, Some(OutputFormat::Html));
        assert!(cli.show_raw);
        assert!(!cli.dry_run);
        assert!(cli.command.is_none());
        assert!(!cli.reads_stdin());
    }

    #[test]
    fn test_stdin_detection() {
        assert!(Cli::parse_from(["fencesplit"]).reads_stdin());
        assert!(Cli::parse_from(["fencesplit", "-"]).reads_stdin());
        assert!(!Cli::parse_from(["fencesplit", "-", "b.txt"]).reads_stdin());
    }

    #[test]
    fn test_init_subcommand_parsing() {
        let cli = Cli::parse_from(["fencesplit", "init", "--force"]);
        match cli.command {
            Some(Commands::Init { output, force }) => {
                assert_eq!(output, PathBuf::from(".fencesplitrc.toml"));
                assert!(force);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_flags_override_config() {
        let mut config = Config::default();
        config.render.format = Some(OutputFormat::Json);
        config.render.fallback_language = Some("text".to_string());

        let cli = Cli::parse_from(["fencesplit", "-f", "markdown", "-l", "rust"]);
        let options = cli.render_options(&config).unwrap();
        assert_eq!(options.format, OutputFormat::Markdown);
        assert_eq!(options.fallback_language.as_deref(), Some("rust"));

        let cli = Cli::parse_from(["fencesplit"]);
        let options = cli.render_options(&config).unwrap();
        assert_eq!(options.format, OutputFormat::Json);
        assert_eq!(options.fallback_language.as_deref(), Some("text"));
    }

    #[test]
    fn test_invalid_fallback_language_flag() {
        let cli = Cli::parse_from(["fencesplit", "-l", "two words"]);
        assert!(cli.render_options(&Config::default()).is_err());
    }

    #[test]
    fn test_init_command_refuses_overwrite() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(".fencesplitrc.toml");

        Cli::handle_init_command(&path, false).unwrap();
        assert!(fs::read_to_string(&path).unwrap().contains("[render]"));

        fs::write(&path, "existing content").unwrap();
        let err = Cli::handle_init_command(&path, false).unwrap_err();
        assert!(err.to_string().contains("already exists"));

        Cli::handle_init_command(&path, true).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert!(!content.contains("existing content"));
        assert!(Config::from_file(&path).is_ok());
    }
}
