//! CLI argument definitions
//!
//! All Clap derive structs for `sexcfg` command-line parsing.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

use crate::config::schema::Section;
use crate::observability::LogFormat;

// ============================================================================
// Root CLI
// ============================================================================

/// Validate, inspect and generate SExtractor configuration files.
#[derive(Parser, Debug)]
#[command(name = "sexcfg", author, version, about)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-error output.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output control.
    #[arg(long, default_value = "auto", global = true, env = "SEXCFG_COLOR")]
    pub color: ColorChoice,

    /// Log output format.
    #[arg(long, default_value = "human", global = true, env = "SEXCFG_LOG_FORMAT")]
    pub log_format: LogFormat,
}

// ============================================================================
// Commands
// ============================================================================

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check configuration files and report every problem found.
    Validate(ValidateArgs),

    /// Load a configuration file and print the resolved values.
    Show(ShowArgs),

    /// Print a complete configuration file with default values.
    Defaults(DefaultsArgs),

    /// List the known parameters.
    Params(ParamsArgs),

    /// Generate shell completion scripts.
    Completions(CompletionsArgs),

    /// Display version information.
    Version(VersionArgs),
}

/// Options shared by commands that load a file.
#[derive(Args, Debug, Clone, Default)]
pub struct LoadArgs {
    /// Override a parameter (`KEY=VALUE`); may be repeated, later wins.
    #[arg(long = "set", value_name = "KEY=VALUE")]
    pub overrides: Vec<String>,

    /// Do not expand `${VAR}` references in values.
    #[arg(long)]
    pub no_env: bool,
}

/// Arguments for `validate`.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Configuration files to validate.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,

    /// Enable strict validation (warnings become errors).
    #[arg(long)]
    pub strict: bool,

    /// Loading options.
    #[command(flatten)]
    pub load: LoadArgs,
}

/// Arguments for `show`.
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Configuration file to load.
    pub file: PathBuf,

    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: ShowFormat,

    /// Annotate each parameter with where its value came from.
    #[arg(long)]
    pub origin: bool,

    /// Only show parameters explicitly set in the file or by `--set`.
    #[arg(long)]
    pub explicit: bool,

    /// Loading options.
    #[command(flatten)]
    pub load: LoadArgs,
}

/// Arguments for `defaults`.
#[derive(Args, Debug)]
pub struct DefaultsArgs {
    /// Only print one section.
    #[arg(long, value_parser = parse_section)]
    pub section: Option<Section>,

    /// Write to a file instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Overwrite the output file if it exists.
    #[arg(long, requires = "output")]
    pub force: bool,
}

/// Arguments for `params`.
#[derive(Args, Debug)]
pub struct ParamsArgs {
    /// Only list one section.
    #[arg(long, value_parser = parse_section)]
    pub section: Option<Section>,

    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

/// Arguments for shell completion generation.
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Target shell for completion script.
    pub shell: Shell,
}

/// Arguments for version display.
#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

// ============================================================================
// CLI-Local Enums
// ============================================================================

/// Color output choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ColorChoice {
    /// Auto-detect terminal support.
    #[default]
    Auto,
    /// Always use color.
    Always,
    /// Never use color.
    Never,
}

/// Output format for structured output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output.
    #[default]
    Human,
    /// JSON output.
    Json,
}

/// Output format for `show`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ShowFormat {
    /// Configuration file syntax.
    #[default]
    Human,
    /// JSON object keyed by parameter name.
    Json,
    /// YAML mapping keyed by parameter name.
    Yaml,
}

/// Shell type for completion generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    /// Bash shell.
    Bash,
    /// Zsh shell.
    Zsh,
    /// Fish shell.
    Fish,
    /// `PowerShell`.
    #[value(name = "powershell")]
    PowerShell,
    /// Elvish shell.
    Elvish,
}

fn parse_section(name: &str) -> Result<Section, String> {
    Section::from_name(name).ok_or_else(|| {
        let known: Vec<String> = Section::ALL
            .iter()
            .map(|s| format!("{s:?}").to_ascii_lowercase())
            .collect();
        format!("unknown section '{name}' (expected one of: {})", known.join(", "))
    })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_requires_files() {
        let result = Cli::try_parse_from(["sexcfg", "validate"]);
        assert!(result.is_err(), "Expected error for missing files");
    }

    #[test]
    fn test_validate_with_overrides() {
        let cli = Cli::try_parse_from([
            "sexcfg",
            "validate",
            "a.sex",
            "b.sex",
            "--set",
            "DETECT_THRESH=3",
            "--set",
            "GAIN=1.5",
            "--strict",
        ])
        .unwrap();
        let Commands::Validate(args) = cli.command else {
            panic!("Expected ValidateArgs");
        };
        assert_eq!(args.files.len(), 2);
        assert!(args.strict);
        assert_eq!(args.load.overrides, vec!["DETECT_THRESH=3", "GAIN=1.5"]);
        assert!(!args.load.no_env);
    }

    #[test]
    fn test_show_formats_parse() {
        for format in ["human", "json", "yaml"] {
            let cli = Cli::try_parse_from(["sexcfg", "show", "a.sex", "--format", format]);
            assert!(cli.is_ok(), "Failed to parse format={format}");
        }
    }

    #[test]
    fn test_validate_rejects_yaml_format() {
        let cli = Cli::try_parse_from(["sexcfg", "validate", "a.sex", "--format", "yaml"]);
        assert!(cli.is_err());
    }

    #[test]
    fn test_defaults_section() {
        let cli = Cli::try_parse_from(["sexcfg", "defaults", "--section", "star-galaxy"]).unwrap();
        let Commands::Defaults(args) = cli.command else {
            panic!("Expected DefaultsArgs");
        };
        assert_eq!(args.section, Some(Section::StarGalaxy));
    }

    #[test]
    fn test_unknown_section_rejected() {
        let result = Cli::try_parse_from(["sexcfg", "params", "--section", "astrometry"]);
        let err = result.unwrap_err();
        assert!(err.to_string().contains("unknown section"));
    }

    #[test]
    fn test_force_requires_output() {
        let result = Cli::try_parse_from(["sexcfg", "defaults", "--force"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_help_output() {
        let err = Cli::try_parse_from(["sexcfg", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_version_output() {
        let err = Cli::try_parse_from(["sexcfg", "--version"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_completions_shells_parse() {
        for shell in ["bash", "zsh", "fish", "powershell", "elvish"] {
            let cli = Cli::try_parse_from(["sexcfg", "completions", shell]);
            assert!(cli.is_ok(), "Failed to parse shell={shell}");
        }
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::try_parse_from([
            "sexcfg",
            "-vvv",
            "--color",
            "never",
            "--log-format",
            "json",
            "params",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 3);
        assert_eq!(cli.color, ColorChoice::Never);
        assert_eq!(cli.log_format, LogFormat::Json);
    }

    #[test]
    fn test_quiet_flag() {
        let cli = Cli::try_parse_from(["sexcfg", "version", "--quiet"]).unwrap();
        assert!(cli.quiet);
    }

    #[test]
    fn test_cli_debug_assert() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
