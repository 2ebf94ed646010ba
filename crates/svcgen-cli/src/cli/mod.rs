//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text and value enums. No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

#[derive(Debug, Parser)]
#[command(
    name     = "svcgen",
    bin_name = "svcgen",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "\u{26a1} Microservice project generator",
    long_about = "svcgen asks a handful of questions about your service \
                  (gateways, transporter, cacher, database, channels) and \
                  generates a project containing only the files your answers need.",
    after_help = "EXAMPLES:\n\
        \x20 svcgen new shop\n\
        \x20 svcgen new shop --yes --set apiGQL=false --set transporter=Redis\n\
        \x20 svcgen plan --answers answers.json --format json\n\
        \x20 svcgen completions bash > /usr/share/bash-completion/completions/svcgen",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate a new service project.
    #[command(
        visible_alias = "n",
        about = "Generate a new project",
        after_help = "EXAMPLES:\n\
            \x20 svcgen new shop                       # interactive\n\
            \x20 svcgen new shop --yes                 # all defaults\n\
            \x20 svcgen new shop --answers shop.json --set needCacher=true\n\
            \x20 svcgen new shop --yes --dry-run -o /tmp"
    )]
    New(NewArgs),

    /// Print the questions `new` asks.
    #[command(visible_alias = "q", about = "Show the question schema")]
    Questions(QuestionsArgs),

    /// Show derived flags and file decisions without writing anything.
    #[command(
        about = "Preview the file selection",
        after_help = "EXAMPLES:\n\
            \x20 svcgen plan\n\
            \x20 svcgen plan --set dbService=false --format json\n\
            \x20 svcgen plan --legacy-dist"
    )]
    Plan(PlanArgs),

    /// Write a default configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 svcgen init           # platform config dir\n\
            \x20 svcgen init --force   # overwrite an existing file"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 svcgen completions bash > ~/.local/share/bash-completion/completions/svcgen\n\
            \x20 svcgen completions zsh  > ~/.zfunc/_svcgen\n\
            \x20 svcgen completions fish > ~/.config/fish/completions/svcgen.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect the configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 svcgen config get generation.placeholders\n\
            \x20 svcgen config list\n\
            \x20 svcgen config path"
    )]
    Config(ConfigCommands),
}

// ── shared argument groups ────────────────────────────────────────────────────

/// Where answers come from besides the prompts.
#[derive(Debug, Clone, Default, Args)]
pub struct AnswerArgs {
    /// JSON object of preset answers, keyed by question key.
    #[arg(long = "answers", value_name = "FILE", help = "Answers file (JSON)")]
    pub answers: Option<PathBuf>,

    /// Preset a single answer. Repeatable; wins over the answers file.
    #[arg(
        short = 's',
        long = "set",
        value_name = "KEY=VALUE",
        help = "Preset an answer, e.g. --set transporter=Redis"
    )]
    pub set: Vec<String>,

    /// Use the deprecated single-flag distribution rules.
    #[arg(long = "legacy-dist", help = "Use legacy dist flags (deprecated)")]
    pub legacy_dist: bool,
}

#[derive(Debug, Clone, Default, Args)]
pub struct TemplateArgs {
    /// Template directory. When given, no other location is searched.
    #[arg(
        short = 't',
        long = "template-dir",
        value_name = "DIR",
        help = "Template directory"
    )]
    pub template_dir: Option<PathBuf>,
}

// ── new ───────────────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct NewArgs {
    /// Directory name of the project, also rendered as `projectName`.
    #[arg(value_name = "NAME", help = "Project name")]
    pub name: String,

    #[arg(
        short = 'o',
        long = "output",
        value_name = "DIR",
        default_value = ".",
        help = "Directory the project is created in"
    )]
    pub output: PathBuf,

    #[command(flatten)]
    pub template: TemplateArgs,

    #[command(flatten)]
    pub answers: AnswerArgs,

    /// Answer every unanswered question with its default.
    #[arg(short = 'y', long = "yes", help = "Use defaults, never prompt")]
    pub yes: bool,

    /// Write into an existing directory.
    #[arg(long = "force", help = "Write into an existing directory")]
    pub force: bool,

    #[arg(long = "dry-run", help = "Show what would be created without writing")]
    pub dry_run: bool,

    /// Copy unknown placeholders through instead of failing.
    #[arg(long = "keep-unresolved", help = "Keep unresolved placeholders")]
    pub keep_unresolved: bool,
}

// ── questions / plan ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct QuestionsArgs {
    #[arg(long = "format", value_enum, default_value = "table")]
    pub format: ReportFormat,
}

#[derive(Debug, Args)]
pub struct PlanArgs {
    #[command(flatten)]
    pub template: TemplateArgs,

    #[command(flatten)]
    pub answers: AnswerArgs,

    #[arg(long = "format", value_enum, default_value = "table")]
    pub format: ReportFormat,
}

/// Output format for `questions` and `plan`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable table.
    Table,
    /// JSON document.
    Json,
}

// ── init ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Overwrite an existing config file.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `generation.placeholders`.
        key: String,
    },
    /// Print the effective configuration.
    List,
    /// Print the path of the default configuration file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parse_new_with_presets() {
        let cli = Cli::parse_from([
            "svcgen",
            "new",
            "shop",
            "--yes",
            "--set",
            "apiGW=false",
            "-s",
            "transporter=Redis",
            "--keep-unresolved",
        ]);
        let Commands::New(args) = cli.command else {
            panic!("expected New command");
        };
        assert_eq!(args.name, "shop");
        assert!(args.yes);
        assert!(args.keep_unresolved);
        assert_eq!(args.answers.set, vec!["apiGW=false", "transporter=Redis"]);
        assert_eq!(args.output, PathBuf::from("."));
    }

    #[test]
    fn plan_defaults_to_table() {
        let cli = Cli::parse_from(["svcgen", "plan", "--legacy-dist"]);
        let Commands::Plan(args) = cli.command else {
            panic!("expected Plan command");
        };
        assert_eq!(args.format, ReportFormat::Table);
        assert!(args.answers.legacy_dist);
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::parse_from(["svcgen", "questions", "-vv", "--no-color"]);
        assert_eq!(cli.global.verbose, 2);
        assert!(cli.global.no_color);
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        let result = Cli::try_parse_from(["svcgen", "--quiet", "--verbose", "questions"]);
        assert!(result.is_err());
    }

    #[test]
    fn new_requires_a_name() {
        assert!(Cli::try_parse_from(["svcgen", "new"]).is_err());
    }
}
