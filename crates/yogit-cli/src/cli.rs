// SPDX-License-Identifier: Apache-2.0

//! Command-line interface definition for yogit.
//!
//! Uses clap's derive API with noun-verb subcommands, keeping the short
//! aliases (`br`, `ct`, `rv`) of the historical command names.

use std::io::IsTerminal;

use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

/// Extended help text for the completion subcommand.
const COMPLETION_HELP: &str = r#"EXAMPLES

  bash
    Add to ~/.bashrc:
      eval "$(yogit completion bash)"

  zsh
      yogit completion zsh > ~/.zsh/completions/_yogit

  fish
      yogit completion fish > ~/.config/fish/completions/yogit.fish
"#;

/// Output format for CLI results.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable tables (default)
    #[default]
    Text,
    /// JSON output for programmatic consumption
    Json,
    /// YAML output for programmatic consumption
    Yaml,
}

/// Global output configuration passed to commands.
#[derive(Clone, Debug)]
pub struct OutputContext {
    /// Output format (text, json, yaml)
    pub format: OutputFormat,
    /// Suppress non-essential output (spinners, update notices)
    pub quiet: bool,
    /// Whether stdout is a terminal (TTY)
    pub is_tty: bool,
}

impl OutputContext {
    /// Creates an `OutputContext` from CLI arguments.
    pub fn from_cli(format: OutputFormat, quiet: bool) -> Self {
        Self {
            format,
            quiet,
            is_tty: std::io::stdout().is_terminal(),
        }
    }

    /// Returns true if interactive elements (spinners, colors) should be shown.
    pub fn is_interactive(&self) -> bool {
        self.is_tty && !self.quiet && self.is_text()
    }

    /// Returns true for the human-readable format.
    pub fn is_text(&self) -> bool {
        matches!(self.format, OutputFormat::Text)
    }
}

/// yogit - GitHub activity reports from the command line.
///
/// Lists your pull requests, reviews, branches and contributions, and
/// builds your daily SCRUM report.
#[derive(Parser)]
#[command(name = "yogit")]
#[command(version, about, long_about = None)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Output format (text, json, yaml)
    #[arg(long, short = 'o', global = true, default_value = "text", value_enum)]
    pub output: OutputFormat,

    /// Suppress non-essential output (spinners, update notices)
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable debug-level logging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Manage your GitHub account
    #[command(subcommand)]
    Account(AccountCommand),

    /// Branch actions
    #[command(subcommand, visible_alias = "br")]
    Branch(BranchCommand),

    /// Contribution actions
    #[command(subcommand, visible_alias = "ct")]
    Contrib(ContribCommand),

    /// Organization actions
    #[command(subcommand)]
    Orga(OrgaCommand),

    /// Pull request actions
    #[command(subcommand)]
    Pr(PrCommand),

    /// Review actions
    #[command(subcommand, visible_alias = "rv")]
    Review(ReviewCommand),

    /// SCRUM actions
    #[command(subcommand)]
    Scrum(ScrumCommand),

    /// Print a shell completion script
    #[command(after_long_help = COMPLETION_HELP)]
    Completion {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Account subcommands
#[derive(Subcommand)]
pub enum AccountCommand {
    /// Set up your GitHub account
    Setup,

    /// Show your GitHub API quota
    Usage,
}

/// Branch subcommands
#[derive(Subcommand)]
pub enum BranchCommand {
    /// List your branches
    List {
        /// Only branches without pull request
        #[arg(long)]
        dangling: bool,
    },
}

/// Contribution subcommands
#[derive(Subcommand)]
pub enum ContribCommand {
    /// List your contributions
    List {
        /// Begin search at this date, YYYY-MM-DD (default: today)
        #[arg(long)]
        from: Option<String>,

        /// End search at this date, included, YYYY-MM-DD (default: today)
        #[arg(long)]
        to: Option<String>,
    },

    /// GitHub statistics
    Stats,
}

/// Organization subcommands
#[derive(Subcommand)]
pub enum OrgaCommand {
    /// List your organizations
    List,

    /// Organization member actions
    #[command(subcommand)]
    Member(MemberCommand),

    /// Organization pull request actions
    #[command(subcommand)]
    Pr(OrgaPrCommand),
}

/// Organization member subcommands
#[derive(Subcommand)]
pub enum MemberCommand {
    /// List the members of an organization
    List {
        /// Organization, required when you belong to several
        #[arg(long)]
        orga: Option<String>,
    },

    /// Pick one member at random
    Pickone {
        /// Organization, required when you belong to several
        #[arg(long)]
        orga: Option<String>,
    },
}

/// Organization pull request subcommands
#[derive(Subcommand)]
pub enum OrgaPrCommand {
    /// List the open pull requests of an organization
    List {
        /// Organization, required when you belong to several
        #[arg(long)]
        orga: Option<String>,

        /// Keep pull requests carrying this label (repeatable)
        #[arg(long = "label")]
        labels: Vec<String>,
    },
}

/// Pull request subcommands
#[derive(Subcommand)]
pub enum PrCommand {
    /// List your open pull requests
    List,
}

/// Review subcommands
#[derive(Subcommand)]
pub enum ReviewCommand {
    /// List your reviews on open pull requests
    List,

    /// List the reviews requested from you
    Requested {
        /// List closed pull requests you were asked to review instead
        #[arg(long)]
        missed: bool,
    },
}

/// SCRUM subcommands
#[derive(Subcommand)]
pub enum ScrumCommand {
    /// Generate your daily activity report
    Report {
        /// Date of the report, YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<String>,
    },
}
