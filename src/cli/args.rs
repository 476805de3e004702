//! Defines the command-line arguments and subcommands for the synrules CLI.
//!
//! This module uses the `clap` crate with its "derive" feature to create a
//! declarative and type-safe argument parsing structure.

use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "synrules",
    version,
    about = "Expand s-expression forms with syntax-rules style pattern/template rules."
)]
pub struct SynRulesArgs {
    #[command(subcommand)]
    pub command: Command,

    /// Raise log verbosity (-v debug, -vv trace). SYNRULES_LOG overrides when not given.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(flatten)]
    pub settings: SettingsArgs,
}

/// Overrides for values in the configuration file.
#[derive(Debug, Default, Args)]
pub struct SettingsArgs {
    /// JSON configuration file.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Ellipsis marker token.
    #[arg(long, global = true)]
    pub ellipsis: Option<String>,

    /// Let an exhausted pattern match forms with extra trailing elements.
    #[arg(long, global = true)]
    pub lenient: bool,

    /// Skip the macro keyword (first element) when matching.
    #[arg(long, global = true)]
    pub ignore_keyword: bool,

    /// Column limit for --pretty output.
    #[arg(long, global = true)]
    pub width: Option<usize>,
}

/// How an expansion result is printed.
#[derive(Debug, Default, Clone, Copy, Args)]
pub struct OutputArgs {
    /// Print the rule that fired and a diff of input and output.
    #[arg(long)]
    pub explain: bool,

    /// Print the result as JSON.
    #[arg(long, conflicts_with = "pretty")]
    pub json: bool,

    /// Break long output across lines.
    #[arg(long)]
    pub pretty: bool,
}

/// An enumeration of all available CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Expand one form with the rules in a definitions file.
    Expand {
        /// File holding a syntax-rules form or define-syntax forms.
        #[arg(short, long, required = true)]
        rules: PathBuf,
        /// The form to expand; read from stdin when omitted.
        form: Option<String>,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Expand a bundle file of the shape (form (literal ...) (pattern template) ...).
    Run {
        /// The bundle file.
        #[arg(required = true)]
        file: PathBuf,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Match one form against one pattern and print the bindings.
    Match {
        /// The pattern.
        #[arg(short, long, required = true)]
        pattern: String,
        /// Literal tokens, as a list: "(else =>)".
        #[arg(short, long, default_value = "()")]
        literals: String,
        /// The form to match.
        form: String,
        /// Print the bindings as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Re-render every form in a file with normalised brackets.
    Fmt {
        /// The file to format.
        #[arg(required = true)]
        file: PathBuf,
        /// Break long forms across lines.
        #[arg(long)]
        pretty: bool,
    },
}
