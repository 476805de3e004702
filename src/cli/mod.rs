//! The synrules Command-Line Interface.
//!
//! This module is the main entry point for all CLI commands and orchestrates
//! the core library functions. Results go to stdout, logs and diagnostics to
//! stderr.

use std::{fs, io, path::Path, process};

use clap::Parser;
use termcolor::{ColorChoice, StandardStream};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::ast::Tree;
use crate::cli::args::{Command, OutputArgs, SettingsArgs, SynRulesArgs};
use crate::config::ExpanderConfig;
use crate::errors::{SourceContext, SynRulesError};
use crate::macros::{self, Expansion, Matcher, Rule, TrailingPolicy};
use crate::syntax::parser;

pub mod args;
pub mod output;

/// Environment variable holding a `tracing` filter directive.
pub const LOG_ENV: &str = "SYNRULES_LOG";

/// The main entry point for the CLI.
pub fn run() {
    let args = SynRulesArgs::parse();
    init_tracing(args.verbose);

    if let Err(e) = execute(args) {
        eprintln!("{:?}", miette::Report::new(e));
        process::exit(1);
    }
}

/// Runs a parsed command line.
pub fn execute(args: SynRulesArgs) -> Result<(), SynRulesError> {
    let config = resolve_config(&args.settings)?;
    debug!(?config, "resolved configuration");

    match args.command {
        Command::Expand { rules, form, output } => handle_expand(&rules, form, output, &config),
        Command::Run { file, output } => handle_run(&file, output, &config),
        Command::Match {
            pattern,
            literals,
            form,
            json,
        } => handle_match(&pattern, &literals, &form, json, &config),
        Command::Fmt { file, pretty } => handle_fmt(&file, pretty, &config),
    }
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

/// Loads the config file, if any, then applies command-line overrides.
pub fn resolve_config(settings: &SettingsArgs) -> Result<ExpanderConfig, SynRulesError> {
    let mut config = match &settings.config {
        Some(path) => ExpanderConfig::load(path)?,
        None => ExpanderConfig::default(),
    };
    if let Some(ellipsis) = &settings.ellipsis {
        config.ellipsis = ellipsis.clone();
    }
    if settings.lenient {
        config.trailing = TrailingPolicy::Lenient;
    }
    if settings.ignore_keyword {
        config.ignore_keyword = true;
    }
    if let Some(width) = settings.width {
        config.width = width;
    }
    config.validate()?;
    Ok(config)
}

// ============================================================================
// COMMAND HANDLERS
// ============================================================================

/// Handles the `expand` subcommand.
fn handle_expand(
    rules_path: &Path,
    form: Option<String>,
    opts: OutputArgs,
    config: &ExpanderConfig,
) -> Result<(), SynRulesError> {
    let definitions = macros::load_definitions_from_file(rules_path, &config.match_config())?;
    let source = match form {
        Some(form) => form,
        None => io::read_to_string(io::stdin()).map_err(|e| SynRulesError::io("read", "<stdin>", e))?,
    };
    let form = parser::parse_one(&source, SourceContext::inline(source.as_str()))?;

    let expansion = definitions.try_rules(&form)?;
    let rule = definitions
        .rules_for(&form)
        .and_then(|rules| rules.rules.get(expansion.rule_index));

    emit(&form, &expansion, rule, opts, config)
}

/// Handles the `run` subcommand.
fn handle_run(path: &Path, opts: OutputArgs, config: &ExpanderConfig) -> Result<(), SynRulesError> {
    let source = read_file(path)?;
    let bundle = parser::parse_one(&source, source_context(path, &source))?;
    let (form, rules) = macros::load_bundle(&bundle, &config.match_config())?;

    let expansion = rules.try_rules(&form)?;
    let rule = rules.rules.get(expansion.rule_index);
    emit(&form, &expansion, rule, opts, config)
}

/// Handles the `match` subcommand.
fn handle_match(
    pattern: &str,
    literals: &str,
    form: &str,
    json: bool,
    config: &ExpanderConfig,
) -> Result<(), SynRulesError> {
    let pattern = parser::parse_one(pattern, SourceContext::from_file("<pattern>", pattern))?;
    let literals = parser::parse_one(literals, SourceContext::from_file("<literals>", literals))?;
    let form = parser::parse_one(form, SourceContext::from_file("<form>", form))?;

    let match_config = config.match_config();
    let literals = macros::literal_set(&literals, &match_config)?;
    macros::check_pattern(&pattern, &match_config)?;

    let bindings = Matcher::new(&literals, &match_config)
        .match_rule(&form, &pattern)
        .map_err(|reason| SynRulesError::PatternMismatch {
            reason: reason.to_string(),
        })?;

    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    let written = if json {
        output::print_json(&mut stdout, &bindings)
    } else {
        output::print_bindings(&mut stdout, &bindings)
    };
    written.map_err(write_error)
}

/// Handles the `fmt` subcommand.
fn handle_fmt(path: &Path, pretty: bool, config: &ExpanderConfig) -> Result<(), SynRulesError> {
    let source = read_file(path)?;
    let forms = parser::parse(&source, source_context(path, &source))?;
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    for form in &forms {
        output::print_tree(&mut stdout, form, pretty.then_some(config.width)).map_err(write_error)?;
    }
    Ok(())
}

// ============================================================================
// HELPERS
// ============================================================================

fn emit(
    input: &Tree,
    expansion: &Expansion,
    rule: Option<&Rule>,
    opts: OutputArgs,
    config: &ExpanderConfig,
) -> Result<(), SynRulesError> {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    if let (true, Some(rule)) = (opts.explain, rule) {
        output::print_explanation(&mut stdout, input, rule, expansion, config.width).map_err(write_error)?;
    }
    let written = if opts.json {
        output::print_json(&mut stdout, &expansion.output)
    } else {
        output::print_tree(&mut stdout, &expansion.output, opts.pretty.then_some(config.width))
    };
    written.map_err(write_error)
}

fn read_file(path: &Path) -> Result<String, SynRulesError> {
    fs::read_to_string(path).map_err(|e| SynRulesError::io("read", path, e))
}

fn source_context(path: &Path, source: &str) -> SourceContext {
    SourceContext::from_file(path.display().to_string(), source)
}

fn write_error(e: io::Error) -> SynRulesError {
    SynRulesError::io("write", "<stdout>", e)
}
