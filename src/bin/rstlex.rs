//! Command-line interface for rstlex
//! This binary runs the lexer over a document and prints the resulting token stream or its
//! diagnostics.
//!
//! Usage:
//!   rstlex tokens `<path>` [--format `<format>`]  - Print every item of the token stream
//!   rstlex check `<path>`                       - Print system messages, fail on errors
//!
//! Global options: --config `<file>` layers a TOML file over the defaults, --log-level sets the
//! level of diagnostics written to stderr.

use clap::{Arg, ArgMatches, Command};
use rstlex::rst::config::{Loader, OutputFormat, RstlexConfig};
use rstlex::rst::lexing::{worst_severity, Severity, TokenChannel};
use rstlex::rst::{Item, LexError};
use tracing::Level;

fn main() {
    let matches = Command::new("rstlex")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A lexer for reStructuredText-like documents")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .help("Configuration file layered over the defaults"),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .global(true)
                .help("Log level for diagnostics on stderr (error, warn, info, debug, trace)"),
        )
        .subcommand(
            Command::new("tokens")
                .about("Print the token stream of a document")
                .arg(
                    Arg::new("path")
                        .help("Path to the document")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .help("Output format: text, json or yaml"),
                ),
        )
        .subcommand(
            Command::new("check")
                .about("Report malformed sections; exits non-zero on errors")
                .arg(
                    Arg::new("path")
                        .help("Path to the document")
                        .required(true)
                        .index(1),
                ),
        )
        .get_matches();

    // Global options are propagated into the subcommand's matches
    let global_matches = matches.subcommand().map_or(&matches, |(_, m)| m);
    let config = load_config(global_matches).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });
    init_logging(&config.log.level);

    match matches.subcommand() {
        Some(("tokens", tokens_matches)) => {
            let path = required_path(tokens_matches);
            let format = match tokens_matches.get_one::<String>("format") {
                Some(name) => OutputFormat::from_name(name).unwrap_or_else(|| {
                    eprintln!("Error: unknown format '{}'", name);
                    std::process::exit(1);
                }),
                None => config.output.format,
            };
            handle_tokens_command(path, format, &config);
        }
        Some(("check", check_matches)) => {
            let path = required_path(check_matches);
            handle_check_command(path, &config);
        }
        _ => unreachable!(),
    }
}

fn required_path(matches: &ArgMatches) -> &str {
    matches
        .get_one::<String>("path")
        .map(String::as_str)
        .unwrap_or_else(|| {
            eprintln!("Error: missing path");
            std::process::exit(1);
        })
}

/// Defaults, then the file given with --config, then command-line overrides
fn load_config(matches: &ArgMatches) -> Result<RstlexConfig, LexError> {
    let mut loader = Loader::new();
    if let Some(path) = matches.get_one::<String>("config") {
        loader = loader.with_file(path);
    }
    if let Some(level) = matches.get_one::<String>("log-level") {
        loader = loader.set_override("log.level", level.as_str())?;
    }
    Ok(loader.build()?)
}

fn init_logging(level: &str) {
    let level = level.parse::<Level>().unwrap_or(Level::WARN);
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .init();
}

fn lex_file(path: &str, config: &RstlexConfig) -> Vec<Item> {
    let source = std::fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading file: {}", e);
        std::process::exit(1);
    });
    let channel = TokenChannel::spawn_with_options(path, source, config.lexer).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });
    channel.collect()
}

/// Handle the tokens command
fn handle_tokens_command(path: &str, format: OutputFormat, config: &RstlexConfig) {
    let items = lex_file(path, config);
    let output = match format {
        OutputFormat::Text => {
            let mut out = String::new();
            for item in &items {
                out.push_str(&item.to_string());
                out.push('\n');
            }
            Ok(out)
        }
        OutputFormat::Json => serde_json::to_string_pretty(&items)
            .map(|json| json + "\n")
            .map_err(|e| e.to_string()),
        OutputFormat::Yaml => serde_yaml::to_string(&items).map_err(|e| e.to_string()),
    };
    match output {
        Ok(output) => print!("{}", output),
        Err(e) => {
            eprintln!("Serialization error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Handle the check command
fn handle_check_command(path: &str, config: &RstlexConfig) {
    let items = lex_file(path, config);
    for item in &items {
        if let Some(message) = &item.message {
            println!(
                "{}:{}: {} {}",
                message.source, message.line, message.level, item.text
            );
        }
    }
    if worst_severity(&items) >= Some(Severity::Error) {
        std::process::exit(1);
    }
}
