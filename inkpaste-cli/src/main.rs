//! Command-line interface for inkpaste
//! Renders markdown into inline-styled HTML ready to paste into a publishing platform.
//!
//! Usage:
//!   inkpaste render `<file.md>` [--theme `<id|path.json>`] [--no-style] [-o `<out>`]
//!   inkpaste check `<file.md>` [--json]                - List quality issues (always exits 0)
//!   inkpaste export `<file.html>` [-o `<out>`]          - Rewrite image grids for the clipboard
//!   inkpaste themes                                     - List built-in themes
//!
//! Configuration is read from the embedded defaults, then `./inkpaste.toml` if present, then
//! `--config <file>`, then `INKPASTE__*` environment variables, then command-line flags.

mod commands;
mod error;

use clap::{Arg, ArgAction, ArgMatches, Command};
use error::CliError;
use inkpaste_config::{InkpasteConfig, Loader, LOCAL_CONFIG_FILE};
use tracing_subscriber::filter::LevelFilter;

fn build_cli() -> Command {
    Command::new("inkpaste")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Turn markdown into inline-styled HTML for paste-only publishing platforms")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .help("Configuration file layered over the built-in defaults"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::Count)
                .help("Increase log verbosity (-v info, -vv debug, -vvv trace)"),
        )
        .subcommand(
            Command::new("render")
                .about("Render a markdown file to HTML")
                .arg(Arg::new("path").help("Markdown source").required(true).index(1))
                .arg(
                    Arg::new("theme")
                        .long("theme")
                        .short('t')
                        .help("Built-in theme id or path to a theme JSON file"),
                )
                .arg(
                    Arg::new("no-style")
                        .long("no-style")
                        .action(ArgAction::SetTrue)
                        .help("Emit bare markup without inline styles"),
                )
                .arg(output_arg()),
        )
        .subcommand(
            Command::new("check")
                .about("Report structural, accessibility and link issues")
                .arg(Arg::new("path").help("Markdown source").required(true).index(1))
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Print issues as JSON"),
                ),
        )
        .subcommand(
            Command::new("export")
                .about("Rewrite image grids in rendered HTML into table layout")
                .arg(Arg::new("path").help("Rendered HTML").required(true).index(1))
                .arg(output_arg()),
        )
        .subcommand(Command::new("themes").about("List built-in themes"))
}

fn output_arg() -> Arg {
    Arg::new("output")
        .long("output")
        .short('o')
        .help("Write to this file instead of stdout")
}

fn main() {
    let matches = build_cli().get_matches();
    if let Err(err) = run(&matches) {
        eprintln!("error: {}", err);
        for detail in err.details() {
            eprintln!("  {}", detail);
        }
        std::process::exit(1);
    }
}

fn run(matches: &ArgMatches) -> Result<(), CliError> {
    let config = load_config(matches)?;
    init_logging(&config, matches.get_count("verbose"))?;

    match matches.subcommand() {
        Some(("render", sub)) => {
            let output = commands::handle_render(required(sub, "path"), &config)?;
            emit(&output, sub.get_one::<String>("output"))
        }
        Some(("check", sub)) => {
            let output =
                commands::handle_check(required(sub, "path"), sub.get_flag("json"), &config)?;
            emit(&output, None)
        }
        Some(("export", sub)) => {
            let output = commands::handle_export(required(sub, "path"))?;
            emit(&output, sub.get_one::<String>("output"))
        }
        Some(("themes", _)) => emit(&commands::handle_themes(), None),
        _ => Ok(()),
    }
}

fn required<'a>(matches: &'a ArgMatches, name: &str) -> &'a str {
    // clap enforces presence of required args before we get here
    matches
        .get_one::<String>(name)
        .map(String::as_str)
        .unwrap_or_default()
}

fn load_config(matches: &ArgMatches) -> Result<InkpasteConfig, CliError> {
    let mut loader = Loader::new().with_optional_file(LOCAL_CONFIG_FILE);
    if let Some(path) = matches.get_one::<String>("config") {
        loader = loader.with_file(path);
    }
    loader = loader.with_environment();

    if let Some(("render", sub)) = matches.subcommand() {
        if let Some(theme) = sub.get_one::<String>("theme") {
            loader = loader.set_override("render.theme", theme.as_str())?;
        }
        if sub.get_flag("no-style") {
            loader = loader.set_override("render.apply_styles", false)?;
        }
    }
    Ok(loader.build()?)
}

fn init_logging(config: &InkpasteConfig, verbosity: u8) -> Result<(), CliError> {
    let level = match verbosity {
        0 => config
            .logging
            .level
            .parse::<LevelFilter>()
            .map_err(|_| CliError::LogLevel(config.logging.level.clone()))?,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .with_target(false)
        .init();
    Ok(())
}

fn emit(output: &str, path: Option<&String>) -> Result<(), CliError> {
    match path {
        Some(path) => std::fs::write(path, output).map_err(|source| CliError::Write {
            path: path.clone(),
            source,
        }),
        None => {
            print!("{}", output);
            Ok(())
        }
    }
}
