//! `cadm`: offline checks over config snapshots, mappings text and
//! promotion diffs

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod commands;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use cadm_core::{ConsoleConfig, LogFormat};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use tracing_subscriber::EnvFilter;

use crate::commands::ReviewArgs;

fn cli() -> Command {
    Command::new("cadm")
        .version(cadm_core::VERSION)
        .about("Configuration admin console tools")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Console configuration (TOML)"),
        )
        .subcommand(
            Command::new("resolve")
                .about("Resolve a slash-separated path in a tree snapshot")
                .arg(
                    Arg::new("tree")
                        .long("tree")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Tree snapshot (YAML)"),
                )
                .arg(Arg::new("path").required(true).help("Path to resolve")),
        )
        .subcommand(
            Command::new("versions")
                .about("Report the latest version and whether a selection is latest")
                .arg(
                    Arg::new("versions")
                        .long("versions")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Version list, newest first (YAML)"),
                )
                .arg(
                    Arg::new("selected")
                        .long("selected")
                        .help("Pinned version id"),
                ),
        )
        .subcommand(
            Command::new("mappings")
                .about("Agent mappings text")
                .subcommand_required(true)
                .subcommand(
                    Command::new("check")
                        .about("Parse, compile patterns and print normalized text")
                        .arg(
                            Arg::new("file")
                                .required(true)
                                .value_parser(value_parser!(PathBuf)),
                        ),
                ),
        )
        .subcommand(
            Command::new("review")
                .about("Replay approvals against a promotion diff")
                .arg(
                    Arg::new("diff")
                        .long("diff")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Promotion diff (YAML)"),
                )
                .arg(
                    Arg::new("approve")
                        .long("approve")
                        .action(ArgAction::Append)
                        .help("Approve a path"),
                )
                .arg(
                    Arg::new("resolve")
                        .long("resolve")
                        .action(ArgAction::Append)
                        .help("Mark a conflicted path resolved"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Output as JSON"),
                ),
        )
}

fn load_config(matches: &ArgMatches) -> Result<ConsoleConfig> {
    Ok(match matches.get_one::<PathBuf>("config") {
        Some(path) => ConsoleConfig::load(path)?,
        None => ConsoleConfig::new(),
    })
}

fn init_tracing(config: &ConsoleConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match config.log_format {
        LogFormat::Pretty => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

fn values<'a>(args: &'a ArgMatches, id: &str) -> Vec<&'a str> {
    args.get_many::<String>(id)
        .map(|vals| vals.map(String::as_str).collect())
        .unwrap_or_default()
}

fn path_arg<'a>(args: &'a ArgMatches, id: &str) -> Result<&'a Path> {
    args.get_one::<PathBuf>(id)
        .map(PathBuf::as_path)
        .with_context(|| format!("missing {id}"))
}

fn run(matches: &ArgMatches) -> Result<String> {
    match matches.subcommand() {
        Some(("resolve", args)) => {
            let path = args.get_one::<String>("path").map_or("", String::as_str);
            commands::resolve_node(path_arg(args, "tree")?, path)
        }
        Some(("versions", args)) => {
            let selected = args.get_one::<String>("selected").map(String::as_str);
            commands::versions(path_arg(args, "versions")?, selected)
        }
        Some(("mappings", args)) => match args.subcommand() {
            Some(("check", check)) => commands::check_mappings(path_arg(check, "file")?),
            _ => bail!("unknown mappings subcommand"),
        },
        Some(("review", args)) => {
            let review = ReviewArgs {
                approve: values(args, "approve"),
                resolve: values(args, "resolve"),
                json: args.get_flag("json"),
            };
            commands::review(path_arg(args, "diff")?, &review)
        }
        _ => bail!("unknown subcommand"),
    }
}

fn main() -> Result<()> {
    let matches = cli().get_matches();
    let config = load_config(&matches)?;
    init_tracing(&config);

    let output = run(&matches)?;
    println!("{output}");
    Ok(())
}
