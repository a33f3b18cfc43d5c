//! Command line surface.
//!
//! Commands are attached to an owned [`Command`] by [`register_commands`],
//! which the entry point calls once; nothing is registered implicitly.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::{crate_version, value_parser, Arg, ArgAction, ArgMatches, Command};

use crate::config::Job;

pub const SYNOPSIS: &str = "gather is a CLI for downloading URIs.";

/// One parsed invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub save_as: Option<PathBuf>,
    pub proxy: Option<String>,
    pub debug: bool,
    pub action: Action,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Job given directly on the command line.
    Job(Job),
    /// Job read from a JSON config file.
    Run(PathBuf),
}

/// The root command with its global options and no subcommands.
pub fn base_command() -> Command {
    Command::new("gather")
        .version(crate_version!())
        .about(SYNOPSIS)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("save-as")
                .short('s')
                .long("save-as")
                .value_name("PATH")
                .help("Path to save downloads to")
                .value_parser(value_parser!(PathBuf))
                .global(true),
        )
        .arg(
            Arg::new("proxy")
                .long("proxy")
                .value_name("URL")
                .help("HTTP proxy to race against the direct route")
                .global(true),
        )
        .arg(
            Arg::new("debug")
                .long("debug")
                .help("Enable debug logging")
                .action(ArgAction::SetTrue)
                .global(true),
        )
}

fn uri_arg(help: &'static str) -> Arg {
    Arg::new("uri")
        .short('u')
        .long("uri")
        .value_name("URI")
        .help(help)
        .required(true)
}

/// Adds the `download`, `scrape` and `run` subcommands to `cmd`.
pub fn register_commands(cmd: Command) -> Command {
    cmd.subcommand(
        Command::new("download")
            .about("Download a URL contents to file")
            .long_about("Given a URL, download its contents to a file")
            .arg(uri_arg("Host to download from")),
    )
    .subcommand(
        Command::new("scrape")
            .about("Scrape a URL for files")
            .long_about("Scrape a URL for file patterns and download matching files")
            .arg(uri_arg("Host to scrape files from"))
            .arg(
                Arg::new("pattern")
                    .short('p')
                    .long("pattern")
                    .value_name("REGEX")
                    .help("Pattern to look for when scraping for files")
                    .required(true),
            )
            .arg(
                Arg::new("which")
                    .short('w')
                    .long("which")
                    .value_name("all|first|last")
                    .help("Which files to get, after sorting")
                    .required(true),
            ),
    )
    .subcommand(
        Command::new("run")
            .about("Run the job described in a JSON config file")
            .arg(
                Arg::new("config")
                    .short('c')
                    .long("config")
                    .value_name("FILE")
                    .help("Config file; $Year, $Month, $Day etc. are replaced with the current UTC time")
                    .value_parser(value_parser!(PathBuf))
                    .required(true),
            ),
    )
}

/// Parses `args` (including the binary name) into an [`Invocation`].
pub fn parse_from<I, T>(args: I) -> Result<Invocation, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let mut cmd = register_commands(base_command());
    let matches = cmd.try_get_matches_from_mut(args)?;
    invocation_from(&matches).ok_or_else(|| cmd.error(ErrorKind::MissingSubcommand, "a command is required"))
}

fn string(matches: &ArgMatches, id: &str) -> String {
    matches.get_one::<String>(id).cloned().unwrap_or_default()
}

fn invocation_from(matches: &ArgMatches) -> Option<Invocation> {
    let (name, sub) = matches.subcommand()?;

    let action = match name {
        "download" => Action::Job(Job::Simple {
            uri: string(sub, "uri"),
        }),
        "scrape" => Action::Job(Job::Scrape {
            uri: string(sub, "uri"),
            pattern: string(sub, "pattern"),
            which: string(sub, "which"),
        }),
        "run" => Action::Run(sub.get_one::<PathBuf>("config")?.clone()),
        _ => return None,
    };

    // globals may be given before or after the subcommand
    let save_as = sub
        .get_one::<PathBuf>("save-as")
        .or_else(|| matches.get_one::<PathBuf>("save-as"))
        .cloned();
    let proxy = sub
        .get_one::<String>("proxy")
        .or_else(|| matches.get_one::<String>("proxy"))
        .cloned();
    let debug = sub.get_flag("debug") || matches.get_flag("debug");

    Some(Invocation {
        save_as,
        proxy,
        debug,
        action,
    })
}
