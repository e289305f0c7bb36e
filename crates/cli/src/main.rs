mod stats;

use anyhow::{Context, Result, bail};
use argspec::{Command, Flag, Matches, Param, ParseError, parse, render_help};
use std::io::{self, Write};
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, fmt};

const PROGRAM: &str = "argspec-demo";
const ABOUT: &str = "A small text statistics tool";

fn commands() -> Result<Vec<Command>> {
    Ok(vec![
        Command::new("help", "print help")?
            .short("-h")?
            .long("--help")?
            .arg(Param::new("command", "show help for this command")?.optional())?,
        Command::new("stats", "count lines, words and bytes of a text file")?
            .short("-s")?
            .long("--stats")?
            .arg(Param::new("file", "the file to open")?.parser(stats::load))?
            .arg(
                Param::new("top", "number of most frequent words to list")?
                    .optional()
                    .default(5i64)
                    .parser(stats::parse_top),
            )?
            .arg(
                Flag::new("output", "the output file path")?
                    .short("-o")?
                    .long("--output")?
                    .valued(),
            )?
            .arg(
                Flag::new("verbose", "log what was analyzed")?
                    .short("-v")?
                    .long("--verbose")?
                    .count()?,
            )?
            .arg(Flag::new("json", "print the report as JSON")?.long("--json")?)?
            .arg(
                Flag::new("tag", "label to attach to the report (repeatable)")?
                    .short("-t")?
                    .long("--tag")?
                    .valued(),
            )?,
        Command::new("schema", "print the command table as JSON")?.long("--schema")?,
    ])
}

fn main() -> ExitCode {
    init_tracing();
    let argv: Vec<String> = std::env::args().skip(1).collect();
    match run(&argv) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(argv: &[String]) -> Result<ExitCode> {
    let commands = commands().context("invalid command table")?;
    argspec::validate_commands(&commands).context("invalid command table")?;

    let matches = match parse(&commands, argv) {
        Ok(m) => m,
        Err(ParseError::Interrupted(interrupt)) => {
            tracing::warn!("{interrupt}");
            return Ok(ExitCode::from(130));
        }
        Err(err) => {
            eprintln!("error: {err}");
            render_help(PROGRAM, ABOUT, &commands, &mut io::stderr().lock(), argv)?;
            return Ok(ExitCode::FAILURE);
        }
    };
    tracing::debug!(command = matches.command_name(), "dispatching");

    match matches.command_name() {
        "help" => help(&commands, &matches)?,
        "stats" => stats::run(&matches)?,
        "schema" => {
            let json = argspec::schema::to_json(&commands)?;
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{json}")?;
        }
        other => bail!("unhandled command: {other}"),
    }
    Ok(ExitCode::SUCCESS)
}

fn help(commands: &[Command], matches: &Matches) -> Result<()> {
    let context: Vec<&str> = matches.get_str("command").into_iter().collect();
    if let Some(name) = context.first() {
        if argspec::find_command(commands, name).is_none() {
            bail!("unknown command: '{name}'");
        }
    }
    render_help(PROGRAM, ABOUT, commands, &mut io::stdout().lock(), &context)?;
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .init();
}
