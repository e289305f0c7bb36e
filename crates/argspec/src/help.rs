//! Help text rendering from the command model.

use std::io::{self, Write};

use crate::registry::find_command;
use crate::spec::{Command, Flag, FlagKind, Param};
use crate::value::Value;

/// Write help for `commands` to `sink`.
///
/// If the first `context` token selects a command, that command's usage,
/// arguments and flags are shown; otherwise the command list is.
pub fn render_help<W, S>(
    program: &str,
    description: &str,
    commands: &[Command],
    sink: &mut W,
    context: &[S],
) -> io::Result<()>
where
    W: Write + ?Sized,
    S: AsRef<str>,
{
    sink.write_all(help_text(program, description, commands, context).as_bytes())?;
    sink.flush()
}

/// Same as [`render_help`], returned as a `String`.
pub fn help_text<S: AsRef<str>>(
    program: &str,
    description: &str,
    commands: &[Command],
    context: &[S],
) -> String {
    let mut out = String::from("\n");
    if description.trim().is_empty() {
        out.push_str(&format!("{program}\n"));
    } else {
        out.push_str(&format!("{program} - {}\n", description.trim()));
    }
    out.push('\n');

    let selected = context.first().and_then(|token| {
        let token = token.as_ref();
        find_command(commands, token).map(|c| (token, c))
    });
    match selected {
        Some((token, command)) => command_help(&mut out, program, token, command),
        None => command_list(&mut out, program, commands),
    }

    out.push('\n');
    out
}

fn command_help(out: &mut String, program: &str, token: &str, command: &Command) {
    let mut usage = format!("Usage: {program} {token}");
    for item in command
        .params()
        .iter()
        .map(param_label)
        .chain(command.flags().iter().map(flag_usage))
    {
        usage.push(' ');
        usage.push_str(&item);
    }
    out.push_str(&usage);
    out.push('\n');

    if let Some(description) = command.description() {
        out.push('\n');
        out.push_str(description.trim_end());
        out.push('\n');
    }

    let rows: Vec<(String, String)> = command
        .params()
        .iter()
        .map(|p| (param_label(p), item_help(p.description(), p.default_value())))
        .collect();
    push_block(out, "Arguments", &rows);

    let rows: Vec<(String, String)> = command
        .flags()
        .iter()
        .map(|f| (flag_label(f), item_help(f.description(), f.default_value())))
        .collect();
    push_block(out, "Flags", &rows);
}

fn command_list(out: &mut String, program: &str, commands: &[Command]) {
    out.push_str(&format!("Usage: {program} <command> [args...] [flags...]\n"));

    let rows: Vec<(String, String)> = commands
        .iter()
        .map(|c| {
            let mut names: Vec<&str> = Vec::new();
            if !c.is_name_disabled() {
                names.push(c.name());
            }
            names.extend(c.aliases());
            (
                names.join(", "),
                c.description().unwrap_or_default().to_string(),
            )
        })
        .collect();
    push_block(out, "Commands", &rows);
}

fn param_label(param: &Param) -> String {
    if param.is_required() {
        format!("<{}>", param.name())
    } else {
        format!("[{}]", param.name())
    }
}

fn wrap(flag: &Flag, inner: &str) -> String {
    if flag.is_required() {
        format!("<{inner}>")
    } else {
        format!("[{inner}]")
    }
}

fn flag_usage(flag: &Flag) -> String {
    let mut item = flag.aliases().collect::<Vec<_>>().join("|");
    if flag.kind() == FlagKind::Value {
        item.push_str(" ...");
    }
    wrap(flag, &item)
}

fn flag_label(flag: &Flag) -> String {
    wrap(flag, &flag.aliases().collect::<Vec<_>>().join(", "))
}

fn item_help(description: Option<&str>, default: &Value) -> String {
    let mut out = description.unwrap_or_default().trim().to_string();
    if default.is_truthy() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(&format!("(default {default})"));
    }
    out
}

/// Labels are padded to the widest label of the block.
fn push_block(out: &mut String, title: &str, rows: &[(String, String)]) {
    if rows.is_empty() {
        return;
    }
    out.push_str(&format!("\n{title}:\n"));
    let width = rows
        .iter()
        .map(|(label, _)| label.chars().count())
        .max()
        .unwrap_or(0);
    for (label, help) in rows {
        let line = format!("  {label:<width$} {help}");
        out.push_str(line.trim_end());
        out.push('\n');
    }
}
