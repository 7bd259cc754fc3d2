//! Prompt line parsing.

use anyhow::{anyhow, bail, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Submit(String),
    NewChat,
    ListSessions,
    Open(usize),
    Rename { position: usize, title: String },
    Delete(usize),
    Show(usize),
    Help,
    Quit,
}

/// Lines starting with `/` are commands; everything else is a query.
pub fn parse_line(line: &str) -> Result<Command> {
    let trimmed = line.trim();
    let Some(rest) = trimmed.strip_prefix('/') else {
        return Ok(Command::Submit(line.to_string()));
    };

    let (name, args) = match rest.split_once(char::is_whitespace) {
        Some((name, args)) => (name, args.trim()),
        None => (rest, ""),
    };

    match name {
        "new" => Ok(Command::NewChat),
        "sessions" | "ls" => Ok(Command::ListSessions),
        "open" => Ok(Command::Open(position(args)?)),
        "rename" => {
            let (n, title) = args
                .split_once(char::is_whitespace)
                .ok_or_else(|| anyhow!("usage: /rename <n> <title>"))?;
            Ok(Command::Rename {
                position: position(n)?,
                title: title.trim().to_string(),
            })
        }
        "delete" | "rm" => Ok(Command::Delete(position(args)?)),
        "show" => Ok(Command::Show(position(args)?)),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" | "q" => Ok(Command::Quit),
        other => bail!("unknown command '/{other}', try /help"),
    }
}

fn position(arg: &str) -> Result<usize> {
    match arg.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => bail!("expected a position starting at 1, got '{arg}'"),
    }
}

#[cfg(test)]
#[path = "tests/commands_tests.rs"]
mod tests;
