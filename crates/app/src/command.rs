//! Console command parsing

use anyhow::{bail, Context, Result};
use booth_core::BoothId;

/// How many rows dashboard lists show when no count is given
pub const DEFAULT_LIST_LEN: usize = 5;

/// One line typed at the console prompt
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    List,
    Show(BoothId),
    Register {
        id: BoothId,
        name: String,
        description: String,
    },
    Approve(BoothId),
    Reject(BoothId),
    Pending,
    Stats,
    Top(usize),
    Recent(usize),
    Views,
    Occupancy,
    Resolve(String),
    Schedule,
    Help,
    Quit,
}

pub const HELP: &str = "\
Commands:
  list                                  all booths
  show <id>                             one booth
  register <id> <name> [| <description>] claim an empty booth
  approve <id> / reject <id>            moderate a pending booth
  pending                               booths awaiting review
  stats                                 dashboard figures
  top [n] / recent [n]                  popularity ranking / latest submissions
  views                                 named booths ranked by views
  occupancy                             registered vs. empty booths
  resolve <address>                     look up a booth by address
  schedule                              event dates and address window
  help / quit";

/// Parse a console line; blank lines yield `None`
pub fn parse(line: &str) -> Result<Option<Command>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let command = match verb.to_ascii_lowercase().as_str() {
        "list" | "ls" => Command::List,
        "show" => Command::Show(parse_id(rest)?),
        "register" => parse_register(rest)?,
        "approve" => Command::Approve(parse_id(rest)?),
        "reject" => Command::Reject(parse_id(rest)?),
        "pending" => Command::Pending,
        "stats" => Command::Stats,
        "top" => Command::Top(parse_count(rest)?),
        "recent" => Command::Recent(parse_count(rest)?),
        "views" => Command::Views,
        "occupancy" => Command::Occupancy,
        "resolve" => {
            if rest.is_empty() {
                bail!("usage: resolve <address>");
            }
            Command::Resolve(rest.to_string())
        }
        "schedule" => Command::Schedule,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => bail!("unknown command '{}', try 'help'", other),
    };

    Ok(Some(command))
}

fn parse_id(arg: &str) -> Result<BoothId> {
    arg.parse()
        .with_context(|| format!("expected a booth id, got '{}'", arg))
}

fn parse_count(arg: &str) -> Result<usize> {
    if arg.is_empty() {
        return Ok(DEFAULT_LIST_LEN);
    }
    arg.parse()
        .with_context(|| format!("expected a count, got '{}'", arg))
}

fn parse_register(rest: &str) -> Result<Command> {
    let Some((id, tail)) = rest.split_once(char::is_whitespace) else {
        bail!("usage: register <id> <name> [| <description>]");
    };

    let (name, description) = match tail.split_once('|') {
        Some((name, description)) => (name.trim(), description.trim()),
        None => (tail.trim(), ""),
    };

    Ok(Command::Register {
        id: parse_id(id)?,
        name: name.to_string(),
        description: description.to_string(),
    })
}
