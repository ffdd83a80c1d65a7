//! Shell command grammar.
//!
//! ```text
//! add node <nid>...
//! add block <bid> <nid>... | *
//! rm node <nid>... | *
//! rm block <bid>...
//! ls [-l]
//! sync
//! quit
//! ```
//!
//! Tokens are separated by one or more spaces. Ids are unsigned decimal
//! numbers. Tokens after `ls [-l]`, `sync` and `quit` are ignored.

use crate::error::{CliError, CliResult};
use ledgerlink_core::{BlockId, NodeId};

/// Node selection for commands that accept `*`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// Every registered node.
    All,
    /// The listed nodes, in order.
    Nodes(Vec<NodeId>),
}

/// A parsed shell command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `add node <nid>...`
    AddNode(Vec<NodeId>),
    /// `add block <bid> <nid>... | *`
    AddBlock {
        /// Block to append.
        block: BlockId,
        /// Nodes receiving it.
        target: Target,
    },
    /// `rm node <nid>... | *`
    RemoveNode(Target),
    /// `rm block <bid>...`
    RemoveBlock(Vec<BlockId>),
    /// `ls [-l]`
    List {
        /// List each node's blocks too.
        long: bool,
    },
    /// `sync`
    Sync,
    /// `quit`
    Quit,
}

/// Parses one input line.
///
/// Returns `Ok(None)` for a blank line.
///
/// # Errors
///
/// Returns [`CliError::CommandNotFound`] for anything outside the grammar.
pub fn parse_line(line: &str) -> CliResult<Option<Command>> {
    let mut tokens = line
        .trim_end_matches(['\r', '\n'])
        .split(' ')
        .filter(|token| !token.is_empty());

    let Some(verb) = tokens.next() else {
        return Ok(None);
    };

    let command = match (verb, tokens.next()) {
        ("add", Some("node")) => Command::AddNode(non_empty(ids(tokens)?)?),
        ("add", Some("block")) => {
            let block = tokens.next().ok_or(CliError::CommandNotFound).and_then(id)?;
            Command::AddBlock {
                block,
                target: target(tokens)?,
            }
        }
        ("rm", Some("node")) => Command::RemoveNode(target(tokens)?),
        ("rm", Some("block")) => Command::RemoveBlock(non_empty(ids(tokens)?)?),
        ("ls", flag) => Command::List {
            long: flag == Some("-l"),
        },
        ("sync", _) => Command::Sync,
        ("quit", _) => Command::Quit,
        _ => return Err(CliError::CommandNotFound),
    };
    Ok(Some(command))
}

fn id(token: &str) -> CliResult<u32> {
    if !token.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CliError::CommandNotFound);
    }
    token.parse().map_err(|_| CliError::CommandNotFound)
}

fn ids<'a>(tokens: impl Iterator<Item = &'a str>) -> CliResult<Vec<u32>> {
    tokens.map(id).collect()
}

fn non_empty(ids: Vec<u32>) -> CliResult<Vec<u32>> {
    if ids.is_empty() {
        Err(CliError::CommandNotFound)
    } else {
        Ok(ids)
    }
}

/// A `*` anywhere in the list selects every node.
fn target<'a>(tokens: impl Iterator<Item = &'a str>) -> CliResult<Target> {
    let mut all = false;
    let mut nodes = Vec::new();
    for token in tokens {
        if token == "*" {
            all = true;
        } else {
            nodes.push(id(token)?);
        }
    }
    if all {
        Ok(Target::All)
    } else {
        non_empty(nodes).map(Target::Nodes)
    }
}
