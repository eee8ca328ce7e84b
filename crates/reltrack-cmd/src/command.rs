//! Protocol commands and the reader that parses them.

use std::fmt;
use std::io::BufRead;

use reltrack::Name;

use crate::error::{CommandError, CommandResult};
use crate::token::Tokenizer;

/// One protocol command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `addent <entity>`
    AddEntity(Name),
    /// `delent <entity>`
    RemoveEntity(Name),
    /// `addrel <source> <destination> <relation>`
    AddRelation {
        source: Name,
        destination: Name,
        relation: Name,
    },
    /// `delrel <source> <destination> <relation>`
    RemoveRelation {
        source: Name,
        destination: Name,
        relation: Name,
    },
    /// `report`
    Report,
    /// `end`
    End,
}

impl Command {
    /// The protocol keyword.
    #[must_use]
    pub const fn keyword(&self) -> &'static str {
        match self {
            Self::AddEntity(_) => "addent",
            Self::RemoveEntity(_) => "delent",
            Self::AddRelation { .. } => "addrel",
            Self::RemoveRelation { .. } => "delrel",
            Self::Report => "report",
            Self::End => "end",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())?;
        match self {
            Self::AddEntity(name) | Self::RemoveEntity(name) => write!(f, " {name}"),
            Self::AddRelation {
                source,
                destination,
                relation,
            }
            | Self::RemoveRelation {
                source,
                destination,
                relation,
            } => write!(f, " {source} {destination} {relation}"),
            Self::Report | Self::End => Ok(()),
        }
    }
}

/// Reads [`Command`]s off a token stream.
pub struct CommandReader<R> {
    tokens: Tokenizer<R>,
}

impl<R: BufRead> CommandReader<R> {
    /// Wrap a buffered reader.
    pub fn new(reader: R) -> Self {
        Self {
            tokens: Tokenizer::new(reader),
        }
    }

    /// Read the next command. `Ok(None)` at end of input.
    pub fn next_command(&mut self) -> CommandResult<Option<Command>> {
        let Some(keyword) = self.tokens.next_token()? else {
            return Ok(None);
        };

        let command = match keyword.as_bytes() {
            b"addent" => Command::AddEntity(self.argument("addent", 1)?),
            b"delent" => Command::RemoveEntity(self.argument("delent", 1)?),
            b"addrel" => Command::AddRelation {
                source: self.argument("addrel", 1)?,
                destination: self.argument("addrel", 2)?,
                relation: self.argument("addrel", 3)?,
            },
            b"delrel" => Command::RemoveRelation {
                source: self.argument("delrel", 1)?,
                destination: self.argument("delrel", 2)?,
                relation: self.argument("delrel", 3)?,
            },
            b"report" => Command::Report,
            b"end" => Command::End,
            _ => {
                return Err(CommandError::UnknownCommand {
                    keyword: keyword.to_string(),
                    line: self.tokens.line(),
                });
            }
        };
        Ok(Some(command))
    }

    /// Line on which the most recent token started.
    #[must_use]
    pub const fn line(&self) -> usize {
        self.tokens.line()
    }

    fn argument(&mut self, command: &'static str, position: usize) -> CommandResult<Name> {
        self.tokens
            .next_token()?
            .ok_or(CommandError::MissingArgument {
                command,
                position,
                line: self.tokens.line(),
            })
    }
}

impl<R: BufRead> Iterator for CommandReader<R> {
    type Item = CommandResult<Command>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_command().transpose()
    }
}

/// Parse exactly one command from a string.
///
/// Trailing input after the command is ignored.
///
/// # Errors
///
/// Returns `CommandError` if the string holds no command or a malformed one.
pub fn parse_command(input: &str) -> CommandResult<Command> {
    CommandReader::new(input.as_bytes())
        .next_command()?
        .ok_or(CommandError::Empty)
}
