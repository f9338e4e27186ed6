//! Serial console command parsing
//!
//! Splits a byte stream into lines, then each line into a command name and
//! a comma separated argument list:
//!
//! ```text
//! reg_w 0x01=0x20, 0x02= 0x15
//! ^^^^^ ^^^^^^^^^^ ^^^^^^^^^^
//! name  arg 0      arg 1 (spaces dropped)
//! ```
//!
//! Quoted arguments keep their spaces: `wifi "my wifi",12345678`.

use log::trace;
use serde::Serialize;

use crate::tokenizer::{Tokenizer, TokenizerError};

/// Default line buffer size
pub const DEFAULT_LINE_CAPACITY: usize = 256;
/// Default command name buffer size
pub const DEFAULT_NAME_CAPACITY: usize = 64;
/// Default argument buffer size
pub const DEFAULT_ARG_CAPACITY: usize = 256;

/// A parsed console command
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Command {
    /// Command name (first space separated word)
    pub name: String,
    /// Arguments in order of appearance
    pub args: Vec<String>,
}

impl Command {
    /// Serialize for structured output
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Line, name and argument tokenizers chained together
pub struct CommandParser {
    line: Tokenizer<Box<[u8]>>,
    name: Tokenizer<Box<[u8]>>,
    args: Tokenizer<Box<[u8]>>,
}

impl CommandParser {
    /// Create a parser with the default buffer sizes
    pub fn new() -> Result<Self, TokenizerError> {
        Self::with_capacities(
            DEFAULT_LINE_CAPACITY,
            DEFAULT_NAME_CAPACITY,
            DEFAULT_ARG_CAPACITY,
        )
    }

    /// Create a parser with explicit buffer sizes
    pub fn with_capacities(line: usize, name: usize, args: usize) -> Result<Self, TokenizerError> {
        let line = Tokenizer::acquire(line)?;

        let mut name = Tokenizer::acquire(name)?;
        name.set_delimiter(b' ');
        name.set_ignore(None);

        let mut args = Tokenizer::acquire(args)?;
        args.set_delimiter(b',');
        args.set_ignore(b' ');

        Ok(Self { line, name, args })
    }

    /// Push one received byte. Returns a command when it completes a
    /// non-empty line.
    pub fn push(&mut self, byte: u8) -> Option<Command> {
        if self.line.feed_line(byte).is_complete() {
            self.dispatch()
        } else {
            None
        }
    }

    /// Parse a trailing line that was not newline terminated
    pub fn finish(&mut self) -> Option<Command> {
        if self.line.finish() > 0 {
            self.dispatch()
        } else {
            None
        }
    }

    /// Parse a whole buffer, including an unterminated last line
    pub fn parse(&mut self, input: &[u8]) -> Vec<Command> {
        let mut commands: Vec<Command> = input.iter().filter_map(|&b| self.push(b)).collect();
        commands.extend(self.finish());
        commands
    }

    /// Split the completed line held by the line tokenizer
    fn dispatch(&mut self) -> Option<Command> {
        let Self { line, name, args } = self;
        let text = line.token();

        let mut rest_start = None;
        for (i, &byte) in text.iter().enumerate() {
            if name.feed(byte).is_complete() {
                rest_start = Some(i + 1);
                break;
            }
        }
        let rest = match rest_start {
            Some(start) => &text[start..],
            None => {
                name.finish();
                &[][..]
            }
        };

        if name.token().is_empty() {
            trace!("skipping blank command line");
            args.reset();
            return None;
        }
        let command_name = String::from_utf8_lossy(name.token()).into_owned();

        let mut arguments = Vec::new();
        for &byte in rest {
            if args.feed(byte).is_complete() {
                arguments.push(String::from_utf8_lossy(args.token()).into_owned());
            }
        }
        if args.finish() > 0 {
            arguments.push(String::from_utf8_lossy(args.token()).into_owned());
        }

        trace!(
            "parsed command '{}' with {} arguments",
            command_name,
            arguments.len()
        );

        Some(Command {
            name: command_name,
            args: arguments,
        })
    }
}
