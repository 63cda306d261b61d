//! Line commands typed into the terminal panel.

use std::str::FromStr;

use thiserror::Error;

/// Numeric controls that can be edited by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Brightness,
    Rate,
    Red,
    Green,
    Blue,
    Effect,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Edit a numeric control without sending.
    Set(Field, i64),
    /// Edit the power checkbox without sending.
    Power(bool),
    /// Send the whole panel to the torch.
    Send,
    /// Pick an effect and send right away.
    Effect(i64),
    Show,
    ListEffects,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("empty command")]
    Empty,
    #[error("unknown command: {0}")]
    Unknown(String),
    #[error("{0} needs a number")]
    MissingValue(String),
    #[error("not a number: {0}")]
    BadValue(String),
    #[error("unexpected input after command: {0}")]
    Trailing(String),
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Command, CommandError> {
        let mut words = line.split_whitespace();
        let name = words.next().ok_or(CommandError::Empty)?.to_ascii_lowercase();

        let field = match name.as_str() {
            "brightness" => Some(Field::Brightness),
            "rate" => Some(Field::Rate),
            "red" => Some(Field::Red),
            "green" => Some(Field::Green),
            "blue" => Some(Field::Blue),
            "effect" => Some(Field::Effect),
            _ => None,
        };

        let command = if let Some(field) = field {
            Command::Set(field, number(&name, words.next())?)
        } else {
            match name.as_str() {
                "fx" => Command::Effect(number(&name, words.next())?),
                "on" => Command::Power(true),
                "off" => Command::Power(false),
                "send" => Command::Send,
                "show" => Command::Show,
                "effects" => Command::ListEffects,
                "quit" | "exit" => Command::Quit,
                _ => return Err(CommandError::Unknown(name)),
            }
        };

        if let Some(extra) = words.next() {
            return Err(CommandError::Trailing(extra.to_string()));
        }
        Ok(command)
    }
}

fn number(name: &str, word: Option<&str>) -> Result<i64, CommandError> {
    let word = word.ok_or_else(|| CommandError::MissingValue(name.to_string()))?;
    word.parse()
        .map_err(|_| CommandError::BadValue(word.to_string()))
}
