use sweeper_core::{Coord, Coord2, SettingsForm};
use thiserror::Error;

#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Reveal(Coord2),
    Flag(Coord2),
    NewRound,
    Configure(SettingsForm),
    Show,
    Help,
    Quit,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("Empty command")]
    Empty,
    #[error("Unknown command {0:?}, try `help`")]
    Unknown(String),
    #[error("Missing {0}")]
    MissingArgument(&'static str),
    #[error("Unexpected argument {0:?}")]
    TrailingArgument(String),
    #[error("Invalid {what} {value:?}")]
    InvalidCoord { what: &'static str, value: String },
}

pub const HELP: &str = "\
l ROW COL            reveal a cell
r ROW COL            flag a cell, or chord a revealed number
n                    new round with the same settings
c ROWS COLS RATIO    change board size and mine ratio (percent)
s                    show the board
h                    this help
q                    quit";

impl Command {
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let mut words = line.split_whitespace();
        let name = words.next().ok_or(CommandError::Empty)?;

        let command = match name.to_ascii_lowercase().as_str() {
            "l" | "reveal" => Self::Reveal(parse_pos(&mut words)?),
            "r" | "flag" => Self::Flag(parse_pos(&mut words)?),
            "n" | "new" => Self::NewRound,
            // fields stay raw text, the settings form reports what is wrong with them
            "c" | "config" => Self::Configure(SettingsForm::new(
                next_arg(&mut words, "rows")?,
                next_arg(&mut words, "columns")?,
                next_arg(&mut words, "mine ratio")?,
            )),
            "s" | "show" => Self::Show,
            "h" | "help" | "?" => Self::Help,
            "q" | "quit" | "exit" => Self::Quit,
            _ => return Err(CommandError::Unknown(name.to_owned())),
        };

        match words.next() {
            Some(extra) => Err(CommandError::TrailingArgument(extra.to_owned())),
            None => Ok(command),
        }
    }
}

fn next_arg<'a>(
    words: &mut impl Iterator<Item = &'a str>,
    what: &'static str,
) -> Result<&'a str, CommandError> {
    words.next().ok_or(CommandError::MissingArgument(what))
}

fn parse_coord<'a>(
    words: &mut impl Iterator<Item = &'a str>,
    what: &'static str,
) -> Result<Coord, CommandError> {
    let value = next_arg(words, what)?;
    value.parse().map_err(|_| CommandError::InvalidCoord {
        what,
        value: value.to_owned(),
    })
}

fn parse_pos<'a>(words: &mut impl Iterator<Item = &'a str>) -> Result<Coord2, CommandError> {
    Ok((parse_coord(words, "row")?, parse_coord(words, "column")?))
}
