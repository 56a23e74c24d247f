//! Translation of typed lines into player intents.

use gate_explorer_core::{CheatCode, Direction, UnknownCheatCode};

/// Something the player asked for on one input line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Intent {
    Move(Direction),
    Interact,
    Dial(String),
    Cheat(CheatCode),
    Reset,
    Status,
    Export,
    Import(String),
    Help,
    Quit,
}

/// Reasons a line could not be understood.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub(crate) enum InputError {
    #[error("unknown command `{0}`; type `help` for a list")]
    Unknown(String),
    #[error("`{0}` needs an argument")]
    MissingArgument(&'static str),
    #[error(transparent)]
    Cheat(#[from] UnknownCheatCode),
}

/// Text printed by the `help` command.
pub(crate) const HELP: &str = "\
w/a/s/d          move north/west/south/east
e                inspect the tile under you
dial <n|id>      dial a gate address (by list number or id) from the gate
cheat <code>     debug codes: advance, powercell
status           show the full frame
export           print a transfer code for this session
import <code>    replace this session with a transfer code
reset            start a new mission
quit             leave (the session is saved)";

/// Parses one line; blank lines yield `None`.
pub(crate) fn parse(line: &str) -> Result<Option<Intent>, InputError> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let intent = match word.to_ascii_lowercase().as_str() {
        "" => return Ok(None),
        "w" | "north" => Intent::Move(Direction::North),
        "a" | "west" => Intent::Move(Direction::West),
        "s" | "south" => Intent::Move(Direction::South),
        "d" | "east" => Intent::Move(Direction::East),
        "e" | "inspect" => Intent::Interact,
        "dial" | "travel" => Intent::Dial(argument("dial", rest)?.to_owned()),
        "cheat" | "debug" => Intent::Cheat(argument("cheat", rest)?.parse()?),
        "reset" => Intent::Reset,
        "status" | "look" => Intent::Status,
        "export" => Intent::Export,
        "import" => Intent::Import(argument("import", rest)?.to_owned()),
        "help" | "?" => Intent::Help,
        "quit" | "exit" | "q" => Intent::Quit,
        other => return Err(InputError::Unknown(other.to_owned())),
    };
    Ok(Some(intent))
}

fn argument<'a>(command: &'static str, rest: &'a str) -> Result<&'a str, InputError> {
    if rest.is_empty() {
        Err(InputError::MissingArgument(command))
    } else {
        Ok(rest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn movement_keys_map_to_directions() {
        assert_eq!(parse("w"), Ok(Some(Intent::Move(Direction::North))));
        assert_eq!(parse(" A "), Ok(Some(Intent::Move(Direction::West))));
        assert_eq!(parse("s"), Ok(Some(Intent::Move(Direction::South))));
        assert_eq!(parse("east"), Ok(Some(Intent::Move(Direction::East))));
    }

    #[test]
    fn blank_lines_are_ignored() {
        assert_eq!(parse("   "), Ok(None));
    }

    #[test]
    fn dial_keeps_its_argument() {
        assert_eq!(parse("dial 2"), Ok(Some(Intent::Dial("2".to_owned()))));
        assert_eq!(
            parse("dial   abydos "),
            Ok(Some(Intent::Dial("abydos".to_owned())))
        );
        assert_eq!(parse("dial"), Err(InputError::MissingArgument("dial")));
    }

    #[test]
    fn cheat_codes_are_parsed() {
        assert_eq!(
            parse("cheat zpm"),
            Ok(Some(Intent::Cheat(CheatCode::GrantPowerCell)))
        );
        assert_eq!(
            parse("cheat fly"),
            Err(InputError::Cheat(UnknownCheatCode("fly".to_owned())))
        );
    }

    #[test]
    fn unknown_words_are_reported() {
        assert_eq!(parse("jump"), Err(InputError::Unknown("jump".to_owned())));
    }
}
