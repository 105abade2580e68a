//! Terminal command parsing.
//!
//! Plain text is a chat message; lines starting with `/` are commands.

use crate::{domain::TriggerZone, error::CommandError};

/// Contextual ping targets understood by every client.
pub const CONTEXTUAL_PING_TYPES: [&str; 5] = [
    "LOGO_BODY",
    "LOGO_META",
    "TEXT_DEFAULT",
    "TEXT_ERROR",
    "TEXT_META",
];

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Chat(String),
    Move { x: f64, y: f64 },
    Down { button: u8, ctrl: bool },
    Up,
    Zone(TriggerZone),
    Ping(u8),
    Context(String),
    Focus,
    Blur,
    Menu(bool),
    Scroll(f64),
    Who,
}

fn number(value: &str) -> Result<f64, CommandError> {
    value
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or_else(|| CommandError::InvalidNumber(value.to_string()))
}

pub fn parse(line: &str) -> Result<Command, CommandError> {
    let line = line.trim();
    let Some(rest) = line.strip_prefix('/') else {
        return Ok(Command::Chat(line.to_string()));
    };

    let mut parts = rest.split_whitespace();
    let name = parts.next().unwrap_or_default();
    let args: Vec<&str> = parts.collect();

    match (name, args.as_slice()) {
        ("move", [x, y]) => Ok(Command::Move {
            x: number(x)?,
            y: number(y)?,
        }),
        ("move", _) => Err(CommandError::Usage("/move X Y")),

        ("down", rest) => {
            let mut button = 0;
            let mut ctrl = false;
            for arg in rest {
                match *arg {
                    "left" => button = 0,
                    "middle" => button = 1,
                    "right" => button = 2,
                    "ctrl" => ctrl = true,
                    _ => return Err(CommandError::Usage("/down [left|middle|right] [ctrl]")),
                }
            }
            Ok(Command::Down { button, ctrl })
        }
        ("up", []) => Ok(Command::Up),
        ("up", _) => Err(CommandError::Usage("/up")),

        ("zone", [zone]) => zone
            .parse::<TriggerZone>()
            .map(Command::Zone)
            .map_err(|_| CommandError::Usage("/zone top|right|bottom|left")),
        ("zone", _) => Err(CommandError::Usage("/zone top|right|bottom|left")),

        ("ping", [index]) => {
            let index = index
                .parse::<u8>()
                .map_err(|_| CommandError::InvalidNumber(index.to_string()))?;
            if !(1..=3).contains(&index) {
                return Err(CommandError::PingIndexOutOfRange(index));
            }
            Ok(Command::Ping(index))
        }
        ("ping", _) => Err(CommandError::Usage("/ping 1|2|3")),

        ("context", [kind]) => {
            let kind = kind.to_ascii_uppercase();
            if !CONTEXTUAL_PING_TYPES.contains(&kind.as_str()) {
                return Err(CommandError::UnknownContextualPing(kind));
            }
            Ok(Command::Context(kind))
        }
        ("context", _) => Err(CommandError::Usage("/context TYPE")),

        ("focus", []) => Ok(Command::Focus),
        ("blur", []) => Ok(Command::Blur),

        ("menu", ["open"]) => Ok(Command::Menu(true)),
        ("menu", ["close"]) => Ok(Command::Menu(false)),
        ("menu", _) => Err(CommandError::Usage("/menu open|close")),

        ("scroll", [offset]) => Ok(Command::Scroll(number(offset)?.max(0.0))),
        ("scroll", _) => Err(CommandError::Usage("/scroll N")),

        ("who", []) => Ok(Command::Who),

        (other, _) => Err(CommandError::UnknownCommand(other.to_string())),
    }
}
