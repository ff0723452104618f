//! Protocol module - line codec for the lobotomy wire format
//!
//! Every message is one UTF-8 line of space-separated tokens. The first token
//! names the command; the rest map positionally onto that command's schema:
//!
//! | command | fields |
//! |---|---|
//! | `welcome` | energy, heal, turn_duration (ms), turns_left |
//! | `begin` | turn_number, energy |
//! | `hit` | name, angle, charge |
//! | `detect` | name, energy, angle, distance |
//! | `death` | turns |
//! | `end` | - |
//!
//! Decoding is all-or-nothing: a message either parses completely or the call
//! returns a [`ParseError`]. Encoding outbound commands only guarantees framing.

use std::borrow::Cow;
use std::fmt;
use std::str::{FromStr, SplitWhitespace};

pub use crate::error::ParseError;
use crate::types::{Begin, Detection, Hit, Welcome};

/// Command tags understood by [`parse`].
pub const COMMANDS: [&str; 6] = ["welcome", "begin", "hit", "detect", "death", "end"];

/// A decoded server message.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Welcome(Welcome),
    Begin(Begin),
    Hit(Hit),
    Detect(Detection),
    Death { turns: i64 },
    End,
}

/// Typed value of a single message field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Str(&'a str),
    Int(i64),
    Float(f64),
}

impl Message {
    /// The command discriminator (`welcome`, `begin`, ...).
    pub fn command(&self) -> &'static str {
        match self {
            Message::Welcome(_) => "welcome",
            Message::Begin(_) => "begin",
            Message::Hit(_) => "hit",
            Message::Detect(_) => "detect",
            Message::Death { .. } => "death",
            Message::End => "end",
        }
    }

    /// Look a field up by its schema name.
    pub fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        let value = match (self, name) {
            (Message::Welcome(w), "energy") => FieldValue::Float(w.energy),
            (Message::Welcome(w), "heal") => FieldValue::Float(w.heal),
            (Message::Welcome(w), "turn_duration") => {
                FieldValue::Int(i64::try_from(w.turn_duration_ms).unwrap_or(i64::MAX))
            }
            (Message::Welcome(w), "turns_left") => FieldValue::Int(w.turns_left),
            (Message::Begin(b), "turn_number") => FieldValue::Int(b.turn_number),
            (Message::Begin(b), "energy") => FieldValue::Float(b.energy),
            (Message::Hit(h), "name") => FieldValue::Str(&h.name),
            (Message::Hit(h), "angle") => FieldValue::Float(h.angle),
            (Message::Hit(h), "charge") => FieldValue::Float(h.charge),
            (Message::Detect(d), "name") => FieldValue::Str(&d.name),
            (Message::Detect(d), "energy") => FieldValue::Float(d.energy),
            (Message::Detect(d), "angle") => FieldValue::Float(d.angle),
            (Message::Detect(d), "distance") => FieldValue::Float(d.distance),
            (Message::Death { turns }, "turns") => FieldValue::Int(*turns),
            _ => return None,
        };
        Some(value)
    }
}

/// Re-derives the wire line (without newline) from the parsed values.
impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Message::Welcome(w) => write!(
                f,
                "welcome {} {} {} {}",
                w.energy, w.heal, w.turn_duration_ms, w.turns_left
            ),
            Message::Begin(b) => write!(f, "begin {} {}", b.turn_number, b.energy),
            Message::Hit(h) => write!(f, "hit {} {} {}", h.name, h.angle, h.charge),
            Message::Detect(d) => write!(
                f,
                "detect {} {} {} {}",
                d.name, d.energy, d.angle, d.distance
            ),
            Message::Death { turns } => write!(f, "death {}", turns),
            Message::End => f.write_str("end"),
        }
    }
}

/// Positional field reader for one command's schema.
struct Fields<'a> {
    command: &'static str,
    tokens: SplitWhitespace<'a>,
}

impl<'a> Fields<'a> {
    fn next(&mut self, field: &'static str) -> Result<&'a str, ParseError> {
        self.tokens.next().ok_or(ParseError::MissingField {
            command: self.command,
            field,
        })
    }

    fn number<T: FromStr>(&mut self, field: &'static str) -> Result<T, ParseError> {
        let raw = self.next(field)?;
        raw.parse::<T>().map_err(|_| ParseError::InvalidField {
            command: self.command,
            field,
            value: raw.to_string(),
        })
    }

    fn string(&mut self, field: &'static str) -> Result<String, ParseError> {
        self.next(field).map(str::to_string)
    }

    fn finish(self) -> Result<(), ParseError> {
        match self.tokens.count() {
            0 => Ok(()),
            extra => Err(ParseError::TrailingFields {
                command: self.command,
                extra,
            }),
        }
    }
}

/// Parse one protocol line (terminator optional).
///
/// # Examples
///
/// ```
/// use lobotomy_client::protocol::{parse, Message};
///
/// let msg = parse("begin 4 50").unwrap();
/// assert_eq!(msg.command(), "begin");
/// assert!(matches!(msg, Message::Begin(b) if b.turn_number == 4 && b.energy == 50.0));
///
/// assert!(parse("").is_err());
/// assert!(parse("begin 4").is_err());
/// ```
pub fn parse(line: &str) -> Result<Message, ParseError> {
    let mut tokens = line.split_whitespace();
    let head = tokens.next().ok_or(ParseError::Empty)?;
    let command = COMMANDS
        .iter()
        .copied()
        .find(|c| *c == head)
        .ok_or_else(|| ParseError::UnknownCommand(head.to_string()))?;

    let mut fields = Fields { command, tokens };
    let msg = match command {
        "welcome" => Message::Welcome(Welcome {
            energy: fields.number("energy")?,
            heal: fields.number("heal")?,
            turn_duration_ms: fields.number("turn_duration")?,
            turns_left: fields.number("turns_left")?,
        }),
        "begin" => Message::Begin(Begin {
            turn_number: fields.number("turn_number")?,
            energy: fields.number("energy")?,
        }),
        "hit" => Message::Hit(Hit {
            name: fields.string("name")?,
            angle: fields.number("angle")?,
            charge: fields.number("charge")?,
        }),
        "detect" => Message::Detect(Detection {
            name: fields.string("name")?,
            energy: fields.number("energy")?,
            angle: fields.number("angle")?,
            distance: fields.number("distance")?,
        }),
        "death" => Message::Death {
            turns: fields.number("turns")?,
        },
        _ => Message::End,
    };
    fields.finish()?;
    Ok(msg)
}

/// Frame an outbound command: the text as given plus exactly one trailing `\n`.
///
/// The command is not validated.
pub fn encode(command: &str) -> Cow<'_, str> {
    if command.ends_with('\n') {
        Cow::Borrowed(command)
    } else {
        let mut line = String::with_capacity(command.len() + 1);
        line.push_str(command);
        line.push('\n');
        Cow::Owned(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_welcome() {
        let msg = parse("welcome 100 0.5 10 500").unwrap();
        assert_eq!(
            msg,
            Message::Welcome(Welcome {
                energy: 100.0,
                heal: 0.5,
                turn_duration_ms: 10,
                turns_left: 500,
            })
        );
        assert_eq!(msg.field("heal"), Some(FieldValue::Float(0.5)));
        assert_eq!(msg.field("turn_duration"), Some(FieldValue::Int(10)));
        assert_eq!(msg.field("name"), None);
    }

    #[test]
    fn test_parse_events() {
        let hit = parse("hit Henk_12 1.25 30").unwrap();
        assert_eq!(hit.command(), "hit");
        assert_eq!(hit.field("name"), Some(FieldValue::Str("Henk_12")));
        assert_eq!(hit.field("charge"), Some(FieldValue::Float(30.0)));

        let detect = parse("detect bob 42.5 3.1 17").unwrap();
        assert_eq!(
            detect,
            Message::Detect(Detection {
                name: "bob".to_string(),
                energy: 42.5,
                angle: 3.1,
                distance: 17.0,
            })
        );

        assert_eq!(parse("death 5").unwrap(), Message::Death { turns: 5 });
        assert_eq!(parse("end").unwrap(), Message::End);
    }

    #[test]
    fn test_parse_tolerates_extra_whitespace_and_terminators() {
        assert_eq!(
            parse("  begin   7\t12.5 \r\n").unwrap(),
            Message::Begin(Begin {
                turn_number: 7,
                energy: 12.5
            })
        );
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(parse(""), Err(ParseError::Empty));
        assert_eq!(parse("   \n"), Err(ParseError::Empty));
        assert_eq!(
            parse("ping 1"),
            Err(ParseError::UnknownCommand("ping".to_string()))
        );
        assert_eq!(
            parse("welcome 100 0.5 10"),
            Err(ParseError::MissingField {
                command: "welcome",
                field: "turns_left"
            })
        );
        assert_eq!(
            parse("begin four 10"),
            Err(ParseError::InvalidField {
                command: "begin",
                field: "turn_number",
                value: "four".to_string()
            })
        );
        assert_eq!(
            parse("welcome 100 0.5 -10 500"),
            Err(ParseError::InvalidField {
                command: "welcome",
                field: "turn_duration",
                value: "-10".to_string()
            })
        );
        assert_eq!(
            parse("end now please"),
            Err(ParseError::TrailingFields {
                command: "end",
                extra: 2
            })
        );
    }

    #[test]
    fn test_command_tag_is_case_sensitive() {
        assert_eq!(
            parse("BEGIN 1 1"),
            Err(ParseError::UnknownCommand("BEGIN".to_string()))
        );
    }

    #[test]
    fn test_welcome_values_survive_reencoding() {
        for line in [
            "welcome 100 0.5 10 500",
            "welcome 12.75 0 1000 1",
            "welcome 0.001 3.25 250 0",
        ] {
            let first = parse(line).unwrap();
            let second = parse(&first.to_string()).unwrap();
            assert_eq!(first, second, "line: {}", line);
        }
    }

    #[test]
    fn test_encode_appends_single_newline() {
        assert_eq!(encode("spawn"), "spawn\n");
        assert_eq!(encode("scan 3\n"), "scan 3\n");
        assert!(matches!(encode("scan 3\n"), Cow::Borrowed(_)));
        assert_eq!(encode(""), "\n");
    }
}
