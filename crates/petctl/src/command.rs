use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Write;
use std::os::unix::net::UnixStream;
use std::str::FromStr;
use strum::{Display as StrumDisplay, EnumIter, EnumString};
use thiserror::Error;

pub const SOCKET_PATH: &str = "/tmp/deskpet.sock";

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    EnumString,
    EnumIter,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    #[default]
    #[strum(to_string = "static")]
    Static,
    #[strum(to_string = "free-fly", serialize = "fly")]
    FreeFly,
    #[strum(to_string = "follow-cursor", serialize = "follow")]
    FollowCursor,
}

impl Mode {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Static => "Static",
            Self::FreeFly => "Free fly",
            Self::FollowCursor => "Follow cursor",
        }
    }

    /// Moving modes let pointer input fall through to whatever is underneath.
    pub fn passes_pointer_through(&self) -> bool {
        !matches!(self, Self::Static)
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    EnumString,
    EnumIter,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "kebab-case")]
pub enum SizePreset {
    #[strum(to_string = "small", serialize = "s")]
    Small,
    #[default]
    #[strum(to_string = "medium", serialize = "m")]
    Medium,
    #[strum(to_string = "large", serialize = "l")]
    Large,
}

impl SizePreset {
    pub fn scale(&self) -> f64 {
        match self {
            Self::Small => 0.7,
            Self::Medium => 1.0,
            Self::Large => 1.3,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Small => "Small",
            Self::Medium => "Medium (default)",
            Self::Large => "Large",
        }
    }

    pub fn from_scale(scale: f64) -> Option<Self> {
        use strum::IntoEnumIterator;
        Self::iter().find(|p| p.scale() == scale)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("empty command")]
    Empty,
    #[error("unknown command '{0}'")]
    Unknown(String),
    #[error("'{verb}' expects an argument")]
    MissingArgument { verb: String },
    #[error("invalid argument '{arg}' for '{verb}'")]
    InvalidArgument { verb: String, arg: String },
}

/// One line on the control socket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlCommand {
    Mode(Mode),
    Size(SizePreset),
    Quit,
}

impl fmt::Display for ControlCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mode(mode) => write!(f, "mode {}", mode),
            Self::Size(size) => write!(f, "size {}", size),
            Self::Quit => f.write_str("quit"),
        }
    }
}

impl FromStr for ControlCommand {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let verb = words.next().ok_or(CommandError::Empty)?.to_ascii_lowercase();
        let arg = words.next();

        fn parse_arg<T: FromStr>(verb: &str, arg: Option<&str>) -> Result<T, CommandError> {
            let arg = arg.ok_or_else(|| CommandError::MissingArgument {
                verb: verb.to_string(),
            })?;
            arg.parse().map_err(|_| CommandError::InvalidArgument {
                verb: verb.to_string(),
                arg: arg.to_string(),
            })
        }

        match verb.as_str() {
            "mode" => parse_arg(&verb, arg).map(Self::Mode),
            "size" => parse_arg(&verb, arg).map(Self::Size),
            "quit" | "exit" => Ok(Self::Quit),
            _ => Err(CommandError::Unknown(verb)),
        }
    }
}

pub fn send(command: &ControlCommand) -> std::io::Result<()> {
    let mut stream = UnixStream::connect(SOCKET_PATH)?;
    writeln!(stream, "{}", command)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_spellings() {
        let cases = vec![
            ("static", Mode::Static),
            ("STATIC", Mode::Static),
            ("free-fly", Mode::FreeFly),
            ("fly", Mode::FreeFly),
            ("Follow-Cursor", Mode::FollowCursor),
            ("follow", Mode::FollowCursor),
        ];

        for (input, expected) in cases {
            assert_eq!(input.parse::<Mode>().unwrap(), expected);
        }
    }

    #[test]
    fn test_mode_deserialization() {
        let mode: Mode = serde_json::from_str("\"follow-cursor\"").unwrap();
        assert_eq!(mode, Mode::FollowCursor);
    }

    #[test]
    fn test_size_preset_scales() {
        assert_eq!(SizePreset::from_scale(0.7), Some(SizePreset::Small));
        assert_eq!(SizePreset::from_scale(1.0), Some(SizePreset::Medium));
        assert_eq!(SizePreset::from_scale(1.3), Some(SizePreset::Large));
        assert_eq!(SizePreset::from_scale(2.0), None);
    }

    #[test]
    fn test_command_wire_format() {
        assert_eq!(ControlCommand::Mode(Mode::FreeFly).to_string(), "mode free-fly");
        assert_eq!(ControlCommand::Size(SizePreset::Small).to_string(), "size small");
        assert_eq!(ControlCommand::Quit.to_string(), "quit");

        assert_eq!(
            "  MODE follow \n".parse::<ControlCommand>(),
            Ok(ControlCommand::Mode(Mode::FollowCursor))
        );
        assert_eq!(
            "size large".parse::<ControlCommand>(),
            Ok(ControlCommand::Size(SizePreset::Large))
        );
    }

    #[test]
    fn test_command_errors() {
        assert_eq!("".parse::<ControlCommand>(), Err(CommandError::Empty));
        assert_eq!(
            "jump".parse::<ControlCommand>(),
            Err(CommandError::Unknown("jump".into()))
        );
        assert_eq!(
            "mode".parse::<ControlCommand>(),
            Err(CommandError::MissingArgument {
                verb: "mode".into()
            })
        );
        assert_eq!(
            "size huge".parse::<ControlCommand>(),
            Err(CommandError::InvalidArgument {
                verb: "size".into(),
                arg: "huge".into()
            })
        );
    }
}
