//! Line command parsing
//!
//! ```text
//! ADD <id> <classification> [description...]
//! WAIT <seconds>
//! REPORT
//! DEMO
//! HELP
//! EXIT
//! ```
//!
//! Command words are case-insensitive; arguments are taken verbatim.

use std::str::FromStr;

use super::ConsoleError;

pub const HELP_TEXT: &str = "\
Commands:
  ADD <id> <classification> [description...]   classification: High | Low | FalseAlarm
  WAIT <seconds>                                advance the simulated clock and sweep
  REPORT                                        sweep, then print all buckets
  DEMO                                          replay the reference scenario
  HELP                                          show this text
  EXIT                                          leave the console";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add {
        mission_id: String,
        classification: String,
        description: String,
    },
    Wait {
        seconds: u32,
    },
    Report,
    Demo,
    Help,
    Exit,
}

/// Split off the first whitespace-delimited token.
fn next_token<'a>(rest: &mut &'a str) -> Option<&'a str> {
    let trimmed = rest.trim_start();
    if trimmed.is_empty() {
        *rest = trimmed;
        return None;
    }
    let end = trimmed.find(char::is_whitespace).unwrap_or(trimmed.len());
    let (token, tail) = trimmed.split_at(end);
    *rest = tail;
    Some(token)
}

impl FromStr for Command {
    type Err = ConsoleError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut rest = line;
        let word = next_token(&mut rest).ok_or(ConsoleError::EmptyLine)?;

        match word.to_ascii_uppercase().as_str() {
            "ADD" => {
                let mission_id = next_token(&mut rest).ok_or(ConsoleError::MissingArgument {
                    command: "ADD",
                    argument: "id",
                })?;
                let classification =
                    next_token(&mut rest).ok_or(ConsoleError::MissingArgument {
                        command: "ADD",
                        argument: "classification",
                    })?;
                Ok(Self::Add {
                    mission_id: mission_id.to_string(),
                    classification: classification.to_string(),
                    description: rest.trim().to_string(),
                })
            }
            "WAIT" => {
                let raw = next_token(&mut rest).ok_or(ConsoleError::MissingArgument {
                    command: "WAIT",
                    argument: "seconds",
                })?;
                let seconds = raw
                    .parse::<u32>()
                    .map_err(|_| ConsoleError::InvalidNumber(raw.to_string()))?;
                Ok(Self::Wait { seconds })
            }
            "REPORT" => Ok(Self::Report),
            "DEMO" => Ok(Self::Demo),
            "HELP" => Ok(Self::Help),
            "EXIT" | "QUIT" => Ok(Self::Exit),
            _ => Err(ConsoleError::UnknownCommand(word.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_keeps_description_spacing() {
        let cmd: Command = "add M123 High  suspicious   package ".parse().unwrap();
        assert_eq!(
            cmd,
            Command::Add {
                mission_id: "M123".to_string(),
                classification: "High".to_string(),
                description: "suspicious   package".to_string(),
            }
        );
    }

    #[test]
    fn add_without_description() {
        let cmd: Command = "ADD M1 Low".parse().unwrap();
        assert!(matches!(cmd, Command::Add { ref description, .. } if description.is_empty()));
    }

    #[test]
    fn add_requires_id_and_classification() {
        assert_eq!(
            "ADD".parse::<Command>(),
            Err(ConsoleError::MissingArgument { command: "ADD", argument: "id" })
        );
        assert_eq!(
            "ADD M1".parse::<Command>(),
            Err(ConsoleError::MissingArgument { command: "ADD", argument: "classification" })
        );
    }

    #[test]
    fn wait_parses_seconds() {
        assert_eq!("wait 65".parse::<Command>(), Ok(Command::Wait { seconds: 65 }));
        assert_eq!(
            "WAIT -3".parse::<Command>(),
            Err(ConsoleError::InvalidNumber("-3".to_string()))
        );
        assert_eq!(
            "WAIT soon".parse::<Command>(),
            Err(ConsoleError::InvalidNumber("soon".to_string()))
        );
    }

    #[test]
    fn simple_commands_and_errors() {
        assert_eq!("Report".parse::<Command>(), Ok(Command::Report));
        assert_eq!("demo".parse::<Command>(), Ok(Command::Demo));
        assert_eq!("help".parse::<Command>(), Ok(Command::Help));
        assert_eq!("quit".parse::<Command>(), Ok(Command::Exit));
        assert_eq!("   ".parse::<Command>(), Err(ConsoleError::EmptyLine));
        assert_eq!(
            "LAUNCH".parse::<Command>(),
            Err(ConsoleError::UnknownCommand("LAUNCH".to_string()))
        );
    }
}
