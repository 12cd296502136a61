use thiserror::Error;
use ubl_core::Msg;

/// One console line, parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Refresh,
    Reload,
    Status,
    Check(String),
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command `{0}` (try: refresh, reload, status, check <name>, quit)")]
    Unknown(String),
    #[error("usage: check <name>")]
    MissingName,
}

/// Blank lines parse to `None`. Command words are case-insensitive.
pub fn parse_command(line: &str) -> Result<Option<Command>, CommandError> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "" => return Ok(None),
        "refresh" | "update" => Command::Refresh,
        "reload" => Command::Reload,
        "status" => Command::Status,
        "check" if rest.is_empty() => return Err(CommandError::MissingName),
        "check" => Command::Check(rest.to_string()),
        "quit" | "exit" => Command::Quit,
        _ => return Err(CommandError::Unknown(word.to_string())),
    };
    Ok(Some(command))
}

impl Command {
    /// The core message for commands that change state; queries return `None`.
    pub fn to_msg(&self) -> Option<Msg> {
        match self {
            Command::Refresh => Some(Msg::RefreshRequested),
            Command::Reload => Some(Msg::ReloadRequested),
            Command::Quit => Some(Msg::ShutdownRequested),
            Command::Status | Command::Check(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_commands() {
        assert_eq!(parse_command("refresh"), Ok(Some(Command::Refresh)));
        assert_eq!(parse_command("  UPDATE \n"), Ok(Some(Command::Refresh)));
        assert_eq!(parse_command("reload"), Ok(Some(Command::Reload)));
        assert_eq!(parse_command("status"), Ok(Some(Command::Status)));
        assert_eq!(parse_command("quit"), Ok(Some(Command::Quit)));
        assert_eq!(parse_command("exit"), Ok(Some(Command::Quit)));
    }

    #[test]
    fn check_takes_the_rest_of_the_line() {
        assert_eq!(
            parse_command("check  Griefer99 "),
            Ok(Some(Command::Check("Griefer99".to_string())))
        );
        assert_eq!(parse_command("check"), Err(CommandError::MissingName));
        assert_eq!(parse_command("check   "), Err(CommandError::MissingName));
    }

    #[test]
    fn blank_and_unknown_lines() {
        assert_eq!(parse_command(""), Ok(None));
        assert_eq!(parse_command("   \r\n"), Ok(None));
        assert_eq!(
            parse_command("ban alice"),
            Err(CommandError::Unknown("ban".to_string()))
        );
    }

    #[test]
    fn only_state_changing_commands_map_to_messages() {
        assert_eq!(Command::Refresh.to_msg(), Some(Msg::RefreshRequested));
        assert_eq!(Command::Reload.to_msg(), Some(Msg::ReloadRequested));
        assert_eq!(Command::Quit.to_msg(), Some(Msg::ShutdownRequested));
        assert_eq!(Command::Status.to_msg(), None);
        assert_eq!(Command::Check("x".into()).to_msg(), None);
    }
}
