use thiserror::Error;

/// A `:` command typed in the status line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Next,
    Prev,
    Goto(String),
    Section(String),
    Save,
    Review,
    Submit,
    Help,
    Quit,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CommandError {
    #[error("Unknown command: {0}")]
    Unknown(String),

    #[error("Command '{0}' needs an argument")]
    MissingArgument(&'static str),
}

pub fn parse_command(input: &str) -> Result<Command, CommandError> {
    let mut parts = input.trim().splitn(2, char::is_whitespace);
    let cmd = parts.next().unwrap_or("");
    let arg = parts.next().map(str::trim).filter(|a| !a.is_empty());

    match cmd {
        "next" | "n" => Ok(Command::Next),
        "prev" | "previous" | "p" | "back" => Ok(Command::Prev),
        "goto" | "g" => arg
            .map(|a| Command::Goto(a.to_string()))
            .ok_or(CommandError::MissingArgument("goto")),
        "section" | "sec" => arg
            .map(|a| Command::Section(a.to_string()))
            .ok_or(CommandError::MissingArgument("section")),
        "save" | "w" => Ok(Command::Save),
        "review" => Ok(Command::Review),
        "submit" => Ok(Command::Submit),
        "help" | "h" | "?" => Ok(Command::Help),
        "q" | "quit" | "exit" => Ok(Command::Quit),
        "" => Err(CommandError::Unknown("empty command".to_string())),
        other => Err(CommandError::Unknown(other.to_string())),
    }
}
