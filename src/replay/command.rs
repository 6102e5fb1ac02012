use std::fmt;

/// One line of a replay script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Push(String),
    Replace(String),
    Go(isize),
    Back,
    Forward,
    /// Hardware back press, delivered through the back handler stack.
    PressBack,
    /// Print the current snapshot.
    State,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    Unknown(String),
    MissingArgument(&'static str),
    BadNumber(String),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::Unknown(cmd) => write!(f, "unknown command: {cmd}"),
            CommandError::MissingArgument(cmd) => write!(f, "{cmd} needs an argument"),
            CommandError::BadNumber(arg) => write!(f, "not a step count: {arg}"),
        }
    }
}

impl std::error::Error for CommandError {}

/// Parse a script line. Blank lines and `#` comments give `None`.
pub fn parse_line(line: &str) -> Result<Option<Command>, CommandError> {
    let line = match line.find('#') {
        // A `#` starting a word begins a comment; inside a path it's a hash.
        Some(i) if i == 0 || line[..i].ends_with(char::is_whitespace) => &line[..i],
        _ => line,
    };
    let mut words = line.split_whitespace();
    let Some(name) = words.next() else {
        return Ok(None);
    };
    let arg = words.next();

    let command = match name {
        "push" => Command::Push(arg.ok_or(CommandError::MissingArgument("push"))?.to_string()),
        "replace" => Command::Replace(
            arg.ok_or(CommandError::MissingArgument("replace"))?
                .to_string(),
        ),
        "go" => {
            let arg = arg.ok_or(CommandError::MissingArgument("go"))?;
            Command::Go(
                arg.parse()
                    .map_err(|_| CommandError::BadNumber(arg.to_string()))?,
            )
        }
        "back" => Command::Back,
        "forward" => Command::Forward,
        "press-back" => Command::PressBack,
        "state" => Command::State,
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(Some(command))
}
