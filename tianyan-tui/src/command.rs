#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Page(usize), // /page N, 1-based
    Open(usize), // /open N, 1-based card on the current page
    Home,        // /home
    Help,        // /help
    Quit,        // /quit or /exit
    Unknown(String),
}

/// Parse a typed `/command`. Anything not starting with `/` is `Unknown`.
pub fn parse_command(input: &str) -> Command {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return Command::Unknown(trimmed.to_string());
    }
    let mut parts = trimmed.splitn(2, char::is_whitespace);
    let verb = parts.next().unwrap_or_default();
    let rest = parts.next().map(str::trim).filter(|s| !s.is_empty());
    let ordinal = rest
        .and_then(|s| s.parse::<usize>().ok())
        .filter(|n| *n > 0);

    match (verb, ordinal) {
        ("/page", Some(n)) => Command::Page(n),
        ("/open", Some(n)) => Command::Open(n),
        ("/home", _) => Command::Home,
        ("/help", _) => Command::Help,
        ("/quit" | "/exit", _) => Command::Quit,
        _ => Command::Unknown(trimmed.to_string()),
    }
}
