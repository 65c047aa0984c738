//! Slash commands understood by the chat host.

/// One line of user input, parsed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Plain text for the assistant, as typed.
    Submit(String),
    /// `/products`
    Products,
    /// `/select [name]`, `None` clears the selection.
    Select(Option<String>),
    /// `/care [on|off]`, `None` flips the current mode.
    Care(Option<bool>),
    /// `/clear`
    Clear,
    /// `/log`
    Log,
    /// `/help`
    Help,
    /// `/quit` or `/exit`
    Quit,
    /// A slash command that isn't recognized, or has a bad argument.
    Unknown(String),
}

impl Command {
    /// Parses a line of input. Blank lines yield `None`.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim_end_matches(['\r', '\n']);
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return None;
        }
        if !trimmed.starts_with('/') {
            return Some(Self::Submit(line.to_owned()));
        }

        let (name, arg) = match trimmed.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (trimmed, ""),
        };
        let command = match name {
            "/products" => Self::Products,
            "/select" if arg.is_empty() || arg.eq_ignore_ascii_case("none") => {
                Self::Select(None)
            }
            "/select" => Self::Select(Some(arg.to_owned())),
            "/care" => match arg.to_ascii_lowercase().as_str() {
                "" => Self::Care(None),
                "on" => Self::Care(Some(true)),
                "off" => Self::Care(Some(false)),
                _ => Self::Unknown(trimmed.to_owned()),
            },
            "/clear" => Self::Clear,
            "/log" => Self::Log,
            "/help" => Self::Help,
            "/quit" | "/exit" => Self::Quit,
            _ => Self::Unknown(trimmed.to_owned()),
        };
        Some(command)
    }
}

/// Usage text for `/help`.
pub const HELP: &str = "\
/products        list the products on offer
/select <name>   pick a product to order (/select none clears it)
/care [on|off]   switch customer care mode
/clear           start a fresh order
/log             print the conversation log
/help            show this help
/quit            leave";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text() {
        assert_eq!(
            Command::parse("  a camera please \n"),
            Some(Command::Submit("  a camera please ".to_owned()))
        );
        assert_eq!(Command::parse(" \r\n"), None);
        assert_eq!(Command::parse(""), None);
    }

    #[test]
    fn test_select() {
        assert_eq!(
            Command::parse("/select  smart watch \n"),
            Some(Command::Select(Some("smart watch".to_owned())))
        );
        assert_eq!(Command::parse("/select"), Some(Command::Select(None)));
        assert_eq!(Command::parse("/select NONE"), Some(Command::Select(None)));
    }

    #[test]
    fn test_care() {
        assert_eq!(Command::parse("/care"), Some(Command::Care(None)));
        assert_eq!(Command::parse("/care On"), Some(Command::Care(Some(true))));
        assert_eq!(Command::parse("/care off"), Some(Command::Care(Some(false))));
        assert_eq!(
            Command::parse("/care maybe"),
            Some(Command::Unknown("/care maybe".to_owned()))
        );
    }

    #[test]
    fn test_other_commands() {
        assert_eq!(Command::parse("/products"), Some(Command::Products));
        assert_eq!(Command::parse("/clear"), Some(Command::Clear));
        assert_eq!(Command::parse("/log"), Some(Command::Log));
        assert_eq!(Command::parse("/help"), Some(Command::Help));
        assert_eq!(Command::parse("/exit"), Some(Command::Quit));
        assert_eq!(
            Command::parse("/order"),
            Some(Command::Unknown("/order".to_owned()))
        );
    }
}
