/// What a line typed into the popup asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Query(String),
    Pick(usize),
    Open(String),
    Reprocess,
    Close,
    Quit,
    Help,
    /// Unrecognized slash command or bad argument, with a hint to print.
    Invalid(String),
}

pub const HELP: &str = "\
Type a question and press enter.
  /pick N      resubmit the suggestion numbered N
  /open URL    navigate the tab to URL
  /reprocess   retry processing the current page
  /close       close the tab and forget its conversation
  /quit        close the popup, keep the conversation";

pub fn parse_command(line: &str) -> Command {
    let line = line.trim();
    let Some(rest) = line.strip_prefix('/') else {
        return Command::Query(line.to_string());
    };

    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (rest, ""),
    };

    match name {
        "pick" => match arg.parse::<usize>() {
            Ok(index) => Command::Pick(index),
            Err(_) => Command::Invalid("usage: /pick N".to_string()),
        },
        "open" if !arg.is_empty() => Command::Open(arg.to_string()),
        "open" => Command::Invalid("usage: /open URL".to_string()),
        "reprocess" => Command::Reprocess,
        "close" => Command::Close,
        "quit" | "exit" => Command::Quit,
        "help" | "?" => Command::Help,
        other => Command::Invalid(format!("unknown command /{other}; try /help")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn plain_text_is_a_query() {
        assert_eq!(
            parse_command("  what is this page about? \n"),
            Command::Query("what is this page about?".to_string())
        );
        assert_eq!(parse_command(""), Command::Query(String::new()));
    }

    #[test]
    fn slash_commands() {
        assert_eq!(parse_command("/pick 3"), Command::Pick(3));
        assert_eq!(
            parse_command("/open   https://b.example/ "),
            Command::Open("https://b.example/".to_string())
        );
        assert_eq!(parse_command("/reprocess"), Command::Reprocess);
        assert_eq!(parse_command("/close"), Command::Close);
        assert_eq!(parse_command("/exit"), Command::Quit);
    }

    #[test]
    fn bad_arguments_are_reported() {
        assert!(matches!(parse_command("/pick two"), Command::Invalid(_)));
        assert!(matches!(parse_command("/open"), Command::Invalid(_)));
        assert!(matches!(parse_command("/frobnicate"), Command::Invalid(_)));
    }
}
