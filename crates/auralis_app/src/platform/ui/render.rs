use auralis_core::{ChatViewModel, DisplayClass, MessageView, Phase, Sender};

const DIM: &str = "\x1b[2m";
const CYAN: &str = "\x1b[36m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// One unit of terminal output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalCommand {
    /// Phase or activity note, printed immediately.
    Status(String),
    /// Transcript line. Paced lines wait the configured delay first.
    Line { text: String, paced: bool },
}

/// Tracks how much of the history has been printed.
///
/// The history present when the conversation first becomes visible is replayed
/// without delay; everything appended later is paced.
#[derive(Debug, Default)]
pub struct Transcript {
    rendered: usize,
    replayed: bool,
    last_status: Option<(Phase, bool)>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(&mut self, view: &ChatViewModel) -> Vec<TerminalCommand> {
        let mut cmds = Vec::new();

        let status_key = (view.phase, view.ask_in_flight);
        if self.last_status != Some(status_key) {
            self.last_status = Some(status_key);
            if let Some(text) = status_text(view) {
                cmds.push(TerminalCommand::Status(text));
            }
        }

        if matches!(view.phase, Phase::Uninitialized | Phase::Loading) {
            return cmds;
        }

        if view.messages.len() < self.rendered {
            self.rendered = 0;
        }
        let paced = self.replayed;
        for message in &view.messages[self.rendered..] {
            cmds.push(TerminalCommand::Line {
                text: format_message(message, view.dark_mode),
                paced,
            });
        }
        self.rendered = view.messages.len();
        self.replayed = true;
        cmds
    }
}

fn status_text(view: &ChatViewModel) -> Option<String> {
    let text = match view.phase {
        Phase::Uninitialized => return None,
        Phase::Loading => "Loading conversation...".to_string(),
        Phase::Processing => format!("Working on {}", view.current_url),
        Phase::Ready if view.ask_in_flight => match view.queued_queries {
            0 => "Waiting for an answer...".to_string(),
            n => format!("Waiting for an answer ({n} queued)..."),
        },
        Phase::Ready => format!(
            "Ready ({} page{} processed). Type a question, /pick N, /open URL, /reprocess, /close or /quit.",
            view.processed_url_count,
            if view.processed_url_count == 1 { "" } else { "s" }
        ),
        Phase::Stalled => "This page has not been processed. /reprocess to try again.".to_string(),
        Phase::Closed => "Closed.".to_string(),
    };
    Some(text)
}

pub fn format_message(message: &MessageView, dark_mode: bool) -> String {
    let text = match (message.sender, message.is_suggestion) {
        (_, true) => format!("  [{}] {}", message.index, message.text),
        (Sender::User, _) => format!("you> {}", message.text),
        (Sender::Assistant, _) => format!("ai> {}", message.text),
        (Sender::System, _) => format!("-- {}", message.text),
    };
    if !dark_mode {
        return text;
    }
    let color = match (message.display_class, message.is_suggestion) {
        (_, true) => CYAN,
        (DisplayClass::User, _) => BOLD,
        (DisplayClass::Ai, _) if message.sender == Sender::System => DIM,
        (DisplayClass::Ai, _) => "",
    };
    if color.is_empty() {
        text
    } else {
        format!("{color}{text}{RESET}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn view_with(phase: Phase, texts: &[(Sender, &str, bool)]) -> ChatViewModel {
        ChatViewModel {
            phase,
            messages: texts
                .iter()
                .enumerate()
                .map(|(index, (sender, text, is_suggestion))| MessageView {
                    index,
                    sender: *sender,
                    text: text.to_string(),
                    display_class: if *sender == Sender::User {
                        DisplayClass::User
                    } else {
                        DisplayClass::Ai
                    },
                    is_suggestion: *is_suggestion,
                })
                .collect(),
            ..ChatViewModel::default()
        }
    }

    fn lines(cmds: &[TerminalCommand]) -> Vec<(String, bool)> {
        cmds.iter()
            .filter_map(|cmd| match cmd {
                TerminalCommand::Line { text, paced } => Some((text.clone(), *paced)),
                TerminalCommand::Status(_) => None,
            })
            .collect()
    }

    #[test]
    fn restored_history_replays_unpaced_then_new_lines_are_paced() {
        let mut transcript = Transcript::new();
        assert!(lines(&transcript.render(&view_with(Phase::Loading, &[]))).is_empty());

        let restored = [(Sender::User, "hi", false), (Sender::Assistant, "hello", false)];
        let first = transcript.render(&view_with(Phase::Ready, &restored));
        assert_eq!(
            lines(&first),
            vec![("you> hi".to_string(), false), ("ai> hello".to_string(), false)]
        );

        let grown = [
            restored[0],
            restored[1],
            (Sender::Assistant, "Why?", true),
        ];
        let second = transcript.render(&view_with(Phase::Ready, &grown));
        assert_eq!(lines(&second), vec![("  [2] Why?".to_string(), true)]);
    }

    #[test]
    fn status_only_on_change() {
        let mut transcript = Transcript::new();
        let view = view_with(Phase::Stalled, &[]);
        assert_eq!(transcript.render(&view).len(), 1);
        assert!(transcript.render(&view).is_empty());
    }

    #[test]
    fn dark_mode_colors_suggestions() {
        let message = MessageView {
            index: 4,
            sender: Sender::Assistant,
            text: "Next?".to_string(),
            display_class: DisplayClass::Ai,
            is_suggestion: true,
        };
        assert_eq!(format_message(&message, false), "  [4] Next?");
        assert_eq!(format_message(&message, true), "\x1b[36m  [4] Next?\x1b[0m");
    }
}
