//! Per-view session state: the message log, the input box, and whether a
//! request is in flight.
//!
//! A session never talks to the network itself. `submit` hands back the text
//! to post and `complete` takes the outcome, so the front-end decides how the
//! request runs and the state machine stays testable on its own.

use crate::mode::ViewMode;
use crate::reply::{parse_reply, ParsedReply};
use crate::state::{Message, Sender};

pub const WELCOME_MESSAGE: &str = "Hello! I am your AI tutor. Ask me a math question!";
pub const CONNECTION_ERROR: &str = "Error: Unable to connect to the server.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Sending,
}

#[derive(Debug, Clone)]
pub struct Session {
    mode: ViewMode,
    messages: Vec<Message>,
    input: String,
    cursor: usize, // character index into input
    state: SessionState,
}

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

impl Session {
    pub fn new(mode: ViewMode) -> Self {
        let messages = match mode {
            ViewMode::Tutor => vec![Message::AiStructured(ParsedReply::explanation_only(WELCOME_MESSAGE))],
            ViewMode::Chat => Vec::new(),
        };
        Self {
            mode,
            messages,
            input: String::new(),
            cursor: 0,
            state: SessionState::Idle,
        }
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_sending(&self) -> bool {
        self.state == SessionState::Sending
    }

    /// The most recent AI message, shown on the whiteboard.
    pub fn last_ai(&self) -> Option<&Message> {
        self.messages.iter().rev().find(|m| m.sender() == Sender::Ai)
    }

    // Input editing

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn set_input(&mut self, text: &str) {
        self.input = text.to_string();
        self.cursor = self.input.chars().count();
    }

    pub fn insert_char(&mut self, c: char) {
        let byte_pos = char_to_byte_index(&self.input, self.cursor);
        self.input.insert(byte_pos, c);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let byte_pos = char_to_byte_index(&self.input, self.cursor);
            self.input.remove(byte_pos);
        }
    }

    pub fn delete(&mut self) {
        if self.cursor < self.input.chars().count() {
            let byte_pos = char_to_byte_index(&self.input, self.cursor);
            self.input.remove(byte_pos);
        }
    }

    pub fn cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn cursor_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.input.chars().count());
    }

    pub fn cursor_home(&mut self) {
        self.cursor = 0;
    }

    pub fn cursor_end(&mut self) {
        self.cursor = self.input.chars().count();
    }

    // Request lifecycle

    /// Accept the current input as a question.
    ///
    /// Returns the text to post, or `None` if a request is already in flight
    /// or the input is blank. On success the user message is logged, the
    /// input is cleared and the session enters `Sending`.
    pub fn submit(&mut self) -> Option<String> {
        if self.is_sending() || self.input.trim().is_empty() {
            return None;
        }

        let text = std::mem::take(&mut self.input);
        self.cursor = 0;
        self.messages.push(Message::User(text.clone()));
        self.state = SessionState::Sending;
        Some(text)
    }

    /// Record the outcome of the in-flight request.
    ///
    /// Appends exactly one AI message and returns to `Idle`. Any error is
    /// shown as the same fixed connection message. Outcomes that arrive while
    /// idle are ignored.
    pub fn complete<E>(&mut self, outcome: Result<String, E>) {
        if !self.is_sending() {
            return;
        }

        let message = match (self.mode, outcome) {
            (ViewMode::Tutor, Ok(raw)) => Message::AiStructured(parse_reply(&raw)),
            (ViewMode::Chat, Ok(raw)) => Message::AiText(raw),
            (ViewMode::Tutor, Err(_)) => {
                Message::AiStructured(ParsedReply::explanation_only(CONNECTION_ERROR))
            }
            (ViewMode::Chat, Err(_)) => Message::AiText(CONNECTION_ERROR.to_string()),
        };
        self.messages.push(message);
        self.state = SessionState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(mode: ViewMode, text: &str) -> Session {
        let mut session = Session::new(mode);
        session.set_input(text);
        session
    }

    #[test]
    fn test_tutor_starts_with_welcome() {
        let session = Session::new(ViewMode::Tutor);
        assert_eq!(session.messages().len(), 1);
        assert_eq!(session.last_ai().map(|m| m.text()), Some(WELCOME_MESSAGE));
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[test]
    fn test_chat_starts_empty() {
        let session = Session::new(ViewMode::Chat);
        assert!(session.messages().is_empty());
        assert!(session.last_ai().is_none());
    }

    #[test]
    fn test_blank_input_is_ignored() {
        let mut session = typed(ViewMode::Chat, "   \t ");
        assert_eq!(session.submit(), None);
        assert!(session.messages().is_empty());
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(session.input(), "   \t ");
    }

    #[test]
    fn test_submit_logs_user_message_and_clears_input() {
        let mut session = typed(ViewMode::Chat, " what is 2+2? ");
        assert_eq!(session.submit().as_deref(), Some(" what is 2+2? "));
        assert_eq!(session.messages(), [Message::User(" what is 2+2? ".into())]);
        assert_eq!(session.input(), "");
        assert_eq!(session.cursor(), 0);
        assert!(session.is_sending());
    }

    #[test]
    fn test_no_overlapping_submissions() {
        let mut session = typed(ViewMode::Chat, "first");
        assert!(session.submit().is_some());
        session.set_input("second");
        assert_eq!(session.submit(), None);
        assert_eq!(session.messages().len(), 1);
        assert_eq!(session.input(), "second");
    }

    #[test]
    fn test_tutor_reply_is_parsed() {
        let mut session = typed(ViewMode::Tutor, "add 2/3 and 1");
        session.submit();
        session.complete::<()>(Ok(
            "MATH:\n1. 2/3 + 1\n2. 5/3\n---\nEXPLANATION: Add the fractions.".to_string(),
        ));

        assert_eq!(session.state(), SessionState::Idle);
        let last = session.last_ai().unwrap();
        assert_eq!(last.math_steps(), ["2/3 + 1".to_string(), "5/3".to_string()]);
        assert_eq!(last.text(), "Add the fractions.");
    }

    #[test]
    fn test_chat_reply_is_verbatim() {
        let mut session = typed(ViewMode::Chat, "hi");
        session.submit();
        session.complete::<()>(Ok("MATH:\n1. x\n---\ny".to_string()));
        assert_eq!(
            session.messages().last(),
            Some(&Message::AiText("MATH:\n1. x\n---\ny".to_string()))
        );
    }

    #[test]
    fn test_failure_appends_one_error_message() {
        for mode in ViewMode::all() {
            let mut session = typed(mode, "question");
            let before = session.messages().len();
            session.submit();
            session.complete::<&str>(Err("connection refused"));

            assert_eq!(session.messages().len(), before + 2);
            let last = session.messages().last().unwrap();
            assert_eq!(last.sender(), Sender::Ai);
            assert_eq!(last.text(), CONNECTION_ERROR);
            assert!(last.math_steps().is_empty());
            assert!(!session.is_sending());
        }
    }

    #[test]
    fn test_session_usable_after_failure() {
        let mut session = typed(ViewMode::Chat, "one");
        session.submit();
        session.complete::<&str>(Err("timeout"));
        session.set_input("two");
        assert_eq!(session.submit().as_deref(), Some("two"));
    }

    #[test]
    fn test_complete_while_idle_is_ignored() {
        let mut session = Session::new(ViewMode::Chat);
        session.complete::<()>(Ok("stray".to_string()));
        assert!(session.messages().is_empty());
    }

    #[test]
    fn test_input_editing_is_utf8_safe() {
        let mut session = Session::new(ViewMode::Tutor);
        for c in "x²=4".chars() {
            session.insert_char(c);
        }
        session.cursor_left();
        session.cursor_left();
        session.backspace();
        assert_eq!(session.input(), "x=4");
        session.cursor_home();
        session.delete();
        assert_eq!(session.input(), "=4");
        session.cursor_end();
        session.insert_char('!');
        assert_eq!(session.input(), "=4!");
        session.cursor_right();
        assert_eq!(session.cursor(), 3);
    }
}
