//! Conversation data model: messages, turns, and text rendering.

use serde::{Deserialize, Serialize};

/// A single message in a conversation.
///
/// The role is free-form text (e.g. `"human"`, `"ai"`); no enumeration is
/// enforced so that stored history never fails to decode over a role it has
/// not seen before.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Message content.
    pub text: String,
    /// Role of the sender in the conversation.
    pub role: String,
}

impl Message {
    /// Creates a new message with the given text and role.
    pub fn new(text: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            role: role.into(),
        }
    }
}

/// One human/AI exchange, the atomic unit of persisted history.
///
/// Immutable once created. Backends serialize the whole turn as an opaque
/// payload; nothing downstream mutates a stored turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageTurn {
    /// Message sent by the human.
    pub human_message: Message,
    /// Message produced by the AI.
    pub ai_message: Message,
    /// Conversation this turn belongs to.
    pub conversation_id: String,
}

impl MessageTurn {
    /// Creates a new turn for the given conversation.
    pub fn new(
        human_message: Message,
        ai_message: Message,
        conversation_id: impl Into<String>,
    ) -> Self {
        Self {
            human_message,
            ai_message,
            conversation_id: conversation_id.into(),
        }
    }

    /// Renders the turn as two `"role: text"` lines.
    pub fn render(&self) -> String {
        format!(
            "{}: {}\n{}: {}",
            self.human_message.role,
            self.human_message.text,
            self.ai_message.role,
            self.ai_message.text
        )
    }
}

/// Renders a window of turns oldest-to-newest, joined by newlines.
///
/// An empty window renders as the empty string.
pub fn render_history(turns: &[MessageTurn]) -> String {
    turns
        .iter()
        .map(MessageTurn::render)
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_turn_formats_role_and_text() {
        let turn = MessageTurn::new(
            Message::new("hi", "human"),
            Message::new("hello!", "ai"),
            "c1",
        );
        assert_eq!(turn.render(), "human: hi\nai: hello!");
    }

    #[test]
    fn render_history_joins_turns_with_newlines() {
        let turns = vec![
            MessageTurn::new(
                Message::new("hi", "human"),
                Message::new("hello!", "ai"),
                "c1",
            ),
            MessageTurn::new(
                Message::new("bye", "human"),
                Message::new("goodbye!", "ai"),
                "c1",
            ),
        ];
        assert_eq!(
            render_history(&turns),
            "human: hi\nai: hello!\nhuman: bye\nai: goodbye!"
        );
    }

    #[test]
    fn render_history_of_empty_window_is_empty_string() {
        assert_eq!(render_history(&[]), "");
    }

    #[test]
    fn turn_round_trips_through_json() {
        let turn = MessageTurn::new(
            Message::new("what is rust?", "human"),
            Message::new("a systems language", "ai"),
            "c1",
        );
        let json = serde_json::to_string(&turn).unwrap();
        let decoded: MessageTurn = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, turn);
    }

    #[test]
    fn roles_are_free_form() {
        let turn = MessageTurn::new(
            Message::new("ping", "operator"),
            Message::new("pong", "bot"),
            "c1",
        );
        assert_eq!(turn.render(), "operator: ping\nbot: pong");
    }
}
