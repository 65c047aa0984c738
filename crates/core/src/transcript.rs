//! Conversation transcript types.

use std::fmt::{self, Display};

use chrono::{DateTime, Local, Timelike};
use order_bot_model::ModelMessage;

/// Number of synthetic greeting turns at the head of every transcript.
pub const SEED_TURNS: usize = 2;

const SEED_USER_TEXT: &str = "Hello";

/// Who wrote a turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    /// The person ordering.
    User,
    /// The order assistant.
    Assistant,
}

impl Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "User"),
            Role::Assistant => write!(f, "Assistant"),
        }
    }
}

/// One message in the conversation. Immutable once created.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Turn {
    role: Role,
    text: String,
    timestamp: DateTime<Local>,
}

impl Turn {
    #[inline]
    pub(crate) fn new<S: Into<String>>(role: Role, text: S) -> Self {
        Self {
            role,
            text: text.into(),
            timestamp: Local::now(),
        }
    }

    /// Returns the author of this turn.
    #[inline]
    pub fn role(&self) -> Role {
        self.role
    }

    /// Returns the text as it was stored, which for user turns includes any
    /// injected product context.
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns when this turn was created.
    #[inline]
    pub fn timestamp(&self) -> DateTime<Local> {
        self.timestamp
    }

    fn to_model_message(&self) -> ModelMessage {
        match self.role {
            Role::User => ModelMessage::User(self.text.clone()),
            Role::Assistant => ModelMessage::Assistant(self.text.clone()),
        }
    }
}

/// The append-only history of a session.
///
/// Insertion order is conversation order. The first [`SEED_TURNS`] turns
/// are the greeting exchange: they are replayed to the model but hidden
/// from the scrollback.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    /// The transcript a brand new session starts with.
    pub(crate) fn for_new_session() -> Self {
        let greeting = greeting_for_hour(Local::now().hour());
        Self::seeded(format!(
            "Hi! I’m your order assistant bot. {greeting} What would you like to order today?"
        ))
    }

    /// The transcript a session starts over with after a reset.
    pub(crate) fn for_reset() -> Self {
        Self::seeded(
            "Hi again! Let’s start a fresh order. What would you like to order today?",
        )
    }

    fn seeded<S: Into<String>>(assistant_greeting: S) -> Self {
        Self {
            turns: vec![
                Turn::new(Role::User, SEED_USER_TEXT),
                Turn::new(Role::Assistant, assistant_greeting),
            ],
        }
    }

    #[inline]
    pub(crate) fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    /// Returns every turn, seed pair included.
    #[inline]
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Returns the turns that belong in the scrollback, i.e. everything
    /// after the seed pair.
    #[inline]
    pub fn visible_turns(&self) -> &[Turn] {
        &self.turns[SEED_TURNS.min(self.turns.len())..]
    }

    /// Returns the total number of turns.
    #[inline]
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Returns `true` if there are no turns at all.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Returns the most recent turn.
    #[inline]
    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    pub(crate) fn to_model_messages(&self) -> Vec<ModelMessage> {
        self.turns.iter().map(Turn::to_model_message).collect()
    }
}

/// Picks the greeting for a local hour of day (0 to 23).
pub fn greeting_for_hour(hour: u32) -> &'static str {
    match hour {
        0..12 => "Good morning!",
        12..18 => "Good afternoon!",
        _ => "Good evening!",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_greeting_for_hour() {
        assert_eq!(greeting_for_hour(0), "Good morning!");
        assert_eq!(greeting_for_hour(11), "Good morning!");
        assert_eq!(greeting_for_hour(12), "Good afternoon!");
        assert_eq!(greeting_for_hour(17), "Good afternoon!");
        assert_eq!(greeting_for_hour(18), "Good evening!");
        assert_eq!(greeting_for_hour(23), "Good evening!");
    }

    #[test]
    fn test_new_session_seed() {
        let transcript = Transcript::for_new_session();
        assert_eq!(transcript.len(), SEED_TURNS);
        assert!(transcript.visible_turns().is_empty());

        let turns = transcript.turns();
        assert_eq!(turns[0].role(), Role::User);
        assert_eq!(turns[0].text(), "Hello");
        assert_eq!(turns[1].role(), Role::Assistant);
        assert!(turns[1].text().starts_with("Hi! I’m your order assistant bot. Good "));
        assert!(turns[1].text().ends_with(" What would you like to order today?"));
    }

    #[test]
    fn test_visible_turns_and_model_messages() {
        let mut transcript = Transcript::for_reset();
        transcript.push(Turn::new(Role::User, "A laptop please"));
        transcript.push(Turn::new(Role::Assistant, "Which color?"));

        let visible: Vec<_> =
            transcript.visible_turns().iter().map(Turn::text).collect();
        assert_eq!(visible, ["A laptop please", "Which color?"]);

        let messages = transcript.to_model_messages();
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0], ModelMessage::User("Hello".to_owned()));
        assert_eq!(
            messages[1],
            ModelMessage::Assistant(
                "Hi again! Let’s start a fresh order. What would you like to order today?"
                    .to_owned()
            )
        );
        assert_eq!(messages[3], ModelMessage::Assistant("Which color?".to_owned()));
    }

    #[test]
    fn test_role_display() {
        assert_eq!(Role::User.to_string(), "User");
        assert_eq!(Role::Assistant.to_string(), "Assistant");
    }
}
