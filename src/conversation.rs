use serde::Serialize;
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub content: String,
}

impl ConversationTurn {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Append-only dialogue, always opened by exactly one system turn.
///
/// Unbounded by default. With a cap, the oldest non-system turns are
/// evicted first; the system turn is never dropped.
#[derive(Debug, Clone)]
pub struct ConversationHistory {
    system: ConversationTurn,
    turns: VecDeque<ConversationTurn>,
    max_turns: Option<usize>,
}

impl ConversationHistory {
    pub fn new(persona: impl Into<String>) -> Self {
        Self {
            system: ConversationTurn::system(persona),
            turns: VecDeque::new(),
            max_turns: None,
        }
    }

    /// History that keeps the system turn plus the `max_turns` most recent.
    pub fn with_cap(persona: impl Into<String>, max_turns: usize) -> Self {
        Self {
            max_turns: Some(max_turns),
            ..Self::new(persona)
        }
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.push(ConversationTurn::user(content));
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.push(ConversationTurn::assistant(content));
    }

    fn push(&mut self, turn: ConversationTurn) {
        self.turns.push_back(turn);
        if let Some(max) = self.max_turns {
            while self.turns.len() > max {
                self.turns.pop_front();
            }
        }
    }

    pub fn system_turn(&self) -> &ConversationTurn {
        &self.system
    }

    /// All turns in order, system turn first.
    pub fn turns(&self) -> impl Iterator<Item = &ConversationTurn> {
        std::iter::once(&self.system).chain(self.turns.iter())
    }

    pub fn last(&self) -> &ConversationTurn {
        self.turns.back().unwrap_or(&self.system)
    }

    /// Number of turns after the system turn.
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Drop everything but the system turn.
    pub fn reset(&mut self) {
        self.turns.clear();
    }

    /// Context summary for debugging
    pub fn summary(&self) -> String {
        match self.max_turns {
            Some(max) => format!("History: {} turns (cap {})", self.len(), max),
            None => format!("History: {} turns", self.len()),
        }
    }
}

impl Serialize for ConversationHistory {
    /// Serializes as the chat `messages` array.
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.turns())
    }
}
