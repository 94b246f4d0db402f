use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Author of a chat turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
}

impl ChatTurn {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HistoryError {
    #[error("no chat turn at index {0}")]
    OutOfRange(usize),
    #[error("chat turn {0} is not an assistant turn")]
    NotAssistant(usize),
}

/// Ordered chat turns of one session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChatHistory {
    turns: Vec<ChatTurn>,
}

impl ChatHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.turns.push(ChatTurn::new(Role::User, content));
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.turns.push(ChatTurn::new(Role::Assistant, content));
    }

    /// Append an empty assistant turn and return its index, to be filled once
    /// the answer has been revealed.
    pub fn push_placeholder(&mut self) -> usize {
        self.push_assistant(String::new());
        self.turns.len() - 1
    }

    pub fn fill(&mut self, index: usize, content: impl Into<String>) -> Result<(), HistoryError> {
        let turn = self
            .turns
            .get_mut(index)
            .ok_or(HistoryError::OutOfRange(index))?;
        if turn.role != Role::Assistant {
            return Err(HistoryError::NotAssistant(index));
        }
        turn.content = content.into();
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ChatTurn> {
        self.turns.iter()
    }

    pub fn last(&self) -> Option<&ChatTurn> {
        self.turns.last()
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }

    /// Drop every turn from `len` on
    pub fn truncate(&mut self, len: usize) {
        self.turns.truncate(len);
    }
}

impl<'a> IntoIterator for &'a ChatHistory {
    type Item = &'a ChatTurn;
    type IntoIter = std::slice::Iter<'a, ChatTurn>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
