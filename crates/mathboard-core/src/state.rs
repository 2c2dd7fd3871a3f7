//! UI-agnostic message types
//!
//! These are shared by every front-end and don't depend on any specific UI
//! framework. A message's sender decides which payloads it can carry.

use crate::reply::ParsedReply;
use serde::{Deserialize, Serialize};

/// Who sent a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sender {
    User,
    Ai,
}

/// One entry in a session's message log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "body", rename_all = "snake_case")]
pub enum Message {
    /// What the user typed
    User(String),
    /// A plain chat reply, rendered with inline math
    AiText(String),
    /// A tutor reply split into whiteboard steps and an explanation
    AiStructured(ParsedReply),
}

impl Message {
    pub fn sender(&self) -> Sender {
        match self {
            Message::User(_) => Sender::User,
            Message::AiText(_) | Message::AiStructured(_) => Sender::Ai,
        }
    }

    /// The prose part of the message: user text, chat reply, or explanation.
    pub fn text(&self) -> &str {
        match self {
            Message::User(text) | Message::AiText(text) => text,
            Message::AiStructured(reply) => &reply.explanation,
        }
    }

    pub fn math_steps(&self) -> &[String] {
        match self {
            Message::AiStructured(reply) => &reply.math_steps,
            _ => &[],
        }
    }
}
