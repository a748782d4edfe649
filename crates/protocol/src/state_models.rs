//! The run state passed between steps.

use crate::message_models::{Message, Role};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Conversation state of a single run.
///
/// Holds the ordered message sequence plus auxiliary keyed fields. The
/// message list is append-only: there is no operation that removes or
/// reorders a message, so insertion order is always conversation order.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct State {
    messages: Vec<Message>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    fields: BTreeMap<String, Value>,
}

impl State {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a state seeded with `messages`.
    pub fn from_messages(messages: Vec<Message>) -> Self {
        Self {
            messages,
            fields: BTreeMap::new(),
        }
    }

    /// Add a message to the end of the conversation.
    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Add several messages to the end of the conversation, in order.
    pub fn extend(&mut self, messages: impl IntoIterator<Item = Message>) {
        self.messages.extend(messages);
    }

    /// An immutable copy suitable for checkpointing.
    pub fn snapshot(&self) -> State {
        self.clone()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// The most recent AI-authored message, if any.
    pub fn last_ai_message(&self) -> Option<&Message> {
        self.messages.iter().rev().find(|m| m.role == Role::Ai)
    }

    /// The Tool-role message answering `tool_call_id`, if one was recorded.
    pub fn tool_result_for(&self, tool_call_id: &str) -> Option<&Message> {
        self.messages
            .iter()
            .find(|m| m.role == Role::Tool && m.tool_call_id.as_deref() == Some(tool_call_id))
    }

    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Set an auxiliary field, returning the previous value.
    pub fn set_field(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(key.into(), value.into())
    }

    pub fn fields(&self) -> &BTreeMap<String, Value> {
        &self.fields
    }
}
