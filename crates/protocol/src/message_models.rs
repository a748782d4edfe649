//! Chat-style message records.
//!
//! Messages are the unit of state payload. A run's conversation is an
//! ordered list of them; the executor never reorders or removes one.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// The author of a message.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Instructions or markers injected by the graph itself.
    System,

    /// Input supplied by a person, usually through a resume value.
    Human,

    /// Output of a model-like step. May carry tool-call requests.
    Ai,

    /// The answer to a single tool call.
    Tool,
}

/// A request, attached to an AI message, to run a named tool.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ToolCall {
    /// Unique identifier of this call.
    ///
    /// The Tool-role message answering this call carries the same id.
    pub id: String,

    /// Name of the tool to run.
    pub name: String,

    /// Arguments passed to the tool.
    #[serde(default)]
    pub args: Map<String, Value>,
}

impl ToolCall {
    /// Create a call to `name` with a freshly generated id and no arguments.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().simple().to_string(),
            name: name.into(),
            args: Map::new(),
        }
    }

    /// Replace the generated id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Add a single argument.
    pub fn with_arg(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.args.insert(key.into(), value.into());
        self
    }
}

/// A single message in the conversation.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Message {
    /// Who authored the message.
    pub role: Role,

    /// Text content. May be empty for AI messages that only request tools.
    pub content: String,

    /// Tool calls requested by an AI message, in execution order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCall>,

    /// For Tool-role messages, the id of the call being answered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl Message {
    fn plain(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            tool_calls: Vec::new(),
            tool_call_id: None,
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::plain(Role::System, content)
    }

    pub fn human(content: impl Into<String>) -> Self {
        Self::plain(Role::Human, content)
    }

    pub fn ai(content: impl Into<String>) -> Self {
        Self::plain(Role::Ai, content)
    }

    /// Create an AI message requesting the given tool calls.
    pub fn ai_with_tool_calls(content: impl Into<String>, tool_calls: Vec<ToolCall>) -> Self {
        Self {
            tool_calls,
            ..Self::plain(Role::Ai, content)
        }
    }

    /// Create the answer to the tool call with id `tool_call_id`.
    pub fn tool(content: impl Into<String>, tool_call_id: impl Into<String>) -> Self {
        Self {
            tool_call_id: Some(tool_call_id.into()),
            ..Self::plain(Role::Tool, content)
        }
    }

    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }
}
