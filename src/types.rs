use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One function invocation requested by the model. `arguments` is the raw
/// JSON string exactly as the API returns it; it is parsed into a typed
/// `ActionCall` before anything is executed.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct FunctionCall {
    pub name: String,
    pub arguments: String, // raw JSON string
}

/// Conversation message, tagged by role on the wire so the same type both
/// round-trips through the chat-completions API and constrains which fields
/// a given role may carry.
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum Message {
    System {
        content: String,
    },
    User {
        content: String,
    },
    Assistant {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        content: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        function_call: Option<FunctionCall>,
    },
    /// Result of an executed action; must immediately follow the assistant
    /// message whose `function_call` produced it.
    Function {
        name: String,
        content: String,
    },
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Message::System {
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Message::User {
            content: content.into(),
        }
    }

    pub fn function_result(name: impl Into<String>, content: impl Into<String>) -> Self {
        Message::Function {
            name: name.into(),
            content: content.into(),
        }
    }
}

/// Inbound chat operation payload.
#[derive(Deserialize, Clone, Debug)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub user_email: Option<String>,
    #[serde(default)]
    pub history: Option<Vec<Message>>,
}

/// Outbound chat operation payload: the final reply plus the ordered list of
/// action names executed this turn (zero or one).
#[derive(Serialize, Clone, Debug, Default)]
pub struct ChatResponse {
    pub response: String,
    pub functions_called: Vec<String>,
}

/// Remote event-type record; only the fields the resolver and the model
/// care about. Unknown remote fields are ignored on deserialize.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct EventType {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub length: i64,
}

/// One bookable start time. Ephemeral; computed per request, never stored.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Slot {
    pub time: String,
    #[serde(default)]
    pub attendees: Vec<Value>,
    #[serde(rename = "bookingId", default)]
    pub booking_id: Option<Value>,
}

/// Per-user projection of a remote booking, as shown in listings.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct CalEvent {
    pub id: String,
    pub title: String,
    pub start_time: String,
    pub end_time: String,
    pub status: String,
}
