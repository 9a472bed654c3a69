use crate::llm_client::LlmClientTrait;
use crate::types::{FunctionCall, Message};
use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::{Arc, Mutex};

/// Scripted stand-in for the model service: queued responses are returned in
/// order, and every call's message list is recorded for verification.
#[derive(Clone)]
pub struct MockLlmClient {
    responses: Arc<Mutex<Vec<Message>>>,
    call_history: Arc<Mutex<Vec<Vec<Message>>>>,
    failing: Arc<Mutex<bool>>,
}

impl MockLlmClient {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            call_history: Arc::new(Mutex::new(Vec::new())),
            failing: Arc::new(Mutex::new(false)),
        }
    }

    pub fn add_text_response(&self, content: &str) {
        self.responses.lock().unwrap().push(Message::Assistant {
            content: Some(content.to_string()),
            function_call: None,
        });
    }

    pub fn add_function_call_response(&self, name: &str, arguments: &str) {
        self.responses.lock().unwrap().push(Message::Assistant {
            content: None,
            function_call: Some(FunctionCall {
                name: name.to_string(),
                arguments: arguments.to_string(),
            }),
        });
    }

    /// Makes every subsequent call fail, simulating a model-service outage.
    pub fn set_failing(&self, failing: bool) {
        *self.failing.lock().unwrap() = failing;
    }

    pub fn get_call_history(&self) -> Vec<Vec<Message>> {
        self.call_history.lock().unwrap().clone()
    }

    fn pop_response(&self) -> Message {
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            Message::Assistant {
                content: Some("No more mock responses configured".to_string()),
                function_call: None,
            }
        } else {
            responses.remove(0)
        }
    }

    fn record(&self, messages: &[Message]) -> Result<()> {
        self.call_history.lock().unwrap().push(messages.to_vec());
        if *self.failing.lock().unwrap() {
            anyhow::bail!("mock model service unavailable");
        }
        Ok(())
    }
}

#[async_trait]
impl LlmClientTrait for MockLlmClient {
    async fn chat_once(&self, messages: &[Message], _functions: &Value) -> Result<Message> {
        self.record(messages)?;
        Ok(self.pop_response())
    }

    async fn chat_once_no_functions(&self, messages: &[Message]) -> Result<Message> {
        self.record(messages)?;
        Ok(self.pop_response())
    }
}
