use crate::types::Message;
use async_trait::async_trait;
use serde_json::Value;
use tokio::time::Duration;

/// Seam between the dispatch engine and the model service, so tests can
/// script model turns without the network.
#[async_trait]
pub trait LlmClientTrait: Send + Sync {
    /// One model round trip with the action registry attached; the reply is
    /// either free text or a single function call.
    async fn chat_once(&self, messages: &[Message], functions: &Value) -> anyhow::Result<Message>;
    /// One model round trip with no functions offered, used for the final
    /// natural-language reply after an action result has been folded in.
    async fn chat_once_no_functions(&self, messages: &[Message]) -> anyhow::Result<Message>;
}

#[derive(Clone)]
pub struct LlmClient {
    base_url: String,
    api_key: String,
    model: String,
    http: reqwest::Client,
}

impl LlmClient {
    pub fn new(base_url: String, api_key: String, model: String) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .pool_idle_timeout(Duration::from_secs(30))
            .pool_max_idle_per_host(8)
            .tcp_keepalive(Duration::from_secs(30))
            .timeout(Duration::from_secs(60))
            .build()?;
        Ok(Self {
            base_url,
            api_key,
            model,
            http,
        })
    }

    async fn completion(&self, req: Value) -> anyhow::Result<Message> {
        let url = format!("{}/chat/completions", self.base_url);
        let resp = self
            .http
            .post(url)
            .bearer_auth(&self.api_key)
            .json(&req)
            .send()
            .await?;

        let response_json: Value = resp
            .json()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to parse model response: {}", e))?;

        if let Some(error) = response_json.get("error") {
            anyhow::bail!("Model API error: {}", error);
        }

        let message = response_json["choices"]
            .as_array()
            .and_then(|choices| choices.first())
            .map(|choice| choice["message"].clone())
            .ok_or_else(|| anyhow::anyhow!("No choices in model response"))?;

        serde_json::from_value(message)
            .map_err(|e| anyhow::anyhow!("Failed to parse assistant message: {}", e))
    }
}

#[async_trait]
impl LlmClientTrait for LlmClient {
    async fn chat_once(&self, messages: &[Message], functions: &Value) -> anyhow::Result<Message> {
        let req = serde_json::json!({
            "model": self.model,
            "messages": messages,
            "functions": functions,
        });
        self.completion(req).await
    }

    async fn chat_once_no_functions(&self, messages: &[Message]) -> anyhow::Result<Message> {
        let req = serde_json::json!({
            "model": self.model,
            "messages": messages,
        });
        self.completion(req).await
    }
}
