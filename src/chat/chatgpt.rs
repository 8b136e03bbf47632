use super::response::null_as_default;
use super::{Completer, CompletionError, Response};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use ureq::Agent;

/// Chat completions endpoint.
pub const API_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Role attached to the outgoing message when none is configured.
pub const DEFAULT_ROLE: &str = "user";

/// Timeout for a whole completion round trip.
const HTTP_TIMEOUT: Duration = Duration::from_secs(120);

/// Maximum accepted response body size (10 MB).
const MAX_RESPONSE_SIZE: u64 = 10 * 1024 * 1024;

/// Request payload
#[derive(Debug, Serialize)]
struct RequestBody<'a> {
    model: &'a str,
    store: bool,
    messages: Vec<Message>,
}

/// A message in the conversation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Message {
    #[serde(deserialize_with = "null_as_default")]
    pub role: String,
    #[serde(deserialize_with = "null_as_default")]
    pub content: String,
    pub refusal: Option<String>,
}

/// Completion backend speaking the chat completions API.
///
/// # Examples
///
/// ```no_run
/// use diffprompt::chat::{ChatGpt, Completer};
///
/// let completer = ChatGpt::new("sk-...").with_model("gpt-4o");
/// let reply = completer.complete("Say hello").unwrap();
/// ```
#[derive(Clone)]
pub struct ChatGpt {
    api_key: String,
    model: String,
    role: String,
    store: bool,
    endpoint: String,
    agent: Agent,
}

impl ChatGpt {
    /// Create a completer with the default model, role and endpoint
    pub fn new(api_key: impl Into<String>) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(HTTP_TIMEOUT))
            .build()
            .into();

        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            role: DEFAULT_ROLE.to_string(),
            store: false,
            endpoint: API_URL.to_string(),
            agent,
        }
    }

    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    #[must_use]
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = role.into();
        self
    }

    /// Ask the backend to store the completion
    #[must_use]
    pub fn with_store(mut self, store: bool) -> Self {
        self.store = store;
        self
    }

    /// Send requests somewhere other than [`API_URL`]
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    fn request_body(&self, message: &str) -> Result<String, CompletionError> {
        let model = if self.model.is_empty() {
            DEFAULT_MODEL
        } else {
            &self.model
        };
        let role = if self.role.is_empty() {
            DEFAULT_ROLE
        } else {
            &self.role
        };

        let body = RequestBody {
            model,
            store: self.store,
            messages: vec![Message {
                role: role.to_string(),
                content: message.to_string(),
                refusal: None,
            }],
        };

        serde_json::to_string(&body).map_err(|e| CompletionError::EncodeFailed {
            message: e.to_string(),
        })
    }
}

impl Completer for ChatGpt {
    fn complete(&self, message: &str) -> Result<String, CompletionError> {
        if self.api_key.trim().is_empty() {
            return Err(CompletionError::BlankApiKey);
        }

        let body = self.request_body(message)?;
        log::debug!("POST {} ({} bytes)", self.endpoint, body.len());

        let text = self
            .agent
            .post(self.endpoint.as_str())
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {}", self.api_key))
            .send(body)
            .map_err(|e| CompletionError::RequestFailed {
                message: e.to_string(),
            })?
            .into_body()
            .with_config()
            .limit(MAX_RESPONSE_SIZE)
            .read_to_string()
            .map_err(|e| CompletionError::ReadFailed {
                message: e.to_string(),
            })?;

        let response = Response::parse(&text)?;
        log::debug!(
            "completion {} used {} tokens",
            response.id,
            response.usage.total_tokens
        );

        response.into_content()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use similar_asserts::assert_eq;

    #[test]
    fn request_body_uses_defaults() {
        let body = ChatGpt::new("key").request_body("Say hi").unwrap();
        assert_eq!(
            body,
            r#"{"model":"gpt-4o-mini","store":false,"messages":[{"role":"user","content":"Say hi","refusal":null}]}"#
        );
    }

    #[test]
    fn request_body_uses_overrides() {
        let completer = ChatGpt::new("key")
            .with_model("gpt-4o")
            .with_role("system")
            .with_store(true);
        let body: serde_json::Value =
            serde_json::from_str(&completer.request_body("x").unwrap()).unwrap();

        assert_eq!(body["model"], "gpt-4o");
        assert_eq!(body["store"], true);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][0]["content"], "x");
    }

    #[test]
    fn blank_model_and_role_fall_back() {
        let completer = ChatGpt::new("key").with_model("").with_role("");
        let body: serde_json::Value =
            serde_json::from_str(&completer.request_body("x").unwrap()).unwrap();

        assert_eq!(body["model"], DEFAULT_MODEL);
        assert_eq!(body["messages"][0]["role"], DEFAULT_ROLE);
    }

    #[test]
    fn blank_api_key_is_rejected_before_sending() {
        let completer = ChatGpt::new("  ").with_endpoint("http://127.0.0.1:9/unreachable");
        assert!(matches!(
            completer.complete("hello"),
            Err(CompletionError::BlankApiKey)
        ));
    }

    #[test]
    fn unreachable_endpoint_is_a_request_error() {
        let completer = ChatGpt::new("key").with_endpoint("http://127.0.0.1:9/unreachable");
        assert!(matches!(
            completer.complete("hello"),
            Err(CompletionError::RequestFailed { .. })
        ));
    }
}
