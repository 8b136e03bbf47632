use super::CompletionError;
use super::chatgpt::Message;
use serde::{Deserialize, Deserializer};

/// A chat completion response.
///
/// Fields absent from the payload or set to `null` take their default value.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Response {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub object: String,
    pub created: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub model: String,
    #[serde(deserialize_with = "null_as_default")]
    pub choices: Vec<Choice>,
    #[serde(deserialize_with = "null_as_default")]
    pub usage: Usage,
    #[serde(deserialize_with = "null_as_default")]
    pub service_tier: String,
    #[serde(deserialize_with = "null_as_default")]
    pub system_fingerprint: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Choice {
    pub index: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub message: Message,
    pub logprobs: Option<serde_json::Value>,
    #[serde(deserialize_with = "null_as_default")]
    pub finish_reason: String,
}

/// Token accounting for one request
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
    pub prompt_tokens_details: TokenDetails,
    pub completion_tokens_details: CompletionTokenDetails,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TokenDetails {
    pub cached_tokens: u32,
    pub audio_tokens: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CompletionTokenDetails {
    pub reasoning_tokens: u32,
    pub audio_tokens: u32,
    pub accepted_prediction_tokens: u32,
    pub rejected_prediction_tokens: u32,
}

/// Deserialize `null` as the type's default value.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Response {
    /// Parse a response body.
    ///
    /// # Errors
    ///
    /// Returns [`CompletionError::ParseFailed`] if `body` is not valid JSON
    /// of the expected shape.
    pub fn parse(body: &str) -> Result<Self, CompletionError> {
        serde_json::from_str(body).map_err(|e| CompletionError::ParseFailed {
            message: e.to_string(),
        })
    }

    /// Content of the first choice.
    ///
    /// # Errors
    ///
    /// Returns [`CompletionError::NoChoices`] if the response is empty.
    pub fn into_content(self) -> Result<String, CompletionError> {
        self.choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or(CompletionError::NoChoices)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use similar_asserts::assert_eq;

    const SAMPLE: &str = r#"{
        "id": "chatcmpl-B4XSh7MGwzMXubIvkYMJVihDbQjcT",
        "object": "chat.completion",
        "created": 1740421639,
        "model": "gpt-4o-mini-2024-07-18",
        "choices": [
            {
                "index": 0,
                "message": {
                    "role": "assistant",
                    "content": "A billy bumbler is a fictional creature...",
                    "refusal": null
                },
                "logprobs": null,
                "finish_reason": "stop"
            }
        ],
        "usage": {
            "prompt_tokens": 16,
            "completion_tokens": 172,
            "total_tokens": 188,
            "prompt_tokens_details": {
                "cached_tokens": 0,
                "audio_tokens": 0
            },
            "completion_tokens_details": {
                "reasoning_tokens": 0,
                "audio_tokens": 0,
                "accepted_prediction_tokens": 0,
                "rejected_prediction_tokens": 0
            }
        },
        "service_tier": "default",
        "system_fingerprint": "fp_7fcd609668"
    }"#;

    #[test]
    fn parse_full_response() {
        let response = Response::parse(SAMPLE).unwrap();

        assert_eq!(response.id, "chatcmpl-B4XSh7MGwzMXubIvkYMJVihDbQjcT");
        assert_eq!(response.object, "chat.completion");
        assert_eq!(response.created, 1740421639);
        assert_eq!(response.model, "gpt-4o-mini-2024-07-18");
        assert_eq!(response.choices.len(), 1);
        assert_eq!(response.choices[0].index, 0);
        assert_eq!(response.choices[0].finish_reason, "stop");
        assert_eq!(response.choices[0].message.role, "assistant");
        assert_eq!(response.choices[0].message.refusal, None);
        assert_eq!(response.usage.prompt_tokens, 16);
        assert_eq!(response.usage.completion_tokens, 172);
        assert_eq!(response.usage.total_tokens, 188);
        assert_eq!(response.service_tier, "default");
        assert_eq!(response.system_fingerprint, "fp_7fcd609668");
        assert_eq!(
            response.into_content().unwrap(),
            "A billy bumbler is a fictional creature..."
        );
    }

    #[test]
    fn parse_sparse_response() {
        let response =
            Response::parse(r#"{"choices":[{"message":{"role":"assistant","content":"hi"}}]}"#)
                .unwrap();
        assert_eq!(response.usage, Usage::default());
        assert_eq!(response.into_content().unwrap(), "hi");
    }

    #[test]
    fn refusal_with_null_content() {
        let response = Response::parse(
            r#"{"id":"x","choices":[{"index":0,"message":{"role":"assistant","content":null,"refusal":"I can't help"},"logprobs":null,"finish_reason":"stop"}]}"#,
        )
        .unwrap();

        assert_eq!(
            response.choices[0].message.refusal.as_deref(),
            Some("I can't help")
        );
        assert_eq!(response.into_content().unwrap(), "");
    }

    #[test]
    fn null_metadata_fields() {
        let response = Response::parse(
            r#"{"id":"x","object":null,"model":null,"system_fingerprint":null,"service_tier":null,"usage":null,"choices":[{"index":0,"message":{"role":null,"content":"hi"},"finish_reason":null}]}"#,
        )
        .unwrap();

        assert_eq!(response.system_fingerprint, "");
        assert_eq!(response.service_tier, "");
        assert_eq!(response.usage, Usage::default());
        assert_eq!(response.choices[0].finish_reason, "");
        assert_eq!(response.choices[0].message.role, "");
        assert_eq!(response.into_content().unwrap(), "hi");
    }

    #[test]
    fn empty_choices_is_an_error() {
        let response = Response::parse(r#"{"id":"x","choices":[]}"#).unwrap();
        assert!(matches!(
            response.into_content(),
            Err(CompletionError::NoChoices)
        ));
    }

    #[test]
    fn malformed_body_is_an_error() {
        assert!(matches!(
            Response::parse("<html>bad gateway</html>"),
            Err(CompletionError::ParseFailed { .. })
        ));
    }
}
