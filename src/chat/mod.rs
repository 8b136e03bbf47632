//! Chat completion backends.

pub mod chatgpt;
pub mod response;

pub use crate::CompletionError;

pub use chatgpt::{API_URL, ChatGpt, DEFAULT_MODEL};
pub use response::Response;

/// Sends a message to a chat backend and returns the generated reply.
pub trait Completer {
    /// Complete `message`, returning the backend's reply text.
    fn complete(&self, message: &str) -> Result<String, CompletionError>;
}
