//! Splitting a user message into an instruction and the text it applies to.
//!
//! The instruction comes first, followed by a separator line holding only
//! `vvv`, followed by the input text:
//!
//! ```text
//! Rename the variable to `total`.
//! vvv
//! let sum = a + b;
//! ```

/// Separator between the prompt and the input.
pub const SEPARATOR: &str = "vvv";

/// Instruction appended to every completion request.
pub const BOILERPLATE_REMOVER: &str = "Only write the code, without comments or explanations. \
Do not use markdown. Preserve indentation of the below input.";

/// A message split into its prompt and input parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedMessage {
    /// Lines before the separator, empty when there is none
    pub prompt: String,
    /// Lines after the separator, or the whole message
    pub input: String,
}

impl ParsedMessage {
    /// Split `message` at the first separator line.
    ///
    /// # Examples
    ///
    /// ```
    /// use diffprompt::message::ParsedMessage;
    ///
    /// let parsed = ParsedMessage::parse("Fix the typo\n  vvv \nteh cat\n");
    /// assert_eq!(parsed.prompt, "Fix the typo");
    /// assert_eq!(parsed.input, "teh cat\n");
    ///
    /// let parsed = ParsedMessage::parse("no separator here");
    /// assert!(!parsed.has_prompt());
    /// assert_eq!(parsed.input, "no separator here");
    /// ```
    #[must_use]
    pub fn parse(message: &str) -> Self {
        let lines: Vec<&str> = message.split('\n').collect();

        match lines.iter().position(|line| line.trim() == SEPARATOR) {
            Some(separator) => Self {
                prompt: lines[..separator].join("\n"),
                input: lines[separator + 1..].join("\n"),
            },
            None => Self {
                prompt: String::new(),
                input: message.to_string(),
            },
        }
    }

    /// Whether the message carries an instruction for the model
    #[must_use]
    pub fn has_prompt(&self) -> bool {
        !self.prompt.is_empty()
    }

    /// Build the text sent to the completion backend
    #[must_use]
    pub fn completion_request(&self) -> String {
        let body = if self.has_prompt() {
            format!("{}\n\n{}", self.prompt, self.input)
        } else {
            self.input.clone()
        };

        format!("{body}\n\n{BOILERPLATE_REMOVER}")
    }
}
