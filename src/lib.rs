use error_set::error_set;

pub mod chat;
pub mod cli;
pub mod command;
pub mod config;
pub mod diff;
pub mod message;

pub use chat::Completer;
pub use command::apply_commands;
pub use diff::{DiffEngine, side_by_side_diff};
pub use message::ParsedMessage;

error_set! {
    /// Top-level error for diffprompt operations
    DiffPromptError := {
        #[display("Failed to write output: {message}")]
        OutputFailed { message: String },
    } || ConfigError || CompletionError || DiffError

    /// Errors from resolving settings
    ConfigError := {
        /// Standard input could not be read
        #[display("Failed to read message from standard input: {message}")]
        StdinFailed { message: String },
        /// No home directory to look for the key file in
        #[display("Could not determine home directory")]
        NoHomeDir,
        /// The key file could not be read
        #[display("Failed to read API key from {path}: {message}")]
        ReadKeyFailed { path: String, message: String },
        #[display("API key is required")]
        MissingApiKey,
        #[display("Message is required")]
        MissingMessage,
    }

    /// Errors from talking to a completion backend
    CompletionError := {
        /// The backend was configured without an API key
        #[display("Blank API key is forbidden")]
        BlankApiKey,
        /// The request body could not be encoded
        #[display("marshalling JSON: {message}")]
        EncodeFailed { message: String },
        /// The request could not be sent or was refused
        #[display("sending request: {message}")]
        RequestFailed { message: String },
        /// The response body could not be read
        #[display("reading response body: {message}")]
        ReadFailed { message: String },
        /// The response body is not a chat completion
        #[display("parsing response: {message}")]
        ParseFailed { message: String },
        /// The response holds no choices
        #[display("no choices in response")]
        NoChoices,
    }

    /// Errors from rendering a diff
    DiffError := {
        /// A temporary input file could not be prepared
        #[display("{step} failed: {message}")]
        TempFileFailed { step: String, message: String },
        /// The diff program could not be started
        #[display("Failed to run {program}: {message}")]
        EngineSpawnFailed { program: String, message: String },
        /// The diff program reported trouble
        #[display("{program} failed with exit status {code}")]
        EngineFailed { program: String, code: i32 },
        /// The diff program was terminated without an exit status
        #[display("Failed to get exit status of {program}")]
        EngineStatusUnknown { program: String },
        /// The diff output is not valid UTF-8
        #[display("Invalid UTF-8 in diff output: {message}")]
        InvalidUtf8 { message: String },
    }
}
