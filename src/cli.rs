//! Command-line front end shared by the `diffprompt` and `orgprompt` binaries.

use crate::chat::{API_URL, ChatGpt, Completer, DEFAULT_MODEL};
use crate::command::apply_commands;
use crate::config::{self, Settings};
use crate::diff::{self, BuiltinDiff, DiffEngine, SystemDiff};
use crate::message::ParsedMessage;
use crate::DiffPromptError;
use clap::{CommandFactory, FromArgMatches, Parser, ValueEnum};
use clap_complete::Shell;
use std::io::{self, Write};
use std::process::ExitCode;

/// Which front end is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    /// Applies block commands when no prompt is given
    DiffPrompt,
    /// Always sends the input to the model
    OrgPrompt,
}

impl Tool {
    /// Program name used in help output and error messages
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Tool::DiffPrompt => "diffprompt",
            Tool::OrgPrompt => "orgprompt",
        }
    }

    /// File in the home directory holding the API key
    #[must_use]
    pub fn config_file(self) -> &'static str {
        match self {
            Tool::DiffPrompt => ".diffprompt",
            Tool::OrgPrompt => ".orgprompt",
        }
    }

    /// Whether prompt-less input goes through [`apply_commands`]
    #[must_use]
    pub fn applies_commands(self) -> bool {
        matches!(self, Tool::DiffPrompt)
    }

    fn about(self) -> &'static str {
        match self {
            Tool::DiffPrompt => {
                "Rewrite text with a chat model and show the change as a diff, \
                 or apply embedded apply/reject blocks when no prompt is given"
            }
            Tool::OrgPrompt => "Rewrite text with a chat model and show the change as a diff",
        }
    }
}

/// Diff engine selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Engine {
    /// The system `diff` program
    System,
    /// The in-process differ
    Builtin,
}

impl Engine {
    fn build(self) -> Box<dyn DiffEngine> {
        match self {
            Engine::System => Box::new(SystemDiff::default()),
            Engine::Builtin => Box::new(BuiltinDiff),
        }
    }
}

#[derive(Debug, Parser)]
#[command(version)]
pub struct Cli {
    /// API key for authentication (defaults to the contents of ~/.<tool>)
    #[arg(long)]
    pub api_key: Option<String>,

    /// Message to complete (defaults to standard input)
    ///
    /// Put the instruction first, then a line holding only `vvv`, then the
    /// text to rewrite.
    #[arg(long)]
    pub message: Option<String>,

    /// Chat model used for completion
    #[arg(long, default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Chat completions endpoint
    #[arg(long, default_value = API_URL)]
    pub endpoint: String,

    /// Diff engine used to render the change
    #[arg(long, value_enum, default_value_t = Engine::System)]
    pub engine: Engine,

    /// Print shell completions and exit
    #[arg(long, value_enum, value_name = "SHELL", exclusive = true)]
    pub completions: Option<Shell>,

    /// Print a man page and exit
    #[arg(long, exclusive = true)]
    pub man: bool,
}

impl Cli {
    /// The clap command, named after `tool`
    #[must_use]
    pub fn command_for(tool: Tool) -> clap::Command {
        Self::command().name(tool.name()).about(tool.about())
    }

    /// Parse process arguments for `tool`, exiting on usage errors
    #[must_use]
    pub fn parse_for(tool: Tool) -> Self {
        Self::from_arg_matches(&Self::command_for(tool).get_matches())
            .unwrap_or_else(|e| e.exit())
    }
}

/// Process one message and return the text to print.
///
/// Without a prompt, [`Tool::DiffPrompt`] applies the message's block
/// commands and never contacts the backend. Otherwise the completion for
/// the message is diffed against its input.
///
/// # Errors
///
/// Returns [`DiffPromptError`] if the completion or the diff fails.
pub fn run(
    tool: Tool,
    message: &str,
    completer: &dyn Completer,
    engine: &dyn DiffEngine,
) -> Result<String, DiffPromptError> {
    let parsed = ParsedMessage::parse(message);

    if !parsed.has_prompt() && tool.applies_commands() {
        log::debug!("no prompt given, applying block commands");
        return Ok(apply_commands(&parsed.input));
    }

    let mut result = completer.complete(&parsed.completion_request())?;
    result.push('\n');

    Ok(diff::render(engine, &parsed.input, &result)?)
}

/// Entry point for the binaries.
pub fn main(tool: Tool) -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    match execute(tool, Cli::parse_for(tool)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}: {e}", tool.name());
            ExitCode::FAILURE
        }
    }
}

fn execute(tool: Tool, cli: Cli) -> Result<(), DiffPromptError> {
    let mut stdout = io::stdout().lock();

    if let Some(shell) = cli.completions {
        clap_complete::generate(shell, &mut Cli::command_for(tool), tool.name(), &mut stdout);
        return Ok(());
    }

    if cli.man {
        return clap_mangen::Man::new(Cli::command_for(tool))
            .render(&mut stdout)
            .map_err(|e| DiffPromptError::OutputFailed {
                message: e.to_string(),
            });
    }

    let message = config::resolve_message(cli.message, io::stdin().lock())?;
    let api_key = config::resolve_api_key(cli.api_key, tool.config_file())?;
    let settings = Settings::new(api_key, message)?;

    let completer = ChatGpt::new(settings.api_key)
        .with_model(cli.model)
        .with_endpoint(cli.endpoint);
    let output = run(tool, &settings.message, &completer, cli.engine.build().as_ref())?;

    writeln!(stdout, "{output}").map_err(|e| DiffPromptError::OutputFailed {
        message: e.to_string(),
    })
}
