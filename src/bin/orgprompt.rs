use diffprompt::cli::{self, Tool};
use std::process::ExitCode;

fn main() -> ExitCode {
    cli::main(Tool::OrgPrompt)
}
