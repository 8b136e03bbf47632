use super::DiffError;
use std::ffi::OsString;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::NamedTempFile;

/// Context lines requested from an engine, enough to keep any document in
/// a single hunk.
pub const MAX_CONTEXT: usize = 10_000_000;

/// A line-diff engine producing unified diff text.
pub trait DiffEngine {
    /// Compare `before` with `after` and return the raw unified diff.
    ///
    /// Identical inputs may yield empty output.
    fn diff(&self, before: &str, after: &str) -> Result<String, DiffError>;
}

/// Runs the system `diff` program on temporary copies of both inputs.
#[derive(Debug, Clone)]
pub struct SystemDiff {
    program: OsString,
    context: usize,
    temp_dir: Option<PathBuf>,
}

impl Default for SystemDiff {
    fn default() -> Self {
        Self {
            program: "diff".into(),
            context: MAX_CONTEXT,
            temp_dir: None,
        }
    }
}

impl SystemDiff {
    /// Use a different `diff`-compatible program
    #[must_use]
    pub fn with_program(mut self, program: impl Into<OsString>) -> Self {
        self.program = program.into();
        self
    }

    /// Place the temporary input files in `dir` instead of the system
    /// temporary directory
    #[must_use]
    pub fn with_temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = Some(dir.into());
        self
    }

    fn program_name(&self) -> String {
        self.program.to_string_lossy().into_owned()
    }

    fn run(&self, before: &Path, after: &Path) -> Result<String, DiffError> {
        log::debug!(
            "running {} -U{} {} {}",
            self.program_name(),
            self.context,
            before.display(),
            after.display()
        );

        let output = Command::new(&self.program)
            .arg(format!("-U{}", self.context))
            .arg(before)
            .arg(after)
            .output()
            .map_err(|e| DiffError::EngineSpawnFailed {
                program: self.program_name(),
                message: e.to_string(),
            })?;

        if !output.stderr.is_empty() {
            log::debug!("diff stderr: {}", String::from_utf8_lossy(&output.stderr));
        }

        // 0: no differences, 1: differences found
        match output.status.code() {
            Some(0 | 1) => String::from_utf8(output.stdout).map_err(|e| DiffError::InvalidUtf8 {
                message: e.to_string(),
            }),
            Some(code) => Err(DiffError::EngineFailed {
                program: self.program_name(),
                code,
            }),
            None => Err(DiffError::EngineStatusUnknown {
                program: self.program_name(),
            }),
        }
    }
}

impl DiffEngine for SystemDiff {
    fn diff(&self, before: &str, after: &str) -> Result<String, DiffError> {
        // Both files are removed when dropped, on success and on error alike
        let dir = self.temp_dir.as_deref();
        let before_file = write_temp(dir, "input", before)?;
        let after_file = write_temp(dir, "result", after)?;

        self.run(before_file.path(), after_file.path())
    }
}

/// Write `content` to a fresh temporary file named after `role`, in `dir`
/// or the system temporary directory.
fn write_temp(dir: Option<&Path>, role: &str, content: &str) -> Result<NamedTempFile, DiffError> {
    let prefix = format!("{role}-");
    let mut builder = tempfile::Builder::new();
    builder.prefix(&prefix);

    let mut file = match dir {
        Some(dir) => builder.tempfile_in(dir),
        None => builder.tempfile(),
    }
    .map_err(|e| DiffError::TempFileFailed {
        step: format!("creating {role} file"),
        message: e.to_string(),
    })?;

    file.write_all(content.as_bytes())
        .map_err(|e| DiffError::TempFileFailed {
            step: format!("writing {role} file"),
            message: e.to_string(),
        })?;

    file.flush().map_err(|e| DiffError::TempFileFailed {
        step: format!("closing {role} file"),
        message: e.to_string(),
    })?;

    Ok(file)
}

/// In-process engine backed by the `similar` crate.
///
/// Emits the same header layout as `diff -U`, labelled `input` and `result`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinDiff;

impl DiffEngine for BuiltinDiff {
    fn diff(&self, before: &str, after: &str) -> Result<String, DiffError> {
        let diff = similar::TextDiff::from_lines(before, after);

        Ok(diff
            .unified_diff()
            .context_radius(MAX_CONTEXT)
            .header("input", "result")
            .to_string())
    }
}
