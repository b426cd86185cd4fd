//! Builder for executing external tool commands.

use std::path::PathBuf;
use std::process::{Command, Stdio};

/// Output captured from a tool execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    /// Process exit code (`None` when terminated by a signal).
    pub code: Option<i32>,
    /// Captured standard output (lossy UTF-8).
    pub stdout: String,
    /// Captured standard error (lossy UTF-8).
    pub stderr: String,
}

impl ToolOutput {
    /// Whether the process exited with code 0.
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// The most useful diagnostic text: stderr if present, else stdout.
    pub fn diagnostics(&self) -> &str {
        let stderr = self.stderr.trim();
        if stderr.is_empty() {
            self.stdout.trim()
        } else {
            stderr
        }
    }

    /// Exit code for messages (`signal` when there is none).
    pub fn code_display(&self) -> String {
        self.code
            .map(|c| c.to_string())
            .unwrap_or_else(|| "signal".to_string())
    }
}

/// A builder for constructing and executing external tool invocations.
///
/// Commands block until the process exits; there is no timeout. Stdin is
/// always closed so a tool waiting for confirmation fails instead of hanging.
///
/// # Example
///
/// ```no_run
/// use tf_av::ToolCommand;
/// use std::path::PathBuf;
///
/// # fn example() -> tf_core::Result<()> {
/// let output = ToolCommand::new(PathBuf::from("mkvmerge"))
///     .arg("-J")
///     .arg("/path/to/video.mkv")
///     .run()?;
/// println!("{}", output.stdout);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ToolCommand {
    program: PathBuf,
    args: Vec<String>,
}

impl ToolCommand {
    /// Create a new command for the given program path.
    pub fn new(program: PathBuf) -> Self {
        Self {
            program,
            args: Vec::new(),
        }
    }

    /// Append a single argument.
    pub fn arg(&mut self, s: impl Into<String>) -> &mut Self {
        self.args.push(s.into());
        self
    }

    /// Append multiple arguments.
    pub fn args(&mut self, iter: impl IntoIterator<Item = impl Into<String>>) -> &mut Self {
        self.args.extend(iter.into_iter().map(Into::into));
        self
    }

    fn program_name(&self) -> String {
        self.program
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.program.to_string_lossy().to_string())
    }

    /// Run the command and capture its output regardless of exit code.
    ///
    /// # Errors
    ///
    /// Returns [`tf_core::Error::Tool`] only if the process cannot be spawned.
    pub fn run(&self) -> tf_core::Result<ToolOutput> {
        let program_name = self.program_name();
        tracing::trace!("{} {:?}", program_name, self.args);

        let output = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    tf_core::Error::tool(
                        &program_name,
                        format!("{program_name} not found; is it installed and in PATH?"),
                    )
                } else {
                    tf_core::Error::tool(&program_name, format!("failed to spawn: {e}"))
                }
            })?;

        Ok(ToolOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }

    /// Run the command, treating any non-zero exit as an error.
    ///
    /// # Errors
    ///
    /// - Returns [`tf_core::Error::Tool`] if spawning the process fails.
    /// - Returns [`tf_core::Error::Tool`] if the process exits with a non-zero
    ///   status (message includes the diagnostics).
    pub fn execute(&self) -> tf_core::Result<ToolOutput> {
        let output = self.run()?;
        if !output.success() {
            return Err(tf_core::Error::tool(
                self.program_name(),
                format!(
                    "exited with status {}: {}",
                    output.code_display(),
                    output.diagnostics()
                ),
            ));
        }
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use tf_core::Error;

    #[test]
    fn run_echo() {
        let out = ToolCommand::new(PathBuf::from("echo"))
            .arg("hello")
            .run()
            .unwrap();
        assert!(out.success());
        assert_eq!(out.code, Some(0));
        assert_eq!(out.stdout.trim(), "hello");
    }

    #[test]
    fn run_nonexistent_tool() {
        let result = ToolCommand::new(PathBuf::from("nonexistent_tool_xyz_12345")).run();
        let err = result.unwrap_err().to_string();
        assert!(err.contains("not found"), "unexpected error: {err}");
    }

    #[test]
    fn run_reports_exit_code() {
        let out = ToolCommand::new(PathBuf::from("sh"))
            .args(["-c", "echo broken >&2; exit 3"])
            .run()
            .unwrap();
        assert!(!out.success());
        assert_eq!(out.code, Some(3));
        assert_eq!(out.diagnostics(), "broken");
    }

    #[test]
    fn execute_reports_exit_code() {
        let err = ToolCommand::new(PathBuf::from("sh"))
            .args(["-c", "echo broken >&2; exit 3"])
            .execute()
            .unwrap_err();
        assert_matches!(err, Error::Tool { .. });
        let msg = err.to_string();
        assert!(msg.contains('3'), "{msg}");
        assert!(msg.contains("broken"), "{msg}");
    }

    #[test]
    fn diagnostics_prefers_stderr() {
        let out = ToolOutput {
            code: Some(2),
            stdout: "Error: bad file\n".into(),
            stderr: String::new(),
        };
        assert_eq!(out.diagnostics(), "Error: bad file");
        assert!(!out.success());

        let out = ToolOutput {
            code: None,
            stdout: "progress".into(),
            stderr: " decoder failure ".into(),
        };
        assert_eq!(out.diagnostics(), "decoder failure");
        assert_eq!(out.code_display(), "signal");
    }
}
