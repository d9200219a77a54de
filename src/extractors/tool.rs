//! External binary discovery and invocation

use super::traits::ExtractorError;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

/// A command-line tool the collaborators shell out to
///
/// The binary is resolved once at construction: an explicitly configured
/// path wins, otherwise PATH is searched with `which` when allowed. An
/// unresolved tool reports [`ExtractorError::ToolNotFound`] on every run.
#[derive(Clone, Debug)]
pub struct ToolBinary {
    name: &'static str,
    program: Option<PathBuf>,
    leading_args: Vec<OsString>,
}

impl ToolBinary {
    /// Create a tool with an explicit binary path
    pub fn new(name: &'static str, program: PathBuf) -> Self {
        Self {
            name,
            program: Some(program),
            leading_args: Vec::new(),
        }
    }

    /// Resolve `name` from a configured path or PATH
    pub fn resolve(name: &'static str, configured: Option<&Path>, search_path: bool) -> Self {
        let program = match configured {
            Some(path) => Some(path.to_path_buf()),
            None if search_path => which::which(name).ok(),
            None => None,
        };

        match &program {
            Some(path) => tracing::debug!(tool = name, path = %path.display(), "resolved external tool"),
            None => tracing::warn!(tool = name, "external tool not found, downloads using it will fail"),
        }

        Self {
            name,
            program,
            leading_args: Vec::new(),
        }
    }

    /// A tool that is known to be absent
    pub fn missing(name: &'static str) -> Self {
        Self {
            name,
            program: None,
            leading_args: Vec::new(),
        }
    }

    /// Run a shell script in place of the real binary
    #[cfg(test)]
    pub(crate) fn shell_script(name: &'static str, script: &Path) -> Self {
        Self {
            name,
            program: Some(PathBuf::from("/bin/sh")),
            leading_args: vec![script.as_os_str().to_os_string()],
        }
    }

    /// Binary name used in messages
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Resolved path, if any
    pub fn program(&self) -> Option<&Path> {
        self.program.as_deref()
    }

    /// Run the tool to completion and return its stdout
    ///
    /// # Errors
    ///
    /// - [`ExtractorError::ToolNotFound`] if the binary was never resolved
    /// - [`ExtractorError::Spawn`] if the process could not start
    /// - [`ExtractorError::ToolFailed`] on a non-zero exit, carrying the
    ///   most relevant stderr line
    pub async fn run<I, S>(&self, args: I) -> Result<Vec<u8>, ExtractorError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let program = self
            .program
            .as_ref()
            .ok_or(ExtractorError::ToolNotFound { tool: self.name })?;

        let output = Command::new(program)
            .args(&self.leading_args)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| ExtractorError::Spawn {
                tool: self.name,
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let code = output.status.code();
            let message = summarize_stderr(&stderr).unwrap_or_else(|| match code {
                Some(code) => format!("{} exited with status {}", self.name, code),
                None => format!("{} was terminated by a signal", self.name),
            });
            return Err(ExtractorError::ToolFailed {
                tool: self.name,
                code,
                message,
            });
        }

        Ok(output.stdout)
    }
}

/// Pick the line of stderr that best explains a failure
///
/// Prefers the last `ERROR:` line (yt-dlp style), then the last non-empty line.
pub(crate) fn summarize_stderr(stderr: &str) -> Option<String> {
    let lines: Vec<&str> = stderr
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    lines
        .iter()
        .rev()
        .find(|line| line.starts_with("ERROR:"))
        .or_else(|| lines.last())
        .map(|line| (*line).to_string())
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_prefers_error_lines() {
        let stderr = "WARNING: slow\nERROR: [youtube] abc: Video unavailable\ntrailing noise\n";
        assert_eq!(
            summarize_stderr(stderr).as_deref(),
            Some("ERROR: [youtube] abc: Video unavailable")
        );
    }

    #[test]
    fn summary_falls_back_to_last_line() {
        assert_eq!(
            summarize_stderr("first\n\nLogin required.\n\n").as_deref(),
            Some("Login required.")
        );
        assert_eq!(summarize_stderr("  \n"), None);
    }

    #[test]
    fn configured_path_wins_over_search() {
        let tool = ToolBinary::resolve("yt-dlp", Some(Path::new("/opt/yt-dlp")), true);
        assert_eq!(tool.program(), Some(Path::new("/opt/yt-dlp")));
    }

    #[test]
    fn no_search_and_no_path_is_missing() {
        let tool = ToolBinary::resolve("yt-dlp", None, false);
        assert!(tool.program().is_none());
    }

    #[test]
    fn resolve_is_consistent_with_which() {
        let tool = ToolBinary::resolve("nonexistent-social-dl-tool-xyz", None, true);
        assert!(tool.program().is_none());
    }

    #[tokio::test]
    async fn missing_tool_reports_not_found() {
        let err = ToolBinary::missing("instaloader")
            .run(["--version"])
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractorError::ToolNotFound { tool: "instaloader" }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn failing_tool_reports_stderr() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("fake.sh");
        std::fs::write(&script, "echo 'ERROR: nope' >&2\nexit 2\n").unwrap();

        let err = ToolBinary::shell_script("yt-dlp", &script)
            .run(["https://example.com"])
            .await
            .unwrap_err();

        match err {
            ExtractorError::ToolFailed { code, message, .. } => {
                assert_eq!(code, Some(2));
                assert_eq!(message, "ERROR: nope");
            }
            other => panic!("expected ToolFailed, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn successful_tool_returns_stdout_and_sees_args() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("fake.sh");
        std::fs::write(&script, "echo \"$1-$2\"\n").unwrap();

        let out = ToolBinary::shell_script("yt-dlp", &script)
            .run(["a", "b"])
            .await
            .unwrap();

        assert_eq!(String::from_utf8_lossy(&out).trim(), "a-b");
    }
}
