//! Building and running the subsetting tool command.

use std::{
    ffi::{OsStr, OsString},
    fmt,
    path::{Path, PathBuf},
    process::{Command, ExitStatus, Stdio},
};

use crate::{InvokeError, InvokeErrorKind};

/// Default subsetting tool, resolved via `PATH`.
pub const DEFAULT_TOOL: &str = "pyftsubset";
/// Default path to the input font.
pub const DEFAULT_INPUT_FONT: &str = "agave.ttf";
/// Default path to the character list.
pub const DEFAULT_CHARS_FILE: &str = "char.txt";
/// Default path to the output font.
pub const DEFAULT_OUTPUT_FONT: &str = "aaa.ttf";

const TEXT_FILE_OPTION: &str = "--text-file=";
const OUTPUT_FILE_OPTION: &str = "--output-file=";

/// Single invocation of an external font subsetting tool.
///
/// The tool is invoked as
///
/// ```text
/// <tool> <input_font> --text-file=<chars_file> --output-file=<output_font>
/// ```
///
/// None of the paths are checked before spawning; the tool is responsible for reporting
/// missing or malformed inputs.
///
/// # Examples
///
/// ```
/// use subset_invoker::Invocation;
///
/// let invocation = Invocation::new("agave.ttf", "char.txt", "aaa.ttf");
/// assert_eq!(
///     invocation.argv(),
///     ["pyftsubset", "agave.ttf", "--text-file=char.txt", "--output-file=aaa.ttf"],
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    tool: OsString,
    input_font: PathBuf,
    chars_file: PathBuf,
    output_font: PathBuf,
}

impl Default for Invocation {
    fn default() -> Self {
        Self::new(DEFAULT_INPUT_FONT, DEFAULT_CHARS_FILE, DEFAULT_OUTPUT_FONT)
    }
}

impl Invocation {
    /// Creates an invocation of [the default tool](DEFAULT_TOOL).
    pub fn new(
        input_font: impl Into<PathBuf>,
        chars_file: impl Into<PathBuf>,
        output_font: impl Into<PathBuf>,
    ) -> Self {
        Self {
            tool: DEFAULT_TOOL.into(),
            input_font: input_font.into(),
            chars_file: chars_file.into(),
            output_font: output_font.into(),
        }
    }

    /// Sets the tool name or path.
    #[must_use]
    pub fn with_tool(mut self, tool: impl Into<OsString>) -> Self {
        self.tool = tool.into();
        self
    }

    /// Returns the tool name or path.
    pub fn tool(&self) -> &OsStr {
        &self.tool
    }

    /// Returns the path to the input font.
    pub fn input_font(&self) -> &Path {
        &self.input_font
    }

    /// Returns the path to the character list.
    pub fn chars_file(&self) -> &Path {
        &self.chars_file
    }

    /// Returns the path to the output font.
    pub fn output_font(&self) -> &Path {
        &self.output_font
    }

    /// Returns the arguments passed to the tool, not including the tool itself.
    pub fn args(&self) -> [OsString; 3] {
        [
            self.input_font.clone().into_os_string(),
            joined_option(TEXT_FILE_OPTION, &self.chars_file),
            joined_option(OUTPUT_FILE_OPTION, &self.output_font),
        ]
    }

    /// Returns the full argument vector, starting with the tool.
    pub fn argv(&self) -> Vec<OsString> {
        let mut argv = Vec::with_capacity(4);
        argv.push(self.tool.clone());
        argv.extend(self.args());
        argv
    }

    /// Creates a command for this invocation. The command inherits stdio of the current process.
    pub fn command(&self) -> Command {
        let mut command = Command::new(&self.tool);
        command.args(self.args());
        command
    }

    /// Runs the tool and waits for it to exit.
    ///
    /// A non-success exit status is returned as is; use [`Self::run_checked()`] to treat it
    /// as an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the tool cannot be spawned (e.g., it is not on `PATH`).
    pub fn run(&self) -> Result<ExitStatus, InvokeError> {
        log::debug!("running `{self}`");
        let status = self
            .command()
            .status()
            .map_err(|err| InvokeError::new(&self.tool, InvokeErrorKind::Spawn(err)))?;

        if status.success() {
            log::info!("`{}` exited successfully", self.tool.to_string_lossy());
        } else {
            log::warn!("`{}` exited with {status}", self.tool.to_string_lossy());
        }
        Ok(status)
    }

    /// Runs the tool and checks that it has exited successfully.
    ///
    /// # Errors
    ///
    /// Returns an error if the tool cannot be spawned or exits with a non-success status.
    pub fn run_checked(&self) -> Result<(), InvokeError> {
        let status = self.run()?;
        if status.success() {
            Ok(())
        } else {
            Err(InvokeError::new(
                &self.tool,
                InvokeErrorKind::ToolFailed(status),
            ))
        }
    }

    /// Runs `<tool> --version` and returns its trimmed output.
    ///
    /// # Errors
    ///
    /// Returns an error if the tool cannot be spawned, exits with a non-success status,
    /// or outputs non-UTF-8 text.
    pub fn tool_version(&self) -> Result<String, InvokeError> {
        log::debug!("probing version of `{}`", self.tool.to_string_lossy());
        let output = Command::new(&self.tool)
            .arg("--version")
            .stdin(Stdio::null())
            .output()
            .map_err(|err| InvokeError::new(&self.tool, InvokeErrorKind::Spawn(err)))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            log::debug!("version probe stderr: {}", stderr.trim());
            return Err(InvokeError::new(
                &self.tool,
                InvokeErrorKind::ToolFailed(output.status),
            ));
        }

        let version = String::from_utf8(output.stdout)
            .map_err(|_| InvokeError::new(&self.tool, InvokeErrorKind::InvalidOutput))?;
        Ok(version.trim().to_owned())
    }
}

/// Renders the invocation as a shell command line.
///
/// On Unix, non-UTF-8 args are rendered byte-for-byte using `$'...'` quoting. On other platforms,
/// they are rendered lossily.
impl fmt::Display for Invocation {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, arg) in self.argv().iter().enumerate() {
            if i > 0 {
                formatter.write_str(" ")?;
            }
            match arg.to_str() {
                Some(word) => write_shell_word(formatter, word)?,
                None => write_non_utf8_word(formatter, arg)?,
            }
        }
        Ok(())
    }
}

fn joined_option(option: &str, path: &Path) -> OsString {
    let mut arg = OsString::with_capacity(option.len() + path.as_os_str().len());
    arg.push(option);
    arg.push(path);
    arg
}

fn is_shell_safe(ch: char) -> bool {
    ch.is_ascii_alphanumeric()
        || matches!(ch, '_' | '-' | '.' | '/' | '=' | ':' | ',' | '+' | '@' | '%')
}

fn write_shell_word(formatter: &mut fmt::Formatter<'_>, word: &str) -> fmt::Result {
    if !word.is_empty() && word.chars().all(is_shell_safe) {
        return formatter.write_str(word);
    }

    formatter.write_str("'")?;
    for (i, part) in word.split('\'').enumerate() {
        if i > 0 {
            formatter.write_str(r"'\''")?;
        }
        formatter.write_str(part)?;
    }
    formatter.write_str("'")
}

#[cfg(unix)]
fn write_non_utf8_word(formatter: &mut fmt::Formatter<'_>, word: &OsStr) -> fmt::Result {
    use std::os::unix::ffi::OsStrExt;

    formatter.write_str("$'")?;
    for chunk in word.as_bytes().utf8_chunks() {
        for ch in chunk.valid().chars() {
            match ch {
                '\\' => formatter.write_str(r"\\")?,
                '\'' => formatter.write_str(r"\'")?,
                _ => fmt::Write::write_char(formatter, ch)?,
            }
        }
        for byte in chunk.invalid() {
            write!(formatter, "\\x{byte:02x}")?;
        }
    }
    formatter.write_str("'")
}

#[cfg(not(unix))]
fn write_non_utf8_word(formatter: &mut fmt::Formatter<'_>, word: &OsStr) -> fmt::Result {
    write_shell_word(formatter, &word.to_string_lossy())
}

/// Converts the exit status of the tool to the exit code of the current process.
///
/// On Unix, termination by a signal is mapped to `128 + signal` as shells do.
/// Codes outside `0..=255` (possible on Windows) are truncated, but a non-zero code
/// never maps to 0.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn exit_code(status: ExitStatus) -> u8 {
    if let Some(code) = status.code() {
        return truncate_code(code);
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;

        if let Some(signal) = status.signal() {
            return 128_u8.wrapping_add(signal as u8);
        }
    }
    1
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // the OS masks exit codes the same way
fn truncate_code(code: i32) -> u8 {
    match code as u8 {
        0 if code != 0 => 1,
        truncated => truncated,
    }
}
