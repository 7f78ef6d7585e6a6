use std::{
    error,
    ffi::{OsStr, OsString},
    fmt, io,
    process::ExitStatus,
};

/// Kind of an [`InvokeError`].
#[derive(Debug)]
#[non_exhaustive]
pub enum InvokeErrorKind {
    /// The tool could not be located or started.
    Spawn(io::Error),
    /// The tool ran, but exited with a non-success status.
    ToolFailed(ExitStatus),
    /// The tool produced output that could not be interpreted.
    InvalidOutput,
}

impl fmt::Display for InvokeErrorKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spawn(err) => write!(formatter, "failed spawning process: {err}"),
            Self::ToolFailed(status) => write!(formatter, "process failed: {status}"),
            Self::InvalidOutput => formatter.write_str("process output is not valid UTF-8"),
        }
    }
}

/// Errors that can occur when running the subsetting tool.
#[derive(Debug)]
pub struct InvokeError {
    pub(crate) kind: InvokeErrorKind,
    pub(crate) tool: OsString,
}

impl fmt::Display for InvokeError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "[{}] ", self.tool.to_string_lossy())?;
        fmt::Display::fmt(&self.kind, formatter)
    }
}

impl error::Error for InvokeError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match &self.kind {
            InvokeErrorKind::Spawn(err) => Some(err),
            _ => None,
        }
    }
}

impl InvokeError {
    pub(crate) fn new(tool: &OsStr, kind: InvokeErrorKind) -> Self {
        Self {
            kind,
            tool: tool.to_owned(),
        }
    }

    /// Gets the error kind.
    pub fn kind(&self) -> &InvokeErrorKind {
        &self.kind
    }

    /// Gets the tool this error relates to.
    pub fn tool(&self) -> &OsStr {
        &self.tool
    }

    /// Returns the exit code that a shell would report for this error.
    ///
    /// A missing tool maps to 127 and a non-executable one to 126, following POSIX shells.
    pub fn exit_code(&self) -> u8 {
        match &self.kind {
            InvokeErrorKind::Spawn(err) => match err.kind() {
                io::ErrorKind::NotFound => 127,
                io::ErrorKind::PermissionDenied => 126,
                _ => 1,
            },
            InvokeErrorKind::ToolFailed(status) => crate::exit_code(*status),
            InvokeErrorKind::InvalidOutput => 1,
        }
    }
}
