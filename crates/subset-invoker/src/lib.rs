//! Font subsetting via an external tool.
//!
//! This crate does not subset fonts itself. It builds a command line for a subsetting tool
//! (by default, [`pyftsubset`] from fontTools) and runs it as a child process:
//!
//! ```text
//! pyftsubset <input_font> --text-file=<chars_file> --output-file=<output_font>
//! ```
//!
//! The exit status of the tool is propagated to the caller unchanged.
//!
//! [`pyftsubset`]: https://fonttools.readthedocs.io/en/latest/subset/index.html

// Documentation settings
#![doc(html_root_url = "https://docs.rs/subset-invoker/0.1.0")]

// Documentation tests
#[cfg(doctest)]
doc_comment::doctest!("../README.md");

mod errors;
mod invocation;
#[cfg(test)]
pub(crate) mod tests;

pub use crate::{
    errors::{InvokeError, InvokeErrorKind},
    invocation::{
        exit_code, Invocation, DEFAULT_CHARS_FILE, DEFAULT_INPUT_FONT, DEFAULT_OUTPUT_FONT,
        DEFAULT_TOOL,
    },
};
