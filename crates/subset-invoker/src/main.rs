//! CLI running an external font subsetting tool.

use std::{ffi::OsString, path::PathBuf, process::ExitCode};

use clap::Parser;
use clap_verbosity_flag::{Verbosity, WarnLevel};
use subset_invoker::{
    exit_code, Invocation, DEFAULT_CHARS_FILE, DEFAULT_INPUT_FONT, DEFAULT_OUTPUT_FONT,
    DEFAULT_TOOL,
};

/// Subsets a font by running an external tool (`pyftsubset` by default):
///
/// <TOOL> <INPUT> --text-file=<CHARS> --output-file=<OUTPUT>
///
/// The exit code is the exit code of the tool.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Path to the input font.
    #[arg(short, long, value_name = "PATH", default_value = DEFAULT_INPUT_FONT)]
    input: PathBuf,
    /// Path to the text file listing characters to keep.
    #[arg(short, long, value_name = "PATH", default_value = DEFAULT_CHARS_FILE)]
    chars: PathBuf,
    /// Path to write the subset font to. Overwritten if it exists.
    #[arg(short, long, value_name = "PATH", default_value = DEFAULT_OUTPUT_FONT)]
    output: PathBuf,
    /// Subsetting tool name (resolved via `PATH`) or path.
    #[arg(long, env = "SUBSET_TOOL", default_value = DEFAULT_TOOL)]
    tool: OsString,
    /// Print the tool command line instead of running it.
    #[arg(long, conflicts_with = "tool_version")]
    dry_run: bool,
    /// Print the tool version and exit.
    #[arg(long)]
    tool_version: bool,
    #[command(flatten)]
    verbosity: Verbosity<WarnLevel>,
}

impl Cli {
    fn run(self) -> ExitCode {
        let invocation =
            Invocation::new(self.input, self.chars, self.output).with_tool(self.tool);

        if self.dry_run {
            println!("{invocation}");
            return ExitCode::SUCCESS;
        }

        if self.tool_version {
            return match invocation.tool_version() {
                Ok(version) => {
                    println!("{version}");
                    ExitCode::SUCCESS
                }
                Err(err) => {
                    log::error!("{err}");
                    ExitCode::from(err.exit_code())
                }
            };
        }

        match invocation.run() {
            Ok(status) => ExitCode::from(exit_code(status)),
            Err(err) => {
                log::error!("{err}");
                ExitCode::from(err.exit_code())
            }
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    env_logger::Builder::new()
        .filter_level(cli.verbosity.log_level_filter())
        .init();
    cli.run()
}
