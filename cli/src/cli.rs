//! Command-line options and subcommands.

use tinfer_core::error::report::{ColorOpt, ErrorFormat};

use crate::{
    completions::GenCompletionsCommand, infer::InferCommand, pprint_ast::PprintAstCommand,
};

#[cfg(feature = "repl")]
use crate::repl::ReplCommand;

#[derive(clap::Parser, Debug)]
/// Type inference for L5 programs.
#[command(
    author,
    about,
    long_about = None,
    version = format!("{} {}", env!("CARGO_BIN_NAME"), env!("CARGO_PKG_VERSION"))
)]
pub struct Options {
    #[command(flatten)]
    pub global: GlobalOptions,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(clap::Parser, Debug)]
pub struct GlobalOptions {
    /// Configure when to output messages in color
    #[arg(long, global = true, value_enum, default_value_t)]
    pub color: clap::ColorChoice,

    /// Output format of error diagnostics
    #[arg(long, global = true, value_enum, default_value_t)]
    pub error_format: ErrorFormat,
}

impl GlobalOptions {
    pub fn color_opt(&self) -> ColorOpt {
        match self.color {
            clap::ColorChoice::Always => ColorOpt::Always,
            clap::ColorChoice::Never => ColorOpt::Never,
            _ => ColorOpt::Auto,
        }
    }
}

/// Available subcommands.
#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Infers the type of an L5 expression and prints it
    Infer(InferCommand),
    /// Converts the parsed representation (AST) back to L5 source code and prints it. Used for
    /// debugging purpose
    PprintAst(PprintAstCommand),
    /// Starts an interactive session inferring the type of each input line
    #[cfg(feature = "repl")]
    Repl(ReplCommand),

    /// Generate shell completion files
    GenCompletions(GenCompletionsCommand),
}
