//! Entry point of the program.

#[cfg(feature = "repl")]
mod repl;

mod cli;
mod completions;
mod error;
mod infer;
mod input;
mod pprint_ast;

use std::{process, thread};

use crate::cli::{Command, Options};

/// Inference recurses over the AST, which can overflow the default stack of the main thread on
/// deeply nested programs.
const STACK_SIZE: usize = 16 * 1024 * 1024;

fn main() {
    env_logger::init();

    let opts = <Options as clap::Parser>::parse();

    let handle = thread::Builder::new()
        .name(String::from("tinfer"))
        .stack_size(STACK_SIZE)
        .spawn(move || run(opts));

    let success = match handle {
        Ok(handle) => handle.join().unwrap_or(false),
        Err(err) => {
            eprintln!("Failed to spawn the inference thread: {err}");
            false
        }
    };

    if !success {
        process::exit(1)
    }
}

/// Run a command and report its error, if any. Return `true` on success.
fn run(opts: Options) -> bool {
    let result = match opts.command {
        Command::Infer(infer) => infer.run(opts.global),

        Command::PprintAst(pprint_ast) => pprint_ast.run(opts.global),

        #[cfg(feature = "repl")]
        Command::Repl(repl) => repl.run(opts.global),

        Command::GenCompletions(completions) => {
            completions.run(opts.global);
            Ok(())
        }
    };

    match result {
        Ok(()) => true,
        Err(error) => {
            error.report();
            false
        }
    }
}
