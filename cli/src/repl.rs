//! Interactive type inference session using rustyline.
use std::io::Cursor;

use rustyline::{config::ColorMode, error::ReadlineError, Config, DefaultEditor, EditMode};
use tinfer_core::{error::report::ColorOpt, program::Program};

use crate::{cli::GlobalOptions, error::CliResult};

#[derive(clap::Parser, Debug)]
pub struct ReplCommand {
    /// The prompt displayed before each input line
    #[arg(long, default_value = "tinfer> ")]
    prompt: String,
}

/// The config of rustyline's editor. History is only kept in memory.
fn config(color_opt: ColorOpt) -> Config {
    Config::builder()
        .history_ignore_space(true)
        .edit_mode(EditMode::Emacs)
        .color_mode(color_mode_from_opt(color_opt))
        .auto_add_history(true)
        .build()
}

fn color_mode_from_opt(c: ColorOpt) -> ColorMode {
    match c {
        ColorOpt::Always => ColorMode::Forced,
        ColorOpt::AlwaysAnsi | ColorOpt::Auto => ColorMode::Enabled,
        ColorOpt::Never => ColorMode::Disabled,
    }
}

impl ReplCommand {
    pub fn run(self, global: GlobalOptions) -> CliResult<()> {
        let color_opt = global.color_opt();
        let mut editor = DefaultEditor::with_config(config(color_opt))?;

        for input_id in 0.. {
            match editor.readline(&self.prompt) {
                Ok(line) if line.trim().is_empty() => (),
                Ok(line) if matches!(line.trim(), ":q" | ":quit" | ":exit") => break,
                Ok(line) => {
                    let name = format!("<repl-input-{input_id}>");
                    let mut program =
                        Program::new_from_source(Cursor::new(line), name)?.with_color(color_opt);

                    match program.infer() {
                        Ok(typ) => println!("{typ}"),
                        Err(error) => program.report(error, global.error_format),
                    }
                }
                Err(ReadlineError::Interrupted) => (),
                Err(ReadlineError::Eof) => break,
                Err(err) => return Err(err.into()),
            }
        }

        Ok(())
    }
}
