use std::path::PathBuf;

use tinfer_core::program::Program;

use crate::{cli::GlobalOptions, error::CliResult};

#[derive(clap::Parser, Debug)]
pub struct InputOptions {
    /// Input file, omit to read from stdin
    pub file: Option<PathBuf>,
}

pub trait Prepare {
    fn prepare(&self, global: &GlobalOptions) -> CliResult<Program>;
}

impl Prepare for InputOptions {
    fn prepare(&self, global: &GlobalOptions) -> CliResult<Program> {
        let program = match &self.file {
            None => Program::new_from_stdin(),
            Some(path) => Program::new_from_file(path),
        }?;

        Ok(program.with_color(global.color_opt()))
    }
}
