use crate::{
    cli::GlobalOptions,
    error::{CliResult, ResultErrorExt},
    input::{InputOptions, Prepare},
};

#[derive(clap::Parser, Debug)]
pub struct PprintAstCommand {
    #[command(flatten)]
    inputs: InputOptions,
}

impl PprintAstCommand {
    pub fn run(self, global: GlobalOptions) -> CliResult<()> {
        let program = self.inputs.prepare(&global)?;

        match program.parse() {
            Ok(rt) => {
                println!("{rt}");
                Ok(())
            }
            Err(error) => Err(error).report_with_program(program, global.error_format),
        }
    }
}
