use crate::{
    cli::GlobalOptions,
    error::{CliResult, ResultErrorExt},
    input::{InputOptions, Prepare},
};

#[derive(clap::Parser, Debug)]
pub struct InferCommand {
    #[command(flatten)]
    inputs: InputOptions,
}

impl InferCommand {
    pub fn run(self, global: GlobalOptions) -> CliResult<()> {
        let program = self.inputs.prepare(&global)?;

        match program.infer() {
            Ok(typ) => {
                println!("{typ}");
                Ok(())
            }
            Err(error) => Err(error).report_with_program(program, global.error_format),
        }
    }
}
