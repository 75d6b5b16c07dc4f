use tinfer_core::{error::report::ErrorFormat, program::Program};

pub enum Error {
    /// An error raised while processing a program, reported against its source.
    Program {
        program: Program,
        error: tinfer_core::error::Error,
        format: ErrorFormat,
    },
    Io {
        error: std::io::Error,
    },
    #[cfg(feature = "repl")]
    Repl {
        error: rustyline::error::ReadlineError,
    },
}

pub type CliResult<T> = Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Error::Io { error }
    }
}

#[cfg(feature = "repl")]
impl From<rustyline::error::ReadlineError> for Error {
    fn from(error: rustyline::error::ReadlineError) -> Self {
        Error::Repl { error }
    }
}

pub trait ResultErrorExt<T> {
    fn report_with_program(self, program: Program, format: ErrorFormat) -> CliResult<T>;
}

impl<T> ResultErrorExt<T> for Result<T, tinfer_core::error::Error> {
    fn report_with_program(self, program: Program, format: ErrorFormat) -> CliResult<T> {
        self.map_err(|error| Error::Program {
            program,
            error,
            format,
        })
    }
}

impl Error {
    pub fn report(self) {
        match self {
            Error::Program {
                mut program,
                error,
                format,
            } => program.report(error, format),
            Error::Io { error } => {
                eprintln!("{error}")
            }
            #[cfg(feature = "repl")]
            Error::Repl { error } => {
                eprintln!("Readline error: {error}")
            }
        }
    }
}
