//! Program handling, from source reading to type inference.
//!
//! A program is an L5 expression (or a whole `(L5 ...)` program) loaded from an input. This module
//! offers an interface to load a program source, parse it, infer its type and report errors.
use crate::{
    error::{
        report::{self, ColorOpt, ErrorFormat},
        Error, FileId, Files, IOError, IntoDiagnostics,
    },
    parser,
    term::RichTerm,
    typ::Type,
    typecheck::{self, Environment, State},
};

use std::{
    ffi::OsString,
    io::{self, Read},
    path::PathBuf,
};

/// Manage a file database, which stores the source code of the program, and the options used to
/// report errors.
pub struct Program {
    /// The id of the program source in the file database.
    main_id: FileId,
    /// The file database. Positions in errors refer to it.
    files: Files<String>,
    /// The color option to use when reporting errors.
    pub color_opt: ColorOpt,
}

/// The possible input sources, anything that a program can be created from.
pub enum Input<T, S> {
    /// A filepath.
    Path(S),
    /// The source is anything that can be read from, the second argument is the name the source
    /// should have in the file database.
    Source(T, S),
}

impl Program {
    /// Create a program by reading it from the standard input.
    pub fn new_from_stdin() -> io::Result<Self> {
        Program::new_from_source(io::stdin(), "<stdin>")
    }

    /// Create a program by reading it from a file.
    pub fn new_from_file(path: impl Into<OsString>) -> io::Result<Self> {
        // The `Read` type parameter is a dummy, only required to name `Input`.
        Self::new_from_input(Input::<std::fs::File, _>::Path(path))
    }

    /// Create a program by reading it from a generic source.
    pub fn new_from_source<T, S>(source: T, source_name: S) -> io::Result<Self>
    where
        T: Read,
        S: Into<OsString>,
    {
        Self::new_from_input(Input::Source(source, source_name))
    }

    /// Constructor that abstracts over the input type (file, string, etc.). Used by the other
    /// constructors.
    pub fn new_from_input<T, S>(input: Input<T, S>) -> io::Result<Self>
    where
        T: Read,
        S: Into<OsString>,
    {
        let mut files = Files::new();

        let main_id = match input {
            Input::Path(path) => {
                let path = PathBuf::from(path.into());
                let source = std::fs::read_to_string(&path)?;
                files.add(path, source)
            }
            Input::Source(mut source, name) => {
                let mut buffer = String::new();
                source.read_to_string(&mut buffer)?;
                files.add(name, buffer)
            }
        };

        log::debug!("loaded program source {:?}", files.name(main_id));

        Ok(Program {
            main_id,
            files,
            color_opt: ColorOpt::default(),
        })
    }

    /// Set the color option used when reporting errors.
    pub fn with_color(mut self, color_opt: ColorOpt) -> Self {
        self.color_opt = color_opt;
        self
    }

    /// The source code of the program.
    pub fn source(&self) -> &str {
        self.files.source(self.main_id)
    }

    /// Parse the program source.
    pub fn parse(&self) -> Result<RichTerm, Error> {
        parser::parse(self.main_id, self.source()).map_err(Error::from)
    }

    /// Parse the program and infer its type in the empty environment.
    pub fn infer(&self) -> Result<Type, Error> {
        let rt = self.parse()?;
        let mut state = State::new();

        typecheck::type_check_in_env(&rt, &mut state, &Environment::new()).map_err(Error::from)
    }

    /// Wrapper for [`report`].
    pub fn report<E>(&mut self, error: E, format: ErrorFormat)
    where
        E: IntoDiagnostics<FileId>,
    {
        report::report(&mut self.files, error, format, self.color_opt)
    }

    /// Report an error on an arbitrary writer, without colors.
    pub fn report_to_string<E>(&mut self, error: E, format: ErrorFormat) -> Result<String, IOError>
    where
        E: IntoDiagnostics<FileId>,
    {
        use codespan_reporting::term::termcolor::NoColor;

        let mut buffer = NoColor::new(Vec::new());
        report::report_with(&mut buffer, &mut self.files, error, format);

        String::from_utf8(buffer.into_inner()).map_err(|err| IOError(err.to_string()))
    }
}
