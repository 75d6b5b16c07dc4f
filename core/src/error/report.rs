//! Error diagnostics reporting and serialization.
use super::*;

use codespan_reporting::term::termcolor::{ColorChoice, StandardStream, WriteColor};

/// Serializable wrapper type to export diagnostics with a top-level attribute.
#[derive(serde::Serialize)]
pub struct DiagnosticsWrapper {
    pub diagnostics: Vec<Diagnostic<FileId>>,
}

impl From<Vec<Diagnostic<FileId>>> for DiagnosticsWrapper {
    fn from(diagnostics: Vec<Diagnostic<FileId>>) -> Self {
        Self { diagnostics }
    }
}

/// Available export formats for error diagnostics.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum ErrorFormat {
    #[default]
    Text,
    Json,
    Yaml,
}

pub type ColorOpt = colorchoice::ColorChoice;

fn colors_for_terminal(color_opt: ColorOpt, is_terminal: bool) -> ColorChoice {
    match color_opt {
        colorchoice::ColorChoice::Auto => {
            if is_terminal {
                ColorChoice::Auto
            } else {
                ColorChoice::Never
            }
        }
        colorchoice::ColorChoice::Always => ColorChoice::Always,
        colorchoice::ColorChoice::AlwaysAnsi => ColorChoice::AlwaysAnsi,
        colorchoice::ColorChoice::Never => ColorChoice::Never,
    }
}

/// Pretty-print an error on stderr.
///
/// # Arguments
///
/// - `files` is the file database the error positions refer to, which is required by the
///   reporting infrastructure to point at specific locations and print snippets.
pub fn report<E: IntoDiagnostics<FileId>>(
    files: &mut Files<String>,
    error: E,
    format: ErrorFormat,
    color_opt: ColorOpt,
) {
    use std::io::{stderr, IsTerminal};

    report_with(
        &mut StandardStream::stderr(colors_for_terminal(color_opt, stderr().is_terminal())).lock(),
        files,
        error,
        format,
    )
}

/// Report an error on `writer`, provided a file database.
pub fn report_with<E: IntoDiagnostics<FileId>>(
    writer: &mut dyn WriteColor,
    files: &mut Files<String>,
    error: E,
    format: ErrorFormat,
) {
    let config = codespan_reporting::term::Config::default();
    let diagnostics = error.into_diagnostics(files);

    let result = match format {
        ErrorFormat::Text => diagnostics.iter().try_for_each(|d| {
            codespan_reporting::term::emit(writer, &config, files, d).map_err(|err| err.to_string())
        }),
        ErrorFormat::Json => {
            serde_json::to_writer(&mut *writer, &DiagnosticsWrapper::from(diagnostics))
                .map_err(|err| err.to_string())
                .and_then(|_| writeln!(writer).map_err(|err| err.to_string()))
        }
        ErrorFormat::Yaml => {
            serde_yaml::to_writer(&mut *writer, &DiagnosticsWrapper::from(diagnostics))
                .map_err(|err| err.to_string())
        }
    };

    if let Err(err) = result {
        log::error!("could not report an error: {err}");
    }
}
