//! Error types and error reporting.
//!
//! Define error types for the different phases of the pipeline, together with functions to
//! generate a [codespan](https://crates.io/crates/codespan-reporting) diagnostic from them.
pub use codespan::{FileId, Files};
pub use codespan_reporting::diagnostic::{Diagnostic, Label, LabelStyle};

use std::fmt;

use crate::{
    identifier::LocIdent,
    position::{RawSpan, TermPos},
    typ::Type,
};

pub mod report;

/// A general error occurring during either parsing or typechecking.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    ParseError(ParseError),
    TypecheckError(TypecheckError),
    IOError(IOError),
}

/// An error occurring during the static typechecking phase.
#[derive(Debug, Clone, PartialEq)]
pub enum TypecheckError {
    /// An unbound identifier was referenced.
    UnboundIdentifier { id: LocIdent, pos: TermPos },
    /// Two incompatible types have been deduced for the same expression: either two distinct
    /// atomic types, or two types of a different shape.
    TypeMismatch {
        /// The expected type.
        expected: Type,
        /// The inferred type.
        inferred: Type,
        /// The position of the expression that was being typechecked.
        pos: TermPos,
    },
    /// Two procedure types with a different number of parameters, or two lists of types of
    /// different lengths, have been unified.
    ArityMismatch {
        expected_arity: usize,
        inferred_arity: usize,
        /// The two procedure types, if the mismatch comes from procedure types.
        types: Option<(Type, Type)>,
        pos: TermPos,
    },
    /// A unification variable would have to be bound to a type containing itself.
    OccursCheck {
        /// The variable, as printed.
        var: Type,
        /// The type the variable occurs in.
        typ: Type,
        pos: TermPos,
    },
    /// A construct that can't be typed: a `letrec` binding something else than a procedure, a
    /// whole program, a quoted literal or an assignment.
    UnsupportedConstruct {
        construct: String,
        reason: String,
        /// The expression, printed.
        context: String,
        pos: TermPos,
    },
    /// Several independent checks failed.
    Multiple {
        /// The expression being checked, printed.
        context: String,
        errors: Vec<TypecheckError>,
        pos: TermPos,
    },
    /// A type expression that should never have reached the unifier.
    BadTypeExpression { typ: Type, pos: TermPos },
}

impl TypecheckError {
    /// The position of the expression that failed to typecheck.
    pub fn pos(&self) -> TermPos {
        match self {
            TypecheckError::UnboundIdentifier { pos, .. }
            | TypecheckError::TypeMismatch { pos, .. }
            | TypecheckError::ArityMismatch { pos, .. }
            | TypecheckError::OccursCheck { pos, .. }
            | TypecheckError::UnsupportedConstruct { pos, .. }
            | TypecheckError::Multiple { pos, .. }
            | TypecheckError::BadTypeExpression { pos, .. } => *pos,
        }
    }

    /// The individual errors, in order, with all the [TypecheckError::Multiple] flattened.
    pub fn leaves(&self) -> Vec<&TypecheckError> {
        match self {
            TypecheckError::Multiple { errors, .. } => {
                errors.iter().flat_map(TypecheckError::leaves).collect()
            }
            err => vec![err],
        }
    }
}

/// An error occurring during parsing.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ParseError {
    /// Unexpected end of file.
    UnexpectedEOF(FileId, /* tokens expected by the parser */ Vec<String>),
    /// Unexpected token.
    UnexpectedToken(
        RawSpan,
        /* tokens expected by the parser */ Vec<String>,
    ),
    /// Superfluous, unexpected token.
    ExtraToken(RawSpan),
    /// A character that can't start any token.
    UnexpectedChar(RawSpan),
    /// Invalid escape sequence in a string literal.
    InvalidEscapeSequence(RawSpan),
    /// A string literal that is never closed.
    UnterminatedString(RawSpan),
    /// A special form (`if`, `lambda`, `let`, etc.) used with the wrong structure.
    MalformedExpression {
        pos: TermPos,
        /// The special form.
        form: String,
        message: String,
    },
    /// An ill-formed type annotation.
    MalformedType { pos: TermPos, message: String },
}

/// A general I/O error, occurring when reading a source file or writing an export.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct IOError(pub String);

impl From<ParseError> for Error {
    fn from(error: ParseError) -> Error {
        Error::ParseError(error)
    }
}

impl From<TypecheckError> for Error {
    fn from(error: TypecheckError) -> Error {
        Error::TypecheckError(error)
    }
}

impl From<IOError> for Error {
    fn from(error: IOError) -> Error {
        Error::IOError(error)
    }
}

impl From<std::io::Error> for IOError {
    fn from(error: std::io::Error) -> IOError {
        IOError(error.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Error {
        Error::IOError(IOError::from(error))
    }
}

impl fmt::Display for TypecheckError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypecheckError::UnboundIdentifier { id, .. } => write!(f, "unbound identifier `{id}`"),
            TypecheckError::TypeMismatch {
                expected, inferred, ..
            } => {
                let kind = if expected.typ.is_atomic() && inferred.typ.is_atomic() {
                    "incompatible atomic types"
                } else {
                    "incompatible type structures"
                };

                write!(f, "{kind}: expected `{expected}`, found `{inferred}`")
            }
            TypecheckError::ArityMismatch {
                types: Some((expected, inferred)),
                ..
            } => write!(
                f,
                "wrong number of arguments: expected `{expected}`, found `{inferred}`"
            ),
            TypecheckError::ArityMismatch {
                expected_arity,
                inferred_arity,
                types: None,
                ..
            } => write!(
                f,
                "wrong number of arguments: expected {expected_arity} type(s), found {inferred_arity}"
            ),
            TypecheckError::OccursCheck { var, typ, .. } => {
                write!(f, "occurs check failed: `{var}` occurs in `{typ}`")
            }
            TypecheckError::UnsupportedConstruct {
                construct, reason, ..
            } => write!(f, "unsupported construct `{construct}`: {reason}"),
            TypecheckError::Multiple {
                context, errors, ..
            } => {
                write!(f, "errors while checking `{context}`: ")?;

                for (idx, err) in errors.iter().enumerate() {
                    if idx > 0 {
                        write!(f, "; ")?;
                    }
                    write!(f, "{err}")?;
                }

                Ok(())
            }
            TypecheckError::BadTypeExpression { typ, .. } => {
                write!(f, "bad type expression `{typ}`")
            }
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::UnexpectedEOF(_, expected) if expected.is_empty() => {
                write!(f, "unexpected end of file")
            }
            ParseError::UnexpectedEOF(_, expected) => {
                write!(f, "unexpected end of file, expected {}", expected.join(" or "))
            }
            ParseError::UnexpectedToken(_, expected) => {
                write!(f, "unexpected token, expected {}", expected.join(" or "))
            }
            ParseError::ExtraToken(_) => write!(f, "superfluous unexpected token"),
            ParseError::UnexpectedChar(_) => write!(f, "unexpected character"),
            ParseError::InvalidEscapeSequence(_) => write!(f, "invalid escape sequence"),
            ParseError::UnterminatedString(_) => write!(f, "unterminated string literal"),
            ParseError::MalformedExpression { form, message, .. } => {
                write!(f, "malformed {form}: {message}")
            }
            ParseError::MalformedType { message, .. } => {
                write!(f, "malformed type: {message}")
            }
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ParseError(err) => write!(f, "{err}"),
            Error::TypecheckError(err) => write!(f, "{err}"),
            Error::IOError(IOError(msg)) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for Error {}

/// A trait for converting an error to a diagnostic.
pub trait IntoDiagnostics<FileId> {
    /// Convert an error to a list of printable formatted diagnostic.
    ///
    /// # Arguments
    ///
    /// - `files`: to know why it takes a mutable reference to `Files<String>`, see `label_alt`.
    ///
    /// # Return
    ///
    /// Return a list of diagnostics. Most errors generate only one, but an aggregate of several
    /// typechecking errors generates one per error.
    fn into_diagnostics(self, files: &mut Files<String>) -> Vec<Diagnostic<FileId>>;
}

// Allow the use of a single `Diagnostic` directly as an error that can be reported.
impl<FileId> IntoDiagnostics<FileId> for Diagnostic<FileId> {
    fn into_diagnostics(self, _files: &mut Files<String>) -> Vec<Diagnostic<FileId>> {
        vec![self]
    }
}

// Helpers for the creation of codespan `Label`s

/// Create a primary label from a span.
fn primary(span: &RawSpan) -> Label<FileId> {
    Label::primary(span.src_id, span.start.to_usize()..span.end.to_usize())
}

/// Create a label from an optional span, or fallback to annotating the alternative snippet
/// `alt_term` if the span is `None`.
///
/// When `span_opt` is `None`, the code snippet `alt_term` is added to `files` under a special name
/// and is referred to instead.
///
/// This is useful because some expressions are built programmatically and correspond to nothing
/// in a source file. In such cases it may still be valuable to print the expression (or a
/// terse representation) in the error diagnostic.
fn label_alt(
    span_opt: Option<RawSpan>,
    alt_term: String,
    style: LabelStyle,
    files: &mut Files<String>,
) -> Label<FileId> {
    match span_opt {
        Some(span) => Label::new(
            style,
            span.src_id,
            span.start.to_usize()..span.end.to_usize(),
        ),
        None => {
            let range = 0..alt_term.len();
            Label::new(style, files.add("<unknown> (generated)", alt_term), range)
        }
    }
}

/// Create a primary label from an optional span, or fallback to annotating the alternative
/// snippet `alt_term` if the span is `None`.
///
/// See [`label_alt`].
fn primary_alt(span_opt: Option<RawSpan>, alt_term: String, files: &mut Files<String>) -> Label<FileId> {
    label_alt(span_opt, alt_term, LabelStyle::Primary, files)
}

/// Generate the label pointing at the expression that failed to typecheck.
fn mk_expr_label(span_opt: &TermPos) -> Vec<Label<FileId>> {
    span_opt
        .as_opt_ref()
        .map(|span| vec![primary(span).with_message("this expression")])
        .unwrap_or_default()
}

fn mk_expected_msg<T: ToString>(expected: &T) -> String {
    format!("Expected an expression of type `{}`", expected.to_string())
}

fn mk_inferred_msg<T: ToString>(inferred: &T) -> String {
    format!("Found an expression of type `{}`", inferred.to_string())
}

impl IntoDiagnostics<FileId> for Error {
    fn into_diagnostics(self, files: &mut Files<String>) -> Vec<Diagnostic<FileId>> {
        match self {
            Error::ParseError(err) => err.into_diagnostics(files),
            Error::TypecheckError(err) => err.into_diagnostics(files),
            Error::IOError(err) => err.into_diagnostics(files),
        }
    }
}

impl IntoDiagnostics<FileId> for ParseError {
    fn into_diagnostics(self, files: &mut Files<String>) -> Vec<Diagnostic<FileId>> {
        let message = self.to_string();

        let diagnostic = match self {
            ParseError::UnexpectedEOF(file_id, _expected) => {
                let end = files.source_span(file_id).end();
                Diagnostic::error()
                    .with_message(format!(
                        "unexpected end of file when parsing {}",
                        files.name(file_id).to_string_lossy()
                    ))
                    .with_labels(vec![primary(&RawSpan {
                        start: end,
                        end,
                        src_id: file_id,
                    })])
                    .with_notes(vec![message])
            }
            ParseError::UnexpectedToken(span, _)
            | ParseError::ExtraToken(span)
            | ParseError::UnexpectedChar(span)
            | ParseError::InvalidEscapeSequence(span)
            | ParseError::UnterminatedString(span) => Diagnostic::error()
                .with_message(message)
                .with_labels(vec![primary(&span)]),
            ParseError::MalformedExpression { pos, .. } | ParseError::MalformedType { pos, .. } => {
                Diagnostic::error()
                    .with_message(message)
                    .with_labels(pos.as_opt_ref().map(|span| vec![primary(span)]).unwrap_or_default())
            }
        };

        vec![diagnostic]
    }
}

impl IntoDiagnostics<FileId> for TypecheckError {
    fn into_diagnostics(self, files: &mut Files<String>) -> Vec<Diagnostic<FileId>> {
        let message = self.to_string();

        match self {
            TypecheckError::UnboundIdentifier { id, pos } => vec![Diagnostic::error()
                .with_message(format!("unbound identifier `{id}`"))
                .with_labels(vec![primary_alt(
                    pos.into_opt(),
                    id.to_string(),
                    files,
                )
                .with_message("this identifier is unbound")])],
            TypecheckError::TypeMismatch {
                expected,
                inferred,
                pos,
            } => vec![Diagnostic::error()
                .with_message(message)
                .with_labels(mk_expr_label(&pos))
                .with_notes(vec![
                    mk_expected_msg(&expected),
                    mk_inferred_msg(&inferred),
                    String::from("These types are not compatible"),
                ])],
            TypecheckError::ArityMismatch {
                expected_arity,
                inferred_arity,
                pos,
                ..
            } => vec![Diagnostic::error()
                .with_message(message)
                .with_labels(mk_expr_label(&pos))
                .with_notes(vec![format!(
                    "The expected procedure takes {expected_arity} argument(s), but the \
                    inferred one takes {inferred_arity}"
                )])],
            TypecheckError::OccursCheck { var, typ, pos } => vec![Diagnostic::error()
                .with_message("occurs check failed")
                .with_labels(mk_expr_label(&pos))
                .with_notes(vec![
                    format!("The type variable `{var}` occurs in `{typ}`"),
                    String::from("Binding the variable would create an infinite type"),
                ])],
            TypecheckError::UnsupportedConstruct {
                construct,
                reason,
                context,
                pos,
            } => vec![Diagnostic::error()
                .with_message(format!("unsupported construct `{construct}`"))
                .with_labels(vec![primary_alt(pos.into_opt(), context, files)
                    .with_message("this expression can't be typed")])
                .with_notes(vec![reason])],
            TypecheckError::Multiple {
                context,
                errors,
                pos,
            } => {
                let mut diags = vec![Diagnostic::error()
                    .with_message(format!("{} errors while checking an expression", errors.len()))
                    .with_labels(vec![primary_alt(pos.into_opt(), context, files)])];

                diags.extend(errors.into_iter().flat_map(|err| err.into_diagnostics(files)));
                diags
            }
            TypecheckError::BadTypeExpression { typ, pos } => vec![Diagnostic::bug()
                .with_message(format!("bad type expression `{typ}`"))
                .with_labels(mk_expr_label(&pos))
                .with_notes(vec![String::from(INTERNAL_ERROR_MSG)])],
        }
    }
}

impl IntoDiagnostics<FileId> for IOError {
    fn into_diagnostics(self, _files: &mut Files<String>) -> Vec<Diagnostic<FileId>> {
        match self {
            IOError(msg) => vec![Diagnostic::error().with_message(msg)],
        }
    }
}

pub const INTERNAL_ERROR_MSG: &str =
    "This error should not happen. This is likely a bug in the type inference engine.";
