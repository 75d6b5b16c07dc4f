use std::ops::Range;

/// The kind of a lexical error, as reported by the logos lexer.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum LexicalErrorKind {
    /// A character that can't start any token.
    #[default]
    UnexpectedChar,
    /// Invalid escape sequence in a string literal.
    InvalidEscapeSequence,
    /// A string literal without a closing double quote.
    UnterminatedString,
}

/// A lexical error together with the offending byte range.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct LexicalError {
    pub kind: LexicalErrorKind,
    pub span: Range<usize>,
}

impl LexicalError {
    pub fn new(kind: LexicalErrorKind, span: Range<usize>) -> Self {
        LexicalError { kind, span }
    }
}
