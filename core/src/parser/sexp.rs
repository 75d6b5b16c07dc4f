//! The s-expression reader.
//!
//! The first parsing stage turns the token stream into a tree of s-expressions, without giving
//! any meaning to the symbols. The quote sugar `'d` is expanded to `(quote d)` at this stage.
use codespan::FileId;

use super::{
    error::{LexicalError, LexicalErrorKind},
    lexer::{Lexer, SpannedToken, Token},
};
use crate::{
    error::ParseError,
    identifier::Ident,
    position::{RawSpan, TermPos},
};

/// An atomic s-expression.
#[derive(Clone, Debug, PartialEq)]
pub enum Atom {
    Num(f64),
    Bool(bool),
    Str(String),
    Symbol(Ident),
}

#[derive(Clone, Debug, PartialEq)]
pub enum SExpF {
    Atom(Atom),
    List(Vec<SExp>),
}

/// An s-expression together with its position. Equality ignores positions.
#[derive(Clone, Debug)]
pub struct SExp {
    pub data: SExpF,
    pub pos: TermPos,
}

impl PartialEq for SExp {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
    }
}

impl SExp {
    pub fn new(data: SExpF, pos: TermPos) -> Self {
        SExp { data, pos }
    }

    /// Return the name of the symbol if this s-expression is a symbol.
    pub fn as_symbol(&self) -> Option<&str> {
        match &self.data {
            SExpF::Atom(Atom::Symbol(id)) => Some(id.label()),
            _ => None,
        }
    }

    /// Is this s-expression the symbol `name`?
    pub fn is_symbol(&self, name: &str) -> bool {
        self.as_symbol() == Some(name)
    }

    pub fn as_list(&self) -> Option<&[SExp]> {
        match &self.data {
            SExpF::List(elts) => Some(elts),
            _ => None,
        }
    }
}

impl ParseError {
    pub(crate) fn from_lexical(error: LexicalError, file_id: FileId) -> Self {
        let span = RawSpan::from_range(file_id, error.span);

        match error.kind {
            LexicalErrorKind::UnexpectedChar => ParseError::UnexpectedChar(span),
            LexicalErrorKind::InvalidEscapeSequence => ParseError::InvalidEscapeSequence(span),
            LexicalErrorKind::UnterminatedString => ParseError::UnterminatedString(span),
        }
    }
}

/// A recursive descent reader over the token stream.
struct Reader<'input> {
    file_id: FileId,
    lexer: Lexer<'input>,
}

impl<'input> Reader<'input> {
    fn new(file_id: FileId, source: &'input str) -> Self {
        Reader {
            file_id,
            lexer: Lexer::new(source),
        }
    }

    fn span(&self, start: usize, end: usize) -> RawSpan {
        RawSpan::from_range(self.file_id, start..end)
    }

    fn next_token(&mut self) -> Result<Option<SpannedToken<'input>>, ParseError> {
        self.lexer
            .next()
            .transpose()
            .map_err(|err| ParseError::from_lexical(err, self.file_id))
    }

    fn eof_error(&self) -> ParseError {
        ParseError::UnexpectedEOF(self.file_id, vec!["expression".into(), "`)`".into()])
    }

    /// Read one s-expression. Return `Ok(None)` at the end of the input.
    fn read(&mut self) -> Result<Option<SExp>, ParseError> {
        let Some((start, token, end)) = self.next_token()? else {
            return Ok(None);
        };

        self.read_from(start, token, end).map(Some)
    }

    /// Read the s-expression starting with the given, already consumed, token.
    fn read_from(
        &mut self,
        start: usize,
        token: Token<'input>,
        end: usize,
    ) -> Result<SExp, ParseError> {
        let pos = TermPos::from(self.span(start, end));
        let atom = move |atom: Atom| Ok(SExp::new(SExpF::Atom(atom), pos));

        match token {
            Token::Num(n) => atom(Atom::Num(n)),
            Token::True => atom(Atom::Bool(true)),
            Token::False => atom(Atom::Bool(false)),
            Token::Str(s) => atom(Atom::Str(s)),
            Token::Symbol(s) => atom(Atom::Symbol(Ident::new(s))),
            Token::RParen => Err(ParseError::UnexpectedToken(
                self.span(start, end),
                vec!["expression".into()],
            )),
            Token::Quote => {
                let quote_pos = pos;
                let datum = self.read()?.ok_or_else(|| {
                    ParseError::UnexpectedEOF(self.file_id, vec!["expression".into()])
                })?;
                let pos = quote_pos.fuse(datum.pos);
                let quote = SExp::new(SExpF::Atom(Atom::Symbol(Ident::new("quote"))), quote_pos);

                Ok(SExp::new(SExpF::List(vec![quote, datum]), pos))
            }
            Token::LParen => {
                let mut elts = Vec::new();

                loop {
                    match self.next_token()? {
                        None => return Err(self.eof_error()),
                        Some((_, Token::RParen, close)) => {
                            return Ok(SExp::new(
                                SExpF::List(elts),
                                self.span(start, close).into(),
                            ));
                        }
                        Some((elt_start, elt_token, elt_end)) => {
                            elts.push(self.read_from(elt_start, elt_token, elt_end)?);
                        }
                    }
                }
            }
        }
    }
}

/// Read exactly one s-expression from `source`. Fail if the input is empty or if there is
/// anything but whitespace and comments after the first s-expression.
pub fn read_one(file_id: FileId, source: &str) -> Result<SExp, ParseError> {
    let mut reader = Reader::new(file_id, source);
    let sexp = reader
        .read()?
        .ok_or_else(|| ParseError::UnexpectedEOF(file_id, vec!["expression".into()]))?;

    match reader.next_token()? {
        Some((start, _, end)) => Err(ParseError::ExtraToken(reader.span(start, end))),
        None => Ok(sexp),
    }
}
