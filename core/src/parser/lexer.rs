//! The lexer, transforming an input string to a stream of tokens.
//!
//! The token set of an s-expression language is tiny: parentheses, the quote sugar, boolean,
//! string and number literals, and symbols. Everything else (keywords, type annotations, the `:`
//! and `->` markers) is a symbol, and is given a meaning later by the parser.
use super::error::{LexicalError, LexicalErrorKind};
use logos::Logos;
use std::ops::Range;

/// Decode the escape sequences of a string literal. `slice` includes the surrounding double
/// quotes.
fn unescape<'input>(
    lex: &mut logos::Lexer<'input, Token<'input>>,
) -> Result<String, LexicalErrorKind> {
    let slice = lex.slice();
    let inner = &slice[1..slice.len() - 1];
    let mut result = String::with_capacity(inner.len());
    let mut chars = inner.chars();

    while let Some(c) = chars.next() {
        if c == '\\' {
            let escaped = chars
                .next()
                .and_then(escape_char)
                .ok_or(LexicalErrorKind::InvalidEscapeSequence)?;
            result.push(escaped);
        } else {
            result.push(c);
        }
    }

    Ok(result)
}

/// Generate the character corresponding to an escape char.
fn escape_char(chr: char) -> Option<char> {
    match chr {
        '"' => Some('"'),
        '\\' => Some('\\'),
        'n' => Some('\n'),
        'r' => Some('\r'),
        't' => Some('\t'),
        _ => None,
    }
}

#[derive(Logos, Debug, PartialEq, Clone)]
#[logos(error = LexicalErrorKind)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(skip r";[^\n]*")]
pub enum Token<'input> {
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("'")]
    Quote,
    #[token("#t")]
    True,
    #[token("#f")]
    False,
    #[regex(r#""([^"\\]|\\.)*""#, unescape)]
    Str(String),
    #[regex(
        r"[+-]?([0-9]+(\.[0-9]*)?|\.[0-9]+)([eE][+-]?[0-9]+)?",
        |lex| lex.slice().parse::<f64>().ok(),
        priority = 4
    )]
    Num(f64),
    #[regex(r#"[^ \t\r\n\f()'";#][^ \t\r\n\f()'";]*"#, priority = 1)]
    Symbol(&'input str),
}

impl Token<'_> {
    /// A human-readable description of the token, used in "expected ..." error messages.
    pub fn describe(&self) -> String {
        match self {
            Token::LParen => "`(`".into(),
            Token::RParen => "`)`".into(),
            Token::Quote => "`'`".into(),
            Token::True => "`#t`".into(),
            Token::False => "`#f`".into(),
            Token::Str(_) => "string literal".into(),
            Token::Num(_) => "number literal".into(),
            Token::Symbol(s) => format!("`{s}`"),
        }
    }
}

/// A token together with its starting and ending byte offsets.
pub type SpannedToken<'input> = (usize, Token<'input>, usize);

/// A wrapper around the logos lexer, attaching spans to tokens and errors.
pub struct Lexer<'input> {
    source: &'input str,
    logos_lexer: logos::SpannedIter<'input, Token<'input>>,
    /// Set after an unterminated string: nothing sensible can be lexed after it.
    finished: bool,
}

impl<'input> Lexer<'input> {
    pub fn new(source: &'input str) -> Self {
        Lexer {
            source,
            logos_lexer: Token::lexer(source).spanned(),
            finished: false,
        }
    }

    fn error(&self, kind: LexicalErrorKind, span: Range<usize>) -> LexicalError {
        // An opening quote that couldn't be matched by the string regex starts an unterminated
        // string, which extends to the end of the input.
        if kind == LexicalErrorKind::UnexpectedChar && self.source[span.clone()].starts_with('"')
        {
            LexicalError::new(
                LexicalErrorKind::UnterminatedString,
                span.start..self.source.len(),
            )
        } else {
            LexicalError::new(kind, span)
        }
    }
}

impl<'input> Iterator for Lexer<'input> {
    type Item = Result<SpannedToken<'input>, LexicalError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let (result, span) = self.logos_lexer.next()?;

        Some(match result {
            Ok(token) => Ok((span.start, token, span.end)),
            Err(kind) => {
                let err = self.error(kind, span);
                self.finished = err.kind == LexicalErrorKind::UnterminatedString;
                Err(err)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn lex(s: &str) -> Result<Vec<Token<'_>>, LexicalError> {
        Lexer::new(s)
            .map(|result| result.map(|(_, tok, _)| tok))
            .collect()
    }

    #[test]
    fn basic_tokens() {
        assert_eq!(
            lex("(lambda ((x : number)) x)").unwrap(),
            vec![
                Token::LParen,
                Token::Symbol("lambda"),
                Token::LParen,
                Token::LParen,
                Token::Symbol("x"),
                Token::Symbol(":"),
                Token::Symbol("number"),
                Token::RParen,
                Token::RParen,
                Token::Symbol("x"),
                Token::RParen,
            ]
        );
    }

    #[test]
    fn literals() {
        assert_eq!(
            lex(r#"#t #f 42 -3.5 .5 "a\"b\n" 'x"#).unwrap(),
            vec![
                Token::True,
                Token::False,
                Token::Num(42.0),
                Token::Num(-3.5),
                Token::Num(0.5),
                Token::Str("a\"b\n".into()),
                Token::Quote,
                Token::Symbol("x"),
            ]
        );
    }

    #[test]
    fn operators_are_symbols() {
        assert_eq!(
            lex("+ - * / < > = -> string=? number?").unwrap(),
            vec![
                Token::Symbol("+"),
                Token::Symbol("-"),
                Token::Symbol("*"),
                Token::Symbol("/"),
                Token::Symbol("<"),
                Token::Symbol(">"),
                Token::Symbol("="),
                Token::Symbol("->"),
                Token::Symbol("string=?"),
                Token::Symbol("number?"),
            ]
        );
    }

    #[test]
    fn comments_are_skipped() {
        assert_eq!(
            lex("; a comment\n1 ; another one").unwrap(),
            vec![Token::Num(1.0)]
        );
    }

    #[test]
    fn spans() {
        let spans: Vec<_> = Lexer::new("(f  12)")
            .map(|result| result.map(|(start, _, end)| start..end).unwrap())
            .collect();
        assert_eq!(spans, vec![0..1, 1..2, 4..6, 6..7]);
    }

    #[test]
    fn invalid_escape() {
        let err = lex(r#""a\qb""#).unwrap_err();
        assert_eq!(err.kind, LexicalErrorKind::InvalidEscapeSequence);
        assert_eq!(err.span, 0..6);
    }

    #[test]
    fn unterminated_string() {
        let err = lex(r#"(f "abc"#).unwrap_err();
        assert_eq!(err.kind, LexicalErrorKind::UnterminatedString);
        assert_eq!(err.span, 3..7);
    }
}
