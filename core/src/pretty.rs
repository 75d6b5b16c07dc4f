//! Pretty printing of types and expressions.
//!
//! Expressions are printed back in the concrete L5 syntax, types in the annotation syntax, so that
//! the output of the printer can be read back by the parser.
use std::fmt;

use crate::{
    parser::sexp::{Atom, SExp, SExpF},
    term::*,
    typ::*,
};

use pretty::docs;
pub use pretty::{DocAllocator, DocBuilder, Pretty};

/// Render a value to a formatter, with a line width of 80.
pub fn fmt_pretty<T>(value: &T, f: &mut fmt::Formatter) -> fmt::Result
where
    T: for<'a> Pretty<'a, Allocator, ()> + Clone,
{
    let allocator = Allocator::default();
    let doc: DocBuilder<_, ()> = value.clone().pretty(&allocator);
    doc.render_fmt(80, f)
}

/// The pretty-printing allocator.
pub struct Allocator {
    inner: pretty::BoxAllocator,
}

impl Default for Allocator {
    fn default() -> Self {
        Self {
            inner: pretty::BoxAllocator,
        }
    }
}

impl<'a> DocAllocator<'a> for Allocator {
    type Doc = pretty::BoxDoc<'a>;

    fn alloc(&'a self, doc: pretty::Doc<'a, Self::Doc>) -> Self::Doc {
        self.inner.alloc(doc)
    }

    fn alloc_column_fn(
        &'a self,
        f: impl Fn(usize) -> Self::Doc + 'a,
    ) -> <Self::Doc as pretty::DocPtr<'a, ()>>::ColumnFn {
        self.inner.alloc_column_fn(f)
    }

    fn alloc_width_fn(
        &'a self,
        f: impl Fn(isize) -> Self::Doc + 'a,
    ) -> <Self::Doc as pretty::DocPtr<'a, ()>>::WidthFn {
        self.inner.alloc_width_fn(f)
    }
}

impl Allocator {
    /// A parenthesized list of documents, laid out on one line if it fits, or with the elements
    /// after the head indented on their own lines otherwise.
    fn sexp<'a, I>(&'a self, items: I) -> DocBuilder<'a, Self>
    where
        I: IntoIterator<Item = DocBuilder<'a, Self>>,
    {
        self.intersperse(items, self.line())
            .nest(2)
            .group()
            .parens()
    }

    fn var_decl<'a>(&'a self, decl: &VarDecl) -> DocBuilder<'a, Self> {
        if decl.typ.is_wildcard() {
            self.text(decl.id.label().to_owned())
        } else {
            docs![
                self,
                decl.id.label().to_owned(),
                " : ",
                decl.typ.pretty(self)
            ]
            .parens()
        }
    }

    fn bindings<'a>(&'a self, bindings: &[Binding]) -> DocBuilder<'a, Self> {
        self.sexp(bindings.iter().map(|binding| {
            self.sexp([self.var_decl(&binding.var), binding.val.pretty(self)])
        }))
    }

    fn body<'a>(&'a self, body: &[RichTerm]) -> Vec<DocBuilder<'a, Self>> {
        body.iter().map(|rt| rt.pretty(self)).collect()
    }
}

/// Escape a string literal and surround it with double quotes.
fn escape_string(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 2);
    result.push('"');

    for c in s.chars() {
        match c {
            '"' => result.push_str("\\\""),
            '\\' => result.push_str("\\\\"),
            '\n' => result.push_str("\\n"),
            '\t' => result.push_str("\\t"),
            '\r' => result.push_str("\\r"),
            c => result.push(c),
        }
    }

    result.push('"');
    result
}

/// Print a number the way it is written in the source: integral values don't get a fractional
/// part.
pub fn fmt_number(n: f64) -> String {
    format!("{n}")
}

impl<'a> Pretty<'a, Allocator> for &Type {
    fn pretty(self, allocator: &'a Allocator) -> DocBuilder<'a, Allocator> {
        match &self.typ {
            TypeF::Atomic(atomic) => allocator.text(atomic.as_str()),
            TypeF::Var(id) => allocator.text(id.label().to_owned()),
            TypeF::Wildcard => allocator.text("_"),
            TypeF::Proc { params, ret } if params.is_empty() => {
                docs![allocator, "Empty -> ", ret.as_ref().pretty(allocator)].parens()
            }
            TypeF::Proc { params, ret } => docs![
                allocator,
                allocator.intersperse(
                    params.iter().map(|ty| ty.as_ref().pretty(allocator)),
                    " * "
                ),
                " -> ",
                ret.as_ref().pretty(allocator),
            ]
            .parens(),
        }
    }
}

impl<'a> Pretty<'a, Allocator> for &SExp {
    fn pretty(self, allocator: &'a Allocator) -> DocBuilder<'a, Allocator> {
        match &self.data {
            SExpF::Atom(Atom::Num(n)) => allocator.text(fmt_number(*n)),
            SExpF::Atom(Atom::Bool(true)) => allocator.text("#t"),
            SExpF::Atom(Atom::Bool(false)) => allocator.text("#f"),
            SExpF::Atom(Atom::Str(s)) => allocator.text(escape_string(s)),
            SExpF::Atom(Atom::Symbol(id)) => allocator.text(id.label().to_owned()),
            SExpF::List(elts) => allocator.sexp(elts.iter().map(|elt| elt.pretty(allocator))),
        }
    }
}

impl<'a> Pretty<'a, Allocator> for &RichTerm {
    fn pretty(self, allocator: &'a Allocator) -> DocBuilder<'a, Allocator> {
        self.as_ref().pretty(allocator)
    }
}

impl<'a> Pretty<'a, Allocator> for &Term {
    fn pretty(self, allocator: &'a Allocator) -> DocBuilder<'a, Allocator> {
        match self {
            Term::Num(n) => allocator.text(fmt_number(*n)),
            Term::Bool(true) => allocator.text("#t"),
            Term::Bool(false) => allocator.text("#f"),
            Term::Str(s) => allocator.text(escape_string(s)),
            Term::PrimOp(op) => allocator.text(op.symbol()),
            Term::Var(id) => allocator.text(id.label().to_owned()),
            Term::If(data) => allocator.sexp([
                allocator.text("if"),
                data.test.pretty(allocator),
                data.then_branch.pretty(allocator),
                data.else_branch.pretty(allocator),
            ]),
            Term::Proc(data) => {
                let mut items = vec![
                    allocator.text("lambda"),
                    allocator
                        .intersperse(
                            data.params.iter().map(|decl| allocator.var_decl(decl)),
                            allocator.space(),
                        )
                        .parens(),
                ];

                if !data.ret.is_wildcard() {
                    items.push(docs![allocator, ": ", data.ret.pretty(allocator)]);
                }

                items.extend(allocator.body(&data.body));
                allocator.sexp(items)
            }
            Term::App(data) => allocator.sexp(
                std::iter::once(data.rator.pretty(allocator))
                    .chain(data.rands.iter().map(|rand| rand.pretty(allocator))),
            ),
            Term::Let(data) | Term::Letrec(data) => {
                let keyword = if matches!(self, Term::Let(_)) {
                    "let"
                } else {
                    "letrec"
                };

                let mut items = vec![allocator.text(keyword), allocator.bindings(&data.bindings)];
                items.extend(allocator.body(&data.body));
                allocator.sexp(items)
            }
            Term::Define(binding) => allocator.sexp([
                allocator.text("define"),
                allocator.var_decl(&binding.var),
                binding.val.pretty(allocator),
            ]),
            Term::Program(exps) => {
                let mut items = vec![allocator.text("L5")];
                items.extend(allocator.body(exps));
                allocator.sexp(items)
            }
            Term::Quote(datum) => docs![allocator, "'", datum.pretty(allocator)],
            Term::Set { var, val } => allocator.sexp([
                allocator.text("set!"),
                allocator.text(var.label().to_owned()),
                val.pretty(allocator),
            ]),
        }
    }
}

/// Generate an implementation of `fmt::Display` for types that implement `Pretty`.
#[macro_export]
macro_rules! impl_display_from_pretty {
    ($ty:ty) => {
        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                $crate::pretty::fmt_pretty(&self, f)
            }
        }
    };
}

/// Provide a method to pretty-print a long term, type, etc. (anything that implements `ToString`,
/// really) capped to a maximum length.
pub trait PrettyPrintCap: ToString {
    /// Pretty print an object capped to a given max length (in characters). Useful to limit the
    /// size of terms reported e.g. in typechecking errors. If the output of pretty printing is
    /// greater than the bound, the string is truncated to `max_width` and the last character after
    /// truncate is replaced by the ellipsis unicode character U+2026.
    fn pretty_print_cap(&self, max_width: usize) -> String {
        let output = self.to_string();

        match output.char_indices().nth(max_width) {
            None => output,
            Some((end, _)) => {
                let mut truncated = String::from(&output[..end]);

                if max_width >= 2 {
                    truncated.pop();
                    truncated.push('\u{2026}');
                }

                truncated
            }
        }
    }
}

impl PrettyPrintCap for RichTerm {}
impl PrettyPrintCap for Type {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::make as mk_term;
    use pretty_assertions::assert_eq;

    fn num() -> Type {
        Type::from(AtomicType::Number)
    }

    #[test]
    fn print_atomic_types() {
        assert_eq!(num().to_string(), "number");
        assert_eq!(Type::from(AtomicType::Boolean).to_string(), "boolean");
        assert_eq!(Type::from(AtomicType::String).to_string(), "string");
        assert_eq!(Type::from(AtomicType::Void).to_string(), "void");
    }

    #[test]
    fn print_proc_types() {
        assert_eq!(Type::proc([num()], num()).to_string(), "(number -> number)");
        assert_eq!(
            Type::proc([num(), Type::var("T1")], Type::from(AtomicType::Boolean)).to_string(),
            "(number * T1 -> boolean)"
        );
        assert_eq!(
            Type::proc([], Type::from(AtomicType::Void)).to_string(),
            "(Empty -> void)"
        );
        assert_eq!(
            Type::proc([Type::proc([num()], num())], num()).to_string(),
            "((number -> number) -> number)"
        );
    }

    #[test]
    fn print_terms() {
        let lambda = mk_term::proc(
            [mk_term::decl("x", num())],
            num(),
            mk_term::app(
                mk_term::op(PrimOp::Add),
                [mk_term::var("x"), mk_term::num(1.0)],
            ),
        );
        assert_eq!(lambda.to_string(), "(lambda ((x : number)) : number (+ x 1))");

        let ite = mk_term::if_then_else(
            mk_term::bool(true),
            mk_term::string("a\"b"),
            mk_term::num(2.5),
        );
        assert_eq!(ite.to_string(), r#"(if #t "a\"b" 2.5)"#);

        let let_exp = mk_term::let_in(
            [(mk_term::decl("y", Type::from(TypeF::Wildcard)), mk_term::num(3.0))],
            mk_term::var("y"),
        );
        assert_eq!(let_exp.to_string(), "(let ((y 3)) y)");
    }

    #[test]
    fn pretty_print_cap_truncates() {
        let long = mk_term::app(
            mk_term::var("some-procedure"),
            (0..10).map(|i| mk_term::num(i as f64)),
        );
        let capped = long.pretty_print_cap(10);
        assert_eq!(capped.chars().count(), 10);
        assert!(capped.ends_with('\u{2026}'));

        assert_eq!(mk_term::num(1.0).pretty_print_cap(10), "1");
    }
}
