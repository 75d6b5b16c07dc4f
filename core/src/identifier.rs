//! Define the type of an identifier.
use std::{
    fmt,
    hash::{Hash, Hasher},
    rc::Rc,
};

use crate::position::TermPos;

/// A variable or type variable name.
///
/// Identifiers are cheap to clone: the label is reference counted.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ident(Rc<str>);

impl Ident {
    pub fn new(label: impl AsRef<str>) -> Self {
        Ident(Rc::from(label.as_ref()))
    }

    pub fn label(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl AsRef<str> for Ident {
    fn as_ref(&self) -> &str {
        self.label()
    }
}

impl From<&str> for Ident {
    fn from(s: &str) -> Self {
        Ident::new(s)
    }
}

impl From<String> for Ident {
    fn from(s: String) -> Self {
        Ident(Rc::from(s))
    }
}

/// An identifier together with its position in the source.
///
/// The position is ignored by equality and hashing: two occurrences of `x` at different places
/// are the same identifier.
#[derive(Clone, Debug)]
pub struct LocIdent {
    ident: Ident,
    pub pos: TermPos,
}

impl LocIdent {
    pub fn new(ident: impl Into<Ident>) -> Self {
        LocIdent {
            ident: ident.into(),
            pos: TermPos::None,
        }
    }

    pub fn with_pos(self, pos: TermPos) -> Self {
        LocIdent { pos, ..self }
    }

    pub fn ident(&self) -> Ident {
        self.ident.clone()
    }

    pub fn label(&self) -> &str {
        self.ident.label()
    }
}

impl PartialEq for LocIdent {
    fn eq(&self, other: &Self) -> bool {
        self.ident == other.ident
    }
}

impl Eq for LocIdent {}

impl Hash for LocIdent {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.ident.hash(state)
    }
}

impl fmt::Display for LocIdent {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl From<&str> for LocIdent {
    fn from(s: &str) -> Self {
        LocIdent::new(s)
    }
}

impl From<Ident> for LocIdent {
    fn from(ident: Ident) -> Self {
        LocIdent::new(ident)
    }
}
