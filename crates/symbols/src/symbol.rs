use crate::identity::IdentityPart;
use crate::registry::SymbolIndex;
use crate::types::Type;
use once_cell::unsync::OnceCell;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;

/// Position in a source file. The default value means "no location".
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Location {
    pub file: PathBuf,
    pub line: u32,
    pub column: u32,
    pub offset: u32,
}

impl Location {
    pub fn new(file: impl Into<PathBuf>, line: u32, column: u32, offset: u32) -> Self {
        Self {
            file: file.into(),
            line,
            column,
            offset,
        }
    }

    #[must_use]
    pub fn is_absent(&self) -> bool {
        *self == Self::default()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file.display(), self.line, self.column)
    }
}

/// Documentation gathered from every declaration of an entity
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Documentation {
    pub brief: String,
    pub raw: String,
}

impl Documentation {
    /// Fold in the comments of one more declaration.
    ///
    /// A non-empty brief replaces the stored one; a raw comment replaces the
    /// stored one only when strictly longer.
    pub fn merge(&mut self, brief: Option<&str>, raw: Option<&str>) {
        if let Some(brief) = brief.filter(|b| !b.is_empty()) {
            self.brief = brief.to_string();
        }
        if let Some(raw) = raw.filter(|r| r.len() > self.raw.len()) {
            self.raw = raw.to_string();
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.brief.is_empty() && self.raw.is_empty()
    }
}

/// Named function parameter
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionArg {
    pub name: String,
    pub ty: Option<Type>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionSignature {
    pub ret: Option<Type>,
    pub args: Vec<FunctionArg>,
}

/// Data member of a struct or class
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub ty: Option<Type>,
}

#[derive(Debug, Clone, Default)]
pub struct FunctionSymbol {
    pub mangling: String,
    signature: OnceCell<FunctionSignature>,
}

impl FunctionSymbol {
    pub fn new(mangling: impl Into<String>) -> Self {
        Self {
            mangling: mangling.into(),
            signature: OnceCell::new(),
        }
    }

    pub fn signature(&self) -> Option<&FunctionSignature> {
        self.signature.get()
    }

    /// Store the signature; returns false if one was already built
    pub fn set_signature(&self, signature: FunctionSignature) -> bool {
        self.signature.set(signature).is_ok()
    }
}

/// Struct or class payload
#[derive(Debug, Clone, Default)]
pub struct RecordSymbol {
    members: OnceCell<Vec<Field>>,
}

impl RecordSymbol {
    pub fn members(&self) -> Option<&[Field]> {
        self.members.get().map(Vec::as_slice)
    }

    pub fn set_members(&self, members: Vec<Field>) -> bool {
        self.members.set(members).is_ok()
    }
}

#[derive(Debug, Clone, Default)]
pub struct TypedefSymbol {
    underlying: OnceCell<Option<Type>>,
}

impl TypedefSymbol {
    /// `None` until resolved, `Some(None)` when the front-end had no type
    pub fn underlying(&self) -> Option<Option<&Type>> {
        self.underlying.get().map(Option::as_ref)
    }

    pub fn set_underlying(&self, ty: Option<Type>) -> bool {
        self.underlying.set(ty).is_ok()
    }
}

/// Kind-specific part of a symbol
#[derive(Debug, Clone)]
pub enum SymbolKind {
    Namespace,
    Function(FunctionSymbol),
    Struct(RecordSymbol),
    Class(RecordSymbol),
    Enum { scoped: bool },
    Typedef(TypedefSymbol),
    UnexposedDeclaration,
}

impl SymbolKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Namespace => "namespace",
            Self::Function(_) => "function",
            Self::Struct(_) => "struct",
            Self::Class(_) => "class",
            Self::Enum { .. } => "enum",
            Self::Typedef(_) => "typedef",
            Self::UnexposedDeclaration => "unexposed",
        }
    }

    pub fn record(&self) -> Option<&RecordSymbol> {
        match self {
            Self::Struct(record) | Self::Class(record) => Some(record),
            _ => None,
        }
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named entity tracked across all of its declarations and definitions
#[derive(Debug, Clone)]
pub struct Symbol {
    id_part: IdentityPart,
    pub spelling: String,
    pub display_name: String,
    pub doc: Documentation,
    declarations: BTreeSet<Location>,
    definitions: BTreeSet<Location>,
    exposed: bool,
    parent: Option<SymbolIndex>,
    kind: SymbolKind,
}

impl Symbol {
    pub fn new(id_part: IdentityPart, kind: SymbolKind, parent: Option<SymbolIndex>) -> Self {
        Self {
            spelling: id_part.spelling.clone(),
            display_name: id_part.display.clone(),
            id_part,
            doc: Documentation::default(),
            declarations: BTreeSet::new(),
            definitions: BTreeSet::new(),
            exposed: false,
            parent,
            kind,
        }
    }

    pub fn id_part(&self) -> &IdentityPart {
        &self.id_part
    }

    pub fn kind(&self) -> &SymbolKind {
        &self.kind
    }

    /// Enclosing symbol, resolved through the registry
    pub fn parent(&self) -> Option<SymbolIndex> {
        self.parent
    }

    pub fn is_exposed(&self) -> bool {
        self.exposed
    }

    /// Mark the symbol as seen in the documented file. Never undone.
    pub fn mark_exposed(&mut self) {
        self.exposed = true;
    }

    pub fn declarations(&self) -> &BTreeSet<Location> {
        &self.declarations
    }

    pub fn definitions(&self) -> &BTreeSet<Location> {
        &self.definitions
    }

    pub fn add_declaration(&mut self, location: Location) {
        if !location.is_absent() {
            self.declarations.insert(location);
        }
    }

    pub fn add_definition(&mut self, location: Location) {
        if !location.is_absent() {
            self.definitions.insert(location);
        }
    }

    pub fn as_function(&self) -> Option<&FunctionSymbol> {
        match &self.kind {
            SymbolKind::Function(function) => Some(function),
            _ => None,
        }
    }

    pub fn as_typedef(&self) -> Option<&TypedefSymbol> {
        match &self.kind {
            SymbolKind::Typedef(typedef) => Some(typedef),
            _ => None,
        }
    }

    /// Empty the signature, members or underlying type so they can be built again
    pub(crate) fn clear_resolved(&mut self) {
        match &mut self.kind {
            SymbolKind::Function(function) => {
                function.signature.take();
            }
            SymbolKind::Struct(record) | SymbolKind::Class(record) => {
                record.members.take();
            }
            SymbolKind::Typedef(typedef) => {
                typedef.underlying.take();
            }
            SymbolKind::Namespace | SymbolKind::Enum { .. } | SymbolKind::UnexposedDeclaration => {}
        }
    }
}
