//! AST Source Adapter.
//!
//! The symbol recorder never talks to a compiler directly. A front-end hands
//! out [`Cursor`] and [`TypeRef`] handles; anything that can answer these
//! questions (libclang bindings, a serialized snapshot, a test fixture) can
//! drive the recorder.

use crate::basic::BasicType;
use crate::error::Result;
use crate::symbol::Location;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Declaration kinds a front-end can report for a cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CursorKind {
    TranslationUnit,
    UnexposedDecl,
    StructDecl,
    UnionDecl,
    ClassDecl,
    EnumDecl,
    FieldDecl,
    EnumConstantDecl,
    FunctionDecl,
    VarDecl,
    ParmDecl,
    TypedefDecl,
    #[serde(rename = "CXXMethod")]
    CxxMethod,
    Namespace,
    LinkageSpec,
    Constructor,
    Destructor,
    ConversionFunction,
    FunctionTemplate,
    ClassTemplate,
    TypeAliasDecl,
    NamespaceAlias,
    UsingDirective,
    UsingDeclaration,
    /// Statements, expressions, references, attributes, ...
    #[serde(other)]
    Other,
}

impl CursorKind {
    /// Check if this kind names a declaration
    #[must_use]
    pub const fn is_declaration(self) -> bool {
        !matches!(self, Self::TranslationUnit | Self::Other)
    }

    /// Kinds whose bodies may hold further declarations
    #[must_use]
    pub const fn is_scope(self) -> bool {
        matches!(
            self,
            Self::Namespace | Self::StructDecl | Self::ClassDecl | Self::UnionDecl
        )
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TranslationUnit => "TranslationUnit",
            Self::UnexposedDecl => "UnexposedDecl",
            Self::StructDecl => "StructDecl",
            Self::UnionDecl => "UnionDecl",
            Self::ClassDecl => "ClassDecl",
            Self::EnumDecl => "EnumDecl",
            Self::FieldDecl => "FieldDecl",
            Self::EnumConstantDecl => "EnumConstantDecl",
            Self::FunctionDecl => "FunctionDecl",
            Self::VarDecl => "VarDecl",
            Self::ParmDecl => "ParmDecl",
            Self::TypedefDecl => "TypedefDecl",
            Self::CxxMethod => "CXXMethod",
            Self::Namespace => "Namespace",
            Self::LinkageSpec => "LinkageSpec",
            Self::Constructor => "Constructor",
            Self::Destructor => "Destructor",
            Self::ConversionFunction => "ConversionFunction",
            Self::FunctionTemplate => "FunctionTemplate",
            Self::ClassTemplate => "ClassTemplate",
            Self::TypeAliasDecl => "TypeAliasDecl",
            Self::NamespaceAlias => "NamespaceAlias",
            Self::UsingDirective => "UsingDirective",
            Self::UsingDeclaration => "UsingDeclaration",
            Self::Other => "Other",
        }
    }
}

impl std::fmt::Display for CursorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Type kinds a front-end can report for a type reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Invalid,
    Unexposed,
    Elaborated,
    Record,
    Enum,
    Typedef,
    Pointer,
    LValueReference,
    RValueReference,
    Basic(BasicType),
    /// A code outside the known table; the resolver refuses it
    Unknown(i32),
}

impl TypeKind {
    /// Map a libclang `CXTypeKind` code
    #[must_use]
    pub fn from_raw(code: i32) -> Self {
        match code {
            0 => Self::Invalid,
            1 => Self::Unexposed,
            101 => Self::Pointer,
            103 => Self::LValueReference,
            104 => Self::RValueReference,
            105 => Self::Record,
            106 => Self::Enum,
            107 => Self::Typedef,
            119 => Self::Elaborated,
            other => BasicType::from_code(other).map_or(Self::Unknown(other), Self::Basic),
        }
    }

    /// Map a libclang kind spelling ("Pointer", "Int", "Char_S", ...)
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let kind = match name {
            "Invalid" => Self::Invalid,
            "Unexposed" => Self::Unexposed,
            "Elaborated" => Self::Elaborated,
            "Record" => Self::Record,
            "Enum" => Self::Enum,
            "Typedef" => Self::Typedef,
            "Pointer" => Self::Pointer,
            "LValueReference" => Self::LValueReference,
            "RValueReference" => Self::RValueReference,
            other => Self::Basic(BasicType::from_name(other)?),
        };
        Some(kind)
    }
}

/// A cursor location plus whether it lies in the file being parsed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceLocation {
    pub location: Location,
    pub from_main_file: bool,
}

/// Handle to one syntactic construct of a translation unit
pub trait Cursor: Clone + Sized {
    type Type: TypeRef<Cursor = Self>;

    fn kind(&self) -> CursorKind;

    fn spelling(&self) -> String;

    fn display_name(&self) -> String;

    /// Linker name; only meaningful for functions
    fn mangled_name(&self) -> String;

    fn location(&self) -> SourceLocation;

    fn is_declaration(&self) -> bool {
        self.kind().is_declaration()
    }

    fn is_definition(&self) -> bool;

    fn brief_comment(&self) -> Option<String>;

    fn raw_comment(&self) -> Option<String>;

    /// The defining cursor for this entity, possibly `self`
    fn definition(&self) -> Option<Self>;

    fn semantic_parent(&self) -> Option<Self>;

    fn children(&self) -> Vec<Self>;

    /// Parameter cursors of a function
    fn arguments(&self) -> Vec<Self>;

    fn ty(&self) -> Self::Type;

    fn result_type(&self) -> Self::Type;

    fn typedef_underlying_type(&self) -> Self::Type;

    fn is_scoped_enum(&self) -> bool;

    fn is_root(&self) -> bool {
        self.kind() == CursorKind::TranslationUnit || self.semantic_parent().is_none()
    }

    fn is_top_level(&self) -> bool {
        self.semantic_parent().map_or(true, |parent| parent.is_root())
    }
}

/// Handle to a type as seen by the front-end
pub trait TypeRef: Clone + Sized {
    type Cursor: Cursor;

    fn kind(&self) -> TypeKind;

    fn is_const(&self) -> bool;

    fn is_volatile(&self) -> bool;

    fn pointee(&self) -> Self;

    /// The type an elaborated type names
    fn named(&self) -> Self;

    fn typedef_name(&self) -> String;

    /// Declaring cursor of a record, enum or typedef type
    fn declaration(&self) -> Option<Self::Cursor>;

    fn result_type(&self) -> Self;

    fn arg_types(&self) -> Vec<Self>;
}

/// Something that turns a source file into a translation unit
pub trait Frontend {
    type Cursor: Cursor;

    /// Parse `file` and return its translation-unit cursor
    fn load(&mut self, file: &Path, args: &[String]) -> Result<Self::Cursor>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_kind_from_raw() {
        assert_eq!(TypeKind::from_raw(0), TypeKind::Invalid);
        assert_eq!(TypeKind::from_raw(101), TypeKind::Pointer);
        assert_eq!(TypeKind::from_raw(119), TypeKind::Elaborated);
        assert_eq!(TypeKind::from_raw(17), TypeKind::Basic(BasicType::Int));
        assert_eq!(TypeKind::from_raw(177), TypeKind::Basic(BasicType::Atomic));
        assert_eq!(TypeKind::from_raw(4242), TypeKind::Unknown(4242));
    }

    #[test]
    fn test_type_kind_from_name() {
        assert_eq!(TypeKind::from_name("Record"), Some(TypeKind::Record));
        assert_eq!(
            TypeKind::from_name("Char_S"),
            Some(TypeKind::Basic(BasicType::CharS))
        );
        assert_eq!(TypeKind::from_name("NotAKind"), None);
    }

    #[test]
    fn test_cursor_kind_declarations() {
        assert!(CursorKind::FunctionDecl.is_declaration());
        assert!(CursorKind::FieldDecl.is_declaration());
        assert!(!CursorKind::TranslationUnit.is_declaration());
        assert!(!CursorKind::Other.is_declaration());
        assert!(CursorKind::Namespace.is_scope());
        assert!(!CursorKind::FunctionDecl.is_scope());
    }

    #[test]
    fn test_cursor_kind_serde_names() {
        let kind: CursorKind = serde_json::from_str("\"CXXMethod\"").unwrap();
        assert_eq!(kind, CursorKind::CxxMethod);
        let kind: CursorKind = serde_json::from_str("\"CallExpr\"").unwrap();
        assert_eq!(kind, CursorKind::Other);
    }
}
