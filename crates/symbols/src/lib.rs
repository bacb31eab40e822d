//! # cxxdoc Symbols
//!
//! Deduplicated, identity-addressed symbol tables for C and C++ sources.
//!
//! ## Features
//!
//! - **Stable identity** - functions keyed by mangling, everything else by qualified name
//! - **Idempotent recording** - every redeclaration merges into one symbol
//! - **Cycle-safe type resolution** - self-referential records resolve once
//! - **Unit transactions** - a failing translation unit leaves earlier ones intact
//!
//! ## Architecture
//!
//! ```text
//! Frontend (libclang, JSON snapshot, ...)
//!     │
//!     ├──> Document Parser (one translation unit at a time)
//!     │      └─ Walk main-file declarations and scope bodies
//!     │
//!     ├──> Symbol Recorder
//!     │      ├─ Identity Builder (semantic-parent chain)
//!     │      ├─ Find-before-build lookup
//!     │      ├─ Merge exposure, locations, documentation
//!     │      └─ Type Resolver ──> re-enters the recorder for named types
//!     │
//!     └──> Symbol Registry (petgraph)
//!            ├─ Nodes: Symbols (namespaces, functions, records, enums, typedefs)
//!            └─ Edges: Contains (scope), References (type usage)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use cxxdoc_symbols::{CursorKind, DocumentParser, ParseConfig, SnapshotBuilder, SymbolListing};
//!
//! let mut builder = SnapshotBuilder::new("main.cpp");
//! let ns = builder.declare(builder.root(), CursorKind::Namespace, "N");
//! builder.declare(ns, CursorKind::ClassDecl, "C");
//! let snapshot = builder.build().unwrap();
//!
//! let mut parser = DocumentParser::new(ParseConfig::default());
//! let report = parser.parse_unit(&snapshot.root()).unwrap();
//! assert_eq!(report.new_symbols, 2);
//!
//! let listing = SymbolListing::from_registry(parser.registry());
//! println!("{}", listing.to_text());
//! ```

mod basic;
mod config;
mod error;
mod identity;
mod listing;
mod parser;
mod recorder;
mod registry;
mod resolver;
mod snapshot;
mod source;
mod symbol;
mod types;

pub use basic::BasicType;
pub use config::{CompileOptions, InputFile, ParseConfig, ProjectConfig};
pub use error::{Result, SymbolError};
pub use identity::{identity, identity_part, Identity, IdentityPart};
pub use listing::{ListingDetail, ListingEntry, MemberEntry, SymbolListing};
pub use parser::{DocumentParser, UnitReport};
pub use recorder::SymbolRecorder;
pub use registry::{Checkpoint, Relation, SymbolIndex, SymbolRegistry, UnresolvedDecl};
pub use snapshot::{
    AstSnapshot, CursorData, Snapshot, SnapshotBuilder, SnapshotCursor, SnapshotFrontend,
    SnapshotType, TypeData, TypeKindRepr,
};
pub use source::{Cursor, CursorKind, Frontend, SourceLocation, TypeKind, TypeRef};
pub use symbol::{
    Documentation, Field, FunctionArg, FunctionSignature, FunctionSymbol, Location, RecordSymbol,
    Symbol, SymbolKind, TypedefSymbol,
};
pub use types::{Type, TypeNode};
