//! Symbol Recorder.
//!
//! `record` is find-or-create keyed by [`Identity`]. A new symbol is inserted
//! into the registry before its signature, members or underlying type are
//! resolved, so self-referential type graphs find the registered symbol
//! instead of building it again.

use crate::config::ParseConfig;
use crate::error::{Result, SymbolError};
use crate::identity::{identity, identity_part, Identity};
use crate::registry::{SymbolIndex, SymbolRegistry};
use crate::source::{Cursor, CursorKind};
use crate::symbol::{
    Field, FunctionArg, FunctionSignature, FunctionSymbol, RecordSymbol, Symbol, SymbolKind,
    TypedefSymbol,
};
use crate::types::Type;
use std::collections::HashSet;

/// Records cursors of one translation unit into a shared registry
pub struct SymbolRecorder<'r> {
    registry: &'r mut SymbolRegistry,
    config: &'r ParseConfig,
    /// Symbols whose kind-specific fields are being resolved right now
    in_progress: HashSet<SymbolIndex>,
}

impl<'r> SymbolRecorder<'r> {
    pub fn new(registry: &'r mut SymbolRegistry, config: &'r ParseConfig) -> Self {
        Self {
            registry,
            config,
            in_progress: HashSet::new(),
        }
    }

    pub fn registry(&self) -> &SymbolRegistry {
        self.registry
    }

    /// Find or create the symbol for `cursor`.
    ///
    /// Returns `Ok(None)` for cursors without a stable identity; those are
    /// appended to the registry's unresolved log. A structurally required
    /// parent that cannot be recorded is an error that aborts the unit.
    pub fn record<C: Cursor>(&mut self, cursor: &C) -> Result<Option<SymbolIndex>> {
        let identity = identity(cursor);
        if identity.is_empty() {
            self.log_unresolved(cursor);
            return Ok(None);
        }

        if let Some(idx) = self.registry.find_from_id(&identity) {
            self.merge(idx, cursor);
            self.complete(idx, cursor)?;
            return Ok(Some(idx));
        }

        let Some(kind) = construct_kind(cursor) else {
            self.log_unresolved(cursor);
            return Ok(None);
        };

        let parent = self.resolve_parent(cursor)?;

        // Recording the parent may already have reached this cursor through
        // a member type.
        if let Some(idx) = self.registry.find_from_id(&identity) {
            self.merge(idx, cursor);
            return Ok(Some(idx));
        }

        let idx = self.insert(identity, Symbol::new(identity_part(cursor), kind, parent));
        self.merge(idx, cursor);
        self.complete(idx, cursor)?;
        Ok(Some(idx))
    }

    fn insert(&mut self, identity: Identity, symbol: Symbol) -> SymbolIndex {
        log::trace!("New {} symbol `{}`", symbol.kind(), identity);
        self.registry.add(identity, symbol)
    }

    fn log_unresolved<C: Cursor>(&mut self, cursor: &C) {
        let location = cursor.location().location;
        log::debug!(
            "Unresolved {} `{}` at {}",
            cursor.kind(),
            cursor.spelling(),
            location
        );
        self.registry.log_unresolved(cursor.spelling(), location);
    }

    fn resolve_parent<C: Cursor>(&mut self, cursor: &C) -> Result<Option<SymbolIndex>> {
        if cursor.is_top_level() {
            return Ok(None);
        }
        let parent = match cursor.semantic_parent() {
            Some(parent) => self.record(&parent)?,
            None => None,
        };
        match parent {
            Some(idx) => Ok(Some(idx)),
            None => Err(SymbolError::missing_parent(
                cursor.spelling(),
                cursor.location().location,
            )),
        }
    }

    /// Fold exposure, locations and documentation of one more visit
    fn merge<C: Cursor>(&mut self, idx: SymbolIndex, cursor: &C) {
        let source = cursor.location();
        let canonical = cursor.definition().map(|def| def.location().location);
        let is_declaration = cursor.is_declaration();
        let is_definition = cursor.is_definition();
        let (brief, raw) = if is_declaration || is_definition {
            (cursor.brief_comment(), cursor.raw_comment())
        } else {
            (None, None)
        };

        let Some(symbol) = self.registry.get_mut(idx) else {
            return;
        };
        if source.from_main_file {
            symbol.mark_exposed();
        }
        if symbol.is_exposed() {
            if let Some(canonical) = canonical {
                symbol.add_declaration(canonical);
            }
        }
        if is_declaration {
            symbol.add_declaration(source.location.clone());
        }
        if is_definition {
            symbol.add_definition(source.location);
        }
        symbol.doc.merge(brief.as_deref(), raw.as_deref());
    }

    /// Resolve kind-specific fields that are still missing
    fn complete<C: Cursor>(&mut self, idx: SymbolIndex, cursor: &C) -> Result<()> {
        if !self.in_progress.insert(idx) {
            return Ok(());
        }
        let result = self.complete_kind(idx, cursor);
        self.in_progress.remove(&idx);
        result
    }

    fn complete_kind<C: Cursor>(&mut self, idx: SymbolIndex, cursor: &C) -> Result<()> {
        let Some(symbol) = self.registry.get(idx) else {
            return Ok(());
        };

        // `typedef struct S S` shares the struct's identity; only a cursor of
        // the symbol's own kind may fill its fields.
        match (symbol.kind(), cursor.kind()) {
            (SymbolKind::Function(function), CursorKind::FunctionDecl) => {
                if function.signature().is_some() {
                    return Ok(());
                }
                let signature = self.build_signature(cursor)?;
                let referenced = signature_symbols(&signature);
                let stored = self
                    .registry
                    .get(idx)
                    .and_then(Symbol::as_function)
                    .is_some_and(|function| function.set_signature(signature));
                if stored {
                    self.registry.mark_resolved(idx);
                } else {
                    log::warn!("Signature of `{}` was already built", cursor.display_name());
                }
                self.add_references(idx, referenced);
            }
            (SymbolKind::Typedef(typedef), CursorKind::TypedefDecl) => {
                if typedef.underlying().is_some() {
                    return Ok(());
                }
                let underlying = self.resolve_type(&cursor.typedef_underlying_type())?;
                let referenced = underlying
                    .as_ref()
                    .map(Type::referenced_symbols)
                    .unwrap_or_default();
                let stored = self
                    .registry
                    .get(idx)
                    .and_then(Symbol::as_typedef)
                    .is_some_and(|typedef| typedef.set_underlying(underlying));
                if stored {
                    self.registry.mark_resolved(idx);
                } else {
                    log::warn!("Underlying type of `{}` was already resolved", cursor.spelling());
                }
                self.add_references(idx, referenced);
            }
            (
                SymbolKind::Struct(record) | SymbolKind::Class(record),
                CursorKind::StructDecl | CursorKind::ClassDecl,
            ) => {
                if !self.config.record_members || record.members().is_some() {
                    return Ok(());
                }
                let Some(definition) = cursor.definition() else {
                    return Ok(());
                };
                let members = self.collect_members(&definition)?;
                let referenced: Vec<SymbolIndex> = members
                    .iter()
                    .filter_map(|field| field.ty.as_ref())
                    .flat_map(Type::referenced_symbols)
                    .collect();
                let stored = self
                    .registry
                    .get(idx)
                    .and_then(|symbol| symbol.kind().record())
                    .is_some_and(|record| record.set_members(members));
                if stored {
                    self.registry.mark_resolved(idx);
                }
                self.add_references(idx, referenced);
            }
            _ => {}
        }
        Ok(())
    }

    fn build_signature<C: Cursor>(&mut self, cursor: &C) -> Result<FunctionSignature> {
        let ret = self.resolve_type(&cursor.result_type())?;
        let mut args = Vec::new();
        for arg in cursor.arguments() {
            args.push(FunctionArg {
                name: arg.spelling(),
                ty: self.resolve_type(&arg.ty())?,
            });
        }
        Ok(FunctionSignature { ret, args })
    }

    fn collect_members<C: Cursor>(&mut self, definition: &C) -> Result<Vec<Field>> {
        let mut members = Vec::new();
        for child in definition.children() {
            if child.kind() != CursorKind::FieldDecl {
                continue;
            }
            members.push(Field {
                name: child.spelling(),
                ty: self.resolve_type(&child.ty())?,
            });
        }
        Ok(members)
    }

    fn add_references(&mut self, from: SymbolIndex, to: Vec<SymbolIndex>) {
        for target in to {
            self.registry.add_reference(from, target);
        }
    }
}

/// Build the kind-specific payload of a new symbol
fn construct_kind<C: Cursor>(cursor: &C) -> Option<SymbolKind> {
    let kind = match cursor.kind() {
        CursorKind::Namespace => SymbolKind::Namespace,
        CursorKind::FunctionDecl => {
            SymbolKind::Function(FunctionSymbol::new(cursor.mangled_name()))
        }
        CursorKind::StructDecl => SymbolKind::Struct(RecordSymbol::default()),
        CursorKind::ClassDecl => SymbolKind::Class(RecordSymbol::default()),
        CursorKind::EnumDecl => SymbolKind::Enum {
            scoped: cursor.is_scoped_enum(),
        },
        CursorKind::TypedefDecl => SymbolKind::Typedef(TypedefSymbol::default()),
        CursorKind::UnexposedDecl => SymbolKind::UnexposedDeclaration,
        _ => return None,
    };
    Some(kind)
}

fn signature_symbols(signature: &FunctionSignature) -> Vec<SymbolIndex> {
    signature
        .ret
        .iter()
        .chain(signature.args.iter().filter_map(|arg| arg.ty.as_ref()))
        .flat_map(Type::referenced_symbols)
        .collect()
}
