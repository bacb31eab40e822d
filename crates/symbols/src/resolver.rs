//! Type Resolver.
//!
//! Turns a front-end [`TypeRef`] into a [`Type`] tree. Named types re-enter
//! the recorder; termination relies on its find-before-build lookup.
//! Types are plain values and are rebuilt on every call.

use crate::error::{Result, SymbolError};
use crate::recorder::SymbolRecorder;
use crate::registry::SymbolIndex;
use crate::source::{TypeKind, TypeRef};
use crate::types::{Type, TypeNode};

impl SymbolRecorder<'_> {
    /// Resolve a type reference. Invalid types resolve to `None`.
    ///
    /// Fails with [`SymbolError::UnmappedTypeKind`] for a kind outside the
    /// known table.
    pub fn resolve_type<T: TypeRef>(&mut self, ty: &T) -> Result<Option<Type>> {
        let node = match ty.kind() {
            TypeKind::Invalid => return Ok(None),
            TypeKind::Unexposed => TypeNode::Unexposed,
            TypeKind::Elaborated => TypeNode::Elaborated(self.resolve_boxed(&ty.named())?),
            TypeKind::Record => TypeNode::Record(self.resolve_declaration(ty)?),
            TypeKind::Enum => TypeNode::Enum(self.resolve_declaration(ty)?),
            TypeKind::Typedef => TypeNode::Typedef {
                symbol: self.resolve_declaration(ty)?,
                alias: ty.typedef_name(),
            },
            TypeKind::Pointer => TypeNode::Pointer(self.resolve_boxed(&ty.pointee())?),
            TypeKind::LValueReference => {
                TypeNode::LValueReference(self.resolve_boxed(&ty.pointee())?)
            }
            TypeKind::RValueReference => {
                TypeNode::RValueReference(self.resolve_boxed(&ty.pointee())?)
            }
            TypeKind::Basic(basic) => TypeNode::Basic(basic),
            TypeKind::Unknown(code) => return Err(SymbolError::UnmappedTypeKind(code)),
        };

        Ok(Some(
            Type::new(node).with_qualifiers(ty.is_const(), ty.is_volatile()),
        ))
    }

    fn resolve_boxed<T: TypeRef>(&mut self, ty: &T) -> Result<Option<Box<Type>>> {
        Ok(self.resolve_type(ty)?.map(Box::new))
    }

    fn resolve_declaration<T: TypeRef>(&mut self, ty: &T) -> Result<Option<SymbolIndex>> {
        match ty.declaration() {
            Some(declaration) => self.record(&declaration),
            None => {
                log::debug!("Named type without a declaration ({:?})", ty.kind());
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::basic::BasicType;
    use crate::config::ParseConfig;
    use crate::error::SymbolError;
    use crate::recorder::SymbolRecorder;
    use crate::registry::SymbolRegistry;
    use crate::snapshot::SnapshotBuilder;
    use crate::source::{Cursor, CursorKind};
    use crate::types::{Type, TypeNode};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_invalid_type_resolves_to_none() {
        let builder = SnapshotBuilder::new("main.cpp");
        let snapshot = builder.build().unwrap();

        let config = ParseConfig::default();
        let mut registry = SymbolRegistry::new();
        let mut recorder = SymbolRecorder::new(&mut registry, &config);
        // The root cursor carries no type.
        let resolved = recorder.resolve_type(&snapshot.root().ty()).unwrap();
        assert_eq!(resolved, None);
    }

    #[test]
    fn test_qualifiers_propagate_to_every_variant() {
        let mut builder = SnapshotBuilder::new("main.cpp");
        let record = builder.declare(builder.root(), CursorKind::StructDecl, "S");
        let int = builder.basic(BasicType::Int);
        let samples = vec![
            builder.unexposed(),
            int,
            builder.pointer_to(int),
            builder.lvalue_ref(int),
            builder.rvalue_ref(int),
            builder.record_type(record),
            builder.elaborated(int),
            builder.typedef_type(record, "alias_t"),
        ];
        let qualified: Vec<usize> = samples
            .into_iter()
            .map(|ty| builder.qualified(ty, true, false))
            .collect();
        let snapshot = builder.build().unwrap();

        let config = ParseConfig::default();
        let mut registry = SymbolRegistry::new();
        let mut recorder = SymbolRecorder::new(&mut registry, &config);
        for ty in qualified {
            let resolved = recorder.resolve_type(&snapshot.ty(ty)).unwrap().unwrap();
            assert!(resolved.is_const);
            assert!(!resolved.is_volatile);
        }
    }

    #[test]
    fn test_pointer_to_record() {
        let mut builder = SnapshotBuilder::new("main.cpp");
        let record = builder.declare(builder.root(), CursorKind::ClassDecl, "C");
        let record_ty = builder.record_type(record);
        let ptr = builder.pointer_to(record_ty);
        let snapshot = builder.build().unwrap();

        let config = ParseConfig::default();
        let mut registry = SymbolRegistry::new();
        let resolved = SymbolRecorder::new(&mut registry, &config)
            .resolve_type(&snapshot.ty(ptr))
            .unwrap()
            .unwrap();

        let symbol = registry.sorted()[0].1;
        assert_eq!(
            resolved,
            Type::new(TypeNode::Pointer(Some(Box::new(Type::new(
                TypeNode::Record(Some(symbol))
            )))))
        );
        assert_eq!(resolved.spelling(&registry), "C *");
    }

    #[test]
    fn test_typedef_keeps_alias_name() {
        let mut builder = SnapshotBuilder::new("main.cpp");
        let decl = builder.declare(builder.root(), CursorKind::TypedefDecl, "size_type");
        let long = builder.basic(BasicType::ULong);
        builder.set_underlying_type(decl, long);
        let alias = builder.typedef_type(decl, "size_type");
        let snapshot = builder.build().unwrap();

        let config = ParseConfig::default();
        let mut registry = SymbolRegistry::new();
        let resolved = SymbolRecorder::new(&mut registry, &config)
            .resolve_type(&snapshot.ty(alias))
            .unwrap()
            .unwrap();

        let TypeNode::Typedef { symbol, alias } = &resolved.node else {
            panic!("expected a typedef, got {resolved:?}");
        };
        assert_eq!(alias, "size_type");
        let typedef = registry[symbol.unwrap()].as_typedef().unwrap();
        assert_eq!(
            typedef.underlying(),
            Some(Some(&Type::new(TypeNode::Basic(BasicType::ULong))))
        );
    }

    #[test]
    fn test_unmapped_kind_is_fatal() {
        let mut builder = SnapshotBuilder::new("main.cpp");
        let unknown = builder.raw_type(4242);
        let snapshot = builder.build().unwrap();

        let config = ParseConfig::default();
        let mut registry = SymbolRegistry::new();
        let err = SymbolRecorder::new(&mut registry, &config)
            .resolve_type(&snapshot.ty(unknown))
            .unwrap_err();
        assert!(matches!(err, SymbolError::UnmappedTypeKind(4242)));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_self_referential_struct_terminates() {
        let mut builder = SnapshotBuilder::new("main.cpp");
        let node = builder.declare(builder.root(), CursorKind::StructDecl, "Node");
        builder.define(node);
        let node_ty = builder.record_type(node);
        let elaborated = builder.elaborated(node_ty);
        let next_ty = builder.pointer_to(elaborated);
        builder.field(node, "next", next_ty);
        let snapshot = builder.build().unwrap();

        let config = ParseConfig::default();
        let mut registry = SymbolRegistry::new();
        let idx = SymbolRecorder::new(&mut registry, &config)
            .record(&snapshot.cursor(node))
            .unwrap()
            .unwrap();

        assert_eq!(registry.len(), 1);
        let members = registry[idx].kind().record().unwrap().members().unwrap();
        let next = members[0].ty.as_ref().unwrap();
        assert_eq!(next.referenced_symbols(), vec![idx]);
        assert_eq!(registry.references(idx), vec![idx]);
    }
}
