use crate::basic::BasicType;
use crate::registry::{SymbolIndex, SymbolRegistry};

/// Resolved type tree. Types carry no identity; named types point at symbols.
#[derive(Debug, Clone, PartialEq)]
pub struct Type {
    pub node: TypeNode,
    pub is_const: bool,
    pub is_volatile: bool,
}

/// Structure of a resolved type
#[derive(Debug, Clone, PartialEq)]
pub enum TypeNode {
    /// Opaque to the front-end
    Unexposed,
    /// Keyword-qualified name (`struct S`, `ns::T`) wrapping the named type
    Elaborated(Option<Box<Type>>),
    Record(Option<SymbolIndex>),
    Enum(Option<SymbolIndex>),
    /// Alias name kept apart from the symbol; several aliases may share one
    Typedef {
        symbol: Option<SymbolIndex>,
        alias: String,
    },
    Pointer(Option<Box<Type>>),
    LValueReference(Option<Box<Type>>),
    RValueReference(Option<Box<Type>>),
    Basic(BasicType),
}

impl Type {
    /// Unqualified type
    #[must_use]
    pub const fn new(node: TypeNode) -> Self {
        Self {
            node,
            is_const: false,
            is_volatile: false,
        }
    }

    #[must_use]
    pub fn with_qualifiers(mut self, is_const: bool, is_volatile: bool) -> Self {
        self.is_const = is_const;
        self.is_volatile = is_volatile;
        self
    }

    /// Type one level down for pointers, references and elaborated names
    #[must_use]
    pub fn inner(&self) -> Option<&Type> {
        match &self.node {
            TypeNode::Elaborated(inner)
            | TypeNode::Pointer(inner)
            | TypeNode::LValueReference(inner)
            | TypeNode::RValueReference(inner) => inner.as_deref(),
            _ => None,
        }
    }

    /// Symbol named directly by this node
    #[must_use]
    pub fn symbol(&self) -> Option<SymbolIndex> {
        match &self.node {
            TypeNode::Record(symbol) | TypeNode::Enum(symbol) => *symbol,
            TypeNode::Typedef { symbol, .. } => *symbol,
            _ => None,
        }
    }

    /// Every symbol reachable through this type tree
    #[must_use]
    pub fn referenced_symbols(&self) -> Vec<SymbolIndex> {
        let mut found = Vec::new();
        let mut current = Some(self);
        while let Some(ty) = current {
            if let Some(symbol) = ty.symbol() {
                found.push(symbol);
            }
            current = ty.inner();
        }
        found
    }

    const fn is_pointer_like(&self) -> bool {
        matches!(
            self.node,
            TypeNode::Pointer(_) | TypeNode::LValueReference(_) | TypeNode::RValueReference(_)
        )
    }

    /// Render a C++-like spelling, naming records by their qualified spelling
    #[must_use]
    pub fn spelling(&self, registry: &SymbolRegistry) -> String {
        let inner = |ty: &Option<Box<Type>>| {
            ty.as_ref()
                .map_or_else(|| "<unknown>".to_string(), |t| t.spelling(registry))
        };
        let named = |symbol: &Option<SymbolIndex>, fallback: &str| {
            symbol
                .and_then(|idx| registry.identity_of(idx))
                .map_or_else(|| fallback.to_string(), |id| id.spelling())
        };

        let base = match &self.node {
            TypeNode::Unexposed => "<unexposed>".to_string(),
            TypeNode::Elaborated(ty) => inner(ty),
            TypeNode::Record(symbol) => named(symbol, "<record>"),
            TypeNode::Enum(symbol) => named(symbol, "<enum>"),
            TypeNode::Typedef { symbol, alias } => {
                if alias.is_empty() {
                    named(symbol, "<typedef>")
                } else {
                    alias.clone()
                }
            }
            TypeNode::Pointer(ty) => format!("{} *", inner(ty)),
            TypeNode::LValueReference(ty) => format!("{} &", inner(ty)),
            TypeNode::RValueReference(ty) => format!("{} &&", inner(ty)),
            TypeNode::Basic(basic) => basic.spelling().to_string(),
        };

        let mut qualifiers = Vec::new();
        if self.is_const {
            qualifiers.push("const");
        }
        if self.is_volatile {
            qualifiers.push("volatile");
        }
        if qualifiers.is_empty() {
            base
        } else if self.is_pointer_like() {
            format!("{base} {}", qualifiers.join(" "))
        } else {
            format!("{} {base}", qualifiers.join(" "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int() -> Type {
        Type::new(TypeNode::Basic(BasicType::Int))
    }

    #[test]
    fn test_qualified_spelling() {
        let registry = SymbolRegistry::new();
        let const_int = int().with_qualifiers(true, false);
        assert_eq!(const_int.spelling(&registry), "const int");

        let ptr =
            Type::new(TypeNode::Pointer(Some(Box::new(const_int)))).with_qualifiers(true, true);
        assert_eq!(ptr.spelling(&registry), "const int * const volatile");

        let rref = Type::new(TypeNode::RValueReference(Some(Box::new(int()))));
        assert_eq!(rref.spelling(&registry), "int &&");
    }

    #[test]
    fn test_typedef_spelling_prefers_alias() {
        let registry = SymbolRegistry::new();
        let ty = Type::new(TypeNode::Typedef {
            symbol: None,
            alias: "size_type".to_string(),
        });
        assert_eq!(ty.spelling(&registry), "size_type");
    }

    #[test]
    fn test_unresolved_record_spelling() {
        let registry = SymbolRegistry::new();
        let ty = Type::new(TypeNode::Pointer(Some(Box::new(Type::new(TypeNode::Record(None))))));
        assert_eq!(ty.spelling(&registry), "<record> *");
        assert!(ty.referenced_symbols().is_empty());
    }
}
