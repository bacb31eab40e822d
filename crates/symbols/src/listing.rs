use crate::registry::{SymbolRegistry, UnresolvedDecl};
use crate::symbol::{FunctionSignature, Location, Symbol, SymbolKind};
use crate::types::Type;
use serde::Serialize;
use std::fmt::Write as _;

/// Data member as shown in a listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
}

/// Kind-specific part of a listing row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingDetail {
    Signature(String),
    Scoped(bool),
    Underlying(String),
    Members(Vec<MemberEntry>),
}

/// One symbol of the listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListingEntry {
    pub kind: &'static str,
    pub qualified_name: String,
    pub display_name: String,
    pub exposed: bool,
    pub declarations: Vec<Location>,
    pub definitions: Vec<Location>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub brief: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub raw_doc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<ListingDetail>,
}

/// Flat, ordered view of a registry for reports
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SymbolListing {
    pub symbols: Vec<ListingEntry>,
    pub unresolved: Vec<UnresolvedDecl>,
}

impl SymbolListing {
    /// Build the listing in identity order
    pub fn from_registry(registry: &SymbolRegistry) -> Self {
        let symbols = registry
            .sorted()
            .into_iter()
            .filter_map(|(identity, idx)| {
                let symbol = registry.get(idx)?;
                Some(ListingEntry {
                    kind: symbol.kind().as_str(),
                    qualified_name: identity.spelling(),
                    display_name: identity.display(),
                    exposed: symbol.is_exposed(),
                    declarations: symbol.declarations().iter().cloned().collect(),
                    definitions: symbol.definitions().iter().cloned().collect(),
                    brief: symbol.doc.brief.clone(),
                    raw_doc: symbol.doc.raw.clone(),
                    detail: detail(symbol, registry),
                })
            })
            .collect();

        Self {
            symbols,
            unresolved: registry.unresolved().to_vec(),
        }
    }

    /// Keep only symbols seen in a main file
    #[must_use]
    pub fn exposed_only(mut self) -> Self {
        self.symbols.retain(|entry| entry.exposed);
        self
    }

    #[must_use]
    pub fn without_unresolved(mut self) -> Self {
        self.unresolved.clear();
        self
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// One line per symbol, then one per unresolved declaration
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for entry in &self.symbols {
            let marker = if entry.exposed { '*' } else { ' ' };
            let _ = write!(out, "{marker} {:<9} {}", entry.kind, entry.qualified_name);
            match &entry.detail {
                Some(ListingDetail::Signature(signature)) => {
                    let _ = write!(out, "  {signature}");
                }
                Some(ListingDetail::Scoped(true)) => out.push_str("  (scoped)"),
                Some(ListingDetail::Underlying(ty)) => {
                    let _ = write!(out, "  = {ty}");
                }
                Some(ListingDetail::Members(members)) if !members.is_empty() => {
                    let fields: Vec<String> = members
                        .iter()
                        .map(|m| format!("{} {}", m.ty, m.name))
                        .collect();
                    let _ = write!(out, "  {{ {} }}", fields.join("; "));
                }
                _ => {}
            }
            if let Some(location) = entry.declarations.first() {
                let _ = write!(out, "  [{location}]");
            }
            if !entry.brief.is_empty() {
                let _ = write!(out, "  // {}", entry.brief);
            }
            out.push('\n');
        }
        for unresolved in &self.unresolved {
            let _ = writeln!(out, "? {} at {}", unresolved.name, unresolved.location);
        }
        out
    }
}

fn detail(symbol: &Symbol, registry: &SymbolRegistry) -> Option<ListingDetail> {
    let spell = |ty: Option<&Type>| spell_or_invalid(ty, registry);

    match symbol.kind() {
        SymbolKind::Function(function) => function.signature().map(|signature| {
            ListingDetail::Signature(render_signature(symbol, signature, registry))
        }),
        SymbolKind::Enum { scoped } => Some(ListingDetail::Scoped(*scoped)),
        SymbolKind::Typedef(typedef) => typedef
            .underlying()
            .map(|underlying| ListingDetail::Underlying(spell(underlying))),
        SymbolKind::Struct(record) | SymbolKind::Class(record) => record.members().map(|members| {
            ListingDetail::Members(
                members
                    .iter()
                    .map(|field| MemberEntry {
                        name: field.name.clone(),
                        ty: spell(field.ty.as_ref()),
                    })
                    .collect(),
            )
        }),
        SymbolKind::Namespace | SymbolKind::UnexposedDeclaration => None,
    }
}

fn spell_or_invalid(ty: Option<&Type>, registry: &SymbolRegistry) -> String {
    ty.map_or_else(|| "<invalid>".to_string(), |t| t.spelling(registry))
}

fn render_signature(
    symbol: &Symbol,
    signature: &FunctionSignature,
    registry: &SymbolRegistry,
) -> String {
    let args: Vec<String> = signature
        .args
        .iter()
        .map(|arg| {
            let ty = spell_or_invalid(arg.ty.as_ref(), registry);
            if arg.name.is_empty() {
                ty
            } else {
                format!("{ty} {}", arg.name)
            }
        })
        .collect();
    format!(
        "{} {}({})",
        spell_or_invalid(signature.ret.as_ref(), registry),
        symbol.spelling,
        args.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basic::BasicType;
    use crate::parser::DocumentParser;
    use crate::snapshot::SnapshotBuilder;
    use crate::source::CursorKind;
    use pretty_assertions::assert_eq;

    fn sample_registry() -> SymbolRegistry {
        let mut builder = SnapshotBuilder::new("main.cpp");
        let ns = builder.declare(builder.root(), CursorKind::Namespace, "geo");
        let point = builder.declare(ns, CursorKind::StructDecl, "Point");
        builder.define(point);
        builder.comment(point, "A 2D point.", "/// A 2D point.");
        let double = builder.basic(BasicType::Double);
        builder.field(point, "x", double);
        builder.field(point, "y", double);

        let point_ty = builder.record_type(point);
        let const_point = builder.qualified(point_ty, true, false);
        let point_ref = builder.lvalue_ref(const_point);
        let length = builder.declare(ns, CursorKind::FunctionDecl, "length");
        builder.set_result_type(length, double);
        builder.argument(length, "p", point_ref);

        builder.declare(builder.root(), CursorKind::VarDecl, "origin");
        let snapshot = builder.build().unwrap();

        let mut parser = DocumentParser::default();
        parser.parse_unit(&snapshot.root()).unwrap();
        parser.into_registry()
    }

    #[test]
    fn test_listing_is_sorted_and_detailed() {
        let registry = sample_registry();
        let listing = SymbolListing::from_registry(&registry);

        let names: Vec<&str> = listing
            .symbols
            .iter()
            .map(|entry| entry.qualified_name.as_str())
            .collect();
        assert_eq!(names, vec!["geo", "geo::Point", "geo::length"]);

        let point = &listing.symbols[1];
        assert_eq!(point.kind, "struct");
        assert_eq!(point.brief, "A 2D point.");
        assert_eq!(
            point.detail,
            Some(ListingDetail::Members(vec![
                MemberEntry {
                    name: "x".to_string(),
                    ty: "double".to_string()
                },
                MemberEntry {
                    name: "y".to_string(),
                    ty: "double".to_string()
                },
            ]))
        );

        assert_eq!(
            listing.symbols[2].detail,
            Some(ListingDetail::Signature(
                "double length(const geo::Point & p)".to_string()
            ))
        );
        assert_eq!(listing.unresolved.len(), 1);
    }

    #[test]
    fn test_text_and_json_output() {
        let listing = SymbolListing::from_registry(&sample_registry());
        let text = listing.to_text();
        assert!(text.contains("* struct    geo::Point"));
        assert!(text.contains("// A 2D point."));
        assert!(text.contains("? origin at main.cpp:"));

        let text = listing.clone().without_unresolved().to_text();
        assert!(!text.contains("origin"));

        let json = serde_json::to_value(&listing).unwrap();
        assert_eq!(
            json["symbols"][2]["detail"]["signature"],
            "double length(const geo::Point & p)"
        );
        assert_eq!(json["symbols"][0]["kind"], "namespace");
    }
}
