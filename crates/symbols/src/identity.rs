//! Identity Builder.
//!
//! A symbol is addressed by the chain of [`IdentityPart`]s from the
//! translation-unit root down to the entity. Functions are keyed by their
//! mangled name so overloads stay distinct; every other named entity is keyed
//! by its plain spelling.

use crate::source::{Cursor, CursorKind};
use std::cmp::Ordering;
use std::fmt;

/// One segment of a qualified identity
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct IdentityPart {
    /// Stable key: mangled name for functions, spelling otherwise
    pub key: String,
    pub spelling: String,
    pub display: String,
}

impl IdentityPart {
    pub fn new(
        key: impl Into<String>,
        spelling: impl Into<String>,
        display: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            spelling: spelling.into(),
            display: display.into(),
        }
    }

    /// A part without a stable key carries no identity
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.key.is_empty()
    }
}

// Display name first, then spelling, then the stable key.
impl Ord for IdentityPart {
    fn cmp(&self, other: &Self) -> Ordering {
        self.display
            .cmp(&other.display)
            .then_with(|| self.spelling.cmp(&other.spelling))
            .then_with(|| self.key.cmp(&other.key))
    }
}

impl PartialOrd for IdentityPart {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Fully qualified identity, root first
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identity(Vec<IdentityPart>);

impl Identity {
    #[must_use]
    pub fn new(parts: Vec<IdentityPart>) -> Self {
        Self(parts)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn parts(&self) -> &[IdentityPart] {
        &self.0
    }

    #[must_use]
    pub fn last(&self) -> Option<&IdentityPart> {
        self.0.last()
    }

    /// Identity of the enclosing entity, if any
    #[must_use]
    pub fn parent(&self) -> Option<Identity> {
        match self.0.split_last() {
            Some((_, rest)) if !rest.is_empty() => Some(Self(rest.to_vec())),
            _ => None,
        }
    }

    /// Append a part, yielding the identity of a nested entity
    #[must_use]
    pub fn child(&self, part: IdentityPart) -> Identity {
        let mut parts = self.0.clone();
        parts.push(part);
        Self(parts)
    }

    /// Stable keys joined with `::`
    #[must_use]
    pub fn to_key_string(&self) -> String {
        self.join(|part| &part.key)
    }

    #[must_use]
    pub fn spelling(&self) -> String {
        self.join(|part| &part.spelling)
    }

    #[must_use]
    pub fn display(&self) -> String {
        self.join(|part| &part.display)
    }

    fn join<'a>(&'a self, field: impl Fn(&'a IdentityPart) -> &'a String) -> String {
        self.0
            .iter()
            .map(|part| field(part).as_str())
            .collect::<Vec<_>>()
            .join("::")
    }
}

impl From<IdentityPart> for Identity {
    fn from(part: IdentityPart) -> Self {
        Self(vec![part])
    }
}

impl std::ops::Add<IdentityPart> for Identity {
    type Output = Identity;

    fn add(mut self, part: IdentityPart) -> Identity {
        self.0.push(part);
        self
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.spelling())
    }
}

/// Compute the identity segment contributed by a single cursor.
///
/// Kinds without a stable naming rule yield an empty part.
pub fn identity_part<C: Cursor>(cursor: &C) -> IdentityPart {
    match cursor.kind() {
        CursorKind::FunctionDecl => IdentityPart::new(
            cursor.mangled_name(),
            cursor.spelling(),
            cursor.display_name(),
        ),
        CursorKind::Namespace
        | CursorKind::StructDecl
        | CursorKind::ClassDecl
        | CursorKind::EnumDecl
        | CursorKind::TypedefDecl
        | CursorKind::UnexposedDecl => {
            let spelling = cursor.spelling();
            IdentityPart::new(spelling.clone(), spelling, cursor.display_name())
        }
        kind => {
            log::debug!("No stable identity for {} `{}`", kind, cursor.spelling());
            IdentityPart::default()
        }
    }
}

/// Compute the qualified identity of a cursor by walking its semantic parents.
///
/// Returns an empty identity when the cursor itself has no stable part.
pub fn identity<C: Cursor>(cursor: &C) -> Identity {
    let part = identity_part(cursor);
    if part.is_empty() {
        return Identity::default();
    }

    match cursor.semantic_parent() {
        Some(parent) if !parent.is_root() => identity(&parent) + part,
        _ => Identity::from(part),
    }
}
